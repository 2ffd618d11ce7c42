//! # 产品目录服务
//!
//! 客户端上传产品（名称、价格、描述、图片），并按名称子串搜索已有产品。
//! - `app`: 路由、处理器、业务服务与仓储
//! - `core`: 错误类型、响应结构、中间件
//! - `infrastructure`: 数据库连接、上传文件存储、日志
//! - `config`: 配置文件与环境变量

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::create_routes;
pub use app::product::handler::AppState;
