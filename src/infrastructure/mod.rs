//! 基础设施层：数据库连接、上传文件存储、日志

pub mod database;
pub mod file_store;
pub mod logger;
