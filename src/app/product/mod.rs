//! 产品目录：上传与按名称搜索

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;
