//! 核心错误处理模块

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::QueryRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::response::MessageResponse;

/// 存储后端错误：后端不可达、拒绝写入或查询失败
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("数据库操作失败: {0}")]
    Database(#[from] sqlx::Error),
    #[error("存储后端不可用: {0}")]
    Unavailable(String),
}

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("缺少上传文件字段: {0}")]
    MissingFile(&'static str),
    #[error("请求不是合法的 multipart: {0}")]
    NotMultipart(#[from] MultipartRejection),
    #[error("multipart 解析失败: {0}")]
    Multipart(#[from] MultipartError),
    #[error("查询参数无效: {0}")]
    Query(#[from] QueryRejection),
    #[error("字段校验失败: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("文件存储失败: {0}")]
    FileStore(#[from] std::io::Error),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// 处理器边界上的失败：完整错误只写日志，调用方只看到简短的消息
#[derive(Debug)]
pub struct ApiFailure {
    pub message: &'static str,
    pub error: CoreError,
}

impl ApiFailure {
    pub fn new(message: &'static str, error: impl Into<CoreError>) -> Self {
        Self {
            message,
            error: error.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        error!("{}: {}", self.message, self.error);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(MessageResponse::new(self.message)),
        )
            .into_response()
    }
}
