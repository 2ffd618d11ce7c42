//! 核心响应处理模块

use serde::{Deserialize, Serialize};

/// `{ "message": ... }` 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            database: "connected".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: "unhealthy".to_string(),
            database: "disconnected".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
