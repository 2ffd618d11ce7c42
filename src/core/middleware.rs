//! 核心中间件模块

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// 请求日志中间件
///
/// 5xx 响应以 warn 级别记录，其余为 info。
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|q| q.to_string());
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(req).await;
    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, ?query, status = status.as_u16(), latency_ms, ?user_agent, "request failed");
    } else {
        info!(%method, %path, ?query, status = status.as_u16(), latency_ms, ?user_agent, "request handled");
    }

    response
}
