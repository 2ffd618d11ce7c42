//! 应用层

pub mod product;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::file_store::PUBLIC_PREFIX;
use product::handler::{health_check, search_products, upload_product, AppState};

/// 创建路由：产品接口、健康检查以及上传目录的静态路由
pub fn create_routes(state: AppState) -> Router {
    let upload_dir = state.product_service.file_store().root().to_path_buf();

    Router::new()
        .route("/api/products", get(search_products).post(upload_product))
        .route("/health", get(health_check))
        .nest_service(PUBLIC_PREFIX, ServeDir::new(upload_dir))
        // 上传不限制大小
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
