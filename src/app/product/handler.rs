//! 产品处理器

use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection, Multipart, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;

use super::{
    model::{Product, ProductForm},
    service::{ProductService, UploadedFile},
};
use crate::core::{
    error::{ApiFailure, CoreError},
    response::{HealthResponse, MessageResponse},
};

pub const UPLOAD_SUCCEEDED: &str = "✅ Product uploaded successfully!";
pub const UPLOAD_FAILED: &str = "❌ Product upload failed";
pub const SEARCH_FAILED: &str = "❌ Error fetching products";

const IMAGE_FIELD: &str = "productImage";

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

/// POST /api/products
pub async fn upload_product(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiFailure> {
    let multipart = multipart.map_err(|e| ApiFailure::new(UPLOAD_FAILED, e))?;
    let (form, file) = read_upload(multipart)
        .await
        .map_err(|e| ApiFailure::new(UPLOAD_FAILED, e))?;

    state
        .product_service
        .upload(form, file)
        .await
        .map_err(|e| ApiFailure::new(UPLOAD_FAILED, e))?;

    Ok(Json(MessageResponse::new(UPLOAD_SUCCEEDED)))
}

/// GET /api/products?search=<term>
pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, ApiFailure> {
    let Query(query) = query.map_err(|e| ApiFailure::new(SEARCH_FAILED, e))?;
    let products = state
        .product_service
        .search(&query.search)
        .await
        .map_err(|e| ApiFailure::new(SEARCH_FAILED, e))?;

    Ok(Json(products))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.product_service.health().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy()),
            )
        }
    }
}

/// 读取全部 multipart 字段；文件内容缓存在内存中，未知字段忽略。
/// 没有文件名的 `productImage` 部分按普通文本处理，不算作文件。
async fn read_upload(
    mut multipart: Multipart,
) -> Result<(ProductForm, Option<UploadedFile>), CoreError> {
    let mut form = ProductForm::default();
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            IMAGE_FIELD if field.file_name().is_some() => {
                let file_name = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await?;
                file = Some(UploadedFile {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "name" => form.name = Some(field.text().await?),
            "price" => form.price = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            _ => {}
        }
    }

    Ok((form, file))
}
