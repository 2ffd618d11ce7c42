use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use product_catalog::{
    app::product::{repository::PgProductRepository, service::ProductService},
    config::load_config,
    create_routes,
    infrastructure::{database::DatabaseManager, file_store::FileStore, logger::Logger},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    Logger::init(&config.logging.level);

    info!("Starting product catalog service...");

    let database = DatabaseManager::connect_with_retry(&config.database)
        .await
        .map_err(|e| {
            error!("❌ Database error: {}", e);
            e
        })?;
    database.ensure_schema().await?;

    let file_store = FileStore::new(&config.storage.upload_dir).with_context(|| {
        format!(
            "failed to create upload directory {:?}",
            config.storage.upload_dir
        )
    })?;

    let repository = Arc::new(PgProductRepository::new(database.into_pool()));
    let state = AppState {
        product_service: ProductService::new(repository, file_store),
    };
    let app = create_routes(state);

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Server running on http://{}", addr);
    info!("   POST   /api/products            - Upload product (multipart)");
    info!("   GET    /api/products?search=    - Search products by name");
    info!("   GET    /uploads/:file           - Uploaded images");
    info!("   GET    /health                  - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
