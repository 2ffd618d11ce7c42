use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::Value;
use tempfile::TempDir;

use product_catalog::{
    app::product::{
        model::{Product, ProductDraft},
        repository::{InMemoryProductRepository, ProductRepository},
        service::ProductService,
    },
    core::{error::PersistenceError, response::MessageResponse},
    create_routes,
    infrastructure::file_store::FileStore,
    AppState,
};

struct TestApp {
    server: TestServer,
    upload_dir: TempDir,
}

impl TestApp {
    fn new(repository: Arc<dyn ProductRepository>) -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let file_store = FileStore::new(upload_dir.path()).unwrap();
        let state = AppState {
            product_service: ProductService::new(repository, file_store),
        };
        let server = TestServer::new(create_routes(state)).unwrap();
        Self { server, upload_dir }
    }

    fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductRepository::new()))
    }

    fn stored_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }

    async fn search(&self, term: &str) -> Vec<Value> {
        let response = self
            .server
            .get("/api/products")
            .add_query_param("search", term)
            .await;
        response.assert_status_ok();
        response.json::<Vec<Value>>()
    }
}

fn product_form(name: &str, price: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name)
        .add_text("price", price)
        .add_text("description", "ceramic")
        .add_part(
            "productImage",
            Part::bytes(b"\x89PNG fake image".as_slice())
                .file_name("mug.png")
                .mime_type("image/png"),
        )
}

/// 存储后端不可用时的仓储
struct UnavailableRepository;

#[async_trait]
impl ProductRepository for UnavailableRepository {
    async fn create(&self, _draft: ProductDraft) -> Result<Product, PersistenceError> {
        Err(PersistenceError::Unavailable("connection refused".to_string()))
    }

    async fn search(&self, _term: &str) -> Result<Vec<Product>, PersistenceError> {
        Err(PersistenceError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn upload_then_search_round_trip() {
    let app = TestApp::in_memory();

    let response = app
        .server
        .post("/api/products")
        .multipart(product_form("Red Mug", "9.5"))
        .await;
    response.assert_status_ok();
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "✅ Product uploaded successfully!");

    let products = app.search("red").await;
    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product["name"], "Red Mug");
    assert_eq!(product["price"], 9.5);
    assert_eq!(product["description"], "ceramic");
    assert!(product["_id"].is_string());

    let image_url = product["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(".png"));
}

#[tokio::test]
async fn uploaded_product_appears_once_in_unfiltered_search() {
    let app = TestApp::in_memory();

    app.server
        .post("/api/products")
        .multipart(product_form("Teapot", "20"))
        .await
        .assert_status_ok();

    let products = app.search("").await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Teapot");

    let response = app.server.get("/api/products").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Vec<Value>>().len(), 1);
}

#[tokio::test]
async fn search_ignores_case_and_misses_return_empty() {
    let app = TestApp::in_memory();
    app.server
        .post("/api/products")
        .multipart(product_form("Red Mug", "9.5"))
        .await
        .assert_status_ok();

    for term in ["Red", "RED MUG", "ed m", "mug"] {
        let products = app.search(term).await;
        assert_eq!(products.len(), 1, "term {:?}", term);
    }
    assert!(app.search("plate").await.is_empty());
}

#[tokio::test]
async fn upload_without_file_fails_and_persists_nothing() {
    let app = TestApp::in_memory();

    let form = MultipartForm::new()
        .add_text("name", "Ghost")
        .add_text("price", "1");
    let response = app.server.post("/api/products").multipart(form).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "❌ Product upload failed");
    assert!(app.search("").await.is_empty());
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn non_multipart_upload_fails_with_500() {
    let app = TestApp::in_memory();

    let response = app
        .server
        .post("/api/products")
        .json(&serde_json::json!({ "name": "Red Mug", "price": 9.5 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.search("").await.is_empty());
}

#[tokio::test]
async fn sequential_uploads_get_distinct_image_paths() {
    let app = TestApp::in_memory();

    app.server
        .post("/api/products")
        .multipart(product_form("Red Mug", "9.5"))
        .await
        .assert_status_ok();
    tokio::time::sleep(Duration::from_millis(2)).await;
    app.server
        .post("/api/products")
        .multipart(product_form("Red Mug", "9.5"))
        .await
        .assert_status_ok();

    let products = app.search("").await;
    assert_eq!(products.len(), 2);
    assert_ne!(products[0]["imageUrl"], products[1]["imageUrl"]);
    assert_ne!(products[0]["_id"], products[1]["_id"]);
    assert_eq!(app.stored_files(), 2);
}

#[tokio::test]
async fn numeric_price_string_is_stored_as_number() {
    let app = TestApp::in_memory();
    app.server
        .post("/api/products")
        .multipart(product_form("Lamp", "19.99"))
        .await
        .assert_status_ok();

    let products = app.search("lamp").await;
    assert_eq!(products[0]["price"].as_f64(), Some(19.99));
}

#[tokio::test]
async fn unparseable_price_writes_neither_file_nor_product() {
    let app = TestApp::in_memory();

    let response = app
        .server
        .post("/api/products")
        .multipart(product_form("Lamp", "cheap"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.search("").await.is_empty());
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn missing_text_fields_are_stored_as_null() {
    let app = TestApp::in_memory();

    let form = MultipartForm::new().add_part(
        "productImage",
        Part::bytes(b"raw".as_slice()).file_name("photo"),
    );
    app.server
        .post("/api/products")
        .multipart(form)
        .await
        .assert_status_ok();

    let products = app.search("").await;
    assert_eq!(products.len(), 1);
    assert!(products[0]["name"].is_null());
    assert!(products[0]["price"].is_null());
    let image_url = products[0]["imageUrl"].as_str().unwrap();
    assert!(!image_url.trim_start_matches("/uploads/").contains('.'));
}

#[tokio::test]
async fn uploaded_image_is_served_from_static_route() {
    let app = TestApp::in_memory();
    app.server
        .post("/api/products")
        .multipart(product_form("Red Mug", "9.5"))
        .await
        .assert_status_ok();

    let products = app.search("mug").await;
    let image_url = products[0]["imageUrl"].as_str().unwrap().to_string();

    let response = app.server.get(&image_url).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"\x89PNG fake image");

    app.server
        .get("/uploads/does-not-exist.png")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn repository_failure_removes_orphaned_file() {
    let app = TestApp::new(Arc::new(UnavailableRepository));

    let response = app
        .server
        .post("/api/products")
        .multipart(product_form("Red Mug", "9.5"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "❌ Product upload failed");
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn search_failure_is_opaque_500() {
    let app = TestApp::new(Arc::new(UnavailableRepository));

    let response = app.server.get("/api/products").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "❌ Error fetching products");
}

#[tokio::test]
async fn health_reflects_backend_state() {
    let healthy = TestApp::in_memory();
    let response = healthy.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");

    let unhealthy = TestApp::new(Arc::new(UnavailableRepository));
    let response = unhealthy.server.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["database"], "disconnected");
}

#[tokio::test]
async fn cors_headers_are_present() {
    let app = TestApp::in_memory();

    let response = app
        .server
        .get("/api/products")
        .add_header(
            axum::http::header::ORIGIN,
            axum::http::HeaderValue::from_static("http://localhost:3000"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        "*"
    );
}

#[tokio::test]
async fn malformed_search_query_is_opaque_500() {
    let app = TestApp::in_memory();

    let response = app.server.get("/api/products?search=a&search=b").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: MessageResponse = response.json();
    assert_eq!(body.message, "❌ Error fetching products");
}

#[tokio::test]
async fn hex_price_is_coerced_to_number() {
    let app = TestApp::in_memory();
    app.server
        .post("/api/products")
        .multipart(product_form("Hex Mug", "0x10"))
        .await
        .assert_status_ok();

    let products = app.search("hex").await;
    assert_eq!(products[0]["price"].as_f64(), Some(16.0));
}
