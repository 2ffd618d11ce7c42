//! 产品仓储：PostgreSQL 实现与内存实现

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Product, ProductDraft};
use crate::core::error::PersistenceError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 插入新产品，返回带有存储后端分配的 id 的记录
    async fn create(&self, draft: ProductDraft) -> Result<Product, PersistenceError>;

    /// `name` 包含 `term`（不区分大小写）的全部产品；空串匹配所有记录
    async fn search(&self, term: &str) -> Result<Vec<Product>, PersistenceError>;

    async fn ping(&self) -> Result<(), PersistenceError>;
}

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, draft: ProductDraft) -> Result<Product, PersistenceError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, description, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, description, image_url, created_at
            "#,
        )
        .bind(&draft.name)
        .bind(draft.price)
        .bind(&draft.description)
        .bind(&draft.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    async fn search(&self, term: &str) -> Result<Vec<Product>, PersistenceError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, description, image_url, created_at
            FROM products
            WHERE $1 = '' OR name ILIKE $2 ESCAPE '\'
            "#,
        )
        .bind(term)
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// `%term%`，其中 `%`、`_`、`\` 按字面匹配
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// 内存仓储，按插入顺序返回结果
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, draft: ProductDraft) -> Result<Product, PersistenceError> {
        let product = Product {
            id: Uuid::new_v4(),
            name: draft.name,
            price: draft.price,
            description: draft.description,
            image_url: draft.image_url,
            created_at: chrono::Utc::now(),
        };

        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn search(&self, term: &str) -> Result<Vec<Product>, PersistenceError> {
        let products = self.products.read().await;
        if term.is_empty() {
            return Ok(products.clone());
        }

        let needle = term.to_lowercase();
        Ok(products
            .iter()
            .filter(|p| {
                p.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
