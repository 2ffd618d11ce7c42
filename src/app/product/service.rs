//! 产品业务服务

use std::sync::Arc;
use tracing::{info, warn};

use super::model::{Product, ProductForm};
use super::repository::ProductRepository;
use crate::core::error::{CoreError, PersistenceError};
use crate::infrastructure::file_store::FileStore;

/// multipart 中的文件部分，已读入内存
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    file_store: FileStore,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>, file_store: FileStore) -> Self {
        Self {
            repository,
            file_store,
        }
    }

    pub fn file_store(&self) -> &FileStore {
        &self.file_store
    }

    /// 校验字段、写文件、插入记录；插入失败时删除已写入的文件
    pub async fn upload(
        &self,
        form: ProductForm,
        file: Option<UploadedFile>,
    ) -> Result<Product, CoreError> {
        let file = file.ok_or(CoreError::MissingFile("productImage"))?;

        // 先校验，校验失败时不落盘
        let fields = form.coerce()?;

        let stored = self
            .file_store
            .save(file.file_name.as_deref(), &file.bytes)
            .await?;
        let draft = fields.into_draft(stored.public_path.clone());

        match self.repository.create(draft).await {
            Ok(product) => {
                info!("Created product {} ({:?})", product.id, product.name);
                Ok(product)
            }
            Err(e) => {
                if let Err(cleanup) = self.file_store.remove(&stored).await {
                    warn!("Failed to remove orphaned upload {:?}: {}", stored.path, cleanup);
                }
                Err(e.into())
            }
        }
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Product>, PersistenceError> {
        self.repository.search(term).await
    }

    pub async fn health(&self) -> Result<(), PersistenceError> {
        self.repository.ping().await
    }
}
