//! 上传文件存储
//!
//! 文件名 = 当前 UTC 微秒时间戳 + 原文件扩展名。同一微秒内扩展名相同的两次上传会互相覆盖，后写者胜出。

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 静态文件路由前缀
pub const PUBLIC_PREFIX: &str = "/uploads";

/// 已写入磁盘的上传文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub file_name: String,
    pub path: PathBuf,
    /// 对外路径，如 `/uploads/1700000000000000.png`
    pub public_path: String,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// 上传目录不存在时自动创建
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> io::Result<StoredFile> {
        let file_name = format!(
            "{}{}",
            chrono::Utc::now().timestamp_micros(),
            extension_of(original_name.unwrap_or_default())
        );
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, bytes).await?;
        debug!("stored upload {:?} ({} bytes)", path, bytes.len());

        Ok(StoredFile {
            public_path: format!("{}/{}", PUBLIC_PREFIX, file_name),
            file_name,
            path,
        })
    }

    pub async fn remove(&self, stored: &StoredFile) -> io::Result<()> {
        tokio::fs::remove_file(&stored.path).await
    }
}

/// 带点的扩展名，没有扩展名时为空串（`.bashrc` 视为无扩展名）
fn extension_of(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}
