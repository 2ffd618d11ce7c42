//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// 启动时连接数据库，失败后按固定间隔重试 `connect_retries` 次
    pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<Self, Error> {
        let delay = Duration::from_secs(config.retry_delay_secs);
        let mut attempt = 0;

        loop {
            attempt += 1;
            info!(
                "Connecting to database (attempt {}): {}",
                attempt,
                redact_password(&config.url)
            );

            match Self::new(config).await {
                Ok(manager) => {
                    info!("✅ Database connected");
                    return Ok(manager);
                }
                Err(e) if attempt <= config.connect_retries => {
                    warn!("Database connection failed: {}; retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// 建表（幂等）
    pub async fn ensure_schema(&self) -> Result<(), Error> {
        info!("Ensuring products table exists...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name TEXT,
                price DOUBLE PRECISION,
                description TEXT,
                image_url TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub fn into_pool(self) -> PgPool {
        self.pool
    }
}

/// 日志中隐藏连接字符串里的密码
pub fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_string(),
    }
}
