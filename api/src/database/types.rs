use anyhow::{Context, Result};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Connect to `database_url` and bring the schema up to date
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to {}", database_url))?;
        sqlx::migrate!()
            .run(&pool)
            .await
            .context("Failed to apply migrations")?;
        Ok(Self { pool })
    }
}
