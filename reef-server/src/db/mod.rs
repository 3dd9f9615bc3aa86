//! Database Module
//!
//! Embedded SurrealDB storage. Record links ("table:id") reference entities
//! across tables; expansion is done with FETCH clauses in the repositories.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "reef";
const DATABASE: &str = "commerce";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        let service = Self::init(db).await?;
        tracing::info!(path = %db_path, "Database connection established");
        Ok(service)
    }

    /// Open an in-memory database (tests and ephemeral runs)
    pub async fn new_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_schema(&db).await?;
        Ok(Self { db })
    }
}

/// Define tables and indexes (idempotent, runs at every startup)
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS category SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS line_item SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_email ON user FIELDS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS order_user ON order FIELDS user;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

    tracing::debug!("Database schema defined");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opens_on_disk_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reef.db");
        let service = DbService::new(&path.to_string_lossy()).await.unwrap();

        service
            .db
            .query("CREATE category SET name = 'disk'")
            .await
            .unwrap();
        let mut result = service
            .db
            .query("SELECT VALUE name FROM category")
            .await
            .unwrap();
        let names: Vec<String> = result.take(0).unwrap();
        assert_eq!(names, vec!["disk".to_string()]);
    }

    #[tokio::test]
    async fn schema_definition_is_idempotent() {
        let service = DbService::new_memory().await.unwrap();
        define_schema(&service.db).await.unwrap();
        define_schema(&service.db).await.unwrap();
    }
}
