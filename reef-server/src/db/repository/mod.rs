//! Repository Module
//!
//! CRUD and query operations over the SurrealDB tables. Each repository
//! wraps one table; cross-entity reads use record-link traversal and FETCH.

pub mod category;
pub mod line_item;
pub mod order;
pub mod product;
pub mod user;

pub use category::CategoryRepository;
pub use line_item::LineItemRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        use crate::utils::AppError;
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

// =============================================================================
// ID Convention: "table:id" strings at the API surface
// =============================================================================
//
// surrealdb::RecordId handles all IDs:
//   - parse:  let id: RecordId = "product:abc".parse()?;
//   - create: let id = RecordId::from_table_key("product", "abc");
//   - CRUD:   db.select(id) / db.delete(id) take RecordId directly

/// Parse an ID into a RecordId for `table`.
///
/// Accepts both the prefixed form ("product:abc") and the bare key ("abc").
/// A prefix naming a different table is rejected.
pub(crate) fn parse_id(table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
    match id.split_once(':') {
        Some((prefix, _)) if prefix == table => id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID format: {}", id))),
        Some((prefix, _)) => Err(RepoError::Validation(format!(
            "Expected a {} ID, got a {} ID",
            table, prefix
        ))),
        None => Ok(surrealdb::RecordId::from_table_key(table, id)),
    }
}
