//! Line Item Repository
//!
//! Line items are owned by their order: created during order submission,
//! deleted only when the owning order is deleted.

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{LineItem, LineItemPriced};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "line_item";

#[derive(Clone)]
pub struct LineItemRepository {
    base: BaseRepository,
}

impl LineItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist one line item record
    ///
    /// The product reference is bound as a RecordId so it is stored as a
    /// record link.
    pub async fn create(&self, product: RecordId, quantity: i64) -> RepoResult<LineItem> {
        let mut result = self
            .base
            .db()
            .query("CREATE line_item SET product = $product, quantity = $quantity RETURN AFTER")
            .bind(("product", product))
            .bind(("quantity", quantity))
            .await?;
        let created: Option<LineItem> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create line item".to_string()))
    }

    /// Find line item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<LineItem>> {
        let record_id = parse_id(TABLE, id)?;
        let item: Option<LineItem> = self.base.db().select(record_id).await?;
        Ok(item)
    }

    /// Re-fetch a line item joined with its product's unit price
    pub async fn find_priced(&self, id: &RecordId) -> RepoResult<LineItemPriced> {
        let mut result = self
            .base
            .db()
            .query("SELECT quantity, product.price AS unit_price FROM $item")
            .bind(("item", id.clone()))
            .await?;
        let priced: Vec<LineItemPriced> = result.take(0)?;
        priced
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Line item {} not found", id)))
    }

    /// Delete one line item record
    pub async fn delete(&self, id: &RecordId) -> RepoResult<bool> {
        let deleted: Option<LineItem> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }
}
