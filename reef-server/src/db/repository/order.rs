//! Order Repository
//!
//! Persistence-level operations for orders: insert, typed reads with
//! record-link expansion (FETCH), status update, delete, and the scalar
//! aggregates (total sales, count).

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{Order, OrderExpanded, OrderStatus, OrderSummary};
use rust_decimal::Decimal;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order record
    ///
    /// `order.id` is ignored; the store assigns the record id. Links are
    /// bound as RecordIds so they are stored as record links.
    pub async fn insert(&self, order: Order) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE order SET
                    order_items = $order_items,
                    shipping_address1 = $shipping_address1,
                    shipping_address2 = $shipping_address2,
                    city = $city,
                    zip = $zip,
                    country = $country,
                    phone = $phone,
                    status = $status,
                    total_price = $total_price,
                    user = $user,
                    date_ordered = $date_ordered
                RETURN AFTER"#,
            )
            .bind(("order_items", order.order_items))
            .bind(("shipping_address1", order.shipping_address1))
            .bind(("shipping_address2", order.shipping_address2))
            .bind(("city", order.city))
            .bind(("zip", order.zip))
            .bind(("country", order.country))
            .bind(("phone", order.phone))
            .bind(("status", order.status))
            .bind(("total_price", order.total_price))
            .bind(("user", order.user))
            .bind(("date_ordered", order.date_ordered))
            .await?;

        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id (no expansion)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// All orders with the user's display name joined in, newest first
    pub async fn list_summaries(&self) -> RepoResult<Vec<OrderSummary>> {
        let orders: Vec<OrderSummary> = self
            .base
            .db()
            .query("SELECT *, user.name AS user_name FROM order ORDER BY date_ordered DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// One order with full nested expansion:
    /// user, line items, each line item's product, each product's category
    pub async fn find_expanded(&self, id: &str) -> RepoResult<Option<OrderExpanded>> {
        let record_id = parse_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE id = $id \
                 FETCH user, order_items, order_items.product, order_items.product.category",
            )
            .bind(("id", record_id))
            .await?;
        let orders: Vec<OrderExpanded> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders of one user with full nested expansion, newest first
    pub async fn find_expanded_by_user(&self, user_id: &str) -> RepoResult<Vec<OrderExpanded>> {
        let user: RecordId = parse_id("user", user_id)?;
        let orders: Vec<OrderExpanded> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE user = $user ORDER BY date_ordered DESC \
                 FETCH user, order_items, order_items.product, order_items.product.category",
            )
            .bind(("user", user))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Sum of `total_price` across all orders
    ///
    /// Summation happens over Decimal values, so zero orders is a valid
    /// `Ok(0)`, never an error.
    pub async fn total_sales(&self) -> RepoResult<Decimal> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE total_price FROM order")
            .await?;
        let totals: Vec<Decimal> = result.take(0)?;
        Ok(totals.into_iter().sum())
    }

    /// Count of all orders; zero is a valid count, distinct from a store
    /// failure
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Update only the `status` field, returning the updated record
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let record_id = parse_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $record SET status = $status RETURN AFTER")
            .bind(("record", record_id))
            .bind(("status", status))
            .await?;
        let updated: Option<Order> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Delete the order record, returning it so the caller can cascade to
    /// its line items
    pub async fn delete(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = parse_id(TABLE, id)?;
        let deleted: Option<Order> = self.base.db().delete(record_id).await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn empty_aggregates_return_zero_not_error() {
        let service = DbService::new_memory().await.unwrap();
        let repo = OrderRepository::new(service.db);

        assert_eq!(repo.total_sales().await.unwrap(), Decimal::ZERO);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_status_on_missing_order_is_not_found() {
        let service = DbService::new_memory().await.unwrap();
        let repo = OrderRepository::new(service.db);

        let err = repo
            .update_status("order:missing", OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
