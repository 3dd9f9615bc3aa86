//! Order Creation
//!
//! Two phases against the store:
//!
//! 1. Resolve: validate every requested (product, quantity) pair, then
//!    persist one line item record per pair. Sibling writes have no ordering
//!    dependency and are issued concurrently; the result preserves input
//!    order.
//! 2. Aggregate: re-fetch each line item joined with its product's unit
//!    price, sum `price * quantity` as Decimal, and persist the order
//!    referencing the line items.
//!
//! There is no transaction around the two phases. If the order write fails,
//! the created line items are deleted again (compensating cleanup); cleanup
//! failures are logged per item and reported in the returned error.

use crate::db::models::{LineItemRequest, Order, OrderCreate, OrderStatus};
use crate::db::repository::{
    LineItemRepository, OrderRepository, ProductRepository, RepoError, RepoResult, UserRepository,
};
use rust_decimal::Decimal;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Create an order from the requested line items
///
/// Fails with a validation error before any write if a quantity is not
/// positive, a product reference does not resolve, the user does not exist,
/// or the item list is empty.
pub async fn create_order(db: &Surreal<Db>, data: OrderCreate) -> RepoResult<Order> {
    if data.order_items.is_empty() {
        return Err(RepoError::Validation(
            "Order must contain at least one line item".to_string(),
        ));
    }

    let users = UserRepository::new(db.clone());
    let user = users
        .find_by_id(&data.user)
        .await?
        .ok_or_else(|| RepoError::Validation(format!("User {} does not exist", data.user)))?;
    let user_id = user
        .id
        .ok_or_else(|| RepoError::Database("User record has no id".to_string()))?;

    let resolved = resolve_products(db, &data.order_items).await?;

    // Fan-out: persist the line items concurrently
    let line_items = LineItemRepository::new(db.clone());
    let item_ids = persist_line_items(&line_items, resolved).await?;

    // Fan-in barrier: all writes observed, re-fetch with unit prices
    let total_price = match aggregate_total(&line_items, &item_ids).await {
        Ok(total) => total,
        Err(e) => {
            cleanup_line_items(&line_items, &item_ids).await;
            return Err(e);
        }
    };

    let order = Order {
        id: None,
        order_items: item_ids.clone(),
        shipping_address1: data.shipping_address1,
        shipping_address2: data.shipping_address2,
        city: data.city,
        zip: data.zip,
        country: data.country,
        phone: data.phone,
        status: data.status.unwrap_or(OrderStatus::Pending),
        total_price,
        user: user_id,
        date_ordered: chrono::Utc::now().timestamp_millis(),
    };

    let orders = OrderRepository::new(db.clone());
    match orders.insert(order).await {
        Ok(created) => {
            tracing::info!(
                order_id = %created.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
                items = item_ids.len(),
                total = %created.total_price,
                "Order created"
            );
            Ok(created)
        }
        Err(e) => {
            tracing::error!(error = %e, "Order write failed, removing created line items");
            cleanup_line_items(&line_items, &item_ids).await;
            Err(e)
        }
    }
}

/// Validate quantities and resolve every product reference before any write
async fn resolve_products(
    db: &Surreal<Db>,
    items: &[LineItemRequest],
) -> RepoResult<Vec<(RecordId, i64)>> {
    let products = ProductRepository::new(db.clone());
    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 {
            return Err(RepoError::Validation(format!(
                "Quantity must be a positive integer, got {}",
                item.quantity
            )));
        }
        let product = products
            .find_by_id(&item.product)
            .await?
            .ok_or_else(|| {
                RepoError::Validation(format!("Product {} does not exist", item.product))
            })?;
        let product_id = product
            .id
            .ok_or_else(|| RepoError::Database("Product record has no id".to_string()))?;
        resolved.push((product_id, item.quantity));
    }
    Ok(resolved)
}

/// Persist one record per line item, concurrently, preserving input order.
/// On partial failure the successfully created siblings are cleaned up.
async fn persist_line_items(
    line_items: &LineItemRepository,
    resolved: Vec<(RecordId, i64)>,
) -> RepoResult<Vec<RecordId>> {
    let writes = resolved
        .into_iter()
        .map(|(product, quantity)| line_items.create(product, quantity));
    let results = futures::future::join_all(writes).await;

    let mut item_ids = Vec::with_capacity(results.len());
    let mut first_err = None;
    for result in results {
        match result {
            Ok(item) => match item.id {
                Some(id) => item_ids.push(id),
                None => {
                    first_err.get_or_insert(RepoError::Database(
                        "Line item record has no id".to_string(),
                    ));
                }
            },
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_err {
        cleanup_line_items(line_items, &item_ids).await;
        return Err(e);
    }
    Ok(item_ids)
}

/// Re-fetch each line item joined with its product price and sum the total
async fn aggregate_total(
    line_items: &LineItemRepository,
    item_ids: &[RecordId],
) -> RepoResult<Decimal> {
    let reads = item_ids.iter().map(|id| line_items.find_priced(id));
    let priced = futures::future::try_join_all(reads).await?;
    Ok(priced
        .iter()
        .fold(Decimal::ZERO, |acc, item| {
            acc + item.unit_price * Decimal::from(item.quantity)
        }))
}

/// Compensating cleanup: delete line items that would otherwise be orphaned.
/// Failures are logged per item; the original error is what the caller
/// reports.
async fn cleanup_line_items(line_items: &LineItemRepository, item_ids: &[RecordId]) {
    let mut failed = 0usize;
    for id in item_ids {
        if let Err(e) = line_items.delete(id).await {
            failed += 1;
            tracing::error!(line_item = %id, error = %e, "Compensating cleanup failed");
        }
    }
    if failed > 0 {
        tracing::warn!(
            failed,
            total = item_ids.len(),
            "Orphaned line items remain after failed order creation"
        );
    }
}
