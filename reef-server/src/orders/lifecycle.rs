//! Order Lifecycle
//!
//! Status transitions follow the table on [`OrderStatus`]; anything outside
//! it is rejected. Deleting an order cascades to its owned line items
//! sequentially, and per-item failures are aggregated into one reported
//! outcome instead of being fired and forgotten.

use crate::db::models::{Order, OrderStatus};
use crate::db::repository::{LineItemRepository, OrderRepository, RepoError, RepoResult};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Update only the `status` field of an order
///
/// Fails with NotFound if the id does not resolve and with a validation
/// error if the transition is not allowed.
pub async fn update_status(
    db: &Surreal<Db>,
    id: &str,
    new_status: OrderStatus,
) -> RepoResult<Order> {
    let orders = OrderRepository::new(db.clone());
    let current = orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

    if !current.status.can_transition_to(new_status) {
        return Err(RepoError::Validation(format!(
            "Illegal status transition: {} -> {}",
            current.status, new_status
        )));
    }

    let updated = orders.update_status(id, new_status).await?;
    tracing::info!(order_id = %id, from = %current.status, to = %new_status, "Order status updated");
    Ok(updated)
}

/// Delete an order and every line item it references
///
/// Fails with NotFound if the order id does not resolve (line items are
/// untouched in that case). The order record is removed first; line item
/// deletions then run sequentially and any failures are aggregated into a
/// single error.
pub async fn delete_order(db: &Surreal<Db>, id: &str) -> RepoResult<()> {
    let orders = OrderRepository::new(db.clone());
    let deleted = orders
        .delete(id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

    let line_items = LineItemRepository::new(db.clone());
    let mut failures = Vec::new();
    for item_id in &deleted.order_items {
        if let Err(e) = line_items.delete(item_id).await {
            tracing::error!(line_item = %item_id, error = %e, "Cascade delete failed");
            failures.push(format!("{}: {}", item_id, e));
        }
    }

    if !failures.is_empty() {
        return Err(RepoError::Database(format!(
            "Order deleted, but {} of {} line item(s) could not be removed: {}",
            failures.len(),
            deleted.order_items.len(),
            failures.join("; ")
        )));
    }

    tracing::info!(order_id = %id, items = deleted.order_items.len(), "Order deleted");
    Ok(())
}
