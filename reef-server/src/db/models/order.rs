//! Order Model
//!
//! An order owns its line items: they are created together during order
//! submission and deleted together when the order is deleted. `total_price`
//! is a snapshot computed at creation time from the referenced products'
//! unit prices.

use super::serde_helpers;
use crate::db::models::Category;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Order ID type
pub type OrderId = RecordId;

// =============================================================================
// Order Status
// =============================================================================

/// Order status with an explicit lifecycle
///
/// Transitions: Pending -> Shipped | Cancelled, Shipped -> Delivered.
/// Delivered and Cancelled are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether a transition from `self` to `next` is allowed
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Shipped) | (Pending, Cancelled) | (Shipped, Delivered)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// Persisted line item: one product + quantity entry within an order.
/// Owned exclusively by the order that references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub quantity: i64,
}

/// Line item joined with its product's unit price (aggregation read model)
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemPriced {
    pub quantity: i64,
    pub unit_price: Decimal,
}

// =============================================================================
// Order
// =============================================================================

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Record links to owned line items, in submission order
    #[serde(with = "serde_helpers::vec_record_id")]
    pub order_items: Vec<RecordId>,
    pub shipping_address1: String,
    #[serde(default)]
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: OrderStatus,
    /// Snapshot of sum(product.price * quantity) at creation time
    pub total_price: Decimal,
    /// Record link to the ordering user
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    /// Creation timestamp (epoch millis), immutable
    pub date_ordered: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// One requested line item in an order submission
///
/// Quantity and product existence are checked by the line-item resolver
/// before anything is written.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LineItemRequest {
    /// Product ID ("product:xyz")
    pub product: String,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(min = 1, message = "order must contain at least one line item"))]
    pub order_items: Vec<LineItemRequest>,
    #[validate(length(min = 1, max = 500))]
    pub shipping_address1: String,
    #[validate(length(max = 500))]
    pub shipping_address2: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub zip: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(length(min = 1, max = 100))]
    pub phone: String,
    /// Initial status; defaults to Pending
    #[serde(default)]
    pub status: Option<OrderStatus>,
    /// User ID ("user:xyz")
    #[validate(length(min = 1))]
    pub user: String,
}

/// Update status payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

// =============================================================================
// Read Models (expansion)
// =============================================================================

/// User fields exposed in order expansion (display name only, never the
/// full user record)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBrief {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
}

/// Product expanded with its category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductExpanded {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub price: Decimal,
    pub category: Category,
    #[serde(default)]
    pub count_in_stock: i64,
}

/// Line item expanded with its product (and the product's category)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemExpanded {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub product: ProductExpanded,
    pub quantity: i64,
}

/// Order summary for list views: user expanded to display name only,
/// line items left as references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::vec_record_id")]
    pub order_items: Vec<RecordId>,
    pub shipping_address1: String,
    #[serde(default)]
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: OrderStatus,
    pub total_price: Decimal,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    /// Display name of the referenced user (empty if the link dangles)
    #[serde(default)]
    pub user_name: String,
    pub date_ordered: i64,
}

/// Fully expanded order for detail views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderExpanded {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    pub order_items: Vec<LineItemExpanded>,
    pub shipping_address1: String,
    #[serde(default)]
    pub shipping_address2: Option<String>,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub status: OrderStatus,
    pub total_price: Decimal,
    pub user: UserBrief,
    pub date_ordered: i64,
}
