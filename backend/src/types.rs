//! Wire types for the order backend
//!
//! Field names follow the backend's camelCase JSON. Money is
//! [`Decimal`]; the backend sends decimals as strings (`"20.00"`) and the
//! decoder also accepts plain numbers. Prices in request bodies go out as
//! JSON numbers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product as served by `GET /api/products`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Product id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Decimal,
    /// Units available
    pub stock: u32,
    /// Category label
    #[serde(default)]
    pub category: String,
    /// Inactive products are hidden from the kiosk
    #[serde(default = "default_active")]
    pub active: bool,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

const fn default_active() -> bool {
    true
}

/// Order lifecycle status on the backend
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Items are held for pickup
    Reserved,
    /// Staff picked the items
    Picked,
    /// Customer collected the order
    Completed,
    /// Cancelled by the customer or expired by the backend
    Cancelled,
    /// Any status this client does not know about
    #[serde(other)]
    Unknown,
}

/// One line of an order
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product id
    pub product_id: u64,
    /// Product name at order time
    pub name: String,
    /// Unit price at order time
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    /// Quantity
    pub qty: u32,
}

/// An order as returned by `GET /api/orders/:id` and `GET /api/orders`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Backend order id (e.g. `"AB12"`)
    pub order_id: String,
    /// Current status
    pub status: OrderStatus,
    /// End of the pickup window
    pub expires_at: DateTime<Utc>,
    /// Ordered items
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Order total
    pub total_amount: Decimal,
    /// Customer name
    pub customer_name: String,
    /// Customer phone (10 digits)
    pub phone_number: String,
    /// Customer room
    pub room_number: String,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderRecord {
    /// Whether the backend still holds this order for pickup at `now`
    #[must_use]
    pub fn is_held_at(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Reserved && self.expires_at > now
    }
}

/// Body of `POST /api/orders`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Items to reserve
    pub items: Vec<OrderItem>,
    /// Customer name
    pub customer_name: String,
    /// Customer phone
    pub phone_number: String,
    /// Customer room
    pub room_number: String,
    /// Free-form notes (the kiosk always sends an empty string)
    pub notes: String,
}

/// Success body of `POST /api/orders`
///
/// The backend echoes the whole order; only the id is read. The pickup
/// window is always computed locally from the checkout time.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    /// New order id
    pub order_id: String,
}

/// Body of `POST /api/orders/:id/cancel`
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CancelRequest<'a> {
    /// Why the order is being cancelled
    pub reason: &'a str,
}

/// Error body shared by the backend's failure responses
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable message
    #[serde(default)]
    pub error: Option<String>,
    /// Set when order creation hit an already active order
    #[serde(default)]
    pub existing_order_id: Option<String>,
}
