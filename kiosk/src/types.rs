//! Kiosk domain types
//!
//! These are the shapes held in state and persisted locally. Backend wire
//! types live in `pickup-backend`; conversions sit next to the types here.

use chrono::{DateTime, Utc};
use pickup_backend::{OrderItem, OrderRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use pickup_backend::Product;

/// One cart line, keyed by product id
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product id
    pub product_id: u64,
    /// Product name when added
    pub name: String,
    /// Unit price when added
    pub price: Decimal,
    /// Quantity, always at least 1
    pub qty: u32,
}

impl CartLine {
    /// `price × qty`
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            price: line.price,
            qty: line.qty,
        }
    }
}

impl From<OrderItem> for CartLine {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            qty: item.qty,
        }
    }
}

/// Raw customer form input, validated into a [`Customer`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerInput {
    /// Name as typed
    pub name: String,
    /// Phone as typed
    pub phone: String,
    /// Room as typed
    pub room: String,
}

impl CustomerInput {
    /// Convenience constructor
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            room: room.into(),
        }
    }
}

/// Validated customer identity attached to a reservation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Letters and spaces only
    pub name: String,
    /// Exactly ten digits
    pub phone: String,
    /// Non-empty room number
    pub room: String,
}

/// Saved customer details used to prefill the next checkout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerProfile {
    /// Customer name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Room number
    pub room: String,
    /// Advisory only
    #[serde(default)]
    pub verified: bool,
}

impl From<&Customer> for CustomerProfile {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            room: customer.room.clone(),
            verified: false,
        }
    }
}

/// A held order awaiting pickup
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    /// Backend order id
    pub id: String,
    /// Snapshot of the reserved lines
    pub items: Vec<CartLine>,
    /// Order total
    pub total: Decimal,
    /// End of the pickup window (epoch milliseconds on disk)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub until: DateTime<Utc>,
    /// Who the order is for
    pub customer: Customer,
}

impl Reservation {
    /// Adopt a backend order as the local reservation
    #[must_use]
    pub fn from_order(order: OrderRecord) -> Self {
        Self {
            id: order.order_id,
            items: order.items.into_iter().map(CartLine::from).collect(),
            total: order.total_amount,
            until: order.expires_at,
            customer: Customer {
                name: order.customer_name,
                phone: order.phone_number,
                room: order.room_number,
            },
        }
    }

    /// Whether the pickup window has passed at `now`
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.until <= now
    }
}

/// A locally recorded sale, shown when order history is unavailable
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaleRecord {
    /// Order total
    pub total: Decimal,
    /// Reserved lines
    pub items: Vec<CartLine>,
    /// When the order was confirmed
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
}

/// Severity of a [`Notice`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Neutral information
    Info,
    /// Something the customer asked for worked
    Success,
    /// Something failed or was rejected
    Error,
}

/// A short message queued for the customer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text to show
    pub message: String,
}

impl Notice {
    /// Informational notice
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    /// Success notice
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    /// Error notice
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}
