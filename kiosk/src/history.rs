//! Recent orders
//!
//! With a saved phone number the kiosk shows the backend's orders for that
//! phone. Without one, or when the backend cannot be reached, it falls back
//! to the locally recorded sales.

use crate::types::SaleRecord;
use pickup_backend::OrderRecord;

/// What the recent-orders panel shows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RecentOrders {
    /// Not requested yet
    #[default]
    NotLoaded,
    /// Backend orders for the saved phone, in backend order
    Remote(Vec<OrderRecord>),
    /// Local sales, newest first
    Local(Vec<SaleRecord>),
}

impl RecentOrders {
    /// Whether there is nothing to show
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::NotLoaded => true,
            Self::Remote(orders) => orders.is_empty(),
            Self::Local(sales) => sales.is_empty(),
        }
    }
}

/// Orders placed with `phone`, first `limit` as returned by the backend
#[must_use]
pub fn orders_for_phone(orders: Vec<OrderRecord>, phone: &str, limit: usize) -> Vec<OrderRecord> {
    orders
        .into_iter()
        .filter(|order| order.phone_number == phone)
        .take(limit)
        .collect()
}

/// The last `limit` local sales, newest first
#[must_use]
pub fn latest_sales(sales: Vec<SaleRecord>, limit: usize) -> Vec<SaleRecord> {
    sales.into_iter().rev().take(limit).collect()
}
