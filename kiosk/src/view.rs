//! Read-only projection of kiosk state for display

use crate::countdown::{Countdown, CountdownStep};
use crate::history::RecentOrders;
use crate::reservation::ReservationPhase;
use crate::state::KioskState;
use crate::types::{CartLine, Notice, Reservation};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// A catalog row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductRow {
    /// Product id
    pub id: u64,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Decimal,
    /// Units in stock
    pub stock: u32,
    /// Units already in the cart
    pub in_cart: u32,
    /// Marked as favorite
    pub favorite: bool,
}

/// The reservation panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationView {
    /// Backend order id
    pub order_id: String,
    /// Reserved lines
    pub items: Vec<CartLine>,
    /// Order total
    pub total: Decimal,
    /// Customer name
    pub customer_name: String,
    /// Room for pickup
    pub room: String,
    /// `mm:ss` until expiry
    pub countdown: String,
    /// Milliseconds until expiry, zero once passed
    pub remaining_ms: i64,
}

impl ReservationView {
    fn project(reservation: &Reservation, now: DateTime<Utc>) -> Self {
        let (countdown, remaining_ms) = match Countdown::new(reservation.until).advance(now) {
            CountdownStep::Running { remaining_ms, display } => (display, remaining_ms),
            CountdownStep::Expired => ("00:00".to_string(), 0),
        };
        Self {
            order_id: reservation.id.clone(),
            items: reservation.items.clone(),
            total: reservation.total,
            customer_name: reservation.customer.name.clone(),
            room: reservation.customer.room.clone(),
            countdown,
            remaining_ms,
        }
    }
}

/// Values to prefill the checkout form with
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutPrefill {
    /// Saved name
    pub name: String,
    /// Saved phone
    pub phone: String,
    /// Saved room
    pub room: String,
}

/// Everything a front end needs to draw the kiosk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KioskView {
    /// Catalog rows
    pub products: Vec<ProductRow>,
    /// Catalog is a cached snapshot
    pub catalog_stale: bool,
    /// Cart lines
    pub cart: Vec<CartLine>,
    /// Units in the cart
    pub cart_count: u32,
    /// Cart total
    pub cart_total: Decimal,
    /// Checkout button enabled
    pub checkout_enabled: bool,
    /// A reservation request is in flight
    pub creating: bool,
    /// A persisted reservation is being verified
    pub verifying: bool,
    /// Active reservation, if any
    pub reservation: Option<ReservationView>,
    /// Recent orders panel
    pub recent_orders: RecentOrders,
    /// Checkout form prefill
    pub prefill: CheckoutPrefill,
    /// Dark mode
    pub dark_mode: bool,
    /// Pending notices
    pub notices: Vec<Notice>,
}

impl KioskView {
    /// Project `state` as of `now`
    #[must_use]
    pub fn project(state: &KioskState, now: DateTime<Utc>) -> Self {
        let products = state
            .catalog
            .products()
            .iter()
            .map(|product| ProductRow {
                id: product.id,
                name: product.name.clone(),
                price: product.price,
                stock: product.stock,
                in_cart: state.cart.line(product.id).map_or(0, |line| line.qty),
                favorite: state.is_favorite(product.id),
            })
            .collect();

        let prefill = state
            .profile
            .as_ref()
            .map(|profile| CheckoutPrefill {
                name: profile.name.clone(),
                phone: profile.phone.clone(),
                room: profile.room.clone(),
            })
            .unwrap_or_default();

        Self {
            products,
            catalog_stale: state.catalog.is_stale(),
            cart: state.cart.lines().to_vec(),
            cart_count: state.cart.count(),
            cart_total: state.cart.total(),
            checkout_enabled: state.can_checkout(),
            creating: state.reservation.is_creating(),
            verifying: matches!(state.reservation, ReservationPhase::Restoring(_)),
            reservation: state
                .reservation
                .active()
                .map(|reservation| ReservationView::project(reservation, now)),
            recent_orders: state.recent_orders.clone(),
            prefill,
            dark_mode: state.dark_mode,
            notices: state.notices.clone(),
        }
    }
}
