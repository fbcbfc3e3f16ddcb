//! Kiosk state

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::KioskError;
use crate::history::RecentOrders;
use crate::persistence::LocalState;
use crate::reservation::ReservationPhase;
use crate::types::{CustomerProfile, Notice};

/// Everything the kiosk knows
///
/// Mutated only by the kiosk reducer; the view is projected from it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KioskState {
    /// Last known products
    pub catalog: Catalog,
    /// Customer's cart
    pub cart: Cart,
    /// Reservation lifecycle
    pub reservation: ReservationPhase,
    /// A cancellation request is in flight
    pub cancel_in_flight: bool,
    /// Saved customer details
    pub profile: Option<CustomerProfile>,
    /// Favorite product ids, in the order they were added
    pub favorites: Vec<u64>,
    /// Dark mode preference
    pub dark_mode: bool,
    /// Recent-orders panel
    pub recent_orders: RecentOrders,
    /// Messages waiting to be shown
    pub notices: Vec<Notice>,
    /// Most recent error
    pub last_error: Option<KioskError>,
    pub(crate) next_request_id: u64,
}

impl KioskState {
    /// Rebuild state from local storage
    ///
    /// A persisted reservation comes back as `Restoring` until
    /// reconciliation decides its fate.
    #[must_use]
    pub fn restore(local: &LocalState) -> Self {
        let reservation = local
            .load_reservation()
            .map_or(ReservationPhase::None, ReservationPhase::Restoring);

        let state = Self {
            catalog: Catalog::restored(local.load_products().unwrap_or_default()),
            cart: Cart::from_lines(local.load_cart().unwrap_or_default()),
            reservation,
            profile: local.load_profile(),
            favorites: local.load_favorites().unwrap_or_default(),
            dark_mode: local.load_dark_mode().unwrap_or(false),
            ..Self::default()
        };

        tracing::info!(
            products = state.catalog.len(),
            cart_lines = state.cart.lines().len(),
            restoring = state.reservation.order_id().unwrap_or("-"),
            "Restored local state"
        );
        state
    }

    /// Whether checkout may be attempted now
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        !self.cart.is_empty() && self.reservation == ReservationPhase::None
    }

    /// Whether `product_id` is a favorite
    #[must_use]
    pub fn is_favorite(&self, product_id: u64) -> bool {
        self.favorites.contains(&product_id)
    }

    /// Queue a notice
    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Record and announce an error
    pub fn fail(&mut self, error: KioskError) {
        self.notices.push(Notice::error(error.to_string()));
        self.last_error = Some(error);
    }

    pub(crate) fn next_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::persistence::keys;
    use pickup_testing::InMemoryRepository;
    use std::sync::Arc;

    #[test]
    fn restore_from_empty_storage() {
        let local = LocalState::new(Arc::new(InMemoryRepository::new()));
        let state = KioskState::restore(&local);
        assert_eq!(state.reservation, ReservationPhase::None);
        assert!(state.cart.is_empty());
        assert!(!state.dark_mode);
    }

    #[test]
    fn restore_tolerates_corrupt_blobs() {
        let repo = InMemoryRepository::new();
        for key in [keys::PRODUCTS, keys::CART, keys::RESERVATION, keys::PROFILE, keys::FAVORITES, keys::THEME] {
            repo.insert_raw(key, "\u{0}garbage");
        }
        let state = KioskState::restore(&LocalState::new(Arc::new(repo)));
        assert_eq!(state, KioskState {
            catalog: Catalog::restored(Vec::new()),
            ..KioskState::default()
        });
    }

    #[test]
    fn restored_reservation_awaits_reconciliation() {
        let repo = InMemoryRepository::new();
        repo.insert_raw(
            keys::RESERVATION,
            r#"{"id":"A100","items":[],"total":"40","until":1735690500000,"customer":{"name":"Ann","phone":"9876543210","room":"1"}}"#,
        );
        let state = KioskState::restore(&LocalState::new(Arc::new(repo)));
        assert!(matches!(state.reservation, ReservationPhase::Restoring(ref r) if r.id == "A100"));
        assert!(!state.reservation.is_active());
    }
}
