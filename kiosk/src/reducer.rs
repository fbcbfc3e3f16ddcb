//! Kiosk reducer
//!
//! Validates commands against current state, applies the resulting state
//! change, persists it through the environment's local store, and returns
//! backend calls and timer changes as effects. It never awaits.

use crate::action::KioskAction;
use crate::catalog::Catalog;
use crate::countdown::{Countdown, CountdownStep, COUNTDOWN_TIMER};
use crate::environment::KioskEnvironment;
use crate::error::KioskError;
use crate::history::{self, RecentOrders};
use crate::reservation::{PendingReservation, ReservationPhase};
use crate::state::KioskState;
use crate::sync::{self, DiscardReason, Verdict};
use crate::types::{CustomerInput, CustomerProfile, Notice, Reservation, SaleRecord};
use crate::validation::validate_customer;
use pickup_backend::{BackendError, CreateOrderRequest, OrderItem, OrderRecord, Product};
use pickup_core::effect::Effect;
use pickup_core::reducer::Reducer;
use pickup_core::{smallvec, SmallVec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<KioskAction>; 4]>;

/// Reducer implementing the kiosk's business logic
#[derive(Clone, Copy, Debug, Default)]
pub struct KioskReducer;

impl KioskReducer {
    /// Creates a new kiosk reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn reject(state: &mut KioskState, error: KioskError) -> Effects {
        tracing::warn!(%error, "Command rejected");
        metrics::counter!("kiosk.commands.rejected").increment(1);
        state.fail(error);
        smallvec![Effect::None]
    }

    fn ignore_stale(request_id: u64) -> Effects {
        tracing::debug!(request_id, "Ignoring response for a superseded request");
        smallvec![Effect::None]
    }

    fn start_countdown(env: &KioskEnvironment) -> Effect<KioskAction> {
        Effect::Interval {
            id: COUNTDOWN_TIMER,
            period: env.settings.tick,
            action: Box::new(KioskAction::Tick),
        }
    }

    const fn stop_countdown() -> Effect<KioskAction> {
        Effect::CancelInterval(COUNTDOWN_TIMER)
    }

    fn fetch_catalog(env: &KioskEnvironment) -> Effect<KioskAction> {
        let backend = Arc::clone(&env.backend);
        Effect::future(async move {
            Some(match backend.list_products().await {
                Ok(products) => KioskAction::CatalogLoaded { products },
                Err(error) => KioskAction::CatalogLoadFailed { error },
            })
        })
    }

    // ========== Catalog ==========

    fn catalog_loaded(state: &mut KioskState, products: Vec<Product>, env: &KioskEnvironment) -> Effects {
        state.catalog = Catalog::fresh(products);
        env.local.save_products(state.catalog.products());
        tracing::debug!(products = state.catalog.len(), "Catalog refreshed");
        smallvec![Effect::None]
    }

    fn catalog_load_failed(state: &mut KioskState, error: &BackendError, env: &KioskEnvironment) -> Effects {
        tracing::warn!(%error, "Catalog refresh failed, keeping last snapshot");
        if state.catalog.is_empty() {
            if let Some(snapshot) = env.local.load_products() {
                state.catalog = Catalog::restored(snapshot);
            }
        }
        state.catalog.mark_stale();
        state.fail(KioskError::CatalogUnavailable);
        smallvec![Effect::None]
    }

    // ========== Cart ==========

    fn add_to_cart(state: &mut KioskState, product_id: u64, env: &KioskEnvironment) -> Effects {
        match state.cart.add(&state.catalog, product_id) {
            Ok(qty) => {
                tracing::debug!(product_id, qty, "Added to cart");
                env.local.save_cart(state.cart.lines());
                smallvec![Effect::None]
            },
            Err(error) => Self::reject(state, error),
        }
    }

    fn change_quantity(
        state: &mut KioskState,
        product_id: u64,
        delta: i32,
        env: &KioskEnvironment,
    ) -> Effects {
        match state.cart.change_qty(&state.catalog, product_id, delta) {
            Ok(true) => {
                env.local.save_cart(state.cart.lines());
                smallvec![Effect::None]
            },
            Ok(false) => smallvec![Effect::None],
            Err(error) => Self::reject(state, error),
        }
    }

    // ========== Reservation ==========

    fn create_reservation(
        state: &mut KioskState,
        input: &CustomerInput,
        env: &KioskEnvironment,
    ) -> Effects {
        let blocked = match &state.reservation {
            ReservationPhase::None => None,
            ReservationPhase::Creating(_) => Some(KioskError::CheckoutInProgress),
            ReservationPhase::Active(held) | ReservationPhase::Restoring(held) => {
                Some(KioskError::ReservationAlreadyActive {
                    order_id: held.id.clone(),
                })
            },
        };
        if let Some(error) = blocked {
            return Self::reject(state, error);
        }
        if state.cart.is_empty() {
            return Self::reject(state, KioskError::EmptyCart);
        }
        let customer = match validate_customer(input) {
            Ok(customer) => customer,
            Err(error) => return Self::reject(state, error),
        };

        // Saved whatever the backend answers
        let profile = CustomerProfile::from(&customer);
        env.local.save_profile(&profile);
        state.profile = Some(profile);

        let pending = PendingReservation {
            request_id: state.next_request_id(),
            started_at: env.clock.now(),
            items: state.cart.lines().to_vec(),
            total: state.cart.total(),
            customer,
        };
        let request = CreateOrderRequest {
            items: pending.items.iter().map(OrderItem::from).collect(),
            customer_name: pending.customer.name.clone(),
            phone_number: pending.customer.phone.clone(),
            room_number: pending.customer.room.clone(),
            notes: String::new(),
        };
        let request_id = pending.request_id;

        tracing::info!(
            request_id,
            items = pending.items.len(),
            total = %pending.total,
            "Creating reservation"
        );
        metrics::counter!("kiosk.reservations.requested").increment(1);
        state.reservation = ReservationPhase::Creating(pending);

        let backend = Arc::clone(&env.backend);
        smallvec![Effect::future(async move {
            Some(match backend.create_order(request).await {
                Ok(created) => KioskAction::OrderCreated {
                    request_id,
                    order_id: created.order_id,
                },
                Err(BackendError::Conflict {
                    existing_order_id,
                    message,
                }) => KioskAction::OrderConflict {
                    request_id,
                    existing_order_id,
                    message,
                },
                Err(error) => KioskAction::OrderCreationFailed { request_id, error },
            })
        })]
    }

    fn order_created(
        state: &mut KioskState,
        request_id: u64,
        order_id: String,
        env: &KioskEnvironment,
    ) -> Effects {
        let Some(pending) = state.reservation.take_pending(request_id) else {
            return Self::ignore_stale(request_id);
        };

        let reservation = pending.confirm(order_id, env.settings.hold);
        env.local.save_reservation(&reservation);
        env.local.append_sale(SaleRecord {
            total: reservation.total,
            items: reservation.items.clone(),
            time: env.clock.now(),
        });
        state.cart.clear();
        env.local.save_cart(state.cart.lines());

        tracing::info!(order_id = %reservation.id, until = %reservation.until, "Reservation active");
        metrics::counter!("kiosk.reservations.created").increment(1);
        state.notify(Notice::success(format!("Order {} confirmed!", reservation.id)));
        state.last_error = None;
        state.reservation = ReservationPhase::Active(reservation);

        let mut effects: Effects = smallvec![Self::start_countdown(env), Self::fetch_catalog(env)];
        effects.extend(Self::load_recent_orders(state, env));
        effects
    }

    fn order_conflict(
        state: &KioskState,
        request_id: u64,
        existing_order_id: String,
        message: &str,
        env: &KioskEnvironment,
    ) -> Effects {
        if state.reservation.pending(request_id).is_none() {
            return Self::ignore_stale(request_id);
        }
        tracing::info!(%existing_order_id, message, "Backend reports an active order");

        let backend = Arc::clone(&env.backend);
        smallvec![Effect::future(async move {
            Some(match backend.get_order(&existing_order_id).await {
                Ok(order) => KioskAction::ExistingOrderLoaded { request_id, order },
                Err(error) => KioskAction::ExistingOrderUnavailable {
                    request_id,
                    order_id: existing_order_id,
                    error,
                },
            })
        })]
    }

    fn existing_order_loaded(
        state: &mut KioskState,
        request_id: u64,
        order: OrderRecord,
        env: &KioskEnvironment,
    ) -> Effects {
        if state.reservation.take_pending(request_id).is_none() {
            return Self::ignore_stale(request_id);
        }

        // The backend's order replaces the attempted one; the cart stays as is
        let reservation = Reservation::from_order(order);
        env.local.save_reservation(&reservation);

        tracing::info!(order_id = %reservation.id, "Adopted existing order");
        metrics::counter!("kiosk.reservations.superseded").increment(1);
        state.fail(KioskError::DuplicateActiveOrder {
            order_id: reservation.id.clone(),
        });
        state.reservation = ReservationPhase::Active(reservation);

        smallvec![Self::start_countdown(env)]
    }

    fn existing_order_unavailable(
        state: &mut KioskState,
        request_id: u64,
        order_id: String,
        error: &BackendError,
    ) -> Effects {
        if state.reservation.take_pending(request_id).is_none() {
            return Self::ignore_stale(request_id);
        }
        tracing::warn!(%order_id, %error, "Existing order could not be fetched");
        state.fail(KioskError::DuplicateActiveOrder { order_id });
        smallvec![Effect::None]
    }

    fn order_creation_failed(state: &mut KioskState, request_id: u64, error: &BackendError) -> Effects {
        if state.reservation.take_pending(request_id).is_none() {
            return Self::ignore_stale(request_id);
        }

        let message = match error.server_message() {
            Some(message) => message.to_string(),
            None if matches!(error, BackendError::Api { .. }) => "Order failed".to_string(),
            None => format!("Failed to create order: {error}"),
        };
        tracing::warn!(request_id, %error, "Reservation request failed");
        metrics::counter!("kiosk.reservations.failed").increment(1);
        state.fail(KioskError::OrderCreationFailed { message });
        smallvec![Effect::None]
    }

    fn cancel_reservation(state: &mut KioskState, confirmed: bool, env: &KioskEnvironment) -> Effects {
        let Some(order_id) = state.reservation.active().map(|r| r.id.clone()) else {
            return Self::reject(state, KioskError::NoActiveReservation);
        };
        if !confirmed {
            tracing::debug!(%order_id, "Cancellation not confirmed");
            state.last_error = Some(KioskError::CancellationNotConfirmed);
            return smallvec![Effect::None];
        }
        if state.cancel_in_flight {
            tracing::debug!(%order_id, "Cancellation already in flight");
            return smallvec![Effect::None];
        }

        state.cancel_in_flight = true;
        tracing::info!(%order_id, "Cancelling reservation");

        let backend = Arc::clone(&env.backend);
        let reason = env.settings.cancel_reason.clone();
        smallvec![Effect::future(async move {
            Some(match backend.cancel_order(&order_id, &reason).await {
                Ok(()) => KioskAction::ReservationCancelled { order_id },
                Err(error) => KioskAction::CancellationFailed { order_id, error },
            })
        })]
    }

    fn reservation_cancelled(state: &mut KioskState, order_id: &str, env: &KioskEnvironment) -> Effects {
        state.cancel_in_flight = false;

        if !state.reservation.active().is_some_and(|r| r.id == order_id) {
            tracing::debug!(order_id, "Cancelled order is no longer the active one");
            return smallvec![Self::fetch_catalog(env)];
        }

        state.reservation = ReservationPhase::None;
        env.local.clear_reservation();
        tracing::info!(order_id, "Reservation cancelled");
        metrics::counter!("kiosk.reservations.cancelled").increment(1);
        state.notify(Notice::info(format!("Order {order_id} cancelled successfully")));

        smallvec![Self::stop_countdown(), Self::fetch_catalog(env)]
    }

    fn cancellation_failed(state: &mut KioskState, order_id: &str, error: &BackendError) -> Effects {
        state.cancel_in_flight = false;

        let message = match error.server_message() {
            Some(message) => message.to_string(),
            None if matches!(error, BackendError::Api { .. }) => "Failed to cancel order".to_string(),
            None => error.to_string(),
        };
        tracing::warn!(order_id, %error, "Cancellation failed, reservation kept");
        state.fail(KioskError::CancellationFailed { message });
        smallvec![Effect::None]
    }

    fn tick(state: &mut KioskState, env: &KioskEnvironment) -> Effects {
        let Some((order_id, until)) = state.reservation.active().map(|r| (r.id.clone(), r.until)) else {
            tracing::debug!("Stopping countdown with no active reservation");
            return smallvec![Self::stop_countdown()];
        };

        match Countdown::new(until).advance(env.clock.now()) {
            CountdownStep::Running { remaining_ms, .. } => {
                tracing::trace!(%order_id, remaining_ms, "Countdown");
                smallvec![Effect::None]
            },
            CountdownStep::Expired => {
                state.reservation = ReservationPhase::None;
                env.local.clear_reservation();
                tracing::info!(%order_id, "Reservation expired");
                metrics::counter!("kiosk.reservations.expired").increment(1);
                state.fail(KioskError::ReservationExpired { order_id });
                smallvec![Self::stop_countdown()]
            },
        }
    }

    // ========== Reconciliation ==========

    fn reconcile(state: &mut KioskState, env: &KioskEnvironment) -> Effects {
        let ReservationPhase::Restoring(restored) = &state.reservation else {
            tracing::debug!("Nothing to reconcile");
            return smallvec![Effect::None];
        };
        let order_id = restored.id.clone();

        if let Some(reason) = sync::check_local(restored, env.clock.now()) {
            Self::discard_restored(state, &order_id, &reason, env);
            return smallvec![Effect::None];
        }

        let backend = Arc::clone(&env.backend);
        smallvec![Effect::future(async move {
            Some(match backend.get_order(&order_id).await {
                Ok(order) => KioskAction::OrderVerified { order_id, order },
                Err(error) => KioskAction::VerificationFailed { order_id, error },
            })
        })]
    }

    fn verified(
        state: &mut KioskState,
        order_id: &str,
        lookup: Result<&OrderRecord, &BackendError>,
        env: &KioskEnvironment,
    ) -> Effects {
        let restored = match &state.reservation {
            ReservationPhase::Restoring(restored) if restored.id == order_id => restored.clone(),
            _ => {
                tracing::debug!(order_id, "Verification no longer relevant");
                return smallvec![Effect::None];
            },
        };

        match sync::verify(lookup, env.clock.now()) {
            Verdict::Adopt => {
                tracing::info!(order_id, until = %restored.until, "Restored reservation confirmed");
                metrics::counter!("kiosk.reconciliation.adopted").increment(1);
                state.reservation = ReservationPhase::Active(restored);
                smallvec![Self::start_countdown(env)]
            },
            Verdict::Discard(reason) => {
                Self::discard_restored(state, order_id, &reason, env);
                smallvec![Effect::None]
            },
        }
    }

    fn discard_restored(
        state: &mut KioskState,
        order_id: &str,
        reason: &DiscardReason,
        env: &KioskEnvironment,
    ) {
        state.reservation = ReservationPhase::None;
        env.local.clear_reservation();
        tracing::info!(order_id, %reason, "Discarded restored reservation");
        metrics::counter!("kiosk.reconciliation.discarded").increment(1);
    }

    // ========== Recent orders ==========

    fn load_recent_orders(state: &mut KioskState, env: &KioskEnvironment) -> Effects {
        let limit = env.settings.recent_orders_limit;
        let phone = state
            .profile
            .as_ref()
            .map(|p| p.phone.clone())
            .filter(|phone| !phone.is_empty());

        let Some(phone) = phone else {
            state.recent_orders = RecentOrders::Local(history::latest_sales(env.local.load_sales(), limit));
            return smallvec![Effect::None];
        };

        let backend = Arc::clone(&env.backend);
        smallvec![Effect::future(async move {
            Some(match backend.list_orders().await {
                Ok(orders) => KioskAction::RecentOrdersLoaded { phone, orders },
                Err(error) => KioskAction::RecentOrdersUnavailable { error },
            })
        })]
    }

    // ========== Preferences ==========

    fn toggle_favorite(state: &mut KioskState, product_id: u64, env: &KioskEnvironment) -> Effects {
        if let Some(index) = state.favorites.iter().position(|id| *id == product_id) {
            state.favorites.remove(index);
            state.notify(Notice::info("Removed from favorites"));
        } else {
            state.favorites.push(product_id);
            state.notify(Notice::success("Added to favorites"));
        }
        env.local.save_favorites(&state.favorites);
        smallvec![Effect::None]
    }
}

impl Reducer for KioskReducer {
    type State = KioskState;
    type Action = KioskAction;
    type Environment = KioskEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Catalog ==========
            KioskAction::RefreshCatalog => smallvec![Self::fetch_catalog(env)],
            KioskAction::CatalogLoaded { products } => Self::catalog_loaded(state, products, env),
            KioskAction::CatalogLoadFailed { error } => Self::catalog_load_failed(state, &error, env),

            // ========== Cart ==========
            KioskAction::AddToCart { product_id } => Self::add_to_cart(state, product_id, env),
            KioskAction::ChangeQuantity { product_id, delta } => {
                Self::change_quantity(state, product_id, delta, env)
            },
            KioskAction::ClearCart => {
                state.cart.clear();
                env.local.save_cart(state.cart.lines());
                smallvec![Effect::None]
            },

            // ========== Reservation ==========
            KioskAction::CreateReservation { customer } => {
                Self::create_reservation(state, &customer, env)
            },
            KioskAction::OrderCreated { request_id, order_id } => {
                Self::order_created(state, request_id, order_id, env)
            },
            KioskAction::OrderConflict {
                request_id,
                existing_order_id,
                message,
            } => Self::order_conflict(state, request_id, existing_order_id, &message, env),
            KioskAction::ExistingOrderLoaded { request_id, order } => {
                Self::existing_order_loaded(state, request_id, order, env)
            },
            KioskAction::ExistingOrderUnavailable {
                request_id,
                order_id,
                error,
            } => Self::existing_order_unavailable(state, request_id, order_id, &error),
            KioskAction::OrderCreationFailed { request_id, error } => {
                Self::order_creation_failed(state, request_id, &error)
            },
            KioskAction::CancelReservation { confirmed } => {
                Self::cancel_reservation(state, confirmed, env)
            },
            KioskAction::ReservationCancelled { order_id } => {
                Self::reservation_cancelled(state, &order_id, env)
            },
            KioskAction::CancellationFailed { order_id, error } => {
                Self::cancellation_failed(state, &order_id, &error)
            },
            KioskAction::Tick => Self::tick(state, env),

            // ========== Reconciliation ==========
            KioskAction::Reconcile => Self::reconcile(state, env),
            KioskAction::OrderVerified { order_id, order } => {
                Self::verified(state, &order_id, Ok(&order), env)
            },
            KioskAction::VerificationFailed { order_id, error } => {
                Self::verified(state, &order_id, Err(&error), env)
            },

            // ========== Recent orders ==========
            KioskAction::LoadRecentOrders => Self::load_recent_orders(state, env),
            KioskAction::RecentOrdersLoaded { phone, orders } => {
                let limit = env.settings.recent_orders_limit;
                state.recent_orders = RecentOrders::Remote(history::orders_for_phone(orders, &phone, limit));
                smallvec![Effect::None]
            },
            KioskAction::RecentOrdersUnavailable { error } => {
                tracing::warn!(%error, "Order history unavailable, showing local sales");
                let limit = env.settings.recent_orders_limit;
                state.recent_orders = RecentOrders::Local(history::latest_sales(env.local.load_sales(), limit));
                smallvec![Effect::None]
            },

            // ========== Preferences ==========
            KioskAction::ToggleFavorite { product_id } => Self::toggle_favorite(state, product_id, env),
            KioskAction::ToggleTheme => {
                state.dark_mode = !state.dark_mode;
                env.local.save_dark_mode(state.dark_mode);
                smallvec![Effect::None]
            },
            KioskAction::ClearNotices => {
                state.notices.clear();
                smallvec![Effect::None]
            },
        }
    }
}
