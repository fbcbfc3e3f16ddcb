//! Kiosk actions
//!
//! Customer intents, backend results and timer ticks all arrive here.
//! Result actions carry the id of the request they answer so late
//! responses can be recognised and dropped.

use crate::types::{CustomerInput, Product};
use pickup_backend::{BackendError, OrderRecord};

/// Everything the kiosk reducer reacts to
#[derive(Clone, Debug, PartialEq)]
pub enum KioskAction {
    // Catalog
    /// Fetch the product list
    RefreshCatalog,
    /// Product list arrived
    CatalogLoaded {
        /// All products, active or not
        products: Vec<Product>,
    },
    /// Product list could not be fetched
    CatalogLoadFailed {
        /// Cause
        error: BackendError,
    },

    // Cart
    /// Add one unit
    AddToCart {
        /// Product to add
        product_id: u64,
    },
    /// Change a line's quantity
    ChangeQuantity {
        /// Product whose line changes
        product_id: u64,
        /// Signed change
        delta: i32,
    },
    /// Empty the cart
    ClearCart,

    // Reservation
    /// Check out the cart
    CreateReservation {
        /// Form input
        customer: CustomerInput,
    },
    /// Backend accepted the order
    OrderCreated {
        /// Attempt being answered
        request_id: u64,
        /// New order id
        order_id: String,
    },
    /// Backend says the customer already holds an order
    OrderConflict {
        /// Attempt being answered
        request_id: u64,
        /// The order already held
        existing_order_id: String,
        /// Backend message
        message: String,
    },
    /// The already held order was fetched
    ExistingOrderLoaded {
        /// Attempt being answered
        request_id: u64,
        /// The backend's order
        order: OrderRecord,
    },
    /// The already held order could not be fetched
    ExistingOrderUnavailable {
        /// Attempt being answered
        request_id: u64,
        /// The order that was looked up
        order_id: String,
        /// Cause
        error: BackendError,
    },
    /// Order creation failed
    OrderCreationFailed {
        /// Attempt being answered
        request_id: u64,
        /// Cause
        error: BackendError,
    },
    /// Cancel the active reservation
    CancelReservation {
        /// Customer confirmed the destructive action
        confirmed: bool,
    },
    /// Backend cancelled the order
    ReservationCancelled {
        /// Cancelled order
        order_id: String,
    },
    /// Backend refused or failed to cancel
    CancellationFailed {
        /// Order that is still held
        order_id: String,
        /// Cause
        error: BackendError,
    },
    /// Countdown tick
    Tick,

    // Reconciliation
    /// Verify a restored reservation against the backend
    Reconcile,
    /// Backend returned the restored order
    OrderVerified {
        /// Order that was looked up
        order_id: String,
        /// Backend's view of it
        order: OrderRecord,
    },
    /// Backend lookup for the restored order failed
    VerificationFailed {
        /// Order that was looked up
        order_id: String,
        /// Cause
        error: BackendError,
    },

    // Recent orders
    /// Load the recent-orders panel
    LoadRecentOrders,
    /// Backend order history arrived
    RecentOrdersLoaded {
        /// Phone the history is filtered by
        phone: String,
        /// All orders returned
        orders: Vec<OrderRecord>,
    },
    /// Backend order history could not be fetched
    RecentOrdersUnavailable {
        /// Cause
        error: BackendError,
    },

    // Preferences
    /// Add or remove a favorite
    ToggleFavorite {
        /// Product to toggle
        product_id: u64,
    },
    /// Flip dark mode
    ToggleTheme,
    /// Drop queued notices once shown
    ClearNotices,
}
