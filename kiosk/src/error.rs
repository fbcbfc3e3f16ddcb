//! Kiosk error taxonomy
//!
//! Every variant renders as the short message shown to the customer.

use thiserror::Error;

/// Customer form field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    /// Customer name
    Name,
    /// Phone number
    Phone,
    /// Room number
    Room,
}

/// Errors surfaced by kiosk operations
///
/// `Clone + PartialEq` so the last error can live in state and be asserted
/// on in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KioskError {
    /// Customer input rejected before any network call
    #[error("{message}")]
    Validation {
        /// Offending field
        field: CustomerField,
        /// What is wrong with it
        message: String,
    },

    /// Checkout attempted with an empty cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Product unknown or with no stock
    #[error("Product out of stock")]
    OutOfStock {
        /// Product the customer tried to add
        product_id: u64,
    },

    /// Cart quantity would exceed stock
    #[error("Maximum {available} available")]
    StockExceeded {
        /// Product whose stock bound was hit
        product_id: u64,
        /// Units in stock
        available: u32,
    },

    /// A reservation request is already in flight
    #[error("Your order is already being placed")]
    CheckoutInProgress,

    /// A reservation is already held (or still being verified)
    #[error("Order {order_id} is still active")]
    ReservationAlreadyActive {
        /// The held order
        order_id: String,
    },

    /// The backend already holds an active order for this customer
    #[error("You already have an active order!")]
    DuplicateActiveOrder {
        /// The backend's existing order
        order_id: String,
    },

    /// Order creation failed; nothing changed locally
    #[error("{message}")]
    OrderCreationFailed {
        /// Server message, or a generic description
        message: String,
    },

    /// Cancellation requested without an active reservation
    #[error("No active reservation")]
    NoActiveReservation,

    /// Cancellation requested without the customer confirming it
    #[error("Cancellation not confirmed")]
    CancellationNotConfirmed,

    /// Cancellation failed; the reservation is still held
    #[error("Cancellation failed: {message}")]
    CancellationFailed {
        /// Server message, or a generic description
        message: String,
    },

    /// The pickup window passed
    #[error("Reservation expired")]
    ReservationExpired {
        /// Expired order
        order_id: String,
    },

    /// The catalog could not be refreshed; showing the last snapshot
    #[error("Failed to load products")]
    CatalogUnavailable,
}

impl KioskError {
    /// Build a validation error
    #[must_use]
    pub fn validation(field: CustomerField, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
