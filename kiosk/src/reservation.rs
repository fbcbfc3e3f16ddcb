//! Reservation state machine
//!
//! ```text
//! None ──create──▶ Creating ──created──▶ Active ──cancelled / expired──▶ None
//!                     │   └──conflict──▶ Active (backend's existing order)
//!                     └──failed──▶ None
//! Restoring ──verified──▶ Active
//!     └──stale / unknown / expired──▶ None
//! ```
//!
//! At most one reservation exists at a time. `Creating` and `Restoring`
//! both block a new checkout.

use crate::types::{CartLine, Customer, Reservation};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Where the kiosk is in the reservation lifecycle
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReservationPhase {
    /// No reservation
    #[default]
    None,
    /// Loaded from local storage, awaiting reconciliation
    Restoring(Reservation),
    /// Creation request in flight
    Creating(PendingReservation),
    /// Held reservation with a running countdown
    Active(Reservation),
}

/// Snapshot taken when a creation request is sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingReservation {
    /// Correlates the backend response with this attempt
    pub request_id: u64,
    /// When checkout was requested; the hold counts from here
    pub started_at: DateTime<Utc>,
    /// Cart lines at checkout
    pub items: Vec<CartLine>,
    /// Cart total at checkout
    pub total: Decimal,
    /// Validated customer
    pub customer: Customer,
}

impl PendingReservation {
    /// The reservation this attempt becomes once the backend accepts it
    #[must_use]
    pub fn confirm(self, order_id: String, hold: chrono::Duration) -> Reservation {
        Reservation {
            id: order_id,
            items: self.items,
            total: self.total,
            until: self.started_at + hold,
            customer: self.customer,
        }
    }
}

impl ReservationPhase {
    /// The active reservation, if any
    #[must_use]
    pub const fn active(&self) -> Option<&Reservation> {
        match self {
            Self::Active(reservation) => Some(reservation),
            _ => None,
        }
    }

    /// Whether a reservation is held
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Whether a creation request is in flight
    ///
    /// Front ends disable checkout while this is set.
    #[must_use]
    pub const fn is_creating(&self) -> bool {
        matches!(self, Self::Creating(_))
    }

    /// The in-flight attempt, if it matches `request_id`
    #[must_use]
    pub fn pending(&self, request_id: u64) -> Option<&PendingReservation> {
        match self {
            Self::Creating(pending) if pending.request_id == request_id => Some(pending),
            _ => None,
        }
    }

    /// Take the in-flight attempt out if it matches `request_id`
    pub fn take_pending(&mut self, request_id: u64) -> Option<PendingReservation> {
        self.pending(request_id)?;
        match std::mem::take(self) {
            Self::Creating(pending) => Some(pending),
            _ => None,
        }
    }

    /// Id of the held or restoring order
    #[must_use]
    pub fn order_id(&self) -> Option<&str> {
        match self {
            Self::Active(reservation) | Self::Restoring(reservation) => Some(&reservation.id),
            _ => None,
        }
    }
}
