//! Startup reconciliation
//!
//! A reservation loaded from local storage is only trusted once the backend
//! confirms it. Every doubtful outcome resolves toward "no reservation".

use crate::types::Reservation;
use chrono::{DateTime, Utc};
use pickup_backend::{BackendError, OrderRecord, OrderStatus};
use std::fmt;

/// Result of checking a restored reservation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Backend still holds the order; keep the local record
    Adopt,
    /// Drop the local record
    Discard(DiscardReason),
}

/// Why a restored reservation was dropped
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// Local deadline already passed; the backend was not asked
    ExpiredLocally,
    /// Backend lookup failed or the order does not exist
    Unknown(BackendError),
    /// Backend no longer holds the order
    NotReserved(OrderStatus),
    /// Backend deadline already passed
    ExpiredRemotely,
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpiredLocally => write!(f, "expired locally"),
            Self::Unknown(error) => write!(f, "unknown to backend ({error})"),
            Self::NotReserved(status) => write!(f, "backend status is {status:?}"),
            Self::ExpiredRemotely => write!(f, "expired on backend"),
        }
    }
}

/// Check that needs no network call
#[must_use]
pub fn check_local(reservation: &Reservation, now: DateTime<Utc>) -> Option<DiscardReason> {
    reservation
        .is_expired_at(now)
        .then_some(DiscardReason::ExpiredLocally)
}

/// Judge the backend's answer for a restored reservation
#[must_use]
pub fn verify(lookup: Result<&OrderRecord, &BackendError>, now: DateTime<Utc>) -> Verdict {
    match lookup {
        Err(error) => Verdict::Discard(DiscardReason::Unknown(error.clone())),
        Ok(order) if order.is_held_at(now) => Verdict::Adopt,
        Ok(order) if order.status != OrderStatus::Reserved => {
            Verdict::Discard(DiscardReason::NotReserved(order.status))
        },
        Ok(_) => Verdict::Discard(DiscardReason::ExpiredRemotely),
    }
}
