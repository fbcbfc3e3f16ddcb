//! Reservation countdown
//!
//! The runtime owns a single repeating timer, [`COUNTDOWN_TIMER`], that
//! dispatches `Tick` while a reservation is active. Each tick calls
//! [`Countdown::advance`] with the current time; the arithmetic here never
//! touches a real clock.

use chrono::{DateTime, Utc};
use pickup_core::TimerId;

/// Timer id for the reservation countdown
pub const COUNTDOWN_TIMER: TimerId = TimerId::new("reservation-countdown");

/// Countdown toward a reservation deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    until: DateTime<Utc>,
}

/// Outcome of one countdown step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountdownStep {
    /// Deadline not reached
    Running {
        /// Milliseconds left
        remaining_ms: i64,
        /// `mm:ss` rendering of `remaining_ms`
        display: String,
    },
    /// Deadline reached or passed
    Expired,
}

impl Countdown {
    /// Countdown to `until`
    #[must_use]
    pub const fn new(until: DateTime<Utc>) -> Self {
        Self { until }
    }

    /// Evaluate the countdown at `now`
    #[must_use]
    pub fn advance(&self, now: DateTime<Utc>) -> CountdownStep {
        let remaining_ms = (self.until - now).num_milliseconds();
        if remaining_ms <= 0 {
            CountdownStep::Expired
        } else {
            CountdownStep::Running {
                remaining_ms,
                display: format_remaining(remaining_ms),
            }
        }
    }
}

/// Zero-padded `mm:ss`, seconds truncated
///
/// Minutes are not wrapped at 60. Negative input renders as `00:00`.
#[must_use]
pub fn format_remaining(remaining_ms: i64) -> String {
    let remaining_ms = remaining_ms.max(0);
    let minutes = remaining_ms / 60_000;
    let seconds = (remaining_ms % 60_000) / 1_000;
    format!("{minutes:02}:{seconds:02}")
}
