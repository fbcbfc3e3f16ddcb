//! Injected dependencies for the kiosk reducer

use crate::persistence::LocalState;
use pickup_backend::OrderBackend;
use pickup_core::environment::{Clock, StateRepository};
use std::sync::Arc;
use std::time::Duration;

/// Tunable behavior of the reservation lifecycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KioskSettings {
    /// Pickup window granted by a new reservation
    pub hold: chrono::Duration,
    /// Countdown tick period
    pub tick: Duration,
    /// Reason sent with cancellations
    pub cancel_reason: String,
    /// Number of recent orders shown
    pub recent_orders_limit: usize,
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self {
            hold: chrono::Duration::minutes(15),
            tick: Duration::from_secs(1),
            cancel_reason: "Customer cancellation".to_string(),
            recent_orders_limit: 5,
        }
    }
}

/// Environment for the kiosk reducer
#[derive(Clone)]
pub struct KioskEnvironment {
    /// Clock for deadlines and countdown ticks
    pub clock: Arc<dyn Clock>,
    /// Order backend
    pub backend: Arc<dyn OrderBackend>,
    /// Local persistence
    pub local: LocalState,
    /// Lifecycle settings
    pub settings: KioskSettings,
}

impl KioskEnvironment {
    /// Creates a new kiosk environment with default settings
    pub fn new(
        clock: Arc<dyn Clock>,
        backend: Arc<dyn OrderBackend>,
        repository: Arc<dyn StateRepository>,
    ) -> Self {
        Self {
            clock,
            backend,
            local: LocalState::new(repository),
            settings: KioskSettings::default(),
        }
    }

    /// Replace the lifecycle settings
    #[must_use]
    pub fn with_settings(mut self, settings: KioskSettings) -> Self {
        self.settings = settings;
        self
    }
}
