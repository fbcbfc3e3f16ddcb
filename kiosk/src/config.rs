//! Configuration for the kiosk binary.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::environment::KioskSettings;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Longest pickup window the kiosk accepts (one day)
pub const MAX_HOLD_MINUTES: i64 = 24 * 60;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No backend URL
    #[error("KIOSK_BACKEND_URL must not be empty")]
    EmptyBackendUrl,

    /// Hold window outside `1..=MAX_HOLD_MINUTES`
    #[error("KIOSK_HOLD_MINUTES must be between 1 and 1440, got {0}")]
    HoldOutOfRange(i64),

    /// Countdown would spin
    #[error("KIOSK_TICK_MILLIS must be greater than zero")]
    ZeroTick,
}

/// Kiosk configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskConfig {
    /// Order backend base URL, without the `/api` suffix
    pub backend_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Directory holding the local state files
    pub data_dir: PathBuf,
    /// Pickup window in minutes
    pub hold_minutes: i64,
    /// Countdown tick period in milliseconds
    pub tick_millis: u64,
    /// Reason sent with cancellations
    pub cancel_reason: String,
    /// Number of recent orders shown
    pub recent_orders_limit: usize,
    /// Log filter (trace, debug, info, warn, error or a full directive)
    pub log_level: String,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 10,
            data_dir: PathBuf::from(".kiosk"),
            hold_minutes: 15,
            tick_millis: 1_000,
            cancel_reason: "Customer cancellation".to_string(),
            recent_orders_limit: 5,
            log_level: "pickup_kiosk=info,pickup_runtime=info".to_string(),
        }
    }
}

impl KioskConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: env::var("KIOSK_BACKEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_url),
            request_timeout_secs: env::var("KIOSK_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            data_dir: env::var("KIOSK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            hold_minutes: env::var("KIOSK_HOLD_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.hold_minutes),
            tick_millis: env::var("KIOSK_TICK_MILLIS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.tick_millis),
            cancel_reason: env::var("KIOSK_CANCEL_REASON").unwrap_or(defaults.cancel_reason),
            recent_orders_limit: env::var("KIOSK_RECENT_ORDERS_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.recent_orders_limit),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// Check the values the kiosk cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty backend URL, a hold window outside
    /// `1..=MAX_HOLD_MINUTES` or a zero tick period.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend_url.trim().is_empty() {
            return Err(ConfigError::EmptyBackendUrl);
        }
        if !(1..=MAX_HOLD_MINUTES).contains(&self.hold_minutes) {
            return Err(ConfigError::HoldOutOfRange(self.hold_minutes));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    /// Backend request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Reservation lifecycle settings, after [`Self::validate`]
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by [`Self::validate`].
    pub fn settings(&self) -> Result<KioskSettings, ConfigError> {
        self.validate()?;
        let hold = chrono::Duration::try_minutes(self.hold_minutes)
            .ok_or(ConfigError::HoldOutOfRange(self.hold_minutes))?;
        Ok(KioskSettings {
            hold,
            tick: Duration::from_millis(self.tick_millis),
            cancel_reason: self.cancel_reason.clone(),
            recent_orders_limit: self.recent_orders_limit,
        })
    }
}
