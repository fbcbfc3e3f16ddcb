//! # Pickup Testing
//!
//! Testing utilities and helpers for the pickup kiosk.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (clocks, storage, backend)
//! - The Given-When-Then [`ReducerTest`] harness
//! - Property-based testing strategies for catalog data
//!
//! ## Example
//!
//! ```ignore
//! use pickup_testing::{test_clock, InMemoryRepository, ScriptedBackend};
//!
//! #[tokio::test]
//! async fn test_checkout() {
//!     let backend = ScriptedBackend::new().with_created_order("A100");
//!     let store = KioskStore::new(state, KioskReducer::new(), env(backend.clone()));
//!
//!     store.send(KioskAction::CreateReservation { customer }).await?.wait().await;
//!
//!     assert_eq!(backend.calls().create_order, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use pickup_core::environment::Clock;

pub mod backend;
pub mod reducer_test;
pub mod repository;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use pickup_testing::mocks::FixedClock;
    /// use pickup_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when a test moves it
    ///
    /// Clones share the same time, so a test can keep one handle and give
    /// another to the environment.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl TestClock {
        /// Create a clock starting at `time`
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an absolute time
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// The reference instant used across tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_time() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(1_735_689_600)
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_time())
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `tracing` subscriber that writes through the test harness
    ///
    /// Honors `RUST_LOG`; safe to call from every test.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use pickup_backend::Product;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    /// Prices between 0.00 and 999.99
    pub fn price() -> impl Strategy<Value = Decimal> {
        (0i64..100_000).prop_map(|cents| Decimal::new(cents, 2))
    }

    /// An active product with the given id and a stock of 0..=`max_stock`
    pub fn product(id: u64, max_stock: u32) -> impl Strategy<Value = Product> {
        (price(), 0..=max_stock, "[A-Z][a-z]{2,8}").prop_map(move |(price, stock, name)| Product {
            id,
            name,
            price,
            stock,
            category: "General".to_string(),
            active: true,
            image: None,
        })
    }

    /// A catalog of 1..=`size` products with ids `1..`
    pub fn catalog(size: usize) -> impl Strategy<Value = Vec<Product>> {
        (1..=size).prop_flat_map(|n| {
            (1..=n as u64)
                .map(|id| product(id, 6).boxed())
                .collect::<Vec<_>>()
        })
    }
}

// Re-export commonly used items
pub use backend::{BackendCalls, ScriptedBackend};
pub use mocks::{test_clock, test_time, FixedClock, TestClock};
pub use reducer_test::ReducerTest;
pub use repository::InMemoryRepository;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_clock_advances_shared_time() {
        let clock = TestClock::new(test_time());
        let handle = clock.clone();
        handle.advance(chrono::Duration::seconds(90));
        assert_eq!(clock.now(), test_time() + chrono::Duration::seconds(90));

        handle.set(test_time());
        assert_eq!(clock.now(), test_time());
    }
}
