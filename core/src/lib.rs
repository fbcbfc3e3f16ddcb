//! # Pickup Core
//!
//! Core traits and types for the pickup kiosk.
//!
//! Every piece of kiosk behavior is written as a reducer over an owned state
//! value. Reducers never perform I/O themselves: they describe it as [`Effect`]
//! values which the runtime executes, feeding the resulting actions back in.
//!
//! ## Core Concepts
//!
//! - **State**: Owned, cloneable snapshot of everything the kiosk knows
//! - **Action**: All inputs (user intents, backend responses, timer ticks)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Description of a side effect, executed by the runtime
//! - **Environment**: Injected dependencies (clock, persistence, backend)
//!
//! ## Example
//!
//! ```ignore
//! impl Reducer for CartReducer {
//!     type State = CartState;
//!     type Action = CartAction;
//!     type Environment = CartEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CartState,
//!         action: CartAction,
//!         env: &CartEnvironment,
//!     ) -> SmallVec<[Effect<CartAction>; 4]> {
//!         match action {
//!             CartAction::Add { product_id } => {
//!                 state.add(product_id);
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

pub use effect::{Effect, TimerId};
pub use environment::{Clock, RepositoryError, StateRepository, SystemClock};
pub use reducer::Reducer;

/// Reducer module - The core trait for business logic
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Validates the action, updates state in place, and returns the
        /// effects the runtime should execute. Must not block or await.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. The runtime decides when and where
/// they run.
pub mod effect {
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Name of a repeating timer owned by the runtime
    ///
    /// At most one timer per id runs at any time.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TimerId(&'static str);

    impl TimerId {
        /// Creates a timer id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// Returns the timer name
        #[must_use]
        pub const fn as_str(&self) -> &'static str {
            self.0
        }
    }

    impl fmt::Display for TimerId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Dispatch `action` every `period` until cancelled
        ///
        /// Starting an interval whose id is already running replaces the
        /// running one.
        Interval {
            /// Timer name
            id: TimerId,
            /// Time between dispatches
            period: Duration,
            /// Action to dispatch on every tick
            action: Box<Action>,
        },

        /// Stop the interval with this id, if any
        CancelInterval(TimerId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::None => write!(f, "Effect::None"),
                Self::Parallel(effects) => f.debug_tuple("Effect::Parallel").field(effects).finish(),
                Self::Future(_) => write!(f, "Effect::Future(<future>)"),
                Self::Interval { id, period, action } => f
                    .debug_struct("Effect::Interval")
                    .field("id", id)
                    .field("period", period)
                    .field("action", action)
                    .finish(),
                Self::CancelInterval(id) => f.debug_tuple("Effect::CancelInterval").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a future producing an optional feedback action
        #[must_use]
        pub fn future<F>(fut: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Self::Future(Box::pin(fut))
        }

        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Self>) -> Self {
            Self::Parallel(effects)
        }

        /// Whether this effect does nothing
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Self::None => true,
                Self::Parallel(effects) => effects.iter().all(Self::is_none),
                _ => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    ///
    /// Production uses [`SystemClock`]; tests use a fixed or manually
    /// advanced clock.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Errors raised by a [`StateRepository`]
    #[derive(Debug, Error)]
    pub enum RepositoryError {
        /// Underlying storage failed
        #[error("storage I/O failed for '{key}': {source}")]
        Io {
            /// Key being read or written
            key: String,
            /// Cause
            #[source]
            source: std::io::Error,
        },

        /// Storage is unavailable (quota, permissions, closed handle)
        #[error("storage unavailable: {0}")]
        Unavailable(String),
    }

    /// Durable key-value storage of named blobs
    ///
    /// Pure get/set, no interpretation of the stored text. Implementations
    /// must treat a missing key as `Ok(None)`.
    pub trait StateRepository: Send + Sync {
        /// Read the blob stored under `key`
        ///
        /// # Errors
        ///
        /// Returns [`RepositoryError`] if the storage cannot be read.
        fn load(&self, key: &str) -> Result<Option<String>, RepositoryError>;

        /// Store `value` under `key`, replacing any previous blob
        ///
        /// # Errors
        ///
        /// Returns [`RepositoryError`] if the storage cannot be written.
        fn save(&self, key: &str, value: &str) -> Result<(), RepositoryError>;

        /// Delete the blob stored under `key`; deleting a missing key succeeds
        ///
        /// # Errors
        ///
        /// Returns [`RepositoryError`] if the storage cannot be written.
        fn remove(&self, key: &str) -> Result<(), RepositoryError>;
    }
}
