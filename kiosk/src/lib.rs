//! # Pickup Kiosk
//!
//! Self-service pickup kiosk: customers build a cart from the live catalog,
//! reserve it on the order backend, and collect it within the pickup window.
//!
//! # Architecture
//!
//! ```text
//!   CLI / front end ──send──▶ Store ──reduce──▶ KioskReducer
//!          ▲                    │                   │
//!          │               effects (tokio)     LocalState
//!     KioskView             │        │         (FileRepository)
//!     ::project        OrderBackend  Interval
//!                      (HTTP)        (countdown Tick)
//! ```
//!
//! - [`cart`]: cart model bounded by catalog stock
//! - [`reservation`]: `None → Creating → Active`, plus `Restoring` after restart
//! - [`countdown`]: pure countdown arithmetic driven by the `Tick` timer
//! - [`sync`]: reconciliation of a restored reservation against the backend
//! - [`persistence`]: typed local state over a key-value [`StateRepository`]
//!
//! [`StateRepository`]: pickup_core::StateRepository

pub mod action;
pub mod app;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod countdown;
pub mod environment;
pub mod error;
pub mod history;
pub mod persistence;
pub mod reducer;
pub mod reservation;
pub mod state;
pub mod sync;
pub mod types;
pub mod validation;
pub mod view;

pub use action::KioskAction;
pub use app::{bootstrap, build_store, next_tick_notices, KioskStore};
pub use config::{ConfigError, KioskConfig};
pub use environment::{KioskEnvironment, KioskSettings};
pub use error::{CustomerField, KioskError};
pub use persistence::{FileRepository, LocalState};
pub use reducer::KioskReducer;
pub use reservation::ReservationPhase;
pub use state::KioskState;
pub use view::KioskView;
