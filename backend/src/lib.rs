//! # Pickup Backend
//!
//! Client for the order backend the kiosk reserves against.
//!
//! ## Example
//!
//! ```no_run
//! use pickup_backend::{HttpBackend, OrderBackend};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = HttpBackend::new("http://localhost:8000", Duration::from_secs(10))?;
//!
//!     let products = backend.list_products().await?;
//!     println!("{} products", products.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Contract
//!
//! | Operation | Request |
//! |---|---|
//! | List products | `GET /api/products` |
//! | Create order | `POST /api/orders` |
//! | Get order | `GET /api/orders/:id` |
//! | List orders | `GET /api/orders` |
//! | Cancel order | `POST /api/orders/:id/cancel` |

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpBackend, OrderBackend};
pub use error::BackendError;
pub use types::{
    CancelRequest, CreateOrderRequest, CreatedOrder, ErrorBody, OrderItem, OrderRecord,
    OrderStatus, Product,
};
