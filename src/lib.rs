//! Persisted shopping-cart state for the crochet storefront.
//!
//! # Examples
//!
//! In-memory usage with [`core::store::CartStore`]:
//! ```
//! use rust_decimal::Decimal;
//! use stitchcart::{core::store::CartStore, item::ProductSummary};
//!
//! let mut cart = CartStore::new();
//! let rose = ProductSummary::new("1", "Rose", Decimal::from(100), "/img/rose.jpg");
//! for _ in 0..3 {
//!     cart.add_to_cart(rose.clone());
//! }
//! assert_eq!(cart.total_items(), 3);
//! assert_eq!(cart.total_price(), Decimal::from(300));
//! ```
//!
//! Runtime usage with a SQLite sink:
//! ```no_run
//! use rust_decimal::Decimal;
//! use stitchcart::{
//!     config::CartConfig,
//!     item::ProductSummary,
//!     persist::sqlite::SqliteCartSink,
//!     runtime::handle::spawn_hydrated,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sink = SqliteCartSink::open("storefront.db").expect("open sqlite");
//! let cart = spawn_hydrated(Box::new(sink), CartConfig::default()).await;
//! let mut events = cart.subscribe();
//! cart.add_to_cart(ProductSummary::new("1", "Rose", Decimal::from(100), ""))
//!     .await
//!     .expect("add");
//! let _changed = events.recv().await.expect("event");
//! cart.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Order summary built from a cart snapshot.
pub mod checkout;
/// Runtime configuration and environment overrides.
pub mod config;
/// Core in-memory cart store.
pub mod core;
/// Product summaries, catalog records, and cart lines.
pub mod item;
/// Applied-change model and persisted record envelope.
pub mod op;
/// Storage abstraction with in-memory and SQLite sinks.
pub mod persist;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and constants.
pub mod types;
