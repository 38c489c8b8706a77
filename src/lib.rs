//! RentNest client core: the offline-aware data layer behind the rental
//! marketplace client.
//!
//! The crate is organized around four pieces:
//!
//! - [`cache`]: a durable TTL cache over a pluggable [`storage`] port, plus
//!   the per-property view-dedup tracker.
//! - [`store`]: a reducer-driven state container holding the auth session and
//!   the property listing slots.
//! - [`api`]: the typed HTTP client for the RentNest backend, behind the
//!   [`api::MarketApi`] seam so flows can be tested without a server.
//! - [`sync`]: coordinators that tie the three together, with latest-wins
//!   guards against out-of-order responses.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;
pub mod sync;

pub use api::{ApiClient, MarketApi, SearchFilter};
pub use cache::{CacheManager, ViewTracker};
pub use config::Config;
pub use storage::{FileStorage, MemoryStorage, StoragePort};
pub use store::Store;
pub use sync::{hydrate_store, Coordinator};
