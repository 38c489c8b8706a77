//! REST API client module for the marketplace service.
//!
//! `ApiClient` talks to the remote API that owns persistence, search
//! ranking, authentication and file storage. The `MarketApi` trait is the
//! seam the sync coordinators depend on, so tests can script responses
//! without a network.

pub mod client;
pub mod error;

pub use client::{ApiClient, LoginData, MarketApi, SearchFilter, SearchQuery};
pub use error::ApiError;
