//! Durable caching over the storage port.
//!
//! `CacheManager` wraps the storage port with a `{value, expiresAt}` envelope
//! and TTL semantics: trending/popular location lists live for 2 hours, the
//! user profile for 24. The bearer token is stored raw with no expiry.
//!
//! `ViewTracker` keeps the per-property "view already counted" flags used to
//! dedupe view-increment calls.

pub mod manager;
pub mod views;

pub use manager::{
    locations_ttl, profile_ttl, CacheManager, CachedEntry, KEY_AUTH_TOKEN,
    KEY_POPULAR_LOCATIONS, KEY_TRENDING_LOCATIONS, KEY_USER_PROFILE,
};
pub use views::ViewTracker;
