use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::storage::StoragePort;

// ============================================================================
// Keys and TTLs
// ============================================================================

/// Bearer token, stored raw with no expiry envelope. Cleared on logout.
pub const KEY_AUTH_TOKEN: &str = "authToken";

/// Locations suggested in the search bar dropdown.
pub const KEY_TRENDING_LOCATIONS: &str = "trendingLocations";

/// Locations shown as filter chips on the browse page.
pub const KEY_POPULAR_LOCATIONS: &str = "popularLocations";

/// Signed-in user's profile details.
pub const KEY_USER_PROFILE: &str = "userProfile";

/// Popularity data churns slowly server-side; two hours keeps the chips
/// fresh enough without a network hit on every page load.
pub fn locations_ttl() -> Duration {
    Duration::hours(2)
}

/// Profile details rarely change; refetched at most once a day.
pub fn profile_ttl() -> Duration {
    Duration::hours(24)
}

// ============================================================================
// Cached entry envelope
// ============================================================================

/// Envelope written for every cached value. A read after `expires_at` is a
/// miss and the entry is discarded; entries are only ever overwritten whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry<T> {
    pub value: T,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl<T> CachedEntry<T> {
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

// ============================================================================
// Cache manager
// ============================================================================

/// TTL cache over the durable storage port.
///
/// Reads are defensive: malformed or expired entries are purged and reported
/// as a miss, never surfaced as errors.
#[derive(Clone)]
pub struct CacheManager {
    storage: Arc<dyn StoragePort>,
}

impl CacheManager {
    pub fn new(storage: Arc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn StoragePort> {
        &self.storage
    }

    /// Fetch a cached value, or `None` on miss, expiry or parse failure.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;

        let entry: CachedEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key, error = %e, "Malformed cache entry, purging");
                self.purge(key);
                return None;
            }
        };

        if entry.is_expired() {
            debug!(key, expired_at = %entry.expires_at, "Cache entry expired, purging");
            self.purge(key);
            return None;
        }

        Some(entry.value)
    }

    /// Write a value with the given time-to-live, overwriting any prior entry.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let entry = CachedEntry::new(value, ttl);
        let contents = serde_json::to_string(&entry)?;
        self.storage.set(key, &contents)
    }

    fn purge(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            debug!(key, error = %e, "Failed to purge cache entry");
        }
    }

    // ===== Auth token (raw, no expiry envelope) =====

    pub fn load_token(&self) -> Option<String> {
        self.storage.get(KEY_AUTH_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        self.storage.set(KEY_AUTH_TOKEN, token)
    }

    pub fn clear_token(&self) -> Result<()> {
        self.storage.remove(KEY_AUTH_TOKEN)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn cache() -> CacheManager {
        CacheManager::new(Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn get_after_set_returns_value_while_fresh() {
        let cache = cache();
        let locations = vec!["Indiranagar".to_string(), "HSR Layout".to_string()];
        cache
            .set(KEY_POPULAR_LOCATIONS, &locations, locations_ttl())
            .expect("set");

        let got: Vec<String> = cache.get(KEY_POPULAR_LOCATIONS).expect("fresh hit");
        assert_eq!(got, locations);
    }

    #[test]
    fn expired_entry_is_a_miss_and_is_purged() {
        let cache = cache();
        cache
            .set(KEY_TRENDING_LOCATIONS, &vec!["BTM".to_string()], Duration::hours(-1))
            .expect("set already-expired");

        let got: Option<Vec<String>> = cache.get(KEY_TRENDING_LOCATIONS);
        assert!(got.is_none());
        // The stale entry must have been discarded, not just skipped
        assert!(cache.storage().get(KEY_TRENDING_LOCATIONS).is_none());
    }

    #[test]
    fn malformed_entry_is_purged_without_error() {
        let cache = cache();
        cache
            .storage()
            .set(KEY_USER_PROFILE, "{not json")
            .expect("plant garbage");

        let got: Option<crate::models::UserProfile> = cache.get(KEY_USER_PROFILE);
        assert!(got.is_none());
        assert!(cache.storage().get(KEY_USER_PROFILE).is_none());
    }

    #[test]
    fn structurally_wrong_entry_is_purged() {
        let cache = cache();
        // Valid JSON but not a CachedEntry envelope
        cache
            .storage()
            .set(KEY_POPULAR_LOCATIONS, r#"["bare","array"]"#)
            .expect("plant wrong shape");

        let got: Option<Vec<String>> = cache.get(KEY_POPULAR_LOCATIONS);
        assert!(got.is_none());
        assert!(cache.storage().get(KEY_POPULAR_LOCATIONS).is_none());
    }

    #[test]
    fn refresh_overwrites_whole_entry() {
        let cache = cache();
        cache
            .set(KEY_POPULAR_LOCATIONS, &vec!["Old".to_string()], locations_ttl())
            .expect("set");
        cache
            .set(KEY_POPULAR_LOCATIONS, &vec!["New".to_string()], locations_ttl())
            .expect("overwrite");

        let got: Vec<String> = cache.get(KEY_POPULAR_LOCATIONS).expect("hit");
        assert_eq!(got, vec!["New".to_string()]);
    }

    #[test]
    fn token_round_trip_has_no_envelope() {
        let cache = cache();
        assert!(cache.load_token().is_none());

        cache.save_token("jwt-abc").expect("save");
        assert_eq!(cache.load_token().as_deref(), Some("jwt-abc"));
        // Stored raw, not wrapped in a CachedEntry
        assert_eq!(cache.storage().get(KEY_AUTH_TOKEN).as_deref(), Some("jwt-abc"));

        cache.clear_token().expect("clear");
        assert!(cache.load_token().is_none());
    }
}
