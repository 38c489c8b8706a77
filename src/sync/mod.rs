//! Data-flow glue between the API, the store, and the durable cache.
//!
//! `Coordinator` owns the fetch-and-commit flows; `RequestGuard` makes
//! overlapping refreshes of the same slot latest-wins; `hydrate_store`
//! restores a persisted session at startup.

pub mod coordinator;
pub mod guard;

pub use coordinator::{user_message, Coordinator};
pub use guard::RequestGuard;

use crate::cache::{CacheManager, KEY_USER_PROFILE};
use crate::models::UserProfile;
use crate::store::{AuthAction, Store};

/// Restore a persisted session into the store at startup.
///
/// Dispatches `SetTokenFromStorage` whether or not a token is found, so the
/// store always reflects durable state after hydration.
pub fn hydrate_store(store: &Store, cache: &CacheManager) {
    let token = cache.load_token();
    let profile_picture = token
        .is_some()
        .then(|| cache.get::<UserProfile>(KEY_USER_PROFILE))
        .flatten()
        .and_then(|profile| profile.profile_photo);

    tracing::debug!(found = token.is_some(), "Hydrating session from storage");
    store.dispatch(AuthAction::SetTokenFromStorage {
        token,
        profile_picture,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::profile_ttl;
    use crate::storage::{MemoryStorage, StoragePort};
    use std::sync::Arc;

    fn cache() -> CacheManager {
        let storage: Arc<dyn StoragePort> = Arc::new(MemoryStorage::new());
        CacheManager::new(storage)
    }

    #[test]
    fn hydration_without_a_token_leaves_store_anonymous() {
        let store = Store::new();
        hydrate_store(&store, &cache());

        let auth = store.auth();
        assert!(!auth.is_authenticated);
        assert!(auth.token.is_none());
    }

    #[test]
    fn hydration_restores_token_and_cached_picture() {
        let cache = cache();
        cache.save_token("persisted-jwt").expect("save");
        cache
            .set(
                KEY_USER_PROFILE,
                &UserProfile {
                    name: "Asha".to_string(),
                    email: "a@b.in".to_string(),
                    profile_photo: Some("me.png".to_string()),
                },
                profile_ttl(),
            )
            .expect("cache profile");

        let store = Store::new();
        hydrate_store(&store, &cache);

        let auth = store.auth();
        assert!(auth.is_authenticated);
        assert_eq!(auth.token.as_deref(), Some("persisted-jwt"));
        assert_eq!(auth.profile_picture.as_deref(), Some("me.png"));
    }
}
