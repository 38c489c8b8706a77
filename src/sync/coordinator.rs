//! Fetch-and-sync coordinators.
//!
//! Each data need resolves in the same order: the in-memory store first,
//! then the durable cache, then the network, writing results through to
//! both. Failed refreshes surface an error and leave prior data untouched.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, MarketApi, SearchFilter, SearchQuery};
use crate::cache::{
    locations_ttl, profile_ttl, CacheManager, ViewTracker, KEY_POPULAR_LOCATIONS,
    KEY_TRENDING_LOCATIONS, KEY_USER_PROFILE,
};
use crate::models::{Property, PropertyDraft, UserProfile};
use crate::store::{AuthAction, PropertyAction, Store};

use super::guard::RequestGuard;

/// Search-bar dropdown shows a handful of suggestions.
const TRENDING_LIMIT: usize = 5;

/// Browse page shows a scrollable row of location chips.
const POPULAR_LIMIT: usize = 10;

pub struct Coordinator<A: MarketApi> {
    api: A,
    store: Arc<Store>,
    cache: CacheManager,
    tracker: ViewTracker,
    // One guard per store-committing resource; durable cache writes stay
    // last-write-wins like the rest of the storage layer.
    top_guard: RequestGuard,
    search_guard: RequestGuard,
    popular_guard: RequestGuard,
    last_search: Mutex<Option<SearchQuery>>,
}

impl<A: MarketApi> Coordinator<A> {
    pub fn new(api: A, store: Arc<Store>, cache: CacheManager, tracker: ViewTracker) -> Self {
        Self {
            api,
            store,
            cache,
            tracker,
            top_guard: RequestGuard::new(),
            search_guard: RequestGuard::new(),
            popular_guard: RequestGuard::new(),
            last_search: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // =========================================================================
    // Top properties
    // =========================================================================

    /// Fill the `top_properties` slot. Reuses store contents unless `force`.
    pub async fn load_top_properties(&self, force: bool) -> Result<()> {
        if !force && !self.store.property().top_properties.is_empty() {
            debug!("Top properties already in store, skipping network");
            return Ok(());
        }

        let ticket = self.top_guard.issue();
        self.store.dispatch(PropertyAction::SetLoading(true));

        match self.api.fetch_top_properties().await {
            Ok(items) => {
                let committed = self.top_guard.commit_if_current(ticket, || {
                    info!(count = items.len(), "Top properties fetched");
                    self.store.dispatch(PropertyAction::SetTopProperties(items));
                    self.store.dispatch(PropertyAction::SetError(None));
                    self.store.dispatch(PropertyAction::SetLoading(false));
                });
                if !committed {
                    debug!(ticket, "Stale top-properties response, discarding");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Top properties fetch failed");
                self.top_guard.commit_if_current(ticket, || {
                    self.store
                        .dispatch(PropertyAction::SetError(Some(user_message(&e))));
                    self.store.dispatch(PropertyAction::SetLoading(false));
                });
                Err(e)
            }
        }
    }

    /// Home-screen load: top listings and trending locations, fetched
    /// concurrently. Returns the trending list; the listings land in the
    /// store.
    pub async fn load_home(&self, force: bool) -> Result<Vec<String>> {
        let (_, trending) = futures::future::try_join(
            self.load_top_properties(force),
            self.trending_locations(force),
        )
        .await?;
        Ok(trending)
    }

    // =========================================================================
    // Location search
    // =========================================================================

    /// Run a search and fill the `searched_properties` slot. Exactly one
    /// filter goes out per request; location wins over listing type. A
    /// repeat of the previous query reuses store contents unless `force`.
    pub async fn search(&self, filter: &SearchFilter, force: bool) -> Result<()> {
        let Some(query) = filter.resolve() else {
            debug!("No usable search filter, skipping");
            return Ok(());
        };

        if !force {
            let last = self.last_search.lock().unwrap();
            if last.as_ref() == Some(&query)
                && !self.store.property().searched_properties.is_empty()
            {
                debug!(?query, "Search results already in store, skipping network");
                return Ok(());
            }
        }

        let ticket = self.search_guard.issue();
        self.store.dispatch(PropertyAction::SetLoading(true));

        match self.api.search(&query).await {
            Ok(items) => {
                let committed = self.search_guard.commit_if_current(ticket, || {
                    info!(?query, count = items.len(), "Search results fetched");
                    *self.last_search.lock().unwrap() = Some(query);
                    self.store
                        .dispatch(PropertyAction::SetSearchedProperties(items));
                    self.store.dispatch(PropertyAction::SetError(None));
                    self.store.dispatch(PropertyAction::SetLoading(false));
                });
                if !committed {
                    debug!(ticket, "Stale search response, discarding");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, ?query, "Search failed");
                self.search_guard.commit_if_current(ticket, || {
                    self.store
                        .dispatch(PropertyAction::SetError(Some(user_message(&e))));
                    self.store.dispatch(PropertyAction::SetLoading(false));
                });
                Err(e)
            }
        }
    }

    /// Fill the `popular_properties` slot with listings for one of the
    /// popular locations (the browse page's chip click).
    pub async fn load_properties_for_location(&self, location: &str) -> Result<()> {
        let query = SearchQuery::Location(location.to_string());
        let ticket = self.popular_guard.issue();
        self.store.dispatch(PropertyAction::SetLoading(true));

        match self.api.search(&query).await {
            Ok(items) => {
                let committed = self.popular_guard.commit_if_current(ticket, || {
                    self.store
                        .dispatch(PropertyAction::SetPopularProperties(items));
                    self.store.dispatch(PropertyAction::SetError(None));
                    self.store.dispatch(PropertyAction::SetLoading(false));
                });
                if !committed {
                    debug!(ticket, "Stale popular-properties response, discarding");
                }
                Ok(())
            }
            Err(e) => {
                error!(error = %e, location, "Popular properties fetch failed");
                self.popular_guard.commit_if_current(ticket, || {
                    self.store
                        .dispatch(PropertyAction::SetError(Some(user_message(&e))));
                    self.store.dispatch(PropertyAction::SetLoading(false));
                });
                Err(e)
            }
        }
    }

    // =========================================================================
    // Location lists (durably cached, 2h)
    // =========================================================================

    /// Suggestions for the search-bar dropdown.
    pub async fn trending_locations(&self, force: bool) -> Result<Vec<String>> {
        self.cached_locations(KEY_TRENDING_LOCATIONS, TRENDING_LIMIT, force)
            .await
    }

    /// Location chips for the browse page.
    pub async fn popular_locations(&self, force: bool) -> Result<Vec<String>> {
        self.cached_locations(KEY_POPULAR_LOCATIONS, POPULAR_LIMIT, force)
            .await
    }

    async fn cached_locations(&self, key: &str, limit: usize, force: bool) -> Result<Vec<String>> {
        if !force {
            if let Some(locations) = self.cache.get::<Vec<String>>(key) {
                debug!(key, count = locations.len(), "Locations served from cache");
                return Ok(locations);
            }
        }

        let locations = self.api.fetch_popular_places(limit).await?;
        if let Err(e) = self.cache.set(key, &locations, locations_ttl()) {
            warn!(key, error = %e, "Failed to cache locations");
        }
        Ok(locations)
    }

    // =========================================================================
    // Profile (durably cached, 24h)
    // =========================================================================

    /// Signed-in user's profile, from cache when fresh.
    pub async fn profile(&self, force: bool) -> Result<UserProfile> {
        let auth = self.store.auth();
        let Some(token) = auth.token else {
            // Short-circuit before any network call
            bail!("Please log in to view your profile");
        };

        if !force {
            if let Some(profile) = self.cache.get::<UserProfile>(KEY_USER_PROFILE) {
                debug!("Profile served from cache");
                return Ok(profile);
            }
        }

        let profile = self.api.fetch_profile(&token).await.map_err(|e| {
            error!(error = %e, "Profile fetch failed");
            anyhow!(user_message(&e))
        })?;

        if let Err(e) = self.cache.set(KEY_USER_PROFILE, &profile, profile_ttl()) {
            warn!(error = %e, "Failed to cache profile");
        }
        Ok(profile)
    }

    /// Change the signed-in user's name and/or photo. The updated record
    /// replaces the cached profile so a later read does not show stale data.
    pub async fn update_profile(&self, name: &str, photo: Option<&str>) -> Result<UserProfile> {
        let auth = self.store.auth();
        let Some(token) = auth.token else {
            bail!("Please log in to update your profile");
        };

        let profile = self
            .api
            .update_profile(&token, name, photo)
            .await
            .map_err(|e| {
                error!(error = %e, "Profile update failed");
                anyhow!(user_message(&e))
            })?;

        if let Err(e) = self.cache.set(KEY_USER_PROFILE, &profile, profile_ttl()) {
            warn!(error = %e, "Failed to cache updated profile");
        }
        Ok(profile)
    }

    // =========================================================================
    // View recording
    // =========================================================================

    /// Record a detail-page visit at most once per installation.
    ///
    /// Mark-then-call: the flag is written before the increment is
    /// dispatched, and a failed increment is not retried. Returns whether an
    /// increment was dispatched.
    pub async fn record_view(&self, property_id: &str) -> Result<bool> {
        if self.tracker.has_recorded(property_id) {
            debug!(property_id, "View already recorded, skipping increment");
            return Ok(false);
        }

        self.tracker.mark_recorded(property_id)?;

        if let Err(e) = self.api.record_view(property_id).await {
            warn!(property_id, error = %e, "View increment failed; flag stays set");
        }
        Ok(true)
    }

    // =========================================================================
    // Auth flows
    // =========================================================================

    /// Authenticate and commit the session to store and durable storage.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        if email.is_empty() || password.is_empty() {
            bail!("Email and password are required");
        }

        match self.api.login(email, password).await {
            Ok(data) => {
                if let Err(e) = self.cache.save_token(&data.token) {
                    warn!(error = %e, "Failed to persist auth token");
                }
                self.store.dispatch(AuthAction::LoginSuccess {
                    token: data.token,
                    profile_picture: data.profile_picture,
                });
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                Err(anyhow!(user_message(&e)))
            }
        }
    }

    /// Clear the session from the store and durable storage.
    pub fn logout(&self) {
        if let Err(e) = self.cache.clear_token() {
            warn!(error = %e, "Failed to clear auth token");
        }
        if let Err(e) = self.cache.storage().remove(KEY_USER_PROFILE) {
            warn!(error = %e, "Failed to clear cached profile");
        }
        self.store.dispatch(AuthAction::Logout);
        info!("Logged out");
    }

    // =========================================================================
    // Posting a listing
    // =========================================================================

    /// Post a new listing. Requires a session; the created record (with its
    /// server-assigned id) is committed to the `properties` slot.
    pub async fn post_property(&self, draft: &PropertyDraft) -> Result<Property> {
        let auth = self.store.auth();
        let Some(token) = auth.token else {
            bail!("Please log in to post a property");
        };

        let created = self.api.add_property(&token, draft).await.map_err(|e| {
            error!(error = %e, "Posting property failed");
            anyhow!(user_message(&e))
        })?;

        info!(id = %created.id, "Property posted");
        self.store
            .dispatch(PropertyAction::AddProperty(created.clone()));
        Ok(created)
    }
}

/// Map an API failure to the message shown to the user.
pub fn user_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized) => "Session expired. Please log in again.".to_string(),
        Some(ApiError::RateLimited) => {
            "Server is busy. Please wait a moment and try again.".to_string()
        }
        Some(ApiError::NetworkError(inner)) if inner.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        Some(ApiError::NetworkError(_)) => {
            "Unable to connect to server. Check your internet connection.".to_string()
        }
        Some(other) => other.to_string(),
        None => format!("Error: {}", e),
    }
}

// ============================================================================
// Tests
// ============================================================================
