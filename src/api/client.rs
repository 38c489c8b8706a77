//! HTTP client for the marketplace REST API.
//!
//! All endpoints wrap their payload as `{ "success": bool, "data": ... }`.
//! Authenticated endpoints take the bearer token explicitly so callers (and
//! tests) control where it comes from.

use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::models::{Property, PropertyDraft, UserProfile};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s tolerates a cold serverless backend while still failing fast enough
/// for the caller to reach a terminal UI state.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Search query
// ============================================================================

/// Exactly one filter goes out per search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Location(String),
    ListingType(String),
}

impl SearchQuery {
    pub fn body(&self) -> serde_json::Value {
        match self {
            SearchQuery::Location(location) => json!({ "location": location }),
            SearchQuery::ListingType(listing_type) => json!({ "listingType": listing_type }),
        }
    }
}

/// User-facing search input. May name a location, a listing type, both or
/// neither; `resolve` picks the single filter actually sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub location: Option<String>,
    pub listing_type: Option<String>,
}

impl SearchFilter {
    pub fn location(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            listing_type: None,
        }
    }

    pub fn listing_type(listing_type: impl Into<String>) -> Self {
        Self {
            location: None,
            listing_type: Some(listing_type.into()),
        }
    }

    /// Location wins when both filters are present. Empty strings count as
    /// absent. `None` means there is nothing to search for.
    pub fn resolve(&self) -> Option<SearchQuery> {
        if let Some(location) = self.location.as_deref().filter(|s| !s.is_empty()) {
            return Some(SearchQuery::Location(location.to_string()));
        }
        self.listing_type
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|t| SearchQuery::ListingType(t.to_string()))
    }
}

// ============================================================================
// Marketplace API trait
// ============================================================================

/// The remote calls the sync coordinators depend on. `ApiClient` is the real
/// implementation; tests substitute scripted fakes.
#[allow(async_fn_in_trait)]
pub trait MarketApi: Send + Sync {
    async fn fetch_top_properties(&self) -> Result<Vec<Property>>;

    async fn fetch_popular_places(&self, limit: usize) -> Result<Vec<String>>;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Property>>;

    /// Fire-and-forget view increment; no meaningful response body.
    async fn record_view(&self, property_id: &str) -> Result<()>;

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile>;

    async fn login(&self, email: &str, password: &str) -> Result<LoginData>;

    async fn add_property(&self, token: &str, draft: &PropertyDraft) -> Result<Property>;

    async fn update_profile(
        &self,
        token: &str,
        name: &str,
        photo: Option<&str>,
    ) -> Result<UserProfile>;
}

/// Payload of a successful login or Google exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "picture")]
    pub profile_picture: Option<String>,
}

// ============================================================================
// HTTP client
// ============================================================================

/// `{success, data}` envelope every endpoint responds with.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    #[allow(dead_code)]
    success: bool,
    data: T,
}

/// Clone is cheap - reqwest::Client shares its connection pool via Arc.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(token: &str) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))
                .context("Invalid characters in auth token")?,
        );
        Ok(headers)
    }

    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: Option<header::HeaderMap>,
    ) -> Result<T> {
        let url = self.url(path);
        let mut request = self.client.get(&url);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        let response = request.send().await.map_err(ApiError::NetworkError)?;
        let response = Self::check_response(response).await?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;
        Ok(envelope.data)
    }

    async fn post_data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: Option<header::HeaderMap>,
    ) -> Result<T> {
        let url = self.url(path);
        let mut request = self.client.post(&url).json(body);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        let response = request.send().await.map_err(ApiError::NetworkError)?;
        let response = Self::check_response(response).await?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;
        Ok(envelope.data)
    }

    // ===== Endpoints outside the coordinator seam =====

    /// Full public listing feed.
    pub async fn fetch_properties(&self) -> Result<Vec<Property>> {
        self.get_data("/api/properties", None).await
    }

    /// Single listing by id.
    pub async fn fetch_property(&self, property_id: &str) -> Result<Property> {
        self.get_data(&format!("/api/properties/{}", property_id), None)
            .await
    }

    /// Register a new account. Returns the server's confirmation message.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct SignupData {
            #[serde(default)]
            message: String,
        }

        let body = json!({ "name": name, "email": email, "password": password });
        let data: SignupData = self.post_data("/auth/signup", &body, None).await?;
        Ok(data.message)
    }

    /// Exchange a Google ID token for a marketplace session token.
    pub async fn google_sign_in(&self, id_token: &str) -> Result<LoginData> {
        let body = json!({ "idToken": id_token });
        self.post_data("/auth/google", &body, None).await
    }

}

impl MarketApi for ApiClient {
    async fn fetch_top_properties(&self) -> Result<Vec<Property>> {
        self.get_data("/api/properties/top", None).await
    }

    async fn fetch_popular_places(&self, limit: usize) -> Result<Vec<String>> {
        self.get_data(&format!("/search/popular-places?limit={}", limit), None)
            .await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Property>> {
        self.post_data("/search", &query.body(), None).await
    }

    async fn record_view(&self, property_id: &str) -> Result<()> {
        let url = self.url(&format!("/api/properties/{}/view", property_id));
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(ApiError::NetworkError)?;
        // Response body carries nothing useful; only the status matters
        Self::check_response(response).await?;
        debug!(property_id, "View increment dispatched");
        Ok(())
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile> {
        self.get_data("/profile", Some(Self::bearer(token)?)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginData> {
        let body = json!({ "email": email, "password": password });
        self.post_data("/auth/login", &body, None).await
    }

    async fn add_property(&self, token: &str, draft: &PropertyDraft) -> Result<Property> {
        // gorilla/mux registers the protected add route with a trailing slash
        self.post_data("/api/properties/", draft, Some(Self::bearer(token)?))
            .await
    }

    /// Update the signed-in user's display name and/or photo URL.
    async fn update_profile(
        &self,
        token: &str,
        name: &str,
        photo: Option<&str>,
    ) -> Result<UserProfile> {
        #[derive(Deserialize)]
        struct UpdateData {
            user: UserProfile,
        }

        let mut body = json!({ "name": name });
        if let Some(photo) = photo {
            body["profilePicture"] = json!(photo);
        }
        let data: UpdateData = self
            .post_data("/profile/update", &body, Some(Self::bearer(token)?))
            .await?;
        Ok(data.user)
    }
}
