//! REST client for the club backend

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use csquare_core::backend::extract_list;
use csquare_core::{Backend, Event, FacultyMember, GalleryItem, TeamMember, Toast, TokenStore};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};

/// Hosted backend, including the `/api` prefix
pub const DEFAULT_BASE_URL: &str = "https://csquarebackend-upd0.onrender.com/api";

/// Upper bound on any single request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// API client with bearer authentication backed by a [`TokenStore`]
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.has_token())
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating API client");

        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Whether a token is stored; storage failures count as logged out
    pub fn has_token(&self) -> bool {
        matches!(self.tokens.load(), Ok(Some(_)))
    }

    /// Build a request, attaching the stored bearer token when `auth` is set
    pub(crate) fn request(&self, method: Method, path: &str, auth: bool) -> Result<RequestBuilder> {
        let builder = self.http.request(method, self.url(path));
        if !auth {
            return Ok(builder);
        }
        Ok(match self.tokens.load()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request and decode the JSON body
    ///
    /// A 401 on an authenticated request clears the stored token. Empty
    /// success bodies decode to `null`.
    pub(crate) async fn execute(&self, request: RequestBuilder, auth: bool) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text)?);
        }

        if auth && status == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected the admin token, clearing it");
            self.tokens.clear()?;
            return Err(Error::Unauthorized);
        }

        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        let err = Error::from_response(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "Request failed");
        Err(err)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.execute(self.request(Method::GET, path, false)?, false)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_authed(&self, path: &str) -> Result<Value> {
        self.execute(self.request(Method::GET, path, true)?, true)
            .await
    }

    #[instrument(skip(self, body))]
    pub async fn post_json<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Value> {
        self.execute(self.request(Method::POST, path, true)?.json(body), true)
            .await
    }

    #[instrument(skip(self, body))]
    pub async fn put_json<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Value> {
        self.execute(self.request(Method::PUT, path, true)?.json(body), true)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.execute(self.request(Method::DELETE, path, true)?, true)
            .await
    }

    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        Ok(extract_list(self.get(path).await?, path))
    }

    pub async fn events(&self) -> Result<Vec<Event>> {
        self.list("/events").await
    }

    pub async fn team(&self) -> Result<Vec<TeamMember>> {
        self.list("/team").await
    }

    pub async fn faculty(&self) -> Result<Vec<FacultyMember>> {
        self.list("/faculty").await
    }

    /// Gallery items shown on the public site
    pub async fn active_gallery(&self) -> Result<Vec<GalleryItem>> {
        self.list("/gallery?active=true").await
    }

    /// Every gallery item, active or not
    pub async fn all_gallery(&self) -> Result<Vec<GalleryItem>> {
        Ok(extract_list(self.get_authed("/gallery").await?, "/gallery"))
    }

    pub async fn toasts(&self) -> Result<Vec<Toast>> {
        self.list("/toast").await
    }

    /// Exchange credentials for a bearer token and persist it
    ///
    /// Credentials are sent as given; normalising them is up to the caller.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let request = self
            .request(Method::POST, "/auth/login", false)?
            .json(&json!({ "username": username, "password": password }));
        let body = self.execute(request, false).await?;

        let token = body
            .pointer("/data/token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Api {
                status: 200,
                message: Some("Login response carried no token".into()),
            })?
            .to_string();

        self.tokens.save(&token)?;
        info!("Admin login succeeded");
        Ok(token)
    }

    /// Check the stored token with the backend
    ///
    /// Returns `Ok(false)` with no stored token. A response that is neither
    /// `valid` nor `success` clears the token.
    #[instrument(skip(self))]
    pub async fn verify(&self) -> Result<bool> {
        if self.tokens.load()?.is_none() {
            return Ok(false);
        }

        let request = self.request(Method::POST, "/auth/verify", true)?.json(&json!({}));
        let body = match self.execute(request, true).await {
            Ok(body) => body,
            Err(err) => {
                if !matches!(err, Error::Unauthorized) {
                    self.tokens.clear()?;
                }
                return Err(err);
            }
        };

        let flag = |key: &str| body.get(key).and_then(Value::as_bool).unwrap_or(false);
        let valid = flag("valid") || flag("success");
        if !valid {
            debug!("Token verification answered without a valid flag");
            self.tokens.clear()?;
        }
        Ok(valid)
    }

    pub fn logout(&self) -> Result<()> {
        self.tokens.clear()?;
        info!("Admin logged out");
        Ok(())
    }
}

impl Backend for ApiClient {
    async fn get_json(&self, path: &str) -> csquare_core::Result<Value> {
        self.get(path).await.map_err(csquare_core::Error::backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{Route, TestServer};
    use csquare_core::{DataStore, MemoryTokenStore};

    fn client(server: &TestServer, tokens: Arc<MemoryTokenStore>) -> ApiClient {
        ApiClient::new(
            ClientConfig {
                base_url: format!("{}/api/", server.base_url()),
                request_timeout: Duration::from_secs(5),
            },
            tokens,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_public_list_has_no_auth_header() {
        let server = TestServer::start(vec![Route::new(
            "GET",
            "/api/events",
            200,
            json!({ "success": true, "data": [
                { "_id": "e1", "type": "upcoming", "date": "2025-09-09", "title": "Hackathon" },
                { "_id": "e2", "title": "broken" }
            ]}),
        )])
        .await;
        let tokens = Arc::new(MemoryTokenStore::with_token("secret"));
        let client = client(&server, tokens);

        let events = client.events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Hackathon");
        assert_eq!(server.last().header("authorization"), None);
    }

    #[tokio::test]
    async fn test_store_fetches_through_client() {
        let server = TestServer::start(vec![Route::new(
            "GET",
            "/api/gallery?active=true",
            200,
            json!([{ "_id": "g1", "title": "Demo", "imageUrl": "https://cdn/g.jpg" }]),
        )])
        .await;
        let client = client(&server, Arc::new(MemoryTokenStore::default()));
        let store = DataStore::new(client);

        store
            .fetch(csquare_core::Collection::Gallery, false)
            .await
            .unwrap();
        store
            .fetch(csquare_core::Collection::Gallery, false)
            .await
            .unwrap();

        assert_eq!(store.gallery().len(), 1);
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let server = TestServer::start(vec![Route::new(
            "POST",
            "/api/auth/login",
            200,
            json!({ "success": true, "data": { "token": "tok-123" } }),
        )])
        .await;
        let tokens = Arc::new(MemoryTokenStore::default());
        let client = client(&server, tokens.clone());

        let token = client.login("admin", "pw").await.unwrap();
        assert_eq!(token, "tok-123");
        assert_eq!(tokens.load().unwrap().as_deref(), Some("tok-123"));
        assert_eq!(
            server.last().json(),
            json!({ "username": "admin", "password": "pw" })
        );
    }

    #[tokio::test]
    async fn test_login_failure_keeps_backend_error() {
        let server = TestServer::start(vec![Route::new(
            "POST",
            "/api/auth/login",
            401,
            json!({ "success": false, "error": "Invalid credentials" }),
        )])
        .await;
        let tokens = Arc::new(MemoryTokenStore::default());
        let client = client(&server, tokens.clone());

        let err = client.login("admin", "nope").await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert_eq!(tokens.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_token() {
        let server = TestServer::start(vec![Route::new(
            "POST",
            "/api/events",
            401,
            json!({ "error": "Token expired" }),
        )])
        .await;
        let tokens = Arc::new(MemoryTokenStore::with_token("stale"));
        let client = client(&server, tokens.clone());

        let err = client.post_json("/events", &json!({})).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
        assert_eq!(tokens.load().unwrap(), None);
        assert_eq!(server.last().header("authorization"), Some("Bearer stale"));
    }

    #[tokio::test]
    async fn test_verify_accepts_valid_or_success() {
        let server = TestServer::start(vec![Route::new(
            "POST",
            "/api/auth/verify",
            200,
            json!({ "success": true }),
        )])
        .await;
        let tokens = Arc::new(MemoryTokenStore::with_token("good"));
        let client = client(&server, tokens.clone());

        assert!(client.verify().await.unwrap());
        assert_eq!(tokens.load().unwrap().as_deref(), Some("good"));
    }

    #[tokio::test]
    async fn test_verify_invalid_response_clears_token() {
        let server = TestServer::start(vec![Route::new(
            "POST",
            "/api/auth/verify",
            200,
            json!({ "valid": false }),
        )])
        .await;
        let tokens = Arc::new(MemoryTokenStore::with_token("meh"));
        let client = client(&server, tokens.clone());

        assert!(!client.verify().await.unwrap());
        assert_eq!(tokens.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_verify_missing_endpoint_reports_404() {
        let server = TestServer::start(vec![]).await;
        let tokens = Arc::new(MemoryTokenStore::with_token("t"));
        let client = client(&server, tokens.clone());

        let err = client.verify().await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(tokens.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_verify_without_token_skips_request() {
        let server = TestServer::start(vec![]).await;
        let client = client(&server, Arc::new(MemoryTokenStore::default()));

        assert!(!client.verify().await.unwrap());
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let server = TestServer::start(vec![Route::new("GET", "/api/team", 200, json!([]))
            .delayed(Duration::from_secs(5))])
        .await;
        let client = ApiClient::new(
            ClientConfig {
                base_url: format!("{}/api", server.base_url()),
                request_timeout: Duration::from_millis(100),
            },
            Arc::new(MemoryTokenStore::default()),
        )
        .unwrap();

        let err = client.team().await.unwrap_err();
        assert!(matches!(err, Error::Timeout), "got {err:?}");
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let server = TestServer::start(vec![]).await;
        let tokens = Arc::new(MemoryTokenStore::with_token("t"));
        let client = client(&server, tokens.clone());

        assert!(client.has_token());
        client.logout().unwrap();
        assert!(!client.has_token());
    }
}
