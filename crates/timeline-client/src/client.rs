//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use timeline_config::EnvironmentConfig;
use tracing::{debug, error, warn};
use url::Url;

use crate::api::{AuthApi, HealthApi};
use crate::error::{Error, ErrorResponse, Result};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameter appended to GETs when cache busting is on.
const CACHE_BUST_PARAM: &str = "_t";

/// Timeline Notebook API client.
///
/// Cloning is cheap; clones share the connection pool and cookie jar, so a
/// session established through one clone is visible to all of them.
///
/// # Example
///
/// ```no_run
/// use timeline_client::TimelineClient;
///
/// # async fn example() -> timeline_client::Result<()> {
/// let client = TimelineClient::builder()
///     .base_url("http://localhost:5000/api")
///     .build()?;
///
/// let status = client.auth().status().await?;
/// println!("logged in: {}", status.is_logged_in);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TimelineClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests, always ending in `/`.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Append `_t=<millis>` to GET requests.
    pub(crate) cache_busting: bool,
}

impl std::fmt::Debug for TimelineClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

impl TimelineClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a resolved environment config.
    pub fn from_config(config: &EnvironmentConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the health API.
    pub fn health(&self) -> HealthApi {
        HealthApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let mut request = self.inner.http.get(url).timeout(self.inner.timeout);
        if self.inner.cache_busting {
            let stamp = chrono::Utc::now().timestamp_millis().to_string();
            request = request.query(&[(CACHE_BUST_PARAM, stamp)]);
        }
        let response = self.send("GET", path, request).await?;
        self.handle_response(response).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let request = self
            .inner
            .http
            .post(url)
            .json(body)
            .timeout(self.inner.timeout);
        let response = self.send("POST", path, request).await?;
        self.handle_response(response).await
    }

    /// Send a request, logging transport failures.
    async fn send(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response> {
        debug!(method, path, "Sending request");
        match request.send().await {
            Ok(response) => Ok(response),
            Err(e) => {
                if e.is_timeout() {
                    error!(method, path, error = %e, "Request timed out");
                } else if e.is_connect() {
                    error!(method, path, error = %e, "Network error: could not reach server");
                } else {
                    error!(method, path, error = %e, "Request failed");
                }
                Err(Error::Http(e))
            }
        }
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let path = response.url().path().to_string();

        let message = match response.json::<ErrorResponse>().await {
            Ok(ErrorResponse {
                message: Some(message),
            }) => message,
            _ => format!("HTTP {}", status.as_u16()),
        };

        classify(status, &path, message)
    }
}

/// Map a failed status to an error and log it.
fn classify(status: StatusCode, path: &str, message: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => {
            warn!(path, %message, "Unauthorized: login required");
            Error::Auth(message)
        }
        StatusCode::FORBIDDEN => {
            warn!(path, %message, "Forbidden: insufficient permissions");
            Error::Forbidden(message)
        }
        StatusCode::NOT_FOUND => {
            warn!(path, %message, "Requested resource not found");
            Error::NotFound(message)
        }
        StatusCode::PAYLOAD_TOO_LARGE => {
            warn!(path, %message, "Payload exceeds the server's size limit");
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
        StatusCode::INTERNAL_SERVER_ERROR => {
            error!(path, %message, "Internal server error");
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
        _ => {
            error!(path, status = status.as_u16(), %message, "HTTP error");
            Error::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Builder for creating a [`TimelineClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    with_credentials: bool,
    cache_busting: bool,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            with_credentials: true,
            cache_busting: false,
            user_agent: None,
        }
    }

    /// Seed a builder from a resolved environment config.
    ///
    /// Cache busting is enabled in development.
    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new()
            .base_url(config.api_base_url.clone())
            .timeout(config.timeout)
            .with_credentials(config.with_credentials)
            .cache_busting(config.environment.is_development())
    }

    /// Set the API base URL (e.g. `http://localhost:5000/api`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Keep and resend session cookies.
    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    /// Append a `_t` timestamp to GET requests.
    pub fn cache_busting(mut self, enabled: bool) -> Self {
        self.cache_busting = enabled;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TimelineClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("timeline-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .cookie_store(self.with_credentials)
            .build()?;

        Ok(TimelineClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                cache_busting: self.cache_busting,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_config::Environment;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:5000/api")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5000/api/");

        let client = ClientBuilder::new()
            .base_url("http://localhost:5000/api/")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5000/api/");
    }

    #[test]
    fn test_builder_rejects_relative_base() {
        let result = ClientBuilder::new().base_url("/api").build();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_url_building_keeps_api_prefix() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:5000/api")
            .build()
            .unwrap();

        let url = client.url("login-status").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/login-status");

        let url = client.url("/login-status").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/login-status");
    }

    #[test]
    fn test_from_config() {
        let config = Environment::Development.defaults();
        let client = TimelineClient::from_config(&config).unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:5000/api/");
        assert_eq!(client.timeout(), Duration::from_secs(10));
        assert!(client.inner.cache_busting);

        let client = TimelineClient::from_config(&Environment::Production.defaults()).unwrap();
        assert!(!client.inner.cache_busting);
    }

    #[test]
    fn test_classify() {
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, "/x", "no".into()),
            Error::Auth(_)
        ));
        assert!(matches!(
            classify(StatusCode::FORBIDDEN, "/x", "no".into()),
            Error::Forbidden(_)
        ));
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, "/x", "gone".into()),
            Error::NotFound(_)
        ));
        assert!(matches!(
            classify(StatusCode::BAD_REQUEST, "/x", "bad".into()),
            Error::Api { status: 400, .. }
        ));
    }
}
