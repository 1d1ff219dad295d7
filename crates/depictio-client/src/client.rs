//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use depictio_types::AgentSession;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use crate::api::{CliApi, DataCollectionsApi, WorkflowsApi};
use crate::error::{Error, Result};

/// Default timeout for metadata requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for scan / materialize / track-set requests.
///
/// Scanning a large file tree on the server side takes minutes.
const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(600);

/// Prefix of every catalog endpoint.
const API_PREFIX: &str = "depictio/api/v1";

/// Depictio catalog client.
///
/// Cheap to clone; clones share the connection pool and session.
///
/// # Example
///
/// ```no_run
/// use depictio_client::CatalogClient;
///
/// # async fn example() -> depictio_client::Result<()> {
/// let client = CatalogClient::builder()
///     .base_url("http://localhost:8058")
///     .auth_token("secret")
///     .build()?;
///
/// let record = client.workflows().get("demo", "snakemake").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) action_timeout: Duration,
}

impl CatalogClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client for an authenticated session with default timeouts.
    pub fn new(session: &AgentSession) -> Result<Self> {
        Self::builder().session(session).build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the config validation API.
    pub fn cli(&self) -> CliApi {
        CliApi::new(self.clone())
    }

    /// Access the workflows API.
    pub fn workflows(&self) -> WorkflowsApi {
        WorkflowsApi::new(self.clone())
    }

    /// Access the data collection actions API.
    pub fn data_collections(&self) -> DataCollectionsApi {
        DataCollectionsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner
            .base_url
            .join(&format!("{}/{}", API_PREFIX, path))
            .map_err(Error::from)
    }

    /// Make a GET request with query parameters.
    ///
    /// A 404 is returned as `Ok(None)`.
    pub(crate) async fn get_optional<T, Q>(&self, path: &str, query: &Q) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let response = self
            .inner
            .http
            .get(url)
            .query(query)
            .timeout(self.inner.timeout)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.handle_response(response).await.map(Some)
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST");
        let response = self
            .inner
            .http
            .post(url)
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a PUT request.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        tracing::debug!(%url, "PUT");
        let response = self
            .inner
            .http
            .put(url)
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a DELETE request without a body.
    ///
    /// Any 2xx, including 204 No Content, is success; the body is ignored.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        tracing::debug!(%url, "DELETE");
        let response = self
            .inner
            .http
            .delete(url)
            .timeout(self.inner.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        Ok(())
    }

    /// Make a bodiless POST that can run for minutes; only the status matters.
    pub(crate) async fn post_action(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        tracing::debug!(%url, timeout = ?self.inner.action_timeout, "POST action");
        let response = self
            .inner
            .http
            .post(url)
            .timeout(self.inner.action_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.extract_error(response).await);
        }

        Ok(())
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status() == StatusCode::NO_CONTENT {
            return Err(Error::InvalidResponse(
                "expected a JSON body, got 204 No Content".to_string(),
            ));
        }
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::new())
            .trim()
            .to_string();
        let message = if body.is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };

        match status {
            401 | 403 => Error::Auth(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }
}

/// Builder for creating a CatalogClient.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    timeout: Duration,
    action_timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            action_timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }

    /// Take base URL and token from a session.
    pub fn session(self, session: &AgentSession) -> Self {
        self.base_url(session.base_url())
            .auth_token(session.access_token())
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the bearer token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the timeout for metadata requests.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout for scan / materialize / track-set requests.
    pub fn action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<CatalogClient> {
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

        if let Some(token) = &self.auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::Config("Invalid auth token".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("depictio-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(CatalogClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                action_timeout: self.action_timeout,
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

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8058")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8058/");

        let client = ClientBuilder::new()
            .base_url("http://localhost:8058/")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8058/");
    }

    #[test]
    fn test_builder_rejects_bad_token() {
        let result = ClientBuilder::new()
            .base_url("http://localhost:8058")
            .auth_token("line\nbreak")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_url_building() {
        let session = AgentSession::new("http://localhost:8058", "token");
        let client = CatalogClient::new(&session).unwrap();

        let url = client.url("workflows/get").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8058/depictio/api/v1/workflows/get"
        );

        let url = client.url("/files/scan/wf/dc").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8058/depictio/api/v1/files/scan/wf/dc"
        );
    }

    #[test]
    fn test_url_building_keeps_base_path() {
        let client = ClientBuilder::new()
            .base_url("https://catalog.example.org/prefix")
            .build()
            .unwrap();
        let url = client.url("workflows/create").unwrap();
        assert_eq!(
            url.as_str(),
            "https://catalog.example.org/prefix/depictio/api/v1/workflows/create"
        );
    }
}
