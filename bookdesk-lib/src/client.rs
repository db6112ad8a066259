//! Main CatalogClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::cache::InMemoryCache;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::AuthorDoc;
use crate::rate_limit::ConcurrencyLimiter;
use crate::rate_limit::RetryConfig;
use crate::rate_limit::Transient;

/// Public Open Library host.
pub const DEFAULT_BASE_URL: &str = "https://openlibrary.org";

/// Subject the dashboard lists by default.
pub const DEFAULT_SUBJECT: &str = "science";

/// How long author details are reused before being looked up again.
pub const DEFAULT_AUTHOR_TTL: Duration = Duration::from_secs(30 * 60);

/// The client for the book catalog's subject listing and author search.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely.
///
/// # Example
///
/// ```ignore
/// use bookdesk_lib::CatalogClient;
///
/// let client = CatalogClient::builder()
///     .url("https://openlibrary.org")
///     .subject("science")
///     .build()?;
///
/// let stubs = client.list_works(PageRequest::first(PageSize::default())).await?;
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    pub(crate) inner: Arc<CatalogClientInner>,
}

pub(crate) struct CatalogClientInner {
    pub(crate) base_url: Url,
    pub(crate) subject: String,
    pub(crate) http_client: Client,
    pub(crate) timeout: Option<Duration>,
    pub(crate) retry_config: RetryConfig,
    pub(crate) concurrency_limiter: ConcurrencyLimiter,
    pub(crate) author_cache: InMemoryCache<Option<AuthorDoc>>,
    pub(crate) author_ttl: Duration,
}

impl CatalogClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> CatalogClientBuilder<Missing, Missing> {
        CatalogClientBuilder::new()
    }

    /// Builds a client for the public Open Library `science` subject.
    pub fn open_library() -> Result<Self, Error> {
        Self::builder()
            .url(DEFAULT_BASE_URL)
            .subject(DEFAULT_SUBJECT)
            .build()
    }

    /// Returns the base URL of the catalog.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Returns the subject whose works are listed.
    pub fn subject(&self) -> &str {
        &self.inner.subject
    }

    /// Joins `path` onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)).into())
    }

    /// GETs `url` and decodes the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, Error> {
        let response = self.request(url).await?;
        let body = response.text().await.map_err(ApiError::from)?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => Err(ApiError::parse_with_body(e.to_string(), body).into()),
        }
    }

    /// Makes a GET request with concurrency limiting and retry logic.
    ///
    /// This is the low-level request method used by both endpoints.
    pub(crate) async fn request(&self, url: &Url) -> Result<reqwest::Response, Error> {
        // Held for the entire request lifecycle including retries
        let _permit = self.inner.concurrency_limiter.acquire().await;

        let retry = &self.inner.retry_config;
        let mut retries = 0;

        loop {
            log::debug!("GET {}", url);

            let (kind, retry_after) = match self.send_request_inner(url).await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = parse_retry_after(&response);
                    if !retry.allows(Transient::RateLimited, retries) {
                        return Err(Error::RateLimit { retry_after });
                    }
                    (Transient::RateLimited, retry_after)
                }
                Ok(response)
                    if response.status().is_server_error()
                        && retry.allows(Transient::ServerError, retries) =>
                {
                    (Transient::ServerError, None)
                }
                Ok(response) => return Err(http_error(response).await.into()),
                Err(e) if e.is_retryable() && retry.allows(Transient::Network, retries) => {
                    log::debug!("{} on {}", e, url);
                    (Transient::Network, None)
                }
                Err(e) => return Err(e.into()),
            };

            let wait = retry_after.unwrap_or_else(|| retry.delay_for(retries));
            retries += 1;
            log::warn!(
                "{:?} on {}, retry {}/{} in {:?}",
                kind,
                url,
                retries,
                retry.max_retries,
                wait
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Inner request method without retry logic.
    async fn send_request_inner(&self, url: &Url) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .inner
            .http_client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        request.send().await.map_err(|e| match self.inner.timeout {
            Some(timeout) if e.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(e),
        })
    }
}

/// Builds an HTTP error from a failed response, using its body as the
/// message or the status reason if the body is empty.
async fn http_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        body
    };
    ApiError::http(status.as_u16(), message)
}

/// Parses the Retry-After header value (seconds).
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`CatalogClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The catalog host, e.g. `https://openlibrary.org`
/// - `subject` - The subject whose works are listed
///
/// # Example
///
/// ```ignore
/// let client = CatalogClient::builder()
///     .url("https://openlibrary.org")
///     .subject("science")
///     .timeout(Duration::from_secs(15))
///     .concurrency_limiter(ConcurrencyLimiter::new(4))
///     .build()?;
/// ```
pub struct CatalogClientBuilder<Url, Subject> {
    url: Url,
    subject: Subject,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    retry_config: RetryConfig,
    concurrency_limiter: ConcurrencyLimiter,
    author_ttl: Duration,
}

impl CatalogClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            subject: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            retry_config: RetryConfig::default(),
            concurrency_limiter: ConcurrencyLimiter::default(),
            author_ttl: DEFAULT_AUTHOR_TTL,
        }
    }
}

impl Default for CatalogClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> CatalogClientBuilder<Missing, S> {
    /// Sets the catalog host URL.
    pub fn url(self, url: impl Into<String>) -> CatalogClientBuilder<Set<String>, S> {
        CatalogClientBuilder {
            url: Set(url.into()),
            subject: self.subject,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            retry_config: self.retry_config,
            concurrency_limiter: self.concurrency_limiter,
            author_ttl: self.author_ttl,
        }
    }
}

impl<U> CatalogClientBuilder<U, Missing> {
    /// Sets the subject whose works are listed.
    pub fn subject(self, subject: impl Into<String>) -> CatalogClientBuilder<U, Set<String>> {
        CatalogClientBuilder {
            url: self.url,
            subject: Set(subject.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            retry_config: self.retry_config,
            concurrency_limiter: self.concurrency_limiter,
            author_ttl: self.author_ttl,
        }
    }
}

impl<U, S> CatalogClientBuilder<U, S> {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the retry policy.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Sets the limiter shared by all requests of this client.
    pub fn concurrency_limiter(mut self, limiter: ConcurrencyLimiter) -> Self {
        self.concurrency_limiter = limiter;
        self
    }

    /// Sets how long author details are cached.
    pub fn author_ttl(mut self, ttl: Duration) -> Self {
        self.author_ttl = ttl;
        self
    }
}

impl CatalogClientBuilder<Set<String>, Set<String>> {
    /// Builds the [`CatalogClient`].
    ///
    /// Fails if the URL does not parse or the HTTP client cannot be created.
    pub fn build(self) -> Result<CatalogClient, Error> {
        let raw = self.url.0;
        // A trailing slash keeps `Url::join` from dropping the last path segment
        let normalized = format!("{}/", raw.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(CatalogClient {
            inner: Arc::new(CatalogClientInner {
                base_url,
                subject: self.subject.0,
                http_client,
                timeout: self.timeout,
                retry_config: self.retry_config,
                concurrency_limiter: self.concurrency_limiter,
                author_cache: InMemoryCache::new(),
                author_ttl: self.author_ttl,
            }),
        })
    }
}
