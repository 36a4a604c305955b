//! CBSO web-service client with rate limiting.

use super::references::{FilingReference, ReferenceLookup};
use crate::company::CompanyNumber;
use crate::config::ClientConfig;
use crate::error::{DataError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Media type of the reference listing
const ACCEPT_REFERENCES: &str = "application/json";

/// Media type of a filing's detail document
const ACCEPT_JSON_XBRL: &str = "application/x.jsonxbrl";

/// Header carrying the subscription key
const SUBSCRIPTION_KEY_HEADER: &str = "NBB-CBSO-Subscription-Key";

/// Header carrying a fresh request id
const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Source of filing references and detail documents.
///
/// [`CbsoClient`] talks to the registry; tests and offline tools can provide
/// their own implementation to drive a [`FilingFetcher`](super::FilingFetcher).
#[async_trait]
pub trait FilingSource: Send + Sync {
    /// List every filing reference deposited for a company.
    ///
    /// # Errors
    /// Transport failures, unexpected statuses and rate limiting are errors.
    /// An unknown company is [`ReferenceLookup::NotFound`], not an error.
    async fn references(&self, company: &CompanyNumber) -> Result<ReferenceLookup>;

    /// Download the raw JSON-XBRL detail document of one filing.
    ///
    /// # Errors
    /// Returns an error when the reference has no data locator, the transfer
    /// fails or the registry answers with a non-success status.
    async fn filing_document(&self, reference: &FilingReference) -> Result<String>;
}

/// Keeps a minimum spacing between two requests.
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            last_request: now.checked_sub(min_interval).unwrap_or(now),
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// Client for the Central Balance Sheet Office web service.
///
/// Every request carries the subscription key and a fresh `X-Request-Id`.
/// Requests are spaced by the configured minimum interval. Nothing is retried:
/// a 429 answer surfaces immediately as [`DataError::RateLimited`].
pub struct CbsoClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    config: ClientConfig,
}

impl CbsoClient {
    /// Create a client from a configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    ///
    /// # Example
    /// ```no_run
    /// use balans_data::{CbsoClient, ClientConfig};
    ///
    /// # fn example() -> balans_data::Result<()> {
    /// let client = CbsoClient::new(ClientConfig::from_env()?)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(config.subscription_key.trim())
            .map_err(|_| DataError::InvalidConfig("subscription key is not a valid header value".to_string()))?;
        headers.insert(SUBSCRIPTION_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(config.min_interval))),
            config,
        })
    }

    /// Create a client from the environment.
    ///
    /// # Errors
    /// See [`ClientConfig::from_env`] and [`CbsoClient::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Configuration in use.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of the reference listing for a company.
    pub fn references_url(&self, company: &CompanyNumber) -> String {
        format!(
            "{}/{}/legalEntity/{}/references",
            self.config.base_url,
            self.config.database.path_segment(),
            company
        )
    }

    async fn get(&self, url: &str, accept: &'static str) -> Result<reqwest::Response> {
        self.rate_limiter.lock().await.wait().await;

        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(%url, %request_id, "requesting");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .header(REQUEST_ID_HEADER, request_id)
            .send()
            .await
            .map_err(DataError::Network)?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            tracing::warn!(%url, ?retry_after_secs, "rate limited by registry");
            return Err(DataError::RateLimited { retry_after_secs });
        }

        Ok(response)
    }
}

#[async_trait]
impl FilingSource for CbsoClient {
    async fn references(&self, company: &CompanyNumber) -> Result<ReferenceLookup> {
        let url = self.references_url(company);
        let response = self.get(&url, ACCEPT_REFERENCES).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!(%company, "company not found in registry");
            return Ok(ReferenceLookup::NotFound);
        }
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await.map_err(DataError::Network)?;
        let references = FilingReference::parse_list(&body)?;
        tracing::debug!(%company, count = references.len(), "references listed");
        Ok(ReferenceLookup::Found(references))
    }

    async fn filing_document(&self, reference: &FilingReference) -> Result<String> {
        let url = reference.data_locator.as_deref().ok_or_else(|| {
            DataError::Parse(format!(
                "reference {} has no accounting data URL",
                reference.reference_number
            ))
        })?;

        let response = self.get(url, ACCEPT_JSON_XBRL).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(DataError::Network)
    }
}

impl std::fmt::Debug for CbsoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CbsoClient")
            .field("base_url", &self.config.base_url)
            .field("database", &self.config.database)
            .finish_non_exhaustive()
    }
}
