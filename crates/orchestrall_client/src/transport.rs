//! HTTP transport with credential injection and retry.

use derive_getters::Getters;
pub use orchestrall_core::API_KEY_HEADER;
use orchestrall_core::SessionConfig;
use orchestrall_error::{
    ConfigError, ConfigErrorKind, OrchestrallResult, RetryableError, TransportError,
    TransportErrorKind,
};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// A status-and-body pair straight off the wire, after retry handling but
/// before any envelope interpretation.
#[derive(Debug, Clone, Getters)]
pub struct RawResponse {
    /// HTTP status code of the final attempt.
    status: u16,
    /// The parsed JSON body.
    body: Value,
}

impl RawResponse {
    /// Consumes the response, yielding its body.
    pub fn into_body(self) -> Value {
        self.body
    }
}

/// HTTP transport for the Orchestrall platform.
///
/// Owns the connection pool, injects the session credentials into every
/// request and retries transient failures with exponential backoff.  The
/// configured timeout bounds each individual attempt.  A timed-out attempt
/// is never retried: the caller's time budget is already spent.
#[derive(Debug, Clone)]
pub struct TransportSession {
    client: Client,
    config: SessionConfig,
}

impl TransportSession {
    /// Creates a transport from validated session settings.
    #[instrument(skip_all)]
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(config.api_key()).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Builder(format!(
                "API key is not a valid header value: {e}"
            )))
        })?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(*config.timeout())
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Builder(format!(
                    "failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self { client, config })
    }

    /// The session settings this transport was built from.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// POSTs a JSON body to a platform path.
    pub async fn post<B>(&self, path: &str, body: &B) -> OrchestrallResult<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        Ok(self
            .request(Method::POST, path, Some(body), &[])
            .await?)
    }

    /// GETs a platform path.
    pub async fn get(&self, path: &str) -> OrchestrallResult<RawResponse> {
        Ok(self
            .request::<Value>(Method::GET, path, None, &[])
            .await?)
    }

    /// GETs a platform path with query parameters.
    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> OrchestrallResult<RawResponse> {
        Ok(self
            .request::<Value>(Method::GET, path, None, query)
            .await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Issues the request, retrying transient failures.
    ///
    /// The configured retry count is the total number of attempts, including
    /// the first; zero is treated as one.  Backoff parameters come from the
    /// first error's [`RetryableError`] classification.
    async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(String, String)],
    ) -> Result<RawResponse, TransportError>
    where
        B: Serialize + ?Sized,
    {
        use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};

        let url = self.url(path);
        debug!(method = %method, url = %url, "Sending platform request");

        let attempts = *self.config.retries();
        let first_err = match self.attempt(&method, &url, body, query).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };
        if !first_err.is_retryable() {
            warn!(error = %first_err, "Permanent transport error, failing immediately");
            return Err(first_err);
        }
        if attempts <= 1 {
            warn!(error = %first_err, "Retry budget exhausted after first attempt");
            return Err(first_err);
        }

        let (initial_ms, _, max_delay_secs) = first_err.retry_strategy_params();
        warn!(
            error = %first_err,
            url = %url,
            initial_backoff_ms = initial_ms,
            remaining_attempts = attempts - 1,
            "Transient transport failure, will retry"
        );

        let retry_strategy = ExponentialBackoff::from_millis(initial_ms)
            .factor(2)
            .max_delay(std::time::Duration::from_secs(max_delay_secs))
            .map(jitter)
            .take(attempts - 2);

        Retry::spawn(retry_strategy, || async {
            match self.attempt(&method, &url, body, query).await {
                Ok(response) => Ok(response),
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, "Transient transport failure, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "Permanent transport error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await
    }

    /// Makes one attempt: send, check status, parse JSON.
    async fn attempt<B>(
        &self,
        method: &Method,
        url: &str,
        body: Option<&B>,
        query: &[(String, String)],
    ) -> Result<RawResponse, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %text, "Platform returned an error status");
            return Err(TransportError::new(TransportErrorKind::HttpStatus(
                status.as_u16(),
            )));
        }

        let status = status.as_u16();
        let body = response.json::<Value>().await.map_err(|e| {
            TransportError::new(TransportErrorKind::Malformed(format!(
                "response body is not JSON: {e}"
            )))
        })?;
        Ok(RawResponse { status, body })
    }
}

/// Maps a reqwest failure onto the transport taxonomy.
///
/// Timeouts are reported distinctly; every other send-stage failure is
/// treated as a connection fault.
fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::new(TransportErrorKind::Timeout)
    } else {
        TransportError::new(TransportErrorKind::ConnectionRefused(e.to_string()))
    }
}
