//! Upstream HTTP client: auth headers, pooling, retries and error mapping

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use super::limiter::{LimiterStats, RequestLimiter};
use crate::config::Config;
use crate::constants::{API_KEY_HEADER, HTTP_POOL_MAX_IDLE_PER_HOST, retry};
use crate::data_fetcher::models::ApiEnvelope;
use crate::error::AppError;

/// Creates a configured HTTP client with connection pooling, timeout handling
/// and the provider's auth header attached to every request.
pub fn create_http_client_with_timeout(
    timeout: Duration,
    api_key: &str,
) -> Result<Client, AppError> {
    let mut headers = HeaderMap::new();
    let mut key = HeaderValue::from_str(api_key)
        .map_err(|_| AppError::config_error("api_key contains characters not allowed in a header"))?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, key);

    Ok(Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE_PER_HOST)
        .default_headers(headers)
        .build()?)
}

/// Shared client for the football data provider.
///
/// The underlying `reqwest::Client` is built on first use and reused by every
/// caller; [`ApiClient::close`] releases it and a later request rebuilds it.
/// Every attempt holds a [`RequestLimiter`] slot while it is on the wire.
#[derive(Debug)]
pub struct ApiClient {
    base_url: String,
    api_key: String,
    timeout: Duration,
    retry_attempts: u32,
    limiter: RequestLimiter,
    client: RwLock<Option<Client>>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        retry_attempts: u32,
        limiter: RequestLimiter,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            timeout,
            retry_attempts,
            limiter,
            client: RwLock::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.api_base_url,
            &config.api_key,
            Duration::from_secs(config.http_timeout_seconds),
            config.retry_attempts,
            RequestLimiter::new(config.max_concurrent_requests),
        )
    }

    pub fn limiter_stats(&self) -> LimiterStats {
        self.limiter.stats()
    }

    /// Returns the pooled client, building it on first use.
    async fn http_client(&self) -> Result<Client, AppError> {
        if let Some(client) = self.client.read().await.as_ref() {
            return Ok(client.clone());
        }

        let mut slot = self.client.write().await;
        // Another task may have built it while we waited for the write lock
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        debug!("Creating HTTP client for {}", self.base_url);
        let client = create_http_client_with_timeout(self.timeout, &self.api_key)?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drops the pooled client and its idle connections. Returns whether one was open.
    pub async fn close(&self) -> bool {
        let closed = self.client.write().await.take().is_some();
        if closed {
            info!("Closed HTTP client for {}", self.base_url);
        }
        closed
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetches `path` with `query` and decodes the JSON body into `T`.
    ///
    /// Transient failures (429, 5xx, timeouts, refused connections) are retried
    /// with exponential backoff, honouring `Retry-After`.
    #[instrument(skip(self, query), fields(query = ?query))]
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let endpoint = self.endpoint(path);
        let url = describe_url(&endpoint, query);
        let client = self.http_client().await?;
        info!("Fetching data from URL: {url}");

        let mut attempt = 0u32;
        let mut backoff = Duration::from_millis(retry::BASE_DELAY_MS);
        let response_text = loop {
            let permit = self.limiter.acquire().await?;

            let response = match client.get(&endpoint).query(query).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    drop(permit);
                    let err = transport_error(e, &url);
                    if err.is_retryable() && attempt < self.retry_attempts {
                        warn!(
                            "Request error {} for {}. Retrying in {:?} (attempt {}/{})",
                            err,
                            url,
                            backoff,
                            attempt + 1,
                            self.retry_attempts
                        );
                        tokio::time::sleep(backoff).await;
                        attempt += 1;
                        backoff = backoff.saturating_mul(2);
                        continue;
                    }
                    error!("Request failed for URL {}: {}", url, err);
                    return Err(err);
                }
            };

            let status = response.status();
            debug!("Response status: {status}");

            if !status.is_success() {
                let reason = status.canonical_reason().unwrap_or("Unknown error");
                let err = AppError::from_status(status.as_u16(), reason, &url);

                if err.is_retryable() && attempt < self.retry_attempts {
                    let retry_after = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .map(|secs| Duration::from_secs(secs.min(retry::MAX_RETRY_AFTER_SECONDS)));
                    let wait = retry_after.unwrap_or(backoff);
                    drop(response);
                    drop(permit);
                    warn!(
                        "Transient {} from {}. Retrying in {:?} (attempt {}/{})",
                        status,
                        url,
                        wait,
                        attempt + 1,
                        self.retry_attempts
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    backoff = backoff.saturating_mul(2);
                    continue;
                }

                error!("HTTP {} - {} (URL: {})", status.as_u16(), reason, url);
                return Err(err);
            }

            match response.text().await {
                Ok(text) => break text,
                Err(e) => {
                    error!("Failed to read response text from URL {}: {}", url, e);
                    return Err(transport_error(e, &url));
                }
            }
        };

        debug!("Response length: {} bytes", response_text.len());
        parse_body(&response_text, &url)
    }

    /// Fetches a provider envelope and surfaces a non-empty `errors` field
    /// as [`AppError::ApiProviderError`].
    pub async fn fetch_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>, AppError> {
        let envelope: ApiEnvelope<T> = self.fetch_json(path, query).await?;
        if let Some(message) = envelope.error_message() {
            let url = describe_url(&self.endpoint(path), query);
            error!("Provider rejected request {}: {}", url, message);
            return Err(AppError::api_provider_error(message, url));
        }
        Ok(envelope)
    }
}

fn describe_url(endpoint: &str, query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return endpoint.to_string();
    }
    let params: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{endpoint}?{}", params.join("&"))
}

fn transport_error(e: reqwest::Error, url: &str) -> AppError {
    if e.is_timeout() {
        AppError::network_timeout(url)
    } else if e.is_connect() {
        AppError::network_connection(url, e.to_string())
    } else {
        AppError::ApiFetch(e)
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, url: &str) -> Result<T, AppError> {
    match serde_json::from_str::<T>(body) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            error!(
                "Response text (first 200 chars): {}",
                &body.chars().take(200).collect::<String>()
            );

            let trimmed = body.trim_start();
            if trimmed.is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                Err(AppError::api_malformed_json("Response is not valid JSON", url))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}
