//! HTTP client for the episode API.

use std::sync::Arc;
use std::time::Duration;

use chrono::Locale;
use dashmap::DashMap;
use podcastr_core::{Error, HttpError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use url::Url;

/// Default API location (the json-server the web front end was built against).
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Maximum number of attempts per request.
const MAX_RETRIES: u32 = 3;

/// Cache entry with expiration.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: std::time::Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: std::time::Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        std::time::Instant::now() >= self.expires_at
    }
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    /// Base delay for exponential backoff between attempts.
    pub retry_base_delay: Duration,
    /// Locale used to format publish dates.
    pub locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(300),
            retry_base_delay: Duration::from_millis(500),
            locale: Locale::pt_BR,
        }
    }
}

/// Read-only client for the episode list and detail endpoints.
#[derive(Clone)]
pub struct EpisodesClient {
    http: reqwest::Client,
    base_url: Url,
    pub(crate) locale: Locale,
    cache: Arc<DashMap<String, CacheEntry<Vec<u8>>>>,
    cache_ttl: Duration,
    retry_base_delay: Duration,
}

impl EpisodesClient {
    /// Create a client for `base_url` with default settings.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut base_url = Url::parse(config.base_url.trim())
            .map_err(|e| Error::Http(HttpError::InvalidUrl(format!("{}: {e}", config.base_url))))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Http(HttpError::InvalidUrl(format!(
                "{} is not an http(s) base url",
                config.base_url
            ))));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("Podcastr/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            locale: config.locale,
            cache: Arc::new(DashMap::new()),
            cache_ttl: config.cache_ttl,
            retry_base_delay: config.retry_base_delay,
        })
    }

    /// The normalized base URL (always ends with `/`).
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Http(HttpError::InvalidUrl(self.base_url.to_string())))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` with `query` and decode the JSON body.
    pub(crate) async fn get<R>(&self, url: Url, query: &[(&str, String)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let cache_key = self.cache_key(&url, query);

        if let Some(cached) = self.get_cached(&cache_key) {
            debug!("Cache hit for {url}");
            return serde_json::from_slice(&cached).map_err(|e| Error::Parse(e.to_string()));
        }

        let mut last_error = None;
        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(attempt - 1);
                tokio::time::sleep(delay).await;
                debug!("Retry attempt {attempt} for {url} after {delay:?}");
            }

            match self.do_request(&url, query).await {
                Ok(body) => {
                    let parsed = serde_json::from_slice(&body)
                        .map_err(|e| Error::Parse(format!("Failed to parse response: {e}")))?;
                    self.set_cached(cache_key, body);
                    return Ok(parsed);
                }
                Err(e) => {
                    warn!("Request to {url} failed (attempt {attempt}): {e}");
                    if !e.is_retryable() {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Network("Request failed".to_string())))
    }

    async fn do_request(&self, url: &Url, query: &[(&str, String)]) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Http(HttpError::Timeout)
                } else if e.is_connect() {
                    Error::Http(HttpError::ConnectionFailed(e.to_string()))
                } else {
                    Error::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Http(HttpError::StatusError {
                status: status.as_u16(),
                message,
            }));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| Error::Network(format!("Failed to read response body: {e}")))
    }

    fn cache_key(&self, url: &Url, query: &[(&str, String)]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_str().as_bytes());
        for (name, value) in query {
            hasher.update(b"&");
            hasher.update(name.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    fn get_cached(&self, key: &str) -> Option<Vec<u8>> {
        let entry = self.cache.get(key)?;
        if entry.is_expired() {
            drop(entry);
            self.cache.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn set_cached(&self, key: String, value: Vec<u8>) {
        if self.cache_ttl.is_zero() {
            return;
        }
        self.cache.insert(key, CacheEntry::new(value, self.cache_ttl));

        if self.cache.len() > 100 {
            self.cache.retain(|_, entry| !entry.is_expired());
        }
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Get the number of cached entries.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = EpisodesClient::new("http://localhost:3333").unwrap();
        assert_eq!(client.cache_size(), 0);
        assert_eq!(client.base_url().as_str(), "http://localhost:3333/");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            EpisodesClient::new("not a url"),
            Err(Error::Http(HttpError::InvalidUrl(_)))
        ));
        assert!(EpisodesClient::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes() {
        let client = EpisodesClient::new("https://example.com/api").unwrap();
        let url = client.endpoint(&["episodes", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/episodes/a%20b%2Fc");
    }

    #[test]
    fn test_cache_key_generation() {
        let client = EpisodesClient::new("http://localhost:3333").unwrap();
        let url = client.endpoint(&["episodes"]).unwrap();
        let key1 = client.cache_key(&url, &[("_limit", "12".to_string())]);
        let key2 = client.cache_key(&url, &[("_limit", "2".to_string())]);
        let key3 = client.cache_key(&url, &[("_limit", "12".to_string())]);

        assert_ne!(key1, key2);
        assert_eq!(key1, key3);
    }
}
