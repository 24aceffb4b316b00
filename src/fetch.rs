//! Resilient JSON fetching through CORS relays
//!
//! This module provides the `Fetcher`, which obtains a JSON document for a
//! URL by consulting the response cache, then either fetching directly or
//! walking the resolved relay order under a bounded attempt budget, with the
//! rate limiter protecting each relay from pathological looping.

use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::ResponseCache;
use crate::limiter::RateLimiter;
use crate::proxy::{builtin_templates, resolve_order, ProxySettings, ProxyTemplate};

/// Label recorded when a document was fetched without a relay
pub const DIRECT_LABEL: &str = "direct";

/// Attempt budget for one acquisition with proxying enabled
///
/// Two slots total, and the first relay always consumes one regardless of
/// its rate-limit outcome, so a rate-limited preferred relay leaves room for
/// exactly one real network attempt. Kept narrow on purpose: completeness is
/// traded for latency and politeness toward free public relays.
const MAX_ATTEMPT_SLOTS: usize = 2;

/// Timeout for direct requests
const DIRECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for each relay attempt
const RELAY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur while acquiring a JSON document
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or timeout error issuing a request
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    /// The response body is not valid JSON
    #[error("Failed to parse response as JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Every attempt in the budget was refused before any error was captured
    #[error("All CORS proxies failed")]
    AllProxiesFailed,
}

/// A successfully acquired document and where it came from
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The decoded JSON document
    pub data: Value,
    /// Relay label, [`DIRECT_LABEL`], or the cached origin label
    pub via: String,
}

/// Fetches JSON documents with caching, rate limiting, and relay fallback
///
/// One fetcher is shared by every card so the cache and limiter state are
/// process-wide. All parts are injectable for tests.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    templates: Vec<ProxyTemplate>,
    cache: ResponseCache,
    limiter: RateLimiter,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    /// Creates a fetcher with the built-in relay catalog and default cache
    /// and limiter settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            templates: builtin_templates(),
            cache: ResponseCache::new(),
            limiter: RateLimiter::new(),
        }
    }

    /// Replaces the relay catalog
    pub fn with_templates(mut self, templates: Vec<ProxyTemplate>) -> Self {
        self.templates = templates;
        self
    }

    /// Replaces the response cache
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the rate limiter
    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Acquires the JSON document behind `url`
    ///
    /// A fresh cache entry is returned without any network or rate-limit
    /// interaction. With proxying disabled a single direct GET is issued.
    /// Otherwise the resolved relay order is attempted within the slot
    /// budget; the first 2xx body is parsed, cached under the original URL
    /// with the relay's label, and returned. A parse failure after a 2xx is
    /// terminal. Exhaustion fails with the last captured error.
    pub async fn acquire(
        &self,
        url: &str,
        settings: &ProxySettings,
    ) -> Result<FetchOutcome, FetchError> {
        if let Some(hit) = self.cache.get(url) {
            debug!(url, via = %hit.proxy_used, "serving cached response");
            return Ok(FetchOutcome {
                data: hit.data,
                via: hit.proxy_used,
            });
        }

        let order = resolve_order(&self.templates, settings);
        if order.is_empty() {
            let data = self.get_json(url, DIRECT_TIMEOUT).await?;
            self.cache.put(url, data.clone(), DIRECT_LABEL);
            return Ok(FetchOutcome {
                data,
                via: DIRECT_LABEL.to_string(),
            });
        }

        let mut last_error: Option<FetchError> = None;

        for attempt in order.iter().take(MAX_ATTEMPT_SLOTS) {
            if !self.limiter.try_acquire(&attempt.label) {
                warn!(relay = %attempt.label, "relay rate limited, skipping");
                continue;
            }

            let relay_url = attempt.build_url(url);
            match self.get_json(&relay_url, RELAY_TIMEOUT).await {
                Ok(data) => {
                    debug!(relay = %attempt.label, "fetched through relay");
                    self.cache.put(url, data.clone(), &attempt.label);
                    return Ok(FetchOutcome {
                        data,
                        via: attempt.label.clone(),
                    });
                }
                Err(err @ FetchError::Parse(_)) => {
                    // a response was obtained, stop trying other relays
                    return Err(err);
                }
                Err(err) => {
                    warn!(relay = %attempt.label, error = %err, "relay attempt failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::AllProxiesFailed))
    }

    /// Issues one GET and decodes the body as JSON
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
