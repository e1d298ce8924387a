//! The hosting client context object.

use super::credential::{self, Credential};
use super::resilient_fetch::{FetchOptions, RetryPolicy};
use super::throttler::Throttler;
use super::transport::{ApiRequest, ApiResult, HttpTransport, Transport};
use super::QueryParams;
use crate::Result;
use crate::cache::{Cache, DEFAULT_CACHE_TTL};
use core::time::Duration;
use std::sync::Arc;

const LOG_TARGET: &str = "    client";

/// Default root of the GitHub REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

const DEFAULT_USER_AGENT: &str = "repo-pulse";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

/// Everything needed to build a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
    pub max_concurrent_requests: usize,
    pub token: Option<String>,

    /// Bypass fresh cache entries on every fetch. Successful responses are still cached.
    pub ignore_cache: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            retry: RetryPolicy::default(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            token: None,
            ignore_cache: false,
        }
    }
}

/// Context object for all upstream calls.
///
/// Owns the transport, the credential, the response cache, the throttler and the
/// retry policy. Facet fetchers and queries borrow it; nothing upstream-related lives
/// in global state.
#[derive(Debug)]
pub struct Client<T = HttpTransport> {
    pub(super) transport: Arc<T>,
    pub(super) cache: Cache,
    pub(super) credential: Credential,
    pub(super) throttler: Throttler,
    pub(super) retry: RetryPolicy,
    pub(super) ignore_cache: bool,
}

impl Client {
    /// Create a client talking HTTP to `settings.base_url`.
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let transport = HttpTransport::new(&settings.base_url, &settings.user_agent, settings.request_timeout)?;
        Self::with_transport(transport, settings)
    }
}

impl<T: Transport> Client<T> {
    /// Create a client on top of an arbitrary transport.
    pub fn with_transport(transport: T, settings: &ClientSettings) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(transport),
            cache: Cache::new(settings.cache_ttl),
            credential: Credential::new(settings.token.as_deref())?,
            throttler: Throttler::new(settings.max_concurrent_requests),
            retry: settings.retry,
            ignore_cache: settings.ignore_cache,
        })
    }

    /// Replace the bearer credential used by subsequent calls.
    ///
    /// An empty or absent token switches to unauthenticated access.
    pub fn set_credential(&self, token: Option<&str>) -> Result<()> {
        self.credential.set(token)
    }

    #[must_use]
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch options reflecting the client's defaults.
    #[must_use]
    pub const fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            skip_cache: self.ignore_cache,
            max_retries: self.retry.max_retries,
        }
    }

    /// Check whether `token` is accepted upstream.
    ///
    /// Calls `GET /user` once with the given token, bypassing both the cache and the
    /// retry loop. The client's own credential is left untouched.
    pub async fn validate_credential(&self, token: &str) -> bool {
        let authorization = match credential::authorization_value(token.trim()) {
            Ok(value) => value,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Token cannot be sent as a header: {e:#}");
                return false;
            }
        };

        let request = ApiRequest {
            endpoint: "/user".to_string(),
            params: QueryParams::new(),
            authorization: Some(authorization),
        };

        let _permit = self.throttler.acquire().await;
        match self.transport.get(request).await {
            ApiResult::Success(_, rate_limit) => {
                if let Some(rate_limit) = rate_limit {
                    log::debug!(target: LOG_TARGET, "Token accepted ({rate_limit})");
                }
                true
            }
            ApiResult::RateLimited(rate_limit) => {
                log::warn!(target: LOG_TARGET, "Rate limited while checking the token ({rate_limit})");
                false
            }
            ApiResult::NotFound(_) => false,
            ApiResult::Failed(e, _) => {
                log::debug!(target: LOG_TARGET, "Token rejected: {e:#}");
                false
            }
        }
    }
}
