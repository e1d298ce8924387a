//! Cache-aware fetching with bounded retry.
//!
//! [`Client::fetch`] answers from the cache when it can, otherwise calls upstream
//! through a [`seatbelt`] retry layer. Every failure, a 404 included, is retried with
//! a linearly growing delay until the retry budget runs out.

use super::client::Client;
use super::transport::{ApiRequest, ApiResult, Transport};
use super::QueryParams;
use crate::cache::Cache;
use core::fmt::{Display, Formatter};
use core::sync::atomic::{AtomicU32, Ordering};
use core::time::Duration;
use layered::{Execute, Service, Stack};
use ohno::{IntoAppError, app_err};
use seatbelt::retry::{Backoff, Retry};
use seatbelt::{RecoveryInfo, ResilienceContext};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tick::Clock;

const LOG_TARGET: &str = "     fetch";

const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// How failed upstream calls are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries on top of the first attempt.
    pub max_retries: u32,

    /// Delay before the first retry; the n-th retry waits `n * base_delay`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

/// Per-call overrides for [`Client::fetch_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Go upstream even when a fresh cache entry exists.
    pub skip_cache: bool,
    pub max_retries: u32,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            skip_cache: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Delay before retry number `attempt` (1-based).
#[must_use]
pub const fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    base_delay.saturating_mul(attempt)
}

/// Why a resilient fetch gave up.
#[derive(Debug)]
pub enum UpstreamError {
    /// The resource does not exist upstream.
    NotFound { endpoint: String },

    /// Every attempt failed.
    Exhausted {
        endpoint: String,
        attempts: u32,
        cause: ohno::AppError,
    },
}

impl UpstreamError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::NotFound { endpoint } | Self::Exhausted { endpoint, .. } => endpoint,
        }
    }
}

impl Display for UpstreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound { endpoint } => write!(f, "'{endpoint}' was not found"),
            Self::Exhausted { endpoint, attempts, cause } => {
                write!(f, "'{endpoint}' failed after {attempts} attempt(s): {cause}")
            }
        }
    }
}

impl core::error::Error for UpstreamError {}

/// Classify an upstream outcome for retry purposes.
///
/// Only a success ends the retry loop early. `delay` is the wait before the next attempt.
fn classify(result: &ApiResult<serde_json::Value>, delay: Duration) -> RecoveryInfo {
    match result {
        ApiResult::Success(..) => RecoveryInfo::never(),
        ApiResult::NotFound(_) | ApiResult::RateLimited(_) | ApiResult::Failed(..) => RecoveryInfo::retry().delay(delay),
    }
}

impl<T: Transport> Client<T> {
    /// Fetch `endpoint` using the client's default options.
    pub async fn fetch(&self, endpoint: &str, params: &QueryParams) -> Result<serde_json::Value, UpstreamError> {
        self.fetch_with(endpoint, params, self.fetch_options()).await
    }

    /// Fetch `endpoint` and decode the payload.
    pub async fn fetch_as<D: DeserializeOwned>(&self, endpoint: &str, params: &QueryParams) -> crate::Result<D> {
        let payload = self.fetch(endpoint, params).await?;
        serde_json::from_value(payload).into_app_err_with(|| format!("unexpected response shape from '{endpoint}'"))
    }

    /// Fetch `endpoint`, consulting the cache first unless `options.skip_cache` is set.
    ///
    /// Performs at most `options.max_retries + 1` upstream attempts. Successful
    /// payloads are cached on a best-effort basis. A 404 is reported as
    /// [`UpstreamError::NotFound`] once the retries are used up.
    pub async fn fetch_with(
        &self,
        endpoint: &str,
        params: &QueryParams,
        options: FetchOptions,
    ) -> Result<serde_json::Value, UpstreamError> {
        let key = Cache::key(endpoint, params);

        if !options.skip_cache
            && let Some(payload) = self.cache.get::<serde_json::Value>(&key)
        {
            return Ok(payload);
        }

        let request = ApiRequest {
            endpoint: endpoint.to_string(),
            params: params.clone(),
            authorization: self.credential.header(),
        };

        let attempts = Arc::new(AtomicU32::new(0));
        let base_delay = self.retry.base_delay;

        let clock = Clock::new_tokio();
        let context = ResilienceContext::new(&clock).name("upstream_fetch");

        let service = (
            Retry::layer("retry", &context)
                .clone_input()
                .recovery_with({
                    let attempts = Arc::clone(&attempts);
                    move |result: &ApiResult<serde_json::Value>, _| {
                        classify(result, backoff_delay(base_delay, attempts.load(Ordering::Relaxed)))
                    }
                })
                .max_retry_attempts(options.max_retries)
                .base_delay(base_delay)
                .backoff(Backoff::Linear)
                .on_retry(|_output, args| {
                    log::debug!(
                        target: LOG_TARGET,
                        "Retrying upstream call (attempt {}, delay {}ms)",
                        args.attempt().index() + 1,
                        args.retry_delay().as_millis(),
                    );
                }),
            Execute::new({
                let attempts = Arc::clone(&attempts);
                let transport = Arc::clone(&self.transport);
                let throttler = self.throttler.clone();
                move |request: ApiRequest| {
                    let attempts = Arc::clone(&attempts);
                    let transport = Arc::clone(&transport);
                    let throttler = throttler.clone();
                    async move {
                        let _ = attempts.fetch_add(1, Ordering::Relaxed);
                        let endpoint = request.endpoint.clone();

                        let result = {
                            let _permit = throttler.acquire().await;
                            transport.get(request).await
                        };

                        match &result {
                            ApiResult::RateLimited(rate_limit) => {
                                log::info!(target: LOG_TARGET, "Rate limited on '{endpoint}' ({rate_limit})");
                            }
                            ApiResult::NotFound(_) => log::debug!(target: LOG_TARGET, "'{endpoint}' not found"),
                            ApiResult::Success(..) | ApiResult::Failed(..) => {}
                        }

                        result
                    }
                }
            }),
        )
            .into_service();

        let result = service.execute(request).await;
        let attempts = attempts.load(Ordering::Relaxed);

        let cause = match result {
            ApiResult::Success(payload, rate_limit) => {
                if let Some(rate_limit) = rate_limit {
                    log::trace!(target: LOG_TARGET, "Rate limit after '{endpoint}': {rate_limit}");
                }
                let _ = self.cache.put(&key, &payload);
                return Ok(payload);
            }

            ApiResult::NotFound(_) => {
                return Err(UpstreamError::NotFound {
                    endpoint: endpoint.to_string(),
                });
            }

            ApiResult::RateLimited(rate_limit) => app_err!("rate limited ({rate_limit})"),
            ApiResult::Failed(e, _) => e,
        };

        log::debug!(target: LOG_TARGET, "Giving up on '{endpoint}' after {attempts} attempt(s): {cause:#}");
        Err(UpstreamError::Exhausted {
            endpoint: endpoint.to_string(),
            attempts,
            cause,
        })
    }
}
