//! A single classified HTTP exchange with the hosting API.

use super::QueryParams;
use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use core::time::Duration;
use ohno::app_err;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};

const LOG_TARGET: &str = " transport";

/// Media type requested from the GitHub REST API.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// One upstream GET request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Path relative to the API base URL, starting with `/`.
    pub endpoint: String,
    pub params: QueryParams,
    /// The `Authorization` header to send, if any.
    pub authorization: Option<HeaderValue>,
}

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

impl Display for RateLimitInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} remaining, resets at {}", self.remaining, self.reset_at.format("%T"))
    }
}

/// Result of a hosting API call
#[derive(Debug)]
pub enum ApiResult<T> {
    /// Request succeeded - contains data and optional rate limit info
    Success(T, Option<RateLimitInfo>),

    /// Rate limited - the quota resets at the given time
    RateLimited(RateLimitInfo),

    /// The requested resource was not found (404)
    NotFound(Option<RateLimitInfo>),

    /// Request failed
    Failed(ohno::AppError, Option<RateLimitInfo>),
}

impl<T> ApiResult<T> {
    /// Rate limit info carried by this result, if any.
    #[must_use]
    pub const fn rate_limit(&self) -> Option<RateLimitInfo> {
        match self {
            Self::Success(_, rate_limit) | Self::NotFound(rate_limit) | Self::Failed(_, rate_limit) => *rate_limit,
            Self::RateLimited(rate_limit) => Some(*rate_limit),
        }
    }
}

/// Performs one upstream exchange and classifies the outcome.
///
/// Implementations never retry and never cache; [`Client`](super::Client) layers
/// both on top.
pub trait Transport: Send + Sync + 'static {
    fn get(&self, request: ApiRequest) -> impl Future<Output = ApiResult<serde_json::Value>> + Send;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the API rooted at `base_url`.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL for this transport
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn get(&self, request: ApiRequest) -> ApiResult<serde_json::Value> {
        let url = format!("{}{}", self.base_url, request.endpoint);

        let mut builder = self.client.get(&url).query(&request.params);
        if let Some(authorization) = request.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }

        let resp = match builder.send().await {
            Ok(r) => r,
            Err(e) => return ApiResult::Failed(e.into(), None),
        };

        // Extract rate limit info from response headers before checking status
        let rate_limit = extract_rate_limit_from_headers(resp.headers());
        let status = resp.status();
        log::trace!(target: LOG_TARGET, "GET {url} -> {status}");

        // GitHub answers 202 while repository statistics are still being computed;
        // the body is a placeholder that must not be treated as data.
        if status == StatusCode::ACCEPTED {
            return ApiResult::Failed(app_err!("'{}' is still being computed upstream", request.endpoint), rate_limit);
        }

        if status.is_success() {
            return match resp.json().await {
                Ok(body) => ApiResult::Success(body, rate_limit),
                Err(e) => ApiResult::Failed(e.into(), rate_limit),
            };
        }

        classify_failure(status, rate_limit, Utc::now(), || match resp.error_for_status() {
            Err(e) => e.into(),
            Ok(_) => app_err!("unexpected HTTP status {status} for '{}'", request.endpoint),
        })
    }
}

/// Classify a non-successful status code.
fn classify_failure<T>(
    status: StatusCode,
    rate_limit: Option<RateLimitInfo>,
    now: DateTime<Utc>,
    error: impl FnOnce() -> ohno::AppError,
) -> ApiResult<T> {
    match status.as_u16() {
        // Rate limited - use rate limit info from headers or default to 1 hour
        403 | 429 => ApiResult::RateLimited(rate_limit.unwrap_or_else(|| RateLimitInfo {
            remaining: 0,
            reset_at: now + chrono::Duration::hours(1),
        })),
        404 => ApiResult::NotFound(rate_limit),
        _ => ApiResult::Failed(error(), rate_limit),
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;

    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(RateLimitInfo { remaining, reset_at })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_rate_limit_from_headers() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert("x-ratelimit-remaining", HeaderValue::from_static("4999"));
        let _ = headers.insert("x-ratelimit-reset", HeaderValue::from_static("1704067200"));

        let rate_limit = extract_rate_limit_from_headers(&headers).unwrap();

        assert_eq!(rate_limit.remaining, 4999);
        assert_eq!(rate_limit.reset_at.timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_extract_rate_limit_missing_headers() {
        let headers = HeaderMap::new();
        assert!(extract_rate_limit_from_headers(&headers).is_none());
    }

    #[test]
    fn test_extract_rate_limit_invalid_remaining() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert("x-ratelimit-remaining", HeaderValue::from_static("invalid"));
        let _ = headers.insert("x-ratelimit-reset", HeaderValue::from_static("1704067200"));

        assert!(extract_rate_limit_from_headers(&headers).is_none());
    }

    #[test]
    fn test_classify_not_found() {
        let result: ApiResult<()> = classify_failure(StatusCode::NOT_FOUND, None, Utc::now(), || app_err!("unused"));
        assert!(matches!(result, ApiResult::NotFound(None)));
    }

    #[test]
    fn test_classify_rate_limited_defaults_to_one_hour() {
        let now = Utc::now();
        let result: ApiResult<()> = classify_failure(StatusCode::FORBIDDEN, None, now, || app_err!("unused"));

        match result {
            ApiResult::RateLimited(info) => {
                assert_eq!(info.remaining, 0);
                assert_eq!(info.reset_at, now + chrono::Duration::hours(1));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_rate_limited_keeps_header_info() {
        let info = RateLimitInfo {
            remaining: 0,
            reset_at: DateTime::from_timestamp(1_704_067_200, 0).unwrap(),
        };
        let result: ApiResult<()> = classify_failure(StatusCode::TOO_MANY_REQUESTS, Some(info), Utc::now(), || app_err!("unused"));

        assert_eq!(result.rate_limit(), Some(info));
    }

    #[test]
    fn test_classify_server_error_is_failed() {
        let result: ApiResult<()> = classify_failure(StatusCode::BAD_GATEWAY, None, Utc::now(), || app_err!("bad gateway"));
        assert!(matches!(result, ApiResult::Failed(_, None)));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetSystemTimePreciseAsFileTime")]
    fn test_transport_trims_base_url() {
        let transport = HttpTransport::new("https://api.github.com/", "repo-pulse", Duration::from_secs(10)).unwrap();
        assert_eq!(transport.base_url(), "https://api.github.com");
    }

    #[test]
    fn test_rate_limit_display() {
        let info = RateLimitInfo {
            remaining: 42,
            reset_at: DateTime::from_timestamp(1_704_067_200, 0).unwrap(),
        };
        assert_eq!(info.to_string(), "42 remaining, resets at 00:00:00");
    }
}
