//! Access to the repository-hosting API
//!
//! The [`Client`] is the context object for every upstream call: it owns the
//! transport, the bearer credential, the response cache, the concurrency throttler,
//! and the retry policy. All facet fetchers and queries go through
//! [`Client::fetch`], which layers cache lookup and bounded retry on top of a single
//! classified HTTP exchange performed by a [`Transport`].

mod api;
mod client;
mod credential;
mod resilient_fetch;
#[cfg(test)]
pub(crate) mod scripted;
mod throttler;
mod transport;

use std::collections::BTreeMap;

pub use api::{ContentEntry, ContentFile, Contributor, Event, LicenseItem, RepoItem, SearchResponse, WeeklyActivity};
pub use client::{Client, ClientSettings, DEFAULT_API_BASE_URL};
pub use credential::Credential;
pub use resilient_fetch::{FetchOptions, RetryPolicy, UpstreamError, backoff_delay};
pub use throttler::Throttler;
pub use transport::{ApiRequest, ApiResult, HttpTransport, RateLimitInfo, Transport};

/// Query parameters for an upstream call, kept in key order so that the same
/// parameter set always produces the same cache key.
pub type QueryParams = BTreeMap<String, String>;
