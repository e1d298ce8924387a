//! In-memory [`Transport`] replaying canned replies per endpoint.

use super::transport::{ApiRequest, ApiResult, RateLimitInfo, Transport};
use chrono::Utc;
use ohno::app_err;
use reqwest::header::HeaderValue;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum Reply {
    Ok(serde_json::Value),
    NotFound,
    RateLimited,
    /// Statistics still being computed upstream
    Accepted,
    Fail,
}

impl Reply {
    pub const fn ok(value: serde_json::Value) -> Self {
        Self::Ok(value)
    }

    fn into_result(self, endpoint: &str) -> ApiResult<serde_json::Value> {
        match self {
            Self::Ok(value) => ApiResult::Success(value, None),
            Self::NotFound => ApiResult::NotFound(None),
            Self::RateLimited => ApiResult::RateLimited(RateLimitInfo {
                remaining: 0,
                reset_at: Utc::now(),
            }),
            Self::Accepted => ApiResult::Failed(app_err!("'{endpoint}' is still being computed upstream"), None),
            Self::Fail => ApiResult::Failed(app_err!("scripted failure for '{endpoint}'"), None),
        }
    }
}

/// Replies are consumed in order; the last reply for an endpoint repeats forever.
/// Unscripted endpoints fail.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    log: Mutex<Vec<(ApiRequest, Instant)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn script(self, endpoint: &str, replies: Vec<Reply>) -> Self {
        let _ = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(endpoint.to_string(), replies.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).iter().map(|(_, at)| *at).collect()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    pub fn last_authorization(&self) -> Option<HeaderValue> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .and_then(|(request, _)| request.authorization.clone())
    }

    fn next_reply(&self, endpoint: &str) -> Reply {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        match routes.get_mut(endpoint) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Fail),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Fail),
            None => Reply::Fail,
        }
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, request: ApiRequest) -> ApiResult<serde_json::Value> {
        let reply = self.next_reply(&request.endpoint);
        let endpoint = request.endpoint.clone();
        self.log.lock().unwrap_or_else(PoisonError::into_inner).push((request, Instant::now()));
        reply.into_result(&endpoint)
    }
}
