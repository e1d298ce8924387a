//! An in-memory response cache with TTL-aware loading.
//!
//! [`Cache`] maps a request fingerprint to a JSON snapshot of the payload and the
//! time it was captured. Entries are never swept; staleness is checked on read.
//! Clones share the same underlying store.

use chrono::{DateTime, Utc};
use core::time::Duration;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const LOG_TARGET: &str = "     cache";

/// Default freshness window for cached responses.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_hours(1);

/// A captured payload.
#[derive(Debug, Clone)]
struct Envelope {
    timestamp: DateTime<Utc>,
    payload: serde_json::Value,
}

/// A TTL-aware, process-wide JSON cache.
#[derive(Debug, Clone)]
pub struct Cache {
    entries: Arc<Mutex<HashMap<String, Envelope>>>,
    ttl: Duration,
}

impl Cache {
    /// Create a new empty cache with the given freshness window.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the freshness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Build the cache key for an endpoint and its query parameters.
    ///
    /// The parameters are serialized in key order so the same parameter set always
    /// yields the same key.
    #[must_use]
    pub fn key(endpoint: &str, params: &crate::hosting::QueryParams) -> String {
        let params = serde_json::to_string(params).unwrap_or_default();
        format!("{endpoint}:{params}")
    }

    /// Load a fresh entry.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    /// Load an entry that is fresh as of `now`.
    ///
    /// Stale or undecodable entries are reported as a miss.
    #[must_use]
    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let payload = {
            let entries = self.lock();
            let Some(envelope) = entries.get(key) else {
                log::debug!(target: LOG_TARGET, "Cache miss for {key}");
                return None;
            };

            if !self.is_envelope_fresh(envelope, now) {
                log::debug!(target: LOG_TARGET, "Cache expired for {key} (captured at {})", envelope.timestamp);
                return None;
            }

            envelope.payload.clone()
        };

        match serde_json::from_value(payload) {
            Ok(data) => {
                log::debug!(target: LOG_TARGET, "Cache hit for {key}");
                Some(data)
            }
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for {key}: {e:#}");
                None
            }
        }
    }

    /// Store a snapshot of `data` under `key`, captured now.
    ///
    /// Returns `false` when the payload could not be snapshotted, in which case nothing
    /// is stored.
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> bool {
        self.put_at(key, data, Utc::now())
    }

    /// Store a snapshot of `data` under `key` with an explicit capture time.
    pub fn put_at<T: Serialize + ?Sized>(&self, key: &str, data: &T, captured_at: DateTime<Utc>) -> bool {
        let payload = match serde_json::to_value(data) {
            Ok(payload) => payload,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Could not snapshot payload for {key}, not caching: {e:#}");
                return false;
            }
        };

        let envelope = Envelope {
            timestamp: captured_at,
            payload,
        };

        let _ = self.lock().insert(key.to_string(), envelope);
        true
    }

    /// Whether an entry exists for `key` and is still fresh.
    #[must_use]
    pub fn is_fresh(&self, key: &str) -> bool {
        self.is_fresh_at(key, Utc::now())
    }

    /// Whether an entry exists for `key` and is fresh as of `now`.
    #[must_use]
    pub fn is_fresh_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.lock().get(key).is_some_and(|envelope| self.is_envelope_fresh(envelope, now))
    }

    /// Number of stored entries, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_envelope_fresh(&self, envelope: &Envelope, now: DateTime<Utc>) -> bool {
        // Future timestamps (clock skew) are treated as fresh
        let age = now.signed_duration_since(envelope.timestamp);
        age.num_milliseconds() < 0 || age.to_std().unwrap_or(Duration::MAX) < self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Envelope>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
