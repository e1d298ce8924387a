use crate::Result;
use reqwest::header::HeaderValue;
use std::sync::{PoisonError, RwLock};

const LOG_TARGET: &str = "credential";

/// The bearer credential sent with every upstream call.
///
/// Holds the prepared `Authorization` header value rather than the raw token, so
/// the header is rewired the moment the credential changes. An empty or absent
/// token removes the header entirely.
#[derive(Debug, Default)]
pub struct Credential {
    header: RwLock<Option<HeaderValue>>,
}

impl Credential {
    pub fn new(token: Option<&str>) -> Result<Self> {
        let credential = Self::default();
        credential.set(token)?;
        Ok(credential)
    }

    /// Replace the current credential.
    ///
    /// Fails only when the token contains characters that cannot appear in an HTTP
    /// header; the previous credential is kept in that case.
    pub fn set(&self, token: Option<&str>) -> Result<()> {
        let header = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(authorization_value)
            .transpose()?;

        if header.is_some() {
            log::debug!(target: LOG_TARGET, "Using an authenticated connection");
        } else {
            log::debug!(target: LOG_TARGET, "Using an unauthenticated connection");
        }

        *self.header.write().unwrap_or_else(PoisonError::into_inner) = header;
        Ok(())
    }

    /// The `Authorization` header value for the next request, if any.
    #[must_use]
    pub fn header(&self) -> Option<HeaderValue> {
        self.header.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.header.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

/// Build the sensitive `Authorization: token <value>` header value.
pub(crate) fn authorization_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("token {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}
