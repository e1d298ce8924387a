use crate::Result;
use crate::hosting::{ClientSettings, DEFAULT_API_BASE_URL, RetryPolicy};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "repo-pulse.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root of the hosting API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How long a successful response stays fresh in the cache
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Retries on top of the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_delay", with = "humantime_serde")]
    pub retry_base_delay: Duration,

    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Repositories per page of search results
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    "repo-pulse".to_string()
}

const fn default_cache_ttl() -> Duration {
    Duration::from_hours(1)
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_retry_base_delay() -> Duration {
    Duration::from_secs(1)
}

const fn default_max_concurrent_requests() -> usize {
    8
}

const fn default_per_page() -> u32 {
    10
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `repo-pulse.toml` in the current directory is used
    /// when present.
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading repo-pulse configuration file '{path}'"))?;
            (path.to_path_buf(), text)
        } else {
            let path = Utf8PathBuf::from(DEFAULT_CONFIG_FILE);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading repo-pulse configuration file '{path}'")),
            }
        };

        Self::parse(&text).map_err(|e| e.enrich_with(|| format!("loading configuration file '{final_path}'")))
    }

    /// Parse and validate configuration text
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).into_app_err("parsing configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Client settings for this configuration
    #[must_use]
    pub fn client_settings(&self, token: Option<&str>, ignore_cache: bool) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            user_agent: self.user_agent.clone(),
            request_timeout: self.request_timeout,
            cache_ttl: self.cache_ttl,
            retry: RetryPolicy {
                max_retries: self.max_retries,
                base_delay: self.retry_base_delay,
            },
            max_concurrent_requests: self.max_concurrent_requests,
            token: token.map(str::to_string),
            ignore_cache,
        }
    }

    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url).into_app_err_with(|| format!("api_base_url '{}' is not a valid URL", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(app_err!("api_base_url must use http or https, got '{}'", url.scheme()));
        }

        if self.user_agent.trim().is_empty() {
            return Err(app_err!("user_agent must not be empty"));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.max_concurrent_requests == 0 {
            return Err(app_err!("max_concurrent_requests must be at least 1"));
        }

        if !(1..=100).contains(&self.per_page) {
            return Err(app_err!("per_page must be between 1 and 100, got {}", self.per_page));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
            cache_ttl: default_cache_ttl(),
            request_timeout: default_request_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay: default_retry_base_delay(),
            max_concurrent_requests: default_max_concurrent_requests(),
            per_page: default_per_page(),
        }
    }
}
