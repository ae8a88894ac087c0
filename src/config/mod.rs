//! Service configuration loaded from CLI, environment, and files.
//!
//! This module merges values from command-line arguments, environment
//! variables, and configuration files using ortho-config's layered approach,
//! then validates them into [`ServiceSettings`].
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in service defaults
//! 2. **Configuration file** – `.comments-fetcher.toml` in current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `COMMENTS_FETCHER_BIND_ADDRESS`,
//!    `COMMENTS_FETCHER_SESSION_SECRET`, and so on
//! 4. **Command-line arguments** – `--bind-address`/`-b`, `--session-secret`
//!
//! # Configuration File
//!
//! ```toml
//! bind_address = "0.0.0.0:3000"
//! api_base = "https://api.github.com"
//! session_secret = "at-least-thirty-two-characters-long-secret"
//! production = true
//! max_pages = 10
//! per_page = 100
//! timeout_seconds = 60
//! ```

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use axum_extra::extract::cookie::Key;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::github::pagination::{
    DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_PAGES, FetchPolicy, MAX_PER_PAGE,
};

/// Address the server listens on when none is configured.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
/// GitHub REST API root used when none is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Shortest session secret accepted; cookie keys are derived from it.
pub const MIN_SESSION_SECRET_LEN: usize = 32;
/// Upper bound for `max_pages`.
pub const MAX_PAGE_CEILING: u64 = 100;

const DEVELOPMENT_SESSION_SECRET: &str = "insecure-default-for-development-only-change-me";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// ortho-config could not parse arguments or read a configuration file.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader error detail.
        message: String,
    },

    /// `bind_address` is not a socket address.
    #[error("invalid bind address: {value}")]
    InvalidBindAddress {
        /// Rejected value.
        value: String,
    },

    /// `api_base` is not an absolute HTTP(S) URL.
    #[error("invalid GitHub API base URL: {value}")]
    InvalidApiBase {
        /// Rejected value.
        value: String,
    },

    /// Production mode was requested without a session secret.
    #[error("session_secret is required in production")]
    MissingSessionSecret,

    /// The session secret is too short to derive cookie keys from.
    #[error("session_secret must be at least {MIN_SESSION_SECRET_LEN} bytes")]
    WeakSessionSecret,

    /// `max_pages` is outside `1..=100`.
    #[error("max_pages must be between 1 and {MAX_PAGE_CEILING}, got {value}")]
    InvalidMaxPages {
        /// Rejected value.
        value: u64,
    },

    /// `per_page` is outside `1..=100`.
    #[error("per_page must be between 1 and {MAX_PER_PAGE}, got {value}")]
    InvalidPerPage {
        /// Rejected value.
        value: u64,
    },

    /// `timeout_seconds` is zero.
    #[error("timeout_seconds must be greater than zero")]
    InvalidTimeout,

    /// The outbound HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    HttpClient {
        /// reqwest error detail.
        message: String,
    },
}

/// Service configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use comments_fetcher::ServiceConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = ServiceConfig::load().expect("failed to load configuration");
/// let settings = config.validate().expect("invalid configuration");
/// assert!(settings.bind_address.port() > 0);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "COMMENTS_FETCHER",
    discovery(
        dotfile_name = ".comments-fetcher.toml",
        config_file_name = "comments-fetcher.toml",
        app_name = "comments-fetcher"
    )
)]
pub struct ServiceConfig {
    /// Socket address the HTTP server binds to.
    ///
    /// Can be provided via:
    /// - CLI: `--bind-address <ADDR>` or `-b <ADDR>`
    /// - Environment: `COMMENTS_FETCHER_BIND_ADDRESS`
    /// - Config file: `bind_address = "..."`
    #[ortho_config(cli_short = 'b')]
    pub bind_address: Option<String>,

    /// Root of the GitHub REST API, for GitHub Enterprise or tests.
    ///
    /// Defaults to `https://api.github.com`.
    #[ortho_config()]
    pub api_base: Option<String>,

    /// Secret the private cookie key is derived from.
    ///
    /// Required when `production` is set. Outside production a fixed
    /// development secret is used and a warning is logged.
    #[ortho_config()]
    pub session_secret: Option<String>,

    /// Enables production behaviour: secure cookies and a mandatory secret.
    ///
    /// Can be provided via:
    /// - CLI: `--production`
    /// - Config file: `production = true`
    ///
    /// Note: `COMMENTS_FETCHER_PRODUCTION` is not read because `ortho_config`
    /// does not load boolean values from the environment.
    #[ortho_config()]
    pub production: bool,

    /// Most pages fetched for one pull request.
    #[ortho_config()]
    pub max_pages: u64,

    /// Page size requested from GitHub.
    #[ortho_config()]
    pub per_page: u64,

    /// Deadline for one complete multi-page fetch, in seconds.
    #[ortho_config()]
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: None,
            api_base: None,
            session_secret: None,
            production: false,
            max_pages: u64::from(DEFAULT_MAX_PAGES),
            per_page: u64::from(MAX_PER_PAGE),
            timeout_seconds: DEFAULT_FETCH_TIMEOUT.as_secs(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from CLI, environment, and files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when ortho-config fails to parse
    /// arguments or load configuration files.
    pub fn load_layers() -> Result<Self, ConfigError> {
        Self::load().map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
    }

    /// Validates every field and resolves defaults.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking fields in
    /// declaration order.
    pub fn validate(&self) -> Result<ServiceSettings, ConfigError> {
        let bind_address = self.resolve_bind_address()?;
        let api_base = self.resolve_api_base()?;
        let session_secret = self.resolve_session_secret()?;
        let fetch_policy = self.resolve_fetch_policy()?;

        Ok(ServiceSettings {
            bind_address,
            api_base,
            session_secret,
            secure_cookies: self.production,
            fetch_policy,
        })
    }

    fn resolve_bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS);
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress {
                value: value.to_owned(),
            })
    }

    fn resolve_api_base(&self) -> Result<Url, ConfigError> {
        let value = self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE);
        let invalid = || ConfigError::InvalidApiBase {
            value: value.to_owned(),
        };
        let url = Url::parse(value.trim()).map_err(|_| invalid())?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        Ok(url)
    }

    fn resolve_session_secret(&self) -> Result<SessionSecret, ConfigError> {
        match self.session_secret.as_deref() {
            Some(secret) if secret.len() < MIN_SESSION_SECRET_LEN => {
                Err(ConfigError::WeakSessionSecret)
            }
            Some(secret) => Ok(SessionSecret(secret.to_owned())),
            None if self.production => Err(ConfigError::MissingSessionSecret),
            None => {
                tracing::warn!(
                    "no session_secret configured; using the insecure development secret"
                );
                Ok(SessionSecret(DEVELOPMENT_SESSION_SECRET.to_owned()))
            }
        }
    }

    fn resolve_fetch_policy(&self) -> Result<FetchPolicy, ConfigError> {
        let max_pages = u32::try_from(self.max_pages)
            .ok()
            .filter(|pages| (1..=MAX_PAGE_CEILING).contains(&u64::from(*pages)))
            .ok_or(ConfigError::InvalidMaxPages {
                value: self.max_pages,
            })?;
        let per_page = u8::try_from(self.per_page)
            .ok()
            .filter(|size| (1..=MAX_PER_PAGE).contains(size))
            .ok_or(ConfigError::InvalidPerPage {
                value: self.per_page,
            })?;
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(FetchPolicy::new(
            max_pages,
            per_page,
            Duration::from_secs(self.timeout_seconds),
        ))
    }
}

/// Secret material for the private cookie jar.
///
/// The `Debug` implementation never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSecret(String);

impl SessionSecret {
    /// Derives the signing and encryption key for session cookies.
    #[must_use]
    pub fn cookie_key(&self) -> Key {
        Key::derive_from(self.0.as_bytes())
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(<redacted>)")
    }
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Address the HTTP server binds to.
    pub bind_address: SocketAddr,
    /// Root of the GitHub REST API.
    pub api_base: Url,
    /// Secret the cookie key is derived from.
    pub session_secret: SessionSecret,
    /// Whether session cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// Page ceiling, page size, and deadline for comment fetches.
    pub fetch_policy: FetchPolicy,
}

#[cfg(test)]
mod tests;
