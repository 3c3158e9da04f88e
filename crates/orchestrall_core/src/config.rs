//! Session configuration and `orchestrall.toml` loading.

use config::{Config, File, FileFormat};
use derive_builder::Builder;
use derive_getters::Getters;
use orchestrall_error::{ConfigError, ConfigErrorKind, OrchestrallResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default number of attempts per request, including the first.
pub const DEFAULT_RETRIES: usize = 3;
/// Environment variable consulted for the API key before the config file.
pub const API_KEY_VAR: &str = "ORCHESTRALL_API_KEY";
/// Header carrying the API key on every request, HTTP and WebSocket alike.
pub const API_KEY_HEADER: &str = "X-API-Key";

const DEFAULT_BASE_URL: &str = "https://api.orchestrall.com";
const DEFAULT_CONFIG: &str = include_str!("../../../orchestrall.toml");

/// Connection settings for a single Orchestrall session.
///
/// Every transport in the SDK is constructed from one of these.  The
/// `timeout` bounds each individual request attempt, and `retries` is the
/// total number of attempts made for a retryable failure, including the
/// first.
///
/// ```
/// use orchestrall_core::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::builder()
///     .base_url("https://api.orchestrall.com/")
///     .api_key("demo-key")
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url(), "https://api.orchestrall.com");
/// assert_eq!(*config.timeout(), Duration::from_secs(30));
/// assert_eq!(*config.retries(), 3);
/// ```
#[derive(Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into), build_fn(skip))]
pub struct SessionConfig {
    /// Base URL of the platform, stored without a trailing slash.
    base_url: String,
    /// API key sent as `X-API-Key` on every request.
    api_key: String,
    /// Timeout applied to each request attempt.
    timeout: Duration,
    /// Total attempts per request, including the first.
    retries: usize,
}

impl SessionConfig {
    /// Creates a builder for a session configuration.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .finish()
    }
}

impl SessionConfigBuilder {
    /// Validates the collected fields and produces a [`SessionConfig`].
    ///
    /// The base URL is normalized by stripping any trailing slashes.  A
    /// missing or empty API key, an empty base URL and a zero timeout are
    /// all rejected here rather than surfacing later as request failures.
    pub fn build(&self) -> Result<SessionConfig, ConfigError> {
        let raw_url = self.base_url.clone().ok_or_else(|| {
            ConfigError::new(ConfigErrorKind::Builder("base_url is required".to_string()))
        })?;
        let base_url = raw_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::InvalidBaseUrl(raw_url)));
        }
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::new(ConfigErrorKind::MissingCredential))?;
        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        if timeout.is_zero() {
            return Err(ConfigError::new(ConfigErrorKind::InvalidTimeout));
        }
        let retries = self.retries.unwrap_or(DEFAULT_RETRIES);
        Ok(SessionConfig {
            base_url,
            api_key,
            timeout,
            retries,
        })
    }
}

/// The `[session]` table of an `orchestrall.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SessionSettings {
    /// Base URL of the platform.
    base_url: String,
    /// API key, if the file provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    /// Per-attempt timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    /// Total attempts per request, including the first.
    #[serde(default = "default_retries")]
    retries: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_retries() -> usize {
    DEFAULT_RETRIES
}

/// Configuration loaded from `orchestrall.toml`.
///
/// Values are layered from three sources, later entries overriding earlier
/// ones: the defaults bundled with this crate, the user configuration at
/// `~/.config/orchestrall/orchestrall.toml`, and an `orchestrall.toml` in
/// the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct OrchestrallConfig {
    /// Session connection settings.
    #[serde(default)]
    session: SessionSettings,
}

impl OrchestrallConfig {
    /// Loads configuration from the standard locations.
    #[instrument]
    pub fn load() -> OrchestrallResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        if let Some(home) = dirs::home_dir() {
            let user_config = home
                .join(".config")
                .join("orchestrall")
                .join("orchestrall.toml");
            builder = builder.add_source(File::from(user_config).required(false));
        }
        builder = builder.add_source(File::with_name("orchestrall").required(false));
        let config = builder
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Read(e.to_string())))?;
        let loaded = config
            .try_deserialize::<Self>()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))?;
        debug!("loaded configuration for {}", loaded.session.base_url);
        Ok(loaded)
    }

    /// Loads configuration from a single file, which must exist.
    #[instrument(skip(path))]
    pub fn from_file(path: impl AsRef<Path>) -> OrchestrallResult<Self> {
        let path = path.as_ref();
        let config = Config::builder()
            .add_source(File::from(path))
            .build()
            .map_err(|e| {
                ConfigError::new(ConfigErrorKind::Read(format!("{}: {}", path.display(), e)))
            })?;
        let loaded = config.try_deserialize::<Self>().map_err(|e| {
            ConfigError::new(ConfigErrorKind::Parse(format!("{}: {}", path.display(), e)))
        })?;
        Ok(loaded)
    }

    /// Resolves these settings into a validated [`SessionConfig`].
    ///
    /// The [`API_KEY_VAR`] environment variable takes precedence over any
    /// key in the file, and a `.env` file in the working directory is
    /// honored when present.
    pub fn session_config(&self) -> OrchestrallResult<SessionConfig> {
        dotenvy::dotenv().ok();
        let mut builder = SessionConfig::builder();
        builder
            .base_url(self.session.base_url.as_str())
            .timeout(Duration::from_secs(self.session.timeout_secs))
            .retries(self.session.retries);
        if let Some(key) = std::env::var(API_KEY_VAR)
            .ok()
            .or_else(|| self.session.api_key.clone())
        {
            builder.api_key(key);
        }
        Ok(builder.build()?)
    }
}
