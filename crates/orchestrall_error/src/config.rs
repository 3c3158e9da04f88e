//! Configuration error types.

/// Configuration error conditions.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// No API key in the configuration or the environment
    #[display("no API key configured (set ORCHESTRALL_API_KEY or [session] api_key)")]
    MissingCredential,
    /// The configured timeout is zero
    #[display("timeout must be greater than zero")]
    InvalidTimeout,
    /// The base URL could not be parsed or used
    #[display("invalid base URL: {}", _0)]
    InvalidBaseUrl(String),
    /// A configuration source could not be read
    #[display("failed to read configuration: {}", _0)]
    Read(String),
    /// A configuration source could not be parsed
    #[display("failed to parse configuration: {}", _0)]
    Parse(String),
    /// A builder was missing a required field
    #[display("builder error: {}", _0)]
    Builder(String),
}

/// Configuration error with source location tracking.
///
/// # Examples
///
/// ```
/// use orchestrall_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::InvalidTimeout);
/// assert!(format!("{}", err).contains("greater than zero"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Config Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    /// The kind of error that occurred
    pub kind: ConfigErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
