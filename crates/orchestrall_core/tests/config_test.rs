//! Tests for session configuration validation and file loading.

use orchestrall_core::{OrchestrallConfig, SessionConfig};
use orchestrall_error::{ConfigErrorKind, OrchestrallErrorKind};
use std::time::Duration;

#[test]
fn test_builder_applies_defaults() {
    let config = SessionConfig::builder()
        .base_url("https://api.orchestrall.com///")
        .api_key("key-123")
        .build()
        .unwrap();

    // Trailing slashes are stripped so path joins stay predictable
    assert_eq!(config.base_url(), "https://api.orchestrall.com");
    assert_eq!(*config.timeout(), Duration::from_secs(30));
    assert_eq!(*config.retries(), 3);
}

#[test]
fn test_builder_rejects_zero_timeout() {
    let err = SessionConfig::builder()
        .base_url("https://api.orchestrall.com")
        .api_key("key-123")
        .timeout(Duration::ZERO)
        .build()
        .unwrap_err();

    assert_eq!(err.kind, ConfigErrorKind::InvalidTimeout);
}

#[test]
fn test_builder_requires_api_key() {
    let err = SessionConfig::builder()
        .base_url("https://api.orchestrall.com")
        .build()
        .unwrap_err();
    assert_eq!(err.kind, ConfigErrorKind::MissingCredential);

    // An empty key is as useless as no key at all
    let err = SessionConfig::builder()
        .base_url("https://api.orchestrall.com")
        .api_key("")
        .build()
        .unwrap_err();
    assert_eq!(err.kind, ConfigErrorKind::MissingCredential);
}

#[test]
fn test_builder_rejects_empty_base_url() {
    let err = SessionConfig::builder()
        .base_url("/")
        .api_key("key-123")
        .build()
        .unwrap_err();
    assert!(matches!(err.kind, ConfigErrorKind::InvalidBaseUrl(_)));

    let err = SessionConfig::builder().api_key("key-123").build().unwrap_err();
    assert!(matches!(err.kind, ConfigErrorKind::Builder(_)));
}

#[test]
fn test_debug_redacts_api_key() {
    let config = SessionConfig::builder()
        .base_url("https://api.orchestrall.com")
        .api_key("super-secret")
        .build()
        .unwrap();

    let printed = format!("{config:?}");
    assert!(!printed.contains("super-secret"));
    assert!(printed.contains("<redacted>"));
}

#[test]
fn test_load_bundled_defaults() {
    let config = OrchestrallConfig::load().unwrap();

    assert_eq!(config.session().base_url(), "https://api.orchestrall.com");
    assert_eq!(*config.session().timeout_secs(), 30);
    assert_eq!(*config.session().retries(), 3);
}

#[test]
fn test_config_from_file() {
    use std::io::Write;
    use tempfile::Builder;

    let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        temp_file,
        r#"
[session]
base_url = "https://staging.orchestrall.example/"
api_key = "file-key"
timeout_secs = 5
retries = 2
"#
    )
    .unwrap();

    let config = OrchestrallConfig::from_file(temp_file.path()).unwrap();
    assert_eq!(
        config.session().base_url(),
        "https://staging.orchestrall.example/"
    );
    assert_eq!(config.session().api_key().as_deref(), Some("file-key"));

    let session = config.session_config().unwrap();
    assert_eq!(session.base_url(), "https://staging.orchestrall.example");
    assert_eq!(*session.timeout(), Duration::from_secs(5));
    assert_eq!(*session.retries(), 2);
}

#[test]
fn test_file_defaults_fill_missing_fields() {
    use std::io::Write;
    use tempfile::Builder;

    let mut temp_file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        temp_file,
        "[session]\nbase_url = \"https://api.orchestrall.com\"\n"
    )
    .unwrap();

    let config = OrchestrallConfig::from_file(temp_file.path()).unwrap();
    assert_eq!(*config.session().timeout_secs(), 30);
    assert_eq!(*config.session().retries(), 3);
    assert!(config.session().api_key().is_none());
}

#[test]
fn test_missing_file_is_a_read_error() {
    let err = OrchestrallConfig::from_file("/definitely/not/here/orchestrall.toml").unwrap_err();

    assert!(matches!(
        err.kind(),
        OrchestrallErrorKind::Config(config) if matches!(config.kind, ConfigErrorKind::Read(_))
    ));
}
