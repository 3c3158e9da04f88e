//! Transport-level error types and retry classification.

/// Transport-level error conditions.
///
/// These cover everything that can go wrong between issuing an HTTP request
/// and receiving a parseable JSON body: the operation layers above never see
/// a half-delivered response, only one of these kinds.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TransportErrorKind {
    /// The request exceeded the configured timeout
    #[display("request exceeded the configured timeout")]
    Timeout,
    /// The connection could not be established
    #[display("connection refused: {}", _0)]
    ConnectionRefused(String),
    /// The server answered with a non-success HTTP status
    #[display("HTTP status {}", _0)]
    HttpStatus(u16),
    /// The response body was not the expected JSON shape
    #[display("malformed response: {}", _0)]
    Malformed(String),
}

impl TransportErrorKind {
    /// Check if this error condition should be retried.
    ///
    /// Connection-level failures and the transient status codes (429, 500,
    /// 502, 503, 504) are retryable. Timeouts are terminal: a call that has
    /// run out its time budget fails regardless of retry budget remaining.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportErrorKind::HttpStatus(status) => {
                matches!(*status, 429 | 500 | 502 | 503 | 504)
            }
            TransportErrorKind::ConnectionRefused(_) => true,
            TransportErrorKind::Timeout | TransportErrorKind::Malformed(_) => false,
        }
    }
}

/// Transport error with source location tracking.
///
/// # Examples
///
/// ```
/// use orchestrall_error::{TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::HttpStatus(503));
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    /// The kind of error that occurred
    pub kind: TransportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TransportError {
    /// Create a new TransportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The HTTP status code carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            TransportErrorKind::HttpStatus(status) => Some(status),
            _ => None,
        }
    }
}

/// Trait for errors that support retry logic.
///
/// This trait allows error types to specify whether they should trigger a
/// retry and what retry strategy parameters to use.
///
/// # Examples
///
/// ```
/// use orchestrall_error::{RetryableError, TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::HttpStatus(503));
/// assert!(err.is_retryable());
///
/// let err = TransportError::new(TransportErrorKind::Timeout);
/// assert!(!err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503 (service unavailable), 429 (rate limit),
    /// or refused connections should return true. Permanent errors like 401
    /// (unauthorized) or 400 (bad request) should return false.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    /// Default implementation returns standard parameters; the transport
    /// session overrides the retry count with its configured budget.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (500, 3, 30)
    }
}

impl RetryableError for TransportError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
