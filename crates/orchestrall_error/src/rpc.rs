//! RPC and protocol error types for the MCP layer.

/// Error reported by the server in the `error` field of an RPC response.
///
/// Code and message are taken verbatim from the server payload.
///
/// # Examples
///
/// ```
/// use orchestrall_error::RpcError;
///
/// let err = RpcError::new(-32601, "Method not found");
/// assert!(format!("{}", err).contains("-32601"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("RPC Error {}: {} at line {} in {}", code, message, line, file)]
pub struct RpcError {
    /// Server-provided error code
    pub code: i64,
    /// Server-provided error message
    pub message: String,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl RpcError {
    /// Create a new RpcError at the current location.
    #[track_caller]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            code,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Protocol violations in the RPC exchange.
///
/// Distinct from [`RpcError`]: the server answered, but the answer breaks the
/// correlation contract. These indicate a client/server desynchronization
/// bug, not a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ProtocolErrorKind {
    /// The response id does not match the request id
    #[display("correlation id mismatch: sent {}, received {}", sent, received)]
    IdMismatch {
        /// The id attached to the request
        sent: String,
        /// The id echoed by the server
        received: String,
    },
}

/// Protocol error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Protocol Error: {} at line {} in {}", kind, line, file)]
pub struct ProtocolError {
    /// The kind of violation that occurred
    pub kind: ProtocolErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl ProtocolError {
    /// Create a new ProtocolError at the current location.
    #[track_caller]
    pub fn new(kind: ProtocolErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
