//! Top-level error wrapper types.

use crate::{
    ConfigError, EventError, OperationError, ProtocolError, RpcError, TransportError,
};

/// This is the foundation error enum. Each transport and operation layer
/// converts its domain error into one of these variants at the public API
/// boundary.
///
/// # Examples
///
/// ```
/// use orchestrall_error::{OrchestrallError, OperationError};
///
/// let op_err = OperationError::new("execute_workflow", "unknown workflow type");
/// let err: OrchestrallError = op_err.into();
/// assert!(format!("{}", err).contains("execute_workflow"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum OrchestrallErrorKind {
    /// Transport error (timeout, connection, status, malformed body)
    #[from(TransportError)]
    Transport(TransportError),
    /// Server reported an operation failure
    #[from(OperationError)]
    Operation(OperationError),
    /// Server reported an RPC error
    #[from(RpcError)]
    Rpc(RpcError),
    /// RPC correlation contract violated
    #[from(ProtocolError)]
    Protocol(ProtocolError),
    /// Event stream error
    #[from(EventError)]
    Event(EventError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Orchestrall error with kind discrimination.
///
/// # Examples
///
/// ```
/// use orchestrall_error::{ConfigError, ConfigErrorKind, OrchestrallResult};
///
/// fn might_fail() -> OrchestrallResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::MissingCredential))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Orchestrall Error: {}", _0)]
pub struct OrchestrallError(Box<OrchestrallErrorKind>);

impl OrchestrallError {
    /// Create a new error from a kind.
    pub fn new(kind: OrchestrallErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &OrchestrallErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to OrchestrallErrorKind
impl<T> From<T> for OrchestrallError
where
    T: Into<OrchestrallErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Orchestrall operations.
///
/// # Examples
///
/// ```
/// use orchestrall_error::{OrchestrallResult, TransportError, TransportErrorKind};
///
/// fn fetch_data() -> OrchestrallResult<String> {
///     Err(TransportError::new(TransportErrorKind::HttpStatus(404)))?
/// }
/// ```
pub type OrchestrallResult<T> = std::result::Result<T, OrchestrallError>;
