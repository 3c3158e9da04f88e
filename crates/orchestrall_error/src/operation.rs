//! Operation-level error types.

/// Error raised when the server reports `success: false` for an operation.
///
/// The HTTP exchange itself succeeded; the platform declined the operation
/// and said why. The server's own message is carried verbatim.
///
/// # Examples
///
/// ```
/// use orchestrall_error::OperationError;
///
/// let err = OperationError::new("execute_agent", "unknown agent type");
/// assert!(format!("{}", err).contains("execute_agent"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Operation {} failed: {} at line {} in {}", operation, server_message, line, file)]
pub struct OperationError {
    /// The operation that failed (e.g. "execute_agent")
    pub operation: String,
    /// The message reported by the server
    pub server_message: String,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl OperationError {
    /// Create a new OperationError at the current location.
    #[track_caller]
    pub fn new(operation: impl Into<String>, server_message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            operation: operation.into(),
            server_message: server_message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
