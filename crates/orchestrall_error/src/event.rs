//! Event stream error types.

/// Event stream error conditions.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EventErrorKind {
    /// WebSocket connection failed
    #[display("WebSocket connection failed: {}", _0)]
    Connection(String),
    /// An inbound frame could not be parsed as an event
    ///
    /// Non-fatal: the frame is dropped and the connection stays open.
    #[display("invalid event frame: {}", _0)]
    InvalidFrame(String),
    /// The connection failed mid-stream
    #[display("event stream interrupted: {}", _0)]
    Interrupted(String),
}

/// Event stream error with source location tracking.
///
/// # Examples
///
/// ```
/// use orchestrall_error::{EventError, EventErrorKind};
///
/// let err = EventError::new(EventErrorKind::InvalidFrame("not json".into()));
/// assert!(format!("{}", err).contains("invalid event frame"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Event Error: {} at line {} in {}", kind, line, file)]
pub struct EventError {
    /// The kind of error that occurred
    pub kind: EventErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl EventError {
    /// Create a new EventError at the current location.
    #[track_caller]
    pub fn new(kind: EventErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
