//! Connection lifecycle states.

/// Lifecycle of one event stream connection.
///
/// A connection moves `Disconnected -> Connecting -> Connected` and ends in
/// either `Disconnected` (orderly close, local or remote) or `Failed`
/// (transport error).  There are no other transitions; in particular a
/// failed connection never reconnects on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum ConnectionState {
    /// No socket is open.
    #[default]
    #[display("disconnected")]
    Disconnected,
    /// The WebSocket handshake is in progress.
    #[display("connecting")]
    Connecting,
    /// Frames are flowing.
    #[display("connected")]
    Connected,
    /// The connection died from a transport error.
    #[display("failed")]
    Failed,
}
