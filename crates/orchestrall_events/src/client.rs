//! WebSocket connection management and the dispatch loop.

use crate::registry::{Subscription, SubscriptionRegistry};
use crate::state::ConnectionState;
use futures_util::{SinkExt, StreamExt};
use orchestrall_core::{API_KEY_HEADER, SessionConfig, StreamEvent};
use orchestrall_error::{EventError, EventErrorKind, OrchestrallError, OrchestrallResult};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, instrument, trace, warn};

/// Path of the platform's event stream endpoint.
const EVENTS_PATH: &str = "/v2/events";

type OpenHook = Arc<dyn Fn() + Send + Sync>;
type CloseHook = Arc<dyn Fn() + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&EventError) + Send + Sync>;

/// Factory for event stream connections to the Orchestrall platform.
///
/// Holds the session settings, the subscription registry and the lifecycle
/// hooks.  [`connect`](Self::connect) opens one WebSocket and hands back an
/// [`EventStream`] to drive plus an [`EventStreamHandle`] to observe and
/// close it.  The client performs no reconnection of its own; a caller that
/// wants the stream back after a close or failure connects again.
///
/// ```no_run
/// use orchestrall_core::SessionConfig;
/// use orchestrall_events::EventClient;
///
/// # async fn demo() -> orchestrall_error::OrchestrallResult<()> {
/// let config = SessionConfig::builder()
///     .base_url("https://api.orchestrall.com")
///     .api_key("demo-key")
///     .build()?;
/// let client = EventClient::new(config)
///     .on_open(|| println!("listening"))
///     .on_close(|| println!("stream over"));
/// let _workflows = client.subscribe("workflow.completed", |event| {
///     println!("finished: {:?}", event.get("executionId"));
/// });
///
/// let (stream, handle) = client.connect().await?;
/// tokio::spawn(stream.run());
/// // ... later ...
/// handle.close();
/// # Ok(())
/// # }
/// ```
pub struct EventClient {
    config: SessionConfig,
    registry: SubscriptionRegistry,
    on_open: Option<OpenHook>,
    on_close: Option<CloseHook>,
    on_error: Option<ErrorHook>,
}

impl EventClient {
    /// Creates a client with an empty subscription registry and no hooks.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            registry: SubscriptionRegistry::new(),
            on_open: None,
            on_close: None,
            on_error: None,
        }
    }

    /// Sets the hook fired once per connection when the handshake succeeds.
    pub fn on_open(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Arc::new(hook));
        self
    }

    /// Sets the hook fired once per connection on orderly close, local or
    /// remote.
    pub fn on_close(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(hook));
        self
    }

    /// Sets the hook fired on connection failures, mid-stream transport
    /// errors and unparseable frames.
    pub fn on_error(mut self, hook: impl Fn(&EventError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Registers a handler for one event type.
    ///
    /// Subscriptions live in the client's registry, not in any one
    /// connection: handlers registered here fire on every stream this
    /// client subsequently connects.
    pub fn subscribe(
        &self,
        event_type: impl Into<String>,
        handler: impl Fn(&StreamEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.registry.subscribe(event_type, handler)
    }

    /// The registry backing this client's subscriptions.
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// The session settings this client was built from.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Opens the event stream.
    ///
    /// Derives the endpoint from the session's base URL by swapping the
    /// scheme to its WebSocket equivalent, attaches the API key header and
    /// performs the handshake.  On success `on_open` fires and the caller
    /// receives the stream (to drive, typically via `tokio::spawn`) and a
    /// handle (to observe state and request a close).  On failure
    /// `on_error` fires and the error is returned.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> OrchestrallResult<(EventStream, EventStreamHandle)> {
        let url = stream_url(self.config.base_url())?;
        debug!(url = %url, "Opening event stream");
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (close_tx, close_rx) = watch::channel(false);

        let mut request = url.as_str().into_client_request().map_err(|e| {
            EventError::new(EventErrorKind::Connection(format!("invalid stream URL: {e}")))
        })?;
        let api_key = HeaderValue::from_str(self.config.api_key()).map_err(|e| {
            EventError::new(EventErrorKind::Connection(format!(
                "API key is not a valid header value: {e}"
            )))
        })?;
        request.headers_mut().insert(API_KEY_HEADER, api_key);

        let (ws_stream, _) = match connect_async(request).await {
            Ok(connected) => connected,
            Err(e) => {
                error!("WebSocket connection failed: {}", e);
                let err = EventError::new(EventErrorKind::Connection(e.to_string()));
                let _ = state_tx.send(ConnectionState::Failed);
                if let Some(hook) = &self.on_error {
                    hook(&err);
                }
                return Err(err.into());
            }
        };

        info!("Event stream connected");
        let _ = state_tx.send(ConnectionState::Connected);
        if let Some(hook) = &self.on_open {
            hook();
        }

        let stream = EventStream {
            ws_stream,
            registry: self.registry.clone(),
            on_close: self.on_close.clone(),
            on_error: self.on_error.clone(),
            state: state_tx,
            close: close_rx,
        };
        let handle = EventStreamHandle {
            state: state_rx,
            close: close_tx,
        };
        Ok((stream, handle))
    }
}

impl std::fmt::Debug for EventClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventClient")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

/// One connected event stream, sole owner of the socket.
///
/// [`run`](Self::run) is the dispatch loop.  It ends when the platform
/// closes the stream, the [`EventStreamHandle`] requests a close, or the
/// transport fails.
pub struct EventStream {
    ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    registry: SubscriptionRegistry,
    on_close: Option<CloseHook>,
    on_error: Option<ErrorHook>,
    state: watch::Sender<ConnectionState>,
    close: watch::Receiver<bool>,
}

impl EventStream {
    /// Reads frames and dispatches events until the stream ends.
    ///
    /// Each text frame is parsed as a [`StreamEvent`] and delivered to the
    /// handlers registered for its type; frames that fail to parse are
    /// dropped and reported through `on_error` without disturbing the
    /// connection.  Pings are answered, other control frames ignored.
    /// Returns `Ok` on an orderly close from either side and the transport
    /// error otherwise; `on_close` or `on_error` fires accordingly, exactly
    /// once.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> OrchestrallResult<()> {
        // Cleared once every handle is gone; the stream then belongs to
        // its subscribers until the platform closes it.
        let mut closeable = true;
        loop {
            tokio::select! {
                changed = self.close.changed(), if closeable => match changed {
                    Ok(()) if *self.close.borrow_and_update() => {
                        debug!("Close requested by handle");
                        if let Err(e) = self.ws_stream.close(None).await {
                            debug!("Close frame not delivered: {}", e);
                        }
                        self.finish();
                        return Ok(());
                    }
                    Ok(()) => {}
                    Err(_) => {
                        debug!("Every handle dropped, stream stays open");
                        closeable = false;
                    }
                },
                frame = self.ws_stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.dispatch(text.as_str()),
                    Some(Ok(Message::Ping(payload))) => {
                        if let Err(e) = self.ws_stream.send(Message::Pong(payload)).await {
                            return Err(self.fail(format!("pong not delivered: {e}")));
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Event stream closed by the platform");
                        self.finish();
                        return Ok(());
                    }
                    Some(Ok(other)) => {
                        trace!("Ignoring non-text frame: {:?}", other);
                    }
                    Some(Err(e)) => {
                        error!("Event stream read failed: {}", e);
                        return Err(self.fail(e.to_string()));
                    }
                }
            }
        }
    }

    /// Parses one text frame and delivers it.
    fn dispatch(&self, text: &str) {
        match serde_json::from_str::<StreamEvent>(text) {
            Ok(event) => {
                let delivered = self.registry.dispatch(&event);
                trace!(
                    event_type = %event.event_type(),
                    delivered,
                    "Handled event frame"
                );
            }
            Err(e) => {
                warn!("Dropping unparseable event frame: {}", e);
                let err = EventError::new(EventErrorKind::InvalidFrame(e.to_string()));
                if let Some(hook) = &self.on_error {
                    hook(&err);
                }
            }
        }
    }

    fn finish(&mut self) {
        let _ = self.state.send(ConnectionState::Disconnected);
        if let Some(hook) = self.on_close.take() {
            hook();
        }
    }

    fn fail(&mut self, cause: String) -> OrchestrallError {
        let err = EventError::new(EventErrorKind::Interrupted(cause));
        let _ = self.state.send(ConnectionState::Failed);
        if let Some(hook) = &self.on_error {
            hook(&err);
        }
        err.into()
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("state", &*self.state.borrow())
            .field("registry", &self.registry)
            .finish()
    }
}

/// Observer and close switch for one [`EventStream`].
///
/// Clones observe the same connection.  Dropping every handle does not
/// close the stream; only [`close`](Self::close) does.
#[derive(Debug, Clone)]
pub struct EventStreamHandle {
    state: watch::Receiver<ConnectionState>,
    close: watch::Sender<bool>,
}

impl EventStreamHandle {
    /// The connection's current state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Asks the dispatch loop to close the connection.
    ///
    /// Returns immediately; the loop sends the close frame, fires
    /// `on_close` and ends its task.  Closing an already-ended stream is a
    /// no-op.
    pub fn close(&self) {
        let _ = self.close.send(true);
    }

    /// Waits until the connection leaves the given state and returns the
    /// new one.  Returns the current state unchanged if the stream has
    /// already ended.
    pub async fn state_changed(&mut self, seen: ConnectionState) -> ConnectionState {
        loop {
            let current = *self.state.borrow_and_update();
            if current != seen {
                return current;
            }
            if self.state.changed().await.is_err() {
                return *self.state.borrow();
            }
        }
    }
}

/// Derives the stream endpoint from the REST base URL.
///
/// Only the scheme prefix is swapped (`http` becomes `ws`, `https` becomes
/// `wss`); a plain string replace would corrupt hostnames that happen to
/// contain `http`.
fn stream_url(base_url: &str) -> Result<String, EventError> {
    let ws_base = if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else if base_url.starts_with("wss://") || base_url.starts_with("ws://") {
        base_url.to_string()
    } else {
        return Err(EventError::new(EventErrorKind::Connection(format!(
            "cannot derive a stream scheme from {base_url}"
        ))));
    };
    Ok(format!("{ws_base}{EVENTS_PATH}"))
}
