//! Tests for event stream lifecycle, dispatch and failure reporting.

use futures_util::{SinkExt, StreamExt};
use orchestrall_core::SessionConfig;
use orchestrall_error::{EventErrorKind, OrchestrallErrorKind};
use orchestrall_events::{ConnectionState, EventClient};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};

fn config(base_url: &str) -> SessionConfig {
    SessionConfig::builder()
        .base_url(base_url)
        .api_key("test-key")
        .build()
        .unwrap()
}

/// Accepts one WebSocket connection, pushes the given frames and closes.
async fn frame_server(frames: Vec<&'static str>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
        for frame in frames {
            ws.send(Message::Text(frame.into())).await.unwrap();
        }
        ws.close(None).await.ok();
    });
    (format!("http://{addr}"), server)
}

#[tokio::test]
async fn test_events_reach_their_handlers() -> anyhow::Result<()> {
    let (base_url, server) = frame_server(vec![
        r#"{"type": "agent.started", "agent": "crm"}"#,
        r#"{"type": "agent.completed", "agent": "crm", "ms": 12}"#,
    ])
    .await;

    let client = EventClient::new(config(&base_url));
    let started = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(Mutex::new(Vec::new()));

    let started_count = started.clone();
    let _start_sub = client.subscribe("agent.started", move |_| {
        started_count.fetch_add(1, Ordering::SeqCst);
    });
    let completed_seen = completed.clone();
    let _done_sub = client.subscribe("agent.completed", move |event| {
        completed_seen
            .lock()
            .unwrap()
            .push(event.get("ms").cloned());
    });

    let (stream, _handle) = client.connect().await?;
    stream.run().await?;
    server.await?;

    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(*completed.lock().unwrap(), vec![Some(serde_json::json!(12))]);
    Ok(())
}

#[tokio::test]
async fn test_unregistered_event_types_are_ignored() -> anyhow::Result<()> {
    let (base_url, server) = frame_server(vec![
        r#"{"type": "A"}"#,
        r#"{"type": "C", "novel": true}"#,
        r#"{"type": "B"}"#,
    ])
    .await;

    let client = EventClient::new(config(&base_url));
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let errors = Arc::new(AtomicUsize::new(0));

    let a_seen = delivered.clone();
    let _a = client.subscribe("A", move |event| {
        a_seen.lock().unwrap().push(event.event_type().clone());
    });
    let b_seen = delivered.clone();
    let _b = client.subscribe("B", move |event| {
        b_seen.lock().unwrap().push(event.event_type().clone());
    });
    let error_count = errors.clone();
    let client = client.on_error(move |_| {
        error_count.fetch_add(1, Ordering::SeqCst);
    });

    let (stream, _handle) = client.connect().await?;
    stream.run().await?;
    server.await?;

    // The unknown type reached nobody and raised nothing
    assert_eq!(*delivered.lock().unwrap(), ["A", "B"]);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_malformed_frames_report_without_disconnecting() -> anyhow::Result<()> {
    let (base_url, server) = frame_server(vec![
        "this is not json",
        r#"{"payload": "but no type field"}"#,
        r#"{"type": "A"}"#,
    ])
    .await;

    let delivered = Arc::new(AtomicUsize::new(0));
    let errors = Arc::new(Mutex::new(Vec::new()));

    let error_log = errors.clone();
    let client = EventClient::new(config(&base_url)).on_error(move |err| {
        error_log.lock().unwrap().push(err.kind.clone());
    });
    let a_count = delivered.clone();
    let _a = client.subscribe("A", move |_| {
        a_count.fetch_add(1, Ordering::SeqCst);
    });

    let (stream, _handle) = client.connect().await?;
    stream.run().await?;
    server.await?;

    // Both bad frames were reported, and the frame after them still arrived
    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|kind| matches!(kind, EventErrorKind::InvalidFrame(_)))
    );
    assert_eq!(delivered.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_handle_close_ends_the_stream() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
        // Hold the connection open until the client closes it
        while let Some(Ok(msg)) = ws.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    let closed = Arc::new(AtomicUsize::new(0));
    let close_count = closed.clone();
    let client = EventClient::new(config(&base_url)).on_close(move || {
        close_count.fetch_add(1, Ordering::SeqCst);
    });

    let (stream, handle) = client.connect().await?;
    assert_eq!(handle.state(), ConnectionState::Connected);

    let running = tokio::spawn(stream.run());
    handle.close();
    running.await??;
    server.await?;

    assert_eq!(handle.state(), ConnectionState::Disconnected);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_dropping_every_handle_leaves_the_stream_running() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
        // Give the client time to drop its handle before the frame lands
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        ws.send(Message::Text(r#"{"type": "late.event"}"#.into()))
            .await
            .unwrap();
        ws.close(None).await.ok();
    });

    let delivered = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicUsize::new(0));
    let close_count = closed.clone();
    let client = EventClient::new(config(&base_url)).on_close(move || {
        close_count.fetch_add(1, Ordering::SeqCst);
    });
    let late = delivered.clone();
    let _sub = client.subscribe("late.event", move |_| {
        late.fetch_add(1, Ordering::SeqCst);
    });

    let (stream, handle) = client.connect().await?;
    drop(handle);
    stream.run().await?;
    server.await?;

    // The stream outlived its handle; only the remote close ended it
    assert_eq!(delivered.load(Ordering::SeqCst), 1);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_handshake_carries_the_api_key() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let (header_tx, header_rx) = tokio::sync::oneshot::channel();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let callback = |request: &Request, response: Response| {
            let key = request
                .headers()
                .get("X-API-Key")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            header_tx
                .send((request.uri().path().to_string(), key))
                .unwrap();
            Ok(response)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(socket, callback)
            .await
            .unwrap();
        ws.close(None).await.ok();
    });

    let opened = Arc::new(AtomicUsize::new(0));
    let open_count = opened.clone();
    let client = EventClient::new(config(&base_url)).on_open(move || {
        open_count.fetch_add(1, Ordering::SeqCst);
    });

    let (stream, _handle) = client.connect().await?;
    assert_eq!(opened.load(Ordering::SeqCst), 1);
    stream.run().await?;
    server.await?;

    let (path, key) = header_rx.await?;
    assert_eq!(path, "/v2/events");
    assert_eq!(key.as_deref(), Some("test-key"));
    assert_eq!(opened.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_connect_reports_and_returns_the_error() {
    // Bind a port, then free it so the connect attempt is refused
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let errors = Arc::new(AtomicUsize::new(0));
    let error_count = errors.clone();
    let client = EventClient::new(config(&base_url)).on_error(move |_| {
        error_count.fetch_add(1, Ordering::SeqCst);
    });

    let err = client.connect().await.unwrap_err();
    match err.kind() {
        OrchestrallErrorKind::Event(event) => {
            assert!(matches!(event.kind, EventErrorKind::Connection(_)));
        }
        other => panic!("expected event error, got {other}"),
    }
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}
