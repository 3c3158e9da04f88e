//! REST transport and high-level client for the Orchestrall platform.
//!
//! [`TransportSession`] owns the HTTP connection pool, injects the session's
//! API key into every request and retries transient failures with
//! exponential backoff.  [`OrchestrallClient`] sits on top of it and speaks
//! the platform's operation surface: agents, workflows, plugins, analytics,
//! health and the MCP execution endpoint.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod envelope;
mod transport;

pub use client::OrchestrallClient;
pub use transport::{API_KEY_HEADER, RawResponse, TransportSession};
