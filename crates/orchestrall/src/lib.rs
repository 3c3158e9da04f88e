//! Orchestrall - Typed Client SDK for the Orchestrall Platform
//!
//! Orchestrall gives application code one typed entry point to the
//! platform's three interfaces: the REST operation surface, the
//! JSON-RPC-shaped MCP tool protocol and the WebSocket event stream.
//!
//! # Features
//!
//! - **REST Operations**: agents, workflows, plugins, analytics and health
//!   through [`OrchestrallClient`]
//! - **Retry with Backoff**: transient failures (429, 5xx, connection
//!   faults) retried automatically with jittered exponential backoff
//! - **MCP Tools**: tool discovery and invocation with correlation id
//!   checking through [`McpClient`]
//! - **Event Stream**: typed subscriptions over a persistent WebSocket
//!   through [`EventClient`]
//! - **Configuration**: layered `orchestrall.toml` loading with
//!   environment overrides
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use orchestrall::{AgentKind, AgentRequest, OrchestrallClient};
//!
//! #[tokio::main]
//! async fn main() -> orchestrall::OrchestrallResult<()> {
//!     let client = OrchestrallClient::from_config()?;
//!
//!     let request = AgentRequest::builder()
//!         .agent_type(AgentKind::Crm)
//!         .input("find customer X")
//!         .build()?;
//!
//!     let reply = client.execute_agent(&request).await?;
//!     println!("{}", reply.response());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The SDK is organized as a workspace with focused crates:
//!
//! - `orchestrall_error` - Error types
//! - `orchestrall_core` - Request/response shapes and session configuration
//! - `orchestrall_client` - HTTP transport and REST operations
//! - `orchestrall_mcp` - MCP tool client
//! - `orchestrall_events` - WebSocket event stream client
//!
//! This crate (`orchestrall`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use orchestrall_client::*;
pub use orchestrall_core::*;
pub use orchestrall_error::*;
pub use orchestrall_events::*;
pub use orchestrall_mcp::*;
