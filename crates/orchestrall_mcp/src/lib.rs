//! MCP tool execution over the Orchestrall REST transport.
//!
//! The platform exposes its agents and workflows a second time as MCP
//! tools, spoken to with JSON-RPC 2.0 over the same HTTP session the REST
//! client uses.  [`McpClient`] handles correlation ids and turns JSON-RPC
//! error replies into typed failures.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod correlation;

pub use client::McpClient;
pub use correlation::IdSequence;
