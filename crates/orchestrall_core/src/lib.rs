//! Core data types and configuration for the Orchestrall client SDK.
//!
//! This crate defines the request and response shapes shared by the REST,
//! MCP and event-stream clients, plus the [`SessionConfig`] every transport
//! is built from.  The types here are plain data: they serialize to exactly
//! what the platform expects on the wire and carry no I/O of their own.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod agent;
mod analytics;
mod config;
mod event;
mod plugin;
mod rpc;
mod workflow;

pub use agent::{
    AgentDescriptor, AgentKind, AgentRequest, AgentRequestBuilder, AgentResponse,
    AgentResponseBuilder,
};
pub use analytics::{AnalyticsQuery, AnalyticsQueryBuilder, DEFAULT_TIMEFRAME};
pub use config::{
    API_KEY_HEADER, API_KEY_VAR, DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS, OrchestrallConfig,
    SessionConfig, SessionConfigBuilder, SessionSettings,
};
pub use event::StreamEvent;
pub use plugin::PluginDescriptor;
pub use rpc::{PROTOCOL_VERSION, RpcErrorPayload, RpcRequest, RpcResponse, ToolDescriptor};
pub use workflow::{
    WorkflowDescriptor, WorkflowKind, WorkflowRequest, WorkflowRequestBuilder, WorkflowResponse,
    WorkflowResponseBuilder,
};

/// A JSON object, used for free-form `context`, `options` and `metadata`
/// fields whose keys the platform does not fix in advance.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
