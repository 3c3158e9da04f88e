//! JSON-RPC 2.0 wire shapes for the MCP execution endpoint.

use crate::JsonMap;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON-RPC protocol version spoken by the platform.
pub const PROTOCOL_VERSION: &str = "2.0";

/// A JSON-RPC request envelope.
///
/// ```
/// use orchestrall_core::RpcRequest;
///
/// let request = RpcRequest::new("1", "tools/list", serde_json::json!({}));
/// assert_eq!(request.jsonrpc(), "2.0");
/// assert_eq!(request.id(), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RpcRequest {
    /// Protocol version, always [`PROTOCOL_VERSION`].
    jsonrpc: String,
    /// Correlation identifier echoed back by the platform.
    id: String,
    /// Method to invoke, such as `tools/call`.
    method: String,
    /// Method parameters.
    params: Value,
}

impl RpcRequest {
    /// Creates a request for `method` with the given correlation id.
    pub fn new(id: impl Into<String>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: PROTOCOL_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC response envelope.
///
/// Exactly one of `result` and `error` is populated by a well-behaved
/// server.  Interpretation of the pair is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RpcResponse {
    /// Protocol version reported by the platform.
    #[serde(default = "default_version")]
    jsonrpc: String,
    /// Correlation identifier from the originating request.
    id: String,
    /// The method's result on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// The failure report on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<RpcErrorPayload>,
}

impl RpcResponse {
    /// Splits the response into its `result` and `error` members.
    pub fn into_parts(self) -> (Option<Value>, Option<RpcErrorPayload>) {
        (self.result, self.error)
    }
}

fn default_version() -> String {
    PROTOCOL_VERSION.to_string()
}

/// The `error` member of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct RpcErrorPayload {
    /// JSON-RPC error code.
    code: i64,
    /// Human-readable failure message.
    message: String,
    /// Additional detail, when the platform provides any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl RpcErrorPayload {
    /// Creates an error payload, mainly useful in tests.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// A tool advertised by the platform's MCP discovery document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ToolDescriptor {
    /// Tool name, passed to `tools/call`.
    name: String,
    /// What the tool does.
    #[serde(default)]
    description: String,
    /// JSON schema of the tool's parameters, when advertised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
    /// Fields this crate does not model.
    #[serde(flatten)]
    extra: JsonMap,
}
