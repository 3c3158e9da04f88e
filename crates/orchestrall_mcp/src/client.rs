//! JSON-RPC tool client over the platform's REST transport.

use crate::IdSequence;
use orchestrall_client::OrchestrallClient;
use orchestrall_core::{JsonMap, RpcRequest, ToolDescriptor, WorkflowKind};
use orchestrall_error::{OrchestrallResult, RpcError, TransportError, TransportErrorKind};
use serde_json::Value;
use tracing::{instrument, warn};

/// Client for the platform's MCP tool surface.
///
/// Wraps the platform client's JSON-RPC endpoint with correlation id
/// bookkeeping and result-or-error interpretation.  Clones share the id
/// sequence, so calls made through clones stay distinguishable.
///
/// ```no_run
/// use orchestrall_client::OrchestrallClient;
/// use orchestrall_mcp::McpClient;
///
/// # async fn demo() -> orchestrall_error::OrchestrallResult<()> {
/// let mcp = McpClient::new(OrchestrallClient::from_config()?);
/// for tool in mcp.available_tools().await? {
///     println!("{}", tool.name());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct McpClient {
    client: OrchestrallClient,
    ids: IdSequence,
}

impl McpClient {
    /// Creates an MCP client over an existing platform client.
    pub fn new(client: OrchestrallClient) -> Self {
        Self {
            client,
            ids: IdSequence::new(),
        }
    }

    /// The platform client underneath.
    pub fn client(&self) -> &OrchestrallClient {
        &self.client
    }

    /// Invokes one MCP method and interprets the JSON-RPC reply.
    ///
    /// A reply carrying an `error` member counts as failed even when a
    /// `result` is also present; a reply carrying neither yields `null`.
    #[instrument(skip(self, params))]
    pub async fn call(&self, method: &str, params: Value) -> OrchestrallResult<Value> {
        let request = RpcRequest::new(self.ids.next_id(), method, params);
        let response = self.client.execute_rpc(&request).await?;
        match response.into_parts() {
            (result, Some(error)) => {
                if result.is_some() {
                    warn!(
                        code = *error.code(),
                        "Platform answered with both result and error, honoring the error"
                    );
                }
                Err(RpcError::new(*error.code(), error.message().clone()).into())
            }
            (Some(result), None) => Ok(result),
            (None, None) => Ok(Value::Null),
        }
    }

    /// Invokes one tool by name, via `tools/call`.
    ///
    /// The tool name and its arguments travel inside the method params;
    /// the JSON-RPC method itself is always `tools/call`.
    #[instrument(skip(self, arguments))]
    pub async fn execute_tool(&self, name: &str, arguments: Value) -> OrchestrallResult<Value> {
        let params = serde_json::json!({
            "name": name,
            "arguments": arguments,
        });
        self.call("tools/call", params).await
    }

    /// Fetches the MCP discovery document.
    pub async fn capabilities(&self) -> OrchestrallResult<Value> {
        self.client.mcp_capabilities().await
    }

    /// Lists the tools the platform advertises, via `tools/list`.
    #[instrument(skip(self))]
    pub async fn available_tools(&self) -> OrchestrallResult<Vec<ToolDescriptor>> {
        let mut result = self.call("tools/list", serde_json::json!({})).await?;
        let tools = match result.get_mut("tools") {
            Some(tools) => tools.take(),
            None => {
                return Err(TransportError::new(TransportErrorKind::Malformed(
                    "tools/list result has no `tools` member".to_string(),
                ))
                .into());
            }
        };
        serde_json::from_value(tools).map_err(|e| {
            TransportError::new(TransportErrorKind::Malformed(format!(
                "tools/list payload: {e}"
            )))
            .into()
        })
    }

    /// Runs the CRM agent through its MCP tool.
    pub async fn crm(
        &self,
        input: impl Into<String>,
        context: Option<JsonMap>,
    ) -> OrchestrallResult<Value> {
        let arguments = serde_json::json!({
            "input": input.into(),
            "context": context.unwrap_or_default(),
        });
        self.execute_tool("execute_crm_agent", arguments).await
    }

    /// Runs the analytics agent through its MCP tool.  The tool accepts a
    /// null `data` member, so an absent dataset is passed through as null.
    pub async fn analytics(
        &self,
        input: impl Into<String>,
        data: Option<Value>,
    ) -> OrchestrallResult<Value> {
        let arguments = serde_json::json!({
            "input": input.into(),
            "data": data,
        });
        self.execute_tool("execute_analytics_agent", arguments).await
    }

    /// Runs the document agent through its MCP tool.
    pub async fn document(
        &self,
        input: impl Into<String>,
        document_type: Option<String>,
    ) -> OrchestrallResult<Value> {
        let arguments = serde_json::json!({
            "input": input.into(),
            "documentType": document_type,
        });
        self.execute_tool("execute_document_agent", arguments).await
    }

    /// Runs a workflow through its derived MCP tool.
    ///
    /// The workflow's input object is the tool's entire argument set.
    pub async fn workflow(&self, kind: &WorkflowKind, input: Value) -> OrchestrallResult<Value> {
        self.execute_tool(&tool_name(kind), input).await
    }
}

/// Derives a workflow's MCP tool name: `customer-onboarding` becomes
/// `execute_customer_onboarding`.
fn tool_name(kind: &WorkflowKind) -> String {
    format!("execute_{}", kind.as_str().replace('-', "_"))
}
