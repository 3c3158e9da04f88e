//! High-level client for the platform's operation surface.

use crate::envelope;
use crate::transport::TransportSession;
use orchestrall_core::{
    AgentDescriptor, AgentKind, AgentRequest, AgentResponse, AnalyticsQuery, JsonMap,
    OrchestrallConfig, PluginDescriptor, RpcRequest, RpcResponse, SessionConfig,
    WorkflowDescriptor, WorkflowKind, WorkflowRequest, WorkflowResponse,
};
use orchestrall_error::{
    ConfigError, OrchestrallResult, ProtocolError, ProtocolErrorKind, TransportError,
    TransportErrorKind,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

const AGENTS_EXECUTE: &str = "/v2/agents/execute";
const AGENTS: &str = "/v2/agents";
const WORKFLOWS_EXECUTE: &str = "/v2/workflows/execute";
const WORKFLOWS: &str = "/v2/workflows";
const PLUGINS: &str = "/v2/plugins";
const ANALYTICS: &str = "/v2/analytics/platform";
const HEALTH: &str = "/v2/health";
const MCP_EXECUTE: &str = "/v2/mcp/execute";
const MCP_DISCOVERY: &str = "/v2/mcp/discovery";

/// Client for the Orchestrall platform's REST surface.
///
/// One client per session: it carries the credentials, the retry policy and
/// the connection pool.  Cloning is cheap and clones share the pool.
///
/// ```no_run
/// use orchestrall_client::OrchestrallClient;
/// use orchestrall_core::SessionConfig;
///
/// # async fn demo() -> orchestrall_error::OrchestrallResult<()> {
/// let config = SessionConfig::builder()
///     .base_url("https://api.orchestrall.com")
///     .api_key("demo-key")
///     .build()?;
/// let client = OrchestrallClient::new(config)?;
/// let reply = client.crm("which deals close this week?", None).await?;
/// println!("{}", reply.response());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OrchestrallClient {
    transport: TransportSession,
}

impl OrchestrallClient {
    /// Creates a client from validated session settings.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            transport: TransportSession::new(config)?,
        })
    }

    /// Creates a client from the standard configuration files, with the
    /// `ORCHESTRALL_API_KEY` environment variable taking precedence.
    pub fn from_config() -> OrchestrallResult<Self> {
        let config = OrchestrallConfig::load()?.session_config()?;
        Ok(Self::new(config)?)
    }

    /// The transport underneath this client.
    pub fn transport(&self) -> &TransportSession {
        &self.transport
    }

    /// Executes an agent and returns its typed reply.
    #[instrument(skip(self, request), fields(agent = %request.agent_type()))]
    pub async fn execute_agent(&self, request: &AgentRequest) -> OrchestrallResult<AgentResponse> {
        let raw = self.transport.post(AGENTS_EXECUTE, request).await?;
        let data = envelope::open("agent execution", raw.into_body())?;
        decode("agent execution", data)
    }

    /// Lists the agents this deployment exposes.
    #[instrument(skip(self))]
    pub async fn available_agents(&self) -> OrchestrallResult<Vec<AgentDescriptor>> {
        let raw = self.transport.get(AGENTS).await?;
        let data = envelope::open("agent discovery", raw.into_body())?;
        decode("agent discovery", data)
    }

    /// Executes a workflow and returns its execution record.
    #[instrument(skip(self, request), fields(workflow = %request.workflow_type()))]
    pub async fn execute_workflow(
        &self,
        request: &WorkflowRequest,
    ) -> OrchestrallResult<WorkflowResponse> {
        let raw = self.transport.post(WORKFLOWS_EXECUTE, request).await?;
        let data = envelope::open("workflow execution", raw.into_body())?;
        decode("workflow execution", data)
    }

    /// Lists the workflows this deployment exposes.
    #[instrument(skip(self))]
    pub async fn available_workflows(&self) -> OrchestrallResult<Vec<WorkflowDescriptor>> {
        let raw = self.transport.get(WORKFLOWS).await?;
        let data = envelope::open("workflow discovery", raw.into_body())?;
        decode("workflow discovery", data)
    }

    /// Lists the plugins installed on this deployment.
    #[instrument(skip(self))]
    pub async fn available_plugins(&self) -> OrchestrallResult<Vec<PluginDescriptor>> {
        let raw = self.transport.get(PLUGINS).await?;
        let data = envelope::open("plugin discovery", raw.into_body())?;
        decode("plugin discovery", data)
    }

    /// Fetches platform analytics for the query's timeframe and metrics.
    ///
    /// The shape of the report varies by deployment, so the payload is
    /// returned as raw JSON.
    #[instrument(skip(self, query), fields(timeframe = %query.timeframe()))]
    pub async fn platform_analytics(&self, query: &AnalyticsQuery) -> OrchestrallResult<Value> {
        let raw = self
            .transport
            .get_with_query(ANALYTICS, &query.to_query())
            .await?;
        envelope::open("platform analytics", raw.into_body())
    }

    /// Probes platform health.
    ///
    /// Health is the one endpoint that answers outside the response
    /// envelope; its body is passed through untouched.
    #[instrument(skip(self))]
    pub async fn health(&self) -> OrchestrallResult<Value> {
        let raw = self.transport.get(HEALTH).await?;
        Ok(raw.into_body())
    }

    /// Sends a JSON-RPC request to the MCP execution endpoint.
    ///
    /// The response is returned whole, with only the correlation id checked:
    /// an answer to a different request than the one sent is a protocol
    /// error.  Interpreting `result` against `error` is the MCP layer's job.
    #[instrument(skip(self, request), fields(method = %request.method()))]
    pub async fn execute_rpc(&self, request: &RpcRequest) -> OrchestrallResult<RpcResponse> {
        let raw = self.transport.post(MCP_EXECUTE, request).await?;
        let response: RpcResponse = decode("MCP execution", raw.into_body())?;
        if response.id() != request.id() {
            return Err(ProtocolError::new(ProtocolErrorKind::IdMismatch {
                sent: request.id().clone(),
                received: response.id().clone(),
            })
            .into());
        }
        debug!(id = %response.id(), "MCP response correlated");
        Ok(response)
    }

    /// Fetches the MCP discovery document.
    ///
    /// Discovery wraps its payload in a JSON-RPC style `result` member
    /// rather than the REST envelope.
    #[instrument(skip(self))]
    pub async fn mcp_capabilities(&self) -> OrchestrallResult<Value> {
        let raw = self.transport.get(MCP_DISCOVERY).await?;
        let mut body = raw.into_body();
        match body.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(TransportError::new(TransportErrorKind::Malformed(
                "MCP discovery response has no `result` member".to_string(),
            ))
            .into()),
        }
    }

    /// Asks the CRM agent a question.
    pub async fn crm(
        &self,
        input: impl Into<String>,
        context: Option<JsonMap>,
    ) -> OrchestrallResult<AgentResponse> {
        self.execute_agent(&AgentRequest::new(AgentKind::Crm, input, context, None))
            .await
    }

    /// Asks the analytics agent a question, optionally over inline data.
    pub async fn analytics(
        &self,
        input: impl Into<String>,
        data: Option<Value>,
    ) -> OrchestrallResult<AgentResponse> {
        let context = data.map(|data| {
            serde_json::json!({"metadata": {"data": data}})
                .as_object()
                .cloned()
                .unwrap_or_default()
        });
        self.execute_agent(&AgentRequest::new(AgentKind::Analytics, input, context, None))
            .await
    }

    /// Asks the document agent a question, optionally naming the document
    /// type being discussed.
    pub async fn document(
        &self,
        input: impl Into<String>,
        document_type: Option<String>,
    ) -> OrchestrallResult<AgentResponse> {
        let context = document_type.map(|document_type| {
            serde_json::json!({"metadata": {"documentType": document_type}})
                .as_object()
                .cloned()
                .unwrap_or_default()
        });
        self.execute_agent(&AgentRequest::new(AgentKind::Document, input, context, None))
            .await
    }

    /// Starts the customer onboarding workflow for one customer record.
    pub async fn onboard_customer(
        &self,
        customer_data: Value,
    ) -> OrchestrallResult<WorkflowResponse> {
        let mut input = JsonMap::new();
        input.insert("customerData".to_string(), customer_data);
        self.execute_workflow(&WorkflowRequest::new(
            WorkflowKind::CustomerOnboarding,
            input,
            None,
        ))
        .await
    }

    /// Runs the document processing workflow over one document.
    pub async fn process_document(&self, document: Value) -> OrchestrallResult<WorkflowResponse> {
        let mut input = JsonMap::new();
        input.insert("document".to_string(), document);
        self.execute_workflow(&WorkflowRequest::new(
            WorkflowKind::DocumentProcessing,
            input,
            None,
        ))
        .await
    }

    /// Runs the data analysis workflow.  When no analysis type is named the
    /// platform's statistical analysis is requested.
    pub async fn analyze_data(
        &self,
        data: Value,
        analysis_type: Option<String>,
    ) -> OrchestrallResult<WorkflowResponse> {
        let mut input = JsonMap::new();
        input.insert("data".to_string(), data);
        input.insert(
            "analysisType".to_string(),
            Value::String(analysis_type.unwrap_or_else(|| "statistical".to_string())),
        );
        self.execute_workflow(&WorkflowRequest::new(WorkflowKind::DataAnalysis, input, None))
            .await
    }
}

/// Decodes an envelope payload into its typed form.
fn decode<T: DeserializeOwned>(operation: &str, data: Value) -> OrchestrallResult<T> {
    serde_json::from_value(data).map_err(|e| {
        TransportError::new(TransportErrorKind::Malformed(format!(
            "{operation} payload: {e}"
        )))
        .into()
    })
}
