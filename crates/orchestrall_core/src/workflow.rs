//! Workflow execution requests, responses and catalog entries.

use crate::JsonMap;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The class of workflow a request is routed to.
///
/// Like [`AgentKind`](crate::AgentKind), unrecognized values are preserved
/// in [`Other`](WorkflowKind::Other) instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowKind {
    /// Multi-step onboarding of a new customer.
    CustomerOnboarding,
    /// Ingestion and enrichment of a document.
    DocumentProcessing,
    /// Statistical analysis over a supplied dataset.
    DataAnalysis,
    /// A workflow type this crate does not know by name.
    Other(String),
}

impl WorkflowKind {
    /// The wire name of this workflow type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::CustomerOnboarding => "customer-onboarding",
            Self::DocumentProcessing => "document-processing",
            Self::DataAnalysis => "data-analysis",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for WorkflowKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "customer-onboarding" => Self::CustomerOnboarding,
            "document-processing" => Self::DocumentProcessing,
            "data-analysis" => Self::DataAnalysis,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for WorkflowKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<WorkflowKind> for String {
    fn from(kind: WorkflowKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to execute a workflow.
///
/// Workflow input is a JSON object rather than a single string, since each
/// workflow defines its own input schema.
///
/// ```
/// use orchestrall_core::{WorkflowKind, WorkflowRequest};
/// use serde_json::json;
///
/// let mut input = serde_json::Map::new();
/// input.insert("customerData".to_string(), json!({"name": "Acme"}));
/// let request = WorkflowRequest::builder()
///     .workflow_type(WorkflowKind::CustomerOnboarding)
///     .input(input)
///     .build()
///     .unwrap();
/// let wire = serde_json::to_value(&request).unwrap();
/// assert_eq!(wire["workflowType"], "customer-onboarding");
/// assert_eq!(wire["options"], json!({}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRequest {
    /// Which workflow to execute.
    workflow_type: WorkflowKind,
    /// The workflow's input object.
    #[builder(default)]
    #[serde(default)]
    input: JsonMap,
    /// Execution options such as priority.
    #[builder(default)]
    #[serde(default)]
    options: JsonMap,
}

impl WorkflowRequest {
    /// Creates a request, treating absent options as empty.
    pub fn new(
        workflow_type: impl Into<WorkflowKind>,
        input: JsonMap,
        options: Option<JsonMap>,
    ) -> Self {
        Self {
            workflow_type: workflow_type.into(),
            input,
            options: options.unwrap_or_default(),
        }
    }

    /// Creates a builder for a workflow request.
    pub fn builder() -> WorkflowRequestBuilder {
        WorkflowRequestBuilder::default()
    }
}

/// The platform's reply to a workflow execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    /// Identifier assigned to this execution.
    execution_id: String,
    /// Current execution status, such as `completed` or `running`.
    status: String,
    /// The workflow's output, once available.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    /// Timing and step metadata reported by the platform.
    #[builder(default)]
    #[serde(default)]
    metadata: JsonMap,
}

impl WorkflowResponse {
    /// Creates a builder for a workflow response.
    pub fn builder() -> WorkflowResponseBuilder {
        WorkflowResponseBuilder::default()
    }
}

/// A catalog entry describing a workflow the platform exposes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct WorkflowDescriptor {
    /// Human-readable workflow name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// The workflow type accepted by execution requests.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<WorkflowKind>,
    /// What the workflow does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Fields this crate does not model.
    #[serde(flatten)]
    extra: JsonMap,
}
