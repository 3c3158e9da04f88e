//! Agent execution requests, responses and catalog entries.

use crate::JsonMap;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The class of agent a request is routed to.
///
/// Unrecognized values survive a round trip through
/// [`Other`](AgentKind::Other), so a newer platform can expose agents this
/// crate has no name for yet.
///
/// ```
/// use orchestrall_core::AgentKind;
///
/// assert_eq!(AgentKind::Crm.as_str(), "crm");
/// let fleet = AgentKind::from("fleet".to_string());
/// assert_eq!(fleet, AgentKind::Other("fleet".to_string()));
/// assert_eq!(String::from(fleet), "fleet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentKind {
    /// Customer relationship queries.
    Crm,
    /// Metrics and reporting queries.
    Analytics,
    /// Document ingestion and summarization.
    Document,
    /// The catch-all assistant for requests outside the other domains.
    General,
    /// An agent type this crate does not know by name.
    Other(String),
}

impl AgentKind {
    /// The wire name of this agent type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Crm => "crm",
            Self::Analytics => "analytics",
            Self::Document => "document",
            Self::General => "general",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for AgentKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "crm" => Self::Crm,
            "analytics" => Self::Analytics,
            "document" => Self::Document,
            "general" => Self::General,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for AgentKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<AgentKind> for String {
    fn from(kind: AgentKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to execute an agent.
///
/// `context` and `options` always serialize, as empty objects when unset.
///
/// ```
/// use orchestrall_core::{AgentKind, AgentRequest};
///
/// let request = AgentRequest::builder()
///     .agent_type(AgentKind::Crm)
///     .input("list open deals")
///     .build()
///     .unwrap();
/// let wire = serde_json::to_value(&request).unwrap();
/// assert_eq!(wire["agentType"], "crm");
/// assert_eq!(wire["context"], serde_json::json!({}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    /// Which agent to execute.
    agent_type: AgentKind,
    /// The natural-language input for the agent.
    input: String,
    /// Caller-supplied context forwarded to the agent.
    #[builder(default)]
    #[serde(default)]
    context: JsonMap,
    /// Execution options such as model overrides.
    #[builder(default)]
    #[serde(default)]
    options: JsonMap,
}

impl AgentRequest {
    /// Creates a request, treating absent context and options as empty.
    pub fn new(
        agent_type: impl Into<AgentKind>,
        input: impl Into<String>,
        context: Option<JsonMap>,
        options: Option<JsonMap>,
    ) -> Self {
        Self {
            agent_type: agent_type.into(),
            input: input.into(),
            context: context.unwrap_or_default(),
            options: options.unwrap_or_default(),
        }
    }

    /// Creates a builder for an agent request.
    pub fn builder() -> AgentRequestBuilder {
        AgentRequestBuilder::default()
    }
}

/// The platform's reply to an agent execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct AgentResponse {
    /// The agent's textual answer.
    response: String,
    /// Timing and model metadata reported by the platform.
    #[builder(default)]
    metadata: JsonMap,
    /// Follow-up actions the agent proposed, when any.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actions: Option<Vec<Value>>,
}

impl AgentResponse {
    /// Creates a builder for an agent response.
    pub fn builder() -> AgentResponseBuilder {
        AgentResponseBuilder::default()
    }
}

/// A catalog entry describing an agent the platform exposes.
///
/// Catalog payloads vary across deployments, so every modeled field is
/// optional and anything unrecognized is preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct AgentDescriptor {
    /// Human-readable agent name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// The agent type accepted by execution requests.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<AgentKind>,
    /// What the agent does.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Fields this crate does not model.
    #[serde(flatten)]
    extra: JsonMap,
}
