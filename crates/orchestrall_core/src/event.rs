//! Frames pushed over the platform's event stream.

use crate::JsonMap;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One frame from the `/v2/events` stream.
///
/// Every frame carries a `type` field naming the event; the remaining
/// fields vary by event and are kept as-is in `payload`.
///
/// ```
/// use orchestrall_core::StreamEvent;
///
/// let frame = r#"{"type": "workflow.completed", "executionId": "w-17"}"#;
/// let event: StreamEvent = serde_json::from_str(frame).unwrap();
/// assert_eq!(event.event_type(), "workflow.completed");
/// assert_eq!(event.get("executionId"), Some(&serde_json::json!("w-17")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct StreamEvent {
    /// The event name, such as `workflow.completed`.
    #[serde(rename = "type")]
    event_type: String,
    /// All other frame fields.
    #[serde(flatten)]
    payload: JsonMap,
}

impl StreamEvent {
    /// Looks up a payload field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}
