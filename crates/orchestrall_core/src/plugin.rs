//! Plugin catalog entries.

use crate::JsonMap;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A catalog entry describing a plugin installed on the platform.
///
/// Plugin payloads are deployment-specific, so only the common fields are
/// modeled and the rest is preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Getters)]
pub struct PluginDescriptor {
    /// Plugin name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// What the plugin provides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Fields this crate does not model.
    #[serde(flatten)]
    extra: JsonMap,
}
