//! Request types for the platform API.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A scenario identifier, kept as the text that goes into the URL path.
/// The platform uses integers, but clients may send either form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScenarioId(String);

impl ScenarioId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// POST /scenarios: request body. `folderID` is omitted when `None`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateScenario {
    pub name: String,
    #[serde(rename = "folderID", skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Value>,
}
