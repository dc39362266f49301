use derive_more::derive::Display;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ToolName;

/// Opaque identifier linking a tool call to the observation it produces.
#[derive(Clone, Debug, Display, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolCallId(String);

impl ToolCallId {
    pub fn new(value: impl ToString) -> Self {
        ToolCallId(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ToolCallId {
    fn from(value: &str) -> Self {
        ToolCallId::new(value)
    }
}

impl From<String> for ToolCallId {
    fn from(value: String) -> Self {
        ToolCallId(value)
    }
}

/// A request, emitted inside an assistant turn, to invoke a named tool.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Setters)]
#[setters(into)]
#[serde(rename_all = "snake_case")]
pub struct ToolCallFull {
    pub name: ToolName,
    pub call_id: ToolCallId,
    pub arguments: Value,
}

impl ToolCallFull {
    pub fn new(name: impl Into<ToolName>, call_id: impl Into<ToolCallId>) -> Self {
        Self {
            name: name.into(),
            call_id: call_id.into(),
            arguments: Value::Object(Default::default()),
        }
    }
}
