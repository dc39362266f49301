use serde::{Deserialize, Serialize};

use crate::{ToolCallFull, ToolCallId, ToolName};

/// Raw output of one tool invocation, carrying the correlation id of the call
/// that produced it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ToolResult {
    pub name: ToolName,
    pub call_id: ToolCallId,
    pub content: String,
}

impl ToolResult {
    pub fn new(call: &ToolCallFull, content: impl Into<String>) -> Self {
        Self {
            name: call.name.clone(),
            call_id: call.call_id.clone(),
            content: content.into(),
        }
    }
}
