use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::{ToolCallFull, ToolResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Observation,
}

/// Output of one reasoning-oracle invocation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize, Setters)]
#[setters(into)]
pub struct AssistantTurn {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallFull>,
}

impl AssistantTurn {
    pub fn new(content: impl ToString) -> Self {
        Self { content: content.to_string(), tool_calls: Vec::new() }
    }

    /// The tool call that will be honored. Only the first request of a turn is
    /// ever executed.
    pub fn tool_call(&self) -> Option<&ToolCallFull> {
        self.tool_calls.first()
    }

    pub fn has_tool_call(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// One entry of the conversation history.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    System { content: String },
    User { content: String },
    Assistant(AssistantTurn),
    Observation(ToolResult),
}

impl Turn {
    pub fn system(content: impl ToString) -> Self {
        Turn::System { content: content.to_string() }
    }

    pub fn user(content: impl ToString) -> Self {
        Turn::User { content: content.to_string() }
    }

    pub fn assistant(content: impl ToString) -> Self {
        Turn::Assistant(AssistantTurn::new(content))
    }

    pub fn role(&self) -> Role {
        match self {
            Turn::System { .. } => Role::System,
            Turn::User { .. } => Role::User,
            Turn::Assistant(_) => Role::Assistant,
            Turn::Observation(_) => Role::Observation,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Turn::System { content } | Turn::User { content } => content,
            Turn::Assistant(turn) => &turn.content,
            Turn::Observation(result) => &result.content,
        }
    }

    pub fn as_assistant(&self) -> Option<&AssistantTurn> {
        match self {
            Turn::Assistant(turn) => Some(turn),
            _ => None,
        }
    }

    pub fn as_observation(&self) -> Option<&ToolResult> {
        match self {
            Turn::Observation(result) => Some(result),
            _ => None,
        }
    }

    pub fn has_tool_call(&self) -> bool {
        self.as_assistant().is_some_and(AssistantTurn::has_tool_call)
    }
}

impl From<AssistantTurn> for Turn {
    fn from(value: AssistantTurn) -> Self {
        Turn::Assistant(value)
    }
}

impl From<ToolResult> for Turn {
    fn from(value: ToolResult) -> Self {
        Turn::Observation(value)
    }
}
