use serde::Deserialize;
use serde_json::Value;
use triage_domain::{AssistantTurn, ToolCallFull};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Response {
    pub id: String,
    pub model: String,
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<Usage>,
}

impl Response {
    /// Input of the first `tool_use` block invoking `name`.
    pub fn tool_input(&self, name: &str) -> Option<&Value> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::ToolUse { name: used, input, .. } if used == name => Some(input),
            _ => None,
        })
    }
}

impl From<Response> for AssistantTurn {
    fn from(value: Response) -> Self {
        let mut text = Vec::new();
        let mut tool_calls = Vec::new();
        for block in value.content {
            match block {
                ContentBlock::Text { text: part } => text.push(part),
                ContentBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCallFull::new(name, id).arguments(input))
                }
                ContentBlock::Other => {}
            }
        }
        AssistantTurn::new(text.join("\n")).tool_calls(tool_calls)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Body returned by the API on a non-2xx status.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}
