use derive_setters::Setters;
use schemars::{JsonSchema, Schema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{NamedTool, ToolName};

/// Declaration of a tool as it is offered to the reasoning oracle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Setters)]
#[setters(into)]
pub struct ToolDefinition {
    pub name: ToolName,
    pub description: String,
    pub input_schema: Schema,
}

impl ToolDefinition {
    pub fn new<N: ToString>(name: N) -> Self {
        ToolDefinition {
            name: ToolName::new(name),
            description: String::new(),
            input_schema: schemars::json_schema!({ "type": "object", "properties": {} }),
        }
    }
}

impl<T> From<&T> for ToolDefinition
where
    T: NamedTool + ExecutableTool + ToolDescription,
{
    fn from(t: &T) -> Self {
        ToolDefinition {
            name: T::tool_name(),
            description: t.description(),
            input_schema: schemars::schema_for!(T::Input),
        }
    }
}

pub trait ToolDescription {
    fn description(&self) -> String;
}

/// A capability with a typed input. The arguments of a tool call are
/// deserialized into `Input` before `call` runs.
#[async_trait::async_trait]
pub trait ExecutableTool {
    type Input: DeserializeOwned + JsonSchema + Send;

    async fn call(&self, input: Self::Input) -> anyhow::Result<String>;
}
