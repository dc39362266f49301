use crate::{Phase, ToolName};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Tool {0} not found")]
    ToolNotFound(ToolName),

    #[error("Tool {0} is offered to the oracle but has no registered capability")]
    UnregisteredTool(ToolName),

    #[error("Invalid tool call arguments: {0}")]
    ToolCallArgument(serde_json::Error),

    #[error("Latest assistant turn does not request a tool call")]
    MissingToolCall,

    #[error("Conversation has no assistant turn")]
    MissingAssistantTurn,

    #[error("The {phase} phase exceeded the limit of {limit} tool iterations")]
    IterationLimitReached { phase: Phase, limit: usize },
}

pub type Result<A> = std::result::Result<A, Error>;
