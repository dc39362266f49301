use std::sync::Arc;

use serde_json::Value;

use crate::{AssistantTurn, ExtractionSchema, ToolDefinition, Turn};

/// The external language-understanding service consulted by the decision
/// steps.
#[async_trait::async_trait]
pub trait ReasoningOracle: Send + Sync {
    /// Invokes the oracle over `history` with `tools` bound. The returned turn
    /// may or may not request a tool call.
    async fn chat(
        &self,
        history: &[Turn],
        tools: &[ToolDefinition],
    ) -> anyhow::Result<AssistantTurn>;

    /// Invokes the oracle over `history`, constraining the answer to `schema`.
    async fn extract(
        &self,
        history: &[Turn],
        schema: &ExtractionSchema,
    ) -> anyhow::Result<Value>;
}

#[async_trait::async_trait]
impl<T: ReasoningOracle + ?Sized> ReasoningOracle for Arc<T> {
    async fn chat(
        &self,
        history: &[Turn],
        tools: &[ToolDefinition],
    ) -> anyhow::Result<AssistantTurn> {
        self.as_ref().chat(history, tools).await
    }

    async fn extract(
        &self,
        history: &[Turn],
        schema: &ExtractionSchema,
    ) -> anyhow::Result<Value> {
        self.as_ref().extract(history, schema).await
    }
}
