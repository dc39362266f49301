use std::collections::VecDeque;

use serde_json::Value;
use tokio::sync::Mutex;
use triage_domain::{AssistantTurn, ExtractionSchema, ReasoningOracle, ToolDefinition, Turn};

/// Oracle that replays canned answers in order and records what it was asked.
#[derive(Default)]
pub struct ScriptedOracle {
    // Mock answers for `chat`, consumed front to back
    replies: Mutex<VecDeque<AssistantTurn>>,

    // Mock structured outputs for `extract`
    extractions: Mutex<VecDeque<Value>>,

    // Histories seen by every `chat` call
    chat_histories: Mutex<Vec<Vec<Turn>>>,

    // Histories seen by every `extract` call
    extract_histories: Mutex<Vec<Vec<Turn>>>,

    // Tool names bound on every `chat` call
    bound_tools: Mutex<Vec<Vec<String>>>,
}

impl ScriptedOracle {
    pub fn new(replies: Vec<AssistantTurn>, extractions: Vec<Value>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            extractions: Mutex::new(extractions.into()),
            ..Default::default()
        }
    }

    pub fn reply(self, turn: AssistantTurn) -> Self {
        self.replies.try_lock().unwrap().push_back(turn);
        self
    }

    pub fn extraction(self, value: Value) -> Self {
        self.extractions.try_lock().unwrap().push_back(value);
        self
    }

    pub async fn chat_histories(&self) -> Vec<Vec<Turn>> {
        self.chat_histories.lock().await.clone()
    }

    pub async fn extract_histories(&self) -> Vec<Vec<Turn>> {
        self.extract_histories.lock().await.clone()
    }

    pub async fn bound_tools(&self) -> Vec<Vec<String>> {
        self.bound_tools.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl ReasoningOracle for ScriptedOracle {
    async fn chat(
        &self,
        history: &[Turn],
        tools: &[ToolDefinition],
    ) -> anyhow::Result<AssistantTurn> {
        self.chat_histories.lock().await.push(history.to_vec());
        self.bound_tools
            .lock()
            .await
            .push(tools.iter().map(|tool| tool.name.to_string()).collect());
        self.replies
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No more scripted replies"))
    }

    async fn extract(
        &self,
        history: &[Turn],
        schema: &ExtractionSchema,
    ) -> anyhow::Result<Value> {
        self.extract_histories.lock().await.push(history.to_vec());
        self.extractions
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No scripted extraction for {}", schema.name))
    }
}
