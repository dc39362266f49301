use std::sync::Arc;

use derive_setters::Setters;
use serde_json::Value;
use triage_domain::{AssistantTurn, ConversationState, ToolCallFull, ToolDefinition, Turn};

use super::orch_runner::ScriptedOracle;
use crate::orch::Orchestrator;
use crate::prompts::initial_state;
use crate::tool_registry::ToolRegistry;

#[derive(Setters)]
#[setters(into)]
pub struct TestContext {
    pub ticket_number: String,
    pub mock_assistant_responses: Vec<AssistantTurn>,
    pub mock_extractions: Vec<Value>,
    #[setters(strip_option)]
    pub tools: Option<Vec<ToolDefinition>>,
    #[setters(strip_option)]
    pub max_iterations: Option<usize>,

    // Final output of the test is stored in the context
    pub output: TestOutput,
}

#[derive(Default)]
pub struct TestOutput {
    pub state: Option<ConversationState>,
    pub chat_histories: Vec<Vec<Turn>>,
    pub extract_histories: Vec<Vec<Turn>>,
    pub bound_tools: Vec<Vec<String>>,
}

impl TestOutput {
    pub fn state(&self) -> &ConversationState {
        self.state.as_ref().expect("run did not complete")
    }

    /// Every tool call the oracle requested, in order.
    pub fn tool_calls(&self) -> Vec<ToolCallFull> {
        self.state()
            .history
            .iter()
            .filter_map(Turn::as_assistant)
            .filter_map(|turn| turn.tool_call().cloned())
            .collect()
    }
}

impl TestContext {
    pub fn ticket(ticket_number: &str) -> Self {
        Self {
            ticket_number: ticket_number.to_string(),
            mock_assistant_responses: Default::default(),
            mock_extractions: Default::default(),
            tools: None,
            max_iterations: None,
            output: TestOutput::default(),
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let oracle = Arc::new(ScriptedOracle::new(
            self.mock_assistant_responses.clone(),
            self.mock_extractions.clone(),
        ));
        let registry = Arc::new(ToolRegistry::triage());
        let orchestrator = match self.tools.clone() {
            Some(tools) => Orchestrator::with_tools(oracle.clone(), registry, tools)?,
            None => Orchestrator::new(oracle.clone(), registry)?,
        }
        .max_iterations(self.max_iterations);

        let result = orchestrator.run(initial_state(&self.ticket_number)).await;

        self.output.chat_histories = oracle.chat_histories().await;
        self.output.extract_histories = oracle.extract_histories().await;
        self.output.bound_tools = oracle.bound_tools().await;
        self.output.state = Some(result?);
        Ok(())
    }
}

/// Assistant turn requesting a single tool call.
pub fn tool_request(name: &str, call_id: &str, arguments: Value) -> AssistantTurn {
    AssistantTurn::new("").tool_calls(vec![ToolCallFull::new(name, call_id).arguments(arguments)])
}
