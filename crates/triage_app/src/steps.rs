use std::sync::Arc;

use anyhow::Context as _;
use tracing::{debug, info, warn};
use triage_domain::{
    ConversationState, Error, ExtractionSchema, Phase, ReasoningOracle, StateDelta,
    TicketDetails, ToolDefinition, Turn,
};

use crate::prompts::LOG_ANALYSIS_REQUEST;
use crate::tool_registry::ToolRegistry;

/// The work performed by each node of the triage graph. Every step reads the
/// current state and returns the delta to apply; none of them mutate it.
pub struct Steps<O> {
    oracle: O,
    registry: Arc<ToolRegistry>,
    tools: Vec<ToolDefinition>,
}

impl<O: ReasoningOracle> Steps<O> {
    pub fn new(oracle: O, registry: Arc<ToolRegistry>, tools: Vec<ToolDefinition>) -> Self {
        Self { oracle, registry, tools }
    }

    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Consults the oracle with both tools bound and records its answer.
    pub async fn ticket_decision(&self, state: &ConversationState) -> anyhow::Result<StateDelta> {
        let turn = self
            .oracle
            .chat(&state.history, &self.tools)
            .await
            .context("Ticket decision failed")?;
        debug!(
            node = "ticket_decision",
            tool_requested = turn.has_tool_call(),
            "Oracle responded"
        );
        Ok(StateDelta::turn(turn).reasoning_call())
    }

    /// Asks the oracle for the affected application in `TicketDetails` form
    /// and records it as `application_name=<value>`.
    pub async fn ticket_extraction(
        &self,
        state: &ConversationState,
    ) -> anyhow::Result<StateDelta> {
        let schema = ExtractionSchema::ticket_details();
        let value = self
            .oracle
            .extract(&state.history, &schema)
            .await
            .context("Ticket detail extraction failed")?;

        let details = TicketDetails::from_value(&value);
        if details.is_found() {
            info!(application = %details.application_name, "Application identified");
        } else {
            warn!(raw = %value, "No application name in ticket details");
        }

        let turn = Turn::assistant(format!("application_name={}", details.application_name));
        Ok(StateDelta::turn(turn).reasoning_call())
    }

    /// Executes the first tool call of the latest assistant turn. In the ticket
    /// phase the raw result is also kept as the captured ticket payload.
    pub async fn tool_invoke(
        &self,
        phase: Phase,
        state: &ConversationState,
    ) -> anyhow::Result<StateDelta> {
        let turn = state.last_assistant().ok_or(Error::MissingAssistantTurn)?;
        let call = turn.tool_call().ok_or(Error::MissingToolCall)?;
        if turn.tool_calls.len() > 1 {
            warn!(
                %phase,
                dropped = turn.tool_calls.len() - 1,
                "Assistant requested several tools, executing only the first"
            );
        }

        let result = self
            .registry
            .call(call)
            .await
            .with_context(|| format!("Tool {} failed", call.name))?;
        debug!(%phase, tool = %result.name, bytes = result.content.len(), "Tool returned");

        let delta = match phase {
            Phase::Ticket => StateDelta::default().ticket_payload(result.content.clone()),
            Phase::Log => StateDelta::default(),
        };
        Ok(StateDelta::turn(result).combine(delta))
    }

    /// Consults the oracle during the log phase. On first entry, right after
    /// the ticket phase settled on an answer, the log analysis request is
    /// appended before the call. The oracle's text always becomes the issue
    /// summary.
    pub async fn log_decision(&self, state: &ConversationState) -> anyhow::Result<StateDelta> {
        let entering = matches!(
            state.last_turn(),
            Some(Turn::Assistant(turn)) if !turn.has_tool_call()
        );

        let (prefix, turn) = if entering {
            let request = Turn::user(LOG_ANALYSIS_REQUEST);
            let history = [state.history.as_slice(), std::slice::from_ref(&request)].concat();
            let turn = self.oracle.chat(&history, &self.tools).await;
            (StateDelta::turn(request), turn)
        } else {
            let turn = self.oracle.chat(&state.history, &self.tools).await;
            (StateDelta::default(), turn)
        };
        let turn = turn.context("Log decision failed")?;
        debug!(
            node = "log_decision",
            entering,
            tool_requested = turn.has_tool_call(),
            "Oracle responded"
        );

        let summary = turn.content.clone();
        Ok(prefix.combine(StateDelta::turn(turn).reasoning_call().issue_summary(summary)))
    }
}
