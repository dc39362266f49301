use std::sync::Arc;

use derive_more::derive::Display;
use tracing::{debug, info};
use triage_domain::{
    ConversationState, Error, Phase, ReasoningOracle, StateDelta, ToolDefinition, Turn,
};

use crate::routing::Route;
use crate::steps::Steps;
use crate::tool_registry::ToolRegistry;

/// A vertex of the triage graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Node {
    #[display("ticket_decision")]
    TicketDecision,
    #[display("ticket_extraction")]
    TicketExtraction,
    #[display("tool_invoke({_0})")]
    ToolInvoke(Phase),
    #[display("log_decision")]
    LogDecision,
}

impl Node {
    /// Where the ticket phase resumes: extraction once a tool result is in,
    /// otherwise another decision.
    pub fn ticket_entry(state: &ConversationState) -> Self {
        match state.last_turn() {
            Some(Turn::Observation(_)) => Node::TicketExtraction,
            _ => Node::TicketDecision,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            Node::TicketDecision | Node::TicketExtraction => Phase::Ticket,
            Node::ToolInvoke(phase) => phase,
            Node::LogDecision => Phase::Log,
        }
    }

    /// The transition taken after `self` has been applied to `state`. `None`
    /// marks the end of the run.
    pub fn next(self, state: &ConversationState) -> triage_domain::Result<Option<Node>> {
        let next = match self {
            Node::TicketDecision | Node::TicketExtraction => match route(state)? {
                Route::ToolRequested => Some(Node::ToolInvoke(Phase::Ticket)),
                Route::Advance => Some(Node::LogDecision),
            },
            Node::ToolInvoke(Phase::Ticket) => Some(Node::ticket_entry(state)),
            Node::LogDecision => match route(state)? {
                Route::ToolRequested => Some(Node::ToolInvoke(Phase::Log)),
                Route::Advance => None,
            },
            Node::ToolInvoke(Phase::Log) => Some(Node::LogDecision),
        };
        Ok(next)
    }
}

fn route(state: &ConversationState) -> triage_domain::Result<Route> {
    state
        .last_assistant()
        .map(Route::from)
        .ok_or(Error::MissingAssistantTurn)
}

/// Tool round trips taken in each phase.
#[derive(Debug, Default)]
struct RoundTrips {
    ticket: usize,
    log: usize,
}

impl RoundTrips {
    fn charge(&mut self, phase: Phase, limit: Option<usize>) -> triage_domain::Result<()> {
        let taken = match phase {
            Phase::Ticket => &mut self.ticket,
            Phase::Log => &mut self.log,
        };
        if let Some(limit) = limit
            && *taken >= limit
        {
            return Err(Error::IterationLimitReached { phase, limit });
        }
        *taken += 1;
        Ok(())
    }
}

/// Drives a conversation through the ticket phase and then the log phase.
pub struct Orchestrator<O> {
    steps: Steps<O>,
    max_iterations: Option<usize>,
}

impl<O: ReasoningOracle> Orchestrator<O> {
    /// Binds every tool in `registry` to the oracle.
    pub fn new(oracle: O, registry: Arc<ToolRegistry>) -> triage_domain::Result<Self> {
        let tools = registry.definitions();
        Self::with_tools(oracle, registry, tools)
    }

    /// Binds `tools` to the oracle. Fails if any of them cannot be dispatched
    /// through `registry`.
    pub fn with_tools(
        oracle: O,
        registry: Arc<ToolRegistry>,
        tools: Vec<ToolDefinition>,
    ) -> triage_domain::Result<Self> {
        registry.validate(&tools)?;
        Ok(Self { steps: Steps::new(oracle, registry, tools), max_iterations: None })
    }

    /// Caps tool round trips per phase. `None` leaves the loops unbounded.
    pub fn max_iterations(mut self, limit: Option<usize>) -> Self {
        self.max_iterations = limit;
        self
    }

    pub async fn run(&self, mut state: ConversationState) -> anyhow::Result<ConversationState> {
        let mut round_trips = RoundTrips::default();
        let mut node = Some(Node::ticket_entry(&state));
        info!(tools = self.steps.tools().len(), "Starting triage run");

        while let Some(current) = node {
            if let Node::ToolInvoke(phase) = current {
                round_trips.charge(phase, self.max_iterations)?;
            }

            let delta = self.execute(current, &state).await?;
            state = state.apply(delta);
            node = current.next(&state)?;
            debug!(
                node = %current,
                next = ?node.map(|node| node.to_string()),
                reasoning_calls = state.reasoning_call_count,
                "Node completed"
            );

            if let Some(next) = node
                && next.phase() != current.phase()
            {
                info!(from = %current.phase(), to = %next.phase(), "Phase complete");
            }
        }

        info!(
            reasoning_calls = state.reasoning_call_count,
            turns = state.history.len(),
            "Triage run finished"
        );
        Ok(state)
    }

    async fn execute(&self, node: Node, state: &ConversationState) -> anyhow::Result<StateDelta> {
        match node {
            Node::TicketDecision => self.steps.ticket_decision(state).await,
            Node::TicketExtraction => self.steps.ticket_extraction(state).await,
            Node::ToolInvoke(phase) => self.steps.tool_invoke(phase, state).await,
            Node::LogDecision => self.steps.log_decision(state).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use triage_domain::{AssistantTurn, ToolCallFull, ToolResult};

    use super::*;
    use crate::prompts::initial_state;

    fn requesting(name: &str) -> AssistantTurn {
        AssistantTurn::new("").tool_calls(vec![ToolCallFull::new(name, "toolu_1")])
    }

    #[test]
    fn test_entry_is_ticket_decision() {
        let actual = Node::ticket_entry(&initial_state("INC12345"));
        assert_eq!(actual, Node::TicketDecision);
    }

    #[test]
    fn test_ticket_observation_leads_to_extraction() {
        let call = ToolCallFull::new("get_ticket_details", "toolu_1");
        let fixture = initial_state("INC12345")
            .apply(StateDelta::turn(AssistantTurn::new("").tool_calls(vec![call.clone()])))
            .apply(StateDelta::turn(ToolResult::new(&call, "{}")));

        let actual = Node::ToolInvoke(Phase::Ticket).next(&fixture).unwrap();
        assert_eq!(actual, Some(Node::TicketExtraction));
    }

    #[test]
    fn test_transitions() {
        let tool = initial_state("x").apply(StateDelta::turn(requesting("get_log_details")));
        let text = initial_state("x").apply(StateDelta::turn(Turn::assistant("done")));

        let fixture = [
            (Node::TicketDecision, &tool, Some(Node::ToolInvoke(Phase::Ticket))),
            (Node::TicketDecision, &text, Some(Node::LogDecision)),
            (Node::TicketExtraction, &text, Some(Node::LogDecision)),
            (Node::LogDecision, &tool, Some(Node::ToolInvoke(Phase::Log))),
            (Node::LogDecision, &text, None),
            (Node::ToolInvoke(Phase::Log), &text, Some(Node::LogDecision)),
        ];
        for (node, state, expected) in fixture {
            let actual = node.next(state).unwrap();
            assert_eq!(actual, expected, "from {node}");
        }
    }

    #[test]
    fn test_routing_without_assistant_turn_fails() {
        let actual = Node::TicketDecision.next(&initial_state("x")).unwrap_err();
        assert!(matches!(actual, Error::MissingAssistantTurn));
    }

    #[test]
    fn test_round_trips_respect_limit_per_phase() {
        let mut fixture = RoundTrips::default();
        fixture.charge(Phase::Ticket, Some(1)).unwrap();
        fixture.charge(Phase::Log, Some(1)).unwrap();

        let actual = fixture.charge(Phase::Log, Some(1)).unwrap_err();
        assert!(matches!(actual, Error::IterationLimitReached { phase: Phase::Log, limit: 1 }));
    }

    #[test]
    fn test_round_trips_unbounded_by_default() {
        let mut fixture = RoundTrips::default();
        for _ in 0..100 {
            fixture.charge(Phase::Log, None).unwrap();
        }
        assert_eq!(fixture.log, 100);
    }

    #[test]
    fn test_node_display() {
        assert_eq!(Node::ToolInvoke(Phase::Log).to_string(), "tool_invoke(log)");
        assert_eq!(Node::TicketExtraction.to_string(), "ticket_extraction");
    }
}
