use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::{AssistantTurn, Turn};

/// The record threaded through every step of a triage run.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ConversationState {
    pub history: Vec<Turn>,
    pub reasoning_call_count: u64,
    pub captured_ticket_payload: Option<String>,
    pub issue_summary: Option<String>,
}

impl ConversationState {
    pub fn new(system: impl ToString, user: impl ToString) -> Self {
        Self {
            history: vec![Turn::system(system), Turn::user(user)],
            ..Default::default()
        }
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.history.last()
    }

    /// Most recent assistant turn, skipping any observations or user turns
    /// appended after it.
    pub fn last_assistant(&self) -> Option<&AssistantTurn> {
        self.history.iter().rev().find_map(Turn::as_assistant)
    }

    /// Applies the delta produced by a node. Turns are appended in order, the
    /// call count is accumulated and scalar fields are overwritten only when
    /// the delta sets them.
    pub fn apply(mut self, delta: StateDelta) -> Self {
        self.history.extend(delta.turns);
        self.reasoning_call_count += delta.reasoning_calls;
        if let Some(payload) = delta.ticket_payload {
            self.captured_ticket_payload = Some(payload);
        }
        if let Some(summary) = delta.issue_summary {
            self.issue_summary = Some(summary);
        }
        self
    }
}

/// Changes a single node makes to the [`ConversationState`].
#[derive(Clone, Debug, Default, PartialEq, Setters)]
#[setters(strip_option, into)]
pub struct StateDelta {
    pub turns: Vec<Turn>,
    pub reasoning_calls: u64,
    pub ticket_payload: Option<String>,
    pub issue_summary: Option<String>,
}

impl StateDelta {
    pub fn turn(turn: impl Into<Turn>) -> Self {
        Self { turns: vec![turn.into()], ..Default::default() }
    }

    /// Records one reasoning-oracle invocation.
    pub fn reasoning_call(mut self) -> Self {
        self.reasoning_calls += 1;
        self
    }

    /// Sequences two deltas: `other` is applied after `self`.
    pub fn combine(mut self, other: Self) -> Self {
        self.turns.extend(other.turns);
        self.reasoning_calls += other.reasoning_calls;
        self.ticket_payload = other.ticket_payload.or(self.ticket_payload);
        self.issue_summary = other.issue_summary.or(self.issue_summary);
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ToolCallFull, ToolResult};

    fn fixture() -> ConversationState {
        ConversationState::new("system", "check ticket INC12345")
    }

    #[test]
    fn test_new_state_has_system_and_user() {
        let actual = fixture();
        assert_eq!(
            actual.history,
            vec![Turn::system("system"), Turn::user("check ticket INC12345")]
        );
        assert_eq!(actual.reasoning_call_count, 0);
        assert_eq!(actual.captured_ticket_payload, None);
        assert_eq!(actual.issue_summary, None);
    }

    #[test]
    fn test_apply_appends_and_counts() {
        let delta = StateDelta::turn(Turn::assistant("hello"))
            .reasoning_call()
            .issue_summary("hello");
        let actual = fixture().apply(delta);

        assert_eq!(actual.history.len(), 3);
        assert_eq!(actual.last_turn(), Some(&Turn::assistant("hello")));
        assert_eq!(actual.reasoning_call_count, 1);
        assert_eq!(actual.issue_summary.as_deref(), Some("hello"));
    }

    #[test]
    fn test_apply_keeps_payload_when_delta_is_silent() {
        let state = fixture().apply(StateDelta::default().ticket_payload("{'id':'INC12345'}"));
        let actual = state.apply(StateDelta::turn(Turn::assistant("next")));
        assert_eq!(
            actual.captured_ticket_payload.as_deref(),
            Some("{'id':'INC12345'}")
        );
    }

    #[test]
    fn test_last_assistant_skips_observations() {
        let call = ToolCallFull::new("get_ticket_details", "toolu_1");
        let request = AssistantTurn::new("").tool_calls(vec![call.clone()]);
        let actual = fixture()
            .apply(StateDelta::turn(request.clone()))
            .apply(StateDelta::turn(ToolResult::new(&call, "payload")));
        assert_eq!(actual.last_assistant(), Some(&request));
    }

    #[test]
    fn test_combine_preserves_order_and_sums_calls() {
        let first = StateDelta::turn(Turn::user("synthetic")).issue_summary("old");
        let second = StateDelta::turn(Turn::assistant("answer"))
            .reasoning_call()
            .issue_summary("new");
        let actual = first.combine(second);
        let expected = StateDelta {
            turns: vec![Turn::user("synthetic"), Turn::assistant("answer")],
            reasoning_calls: 1,
            ticket_payload: None,
            issue_summary: Some("new".to_string()),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_default_delta_is_identity() {
        let actual = fixture().apply(StateDelta::default());
        assert_eq!(actual, fixture());
    }
}
