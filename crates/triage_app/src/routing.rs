use triage_domain::AssistantTurn;

/// Outcome of inspecting the most recent assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Route {
    ToolRequested,
    Advance,
}

impl From<&AssistantTurn> for Route {
    fn from(turn: &AssistantTurn) -> Self {
        if turn.has_tool_call() {
            Route::ToolRequested
        } else {
            Route::Advance
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use triage_domain::ToolCallFull;

    use super::*;

    #[test]
    fn test_tool_call_requests_invocation() {
        let fixture = AssistantTurn::new("")
            .tool_calls(vec![ToolCallFull::new("get_log_details", "toolu_1")]);
        assert_eq!(Route::from(&fixture), Route::ToolRequested);
    }

    #[test]
    fn test_plain_text_advances() {
        let fixture = AssistantTurn::new("application_name=order-api");
        assert_eq!(Route::from(&fixture), Route::Advance);
    }

    #[test]
    fn test_routing_does_not_modify_the_turn() {
        let fixture = AssistantTurn::new("x")
            .tool_calls(vec![ToolCallFull::new("get_log_details", "toolu_1")]);
        let before = fixture.clone();
        let first = Route::from(&fixture);
        let second = Route::from(&fixture);

        assert_eq!(first, second);
        assert_eq!(fixture, before);
    }
}
