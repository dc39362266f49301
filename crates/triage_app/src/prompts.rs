use triage_domain::ConversationState;

pub const SYSTEM_PROMPT: &str = "You are responsible for answering user questions. You use tools for that. These tools sometimes fail and you are very resilient and try them again.";

/// Appended once when the log phase starts.
pub const LOG_ANALYSIS_REQUEST: &str = "For the application name identified in the previous conversation, fetch the logs and perform a basic analysis to determine whether the Spring Boot application has any issue. Provide a concise summary if any issue is found.";

pub fn ticket_request(ticket_number: &str) -> String {
    format!(
        "please check details for ticket {ticket_number}, from the details identify the application name and return it. If application name is not present then return 'application_not_found'."
    )
}

/// Fresh state for a run against `ticket_number`.
pub fn initial_state(ticket_number: &str) -> ConversationState {
    ConversationState::new(SYSTEM_PROMPT, ticket_request(ticket_number))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use triage_domain::{Role, Turn};

    use super::*;

    #[test]
    fn test_initial_state_names_the_ticket() {
        let actual = initial_state("INC12345");
        let roles: Vec<_> = actual.history.iter().map(Turn::role).collect();

        assert_eq!(roles, vec![Role::System, Role::User]);
        assert!(actual.history[1].content().contains("ticket INC12345"));
        assert_eq!(actual.reasoning_call_count, 0);
    }
}
