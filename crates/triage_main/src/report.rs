use std::fmt;

use triage_domain::ConversationState;

/// The text printed to stdout at the end of a run.
pub struct Report<'a> {
    state: &'a ConversationState,
}

impl<'a> From<&'a ConversationState> for Report<'a> {
    fn from(state: &'a ConversationState) -> Self {
        Self { state }
    }
}

fn banner(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = "#".repeat(title.len() + 4);
    writeln!(f, "\n{rule}\n# {title} #\n{rule}\n")
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        banner(f, "Ticket_details")?;
        writeln!(f, "{}\n", self.state.captured_ticket_payload.as_deref().unwrap_or_default())?;
        banner(f, "Issue Analysis")?;
        writeln!(f, "{}\n\n", self.state.issue_summary.as_deref().unwrap_or_default())?;
        writeln!(f, "llm call count : {}", self.state.reasoning_call_count)
    }
}
