use serde::{Deserialize, Serialize};

/// The two sequential stages of a triage run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// Resolve the ticket and identify the affected application.
    Ticket,
    /// Fetch the application's logs and summarize the issue.
    Log,
}
