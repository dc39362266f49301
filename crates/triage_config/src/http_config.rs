use std::time::Duration;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Settings for the HTTP client that talks to the reasoning oracle.
///
/// # Environment Variables
/// - `TRIAGE_HTTP__TIMEOUT_SECS`: total request timeout in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}
