mod error;
mod http_config;
mod triage_config;

pub use error::*;
pub use http_config::*;
pub use triage_config::*;
