mod error;
mod extraction;
mod oracle;
mod phase;
mod state;
mod tool_call;
mod tool_definition;
mod tool_name;
mod tool_result;
mod turn;

pub use error::*;
pub use extraction::*;
pub use oracle::*;
pub use phase::*;
pub use state::*;
pub use tool_call::*;
pub use tool_definition::*;
pub use tool_name::*;
pub use tool_result::*;
pub use turn::*;
