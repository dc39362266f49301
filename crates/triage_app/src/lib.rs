mod orch;
mod prompts;
mod routing;
mod steps;
mod tool_registry;
mod tools;


pub use orch::*;
pub use prompts::*;
pub use routing::*;
pub use steps::*;
pub use tool_registry::*;
pub use tools::*;
