mod provider;
mod request;
mod response;
mod transforms;

pub use provider::Anthropic;
pub(crate) use request::*;
pub(crate) use response::*;
