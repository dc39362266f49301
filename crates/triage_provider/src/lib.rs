mod anthropic;
mod error;
mod transformer;
mod utils;

pub use anthropic::Anthropic;
pub use error::Error;
pub use transformer::Transformer;
