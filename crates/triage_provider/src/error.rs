#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid Status Code: {0}")]
    InvalidStatusCode(u16),

    #[error("Anthropic API error ({kind}): {message}")]
    Api { kind: String, message: String },
}
