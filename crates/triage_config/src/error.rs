#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("No API key found. Please set one of: {0}")]
    MissingApiKey(String),

    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),
}
