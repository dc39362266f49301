use std::collections::HashMap;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ConfigError, HttpConfig};

const DEFAULT_CONFIG: &str = include_str!("../defaults.toml");

/// Environment variables searched, in order, for the oracle's API key.
pub const API_KEY_VARS: [&str; 2] = ["TRIAGE_API_KEY", "ANTHROPIC_API_KEY"];

/// Runtime configuration of a triage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[serde(rename_all = "snake_case")]
#[setters(strip_option, into)]
pub struct TriageConfig {
    /// Model identifier sent to the oracle.
    pub model: String,
    /// Base URL of the Messages API; `messages` is joined onto it.
    pub base_url: Url,
    /// Sampling temperature. Zero keeps runs reproducible.
    pub temperature: f32,
    /// Upper bound on tokens generated per oracle call.
    pub max_tokens: u32,
    /// Ticket the fixed user request asks about.
    pub ticket_number: String,
    /// Optional cap on tool round trips per phase. Unset means unbounded.
    #[serde(default)]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub http: HttpConfig,
}

impl TriageConfig {
    /// Loads the configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first. The embedded
    /// defaults are then overridden by variables prefixed with `TRIAGE_`, using
    /// `__` to reach nested keys:
    /// - `TRIAGE_MODEL` -> `model`
    /// - `TRIAGE_MAX_ITERATIONS` -> `max_iterations`
    /// - `TRIAGE_HTTP__TIMEOUT_SECS` -> `http.timeout_secs`
    ///
    /// The API key is taken from the first of [`API_KEY_VARS`] that is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_vars(std::env::vars().collect())
    }

    /// Same as [`TriageConfig::from_env`] but reads from the given variables
    /// instead of the process environment.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|key| vars.get(*key).filter(|value| !value.is_empty()).cloned());

        let config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .add_source(
                config::Environment::with_prefix("TRIAGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars)),
            )
            .build()?;

        let mut triage: TriageConfig = config.try_deserialize()?;
        triage.api_key = api_key;
        Ok(triage)
    }

    /// Returns the API key or a configuration error naming the variables that
    /// were searched.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingApiKey(API_KEY_VARS.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let actual = TriageConfig::from_vars(HashMap::new()).unwrap();

        assert_eq!(actual.model, "claude-3-5-sonnet-20240620");
        assert_eq!(actual.base_url.as_str(), "https://api.anthropic.com/v1/");
        assert_eq!(actual.temperature, 0.0);
        assert_eq!(actual.max_tokens, 1024);
        assert_eq!(actual.ticket_number, "INC123456");
        assert_eq!(actual.max_iterations, None);
        assert_eq!(actual.http, HttpConfig::default());
        assert_eq!(actual.api_key, None);
    }

    #[test]
    fn test_prefixed_variables_override_defaults() {
        let fixture = vars(&[
            ("TRIAGE_MODEL", "claude-3-haiku-20240307"),
            ("TRIAGE_TICKET_NUMBER", "INC12345"),
            ("TRIAGE_MAX_ITERATIONS", "5"),
            ("TRIAGE_HTTP__TIMEOUT_SECS", "30"),
        ]);
        let actual = TriageConfig::from_vars(fixture).unwrap();

        assert_eq!(actual.model, "claude-3-haiku-20240307");
        assert_eq!(actual.ticket_number, "INC12345");
        assert_eq!(actual.max_iterations, Some(5));
        assert_eq!(actual.http.timeout_secs, 30);
    }

    #[test]
    fn test_api_key_precedence() {
        let fixture = vars(&[
            ("ANTHROPIC_API_KEY", "sk-ant-fallback"),
            ("TRIAGE_API_KEY", "sk-ant-primary"),
        ]);
        let actual = TriageConfig::from_vars(fixture).unwrap();
        assert_eq!(actual.require_api_key().unwrap(), "sk-ant-primary");
    }

    #[test]
    fn test_anthropic_api_key_is_accepted() {
        let fixture = vars(&[("ANTHROPIC_API_KEY", "sk-ant-fallback")]);
        let actual = TriageConfig::from_vars(fixture).unwrap();
        assert_eq!(actual.require_api_key().unwrap(), "sk-ant-fallback");
    }

    #[test]
    fn test_missing_api_key_is_a_config_error() {
        let actual = TriageConfig::from_vars(HashMap::new())
            .unwrap()
            .require_api_key()
            .unwrap_err();
        assert!(matches!(actual, ConfigError::MissingApiKey(_)));
        assert_eq!(
            actual.to_string(),
            "No API key found. Please set one of: TRIAGE_API_KEY, ANTHROPIC_API_KEY"
        );
    }
}
