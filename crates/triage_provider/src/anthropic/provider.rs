use anyhow::{Context as _, Result};
use derive_setters::Setters;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};
use triage_config::TriageConfig;
use triage_domain::{AssistantTurn, ExtractionSchema, ReasoningOracle, ToolDefinition, Turn};

use super::transforms::{MergeAdjacentRoles, SanitizeToolIds};
use super::{ErrorResponse, Request, Response, ToolChoice, ToolEntry};
use crate::Transformer;
use crate::error::Error;
use crate::utils::format_http_context;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Reasoning oracle backed by the Anthropic Messages API.
#[derive(Clone, Setters)]
#[setters(into)]
pub struct Anthropic {
    #[setters(skip)]
    client: Client,
    #[setters(skip)]
    api_key: String,
    base_url: Url,
    model: String,
    version: String,
    temperature: f32,
    max_tokens: u32,
}

impl Anthropic {
    pub fn new(client: Client, api_key: impl Into<String>, base_url: Url) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url,
            model: "claude-3-5-sonnet-20240620".to_string(),
            version: ANTHROPIC_VERSION.to_string(),
            temperature: 0.0,
            max_tokens: 1024,
        }
    }

    /// Builds a client from the run configuration. Fails when no API key is
    /// configured.
    pub fn from_config(config: &TriageConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let client = Client::builder()
            .timeout(config.http.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(client, api_key, config.base_url.clone())
            .model(config.model.clone())
            .temperature(config.temperature)
            .max_tokens(config.max_tokens))
    }

    fn url(&self, path: &str) -> Result<Url> {
        if path.contains("://") || path.contains("..") {
            anyhow::bail!("Invalid path: Contains forbidden patterns");
        }

        let path = path.trim_start_matches('/');

        self.base_url
            .join(path)
            .with_context(|| format!("Failed to append {} to base URL: {}", path, self.base_url))
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key).context("API key is not a valid header value")?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.version)
                .unwrap_or(HeaderValue::from_static(ANTHROPIC_VERSION)),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn request(&self, history: &[Turn]) -> Request {
        let request = Request::from(history)
            .model(self.model.clone())
            .max_tokens(self.max_tokens)
            .temperature(self.temperature);

        SanitizeToolIds
            .pipe(MergeAdjacentRoles)
            .transform(request)
    }

    async fn send(&self, request: &Request) -> Result<Response> {
        let url = self.url("messages")?;

        debug!(
            url = %url,
            model = %request.model,
            message_count = request.messages.len(),
            tool_count = request.tools.len(),
            "Connecting Upstream"
        );

        let response = self
            .client
            .post(url.clone())
            .headers(self.headers()?)
            .json(request)
            .send()
            .await
            .with_context(|| format_http_context(None, "POST", &url))?;

        let status = response.status();
        let ctx_message = format_http_context(Some(status), "POST", &url);
        let body = response
            .text()
            .await
            .with_context(|| ctx_message.clone())
            .context("Failed to decode response into text")?;

        if !status.is_success() {
            let error = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(response) => {
                    Error::Api { kind: response.error.kind, message: response.error.message }
                }
                Err(_) => Error::InvalidStatusCode(status.as_u16()),
            };
            return Err(error).with_context(|| format!("{ctx_message} Reason: {body}"));
        }

        let response = serde_json::from_str::<Response>(&body)
            .with_context(|| format!("Failed to parse Anthropic response: {body}"))?;

        debug!(
            id = %response.id,
            model = %response.model,
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.map(|u| u.input_tokens),
            output_tokens = response.usage.map(|u| u.output_tokens),
            "Received completion from Upstream"
        );

        Ok(response)
    }
}

#[async_trait::async_trait]
impl ReasoningOracle for Anthropic {
    async fn chat(
        &self,
        history: &[Turn],
        tools: &[ToolDefinition],
    ) -> anyhow::Result<AssistantTurn> {
        let tools = tools
            .iter()
            .map(ToolEntry::try_from)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to serialize tool schemas")?;
        let request = self.request(history).tools(tools);
        let response = self.send(&request).await?;
        Ok(response.into())
    }

    async fn extract(
        &self,
        history: &[Turn],
        schema: &ExtractionSchema,
    ) -> anyhow::Result<Value> {
        let request = self
            .request(history)
            .tools(vec![
                ToolEntry::try_from(schema).context("Failed to serialize extraction schema")?,
            ])
            .tool_choice(ToolChoice::Tool { name: schema.name.clone() });
        let response = self.send(&request).await?;

        match response.tool_input(&schema.name) {
            Some(input) => Ok(input.clone()),
            None => {
                warn!(
                    schema = %schema.name,
                    stop_reason = ?response.stop_reason,
                    "Structured output missing from response"
                );
                Ok(Value::Null)
            }
        }
    }
}
