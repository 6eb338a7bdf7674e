//! OpenAI-compatible inference client.
//!
//! The chat responder only needs a single non-streaming completion per
//! message, so this is a thin wrapper over `POST {base}/chat/completions`.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::knowledge::{EMPTY_UPSTREAM_RESPONSE, PORTFOLIO_KNOWLEDGE, SYSTEM_PROMPT};
use crate::error::{Result, ShieldError};

/// Default inference endpoint (Groq, OpenAI-compatible).
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.groq.com/openai/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Something that can answer a chat message.
///
/// Implemented by [`UpstreamClient`]; tests substitute their own.
pub trait InferenceBackend: Send + Sync {
    /// Produce a reply for the user message.
    fn complete<'a>(
        &'a self,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// Upstream client configuration
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Bearer credential
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Completion token limit
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Configuration for the default endpoint with the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 300,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }

    /// Set base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: std::borrow::Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Reqwest-backed inference client
pub struct UpstreamClient {
    config: UpstreamConfig,
    client: Client,
}

impl UpstreamClient {
    /// Create a client
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShieldError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Configured model
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn send(&self, message: &str) -> Result<String> {
        let system = format!("{SYSTEM_PROMPT}\n\nPORTFOLIO INFORMATION:\n{PORTFOLIO_KNOWLEDGE}");
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.into(),
                },
                ChatMessage {
                    role: "user",
                    content: message.into(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShieldError::Upstream(format!(
                "{status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        Ok(first_content(completion).unwrap_or_else(|| EMPTY_UPSTREAM_RESPONSE.to_string()))
    }
}

fn first_content(completion: ChatCompletionResponse) -> Option<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
}

impl InferenceBackend for UpstreamClient {
    fn complete<'a>(
        &'a self,
        message: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.send(message))
    }

    fn name(&self) -> &'static str {
        "upstream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = UpstreamConfig::new("gsk_test");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 300);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(
            config.completions_url(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_completions_url_trailing_slash() {
        let config = UpstreamConfig::new("k").with_base_url("http://localhost:9000/v1/");
        assert_eq!(
            config.completions_url(),
            "http://localhost:9000/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "hi".into(),
            }],
            max_tokens: 300,
            temperature: 0.7,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], DEFAULT_MODEL);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 300);
    }

    #[test]
    fn test_first_content() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_content(parsed).as_deref(), Some("Hello!"));

        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(first_content(empty).is_none());

        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(first_content(null).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_errors() {
        let config = UpstreamConfig::new("k")
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let client = UpstreamClient::new(config).unwrap();

        let result = client.complete("What are Jan's skills?").await;
        assert!(result.is_err());
    }
}
