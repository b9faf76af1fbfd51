// ABOUTME: Chat-completions transport shared by the research and generation clients
// ABOUTME: Handles API requests, upstream error mapping, and response parsing

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use planforge_config::{constants, env_or, env_parse, env_secret};

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum AIServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No API key configured for {0}")]
    NoApiKey(&'static str),

    #[error("Upstream returned an empty response")]
    EmptyResponse,

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),
}

impl AIServiceError {
    /// HTTP status reported by the upstream service, when there was one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AIServiceError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type AIServiceResult<T> = Result<T, AIServiceError>;

/// Connection settings for one chat-completions endpoint
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ServiceSettings {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    /// Apply the shared outbound timeout variables
    pub fn with_env_timeouts(self) -> Self {
        let timeout = env_parse(constants::PLANFORGE_HTTP_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS);
        let connect = env_parse(
            constants::PLANFORGE_HTTP_CONNECT_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        );
        self.with_timeouts(Duration::from_secs(timeout), Duration::from_secs(connect))
    }

    /// Build settings from `<key_var>`, `<url_var>`, `<model_var>`, falling back to defaults
    pub fn from_env(
        key_var: &str,
        url_var: &str,
        model_var: &str,
        default_url: &str,
        default_model: &str,
    ) -> Self {
        let mut settings =
            Self::new(env_or(url_var, default_url), env_or(model_var, default_model))
                .with_env_timeouts();
        settings.api_key = env_secret(key_var);
        settings
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }
}

#[derive(Debug)]
pub struct AIResponse<T> {
    pub data: T,
    pub usage: Option<Usage>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct ChatCompletionService {
    client: Client,
    settings: ServiceSettings,
    provider: &'static str,
}

impl ChatCompletionService {
    /// Creates a service for `provider` (used in logs and key errors)
    pub fn new(provider: &'static str, settings: ServiceSettings) -> AIServiceResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .build()?;

        if settings.api_key.is_none() {
            info!("{} API key not set - requests will fail until one is configured", provider);
        }

        Ok(Self {
            client,
            settings,
            provider,
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Sends one completion request and returns the upstream JSON body untouched
    pub async fn complete_raw(
        &self,
        system_prompt: Option<String>,
        prompt: String,
    ) -> AIServiceResult<Value> {
        let api_key = self
            .settings
            .api_key
            .as_ref()
            .ok_or(AIServiceError::NoApiKey(self.provider))?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(Message {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.push(Message {
            role: "user".to_string(),
            content: prompt,
        });

        let request = ChatCompletionRequest {
            model: &self.settings.model,
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        info!(
            "Making {} API request: model={}, max_tokens={}, timeout={}s",
            self.provider,
            request.model,
            request.max_tokens,
            self.settings.timeout.as_secs()
        );

        let response = self
            .client
            .post(self.settings.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("{} API request timed out", self.provider);
                    AIServiceError::Timeout(self.settings.timeout)
                } else if e.is_connect() {
                    error!("Failed to connect to {} API: {}", self.provider, e);
                    AIServiceError::Connection(e.to_string())
                } else {
                    error!("{} API request failed: {}", self.provider, e);
                    AIServiceError::RequestFailed(e)
                }
            })?;

        let status = response.status();
        info!("Received response from {} API: status={}", self.provider, status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("{} API error: {} - {}", self.provider, status, error_text);
            return Err(AIServiceError::ApiError {
                status: status.as_u16(),
                message: upstream_message(&error_text),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        debug!(
            "{} response body (first 500 chars): {}",
            self.provider,
            planforge_core::truncate(&body.to_string(), 500)
        );

        Ok(body)
    }

    /// Sends one completion request and extracts the first choice's text
    pub async fn complete_text(
        &self,
        system_prompt: Option<String>,
        prompt: String,
    ) -> AIServiceResult<AIResponse<String>> {
        let body = self.complete_raw(system_prompt, prompt).await?;
        let parsed: ChatCompletionResponse = serde_json::from_value(body)
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AIServiceError::EmptyResponse)?;

        Ok(AIResponse {
            data: text,
            usage: parsed.usage,
        })
    }
}

/// Pull `error.message` out of an OpenAI-style error body, else return the body
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer) -> ServiceSettings {
        ServiceSettings::new(server.uri(), "test-model").with_api_key("test-key")
    }

    #[tokio::test]
    async fn test_complete_text_sends_system_and_user_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "test-model",
                "max_tokens": 1000,
                "temperature": 0.7,
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "  hi there  "}}],
                "usage": {"prompt_tokens": 5, "completion_tokens": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = ChatCompletionService::new("test", settings(&server)).unwrap();
        let response = service
            .complete_text(Some("be brief".to_string()), "hello".to_string())
            .await
            .unwrap();

        assert_eq!(response.data, "hi there");
        assert_eq!(response.usage.unwrap().total_tokens(), 8);
    }

    #[test]
    fn test_usage_total_saturates() {
        let usage = Usage {
            prompt_tokens: u32::MAX,
            completion_tokens: 10,
        };
        assert_eq!(usage.total_tokens(), u32::MAX);
    }

    #[tokio::test]
    async fn test_upstream_error_carries_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {"message": "Rate limit reached"}
            })))
            .mount(&server)
            .await;

        let service = ChatCompletionService::new("test", settings(&server)).unwrap();
        let err = service
            .complete_raw(None, "hello".to_string())
            .await
            .unwrap_err();

        assert_eq!(err.upstream_status(), Some(429));
        assert_eq!(err.to_string(), "API returned 429: Rate limit reached");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let service =
            ChatCompletionService::new("research", ServiceSettings::new(server.uri(), "m"))
                .unwrap();
        let err = service
            .complete_raw(None, "hello".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AIServiceError::NoApiKey("research")));
    }

    #[tokio::test]
    async fn test_empty_choice_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "   "}}]
            })))
            .mount(&server)
            .await;

        let service = ChatCompletionService::new("test", settings(&server)).unwrap();
        let err = service
            .complete_text(None, "hello".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, AIServiceError::EmptyResponse));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let settings = ServiceSettings::new("https://api.example.com/v1/", "m");
        assert_eq!(
            settings.endpoint(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_upstream_message_falls_back_to_raw_body() {
        assert_eq!(upstream_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(
            upstream_message(r#"{"error":{"message":"invalid key"}}"#),
            "invalid key"
        );
    }
}
