// ABOUTME: Research client that queries an external market research service
// ABOUTME: Returns the upstream payload verbatim; no retries, failures surface to the caller

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use planforge_config::constants;
use planforge_core::Category;

use crate::prompts::{research_query, RESEARCH_SYSTEM_PROMPT};
use crate::service::{AIServiceError, AIServiceResult, ChatCompletionService, ServiceSettings};

pub const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai";
pub const DEFAULT_RESEARCH_MODEL: &str = "sonar";
const RESEARCH_MAX_TOKENS: u32 = 1500;
const RESEARCH_TEMPERATURE: f64 = 0.2;

/// Research payload exactly as the research service returned it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearchResult {
    payload: Value,
}

impl ResearchResult {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Main research text. Understands chat-completion bodies, plain strings,
    /// and the `{research: ...}` envelope the research endpoint returns.
    pub fn text(&self) -> String {
        text_of(&self.payload)
    }

    /// Source URLs, when the service reported any
    pub fn citations(&self) -> Vec<String> {
        self.payload
            .get("citations")
            .or_else(|| self.payload.pointer("/research/citations"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }
}

fn text_of(value: &Value) -> String {
    if let Some(text) = value.as_str() {
        return text.to_string();
    }
    if let Some(text) = value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
    {
        return text.to_string();
    }
    if let Some(inner) = value.get("research") {
        return text_of(inner);
    }
    match value {
        Value::Null => String::new(),
        Value::Object(map) if map.is_empty() => String::new(),
        Value::Array(items) if items.is_empty() => String::new(),
        other => other.to_string(),
    }
}

/// Source of market research for a business
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    async fn research(
        &self,
        business_type: &str,
        location: &str,
        category: Category,
    ) -> AIServiceResult<ResearchResult>;
}

/// Research client for Perplexity's chat-completions API
pub struct PerplexityResearchClient {
    service: ChatCompletionService,
}

impl PerplexityResearchClient {
    pub fn new(settings: ServiceSettings) -> AIServiceResult<Self> {
        Ok(Self {
            service: ChatCompletionService::new("Perplexity", settings)?,
        })
    }

    /// Settings from PERPLEXITY_API_KEY, PERPLEXITY_BASE_URL, PERPLEXITY_MODEL
    pub fn settings_from_env() -> ServiceSettings {
        ServiceSettings::from_env(
            constants::PERPLEXITY_API_KEY,
            constants::PERPLEXITY_BASE_URL,
            constants::PERPLEXITY_MODEL,
            PERPLEXITY_API_URL,
            DEFAULT_RESEARCH_MODEL,
        )
        .with_max_tokens(RESEARCH_MAX_TOKENS)
        .with_temperature(RESEARCH_TEMPERATURE)
    }

    pub fn from_env() -> AIServiceResult<Self> {
        Self::new(Self::settings_from_env())
    }

    pub fn model(&self) -> &str {
        self.service.model()
    }
}

#[async_trait]
impl ResearchProvider for PerplexityResearchClient {
    async fn research(
        &self,
        business_type: &str,
        location: &str,
        category: Category,
    ) -> AIServiceResult<ResearchResult> {
        info!(
            "Requesting research: business_type={}, location={}, category={}",
            business_type, location, category
        );

        let query = research_query(business_type, location, category);
        let payload = self
            .service
            .complete_raw(Some(RESEARCH_SYSTEM_PROMPT.to_string()), query)
            .await?;

        let result = ResearchResult::new(payload);
        if result.is_empty() {
            return Err(AIServiceError::EmptyResponse);
        }
        info!(citations = result.citations().len(), "Research completed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> PerplexityResearchClient {
        let settings = ServiceSettings::new(server.uri(), DEFAULT_RESEARCH_MODEL)
            .with_api_key("pplx-test")
            .with_max_tokens(RESEARCH_MAX_TOKENS)
            .with_temperature(RESEARCH_TEMPERATURE);
        PerplexityResearchClient::new(settings).unwrap()
    }

    #[tokio::test]
    async fn test_research_returns_payload_verbatim() {
        let server = MockServer::start().await;
        let body = json!({
            "id": "abc",
            "model": "sonar",
            "citations": ["https://example.com/report"],
            "choices": [{
                "message": {"role": "assistant", "content": "The bakery market is growing."}
            }]
        });
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"model": "sonar"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server)
            .research("Bakery", "Austin", Category::NewCompany)
            .await
            .unwrap();

        assert_eq!(result.payload(), &body);
        assert_eq!(result.text(), "The bakery market is growing.");
        assert_eq!(result.citations(), vec!["https://example.com/report"]);
    }

    #[tokio::test]
    async fn test_research_upstream_failure_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .research("Bakery", "Austin", Category::NewCompany)
            .await
            .unwrap_err();

        assert_eq!(err.upstream_status(), Some(500));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_research_empty_content_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": [{"message": {"content": ""}}]})),
            )
            .mount(&server)
            .await;

        let err = client(&server)
            .research("Bakery", "Austin", Category::NewCompany)
            .await
            .unwrap_err();

        assert!(matches!(err, AIServiceError::EmptyResponse));
    }

    #[test]
    fn test_text_of_research_envelope() {
        let envelope = json!({
            "success": true,
            "research": {"choices": [{"message": {"content": "nested text"}}]}
        });
        assert_eq!(ResearchResult::new(envelope).text(), "nested text");
        assert_eq!(ResearchResult::new(json!("plain")).text(), "plain");
        assert!(ResearchResult::new(Value::Null).is_empty());
        assert!(ResearchResult::new(json!({})).is_empty());
    }

    #[test]
    fn test_research_result_serializes_transparently() {
        let payload = json!({"choices": []});
        let result = ResearchResult::new(payload.clone());
        assert_eq!(serde_json::to_value(&result).unwrap(), payload);
    }
}
