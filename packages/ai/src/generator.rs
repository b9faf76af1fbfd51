// ABOUTME: Business plan generator backed by an OpenAI-compatible completion API
// ABOUTME: Builds one prompt from form data and research, returns text plus parsed sections

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use planforge_config::{constants, env_parse};
use planforge_core::{
    classify, extract_business_type, parse_sections, BusinessPlanForm, BusinessPlanSection,
};

use crate::prompts::{plan_prompt, PLAN_SYSTEM_PROMPT};
use crate::research::ResearchResult;
use crate::service::{
    AIServiceError, AIServiceResult, ChatCompletionService, ServiceSettings, Usage,
};

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PLAN_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_PLAN_MAX_TOKENS: u32 = 1000;
pub const PLAN_TEMPERATURE: f64 = 0.7;

/// Generated plan text and the sections parsed out of it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    pub content: String,
    pub sections: Vec<BusinessPlanSection>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(
        &self,
        form: &BusinessPlanForm,
        research: &ResearchResult,
    ) -> AIServiceResult<GeneratedPlan>;
}

pub struct OpenAIPlanGenerator {
    service: ChatCompletionService,
}

impl OpenAIPlanGenerator {
    /// Temperature is pinned regardless of what the settings carry
    pub fn new(settings: ServiceSettings) -> AIServiceResult<Self> {
        let settings = settings.with_temperature(PLAN_TEMPERATURE);
        Ok(Self {
            service: ChatCompletionService::new("OpenAI", settings)?,
        })
    }

    /// Settings from OPENAI_API_KEY, OPENAI_BASE_URL, OPENAI_MODEL, OPENAI_MAX_TOKENS
    pub fn settings_from_env() -> ServiceSettings {
        ServiceSettings::from_env(
            constants::OPENAI_API_KEY,
            constants::OPENAI_BASE_URL,
            constants::OPENAI_MODEL,
            OPENAI_API_URL,
            DEFAULT_PLAN_MODEL,
        )
        .with_max_tokens(env_parse(
            constants::OPENAI_MAX_TOKENS,
            DEFAULT_PLAN_MAX_TOKENS,
        ))
    }

    pub fn from_env() -> AIServiceResult<Self> {
        Self::new(Self::settings_from_env())
    }

    pub fn model(&self) -> &str {
        self.service.model()
    }
}

#[async_trait]
impl PlanGenerator for OpenAIPlanGenerator {
    async fn generate(
        &self,
        form: &BusinessPlanForm,
        research: &ResearchResult,
    ) -> AIServiceResult<GeneratedPlan> {
        if form.business_idea.trim().is_empty() {
            return Err(AIServiceError::MissingInput("businessIdea"));
        }
        let research_text = research.text();
        if research_text.trim().is_empty() {
            return Err(AIServiceError::MissingInput("researchResults"));
        }

        let category = classify(&form.stage);
        let business_type = extract_business_type(&form.business_idea);
        let prompt = plan_prompt(form, &business_type, category, &research_text);

        info!(
            "Generating business plan: business_type={}, category={}, model={}",
            business_type,
            category,
            self.model()
        );

        let response = self
            .service
            .complete_text(Some(PLAN_SYSTEM_PROMPT.to_string()), prompt)
            .await?;

        let sections = parse_sections(&response.data);
        info!(
            sections = sections.len(),
            total_tokens = response.usage.as_ref().map(Usage::total_tokens).unwrap_or(0),
            "Generated business plan"
        );

        Ok(GeneratedPlan {
            content: response.data,
            sections,
            model: self.model().to_string(),
            usage: response.usage,
        })
    }
}
