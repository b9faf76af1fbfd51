// ABOUTME: Plan pipeline holding the research provider, plan generator, and request deadline
// ABOUTME: Each upstream call runs under the deadline; dropping the future cancels it

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info};

use planforge_ai::{AIServiceError, GeneratedPlan, PlanGenerator, ResearchProvider, ResearchResult};
use planforge_core::{
    classify, extract_business_type, truncate, validate_form, BusinessPlan, BusinessPlanForm,
    Category, NewBusinessPlan, PlanStatus, ValidationError,
};
use planforge_storage::PlanStorage;

use crate::error::{PlannerError, Result};

const DEFAULT_TITLE_CHARS: usize = 80;

/// Result of the research step: the classification plus the raw research payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchOutcome {
    pub category: Category,
    pub business_type: String,
    pub research: ResearchResult,
}

#[derive(Clone)]
pub struct PlanPipeline {
    research: Arc<dyn ResearchProvider>,
    generator: Arc<dyn PlanGenerator>,
    deadline: Option<Duration>,
}

impl PlanPipeline {
    pub fn new(research: Arc<dyn ResearchProvider>, generator: Arc<dyn PlanGenerator>) -> Self {
        Self {
            research,
            generator,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    async fn within_deadline<T, F>(&self, step: &str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, AIServiceError>>,
    {
        let outcome = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, fut).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!("{} exceeded deadline of {:?}", step, deadline);
                    Err(AIServiceError::Timeout(deadline))
                }
            },
            None => fut.await,
        };

        outcome.map_err(|e| {
            error!("{} failed: {}", step, e);
            PlannerError::from(e)
        })
    }

    /// Classify the form and fetch market research for it
    pub async fn run_research(&self, form: &BusinessPlanForm) -> Result<ResearchOutcome> {
        validate_form(form)?;

        let category = classify(&form.stage);
        let business_type = extract_business_type(&form.business_idea);

        info!(
            "Running research: business_type={}, location={}, category={}",
            business_type, form.location, category
        );

        let research = self
            .within_deadline(
                "Research",
                self.research
                    .research(&business_type, &form.location, category),
            )
            .await?;

        Ok(ResearchOutcome {
            category,
            business_type,
            research,
        })
    }

    /// Generate a plan from the form and previously fetched research
    pub async fn run_generation(
        &self,
        form: &BusinessPlanForm,
        research: &ResearchResult,
    ) -> Result<GeneratedPlan> {
        validate_form(form)?;
        if research.is_empty() {
            return Err(ValidationError::Required("researchResults").into());
        }

        info!("Running plan generation for idea of {} chars", form.business_idea.len());

        self.within_deadline("Plan generation", self.generator.generate(form, research))
            .await
    }

    /// Persist a generated plan as a draft owned by `user_id`
    pub async fn save_generated(
        &self,
        store: &PlanStorage,
        user_id: &str,
        form: &BusinessPlanForm,
        plan: &GeneratedPlan,
        title: Option<&str>,
    ) -> Result<BusinessPlan> {
        let new_plan = NewBusinessPlan {
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| default_title(form)),
            business_idea: form.business_idea.clone(),
            location: form.location.clone(),
            category: classify(&form.stage),
            sections: plan.sections.clone(),
            status: PlanStatus::Draft,
            is_public: false,
            tags: Vec::new(),
        };

        let saved = store.save(user_id, &new_plan).await?;
        info!("Saved generated plan {} for user {}", saved.id, user_id);
        Ok(saved)
    }
}

fn default_title(form: &BusinessPlanForm) -> String {
    let idea = form.business_idea.trim();
    if idea.is_empty() {
        format!("{} plan", extract_business_type(idea))
    } else {
        truncate(idea, DEFAULT_TITLE_CHARS)
    }
}
