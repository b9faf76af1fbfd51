// ABOUTME: AI service integration for Planforge
// ABOUTME: Research client, plan generator, and the shared chat-completions transport

pub mod generator;
pub mod prompts;
pub mod research;
pub mod service;

pub use generator::{GeneratedPlan, OpenAIPlanGenerator, PlanGenerator};
pub use research::{PerplexityResearchClient, ResearchProvider, ResearchResult};
pub use service::{
    AIResponse, AIServiceError, AIServiceResult, ChatCompletionService, ServiceSettings, Usage,
};
