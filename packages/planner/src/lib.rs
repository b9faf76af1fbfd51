// ABOUTME: Orchestration of the research and plan generation steps
// ABOUTME: Classifies form input, calls injected AI clients under a deadline, and saves results

pub mod error;
pub mod pipeline;

pub use error::{PlannerError, Result};
pub use pipeline::{PlanPipeline, ResearchOutcome};
