// ABOUTME: Core types, classifier, and validation for Planforge
// ABOUTME: Foundational package shared by the AI clients, storage, planner, and API layers

pub mod classifier;
pub mod constants;
pub mod sections;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    BusinessPlan, BusinessPlanForm, BusinessPlanSection, Category, NewBusinessPlan, PlanStatus,
    UpdateBusinessPlan,
};

// Re-export classifier entry points
pub use classifier::{classify, extract_business_type, DEFAULT_BUSINESS_TYPE};

// Re-export constants
pub use constants::{database_file, planforge_dir};

// Re-export utilities
pub use sections::parse_sections;
pub use utils::generate_plan_id;

// Re-export validation
pub use validation::{
    normalize_tags, truncate, validate_form, validate_new_plan, validate_tags, validate_title,
    ValidationError,
};
