// ABOUTME: Input validation for business plan forms and plan records
// ABOUTME: Rejects malformed input early with field-specific messages

use thiserror::Error;

use crate::types::{BusinessPlanForm, NewBusinessPlan};

pub const MAX_IDEA_LENGTH: usize = 5_000;
pub const MAX_LOCATION_LENGTH: usize = 200;
pub const MAX_STAGE_LENGTH: usize = 200;
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 40;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Too many tags (maximum {0})")]
    TooManyTags(usize),

    #[error("{0}")]
    Invalid(String),
}

/// Validate a submitted form. Empty fields are allowed; the classifier copes
/// with them. Oversized fields are not.
pub fn validate_form(form: &BusinessPlanForm) -> Result<(), ValidationError> {
    check_length("businessIdea", &form.business_idea, MAX_IDEA_LENGTH)?;
    check_length("location", &form.location, MAX_LOCATION_LENGTH)?;
    check_length("stage", &form.stage, MAX_STAGE_LENGTH)?;
    Ok(())
}

/// Validate a plan before it is handed to the store
pub fn validate_new_plan(plan: &NewBusinessPlan) -> Result<(), ValidationError> {
    validate_title(&plan.title)?;
    check_length("businessIdea", &plan.business_idea, MAX_IDEA_LENGTH)?;
    check_length("location", &plan.location, MAX_LOCATION_LENGTH)?;
    validate_tags(&plan.tags)?;
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::Required("title"));
    }
    check_length("title", title, MAX_TITLE_LENGTH)
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::TooManyTags(MAX_TAGS));
    }
    for tag in tags {
        check_length("tag", tag, MAX_TAG_LENGTH)?;
    }
    Ok(())
}

/// Trim, lowercase, deduplicate, and sort tags so they behave as a set
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Truncate a string to at most `max` characters
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_form_allows_empty_fields() {
        assert!(validate_form(&BusinessPlanForm::default()).is_ok());
    }

    #[test]
    fn test_validate_form_rejects_oversized_idea() {
        let form = BusinessPlanForm {
            business_idea: "x".repeat(MAX_IDEA_LENGTH + 1),
            ..Default::default()
        };
        assert_eq!(
            validate_form(&form),
            Err(ValidationError::TooLong {
                field: "businessIdea",
                max: MAX_IDEA_LENGTH
            })
        );
    }

    #[test]
    fn test_validate_new_plan_requires_title() {
        let plan = NewBusinessPlan {
            title: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            validate_new_plan(&plan),
            Err(ValidationError::Required("title"))
        );
    }

    #[test]
    fn test_validate_new_plan_rejects_too_many_tags() {
        let plan = NewBusinessPlan {
            title: "Plan".to_string(),
            tags: (0..=MAX_TAGS).map(|i| format!("tag{}", i)).collect(),
            ..Default::default()
        };
        assert_eq!(
            validate_new_plan(&plan),
            Err(ValidationError::TooManyTags(MAX_TAGS))
        );
    }

    #[test]
    fn test_normalize_tags_behaves_as_set() {
        let tags = vec![
            " Coffee ".to_string(),
            "retail".to_string(),
            "coffee".to_string(),
            "".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["coffee", "retail"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello");
        assert_eq!(truncate("café", 3), "caf");
    }
}
