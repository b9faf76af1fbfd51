// ABOUTME: Prompt text for market research and business plan generation
// ABOUTME: Composes queries from form fields, classifier output, and research content

use planforge_core::{truncate, BusinessPlanForm, Category};

/// Research text embedded in the plan prompt is capped to keep requests bounded
pub const MAX_RESEARCH_CHARS: usize = 12_000;

pub const RESEARCH_SYSTEM_PROMPT: &str = "You are a market research analyst. \
Provide factual, current, location-specific research. Cite sources where possible \
and state figures with their year.";

pub const PLAN_SYSTEM_PROMPT: &str = "You are a business plan expert. \
Create concise, practical, data-driven business plans. Use the research provided, \
prefer concrete numbers over generalities, and flag assumptions explicitly.";

/// Sections requested from the model, in presentation order
pub const PLAN_SECTIONS: &[&str] = &[
    "Executive Summary",
    "Company Description",
    "Market Analysis",
    "Competitive Analysis",
    "Products and Services",
    "Marketing and Sales Strategy",
    "Operations Plan",
    "Financial Projections",
    "Risks and Mitigation",
];

/// Build the research query for a business type, location, and stage
pub fn research_query(business_type: &str, location: &str, category: Category) -> String {
    let location = if location.trim().is_empty() {
        "an unspecified location"
    } else {
        location.trim()
    };

    format!(
        "Research the market for a {business_type} business in {location}. \
The business stage is: {category}.\n\n\
Cover:\n\
1. Market size and growth trends\n\
2. Target customer demographics\n\
3. Key competitors and their positioning\n\
4. Local regulations, licenses, and permits\n\
5. Typical startup and operating costs\n\
6. Opportunities and risks specific to this stage"
    )
}

/// Build the plan generation prompt from the form and research text
pub fn plan_prompt(
    form: &BusinessPlanForm,
    business_type: &str,
    category: Category,
    research: &str,
) -> String {
    let sections = PLAN_SECTIONS
        .iter()
        .map(|s| format!("## {}", s))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Write a business plan for the following business.\n\n\
Business idea: {idea}\n\
Location: {location}\n\
Stage: {stage} ({category})\n\
Business type: {business_type}\n\n\
Market research:\n{research}\n\n\
Use exactly these markdown headings, in this order:\n{sections}",
        idea = form.business_idea.trim(),
        location = form.location.trim(),
        stage = form.stage.trim(),
        research = truncate(research.trim(), MAX_RESEARCH_CHARS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_query_mentions_inputs() {
        let query = research_query("Bakery", "Austin, TX", Category::Expansion);
        assert!(query.contains("Bakery business in Austin, TX"));
        assert!(query.contains("Expansion"));
    }

    #[test]
    fn test_research_query_blank_location() {
        let query = research_query("Retail", "  ", Category::NewCompany);
        assert!(query.contains("in an unspecified location"));
    }

    #[test]
    fn test_plan_prompt_embeds_form_and_headings() {
        let form = BusinessPlanForm {
            business_idea: "Mobile coffee cart".to_string(),
            location: "Portland".to_string(),
            stage: "idea".to_string(),
        };
        let prompt = plan_prompt(&form, "Restaurant", Category::NewCompany, "Coffee is popular.");

        assert!(prompt.contains("Business idea: Mobile coffee cart"));
        assert!(prompt.contains("Stage: idea (New Company)"));
        assert!(prompt.contains("Coffee is popular."));
        assert!(prompt.contains("## Executive Summary"));
        assert!(prompt.ends_with("## Risks and Mitigation"));
    }

    #[test]
    fn test_plan_prompt_caps_research() {
        let research = "r".repeat(MAX_RESEARCH_CHARS * 2);
        let prompt = plan_prompt(
            &BusinessPlanForm::default(),
            "General Business",
            Category::NewCompany,
            &research,
        );
        assert!(prompt.len() < MAX_RESEARCH_CHARS + 2_000);
    }
}
