// ABOUTME: HTTP handlers for market research and business plan generation
// ABOUTME: Stateless request/response; each call goes straight to the plan pipeline

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use planforge_ai::ResearchResult;
use planforge_core::{BusinessPlanForm, ValidationError};
use planforge_planner::PlannerError;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::AppState;

pub const MISSING_FORM_DATA: &str = "Missing form data";
pub const MISSING_RESEARCH_RESULTS: &str = "Missing research results";
pub const GENERATION_FAILED: &str = "Failed to generate business plan";
pub const SAVE_FAILED: &str = "Failed to save business plan";

const FORM_FIELDS: &[&str] = &["businessIdea", "location", "stage"];

fn parse_body(body: &Bytes) -> Option<Value> {
    if body.is_empty() {
        return None;
    }
    serde_json::from_slice(body).ok()
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Form fields either at the top level or under `formData`
fn form_value(body: &Value) -> Option<&Value> {
    if let Some(form) = present(body.get("formData")) {
        return Some(form);
    }
    let object = body.as_object()?;
    FORM_FIELDS
        .iter()
        .any(|field| object.contains_key(*field))
        .then_some(body)
}

fn parse_form(value: &Value) -> Result<BusinessPlanForm, String> {
    BusinessPlanForm::deserialize(value).map_err(|e| format!("Invalid form data: {}", e))
}

/// Research the market for the submitted business idea
pub async fn research(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Bytes,
) -> Result<Response, AppError> {
    let body = parse_body(&body);
    let Some(raw_form) = body.as_ref().and_then(form_value) else {
        return Err(AppError::validation(MISSING_FORM_DATA));
    };
    let form = parse_form(raw_form).map_err(AppError::Validation)?;

    info!(user_id = %user.user_id(), "Research requested");

    let outcome = state.pipeline.run_research(&form).await?;

    Ok(Json(json!({
        "success": true,
        "category": outcome.category,
        "businessType": outcome.business_type,
        "research": outcome.research,
    }))
    .into_response())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateOptions {
    #[serde(default)]
    save: bool,
    title: Option<String>,
}

fn generate_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Validation problems are 400s; anything else is a 500 under `label`
fn generate_failure(err: PlannerError, label: &str) -> Response {
    match err {
        PlannerError::Validation(ValidationError::Required("researchResults")) => {
            generate_error(StatusCode::BAD_REQUEST, MISSING_RESEARCH_RESULTS)
        }
        PlannerError::Validation(e) => generate_error(StatusCode::BAD_REQUEST, &e.to_string()),
        other => {
            error!(error = %other, "{}", label);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": label,
                    "details": other.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Generate a business plan from form data and previously fetched research.
/// With `save: true` the plan is also stored as a draft for the caller.
pub async fn generate(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Bytes,
) -> Response {
    let body = parse_body(&body).unwrap_or(Value::Null);

    let Some(raw_form) = present(body.get("formData")) else {
        return generate_error(StatusCode::BAD_REQUEST, MISSING_FORM_DATA);
    };
    let form = match parse_form(raw_form) {
        Ok(form) => form,
        Err(message) => return generate_error(StatusCode::BAD_REQUEST, &message),
    };
    let Some(research) = present(body.get("researchResults")) else {
        return generate_error(StatusCode::BAD_REQUEST, MISSING_RESEARCH_RESULTS);
    };
    let research = ResearchResult::new(research.clone());
    let options = GenerateOptions::deserialize(&body).unwrap_or_default();

    info!(user_id = %user.user_id(), save = options.save, "Plan generation requested");

    let plan = match state.pipeline.run_generation(&form, &research).await {
        Ok(plan) => plan,
        Err(e) => return generate_failure(e, GENERATION_FAILED),
    };

    let mut response = json!({
        "businessPlan": plan.content,
        "sections": plan.sections,
    });

    if options.save {
        match state
            .pipeline
            .save_generated(
                &state.db.plan_storage,
                user.user_id(),
                &form,
                &plan,
                options.title.as_deref(),
            )
            .await
        {
            Ok(saved) => response["planId"] = json!(saved.id),
            Err(e) => return generate_failure(e, SAVE_FAILED),
        }
    }

    Json(response).into_response()
}
