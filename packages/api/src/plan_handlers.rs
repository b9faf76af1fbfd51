// ABOUTME: HTTP request handlers for saved business plans
// ABOUTME: CRUD scoped to the authenticated caller; reads also return public plans

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use planforge_core::{BusinessPlan, NewBusinessPlan, UpdateBusinessPlan};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::response::{created, ok};
use crate::AppState;

/// Query parameters for listing plans
#[derive(Debug, Deserialize)]
pub struct ListPlansQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanList {
    pub plans: Vec<BusinessPlan>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
}

pub async fn create_plan(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<NewBusinessPlan>,
) -> ApiResult<Response> {
    info!(user_id = %user.user_id(), "Creating business plan");
    let plan = state.db.plan_storage.save(user.user_id(), &input).await?;
    Ok(created(plan))
}

pub async fn list_plans(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListPlansQuery>,
) -> ApiResult<Response> {
    let (plans, total) = state
        .db
        .plan_storage
        .list_for_user(user.user_id(), query.limit, query.offset)
        .await?;
    Ok(ok(PlanList { plans, total }))
}

pub async fn get_plan(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let plan = state
        .db
        .plan_storage
        .get(&id, Some(user.user_id()))
        .await?;
    Ok(ok(plan))
}

pub async fn update_plan(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateBusinessPlan>,
) -> ApiResult<Response> {
    info!(user_id = %user.user_id(), plan_id = %id, "Updating business plan");
    let plan = state
        .db
        .plan_storage
        .update(&id, user.user_id(), &input)
        .await?;
    Ok(ok(plan))
}

pub async fn delete_plan(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    info!(user_id = %user.user_id(), plan_id = %id, "Deleting business plan");
    state.db.plan_storage.delete(&id, user.user_id()).await?;
    Ok(ok(Deleted { id }))
}
