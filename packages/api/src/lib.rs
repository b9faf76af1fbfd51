// ABOUTME: HTTP API layer for Planforge providing REST endpoints and routing
// ABOUTME: Wires the plan pipeline, storage, and session verification into an axum router

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use planforge_auth::SessionVerifier;
use planforge_planner::PlanPipeline;
use planforge_storage::DbState;

pub mod auth;
pub mod error;
pub mod health;
pub mod plan_handlers;
pub mod planning_handlers;
pub mod response;
pub mod subscription_handlers;

pub use error::{ApiResult, AppError};

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PlanPipeline,
    pub db: DbState,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl AppState {
    pub fn new(pipeline: PlanPipeline, db: DbState, sessions: Arc<dyn SessionVerifier>) -> Self {
        Self {
            pipeline,
            db,
            sessions,
        }
    }
}

/// Creates the plans API router
pub fn create_plans_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/plans",
            get(plan_handlers::list_plans).post(plan_handlers::create_plan),
        )
        .route(
            "/api/plans/{id}",
            get(plan_handlers::get_plan)
                .put(plan_handlers::update_plan)
                .delete(plan_handlers::delete_plan),
        )
}

/// Creates the full API router with session authentication applied
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/research", post(planning_handlers::research))
        .route("/api/generate", post(planning_handlers::generate))
        .route(
            "/api/subscription",
            get(subscription_handlers::get_subscription),
        )
        .merge(create_plans_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_middleware,
        ))
        .with_state(state)
}
