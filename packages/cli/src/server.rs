// ABOUTME: HTTP server assembly and startup
// ABOUTME: Builds the application state from config, layers the router, and serves until shutdown

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use planforge_ai::{OpenAIPlanGenerator, PerplexityResearchClient};
use planforge_api::{create_router, AppState};
use planforge_auth::{SessionStore, SessionVerifier, StaticSessionVerifier};
use planforge_planner::PlanPipeline;
use planforge_storage::{connect, DbState};

use crate::config::Config;
use crate::middleware::{cors_layer, create_panic_handler};

/// Connect storage and build the AI clients, pipeline, and session verifier
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let pool = connect(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let research =
        PerplexityResearchClient::from_env().context("Failed to create research client")?;
    let generator = OpenAIPlanGenerator::from_env().context("Failed to create plan generator")?;

    info!(
        research_model = %research.model(),
        plan_model = %generator.model(),
        deadline_secs = config.request_deadline.as_secs(),
        "AI clients configured"
    );

    let pipeline = PlanPipeline::new(Arc::new(research), Arc::new(generator))
        .with_deadline(config.request_deadline);

    let sessions: Arc<dyn SessionVerifier> = match &config.dev_user {
        Some(user) => {
            warn!(
                user_id = %user,
                "Development session verifier active: every token maps to this user"
            );
            Arc::new(StaticSessionVerifier::new(user.clone()))
        }
        None => Arc::new(SessionStore::new(pool.clone())),
    };

    Ok(AppState::new(pipeline, DbState::new(pool), sessions))
}

/// The API router with tracing, CORS, and panic recovery applied
pub fn build_app(state: AppState, config: &Config) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config.cors_origin.clone()))
        .layer(create_panic_handler())
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;
    let app = build_app(state, &config);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;

    info!("Planforge API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
