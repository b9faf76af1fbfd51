// ABOUTME: Subscription status lookup for the authenticated caller
// ABOUTME: Lookup failures are reported as "unknown" rather than as an inactive subscription

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use planforge_storage::SubscriptionStatus;

use crate::auth::CurrentUser;
use crate::AppState;

pub const UNKNOWN_STATUS: &str = "unknown";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    pub status: String,
    pub plan_name: Option<String>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn get_subscription(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Json<SubscriptionView> {
    let view = match state
        .db
        .subscription_storage
        .get_subscription(user.user_id())
        .await
    {
        Ok(Some(subscription)) => SubscriptionView {
            status: subscription.status.to_string(),
            plan_name: subscription.plan_name,
            current_period_end: subscription.current_period_end,
            active: subscription.status.is_active(),
            error: None,
        },
        Ok(None) => SubscriptionView {
            status: SubscriptionStatus::Inactive.to_string(),
            plan_name: None,
            current_period_end: None,
            active: false,
            error: None,
        },
        Err(e) => {
            warn!(user_id = %user.user_id(), error = %e, "Subscription lookup failed");
            SubscriptionView {
                status: UNKNOWN_STATUS.to_string(),
                plan_name: None,
                current_period_end: None,
                active: false,
                error: Some("Subscription lookup failed".to_string()),
            }
        }
    };

    Json(view)
}
