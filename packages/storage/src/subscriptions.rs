// ABOUTME: Per-user subscription records
// ABOUTME: One row per user, written by billing sync and read by the API

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::{StorageError, StorageResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    #[default]
    Inactive,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Inactive => "inactive",
        }
    }

    /// Whether the subscription currently grants paid features
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active | SubscriptionStatus::Trialing
        )
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            "inactive" => Ok(SubscriptionStatus::Inactive),
            other => Err(format!("Unknown subscription status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: String,
    pub status: SubscriptionStatus,
    pub plan_name: Option<String>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct SubscriptionRow {
    user_id: String,
    status: String,
    plan_name: Option<String>,
    current_period_end: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = StorageError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            status: row.status.parse().map_err(StorageError::InvalidData)?,
            user_id: row.user_id,
            plan_name: row.plan_name,
            current_period_end: row.current_period_end,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct SubscriptionStorage {
    pool: SqlitePool,
}

impl SubscriptionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// `None` when the user has never had a subscription record
    pub async fn get_subscription(&self, user_id: &str) -> StorageResult<Option<Subscription>> {
        debug!("Looking up subscription for user {}", user_id);

        sqlx::query_as::<_, SubscriptionRow>("SELECT * FROM subscriptions WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(Subscription::try_from)
            .transpose()
    }

    pub async fn upsert_subscription(
        &self,
        user_id: &str,
        status: SubscriptionStatus,
        plan_name: Option<&str>,
        current_period_end: Option<DateTime<Utc>>,
    ) -> StorageResult<Subscription> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            INSERT INTO subscriptions (user_id, status, plan_name, current_period_end, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                status = excluded.status,
                plan_name = excluded.plan_name,
                current_period_end = excluded.current_period_end,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(status.as_str())
        .bind(plan_name)
        .bind(current_period_end)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("Subscription for user {} set to {}", user_id, status);
        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect_in_memory;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_subscription_is_none() {
        let storage = SubscriptionStorage::new(connect_in_memory().await.unwrap());
        assert_eq!(storage.get_subscription("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let storage = SubscriptionStorage::new(connect_in_memory().await.unwrap());
        let period_end = Utc::now() + Duration::days(30);

        let created = storage
            .upsert_subscription(
                "user-1",
                SubscriptionStatus::Trialing,
                Some("pro"),
                Some(period_end),
            )
            .await
            .unwrap();
        assert_eq!(created.status, SubscriptionStatus::Trialing);
        assert!(created.status.is_active());

        storage
            .upsert_subscription("user-1", SubscriptionStatus::Canceled, None, None)
            .await
            .unwrap();

        let fetched = storage.get_subscription("user-1").await.unwrap().unwrap();
        assert_eq!(fetched.status, SubscriptionStatus::Canceled);
        assert_eq!(fetched.plan_name, None);
        assert_eq!(fetched.current_period_end, None);
        assert!(!fetched.status.is_active());
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Trialing,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Inactive,
        ] {
            assert_eq!(status.as_str().parse::<SubscriptionStatus>(), Ok(status));
        }
        assert!("gold".parse::<SubscriptionStatus>().is_err());
    }
}
