// ABOUTME: Persistence for generated business plans
// ABOUTME: Every mutating query is scoped to the owning user; reads also allow public plans

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use planforge_core::{
    generate_plan_id, normalize_tags, validate_new_plan, validate_tags, validate_title,
    BusinessPlan, BusinessPlanSection, NewBusinessPlan, UpdateBusinessPlan, ValidationError,
};

use crate::{StorageError, StorageResult};

/// Maximum serialized size of a plan's sections (1MB)
const MAX_SECTIONS_SIZE: usize = 1024 * 1024;

/// Maximum allowed value for LIMIT
pub const MAX_PAGINATION_LIMIT: i64 = 500;

/// Maximum allowed value for OFFSET
const MAX_PAGINATION_OFFSET: i64 = 1_000_000;

const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, FromRow)]
struct PlanRow {
    id: String,
    user_id: String,
    title: String,
    business_idea: String,
    location: String,
    category: String,
    sections: Json<Vec<BusinessPlanSection>>,
    status: String,
    version: i64,
    is_public: bool,
    tags: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for BusinessPlan {
    type Error = StorageError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(BusinessPlan {
            category: row.category.parse().map_err(StorageError::InvalidData)?,
            status: row.status.parse().map_err(StorageError::InvalidData)?,
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            business_idea: row.business_idea,
            location: row.location,
            sections: row.sections.0,
            version: row.version,
            is_public: row.is_public,
            tags: row.tags.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn validate_sections_size(sections: &[BusinessPlanSection]) -> StorageResult<()> {
    let size = serde_json::to_vec(sections)?.len();
    if size > MAX_SECTIONS_SIZE {
        return Err(StorageError::InvalidInput(format!(
            "Plan sections exceed maximum size of {} bytes (got {} bytes)",
            MAX_SECTIONS_SIZE, size
        )));
    }
    Ok(())
}

fn validate_pagination(limit: i64, offset: i64) -> StorageResult<()> {
    if !(1..=MAX_PAGINATION_LIMIT).contains(&limit) {
        return Err(StorageError::InvalidInput(format!(
            "LIMIT must be between 1 and {} (got {})",
            MAX_PAGINATION_LIMIT, limit
        )));
    }
    if !(0..=MAX_PAGINATION_OFFSET).contains(&offset) {
        return Err(StorageError::InvalidInput(format!(
            "OFFSET must be between 0 and {} (got {})",
            MAX_PAGINATION_OFFSET, offset
        )));
    }
    Ok(())
}

/// Storage layer for business plans
#[derive(Clone)]
pub struct PlanStorage {
    pool: SqlitePool,
}

impl PlanStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save a new plan for `user_id`. Assigns the id, version 1, and timestamps.
    pub async fn save(&self, user_id: &str, plan: &NewBusinessPlan) -> StorageResult<BusinessPlan> {
        if user_id.trim().is_empty() {
            return Err(StorageError::InvalidInput("user_id is required".to_string()));
        }
        validate_new_plan(plan).map_err(|e| StorageError::InvalidInput(e.to_string()))?;
        validate_sections_size(&plan.sections)?;

        let id = generate_plan_id();
        let now = Utc::now();
        let tags = normalize_tags(&plan.tags);

        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            INSERT INTO business_plans (
                id, user_id, title, business_idea, location, category,
                sections, status, version, is_public, tags, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(plan.title.trim())
        .bind(&plan.business_idea)
        .bind(&plan.location)
        .bind(plan.category.as_str())
        .bind(Json(&plan.sections))
        .bind(plan.status.as_str())
        .bind(plan.is_public)
        .bind(Json(&tags))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("Saved business plan {} for user {}", id, user_id);
        row.try_into()
    }

    /// Fetch a plan visible to `viewer`: owned by them, or public.
    /// Anonymous viewers only see public plans.
    pub async fn get(&self, id: &str, viewer: Option<&str>) -> StorageResult<BusinessPlan> {
        sqlx::query_as::<_, PlanRow>(
            "SELECT * FROM business_plans WHERE id = ? AND (user_id = ? OR is_public = 1)",
        )
        .bind(id)
        .bind(viewer)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?
        .try_into()
    }

    /// Fetch a plan only if `user_id` owns it
    pub async fn get_owned(&self, id: &str, user_id: &str) -> StorageResult<BusinessPlan> {
        sqlx::query_as::<_, PlanRow>("SELECT * FROM business_plans WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?
            .try_into()
    }

    /// List a user's plans newest first, with the total count
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> StorageResult<(Vec<BusinessPlan>, i64)> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = offset.unwrap_or(0);
        validate_pagination(limit, offset)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM business_plans WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT * FROM business_plans
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        debug!("Listed {} of {} plans for user {}", rows.len(), total, user_id);

        let plans = rows
            .into_iter()
            .map(BusinessPlan::try_from)
            .collect::<StorageResult<Vec<_>>>()?;
        Ok((plans, total))
    }

    /// Apply a partial update in one statement. Unset fields keep their stored
    /// value. Owner only; bumps `version` and `updated_at`.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        update: &UpdateBusinessPlan,
    ) -> StorageResult<BusinessPlan> {
        if update.is_empty() {
            return Err(StorageError::InvalidInput("No fields to update".to_string()));
        }

        let invalid = |e: ValidationError| StorageError::InvalidInput(e.to_string());
        let title = match &update.title {
            Some(t) => {
                validate_title(t).map_err(invalid)?;
                Some(t.trim().to_string())
            }
            None => None,
        };
        if let Some(sections) = &update.sections {
            validate_sections_size(sections)?;
        }
        let tags = match &update.tags {
            Some(t) => {
                validate_tags(t).map_err(invalid)?;
                Some(normalize_tags(t))
            }
            None => None,
        };

        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            UPDATE business_plans
            SET title = COALESCE(?, title),
                sections = COALESCE(?, sections),
                status = COALESCE(?, status),
                is_public = COALESCE(?, is_public),
                tags = COALESCE(?, tags),
                version = version + 1,
                updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(update.sections.as_ref().map(Json))
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.is_public)
        .bind(tags.map(Json))
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        info!("Updated business plan {} to version {}", id, row.version);
        row.try_into()
    }

    /// Delete a plan. Owner only.
    pub async fn delete(&self, id: &str, user_id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM business_plans WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        info!("Deleted business plan {} for user {}", id, user_id);
        Ok(())
    }
}
