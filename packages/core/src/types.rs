// ABOUTME: Business plan domain type definitions
// ABOUTME: Form input, category taxonomy, plan sections, and the persisted plan entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Form data submitted by the client when requesting research or generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPlanForm {
    #[serde(default)]
    pub business_idea: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub stage: String,
}

/// Funding/operational stage of the business being planned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "New Company")]
    NewCompany,
    #[serde(rename = "Existing Business")]
    ExistingBusiness,
    #[serde(rename = "Expansion")]
    Expansion,
    #[serde(rename = "Acquisition")]
    Acquisition,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::NewCompany,
        Category::ExistingBusiness,
        Category::Expansion,
        Category::Acquisition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::NewCompany => "New Company",
            Category::ExistingBusiness => "Existing Business",
            Category::Expansion => "Expansion",
            Category::Acquisition => "Acquisition",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// A titled block of generated business plan text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessPlanSection {
    pub title: String,
    pub content: String,
}

impl BusinessPlanSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Published => "published",
            PlanStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "published" => Ok(PlanStatus::Published),
            "archived" => Ok(PlanStatus::Archived),
            _ => Err(format!("Unknown plan status: {}", s)),
        }
    }
}

/// Persisted business plan owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessPlan {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub business_idea: String,
    pub location: String,
    pub category: Category,
    pub sections: Vec<BusinessPlanSection>,
    pub status: PlanStatus,
    pub version: i64,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for saving a freshly generated plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBusinessPlan {
    pub title: String,
    #[serde(default)]
    pub business_idea: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub sections: Vec<BusinessPlanSection>,
    #[serde(default)]
    pub status: PlanStatus,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update for an existing plan; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessPlan {
    pub title: Option<String>,
    pub sections: Option<Vec<BusinessPlanSection>>,
    pub status: Option<PlanStatus>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl UpdateBusinessPlan {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.sections.is_none()
            && self.status.is_none()
            && self.is_public.is_none()
            && self.tags.is_none()
    }
}
