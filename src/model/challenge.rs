use super::types::{ChallengeCategory, Severity};
use crate::store::Collection;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A problem observed during a season: pests, weather damage, labour shortages...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonChallenge {
    pub id: String,
    pub company_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    pub season: String,
    pub title: String,

    #[serde(default)]
    pub category: ChallengeCategory,

    #[serde(default)]
    pub severity: Severity,

    pub observed_on: NaiveDate,

    #[serde(default)]
    pub resolved: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl SeasonChallenge {
    pub fn new(
        id: String,
        company_id: String,
        season: String,
        title: String,
        observed_on: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            project_id: None,
            season,
            title,
            category: ChallengeCategory::default(),
            severity: Severity::default(),
            observed_on,
            resolved: false,
            resolution: None,
            resolved_at: None,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    pub fn with_project(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }

    pub fn with_category(mut self, category: ChallengeCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = notes;
        self
    }
}

impl_document!(SeasonChallenge, Collection::SeasonChallenges, |c| c.title.clone());
