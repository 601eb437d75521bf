use super::{clean, companies, today};
use crate::error::{FurrowError, Result};
use crate::model::{ChallengeCategory, SeasonChallenge, Severity};
use crate::store::{Collection, Store};
use crate::validation;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct NewChallenge {
    pub company_id: String,
    pub project_id: Option<String>,
    pub season: String,
    pub title: String,
    pub category: ChallengeCategory,
    pub severity: Severity,
    pub observed_on: Option<NaiveDate>,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChallengeUpdate {
    pub project_id: Option<String>,
    pub season: Option<String>,
    pub title: Option<String>,
    pub category: Option<ChallengeCategory>,
    pub severity: Option<Severity>,
    pub observed_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChallengeFilter {
    pub company_id: Option<String>,
    pub season: Option<String>,
    pub category: Option<ChallengeCategory>,
    pub severity: Option<Severity>,
    pub resolved: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: ChallengeCategory,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

/// Challenge counts of one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: String,
    pub total: usize,
    pub open: usize,
    pub by_category: Vec<CategoryCount>,
    pub by_severity: Vec<SeverityCount>,
}

pub fn report_challenge(store: &Store, input: NewChallenge) -> Result<SeasonChallenge> {
    companies::require_active_company(store, &input.company_id)?;
    let title = input.title.trim().to_string();
    validation::validate_name("Title", &title)?;
    validation::validate_label("Season", &input.season)?;
    validation::validate_notes(&input.notes)?;

    let challenge = SeasonChallenge::new(
        store.generate_id(Collection::SeasonChallenges),
        input.company_id,
        input.season.trim().to_string(),
        title,
        input.observed_on.unwrap_or_else(today),
    )
    .with_project(clean(input.project_id))
    .with_category(input.category)
    .with_severity(input.severity)
    .with_notes(input.notes);
    store.insert(&challenge)?;
    tracing::info!(
        id = %challenge.id,
        category = %challenge.category,
        severity = %challenge.severity,
        "Reported challenge"
    );
    Ok(challenge)
}

pub fn get_challenge(store: &Store, id: &str) -> Result<SeasonChallenge> {
    store.get(id)
}

/// Matching challenges, most severe first, then most recently observed.
pub fn list_challenges(store: &Store, filter: &ChallengeFilter) -> Result<Vec<SeasonChallenge>> {
    let mut challenges = store.list_where(|c: &SeasonChallenge| {
        filter.company_id.as_deref().is_none_or(|id| c.company_id == id)
            && filter
                .season
                .as_deref()
                .is_none_or(|s| c.season.eq_ignore_ascii_case(s))
            && filter.category.is_none_or(|cat| c.category == cat)
            && filter.severity.is_none_or(|sev| c.severity == sev)
            && filter.resolved.is_none_or(|r| c.resolved == r)
    })?;
    challenges.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.observed_on.cmp(&a.observed_on))
    });
    Ok(challenges)
}

pub fn update_challenge(store: &Store, id: &str, update: ChallengeUpdate) -> Result<SeasonChallenge> {
    let mut challenge = get_challenge(store, id)?;
    if let Some(project_id) = update.project_id {
        challenge.project_id = clean(Some(project_id));
    }
    if let Some(season) = update.season {
        validation::validate_label("Season", &season)?;
        challenge.season = season.trim().to_string();
    }
    if let Some(title) = update.title {
        let title = title.trim().to_string();
        validation::validate_name("Title", &title)?;
        challenge.title = title;
    }
    if let Some(category) = update.category {
        challenge.category = category;
    }
    if let Some(severity) = update.severity {
        challenge.severity = severity;
    }
    if let Some(observed_on) = update.observed_on {
        challenge.observed_on = observed_on;
    }
    if let Some(notes) = update.notes {
        validation::validate_notes(&notes)?;
        challenge.notes = notes;
    }
    store.update(&mut challenge)?;
    tracing::info!(id = %challenge.id, "Updated challenge");
    Ok(challenge)
}

pub fn resolve_challenge(store: &Store, id: &str, resolution: &str) -> Result<SeasonChallenge> {
    let resolution = resolution.trim();
    if resolution.is_empty() {
        return Err(FurrowError::Validation(
            "Describe how the challenge was resolved".to_string(),
        ));
    }
    let mut challenge = get_challenge(store, id)?;
    if challenge.resolved {
        return Err(FurrowError::Validation(format!(
            "Challenge {} is already resolved",
            id
        )));
    }
    challenge.resolved = true;
    challenge.resolution = Some(resolution.to_string());
    challenge.resolved_at = Some(Utc::now());
    store.update(&mut challenge)?;
    tracing::info!(id = %challenge.id, "Resolved challenge");
    Ok(challenge)
}

pub fn reopen_challenge(store: &Store, id: &str) -> Result<SeasonChallenge> {
    let mut challenge = get_challenge(store, id)?;
    if !challenge.resolved {
        return Err(FurrowError::Validation(format!(
            "Challenge {} is not resolved",
            id
        )));
    }
    challenge.resolved = false;
    challenge.resolution = None;
    challenge.resolved_at = None;
    store.update(&mut challenge)?;
    tracing::info!(id = %challenge.id, "Reopened challenge");
    Ok(challenge)
}

pub fn delete_challenge(store: &Store, id: &str) -> Result<()> {
    store.delete::<SeasonChallenge>(id)?;
    tracing::info!(id, "Deleted challenge");
    Ok(())
}

/// Per-season totals by category and severity, seasons in name order.
pub fn challenge_summary(store: &Store, filter: &ChallengeFilter) -> Result<Vec<SeasonSummary>> {
    let mut seasons: BTreeMap<String, Vec<SeasonChallenge>> = BTreeMap::new();
    for challenge in list_challenges(store, filter)? {
        seasons
            .entry(challenge.season.clone())
            .or_default()
            .push(challenge);
    }

    Ok(seasons
        .into_iter()
        .map(|(season, challenges)| {
            let mut by_category: BTreeMap<ChallengeCategory, usize> = BTreeMap::new();
            let mut by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
            for c in &challenges {
                *by_category.entry(c.category).or_default() += 1;
                *by_severity.entry(c.severity).or_default() += 1;
            }
            SeasonSummary {
                season,
                total: challenges.len(),
                open: challenges.iter().filter(|c| !c.resolved).count(),
                by_category: by_category
                    .into_iter()
                    .map(|(category, count)| CategoryCount { category, count })
                    .collect(),
                by_severity: by_severity
                    .into_iter()
                    .rev()
                    .map(|(severity, count)| SeverityCount { severity, count })
                    .collect(),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::{date, seed_company, setup_store};

    fn report(
        store: &Store,
        company_id: &str,
        season: &str,
        category: ChallengeCategory,
        severity: Severity,
    ) -> SeasonChallenge {
        report_challenge(
            store,
            NewChallenge {
                company_id: company_id.to_string(),
                project_id: Some("maize-field-2".to_string()),
                season: season.to_string(),
                title: format!("{} problem", category),
                category,
                severity,
                observed_on: Some(date(5, 3)),
                notes: String::new(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_and_reopen() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let challenge = report(&store, &company.id, "2026 long rains", ChallengeCategory::Pest, Severity::High);

        assert!(resolve_challenge(&store, &challenge.id, "").is_err());
        let resolved = resolve_challenge(&store, &challenge.id, "Sprayed with Duduthrin").unwrap();
        assert!(resolved.resolved);
        assert!(resolved.resolved_at.is_some());
        assert!(resolve_challenge(&store, &challenge.id, "again").is_err());

        let reopened = reopen_challenge(&store, &challenge.id).unwrap();
        assert!(!reopened.resolved);
        assert_eq!(reopened.resolution, None);
        assert!(reopen_challenge(&store, &challenge.id).is_err());
    }

    #[test]
    fn test_list_orders_by_severity() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        report(&store, &company.id, "2026 long rains", ChallengeCategory::Weather, Severity::Low);
        report(&store, &company.id, "2026 long rains", ChallengeCategory::Pest, Severity::Critical);

        let all = list_challenges(&store, &ChallengeFilter::default()).unwrap();
        assert_eq!(all[0].severity, Severity::Critical);

        let weather = ChallengeFilter {
            category: Some(ChallengeCategory::Weather),
            ..Default::default()
        };
        assert_eq!(list_challenges(&store, &weather).unwrap().len(), 1);
    }

    #[test]
    fn test_summary_per_season() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let pest = report(&store, &company.id, "2026 long rains", ChallengeCategory::Pest, Severity::High);
        report(&store, &company.id, "2026 long rains", ChallengeCategory::Pest, Severity::Medium);
        report(&store, &company.id, "2026 long rains", ChallengeCategory::Labor, Severity::Medium);
        report(&store, &company.id, "2025 short rains", ChallengeCategory::Market, Severity::Low);
        resolve_challenge(&store, &pest.id, "Sprayed").unwrap();

        let summary = challenge_summary(&store, &ChallengeFilter::default()).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].season, "2025 short rains");

        let long_rains = &summary[1];
        assert_eq!(long_rains.total, 3);
        assert_eq!(long_rains.open, 2);
        assert_eq!(
            long_rains.by_category[0],
            CategoryCount {
                category: ChallengeCategory::Pest,
                count: 2
            }
        );
        assert_eq!(long_rains.by_severity[0].severity, Severity::High);
    }
}
