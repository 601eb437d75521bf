use super::{companies, today};
use crate::error::{FurrowError, Result};
use crate::model::WorkLog;
use crate::store::{Collection, Store};
use crate::validation;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Work type used when a log only carries a description.
pub const GENERAL_WORK: &str = "general";

#[derive(Debug, Clone, Default)]
pub struct NewWorkLog {
    pub company_id: String,
    pub project_id: String,
    pub date: Option<NaiveDate>,
    pub work_type: String,
    pub workers: u32,
    pub hours: Option<Decimal>,
    pub description: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct WorkLogUpdate {
    pub project_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub work_type: Option<String>,
    pub workers: Option<u32>,
    pub hours: Option<Decimal>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkLogFilter {
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub work_type: Option<String>,
}

impl WorkLogFilter {
    fn matches(&self, log: &WorkLog) -> bool {
        self.company_id.as_deref().is_none_or(|c| log.company_id == c)
            && self.project_id.as_deref().is_none_or(|p| log.project_id == p)
            && self.from.is_none_or(|from| log.date >= from)
            && self.to.is_none_or(|to| log.date <= to)
            && self
                .work_type
                .as_deref()
                .is_none_or(|t| log.work_type.eq_ignore_ascii_case(t))
    }
}

/// Labour spent on one type of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaborSummary {
    pub work_type: String,
    pub logs: usize,
    pub worker_days: u32,
    pub worker_hours: Decimal,
}

pub fn log_work(store: &Store, input: NewWorkLog) -> Result<WorkLog> {
    companies::require_active_company(store, &input.company_id)?;
    validation::validate_label("Project", &input.project_id)?;
    validation::validate_workers(input.workers)?;
    validation::validate_notes(&input.notes)?;
    if let Some(hours) = input.hours {
        validation::validate_positive("Hours", hours)?;
    }

    let description = input.description.trim().to_string();
    let work_type = match input.work_type.trim() {
        "" if description.is_empty() => {
            return Err(FurrowError::Validation(
                "A work type or a description is required".to_string(),
            ));
        }
        "" => GENERAL_WORK.to_string(),
        work_type => work_type.to_lowercase(),
    };

    let mut log = WorkLog::new(
        store.generate_id(Collection::WorkLogs),
        input.company_id,
        input.project_id.trim().to_string(),
        input.date.unwrap_or_else(today),
        work_type,
        input.workers,
    )
    .with_hours(input.hours)
    .with_description(description);
    log.notes = input.notes;
    store.insert(&log)?;
    tracing::info!(id = %log.id, work_type = %log.work_type, workers = log.workers, "Logged work");
    Ok(log)
}

pub fn get_work_log(store: &Store, id: &str) -> Result<WorkLog> {
    store.get(id)
}

/// Matching logs, most recent day first.
pub fn list_work_logs(store: &Store, filter: &WorkLogFilter) -> Result<Vec<WorkLog>> {
    let mut logs = store.list_where(|log: &WorkLog| filter.matches(log))?;
    logs.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(logs)
}

pub fn update_work_log(store: &Store, id: &str, update: WorkLogUpdate) -> Result<WorkLog> {
    let mut log = get_work_log(store, id)?;
    if let Some(project_id) = update.project_id {
        validation::validate_label("Project", &project_id)?;
        log.project_id = project_id.trim().to_string();
    }
    if let Some(date) = update.date {
        log.date = date;
    }
    if let Some(work_type) = update.work_type {
        validation::validate_label("Work type", &work_type)?;
        log.work_type = work_type.trim().to_lowercase();
    }
    if let Some(workers) = update.workers {
        validation::validate_workers(workers)?;
        log.workers = workers;
    }
    if let Some(hours) = update.hours {
        validation::validate_positive("Hours", hours)?;
        log.hours = Some(hours);
    }
    if let Some(description) = update.description {
        log.description = description.trim().to_string();
    }
    if let Some(notes) = update.notes {
        validation::validate_notes(&notes)?;
        log.notes = notes;
    }
    store.update(&mut log)?;
    tracing::info!(id = %log.id, "Updated work log");
    Ok(log)
}

pub fn delete_work_log(store: &Store, id: &str) -> Result<()> {
    store.delete::<WorkLog>(id)?;
    tracing::info!(id, "Deleted work log");
    Ok(())
}

/// Worker-days and worker-hours per work type for the matching logs.
pub fn labor_summary(store: &Store, filter: &WorkLogFilter) -> Result<Vec<LaborSummary>> {
    let mut by_type: BTreeMap<String, LaborSummary> = BTreeMap::new();
    for log in list_work_logs(store, filter)? {
        let row = by_type
            .entry(log.work_type.clone())
            .or_insert_with(|| LaborSummary {
                work_type: log.work_type.clone(),
                logs: 0,
                worker_days: 0,
                worker_hours: Decimal::ZERO,
            });
        let hours = match log.hours {
            Some(h) => validation::checked_mul("Worker-hours", h, Decimal::from(log.workers))?,
            None => Decimal::ZERO,
        };
        row.logs += 1;
        row.worker_days = validation::checked_count("Worker-days", row.worker_days, log.workers)?;
        row.worker_hours = validation::checked_add("Worker-hours", row.worker_hours, hours)?;
    }
    Ok(by_type.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::{date, seed_company, setup_store};
    use rust_decimal_macros::dec;

    fn input(company_id: &str, work_type: &str, day: u32, workers: u32) -> NewWorkLog {
        NewWorkLog {
            company_id: company_id.to_string(),
            project_id: "tea-block-a".to_string(),
            date: Some(date(4, day)),
            work_type: work_type.to_string(),
            workers,
            hours: Some(dec!(8)),
            description: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_log_requires_type_or_description() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);

        assert!(log_work(&store, input(&company.id, " ", 1, 3)).is_err());
        let mut described = input(&company.id, "", 1, 3);
        described.description = "Cleared the drainage channel".to_string();
        assert_eq!(log_work(&store, described).unwrap().work_type, GENERAL_WORK);
        assert!(log_work(&store, input(&company.id, "weeding", 1, 0)).is_err());
    }

    #[test]
    fn test_filter_by_date_range() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        log_work(&store, input(&company.id, "Weeding", 1, 3)).unwrap();
        log_work(&store, input(&company.id, "pruning", 10, 5)).unwrap();
        log_work(&store, input(&company.id, "weeding", 20, 4)).unwrap();

        let filter = WorkLogFilter {
            from: Some(date(4, 5)),
            to: Some(date(4, 20)),
            ..Default::default()
        };
        let logs = list_work_logs(&store, &filter).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].date, date(4, 20));

        let weeding = WorkLogFilter {
            work_type: Some("WEEDING".to_string()),
            ..Default::default()
        };
        assert_eq!(list_work_logs(&store, &weeding).unwrap().len(), 2);
    }

    #[test]
    fn test_labor_summary_per_work_type() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        log_work(&store, input(&company.id, "weeding", 1, 3)).unwrap();
        log_work(&store, input(&company.id, "weeding", 2, 4)).unwrap();
        let mut no_hours = input(&company.id, "pruning", 3, 2);
        no_hours.hours = None;
        log_work(&store, no_hours).unwrap();

        let summary = labor_summary(&store, &WorkLogFilter::default()).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].work_type, "pruning");
        assert_eq!(summary[0].worker_hours, dec!(0));
        assert_eq!(summary[1].worker_days, 7);
        assert_eq!(summary[1].worker_hours, dec!(56));
    }

    #[test]
    fn test_labor_summary_overflow_is_an_error() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        for day in 1..=2 {
            let log = WorkLog::new(
                store.generate_id(Collection::WorkLogs),
                company.id.clone(),
                "tea-block-a".to_string(),
                date(4, day),
                "weeding".to_string(),
                u32::MAX,
            );
            store.insert(&log).unwrap();
        }

        let err = labor_summary(&store, &WorkLogFilter::default()).unwrap_err();
        assert!(matches!(err, FurrowError::Validation(_)));
    }

    #[test]
    fn test_update_and_delete() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let log = log_work(&store, input(&company.id, "weeding", 1, 3)).unwrap();

        let updated = update_work_log(
            &store,
            &log.id,
            WorkLogUpdate {
                workers: Some(6),
                description: Some("Block A lower terraces".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.workers, 6);
        assert!(update_work_log(
            &store,
            &log.id,
            WorkLogUpdate {
                workers: Some(0),
                ..Default::default()
            }
        )
        .is_err());

        delete_work_log(&store, &log.id).unwrap();
        assert!(get_work_log(&store, &log.id).is_err());
    }
}
