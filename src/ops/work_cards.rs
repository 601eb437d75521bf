use super::{clean, companies};
use crate::error::{FurrowError, Result};
use crate::model::{
    WorkCard, WorkCardAction, WorkCardStatus, WorkCardVariance, WorkLog, WorkLogSource, WorkPlan,
};
use crate::store::{Collection, Store};
use crate::validation;
use chrono::Utc;

#[derive(Debug, Clone)]
pub struct NewWorkCard {
    pub company_id: String,
    pub project_id: String,
    pub title: String,
    pub work_type: String,
    pub planned: WorkPlan,
    pub notes: String,
}

/// Changes to a planned card; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct PlanEdit {
    pub title: Option<String>,
    pub work_type: Option<String>,
    pub planned: Option<WorkPlan>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkCardFilter {
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<WorkCardStatus>,
    pub paid: Option<bool>,
}

pub fn plan_work_card(store: &Store, input: NewWorkCard) -> Result<WorkCard> {
    companies::require_active_company(store, &input.company_id)?;
    let title = input.title.trim().to_string();
    validation::validate_name("Title", &title)?;
    validation::validate_label("Project", &input.project_id)?;
    validation::validate_label("Work type", &input.work_type)?;
    validation::validate_notes(&input.notes)?;
    validate_plan(&input.planned)?;

    let mut card = WorkCard::new(
        store.generate_id(Collection::OperationsWorkCards),
        input.company_id,
        input.project_id.trim().to_string(),
        title,
        input.work_type.trim().to_lowercase(),
        input.planned,
    );
    card.notes = input.notes;
    store.insert(&card)?;
    tracing::info!(id = %card.id, title = %card.title, "Planned work card");
    Ok(card)
}

pub fn get_work_card(store: &Store, id: &str) -> Result<WorkCard> {
    store.get(id)
}

pub fn list_work_cards(store: &Store, filter: &WorkCardFilter) -> Result<Vec<WorkCard>> {
    let mut cards = store.list_where(|c: &WorkCard| {
        filter.company_id.as_deref().is_none_or(|id| c.company_id == id)
            && filter.project_id.as_deref().is_none_or(|id| c.project_id == id)
            && filter.status.is_none_or(|s| c.status == s)
            && filter.paid.is_none_or(|p| c.paid == p)
    })?;
    cards.sort_by(|a, b| b.planned.date.cmp(&a.planned.date));
    Ok(cards)
}

pub fn edit_plan(store: &Store, id: &str, edit: PlanEdit) -> Result<WorkCard> {
    let mut card = get_work_card(store, id)?;
    card.apply(WorkCardAction::Edit)?;

    if let Some(title) = edit.title {
        let title = title.trim().to_string();
        validation::validate_name("Title", &title)?;
        card.title = title;
    }
    if let Some(work_type) = edit.work_type {
        validation::validate_label("Work type", &work_type)?;
        card.work_type = work_type.trim().to_lowercase();
    }
    if let Some(planned) = edit.planned {
        validate_plan(&planned)?;
        card.planned = planned;
    }
    if let Some(notes) = edit.notes {
        validation::validate_notes(&notes)?;
        card.notes = notes;
    }
    store.update(&mut card)?;
    tracing::info!(id = %card.id, "Edited work card plan");
    Ok(card)
}

/// Report what was actually done; a rejected card can be resubmitted.
pub fn submit_actual(
    store: &Store,
    id: &str,
    actual: WorkPlan,
    submitted_by: Option<String>,
) -> Result<WorkCard> {
    validate_plan(&actual)?;
    let mut card = get_work_card(store, id)?;
    card.apply(WorkCardAction::Submit)?;
    card.actual = Some(actual);
    card.submitted_by = clean(submitted_by);
    card.rejection_reason = None;
    card.reviewed_by = None;
    store.update(&mut card)?;
    tracing::info!(id = %card.id, "Submitted work card actuals");
    Ok(card)
}

/// Approve a submitted card and write the work log for what was done, in one batch.
pub fn approve_work_card(
    store: &Store,
    id: &str,
    reviewed_by: Option<String>,
) -> Result<(WorkCard, WorkLog)> {
    let mut card = get_work_card(store, id)?;
    card.apply(WorkCardAction::Approve)?;
    let actual = card
        .actual
        .clone()
        .ok_or_else(|| FurrowError::Validation(format!("Work card {} has no actuals", id)))?;

    let inputs: Vec<String> = actual.inputs.iter().map(|i| i.to_string()).collect();
    let mut description = card.title.clone();
    if !inputs.is_empty() {
        description.push_str(&format!(" (inputs: {})", inputs.join(", ")));
    }
    let log = WorkLog::new(
        store.generate_id(Collection::WorkLogs),
        card.company_id.clone(),
        card.project_id.clone(),
        actual.date,
        card.work_type.clone(),
        actual.workers,
    )
    .with_description(description)
    .with_source(WorkLogSource::WorkCard, Some(card.id.clone()));

    card.reviewed_by = clean(reviewed_by);
    card.work_log_id = Some(log.id.clone());

    let mut batch = store.batch();
    batch.update(&mut card)?;
    batch.insert(&log)?;
    batch.commit()?;

    tracing::info!(id = %card.id, work_log = %log.id, "Approved work card");
    Ok((card, log))
}

pub fn reject_work_card(
    store: &Store,
    id: &str,
    reason: &str,
    reviewed_by: Option<String>,
) -> Result<WorkCard> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(FurrowError::Validation(
            "A reason is required to reject a work card".to_string(),
        ));
    }
    let mut card = get_work_card(store, id)?;
    card.apply(WorkCardAction::Reject)?;
    card.rejection_reason = Some(reason.to_string());
    card.reviewed_by = clean(reviewed_by);
    store.update(&mut card)?;
    tracing::info!(id = %card.id, "Rejected work card");
    Ok(card)
}

pub fn mark_work_card_paid(store: &Store, id: &str) -> Result<WorkCard> {
    let mut card = get_work_card(store, id)?;
    card.apply(WorkCardAction::MarkPaid)?;
    card.paid = true;
    card.paid_at = Some(Utc::now());
    store.update(&mut card)?;
    tracing::info!(id = %card.id, "Marked work card as paid");
    Ok(card)
}

pub fn delete_work_card(store: &Store, id: &str) -> Result<()> {
    let card = get_work_card(store, id)?;
    card.ensure_can(WorkCardAction::Delete)?;
    store.delete::<WorkCard>(id)?;
    tracing::info!(id, "Deleted work card");
    Ok(())
}

/// Actual minus planned; available once actuals were submitted.
pub fn work_card_variance(store: &Store, id: &str) -> Result<WorkCardVariance> {
    let card = get_work_card(store, id)?;
    let actual = card.actual.as_ref().ok_or_else(|| {
        FurrowError::Validation(format!("Work card {} has no actuals yet", card.id))
    })?;
    Ok(WorkCardVariance::between(&card.id, &card.planned, actual))
}

fn validate_plan(plan: &WorkPlan) -> Result<()> {
    validation::validate_workers(plan.workers)?;
    validation::validate_non_negative("Labor cost", plan.labor_cost)?;
    for input in &plan.inputs {
        validation::validate_name("Input name", &input.name)?;
        validation::validate_label("Input unit", &input.unit)?;
        validation::validate_positive("Input quantity", input.quantity)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InputLine;
    use crate::ops::testing::{date, seed_company, setup_store};
    use rust_decimal_macros::dec;

    fn plan(store: &Store, company_id: &str) -> WorkCard {
        plan_work_card(
            store,
            NewWorkCard {
                company_id: company_id.to_string(),
                project_id: "tea-block-a".to_string(),
                title: "Top dress block A".to_string(),
                work_type: "Fertilizing".to_string(),
                planned: WorkPlan::new(date(4, 14), 6, dec!(3000))
                    .with_inputs(vec![InputLine::new("CAN", dec!(50), "kg")]),
                notes: String::new(),
            },
        )
        .unwrap()
    }

    fn actual() -> WorkPlan {
        WorkPlan::new(date(4, 15), 7, dec!(3500))
            .with_inputs(vec![InputLine::new("CAN", dec!(48), "kg")])
    }

    #[test]
    fn test_review_flow_writes_work_log() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let card = plan(&store, &company.id);
        assert_eq!(card.work_type, "fertilizing");

        submit_actual(&store, &card.id, actual(), Some("Kiprotich".to_string())).unwrap();
        let (card, log) = approve_work_card(&store, &card.id, Some("Njeri".to_string())).unwrap();

        assert_eq!(card.status, WorkCardStatus::Approved);
        assert_eq!(card.work_log_id.as_deref(), Some(log.id.as_str()));
        assert_eq!(log.source, WorkLogSource::WorkCard);
        assert_eq!(log.workers, 7);
        assert_eq!(log.date, date(4, 15));
        assert!(log.description.contains("CAN:48:kg"));
        assert!(store.exists::<WorkLog>(&log.id));

        let paid = mark_work_card_paid(&store, &card.id).unwrap();
        assert!(paid.paid);
        assert!(matches!(
            mark_work_card_paid(&store, &card.id),
            Err(FurrowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_reject_and_resubmit() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let card = plan(&store, &company.id);
        submit_actual(&store, &card.id, actual(), None).unwrap();

        assert!(reject_work_card(&store, &card.id, "  ", None).is_err());
        let rejected = reject_work_card(&store, &card.id, "Workers count is off", None).unwrap();
        assert_eq!(rejected.status, WorkCardStatus::Rejected);

        let resubmitted = submit_actual(&store, &card.id, actual(), None).unwrap();
        assert_eq!(resubmitted.status, WorkCardStatus::Submitted);
        assert_eq!(resubmitted.rejection_reason, None);
    }

    #[test]
    fn test_edit_and_delete_only_while_planned() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let card = plan(&store, &company.id);

        let edited = edit_plan(
            &store,
            &card.id,
            PlanEdit {
                title: Some("Top dress block A (lower)".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(edited.title, "Top dress block A (lower)");

        submit_actual(&store, &card.id, actual(), None).unwrap();
        assert!(edit_plan(&store, &card.id, PlanEdit::default()).is_err());
        assert!(delete_work_card(&store, &card.id).is_err());
        assert!(approve_work_card(&store, "wc-missing", None).is_err());

        let other = plan(&store, &company.id);
        delete_work_card(&store, &other.id).unwrap();
        assert!(!store.exists::<WorkCard>(&other.id));
    }

    #[test]
    fn test_variance_and_filters() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let card = plan(&store, &company.id);
        assert!(work_card_variance(&store, &card.id).is_err());

        submit_actual(&store, &card.id, actual(), None).unwrap();
        let variance = work_card_variance(&store, &card.id).unwrap();
        assert_eq!(variance.worker_difference, 1);
        assert_eq!(variance.labor_cost_difference, dec!(500));
        assert_eq!(variance.inputs[0].difference, dec!(-2));

        plan(&store, &company.id);
        let submitted = WorkCardFilter {
            status: Some(WorkCardStatus::Submitted),
            ..Default::default()
        };
        assert_eq!(list_work_cards(&store, &submitted).unwrap().len(), 1);
        assert_eq!(list_work_cards(&store, &WorkCardFilter::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_plan_needs_workers() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let card = plan(&store, &company.id);
        let no_workers = WorkPlan::new(date(4, 15), 0, dec!(0));
        assert!(submit_actual(&store, &card.id, no_workers, None).is_err());
    }
}
