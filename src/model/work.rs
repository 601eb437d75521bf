use super::types::{WorkCardStatus, WorkLogSource};
use crate::error::{FurrowError, Result};
use crate::store::Collection;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A day of field work: what was done, where, and by how many workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkLog {
    pub id: String,
    pub company_id: String,
    pub project_id: String,
    pub date: NaiveDate,
    pub work_type: String,
    pub workers: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Decimal>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub source: WorkLogSource,

    /// Usage record or work card the log was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl WorkLog {
    pub fn new(
        id: String,
        company_id: String,
        project_id: String,
        date: NaiveDate,
        work_type: String,
        workers: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            project_id,
            date,
            work_type,
            workers,
            hours: None,
            description: String::new(),
            source: WorkLogSource::Manual,
            source_id: None,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    pub fn with_hours(mut self, hours: Option<Decimal>) -> Self {
        self.hours = hours;
        self
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = description;
        self
    }

    pub fn with_source(mut self, source: WorkLogSource, source_id: Option<String>) -> Self {
        self.source = source;
        self.source_id = source_id;
        self
    }

    /// Worker-hours, when hours were recorded and the product fits.
    pub fn worker_hours(&self) -> Option<Decimal> {
        self.hours.and_then(|h| h.checked_mul(Decimal::from(self.workers)))
    }
}

impl_document!(WorkLog, Collection::WorkLogs, |l| format!("{}-{}", l.date, l.work_type));

/// An input consumed by planned or executed work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputLine {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

impl InputLine {
    pub fn new(name: impl Into<String>, quantity: Decimal, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            item_id: None,
        }
    }
}

impl fmt::Display for InputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.quantity, self.unit)
    }
}

/// Parses `name:quantity:unit`, the form inputs take on the command line.
impl FromStr for InputLine {
    type Err = FurrowError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let [name, quantity, unit] = parts.as_slice() else {
            return Err(FurrowError::Parse(format!(
                "Invalid input '{}', expected name:quantity:unit",
                s
            )));
        };
        if name.is_empty() || unit.is_empty() {
            return Err(FurrowError::Parse(format!(
                "Invalid input '{}', name and unit are required",
                s
            )));
        }
        let quantity = Decimal::from_str(quantity)
            .map_err(|e| FurrowError::Parse(format!("Invalid quantity '{}': {}", quantity, e)))?;
        Ok(InputLine::new(*name, quantity, *unit))
    }
}

/// Labour and inputs of a piece of work, either as planned or as executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPlan {
    pub date: NaiveDate,
    pub workers: u32,

    #[serde(default)]
    pub labor_cost: Decimal,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<InputLine>,
}

impl WorkPlan {
    pub fn new(date: NaiveDate, workers: u32, labor_cost: Decimal) -> Self {
        Self {
            date,
            workers,
            labor_cost,
            inputs: Vec::new(),
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<InputLine>) -> Self {
        self.inputs = inputs;
        self
    }
}

/// Everything that can happen to a work card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkCardAction {
    Edit,
    Submit,
    Approve,
    Reject,
    MarkPaid,
    Delete,
}

/// Allowed actions: (action, statuses it may start from, status it leads to).
/// Delete has no target since the card is removed.
const TRANSITIONS: &[(WorkCardAction, &[WorkCardStatus], Option<WorkCardStatus>)] = &[
    (
        WorkCardAction::Edit,
        &[WorkCardStatus::Planned],
        Some(WorkCardStatus::Planned),
    ),
    (
        WorkCardAction::Submit,
        &[WorkCardStatus::Planned, WorkCardStatus::Rejected],
        Some(WorkCardStatus::Submitted),
    ),
    (
        WorkCardAction::Approve,
        &[WorkCardStatus::Submitted],
        Some(WorkCardStatus::Approved),
    ),
    (
        WorkCardAction::Reject,
        &[WorkCardStatus::Submitted],
        Some(WorkCardStatus::Rejected),
    ),
    (
        WorkCardAction::MarkPaid,
        &[WorkCardStatus::Approved],
        Some(WorkCardStatus::Approved),
    ),
    (WorkCardAction::Delete, &[WorkCardStatus::Planned], None),
];

impl WorkCardAction {
    fn entry(self) -> (&'static [WorkCardStatus], Option<WorkCardStatus>) {
        for (action, from, to) in TRANSITIONS {
            if *action == self {
                return (*from, *to);
            }
        }
        (&[], None)
    }

    pub fn allowed_from(self, status: WorkCardStatus) -> bool {
        self.entry().0.contains(&status)
    }

    pub fn target(self) -> Option<WorkCardStatus> {
        self.entry().1
    }
}

impl fmt::Display for WorkCardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkCardAction::Edit => write!(f, "edit"),
            WorkCardAction::Submit => write!(f, "submit"),
            WorkCardAction::Approve => write!(f, "approve"),
            WorkCardAction::Reject => write!(f, "reject"),
            WorkCardAction::MarkPaid => write!(f, "mark paid"),
            WorkCardAction::Delete => write!(f, "delete"),
        }
    }
}

/// Planned field work with the manager's report of what was actually done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCard {
    pub id: String,
    pub company_id: String,
    pub project_id: String,
    pub title: String,
    pub work_type: String,
    pub planned: WorkPlan,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<WorkPlan>,

    #[serde(default)]
    pub status: WorkCardStatus,

    #[serde(default)]
    pub paid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,

    /// Work log generated on approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_log_id: Option<String>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl WorkCard {
    pub fn new(
        id: String,
        company_id: String,
        project_id: String,
        title: String,
        work_type: String,
        planned: WorkPlan,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            project_id,
            title,
            work_type,
            planned,
            actual: None,
            status: WorkCardStatus::Planned,
            paid: false,
            paid_at: None,
            submitted_by: None,
            reviewed_by: None,
            rejection_reason: None,
            work_log_id: None,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    /// Checks `action` against the transition table without changing the card.
    pub fn ensure_can(&self, action: WorkCardAction) -> Result<()> {
        let paid_again = action == WorkCardAction::MarkPaid && self.paid;
        if !action.allowed_from(self.status) || paid_again {
            let status = if paid_again {
                "already paid".to_string()
            } else {
                self.status.to_string()
            };
            return Err(FurrowError::InvalidTransition {
                id: self.id.clone(),
                status,
                action: action.to_string(),
            });
        }
        Ok(())
    }

    /// Moves the card along the transition table.
    pub fn apply(&mut self, action: WorkCardAction) -> Result<()> {
        self.ensure_can(action)?;
        if let Some(status) = action.target() {
            self.status = status;
        }
        Ok(())
    }

    pub fn awaiting_review(&self) -> bool {
        self.status == WorkCardStatus::Submitted
    }

    pub fn awaiting_payment(&self) -> bool {
        self.status == WorkCardStatus::Approved && !self.paid
    }
}

impl_document!(WorkCard, Collection::OperationsWorkCards, |c| c.title.clone());

/// Actual minus planned for one input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputVariance {
    pub name: String,
    pub unit: String,
    pub planned: Decimal,
    pub actual: Decimal,
    pub difference: Decimal,
}

/// Actual minus planned for a whole work card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkCardVariance {
    pub card_id: String,
    pub planned_workers: u32,
    pub actual_workers: u32,
    pub worker_difference: i64,
    pub planned_labor_cost: Decimal,
    pub actual_labor_cost: Decimal,
    pub labor_cost_difference: Decimal,
    pub inputs: Vec<InputVariance>,
}

impl WorkCardVariance {
    /// Compares the actual plan against the planned one. Inputs are grouped by name
    /// (case-insensitive) into one row each, in planned order followed by unplanned actual
    /// inputs. The first line seen names the row and gives its unit.
    pub fn between(card_id: &str, planned: &WorkPlan, actual: &WorkPlan) -> Self {
        let mut inputs: Vec<InputVariance> = Vec::new();
        let row_for = |inputs: &mut Vec<InputVariance>, line: &InputLine| -> usize {
            match inputs.iter().position(|v| v.name.eq_ignore_ascii_case(&line.name)) {
                Some(index) => index,
                None => {
                    inputs.push(InputVariance {
                        name: line.name.clone(),
                        unit: line.unit.clone(),
                        planned: Decimal::ZERO,
                        actual: Decimal::ZERO,
                        difference: Decimal::ZERO,
                    });
                    inputs.len() - 1
                }
            }
        };

        for line in &planned.inputs {
            let index = row_for(&mut inputs, line);
            inputs[index].planned = inputs[index].planned.saturating_add(line.quantity);
        }
        for line in &actual.inputs {
            let index = row_for(&mut inputs, line);
            inputs[index].actual = inputs[index].actual.saturating_add(line.quantity);
        }
        for row in &mut inputs {
            row.difference = row.actual.saturating_sub(row.planned);
        }

        Self {
            card_id: card_id.to_string(),
            planned_workers: planned.workers,
            actual_workers: actual.workers,
            worker_difference: i64::from(actual.workers) - i64::from(planned.workers),
            planned_labor_cost: planned.labor_cost,
            actual_labor_cost: actual.labor_cost,
            labor_cost_difference: actual.labor_cost.saturating_sub(planned.labor_cost),
            inputs,
        }
    }
}
