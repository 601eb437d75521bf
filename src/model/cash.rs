use super::types::CashEntryKind;
use crate::error::{FurrowError, Result};
use crate::store::Collection;
use crate::validation;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One movement in a cash pool's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashEntry {
    pub at: DateTime<Utc>,
    pub kind: CashEntryKind,
    pub amount: Decimal,
    pub balance_after: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Running cash balance for one project and crop, carried across harvest collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashPool {
    pub id: String,
    pub company_id: String,
    pub project_id: String,
    pub crop: String,

    #[serde(default)]
    pub balance: Decimal,

    #[serde(default)]
    pub total_received: Decimal,

    #[serde(default)]
    pub total_paid: Decimal,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<CashEntry>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl CashPool {
    pub fn new(id: String, company_id: String, project_id: String, crop: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            project_id,
            crop,
            balance: Decimal::ZERO,
            total_received: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            entries: Vec::new(),
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    /// True when the pool belongs to this project and crop (crop compared case-insensitively).
    pub fn matches(&self, company_id: &str, project_id: &str, crop: &str) -> bool {
        self.company_id == company_id
            && self.project_id == project_id
            && self.crop.eq_ignore_ascii_case(crop)
    }

    /// Add cash received into the pool.
    pub fn top_up(&mut self, amount: Decimal, reference: Option<String>) -> Result<&CashEntry> {
        validation::validate_positive("Top-up amount", amount)?;
        let balance = validation::checked_add("Pool balance", self.balance, amount)?;
        let total_received = validation::checked_add("Total received", self.total_received, amount)?;
        self.balance = balance;
        self.total_received = total_received;
        Ok(self.push_entry(CashEntryKind::TopUp, amount, None, reference))
    }

    /// Take cash out of the pool to pay pickers of `collection_id`.
    pub fn pay_out(
        &mut self,
        amount: Decimal,
        collection_id: &str,
        reference: Option<String>,
    ) -> Result<&CashEntry> {
        if amount <= Decimal::ZERO {
            return Err(FurrowError::Validation(format!(
                "Payout amount must be greater than 0, got {}",
                amount
            )));
        }
        if amount > self.balance {
            return Err(FurrowError::InsufficientFunds {
                pool: self.id.clone(),
                available: self.balance,
                required: amount,
            });
        }
        let total_paid = validation::checked_add("Total paid", self.total_paid, amount)?;
        self.balance -= amount;
        self.total_paid = total_paid;
        Ok(self.push_entry(
            CashEntryKind::Payout,
            amount,
            Some(collection_id.to_string()),
            reference,
        ))
    }

    /// Mark the balance left when `collection_id` closed as carried to the next collection.
    pub fn carry_forward(&mut self, collection_id: &str) -> &CashEntry {
        let balance = self.balance;
        self.push_entry(
            CashEntryKind::CarryForward,
            balance,
            Some(collection_id.to_string()),
            None,
        )
    }

    /// Payouts recorded against one collection.
    pub fn paid_for_collection(&self, collection_id: &str) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.kind == CashEntryKind::Payout)
            .filter(|e| e.collection_id.as_deref() == Some(collection_id))
            .map(|e| e.amount)
            .sum()
    }

    fn push_entry(
        &mut self,
        kind: CashEntryKind,
        amount: Decimal,
        collection_id: Option<String>,
        reference: Option<String>,
    ) -> &CashEntry {
        self.entries.push(CashEntry {
            at: Utc::now(),
            kind,
            amount,
            balance_after: self.balance,
            collection_id,
            reference,
        });
        &self.entries[self.entries.len() - 1]
    }
}

impl_document!(CashPool, Collection::HarvestCashPools, |p| format!(
    "{}-{}",
    p.project_id, p.crop
));
