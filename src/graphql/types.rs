use crate::model;
use crate::ops;
use async_graphql::{Enum, InputObject, SimpleObject};
use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "crate::model::ItemCategory")]
pub enum ItemCategory {
    Fertilizer,
    Chemical,
    Seed,
    Fuel,
    Packaging,
    Tool,
    Other,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "crate::model::NeededStatus")]
pub enum NeededStatus {
    Pending,
    Ordered,
    Received,
    Cancelled,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "crate::model::CollectionStatus")]
pub enum CollectionStatus {
    Open,
    Closed,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "crate::model::CashEntryKind")]
pub enum CashEntryKind {
    TopUp,
    Payout,
    CarryForward,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "crate::model::WorkLogSource")]
pub enum WorkLogSource {
    Manual,
    InventoryUsage,
    WorkCard,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "crate::model::WorkCardStatus")]
pub enum WorkCardStatus {
    Planned,
    Submitted,
    Approved,
    Rejected,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "crate::model::ChallengeCategory")]
pub enum ChallengeCategory {
    Pest,
    Disease,
    Weather,
    Labor,
    Market,
    Equipment,
    Other,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(remote = "crate::model::Severity")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Parses an optional `YYYY-MM-DD` argument.
pub(crate) fn parse_date(value: Option<String>) -> async_graphql::Result<Option<NaiveDate>> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d")
                .map_err(|_| async_graphql::Error::new(format!("Invalid date '{}', expected YYYY-MM-DD", v)))
        })
        .transpose()
}

// Companies

#[derive(SimpleObject)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub active: bool,
    pub created: String,
    pub updated: String,
    pub notes: String,
}

impl From<model::Company> for Company {
    fn from(c: model::Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            location: c.location,
            contact: c.contact,
            active: c.active,
            created: c.created.to_rfc3339(),
            updated: c.updated.to_rfc3339(),
            notes: c.notes,
        }
    }
}

#[derive(InputObject)]
pub struct CreateCompanyInput {
    pub name: String,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateCompanyInput {
    pub id: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
}

// Inventory

#[derive(SimpleObject)]
pub struct InventoryItem {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub category: ItemCategory,
    pub unit: String,
    pub quantity: Decimal,
    pub reorder_level: Decimal,
    pub unit_cost: Option<Decimal>,
    pub low_stock: bool,
    pub stock_value: Option<Decimal>,
    pub created: String,
    pub updated: String,
    pub notes: String,
}

impl From<model::InventoryItem> for InventoryItem {
    fn from(i: model::InventoryItem) -> Self {
        Self {
            low_stock: i.is_low_stock(),
            stock_value: i.stock_value(),
            id: i.id,
            company_id: i.company_id,
            name: i.name,
            category: i.category.into(),
            unit: i.unit,
            quantity: i.quantity,
            reorder_level: i.reorder_level,
            unit_cost: i.unit_cost,
            created: i.created.to_rfc3339(),
            updated: i.updated.to_rfc3339(),
            notes: i.notes,
        }
    }
}

#[derive(SimpleObject)]
pub struct InventoryPurchase {
    pub id: String,
    pub item_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,
    pub supplier: Option<String>,
    pub purchased_on: String,
    pub created: String,
}

impl From<model::InventoryPurchase> for InventoryPurchase {
    fn from(p: model::InventoryPurchase) -> Self {
        Self {
            id: p.id,
            item_id: p.item_id,
            quantity: p.quantity,
            unit_cost: p.unit_cost,
            total_cost: p.total_cost,
            supplier: p.supplier,
            purchased_on: p.purchased_on.to_string(),
            created: p.created.to_rfc3339(),
        }
    }
}

#[derive(SimpleObject)]
pub struct InventoryUsage {
    pub id: String,
    pub item_id: String,
    pub project_id: Option<String>,
    pub quantity: Decimal,
    pub purpose: String,
    pub used_on: String,
    pub work_log_id: Option<String>,
    pub created: String,
}

impl From<model::InventoryUsage> for InventoryUsage {
    fn from(u: model::InventoryUsage) -> Self {
        Self {
            id: u.id,
            item_id: u.item_id,
            project_id: u.project_id,
            quantity: u.quantity,
            purpose: u.purpose,
            used_on: u.used_on.to_string(),
            work_log_id: u.work_log_id,
            created: u.created.to_rfc3339(),
        }
    }
}

#[derive(SimpleObject)]
pub struct ItemHistory {
    pub item: InventoryItem,
    pub purchases: Vec<InventoryPurchase>,
    pub usages: Vec<InventoryUsage>,
}

impl From<ops::inventory::ItemHistory> for ItemHistory {
    fn from(h: ops::inventory::ItemHistory) -> Self {
        Self {
            item: h.item.into(),
            purchases: h.purchases.into_iter().map(Into::into).collect(),
            usages: h.usages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(SimpleObject)]
pub struct UsageResult {
    pub item: InventoryItem,
    pub usage: InventoryUsage,
    pub work_log: Option<WorkLog>,
}

impl From<ops::inventory::UsageOutcome> for UsageResult {
    fn from(o: ops::inventory::UsageOutcome) -> Self {
        Self {
            item: o.item.into(),
            usage: o.usage.into(),
            work_log: o.work_log.map(Into::into),
        }
    }
}

#[derive(SimpleObject)]
pub struct RestockResult {
    pub item: InventoryItem,
    pub purchase: InventoryPurchase,
}

#[derive(InputObject)]
pub struct ItemFilter {
    pub company_id: Option<String>,
    pub category: Option<ItemCategory>,
    pub low_stock: Option<bool>,
}

impl From<ItemFilter> for ops::inventory::ItemFilter {
    fn from(f: ItemFilter) -> Self {
        Self {
            company_id: f.company_id,
            category: f.category.map(Into::into),
            low_stock: f.low_stock.unwrap_or(false),
        }
    }
}

#[derive(InputObject)]
pub struct AddItemInput {
    pub company_id: String,
    pub name: String,
    pub category: Option<ItemCategory>,
    pub unit: String,
    pub quantity: Option<Decimal>,
    pub reorder_level: Option<Decimal>,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateItemInput {
    pub id: String,
    pub name: Option<String>,
    pub category: Option<ItemCategory>,
    pub unit: Option<String>,
    pub reorder_level: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct RestockInput {
    pub item_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub supplier: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub purchased_on: Option<String>,
}

#[derive(InputObject)]
pub struct UseItemInput {
    pub item_id: String,
    pub quantity: Decimal,
    pub purpose: String,
    pub project_id: Option<String>,
    /// YYYY-MM-DD, defaults to today
    pub used_on: Option<String>,
    /// Write a work log for the usage (default true)
    pub log_work: Option<bool>,
    pub workers: Option<u32>,
}

// Needed items

#[derive(SimpleObject)]
pub struct NeededItem {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub category: ItemCategory,
    pub status: NeededStatus,
    pub item_id: Option<String>,
    pub created: String,
    pub updated: String,
    pub notes: String,
}

impl From<model::NeededItem> for NeededItem {
    fn from(n: model::NeededItem) -> Self {
        Self {
            id: n.id,
            company_id: n.company_id,
            name: n.name,
            quantity: n.quantity,
            unit: n.unit,
            category: n.category.into(),
            status: n.status.into(),
            item_id: n.item_id,
            created: n.created.to_rfc3339(),
            updated: n.updated.to_rfc3339(),
            notes: n.notes,
        }
    }
}

#[derive(SimpleObject)]
pub struct ReceiveResult {
    pub needed: NeededItem,
    pub item: InventoryItem,
    pub purchase: InventoryPurchase,
    pub created_item: bool,
}

impl From<ops::needed::ReceiveOutcome> for ReceiveResult {
    fn from(o: ops::needed::ReceiveOutcome) -> Self {
        Self {
            needed: o.needed.into(),
            item: o.item.into(),
            purchase: o.purchase.into(),
            created_item: o.created_item,
        }
    }
}

#[derive(InputObject)]
pub struct AddNeededItemInput {
    pub company_id: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub category: Option<ItemCategory>,
    pub item_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct ReceiveNeededItemInput {
    pub id: String,
    pub quantity: Option<Decimal>,
    pub unit_cost: Decimal,
    pub supplier: Option<String>,
    pub received_on: Option<String>,
}

// Harvest

#[derive(SimpleObject)]
pub struct HarvestCollection {
    pub id: String,
    pub company_id: String,
    pub project_id: String,
    pub crop: String,
    pub name: String,
    pub harvest_date: String,
    pub price_per_kg: Decimal,
    pub status: CollectionStatus,
    pub pool_id: String,
    pub opening_balance: Decimal,
    pub closing_balance: Option<Decimal>,
    pub closed_at: Option<String>,
    pub created: String,
    pub updated: String,
    pub notes: String,
}

impl From<model::HarvestCollection> for HarvestCollection {
    fn from(c: model::HarvestCollection) -> Self {
        Self {
            id: c.id,
            company_id: c.company_id,
            project_id: c.project_id,
            crop: c.crop,
            name: c.name,
            harvest_date: c.harvest_date.to_string(),
            price_per_kg: c.price_per_kg,
            status: c.status.into(),
            pool_id: c.pool_id,
            opening_balance: c.opening_balance,
            closing_balance: c.closing_balance,
            closed_at: c.closed_at.map(|t| t.to_rfc3339()),
            created: c.created.to_rfc3339(),
            updated: c.updated.to_rfc3339(),
            notes: c.notes,
        }
    }
}

#[derive(SimpleObject)]
pub struct Picker {
    pub id: String,
    pub collection_id: String,
    pub number: u32,
    pub name: String,
    pub phone: Option<String>,
    pub paid: bool,
    pub paid_amount: Option<Decimal>,
    pub paid_at: Option<String>,
    pub payment_batch: Option<String>,
}

impl From<model::Picker> for Picker {
    fn from(p: model::Picker) -> Self {
        Self {
            id: p.id,
            collection_id: p.collection_id,
            number: p.number,
            name: p.name,
            phone: p.phone,
            paid: p.paid,
            paid_amount: p.paid_amount,
            paid_at: p.paid_at.map(|t| t.to_rfc3339()),
            payment_batch: p.payment_batch.map(model::batch_letter),
        }
    }
}

#[derive(SimpleObject)]
pub struct WeighEntry {
    pub id: String,
    pub collection_id: String,
    pub picker_id: String,
    pub trip: u32,
    pub kg: Decimal,
    pub created: String,
}

impl From<model::WeighEntry> for WeighEntry {
    fn from(w: model::WeighEntry) -> Self {
        Self {
            id: w.id,
            collection_id: w.collection_id,
            picker_id: w.picker_id,
            trip: w.trip,
            kg: w.kg,
            created: w.created.to_rfc3339(),
        }
    }
}

#[derive(SimpleObject)]
pub struct PickerTotal {
    pub picker_id: String,
    pub number: u32,
    pub name: String,
    pub trips: u32,
    pub kg: Decimal,
    pub pay: Decimal,
    pub paid: bool,
    pub payment_batch: Option<String>,
}

impl From<model::PickerTotal> for PickerTotal {
    fn from(t: model::PickerTotal) -> Self {
        Self {
            picker_id: t.picker_id,
            number: t.number,
            name: t.name,
            trips: t.trips,
            kg: t.kg,
            pay: t.pay,
            paid: t.paid,
            payment_batch: t.payment_batch,
        }
    }
}

#[derive(SimpleObject)]
pub struct PaymentBatch {
    pub sequence: u32,
    pub letter: String,
    pub collection_id: String,
    pub picker_ids: Vec<String>,
    pub picker_count: usize,
    pub amount: Decimal,
    pub paid_at: Option<String>,
}

impl From<model::PaymentBatch> for PaymentBatch {
    fn from(b: model::PaymentBatch) -> Self {
        Self {
            sequence: b.sequence,
            letter: b.letter,
            collection_id: b.collection_id,
            picker_count: b.picker_ids.len(),
            picker_ids: b.picker_ids,
            amount: b.amount,
            paid_at: b.paid_at.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(SimpleObject)]
pub struct CollectionSummary {
    pub collection_id: String,
    pub name: String,
    pub status: CollectionStatus,
    pub price_per_kg: Decimal,
    pub total_kg: Decimal,
    pub total_pay: Decimal,
    pub picker_count: usize,
    pub trip_count: usize,
    pub paid_count: usize,
    pub unpaid_count: usize,
    pub paid_amount: Decimal,
    pub unpaid_amount: Decimal,
    pub opening_balance: Decimal,
    pub closing_balance: Option<Decimal>,
    pub batches: Vec<PaymentBatch>,
}

impl From<model::CollectionSummary> for CollectionSummary {
    fn from(s: model::CollectionSummary) -> Self {
        Self {
            collection_id: s.collection_id,
            name: s.name,
            status: s.status.into(),
            price_per_kg: s.price_per_kg,
            total_kg: s.total_kg,
            total_pay: s.total_pay,
            picker_count: s.picker_count,
            trip_count: s.trip_count,
            paid_count: s.paid_count,
            unpaid_count: s.unpaid_count,
            paid_amount: s.paid_amount,
            unpaid_amount: s.unpaid_amount,
            opening_balance: s.opening_balance,
            closing_balance: s.closing_balance,
            batches: s.batches.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(InputObject)]
pub struct CollectionFilter {
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<CollectionStatus>,
}

impl From<CollectionFilter> for ops::harvest::CollectionFilter {
    fn from(f: CollectionFilter) -> Self {
        Self {
            company_id: f.company_id,
            project_id: f.project_id,
            status: f.status.map(Into::into),
        }
    }
}

#[derive(InputObject)]
pub struct OpenCollectionInput {
    pub company_id: String,
    pub project_id: String,
    pub crop: String,
    pub name: Option<String>,
    pub harvest_date: Option<String>,
    pub price_per_kg: Decimal,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct AddPickerInput {
    pub collection_id: String,
    pub number: Option<u32>,
    pub name: String,
    pub phone: Option<String>,
}

// Wallet

#[derive(SimpleObject)]
pub struct CashEntry {
    pub at: String,
    pub kind: CashEntryKind,
    pub amount: Decimal,
    pub balance_after: Decimal,
    pub collection_id: Option<String>,
    pub reference: Option<String>,
}

impl From<model::CashEntry> for CashEntry {
    fn from(e: model::CashEntry) -> Self {
        Self {
            at: e.at.to_rfc3339(),
            kind: e.kind.into(),
            amount: e.amount,
            balance_after: e.balance_after,
            collection_id: e.collection_id,
            reference: e.reference,
        }
    }
}

#[derive(SimpleObject)]
pub struct CashPool {
    pub id: String,
    pub company_id: String,
    pub project_id: String,
    pub crop: String,
    pub balance: Decimal,
    pub total_received: Decimal,
    pub total_paid: Decimal,
    pub entries: Vec<CashEntry>,
    pub created: String,
    pub updated: String,
}

impl From<model::CashPool> for CashPool {
    fn from(p: model::CashPool) -> Self {
        Self {
            id: p.id,
            company_id: p.company_id,
            project_id: p.project_id,
            crop: p.crop,
            balance: p.balance,
            total_received: p.total_received,
            total_paid: p.total_paid,
            entries: p.entries.into_iter().map(Into::into).collect(),
            created: p.created.to_rfc3339(),
            updated: p.updated.to_rfc3339(),
        }
    }
}

/// Either `poolId`, or `companyId` + `projectId` + `crop` (the pool is created if missing).
#[derive(InputObject)]
pub struct TopUpInput {
    pub pool_id: Option<String>,
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    pub crop: Option<String>,
    pub amount: Decimal,
    pub reference: Option<String>,
}

// Work logs

#[derive(SimpleObject)]
pub struct WorkLog {
    pub id: String,
    pub company_id: String,
    pub project_id: String,
    pub date: String,
    pub work_type: String,
    pub workers: u32,
    pub hours: Option<Decimal>,
    pub description: String,
    pub source: WorkLogSource,
    pub source_id: Option<String>,
    pub created: String,
    pub updated: String,
    pub notes: String,
}

impl From<model::WorkLog> for WorkLog {
    fn from(l: model::WorkLog) -> Self {
        Self {
            id: l.id,
            company_id: l.company_id,
            project_id: l.project_id,
            date: l.date.to_string(),
            work_type: l.work_type,
            workers: l.workers,
            hours: l.hours,
            description: l.description,
            source: l.source.into(),
            source_id: l.source_id,
            created: l.created.to_rfc3339(),
            updated: l.updated.to_rfc3339(),
            notes: l.notes,
        }
    }
}

#[derive(SimpleObject)]
pub struct LaborSummary {
    pub work_type: String,
    pub logs: usize,
    pub worker_days: u32,
    pub worker_hours: Decimal,
}

impl From<ops::work_logs::LaborSummary> for LaborSummary {
    fn from(s: ops::work_logs::LaborSummary) -> Self {
        Self {
            work_type: s.work_type,
            logs: s.logs,
            worker_days: s.worker_days,
            worker_hours: s.worker_hours,
        }
    }
}

#[derive(InputObject)]
pub struct WorkLogFilter {
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub work_type: Option<String>,
}

impl WorkLogFilter {
    pub(crate) fn into_ops(self) -> async_graphql::Result<ops::work_logs::WorkLogFilter> {
        Ok(ops::work_logs::WorkLogFilter {
            company_id: self.company_id,
            project_id: self.project_id,
            from: parse_date(self.from)?,
            to: parse_date(self.to)?,
            work_type: self.work_type,
        })
    }
}

#[derive(InputObject)]
pub struct LogWorkInput {
    pub company_id: String,
    pub project_id: String,
    pub date: Option<String>,
    pub work_type: Option<String>,
    pub workers: u32,
    pub hours: Option<Decimal>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateWorkLogInput {
    pub id: String,
    pub project_id: Option<String>,
    pub date: Option<String>,
    pub work_type: Option<String>,
    pub workers: Option<u32>,
    pub hours: Option<Decimal>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

// Work cards

#[derive(SimpleObject)]
pub struct InputLine {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub item_id: Option<String>,
}

impl From<model::InputLine> for InputLine {
    fn from(i: model::InputLine) -> Self {
        Self {
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
            item_id: i.item_id,
        }
    }
}

#[derive(SimpleObject)]
pub struct WorkPlan {
    pub date: String,
    pub workers: u32,
    pub labor_cost: Decimal,
    pub inputs: Vec<InputLine>,
}

impl From<model::WorkPlan> for WorkPlan {
    fn from(p: model::WorkPlan) -> Self {
        Self {
            date: p.date.to_string(),
            workers: p.workers,
            labor_cost: p.labor_cost,
            inputs: p.inputs.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(SimpleObject)]
pub struct WorkCard {
    pub id: String,
    pub company_id: String,
    pub project_id: String,
    pub title: String,
    pub work_type: String,
    pub planned: WorkPlan,
    pub actual: Option<WorkPlan>,
    pub status: WorkCardStatus,
    pub paid: bool,
    pub paid_at: Option<String>,
    pub submitted_by: Option<String>,
    pub reviewed_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub work_log_id: Option<String>,
    pub created: String,
    pub updated: String,
    pub notes: String,
}

impl From<model::WorkCard> for WorkCard {
    fn from(c: model::WorkCard) -> Self {
        Self {
            id: c.id,
            company_id: c.company_id,
            project_id: c.project_id,
            title: c.title,
            work_type: c.work_type,
            planned: c.planned.into(),
            actual: c.actual.map(Into::into),
            status: c.status.into(),
            paid: c.paid,
            paid_at: c.paid_at.map(|t| t.to_rfc3339()),
            submitted_by: c.submitted_by,
            reviewed_by: c.reviewed_by,
            rejection_reason: c.rejection_reason,
            work_log_id: c.work_log_id,
            created: c.created.to_rfc3339(),
            updated: c.updated.to_rfc3339(),
            notes: c.notes,
        }
    }
}

#[derive(SimpleObject)]
pub struct ApprovalResult {
    pub card: WorkCard,
    pub work_log: WorkLog,
}

#[derive(SimpleObject)]
pub struct InputVariance {
    pub name: String,
    pub unit: String,
    pub planned: Decimal,
    pub actual: Decimal,
    pub difference: Decimal,
}

#[derive(SimpleObject)]
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

impl From<model::WorkCardVariance> for WorkCardVariance {
    fn from(v: model::WorkCardVariance) -> Self {
        Self {
            card_id: v.card_id,
            planned_workers: v.planned_workers,
            actual_workers: v.actual_workers,
            worker_difference: v.worker_difference,
            planned_labor_cost: v.planned_labor_cost,
            actual_labor_cost: v.actual_labor_cost,
            labor_cost_difference: v.labor_cost_difference,
            inputs: v
                .inputs
                .into_iter()
                .map(|i| InputVariance {
                    name: i.name,
                    unit: i.unit,
                    planned: i.planned,
                    actual: i.actual,
                    difference: i.difference,
                })
                .collect(),
        }
    }
}

#[derive(InputObject)]
pub struct InputLineInput {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub item_id: Option<String>,
}

#[derive(InputObject)]
pub struct WorkPlanInput {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub workers: u32,
    pub labor_cost: Option<Decimal>,
    pub inputs: Option<Vec<InputLineInput>>,
}

impl WorkPlanInput {
    pub(crate) fn into_model(self) -> async_graphql::Result<model::WorkPlan> {
        let date = parse_date(self.date)?.unwrap_or_else(ops::today);
        let inputs = self
            .inputs
            .unwrap_or_default()
            .into_iter()
            .map(|i| model::InputLine {
                name: i.name,
                quantity: i.quantity,
                unit: i.unit,
                item_id: i.item_id,
            })
            .collect();
        Ok(model::WorkPlan::new(date, self.workers, self.labor_cost.unwrap_or_default())
            .with_inputs(inputs))
    }
}

#[derive(InputObject)]
pub struct PlanWorkCardInput {
    pub company_id: String,
    pub project_id: String,
    pub title: String,
    pub work_type: String,
    pub planned: WorkPlanInput,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct EditPlanInput {
    pub id: String,
    pub title: Option<String>,
    pub work_type: Option<String>,
    pub planned: Option<WorkPlanInput>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct WorkCardFilter {
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<WorkCardStatus>,
    pub paid: Option<bool>,
}

impl From<WorkCardFilter> for ops::work_cards::WorkCardFilter {
    fn from(f: WorkCardFilter) -> Self {
        Self {
            company_id: f.company_id,
            project_id: f.project_id,
            status: f.status.map(Into::into),
            paid: f.paid,
        }
    }
}

// Challenges

#[derive(SimpleObject)]
pub struct SeasonChallenge {
    pub id: String,
    pub company_id: String,
    pub project_id: Option<String>,
    pub season: String,
    pub title: String,
    pub category: ChallengeCategory,
    pub severity: Severity,
    pub observed_on: String,
    pub resolved: bool,
    pub resolution: Option<String>,
    pub resolved_at: Option<String>,
    pub created: String,
    pub updated: String,
    pub notes: String,
}

impl From<model::SeasonChallenge> for SeasonChallenge {
    fn from(c: model::SeasonChallenge) -> Self {
        Self {
            id: c.id,
            company_id: c.company_id,
            project_id: c.project_id,
            season: c.season,
            title: c.title,
            category: c.category.into(),
            severity: c.severity.into(),
            observed_on: c.observed_on.to_string(),
            resolved: c.resolved,
            resolution: c.resolution,
            resolved_at: c.resolved_at.map(|t| t.to_rfc3339()),
            created: c.created.to_rfc3339(),
            updated: c.updated.to_rfc3339(),
            notes: c.notes,
        }
    }
}

#[derive(SimpleObject)]
pub struct CategoryCount {
    pub category: ChallengeCategory,
    pub count: usize,
}

#[derive(SimpleObject)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

#[derive(SimpleObject)]
pub struct SeasonSummary {
    pub season: String,
    pub total: usize,
    pub open: usize,
    pub by_category: Vec<CategoryCount>,
    pub by_severity: Vec<SeverityCount>,
}

impl From<ops::challenges::SeasonSummary> for SeasonSummary {
    fn from(s: ops::challenges::SeasonSummary) -> Self {
        Self {
            season: s.season,
            total: s.total,
            open: s.open,
            by_category: s
                .by_category
                .into_iter()
                .map(|c| CategoryCount {
                    category: c.category.into(),
                    count: c.count,
                })
                .collect(),
            by_severity: s
                .by_severity
                .into_iter()
                .map(|c| SeverityCount {
                    severity: c.severity.into(),
                    count: c.count,
                })
                .collect(),
        }
    }
}

#[derive(InputObject)]
pub struct ChallengeFilter {
    pub company_id: Option<String>,
    pub season: Option<String>,
    pub category: Option<ChallengeCategory>,
    pub severity: Option<Severity>,
    pub resolved: Option<bool>,
}

impl From<ChallengeFilter> for ops::challenges::ChallengeFilter {
    fn from(f: ChallengeFilter) -> Self {
        Self {
            company_id: f.company_id,
            season: f.season,
            category: f.category.map(Into::into),
            severity: f.severity.map(Into::into),
            resolved: f.resolved,
        }
    }
}

#[derive(InputObject)]
pub struct ReportChallengeInput {
    pub company_id: String,
    pub project_id: Option<String>,
    pub season: String,
    pub title: String,
    pub category: Option<ChallengeCategory>,
    pub severity: Option<Severity>,
    pub observed_on: Option<String>,
    pub notes: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateChallengeInput {
    pub id: String,
    pub project_id: Option<String>,
    pub season: Option<String>,
    pub title: Option<String>,
    pub category: Option<ChallengeCategory>,
    pub severity: Option<Severity>,
    pub observed_on: Option<String>,
    pub notes: Option<String>,
}

// Overview

#[derive(SimpleObject)]
pub struct CollectionCount {
    pub collection: String,
    pub count: usize,
}

#[derive(SimpleObject)]
pub struct Overview {
    pub company: Option<Company>,
    pub counts: Vec<CollectionCount>,
    pub low_stock: Vec<InventoryItem>,
    pub open_collections: Vec<HarvestCollection>,
    pub cards_awaiting_review: Vec<WorkCard>,
    pub cards_awaiting_payment: Vec<WorkCard>,
    pub open_challenges: usize,
    pub pool_balance: Decimal,
}

impl From<ops::overview::Overview> for Overview {
    fn from(o: ops::overview::Overview) -> Self {
        Self {
            company: o.company.map(Into::into),
            counts: o
                .counts
                .into_iter()
                .map(|c| CollectionCount {
                    collection: c.collection,
                    count: c.count,
                })
                .collect(),
            low_stock: o.low_stock.into_iter().map(Into::into).collect(),
            open_collections: o.open_collections.into_iter().map(Into::into).collect(),
            cards_awaiting_review: o.cards_awaiting_review.into_iter().map(Into::into).collect(),
            cards_awaiting_payment: o.cards_awaiting_payment.into_iter().map(Into::into).collect(),
            open_challenges: o.open_challenges,
            pool_balance: o.pool_balance,
        }
    }
}
