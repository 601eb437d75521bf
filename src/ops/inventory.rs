use super::{append_note, clean, companies, today};
use crate::error::{FurrowError, Result};
use crate::model::{
    InventoryItem, InventoryPurchase, InventoryUsage, ItemCategory, WorkLog, WorkLogSource,
};
use crate::store::{Collection, Store};
use crate::validation;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Project a usage-generated work log is filed under when the usage names none.
pub const GENERAL_PROJECT: &str = "general";

#[derive(Debug, Clone)]
pub struct NewItem {
    pub company_id: String,
    pub name: String,
    pub category: ItemCategory,
    pub unit: String,
    pub quantity: Decimal,
    pub reorder_level: Decimal,
    pub unit_cost: Option<Decimal>,
    pub notes: String,
}

#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<ItemCategory>,
    pub unit: Option<String>,
    pub reorder_level: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Restock {
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub supplier: Option<String>,
    pub purchased_on: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub quantity: Decimal,
    pub purpose: String,
    pub project_id: Option<String>,
    pub used_on: Option<NaiveDate>,
    /// Write a work log together with the usage.
    pub log_work: bool,
    pub workers: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageOutcome {
    pub item: InventoryItem,
    pub usage: InventoryUsage,
    pub work_log: Option<WorkLog>,
}

/// Purchases and usages of one item, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct ItemHistory {
    pub item: InventoryItem,
    pub purchases: Vec<InventoryPurchase>,
    pub usages: Vec<InventoryUsage>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub company_id: Option<String>,
    pub category: Option<ItemCategory>,
    pub low_stock: bool,
}

pub fn add_item(store: &Store, input: NewItem) -> Result<InventoryItem> {
    companies::require_active_company(store, &input.company_id)?;
    let name = input.name.trim().to_string();
    validation::validate_name("Item name", &name)?;
    validation::validate_label("Unit", &input.unit)?;
    validation::validate_non_negative("Quantity", input.quantity)?;
    validation::validate_non_negative("Reorder level", input.reorder_level)?;
    if let Some(cost) = input.unit_cost {
        validation::validate_non_negative("Unit cost", cost)?;
    }
    validation::validate_notes(&input.notes)?;
    ensure_unique_name(store, &input.company_id, &name, None)?;

    let item = InventoryItem::new(
        store.generate_id(Collection::InventoryItems),
        input.company_id,
        name,
        input.category,
        input.unit.trim().to_string(),
    )
    .with_quantity(input.quantity)
    .with_reorder_level(input.reorder_level)
    .with_unit_cost(input.unit_cost)
    .with_notes(input.notes);
    store.insert(&item)?;
    tracing::info!(id = %item.id, name = %item.name, "Added inventory item");
    Ok(item)
}

pub fn get_item(store: &Store, id: &str) -> Result<InventoryItem> {
    store.get(id)
}

pub fn list_items(store: &Store, filter: &ItemFilter) -> Result<Vec<InventoryItem>> {
    let mut items = store.list_where(|item: &InventoryItem| {
        filter
            .company_id
            .as_deref()
            .is_none_or(|c| item.company_id == c)
            && filter.category.is_none_or(|c| item.category == c)
            && (!filter.low_stock || item.is_low_stock())
    })?;
    items.sort_by_key(|item| item.name.to_lowercase());
    Ok(items)
}

pub fn update_item(store: &Store, id: &str, update: ItemUpdate) -> Result<InventoryItem> {
    let mut item: InventoryItem = store.get(id)?;
    if let Some(name) = update.name {
        let name = name.trim().to_string();
        validation::validate_name("Item name", &name)?;
        ensure_unique_name(store, &item.company_id, &name, Some(id))?;
        item.name = name;
    }
    if let Some(category) = update.category {
        item.category = category;
    }
    if let Some(unit) = update.unit {
        validation::validate_label("Unit", &unit)?;
        item.unit = unit.trim().to_string();
    }
    if let Some(level) = update.reorder_level {
        validation::validate_non_negative("Reorder level", level)?;
        item.reorder_level = level;
    }
    if let Some(notes) = update.notes {
        validation::validate_notes(&notes)?;
        item.notes = notes;
    }
    store.update(&mut item)?;
    tracing::info!(id = %item.id, "Updated inventory item");
    Ok(item)
}

/// Add purchased stock to an item and record the purchase.
pub fn restock_item(
    store: &Store,
    item_id: &str,
    restock: Restock,
) -> Result<(InventoryItem, InventoryPurchase)> {
    let mut item: InventoryItem = store.get(item_id)?;
    companies::require_active_company(store, &item.company_id)?;
    let purchase = stage_purchase(store, &mut item, &restock)?;

    let mut batch = store.batch();
    batch.update(&mut item)?;
    batch.insert(&purchase)?;
    batch.commit()?;

    tracing::info!(
        item = %item.id,
        quantity = %restock.quantity,
        total = %purchase.total_cost,
        "Restocked inventory item"
    );
    Ok((item, purchase))
}

/// Applies a restock to `item` in memory and builds its purchase record.
pub(crate) fn stage_purchase(
    store: &Store,
    item: &mut InventoryItem,
    restock: &Restock,
) -> Result<InventoryPurchase> {
    validation::validate_positive("Quantity", restock.quantity)?;
    validation::validate_non_negative("Unit cost", restock.unit_cost)?;

    item.quantity = validation::checked_add("Stock quantity", item.quantity, restock.quantity)?;
    item.unit_cost = Some(restock.unit_cost);

    Ok(InventoryPurchase::new(
        store.generate_id(Collection::InventoryPurchases),
        item.company_id.clone(),
        item.id.clone(),
        restock.quantity,
        restock.unit_cost,
        restock.purchased_on.unwrap_or_else(today),
    )
    .with_supplier(clean(restock.supplier.clone())))
}

/// Take stock out of an item.
///
/// Writes the reduced item, a usage record and, unless disabled, a work log for the
/// application, all in one batch.
pub fn use_item(store: &Store, item_id: &str, usage: Usage) -> Result<UsageOutcome> {
    validation::validate_positive("Quantity", usage.quantity)?;
    let purpose = usage.purpose.trim().to_string();
    validation::validate_name("Purpose", &purpose)?;
    if let Some(workers) = usage.workers {
        validation::validate_workers(workers)?;
    }

    let mut item: InventoryItem = store.get(item_id)?;
    companies::require_active_company(store, &item.company_id)?;
    if usage.quantity > item.quantity {
        return Err(FurrowError::InsufficientStock {
            item: item.name.clone(),
            available: item.quantity,
            requested: usage.quantity,
        });
    }
    item.quantity -= usage.quantity;

    let project_id = clean(usage.project_id);
    let used_on = usage.used_on.unwrap_or_else(today);
    let mut record = InventoryUsage::new(
        store.generate_id(Collection::InventoryUsage),
        item.company_id.clone(),
        item.id.clone(),
        usage.quantity,
        purpose,
        used_on,
    )
    .with_project(project_id.clone());

    let work_log = usage.log_work.then(|| {
        WorkLog::new(
            store.generate_id(Collection::WorkLogs),
            item.company_id.clone(),
            project_id.unwrap_or_else(|| GENERAL_PROJECT.to_string()),
            used_on,
            format!("{} use", item.category),
            usage.workers.unwrap_or(1),
        )
        .with_description(format!(
            "{}: {} {} of {}",
            record.purpose, usage.quantity, item.unit, item.name
        ))
        .with_source(WorkLogSource::InventoryUsage, Some(record.id.clone()))
    });
    record.work_log_id = work_log.as_ref().map(|log| log.id.clone());

    let mut batch = store.batch();
    batch.update(&mut item)?;
    batch.insert(&record)?;
    if let Some(log) = &work_log {
        batch.insert(log)?;
    }
    batch.commit()?;

    tracing::info!(item = %item.id, quantity = %usage.quantity, remaining = %item.quantity, "Used inventory item");
    if item.is_low_stock() {
        tracing::warn!(item = %item.id, quantity = %item.quantity, "Item is at or below its reorder level");
    }
    Ok(UsageOutcome {
        item,
        usage: record,
        work_log,
    })
}

/// Stock-take correction: set the quantity on hand and note why.
pub fn adjust_stock(
    store: &Store,
    item_id: &str,
    new_quantity: Decimal,
    reason: &str,
) -> Result<InventoryItem> {
    validation::validate_non_negative("Quantity", new_quantity)?;
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(FurrowError::Validation(
            "A reason is required for stock adjustments".to_string(),
        ));
    }

    let mut item: InventoryItem = store.get(item_id)?;
    let line = format!(
        "{}: stock adjusted from {} to {} {}. {}",
        today(),
        item.quantity,
        new_quantity,
        item.unit,
        reason
    );
    append_note(&mut item.notes, &line)?;
    item.quantity = new_quantity;
    store.update(&mut item)?;
    tracing::info!(item = %item.id, quantity = %new_quantity, "Adjusted stock");
    Ok(item)
}

pub fn low_stock(store: &Store, company_id: Option<&str>) -> Result<Vec<InventoryItem>> {
    list_items(
        store,
        &ItemFilter {
            company_id: company_id.map(str::to_string),
            low_stock: true,
            ..Default::default()
        },
    )
}

pub fn item_history(store: &Store, item_id: &str) -> Result<ItemHistory> {
    let item: InventoryItem = store.get(item_id)?;
    let mut purchases = store.list_where(|p: &InventoryPurchase| p.item_id == item.id)?;
    purchases.sort_by(|a, b| {
        b.purchased_on
            .cmp(&a.purchased_on)
            .then_with(|| b.created.cmp(&a.created))
    });
    let mut usages = store.list_where(|u: &InventoryUsage| u.item_id == item.id)?;
    usages.sort_by(|a, b| b.used_on.cmp(&a.used_on).then_with(|| b.created.cmp(&a.created)));
    Ok(ItemHistory {
        item,
        purchases,
        usages,
    })
}

pub fn delete_item(store: &Store, id: &str) -> Result<()> {
    store.delete::<InventoryItem>(id)?;
    tracing::info!(id, "Deleted inventory item");
    Ok(())
}

/// The company's item with this name, ignoring case.
pub fn find_item_by_name(store: &Store, company_id: &str, name: &str) -> Result<Option<InventoryItem>> {
    Ok(store
        .list::<InventoryItem>()?
        .into_iter()
        .find(|item| item.company_id == company_id && item.name.eq_ignore_ascii_case(name.trim())))
}

fn ensure_unique_name(store: &Store, company_id: &str, name: &str, except_id: Option<&str>) -> Result<()> {
    match find_item_by_name(store, company_id, name)? {
        Some(existing) if Some(existing.id.as_str()) != except_id => {
            Err(FurrowError::Validation(format!(
                "An item named '{}' already exists ({})",
                existing.name, existing.id
            )))
        }
        _ => Ok(()),
    }
}
