use super::inventory::{self, Restock};
use super::{clean, companies};
use crate::error::{FurrowError, Result};
use crate::model::{InventoryItem, InventoryPurchase, ItemCategory, NeededItem, NeededStatus};
use crate::store::{Collection, Store};
use crate::validation;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct NewNeededItem {
    pub company_id: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub category: ItemCategory,
    pub item_id: Option<String>,
    pub notes: String,
}

/// How a shopping-list entry arrived.
#[derive(Debug, Clone, Default)]
pub struct Receipt {
    /// Quantity received; defaults to the quantity requested.
    pub quantity: Option<Decimal>,
    pub unit_cost: Decimal,
    pub supplier: Option<String>,
    pub received_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiveOutcome {
    pub needed: NeededItem,
    pub item: InventoryItem,
    pub purchase: InventoryPurchase,
    /// True when receiving created a new inventory item.
    pub created_item: bool,
}

pub fn add_needed_item(store: &Store, input: NewNeededItem) -> Result<NeededItem> {
    companies::require_active_company(store, &input.company_id)?;
    let name = input.name.trim().to_string();
    validation::validate_name("Item name", &name)?;
    validation::validate_positive("Quantity", input.quantity)?;
    validation::validate_label("Unit", &input.unit)?;
    validation::validate_notes(&input.notes)?;

    let item_id = clean(input.item_id);
    if let Some(item_id) = &item_id {
        let item: InventoryItem = store.get(item_id)?;
        if item.company_id != input.company_id {
            return Err(FurrowError::Validation(format!(
                "Item {} belongs to another company",
                item_id
            )));
        }
    }

    let mut needed = NeededItem::new(
        store.generate_id(Collection::NeededItems),
        input.company_id,
        name,
        input.quantity,
        input.unit.trim().to_string(),
    )
    .with_category(input.category)
    .with_item(item_id);
    needed.notes = input.notes;
    store.insert(&needed)?;
    tracing::info!(id = %needed.id, name = %needed.name, "Added needed item");
    Ok(needed)
}

pub fn list_needed_items(
    store: &Store,
    company_id: Option<&str>,
    status: Option<NeededStatus>,
) -> Result<Vec<NeededItem>> {
    store.list_where(|n: &NeededItem| {
        company_id.is_none_or(|c| n.company_id == c) && status.is_none_or(|s| n.status == s)
    })
}

pub fn mark_ordered(store: &Store, id: &str) -> Result<NeededItem> {
    let mut needed: NeededItem = store.get(id)?;
    if needed.status != NeededStatus::Pending {
        return Err(FurrowError::Validation(format!(
            "Only pending items can be ordered; {} is {}",
            id, needed.status
        )));
    }
    needed.status = NeededStatus::Ordered;
    store.update(&mut needed)?;
    tracing::info!(id, "Marked needed item as ordered");
    Ok(needed)
}

/// Receive a shopping-list entry into stock.
///
/// Restocks the linked item, else the company's item with the same name, else creates a new
/// item. The entry, the item and the purchase record are written in one batch.
pub fn receive_needed_item(store: &Store, id: &str, receipt: Receipt) -> Result<ReceiveOutcome> {
    let mut needed: NeededItem = store.get(id)?;
    companies::require_active_company(store, &needed.company_id)?;
    if !needed.is_outstanding() {
        return Err(FurrowError::Validation(format!(
            "Cannot receive {}: it is already {}",
            id, needed.status
        )));
    }

    let existing = match &needed.item_id {
        Some(item_id) => Some(store.get::<InventoryItem>(item_id)?),
        None => inventory::find_item_by_name(store, &needed.company_id, &needed.name)?,
    };
    let created_item = existing.is_none();
    let mut item = existing.unwrap_or_else(|| {
        InventoryItem::new(
            store.generate_id(Collection::InventoryItems),
            needed.company_id.clone(),
            needed.name.clone(),
            needed.category,
            needed.unit.clone(),
        )
    });

    let restock = Restock {
        quantity: receipt.quantity.unwrap_or(needed.quantity),
        unit_cost: receipt.unit_cost,
        supplier: receipt.supplier,
        purchased_on: receipt.received_on,
    };
    let purchase = inventory::stage_purchase(store, &mut item, &restock)?;

    needed.status = NeededStatus::Received;
    needed.item_id = Some(item.id.clone());

    let mut batch = store.batch();
    batch.update(&mut needed)?;
    if created_item {
        batch.insert(&item)?;
    } else {
        batch.update(&mut item)?;
    }
    batch.insert(&purchase)?;
    batch.commit()?;

    tracing::info!(id, item = %item.id, created_item, "Received needed item");
    Ok(ReceiveOutcome {
        needed,
        item,
        purchase,
        created_item,
    })
}

pub fn cancel_needed_item(store: &Store, id: &str) -> Result<NeededItem> {
    let mut needed: NeededItem = store.get(id)?;
    match needed.status {
        NeededStatus::Received => {
            return Err(FurrowError::Validation(format!(
                "Cannot cancel {}: it was already received",
                id
            )));
        }
        NeededStatus::Cancelled => return Ok(needed),
        NeededStatus::Pending | NeededStatus::Ordered => {}
    }
    needed.status = NeededStatus::Cancelled;
    store.update(&mut needed)?;
    tracing::info!(id, "Cancelled needed item");
    Ok(needed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::inventory::NewItem;
    use crate::ops::testing::{date, seed_company, setup_store};
    use rust_decimal_macros::dec;

    fn request(company_id: &str, name: &str) -> NewNeededItem {
        NewNeededItem {
            company_id: company_id.to_string(),
            name: name.to_string(),
            quantity: dec!(10),
            unit: "bags".to_string(),
            category: ItemCategory::Fertilizer,
            item_id: None,
            notes: String::new(),
        }
    }

    fn receipt() -> Receipt {
        Receipt {
            unit_cost: dec!(3500),
            supplier: Some("Kenya Farmers Association".to_string()),
            received_on: Some(date(2, 20)),
            ..Default::default()
        }
    }

    #[test]
    fn test_receive_creates_missing_item() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let needed = add_needed_item(&store, request(&company.id, "NPK 17:17:17")).unwrap();

        let outcome = receive_needed_item(&store, &needed.id, receipt()).unwrap();
        assert!(outcome.created_item);
        assert_eq!(outcome.item.quantity, dec!(10));
        assert_eq!(outcome.item.unit, "bags");
        assert_eq!(outcome.purchase.total_cost, dec!(35000));
        assert_eq!(outcome.needed.status, NeededStatus::Received);
        assert_eq!(outcome.needed.item_id.as_deref(), Some(outcome.item.id.as_str()));

        let stored: NeededItem = store.get(&needed.id).unwrap();
        assert_eq!(stored.status, NeededStatus::Received);
        assert!(store.exists::<InventoryItem>(&outcome.item.id));
    }

    #[test]
    fn test_inactive_company_cannot_receive() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let needed = add_needed_item(&store, request(&company.id, "CAN")).unwrap();
        companies::set_company_active(&store, &company.id, false).unwrap();

        let err = receive_needed_item(&store, &needed.id, receipt()).unwrap_err();
        assert!(matches!(err, FurrowError::Validation(_)));
        assert!(store.list::<InventoryItem>().unwrap().is_empty());
        assert_eq!(store.get::<NeededItem>(&needed.id).unwrap().status, NeededStatus::Pending);
    }

    #[test]
    fn test_receive_restocks_item_with_same_name() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let item = inventory::add_item(
            &store,
            NewItem {
                company_id: company.id.clone(),
                name: "CAN".to_string(),
                category: ItemCategory::Fertilizer,
                unit: "bags".to_string(),
                quantity: dec!(4),
                reorder_level: dec!(5),
                unit_cost: None,
                notes: String::new(),
            },
        )
        .unwrap();
        let needed = add_needed_item(&store, request(&company.id, "can")).unwrap();
        mark_ordered(&store, &needed.id).unwrap();

        let outcome = receive_needed_item(
            &store,
            &needed.id,
            Receipt {
                quantity: Some(dec!(8)),
                ..receipt()
            },
        )
        .unwrap();
        assert!(!outcome.created_item);
        assert_eq!(outcome.item.id, item.id);
        assert_eq!(store.get::<InventoryItem>(&item.id).unwrap().quantity, dec!(12));
        assert_eq!(store.list::<InventoryItem>().unwrap().len(), 1);
    }

    #[test]
    fn test_status_rules() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let needed = add_needed_item(&store, request(&company.id, "Gloves")).unwrap();

        mark_ordered(&store, &needed.id).unwrap();
        assert!(mark_ordered(&store, &needed.id).is_err());

        receive_needed_item(&store, &needed.id, receipt()).unwrap();
        assert!(receive_needed_item(&store, &needed.id, receipt()).is_err());
        assert!(cancel_needed_item(&store, &needed.id).is_err());

        let other = add_needed_item(&store, request(&company.id, "Twine")).unwrap();
        let cancelled = cancel_needed_item(&store, &other.id).unwrap();
        assert_eq!(cancelled.status, NeededStatus::Cancelled);
        assert!(receive_needed_item(&store, &other.id, receipt()).is_err());

        let pending = list_needed_items(&store, Some(&company.id), Some(NeededStatus::Pending)).unwrap();
        assert!(pending.is_empty());
    }

    #[test]
    fn test_quantity_must_be_positive() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let mut input = request(&company.id, "Gloves");
        input.quantity = dec!(0);
        assert!(add_needed_item(&store, input).is_err());
    }
}
