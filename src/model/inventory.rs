use super::types::{ItemCategory, NeededStatus};
use crate::store::Collection;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stocked input (fertilizer, chemical, fuel...) and its quantity on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub company_id: String,
    pub name: String,

    #[serde(default)]
    pub category: ItemCategory,

    pub unit: String,

    #[serde(default)]
    pub quantity: Decimal,

    #[serde(default)]
    pub reorder_level: Decimal,

    /// Unit cost of the most recent purchase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl InventoryItem {
    pub fn new(
        id: String,
        company_id: String,
        name: String,
        category: ItemCategory,
        unit: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            name,
            category,
            unit,
            quantity: Decimal::ZERO,
            reorder_level: Decimal::ZERO,
            unit_cost: None,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_reorder_level(mut self, reorder_level: Decimal) -> Self {
        self.reorder_level = reorder_level;
        self
    }

    pub fn with_unit_cost(mut self, unit_cost: Option<Decimal>) -> Self {
        self.unit_cost = unit_cost;
        self
    }

    pub fn with_notes(mut self, notes: String) -> Self {
        self.notes = notes;
        self
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Value of the stock on hand at the last purchase price. `None` without a price or
    /// when the value is too large to represent.
    pub fn stock_value(&self) -> Option<Decimal> {
        self.unit_cost
            .and_then(|cost| cost.checked_mul(self.quantity))
            .map(|value| value.round_dp(2))
    }
}

impl_document!(InventoryItem, Collection::InventoryItems, |item| item.name.clone());

/// A restock of an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryPurchase {
    pub id: String,
    pub company_id: String,
    pub item_id: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub total_cost: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    pub purchased_on: NaiveDate,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl InventoryPurchase {
    pub fn new(
        id: String,
        company_id: String,
        item_id: String,
        quantity: Decimal,
        unit_cost: Decimal,
        purchased_on: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            item_id,
            quantity,
            unit_cost,
            total_cost: (quantity * unit_cost).round_dp(2),
            supplier: None,
            purchased_on,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    pub fn with_supplier(mut self, supplier: Option<String>) -> Self {
        self.supplier = supplier;
        self
    }
}

impl_document!(InventoryPurchase, Collection::InventoryPurchases, |p| format!(
    "{}-{}",
    p.item_id, p.purchased_on
));

/// Stock taken out of an inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUsage {
    pub id: String,
    pub company_id: String,
    pub item_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    pub quantity: Decimal,
    pub purpose: String,
    pub used_on: NaiveDate,

    /// Work log written together with this usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_log_id: Option<String>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl InventoryUsage {
    pub fn new(
        id: String,
        company_id: String,
        item_id: String,
        quantity: Decimal,
        purpose: String,
        used_on: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            item_id,
            project_id: None,
            quantity,
            purpose,
            used_on,
            work_log_id: None,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    pub fn with_project(mut self, project_id: Option<String>) -> Self {
        self.project_id = project_id;
        self
    }
}

impl_document!(InventoryUsage, Collection::InventoryUsage, |u| u.purpose.clone());

/// An entry on the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeededItem {
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,

    #[serde(default)]
    pub category: ItemCategory,

    #[serde(default)]
    pub status: NeededStatus,

    /// Inventory item this request restocks, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl NeededItem {
    pub fn new(id: String, company_id: String, name: String, quantity: Decimal, unit: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            name,
            quantity,
            unit,
            category: ItemCategory::default(),
            status: NeededStatus::default(),
            item_id: None,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_item(mut self, item_id: Option<String>) -> Self {
        self.item_id = item_id;
        self
    }

    pub fn is_outstanding(&self) -> bool {
        matches!(self.status, NeededStatus::Pending | NeededStatus::Ordered)
    }
}

impl_document!(NeededItem, Collection::NeededItems, |n| n.name.clone());

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_purchase_total_is_rounded() {
        let purchase = InventoryPurchase::new(
            "ipu-1".to_string(),
            "co-1".to_string(),
            "inv-1".to_string(),
            dec!(3),
            dec!(33.333),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        );
        assert_eq!(purchase.total_cost, dec!(100.00));
    }

    #[test]
    fn test_low_stock_includes_reorder_level() {
        let item = InventoryItem::new(
            "inv-1".to_string(),
            "co-1".to_string(),
            "Diesel".to_string(),
            ItemCategory::Fuel,
            "l".to_string(),
        )
        .with_quantity(dec!(20))
        .with_reorder_level(dec!(20));
        assert!(item.is_low_stock());
        assert!(!item.clone().with_quantity(dec!(20.5)).is_low_stock());
    }

    #[test]
    fn test_stock_value_needs_unit_cost() {
        let item = InventoryItem::new(
            "inv-1".to_string(),
            "co-1".to_string(),
            "CAN".to_string(),
            ItemCategory::Fertilizer,
            "kg".to_string(),
        )
        .with_quantity(dec!(50));
        assert_eq!(item.stock_value(), None);
        assert_eq!(
            item.with_unit_cost(Some(dec!(72.5))).stock_value(),
            Some(dec!(3625.00))
        );
    }
}
