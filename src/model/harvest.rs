use super::types::CollectionStatus;
use crate::error::Result;
use crate::store::Collection;
use crate::validation;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A harvest session: crop intake for one project on one date, paid per kilogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestCollection {
    pub id: String,
    pub company_id: String,
    pub project_id: String,
    pub crop: String,
    pub name: String,
    pub harvest_date: NaiveDate,
    pub price_per_kg: Decimal,

    #[serde(default)]
    pub status: CollectionStatus,

    /// Cash pool pickers of this collection are paid from.
    pub pool_id: String,

    /// Pool balance carried in when the collection was opened.
    #[serde(default)]
    pub opening_balance: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_balance: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl HarvestCollection {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        company_id: String,
        project_id: String,
        crop: String,
        name: String,
        harvest_date: NaiveDate,
        price_per_kg: Decimal,
        pool_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            project_id,
            crop,
            name,
            harvest_date,
            price_per_kg,
            status: CollectionStatus::Open,
            pool_id,
            opening_balance: Decimal::ZERO,
            closing_balance: None,
            closed_at: None,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == CollectionStatus::Open
    }

    /// Pay owed for `kg` at this collection's price, rounded to cents.
    pub fn pay_for(&self, kg: Decimal) -> Result<Decimal> {
        Ok(validation::checked_mul("Picker pay", kg, self.price_per_kg)?.round_dp(2))
    }
}

impl_document!(HarvestCollection, Collection::HarvestCollections, |c| c.name.clone());

/// A laborer registered in a harvest collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picker {
    pub id: String,
    pub company_id: String,
    pub collection_id: String,

    /// Number written on the picker's card; unique within the collection.
    pub number: u32,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default)]
    pub paid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,

    /// Sequence number of the payout that paid this picker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_batch: Option<u32>,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl Picker {
    pub fn new(
        id: String,
        company_id: String,
        collection_id: String,
        number: u32,
        name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            collection_id,
            number,
            name,
            phone: None,
            paid: false,
            paid_amount: None,
            paid_at: None,
            payment_batch: None,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }

    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }
}

impl_document!(Picker, Collection::HarvestPickers, |p| format!("{}-{}", p.number, p.name));

/// One weighing of a picker's crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeighEntry {
    pub id: String,
    pub company_id: String,
    pub collection_id: String,
    pub picker_id: String,

    /// 1-based trip number of the picker within the collection.
    pub trip: u32,

    pub kg: Decimal,

    #[serde(default)]
    pub created: DateTime<Utc>,

    #[serde(default)]
    pub updated: DateTime<Utc>,

    #[serde(skip)]
    pub notes: String,
}

impl WeighEntry {
    pub fn new(
        id: String,
        company_id: String,
        collection_id: String,
        picker_id: String,
        trip: u32,
        kg: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            collection_id,
            picker_id,
            trip,
            kg,
            created: now,
            updated: now,
            notes: String::new(),
        }
    }
}

impl_document!(WeighEntry, Collection::PickerWeighEntries, |w| format!("trip-{}", w.trip));

/// Weight and pay of one picker, derived from their weigh entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
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

/// Pickers paid together in one payout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentBatch {
    pub sequence: u32,
    pub letter: String,
    pub collection_id: String,
    pub picker_ids: Vec<String>,
    pub amount: Decimal,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Totals of a harvest collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
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

/// Letter for a payment batch sequence number: 1 → A, 26 → Z, 27 → AA, 28 → AB...
pub fn batch_letter(sequence: u32) -> String {
    let mut n = sequence;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_batch_letters() {
        assert_eq!(batch_letter(1), "A");
        assert_eq!(batch_letter(2), "B");
        assert_eq!(batch_letter(26), "Z");
        assert_eq!(batch_letter(27), "AA");
        assert_eq!(batch_letter(28), "AB");
        assert_eq!(batch_letter(52), "AZ");
        assert_eq!(batch_letter(53), "BA");
        assert_eq!(batch_letter(702), "ZZ");
        assert_eq!(batch_letter(703), "AAA");
    }

    #[test]
    fn test_pay_rounds_to_cents() {
        let collection = HarvestCollection::new(
            "hc-1".to_string(),
            "co-1".to_string(),
            "tea-block-a".to_string(),
            "tea".to_string(),
            "March week 1".to_string(),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            dec!(12.35),
            "pool-1".to_string(),
        );
        assert_eq!(collection.pay_for(dec!(10.333)).unwrap(), dec!(127.61));
        assert!(collection.is_open());

        let mut costly = collection.clone();
        costly.price_per_kg = Decimal::MAX;
        assert!(costly.pay_for(dec!(2)).is_err());
    }
}
