use super::{clean, companies, today, wallet};
use crate::error::{FurrowError, Result};
use crate::model::{
    CashPool, CollectionStatus, CollectionSummary, HarvestCollection, PaymentBatch, Picker,
    PickerTotal, WeighEntry, batch_letter,
};
use crate::store::{Collection, Store};
use crate::validation;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct NewCollection {
    pub company_id: String,
    pub project_id: String,
    pub crop: String,
    /// Defaults to "<crop> <harvest date>".
    pub name: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub price_per_kg: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct NewPicker {
    pub collection_id: String,
    /// Next free number when omitted.
    pub number: Option<u32>,
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    pub company_id: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<CollectionStatus>,
}

/// Open a harvest collection and attach it to the cash pool of its project and crop.
///
/// The pool is created together with the collection when this is the first harvest of
/// that project and crop.
pub fn open_collection(store: &Store, input: NewCollection) -> Result<HarvestCollection> {
    companies::require_active_company(store, &input.company_id)?;
    validation::validate_positive("Price per kg", input.price_per_kg)?;
    validation::validate_notes(&input.notes)?;

    let harvest_date = input.harvest_date.unwrap_or_else(today);
    let crop = input.crop.trim().to_string();
    let name = clean(input.name).unwrap_or_else(|| format!("{} {}", crop, harvest_date));
    validation::validate_name("Collection name", &name)?;

    let existing_pool = wallet::find_pool(store, &input.company_id, &input.project_id, &crop)?;
    let pool = match &existing_pool {
        Some(pool) => pool.clone(),
        None => wallet::new_pool(store, &input.company_id, &input.project_id, &crop)?,
    };

    let mut collection = HarvestCollection::new(
        store.generate_id(Collection::HarvestCollections),
        input.company_id,
        pool.project_id.clone(),
        pool.crop.clone(),
        name,
        harvest_date,
        input.price_per_kg,
        pool.id.clone(),
    );
    collection.opening_balance = pool.balance;
    collection.notes = input.notes;

    let mut batch = store.batch();
    if existing_pool.is_none() {
        batch.insert(&pool)?;
    }
    batch.insert(&collection)?;
    batch.commit()?;

    tracing::info!(
        id = %collection.id,
        pool = %pool.id,
        opening_balance = %collection.opening_balance,
        "Opened harvest collection"
    );
    Ok(collection)
}

pub fn get_collection(store: &Store, id: &str) -> Result<HarvestCollection> {
    store.get(id)
}

pub fn list_collections(store: &Store, filter: &CollectionFilter) -> Result<Vec<HarvestCollection>> {
    let mut collections = store.list_where(|c: &HarvestCollection| {
        filter.company_id.as_deref().is_none_or(|id| c.company_id == id)
            && filter.project_id.as_deref().is_none_or(|id| c.project_id == id)
            && filter.status.is_none_or(|s| c.status == s)
    })?;
    collections.sort_by(|a, b| b.harvest_date.cmp(&a.harvest_date));
    Ok(collections)
}

pub fn add_picker(store: &Store, input: NewPicker) -> Result<Picker> {
    let collection = open_collection_for_writes(store, &input.collection_id)?;
    companies::require_active_company(store, &collection.company_id)?;
    let name = input.name.trim().to_string();
    validation::validate_name("Picker name", &name)?;

    let pickers = list_pickers(store, &collection.id)?;
    let number = match input.number {
        Some(0) => {
            return Err(FurrowError::Validation(
                "Picker numbers start at 1".to_string(),
            ));
        }
        Some(number) => {
            if pickers.iter().any(|p| p.number == number) {
                return Err(FurrowError::DuplicatePicker {
                    collection: collection.id.clone(),
                    number,
                });
            }
            number
        }
        None => {
            let highest = pickers.iter().map(|p| p.number).max().unwrap_or(0);
            validation::checked_count("Next picker number", highest, 1)?
        }
    };

    let picker = Picker::new(
        store.generate_id(Collection::HarvestPickers),
        collection.company_id.clone(),
        collection.id.clone(),
        number,
        name,
    )
    .with_phone(clean(input.phone));
    store.insert(&picker)?;
    tracing::info!(id = %picker.id, collection = %collection.id, number, "Added picker");
    Ok(picker)
}

/// Pickers of a collection ordered by number.
pub fn list_pickers(store: &Store, collection_id: &str) -> Result<Vec<Picker>> {
    let mut pickers = store.list_where(|p: &Picker| p.collection_id == collection_id)?;
    pickers.sort_by_key(|p| p.number);
    Ok(pickers)
}

/// Look a picker up by id or by card number within a collection.
pub fn resolve_picker(store: &Store, collection_id: &str, key: &str) -> Result<Picker> {
    let key = key.trim();
    let found = match key.parse::<u32>() {
        Ok(number) => list_pickers(store, collection_id)?
            .into_iter()
            .find(|p| p.number == number),
        Err(_) => store
            .find::<Picker>(key)?
            .filter(|p| p.collection_id == collection_id),
    };
    found.ok_or_else(|| FurrowError::not_found(Collection::HarvestPickers, key))
}

/// Record one weighing for a picker; trips are numbered per picker from 1.
pub fn record_weight(store: &Store, collection_id: &str, picker_id: &str, kg: Decimal) -> Result<WeighEntry> {
    validation::validate_positive("Weight", kg)?;
    let collection = open_collection_for_writes(store, collection_id)?;
    companies::require_active_company(store, &collection.company_id)?;
    let picker = unpaid_picker(store, &collection, picker_id)?;

    let last_trip = list_weigh_entries(store, collection_id, Some(picker.id.as_str()))?
        .iter()
        .map(|w| w.trip)
        .max()
        .unwrap_or(0);
    let trip = validation::checked_count("Trip number", last_trip, 1)?;
    let entry = WeighEntry::new(
        store.generate_id(Collection::PickerWeighEntries),
        collection.company_id.clone(),
        collection.id.clone(),
        picker.id.clone(),
        trip,
        kg,
    );
    store.insert(&entry)?;
    tracing::info!(collection = %collection.id, picker = %picker.id, trip, %kg, "Recorded weight");
    Ok(entry)
}

pub fn remove_weigh_entry(store: &Store, entry_id: &str) -> Result<()> {
    let entry: WeighEntry = store.get(entry_id)?;
    let collection = open_collection_for_writes(store, &entry.collection_id)?;
    unpaid_picker(store, &collection, &entry.picker_id)?;
    store.delete::<WeighEntry>(entry_id)?;
    tracing::info!(id = entry_id, collection = %collection.id, "Removed weigh entry");
    Ok(())
}

/// Weigh entries of a collection, optionally of one picker, in trip order.
pub fn list_weigh_entries(
    store: &Store,
    collection_id: &str,
    picker_id: Option<&str>,
) -> Result<Vec<WeighEntry>> {
    let mut entries = store.list_where(|w: &WeighEntry| {
        w.collection_id == collection_id && picker_id.is_none_or(|p| w.picker_id == p)
    })?;
    entries.sort_by(|a, b| a.picker_id.cmp(&b.picker_id).then(a.trip.cmp(&b.trip)));
    Ok(entries)
}

/// Weight and pay per picker, ordered by picker number.
pub fn picker_totals(store: &Store, collection_id: &str) -> Result<Vec<PickerTotal>> {
    let collection = get_collection(store, collection_id)?;
    let pickers = list_pickers(store, collection_id)?;
    totals_for(&collection, &pickers, &list_weigh_entries(store, collection_id, None)?)
}

fn totals_for(
    collection: &HarvestCollection,
    pickers: &[Picker],
    entries: &[WeighEntry],
) -> Result<Vec<PickerTotal>> {
    pickers
        .iter()
        .map(|picker| {
            let weighed: Vec<&WeighEntry> = entries.iter().filter(|w| w.picker_id == picker.id).collect();
            let kg = validation::checked_sum("Picker weight", weighed.iter().map(|w| w.kg))?;
            Ok(PickerTotal {
                picker_id: picker.id.clone(),
                number: picker.number,
                name: picker.name.clone(),
                trips: u32::try_from(weighed.len()).unwrap_or(u32::MAX),
                kg,
                pay: collection.pay_for(kg)?,
                paid: picker.paid,
                payment_batch: picker.payment_batch.map(batch_letter),
            })
        })
        .collect()
}

/// Pickers paid together, grouped by payout and lettered A, B, ... in payout order.
pub fn payment_batches(store: &Store, collection_id: &str) -> Result<Vec<PaymentBatch>> {
    batches_for(collection_id, &list_pickers(store, collection_id)?)
}

fn batches_for(collection_id: &str, pickers: &[Picker]) -> Result<Vec<PaymentBatch>> {
    let mut batches: BTreeMap<u32, PaymentBatch> = BTreeMap::new();
    for picker in pickers.iter().filter(|p| p.paid) {
        let Some(sequence) = picker.payment_batch else {
            continue;
        };
        let batch = batches.entry(sequence).or_insert_with(|| PaymentBatch {
            sequence,
            letter: batch_letter(sequence),
            collection_id: collection_id.to_string(),
            picker_ids: Vec::new(),
            amount: Decimal::ZERO,
            paid_at: picker.paid_at,
        });
        batch.picker_ids.push(picker.id.clone());
        batch.amount = validation::checked_add(
            "Batch amount",
            batch.amount,
            picker.paid_amount.unwrap_or_default(),
        )?;
        if picker.paid_at > batch.paid_at {
            batch.paid_at = picker.paid_at;
        }
    }
    Ok(batches.into_values().collect())
}

pub fn collection_summary(store: &Store, collection_id: &str) -> Result<CollectionSummary> {
    let collection = get_collection(store, collection_id)?;
    let pickers = list_pickers(store, collection_id)?;
    let entries = list_weigh_entries(store, collection_id, None)?;
    let totals = totals_for(&collection, &pickers, &entries)?;

    let paid: Vec<&PickerTotal> = totals.iter().filter(|t| t.paid).collect();
    let unpaid: Vec<&PickerTotal> = totals.iter().filter(|t| !t.paid).collect();
    let paid_amount = validation::checked_sum("Paid amount", pickers.iter().filter_map(|p| p.paid_amount))?;

    Ok(CollectionSummary {
        collection_id: collection.id.clone(),
        name: collection.name.clone(),
        status: collection.status,
        price_per_kg: collection.price_per_kg,
        total_kg: validation::checked_sum("Total weight", totals.iter().map(|t| t.kg))?,
        total_pay: validation::checked_sum("Total pay", totals.iter().map(|t| t.pay))?,
        picker_count: pickers.len(),
        trip_count: entries.len(),
        paid_count: paid.len(),
        unpaid_count: unpaid.len(),
        paid_amount,
        unpaid_amount: validation::checked_sum("Unpaid amount", unpaid.iter().map(|t| t.pay))?,
        opening_balance: collection.opening_balance,
        closing_balance: collection.closing_balance,
        batches: batches_for(&collection.id, &pickers)?,
    })
}

/// Pay unpaid pickers from the collection's cash pool as one payment batch.
///
/// Pays `picker_ids`, or every unpaid picker with pay owed when none are given. The pool must
/// cover the whole batch. All pickers and the pool are written in one batch.
pub fn pay_pickers(
    store: &Store,
    collection_id: &str,
    picker_ids: &[String],
    reference: Option<String>,
) -> Result<PaymentBatch> {
    let collection = open_collection_for_writes(store, collection_id)?;
    let mut pickers = list_pickers(store, collection_id)?;
    let entries = list_weigh_entries(store, collection_id, None)?;
    let totals = totals_for(&collection, &pickers, &entries)?;

    let selected: Vec<&PickerTotal> = if picker_ids.is_empty() {
        totals
            .iter()
            .filter(|t| !t.paid && t.pay > Decimal::ZERO)
            .collect()
    } else {
        let mut selected = Vec::with_capacity(picker_ids.len());
        for id in picker_ids {
            let total = totals
                .iter()
                .find(|t| &t.picker_id == id)
                .ok_or_else(|| FurrowError::not_found(Collection::HarvestPickers, id.as_str()))?;
            if total.paid {
                return Err(FurrowError::Validation(format!(
                    "Picker {} ({}) has already been paid",
                    total.number, total.name
                )));
            }
            if total.pay <= Decimal::ZERO {
                return Err(FurrowError::Validation(format!(
                    "Picker {} ({}) has no pay owed",
                    total.number, total.name
                )));
            }
            if !selected.iter().any(|t: &&PickerTotal| t.picker_id == total.picker_id) {
                selected.push(total);
            }
        }
        selected
    };
    if selected.is_empty() {
        return Err(FurrowError::Validation(format!(
            "No unpaid pickers with pay owed in collection {}",
            collection.id
        )));
    }

    let amount = validation::checked_sum("Batch amount", selected.iter().map(|t| t.pay))?;
    let last_batch = pickers.iter().filter_map(|p| p.payment_batch).max().unwrap_or(0);
    let sequence = validation::checked_count("Payment batch number", last_batch, 1)?;
    let letter = batch_letter(sequence);

    let mut pool: CashPool = store.get(&collection.pool_id)?;
    let reference = reference.or_else(|| Some(format!("{} batch {}", collection.name, letter)));
    wallet::record_payout(&mut pool, amount, &collection.id, reference)?;

    let paid_at = Utc::now();
    let mut batch = store.batch();
    for picker in pickers.iter_mut() {
        let Some(total) = selected.iter().find(|t| t.picker_id == picker.id) else {
            continue;
        };
        picker.paid = true;
        picker.paid_amount = Some(total.pay);
        picker.paid_at = Some(paid_at);
        picker.payment_batch = Some(sequence);
        batch.update(picker)?;
    }
    batch.update(&mut pool)?;
    batch.commit()?;

    tracing::info!(
        collection = %collection.id,
        batch = %letter,
        pickers = selected.len(),
        %amount,
        balance = %pool.balance,
        "Paid pickers"
    );
    Ok(PaymentBatch {
        sequence,
        letter,
        collection_id: collection.id,
        picker_ids: selected.iter().map(|t| t.picker_id.clone()).collect(),
        amount,
        paid_at: Some(paid_at),
    })
}

/// Close a collection and carry the pool balance forward to the next one.
///
/// Refuses while pickers are still owed money, unless `force` is set.
pub fn close_collection(store: &Store, collection_id: &str, force: bool) -> Result<HarvestCollection> {
    let mut collection = open_collection_for_writes(store, collection_id)?;
    let owed: Vec<PickerTotal> = picker_totals(store, collection_id)?
        .into_iter()
        .filter(|t| !t.paid && t.pay > Decimal::ZERO)
        .collect();
    if !owed.is_empty() && !force {
        let amount = validation::checked_sum("Amount owed", owed.iter().map(|t| t.pay))?;
        return Err(FurrowError::Validation(format!(
            "{} picker(s) are still owed {} in total; pay them first or close with force",
            owed.len(),
            amount
        )));
    }

    let mut pool: CashPool = store.get(&collection.pool_id)?;
    let carried = wallet::record_carry_forward(&mut pool, &collection.id);
    collection.status = CollectionStatus::Closed;
    collection.closing_balance = Some(carried);
    collection.closed_at = Some(Utc::now());

    let mut batch = store.batch();
    batch.update(&mut collection)?;
    batch.update(&mut pool)?;
    batch.commit()?;

    if !owed.is_empty() {
        tracing::warn!(collection = %collection.id, unpaid = owed.len(), "Closed collection with unpaid pickers");
    }
    tracing::info!(id = %collection.id, closing_balance = %carried, "Closed harvest collection");
    Ok(collection)
}

fn open_collection_for_writes(store: &Store, collection_id: &str) -> Result<HarvestCollection> {
    let collection = get_collection(store, collection_id)?;
    if !collection.is_open() {
        return Err(FurrowError::CollectionClosed(collection.id));
    }
    Ok(collection)
}

fn unpaid_picker(store: &Store, collection: &HarvestCollection, picker_id: &str) -> Result<Picker> {
    let picker: Picker = store.get(picker_id)?;
    if picker.collection_id != collection.id {
        return Err(FurrowError::Validation(format!(
            "Picker {} does not belong to collection {}",
            picker.id, collection.id
        )));
    }
    if picker.paid {
        return Err(FurrowError::Validation(format!(
            "Picker {} ({}) has already been paid; weights are locked",
            picker.number, picker.name
        )));
    }
    Ok(picker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CashEntryKind;
    use crate::ops::testing::{date, seed_company, setup_store};
    use rust_decimal_macros::dec;

    fn open(store: &Store, company_id: &str) -> HarvestCollection {
        open_collection(
            store,
            NewCollection {
                company_id: company_id.to_string(),
                project_id: "tea-block-a".to_string(),
                crop: "Tea".to_string(),
                name: None,
                harvest_date: Some(date(3, 2)),
                price_per_kg: dec!(12.50),
                notes: String::new(),
            },
        )
        .unwrap()
    }

    fn picker(store: &Store, collection_id: &str, name: &str) -> Picker {
        add_picker(
            store,
            NewPicker {
                collection_id: collection_id.to_string(),
                number: None,
                name: name.to_string(),
                phone: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_open_creates_pool_once() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let first = open(&store, &company.id);
        let second = open(&store, &company.id);

        assert_eq!(first.name, "Tea 2026-03-02");
        assert_eq!(first.pool_id, second.pool_id);
        assert_eq!(store.list::<CashPool>().unwrap().len(), 1);
    }

    #[test]
    fn test_picker_numbers() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let collection = open(&store, &company.id);

        assert_eq!(picker(&store, &collection.id, "Wanjiru").number, 1);
        let explicit = add_picker(
            &store,
            NewPicker {
                collection_id: collection.id.clone(),
                number: Some(7),
                name: "Otieno".to_string(),
                phone: Some("0712 000 000".to_string()),
            },
        )
        .unwrap();
        assert_eq!(explicit.number, 7);
        assert_eq!(picker(&store, &collection.id, "Chebet").number, 8);

        let err = add_picker(
            &store,
            NewPicker {
                collection_id: collection.id.clone(),
                number: Some(7),
                name: "Kiprono".to_string(),
                phone: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, FurrowError::DuplicatePicker { number: 7, .. }));
        assert_eq!(resolve_picker(&store, &collection.id, "8").unwrap().name, "Chebet");
        assert_eq!(resolve_picker(&store, &collection.id, &explicit.id).unwrap().number, 7);
    }

    #[test]
    fn test_next_picker_number_overflow_is_an_error() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let collection = open(&store, &company.id);
        let last = add_picker(
            &store,
            NewPicker {
                collection_id: collection.id.clone(),
                number: Some(u32::MAX),
                name: "Wanjiru".to_string(),
                phone: None,
            },
        )
        .unwrap();
        assert_eq!(last.number, u32::MAX);

        let err = add_picker(
            &store,
            NewPicker {
                collection_id: collection.id.clone(),
                number: None,
                name: "Otieno".to_string(),
                phone: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, FurrowError::Validation(_)));
        assert_eq!(list_pickers(&store, &collection.id).unwrap().len(), 1);
    }

    #[test]
    fn test_oversized_price_and_weight_are_errors() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let huge_price = Decimal::from(10_u64.pow(14));
        let huge_kg = Decimal::from(10_u64.pow(17));

        let err = open_collection(
            &store,
            NewCollection {
                company_id: company.id.clone(),
                project_id: "tea-block-a".to_string(),
                crop: "Tea".to_string(),
                name: None,
                harvest_date: Some(date(3, 2)),
                price_per_kg: huge_price,
                notes: String::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, FurrowError::Validation(_)));

        let mut collection = open(&store, &company.id);
        let wanjiru = picker(&store, &collection.id, "Wanjiru");
        assert!(record_weight(&store, &collection.id, &wanjiru.id, huge_kg).is_err());

        // Values written to disk by hand skip input validation
        collection.price_per_kg = huge_price;
        store.update(&mut collection).unwrap();
        let entry = WeighEntry::new(
            store.generate_id(Collection::PickerWeighEntries),
            company.id.clone(),
            collection.id.clone(),
            wanjiru.id.clone(),
            1,
            huge_kg,
        );
        store.insert(&entry).unwrap();

        let err = picker_totals(&store, &collection.id).unwrap_err();
        assert!(matches!(err, FurrowError::Validation(_)));
        assert!(collection_summary(&store, &collection.id).is_err());
        assert!(pay_pickers(&store, &collection.id, &[], None).is_err());
    }

    #[test]
    fn test_inactive_company_cannot_add_pickers_or_weights() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let collection = open(&store, &company.id);
        let wanjiru = picker(&store, &collection.id, "Wanjiru");
        companies::set_company_active(&store, &company.id, false).unwrap();

        let err = add_picker(
            &store,
            NewPicker {
                collection_id: collection.id.clone(),
                number: None,
                name: "Otieno".to_string(),
                phone: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, FurrowError::Validation(_)));
        assert!(record_weight(&store, &collection.id, &wanjiru.id, dec!(12)).is_err());
        assert!(list_weigh_entries(&store, &collection.id, None).unwrap().is_empty());
    }

    #[test]
    fn test_weights_and_totals() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let collection = open(&store, &company.id);
        let a = picker(&store, &collection.id, "Wanjiru");
        let b = picker(&store, &collection.id, "Otieno");

        record_weight(&store, &collection.id, &a.id, dec!(18.4)).unwrap();
        let second = record_weight(&store, &collection.id, &a.id, dec!(21.1)).unwrap();
        record_weight(&store, &collection.id, &b.id, dec!(9.3)).unwrap();
        assert_eq!(second.trip, 2);
        assert!(record_weight(&store, &collection.id, &b.id, dec!(0)).is_err());

        let totals = picker_totals(&store, &collection.id).unwrap();
        assert_eq!(totals[0].kg, dec!(39.5));
        assert_eq!(totals[0].trips, 2);
        assert_eq!(totals[0].pay, dec!(493.75));
        assert_eq!(totals[1].pay, dec!(116.25));

        remove_weigh_entry(&store, &second.id).unwrap();
        let summary = collection_summary(&store, &collection.id).unwrap();
        assert_eq!(summary.total_kg, dec!(27.7));
        assert_eq!(summary.trip_count, 2);
        assert_eq!(summary.unpaid_count, 2);
        assert_eq!(summary.unpaid_amount, dec!(346.25));
    }

    #[test]
    fn test_payout_needs_funds() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let collection = open(&store, &company.id);
        let a = picker(&store, &collection.id, "Wanjiru");
        record_weight(&store, &collection.id, &a.id, dec!(40)).unwrap();

        wallet::top_up(&store, &collection.pool_id, dec!(100), None).unwrap();
        let err = pay_pickers(&store, &collection.id, &[], None).unwrap_err();
        assert!(matches!(err, FurrowError::InsufficientFunds { .. }));
        assert!(!store.get::<Picker>(&a.id).unwrap().paid);
    }

    #[test]
    fn test_payment_batches_are_lettered() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let collection = open(&store, &company.id);
        let a = picker(&store, &collection.id, "Wanjiru");
        let b = picker(&store, &collection.id, "Otieno");
        let c = picker(&store, &collection.id, "Chebet");
        record_weight(&store, &collection.id, &a.id, dec!(10)).unwrap();
        record_weight(&store, &collection.id, &b.id, dec!(20)).unwrap();
        wallet::top_up(&store, &collection.pool_id, dec!(1000), None).unwrap();

        let first = pay_pickers(&store, &collection.id, &[a.id.clone()], None).unwrap();
        assert_eq!(first.letter, "A");
        assert_eq!(first.amount, dec!(125));

        // c has no weight, so only b is paid
        let second = pay_pickers(&store, &collection.id, &[], None).unwrap();
        assert_eq!(second.letter, "B");
        assert_eq!(second.picker_ids, vec![b.id.clone()]);
        assert!(pay_pickers(&store, &collection.id, &[a.id.clone()], None).is_err());
        assert!(pay_pickers(&store, &collection.id, &[c.id.clone()], None).is_err());

        // Paid pickers are locked
        assert!(record_weight(&store, &collection.id, &a.id, dec!(1)).is_err());

        let batches = payment_batches(&store, &collection.id).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].amount, dec!(250));

        let pool: CashPool = store.get(&collection.pool_id).unwrap();
        assert_eq!(pool.balance, dec!(625));
        assert_eq!(pool.paid_for_collection(&collection.id), dec!(375));

        let summary = collection_summary(&store, &collection.id).unwrap();
        assert_eq!(summary.paid_count, 2);
        assert_eq!(summary.paid_amount, dec!(375));
        assert_eq!(summary.batches.len(), 2);
    }

    #[test]
    fn test_close_carries_balance_forward() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let collection = open(&store, &company.id);
        let a = picker(&store, &collection.id, "Wanjiru");
        record_weight(&store, &collection.id, &a.id, dec!(10)).unwrap();
        wallet::top_up(&store, &collection.pool_id, dec!(500), None).unwrap();

        assert!(close_collection(&store, &collection.id, false).is_err());
        pay_pickers(&store, &collection.id, &[], None).unwrap();
        let closed = close_collection(&store, &collection.id, false).unwrap();
        assert_eq!(closed.status, CollectionStatus::Closed);
        assert_eq!(closed.closing_balance, Some(dec!(375)));

        let pool: CashPool = store.get(&collection.pool_id).unwrap();
        assert_eq!(pool.entries.last().unwrap().kind, CashEntryKind::CarryForward);

        assert!(matches!(
            record_weight(&store, &collection.id, &a.id, dec!(1)),
            Err(FurrowError::CollectionClosed(_))
        ));

        let next = open(&store, &company.id);
        assert_eq!(next.opening_balance, dec!(375));
    }

    #[test]
    fn test_force_close_with_unpaid_pickers() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let collection = open(&store, &company.id);
        let a = picker(&store, &collection.id, "Wanjiru");
        record_weight(&store, &collection.id, &a.id, dec!(10)).unwrap();

        let closed = close_collection(&store, &collection.id, true).unwrap();
        assert_eq!(closed.closing_balance, Some(dec!(0)));
        let open_only = list_collections(
            &store,
            &CollectionFilter {
                status: Some(CollectionStatus::Open),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(open_only.is_empty());
    }
}
