use super::companies;
use super::harvest::{self, CollectionFilter};
use super::inventory;
use crate::error::Result;
use crate::model::{
    CashPool, CollectionStatus, Company, HarvestCollection, InventoryItem, SeasonChallenge,
    WorkCard,
};
use crate::store::{Collection, Store};
use crate::validation;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CollectionCount {
    pub collection: String,
    pub count: usize,
}

/// Dashboard totals for one company or for the whole farm.
#[derive(Debug, Clone, Serialize)]
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

pub fn overview(store: &Store, company_id: Option<&str>) -> Result<Overview> {
    let company = company_id
        .map(|id| companies::get_company(store, id))
        .transpose()?;

    let mut counts = Vec::with_capacity(Collection::ALL.len());
    if company_id.is_none() {
        counts.push(CollectionCount {
            collection: Collection::Companies.to_string(),
            count: store.count(Collection::Companies)?,
        });
    }
    counts.extend(
        companies::document_counts(store, company_id)?
            .into_iter()
            .map(|(collection, count)| CollectionCount {
                collection: collection.to_string(),
                count,
            }),
    );

    let owned = |doc_company: &str| company_id.is_none_or(|c| doc_company == c);
    let cards = store.list_where(|c: &WorkCard| owned(&c.company_id))?;

    Ok(Overview {
        company,
        counts,
        low_stock: inventory::low_stock(store, company_id)?,
        open_collections: harvest::list_collections(
            store,
            &CollectionFilter {
                company_id: company_id.map(str::to_string),
                status: Some(CollectionStatus::Open),
                ..Default::default()
            },
        )?,
        cards_awaiting_review: cards.iter().filter(|c| c.awaiting_review()).cloned().collect(),
        cards_awaiting_payment: cards.iter().filter(|c| c.awaiting_payment()).cloned().collect(),
        open_challenges: store
            .list_where(|c: &SeasonChallenge| owned(&c.company_id) && !c.resolved)?
            .len(),
        pool_balance: validation::checked_sum(
            "Pool balance",
            store
                .list_where(|p: &CashPool| owned(&p.company_id))?
                .iter()
                .map(|p| p.balance),
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemCategory, WorkPlan};
    use crate::ops::companies::NewCompany;
    use crate::ops::harvest::NewCollection;
    use crate::ops::inventory::NewItem;
    use crate::ops::testing::{date, seed_company, setup_store};
    use crate::ops::work_cards::{self, NewWorkCard};
    use crate::ops::wallet;
    use rust_decimal_macros::dec;

    #[test]
    fn test_overview_scopes_to_company() {
        let (store, _temp_dir) = setup_store();
        let company = seed_company(&store);
        let other = companies::create_company(&store, NewCompany::named("Molo Farm")).unwrap();

        inventory::add_item(
            &store,
            NewItem {
                company_id: company.id.clone(),
                name: "Diesel".to_string(),
                category: ItemCategory::Fuel,
                unit: "l".to_string(),
                quantity: dec!(5),
                reorder_level: dec!(20),
                unit_cost: None,
                notes: String::new(),
            },
        )
        .unwrap();
        let collection = harvest::open_collection(
            &store,
            NewCollection {
                company_id: company.id.clone(),
                project_id: "tea-block-a".to_string(),
                crop: "Tea".to_string(),
                name: None,
                harvest_date: Some(date(3, 2)),
                price_per_kg: dec!(12),
                notes: String::new(),
            },
        )
        .unwrap();
        wallet::top_up(&store, &collection.pool_id, dec!(900), None).unwrap();
        let card = work_cards::plan_work_card(
            &store,
            NewWorkCard {
                company_id: other.id.clone(),
                project_id: "dairy".to_string(),
                title: "Fence paddock".to_string(),
                work_type: "fencing".to_string(),
                planned: WorkPlan::new(date(3, 4), 3, dec!(1500)),
                notes: String::new(),
            },
        )
        .unwrap();
        work_cards::submit_actual(&store, &card.id, WorkPlan::new(date(3, 4), 3, dec!(1500)), None).unwrap();

        let all = overview(&store, None).unwrap();
        assert_eq!(all.counts[0].collection, "companies");
        assert_eq!(all.counts[0].count, 2);
        assert_eq!(all.cards_awaiting_review.len(), 1);
        assert_eq!(all.pool_balance, dec!(900));

        let scoped = overview(&store, Some(&company.id)).unwrap();
        assert_eq!(scoped.company.unwrap().id, company.id);
        assert_eq!(scoped.low_stock.len(), 1);
        assert_eq!(scoped.open_collections.len(), 1);
        assert!(scoped.cards_awaiting_review.is_empty());
        let items = scoped
            .counts
            .iter()
            .find(|c| c.collection == "inventoryItems")
            .unwrap();
        assert_eq!(items.count, 1);
    }
}
