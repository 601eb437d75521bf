use async_graphql::{Context, Object};

use crate::ops::{
    challenges, companies, harvest, inventory, needed, overview, wallet, work_cards, work_logs,
};

use super::schema::{get_store, list, optional};
use super::types::*;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Companies by name; inactive ones only when asked for
    async fn companies(
        &self,
        ctx: &Context<'_>,
        include_inactive: Option<bool>,
    ) -> async_graphql::Result<Vec<Company>> {
        let store = get_store(ctx)?;
        list(companies::list_companies(&store, include_inactive.unwrap_or(false)))
    }

    async fn company(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<Company>> {
        let store = get_store(ctx)?;
        optional(companies::get_company(&store, &id))
    }

    /// Inventory items, optionally narrowed by company, category or low stock
    async fn items(
        &self,
        ctx: &Context<'_>,
        filter: Option<ItemFilter>,
    ) -> async_graphql::Result<Vec<InventoryItem>> {
        let store = get_store(ctx)?;
        let filter: inventory::ItemFilter = filter.map(Into::into).unwrap_or_default();
        list(inventory::list_items(&store, &filter))
    }

    async fn item(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<InventoryItem>> {
        let store = get_store(ctx)?;
        optional(inventory::get_item(&store, &id))
    }

    /// Items at or below their reorder level
    async fn low_stock(
        &self,
        ctx: &Context<'_>,
        company_id: Option<String>,
    ) -> async_graphql::Result<Vec<InventoryItem>> {
        let store = get_store(ctx)?;
        list(inventory::low_stock(&store, company_id.as_deref()))
    }

    /// Purchases and usages of one item, newest first
    async fn item_history(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<Option<ItemHistory>> {
        let store = get_store(ctx)?;
        optional(inventory::item_history(&store, &id))
    }

    async fn needed_items(
        &self,
        ctx: &Context<'_>,
        company_id: Option<String>,
        status: Option<NeededStatus>,
    ) -> async_graphql::Result<Vec<NeededItem>> {
        let store = get_store(ctx)?;
        list(needed::list_needed_items(
            &store,
            company_id.as_deref(),
            status.map(Into::into),
        ))
    }

    /// Harvest collections, most recent harvest first
    async fn collections(
        &self,
        ctx: &Context<'_>,
        filter: Option<CollectionFilter>,
    ) -> async_graphql::Result<Vec<HarvestCollection>> {
        let store = get_store(ctx)?;
        let filter: harvest::CollectionFilter = filter.map(Into::into).unwrap_or_default();
        list(harvest::list_collections(&store, &filter))
    }

    async fn collection(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<Option<HarvestCollection>> {
        let store = get_store(ctx)?;
        optional(harvest::get_collection(&store, &id))
    }

    async fn pickers(&self, ctx: &Context<'_>, collection_id: String) -> async_graphql::Result<Vec<Picker>> {
        let store = get_store(ctx)?;
        list(harvest::list_pickers(&store, &collection_id))
    }

    async fn weigh_entries(
        &self,
        ctx: &Context<'_>,
        collection_id: String,
        picker_id: Option<String>,
    ) -> async_graphql::Result<Vec<WeighEntry>> {
        let store = get_store(ctx)?;
        list(harvest::list_weigh_entries(
            &store,
            &collection_id,
            picker_id.as_deref(),
        ))
    }

    /// Weight and pay per picker
    async fn picker_totals(
        &self,
        ctx: &Context<'_>,
        collection_id: String,
    ) -> async_graphql::Result<Vec<PickerTotal>> {
        let store = get_store(ctx)?;
        list(harvest::picker_totals(&store, &collection_id))
    }

    async fn payment_batches(
        &self,
        ctx: &Context<'_>,
        collection_id: String,
    ) -> async_graphql::Result<Vec<PaymentBatch>> {
        let store = get_store(ctx)?;
        list(harvest::payment_batches(&store, &collection_id))
    }

    async fn collection_summary(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<Option<CollectionSummary>> {
        let store = get_store(ctx)?;
        optional(harvest::collection_summary(&store, &id))
    }

    async fn cash_pools(
        &self,
        ctx: &Context<'_>,
        company_id: Option<String>,
    ) -> async_graphql::Result<Vec<CashPool>> {
        let store = get_store(ctx)?;
        list(wallet::list_pools(&store, company_id.as_deref()))
    }

    async fn cash_pool(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<CashPool>> {
        let store = get_store(ctx)?;
        optional(wallet::get_pool(&store, &id))
    }

    /// Work logs, most recent day first
    async fn work_logs(
        &self,
        ctx: &Context<'_>,
        filter: Option<WorkLogFilter>,
    ) -> async_graphql::Result<Vec<WorkLog>> {
        let store = get_store(ctx)?;
        let filter = filter.map(WorkLogFilter::into_ops).transpose()?.unwrap_or_default();
        list(work_logs::list_work_logs(&store, &filter))
    }

    async fn work_log(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<WorkLog>> {
        let store = get_store(ctx)?;
        optional(work_logs::get_work_log(&store, &id))
    }

    /// Worker-days and worker-hours per work type
    async fn labor_summary(
        &self,
        ctx: &Context<'_>,
        filter: Option<WorkLogFilter>,
    ) -> async_graphql::Result<Vec<LaborSummary>> {
        let store = get_store(ctx)?;
        let filter = filter.map(WorkLogFilter::into_ops).transpose()?.unwrap_or_default();
        list(work_logs::labor_summary(&store, &filter))
    }

    async fn work_cards(
        &self,
        ctx: &Context<'_>,
        filter: Option<WorkCardFilter>,
    ) -> async_graphql::Result<Vec<WorkCard>> {
        let store = get_store(ctx)?;
        let filter: work_cards::WorkCardFilter = filter.map(Into::into).unwrap_or_default();
        list(work_cards::list_work_cards(&store, &filter))
    }

    async fn work_card(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Option<WorkCard>> {
        let store = get_store(ctx)?;
        optional(work_cards::get_work_card(&store, &id))
    }

    /// Planned against actual for a submitted card
    async fn work_card_variance(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<WorkCardVariance> {
        let store = get_store(ctx)?;
        Ok(work_cards::work_card_variance(&store, &id)?.into())
    }

    /// Challenges, most severe first
    async fn challenges(
        &self,
        ctx: &Context<'_>,
        filter: Option<ChallengeFilter>,
    ) -> async_graphql::Result<Vec<SeasonChallenge>> {
        let store = get_store(ctx)?;
        let filter: challenges::ChallengeFilter = filter.map(Into::into).unwrap_or_default();
        list(challenges::list_challenges(&store, &filter))
    }

    async fn challenge(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<Option<SeasonChallenge>> {
        let store = get_store(ctx)?;
        optional(challenges::get_challenge(&store, &id))
    }

    async fn challenge_summary(
        &self,
        ctx: &Context<'_>,
        filter: Option<ChallengeFilter>,
    ) -> async_graphql::Result<Vec<SeasonSummary>> {
        let store = get_store(ctx)?;
        let filter: challenges::ChallengeFilter = filter.map(Into::into).unwrap_or_default();
        list(challenges::challenge_summary(&store, &filter))
    }

    /// Dashboard totals for one company, or the whole farm when no company is given
    async fn overview(
        &self,
        ctx: &Context<'_>,
        company_id: Option<String>,
    ) -> async_graphql::Result<Overview> {
        let store = get_store(ctx)?;
        Ok(overview::overview(&store, company_id.as_deref())?.into())
    }
}
