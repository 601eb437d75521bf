use async_graphql::{Context, Object};
use rust_decimal::Decimal;

use crate::ops::{
    challenges, companies, harvest, inventory, needed, wallet, work_cards, work_logs,
};
use crate::store::Store;

use super::schema::app_state;
use super::types::*;

pub struct MutationRoot;

/// Runs `$body` with a store while holding the server-wide write lock.
macro_rules! with_store {
    ($ctx:expr, |$store:ident| $body:expr) => {{
        let state = app_state($ctx)?;
        let _guard = state.write_lock.lock().await;
        let $store: Store = state.store();
        $body
    }};
}

#[Object]
impl MutationRoot {
    async fn create_company(
        &self,
        ctx: &Context<'_>,
        input: CreateCompanyInput,
    ) -> async_graphql::Result<Company> {
        with_store!(ctx, |store| {
            let company = companies::create_company(
                &store,
                companies::NewCompany {
                    name: input.name,
                    location: input.location,
                    contact: input.contact,
                    notes: input.notes.unwrap_or_default(),
                },
            )?;
            Ok(company.into())
        })
    }

    async fn update_company(
        &self,
        ctx: &Context<'_>,
        input: UpdateCompanyInput,
    ) -> async_graphql::Result<Company> {
        with_store!(ctx, |store| {
            let company = companies::update_company(
                &store,
                &input.id,
                companies::CompanyUpdate {
                    name: input.name,
                    location: input.location,
                    contact: input.contact,
                    notes: input.notes,
                },
            )?;
            Ok(company.into())
        })
    }

    /// Deactivated companies keep their records but refuse new ones
    async fn set_company_active(
        &self,
        ctx: &Context<'_>,
        id: String,
        active: bool,
    ) -> async_graphql::Result<Company> {
        with_store!(ctx, |store| Ok(
            companies::set_company_active(&store, &id, active)?.into()
        ))
    }

    /// Only companies without any records can be deleted
    async fn delete_company(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        with_store!(ctx, |store| {
            companies::delete_company(&store, &id)?;
            Ok(true)
        })
    }

    async fn add_item(&self, ctx: &Context<'_>, input: AddItemInput) -> async_graphql::Result<InventoryItem> {
        with_store!(ctx, |store| {
            let item = inventory::add_item(
                &store,
                inventory::NewItem {
                    company_id: input.company_id,
                    name: input.name,
                    category: input.category.map(Into::into).unwrap_or_default(),
                    unit: input.unit,
                    quantity: input.quantity.unwrap_or_default(),
                    reorder_level: input.reorder_level.unwrap_or_default(),
                    unit_cost: input.unit_cost,
                    notes: input.notes.unwrap_or_default(),
                },
            )?;
            Ok(item.into())
        })
    }

    async fn update_item(
        &self,
        ctx: &Context<'_>,
        input: UpdateItemInput,
    ) -> async_graphql::Result<InventoryItem> {
        with_store!(ctx, |store| {
            let item = inventory::update_item(
                &store,
                &input.id,
                inventory::ItemUpdate {
                    name: input.name,
                    category: input.category.map(Into::into),
                    unit: input.unit,
                    reorder_level: input.reorder_level,
                    notes: input.notes,
                },
            )?;
            Ok(item.into())
        })
    }

    async fn restock_item(
        &self,
        ctx: &Context<'_>,
        input: RestockInput,
    ) -> async_graphql::Result<RestockResult> {
        let purchased_on = parse_date(input.purchased_on)?;
        with_store!(ctx, |store| {
            let (item, purchase) = inventory::restock_item(
                &store,
                &input.item_id,
                inventory::Restock {
                    quantity: input.quantity,
                    unit_cost: input.unit_cost,
                    supplier: input.supplier,
                    purchased_on,
                },
            )?;
            Ok(RestockResult {
                item: item.into(),
                purchase: purchase.into(),
            })
        })
    }

    /// Draws stock down and, unless `logWork` is false, records the work it was used for
    async fn use_item(&self, ctx: &Context<'_>, input: UseItemInput) -> async_graphql::Result<UsageResult> {
        let used_on = parse_date(input.used_on)?;
        with_store!(ctx, |store| {
            let outcome = inventory::use_item(
                &store,
                &input.item_id,
                inventory::Usage {
                    quantity: input.quantity,
                    purpose: input.purpose,
                    project_id: input.project_id,
                    used_on,
                    log_work: input.log_work.unwrap_or(true),
                    workers: input.workers,
                },
            )?;
            Ok(outcome.into())
        })
    }

    /// Stock-take correction
    async fn adjust_stock(
        &self,
        ctx: &Context<'_>,
        id: String,
        quantity: Decimal,
        reason: String,
    ) -> async_graphql::Result<InventoryItem> {
        with_store!(ctx, |store| Ok(
            inventory::adjust_stock(&store, &id, quantity, &reason)?.into()
        ))
    }

    async fn delete_item(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        with_store!(ctx, |store| {
            inventory::delete_item(&store, &id)?;
            Ok(true)
        })
    }

    async fn add_needed_item(
        &self,
        ctx: &Context<'_>,
        input: AddNeededItemInput,
    ) -> async_graphql::Result<NeededItem> {
        with_store!(ctx, |store| {
            let needed = needed::add_needed_item(
                &store,
                needed::NewNeededItem {
                    company_id: input.company_id,
                    name: input.name,
                    quantity: input.quantity,
                    unit: input.unit,
                    category: input.category.map(Into::into).unwrap_or_default(),
                    item_id: input.item_id,
                    notes: input.notes.unwrap_or_default(),
                },
            )?;
            Ok(needed.into())
        })
    }

    async fn mark_needed_item_ordered(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<NeededItem> {
        with_store!(ctx, |store| Ok(needed::mark_ordered(&store, &id)?.into()))
    }

    /// Books the delivery into stock, creating the inventory item if needed
    async fn receive_needed_item(
        &self,
        ctx: &Context<'_>,
        input: ReceiveNeededItemInput,
    ) -> async_graphql::Result<ReceiveResult> {
        let received_on = parse_date(input.received_on)?;
        with_store!(ctx, |store| {
            let outcome = needed::receive_needed_item(
                &store,
                &input.id,
                needed::Receipt {
                    quantity: input.quantity,
                    unit_cost: input.unit_cost,
                    supplier: input.supplier,
                    received_on,
                },
            )?;
            Ok(outcome.into())
        })
    }

    async fn cancel_needed_item(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<NeededItem> {
        with_store!(ctx, |store| Ok(needed::cancel_needed_item(&store, &id)?.into()))
    }

    async fn open_collection(
        &self,
        ctx: &Context<'_>,
        input: OpenCollectionInput,
    ) -> async_graphql::Result<HarvestCollection> {
        let harvest_date = parse_date(input.harvest_date)?;
        with_store!(ctx, |store| {
            let collection = harvest::open_collection(
                &store,
                harvest::NewCollection {
                    company_id: input.company_id,
                    project_id: input.project_id,
                    crop: input.crop,
                    name: input.name,
                    harvest_date,
                    price_per_kg: input.price_per_kg,
                    notes: input.notes.unwrap_or_default(),
                },
            )?;
            Ok(collection.into())
        })
    }

    async fn add_picker(&self, ctx: &Context<'_>, input: AddPickerInput) -> async_graphql::Result<Picker> {
        with_store!(ctx, |store| {
            let picker = harvest::add_picker(
                &store,
                harvest::NewPicker {
                    collection_id: input.collection_id,
                    number: input.number,
                    name: input.name,
                    phone: input.phone,
                },
            )?;
            Ok(picker.into())
        })
    }

    /// Records one trip to the scale; `picker` is a picker number or id
    async fn record_weight(
        &self,
        ctx: &Context<'_>,
        collection_id: String,
        picker: String,
        kg: Decimal,
    ) -> async_graphql::Result<WeighEntry> {
        with_store!(ctx, |store| {
            let picker = harvest::resolve_picker(&store, &collection_id, &picker)?;
            Ok(harvest::record_weight(&store, &collection_id, &picker.id, kg)?.into())
        })
    }

    async fn remove_weigh_entry(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        with_store!(ctx, |store| {
            harvest::remove_weigh_entry(&store, &id)?;
            Ok(true)
        })
    }

    /// Pays the given pickers, or every picker still owed when the list is empty
    async fn pay_pickers(
        &self,
        ctx: &Context<'_>,
        collection_id: String,
        picker_ids: Option<Vec<String>>,
        reference: Option<String>,
    ) -> async_graphql::Result<PaymentBatch> {
        with_store!(ctx, |store| {
            let picker_ids = picker_ids.unwrap_or_default();
            Ok(harvest::pay_pickers(&store, &collection_id, &picker_ids, reference)?.into())
        })
    }

    /// Closes the collection and carries the pool balance forward
    async fn close_collection(
        &self,
        ctx: &Context<'_>,
        id: String,
        force: Option<bool>,
    ) -> async_graphql::Result<HarvestCollection> {
        with_store!(ctx, |store| {
            let collection = harvest::close_collection(&store, &id, force.unwrap_or(false))?;
            Ok(collection.into())
        })
    }

    async fn top_up(&self, ctx: &Context<'_>, input: TopUpInput) -> async_graphql::Result<CashPool> {
        with_store!(ctx, |store| {
            let pool_id = match (input.pool_id, input.company_id, input.project_id, input.crop) {
                (Some(pool_id), ..) => pool_id,
                (None, Some(company_id), Some(project_id), Some(crop)) => {
                    wallet::find_or_create_pool(&store, &company_id, &project_id, &crop)?.id
                }
                _ => {
                    return Err(async_graphql::Error::new(
                        "Provide poolId, or companyId, projectId and crop",
                    ));
                }
            };
            Ok(wallet::top_up(&store, &pool_id, input.amount, input.reference)?.into())
        })
    }

    async fn log_work(&self, ctx: &Context<'_>, input: LogWorkInput) -> async_graphql::Result<WorkLog> {
        let date = parse_date(input.date)?;
        with_store!(ctx, |store| {
            let log = work_logs::log_work(
                &store,
                work_logs::NewWorkLog {
                    company_id: input.company_id,
                    project_id: input.project_id,
                    date,
                    work_type: input.work_type.unwrap_or_default(),
                    workers: input.workers,
                    hours: input.hours,
                    description: input.description.unwrap_or_default(),
                    notes: input.notes.unwrap_or_default(),
                },
            )?;
            Ok(log.into())
        })
    }

    async fn update_work_log(
        &self,
        ctx: &Context<'_>,
        input: UpdateWorkLogInput,
    ) -> async_graphql::Result<WorkLog> {
        let date = parse_date(input.date)?;
        with_store!(ctx, |store| {
            let log = work_logs::update_work_log(
                &store,
                &input.id,
                work_logs::WorkLogUpdate {
                    project_id: input.project_id,
                    date,
                    work_type: input.work_type,
                    workers: input.workers,
                    hours: input.hours,
                    description: input.description,
                    notes: input.notes,
                },
            )?;
            Ok(log.into())
        })
    }

    async fn delete_work_log(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        with_store!(ctx, |store| {
            work_logs::delete_work_log(&store, &id)?;
            Ok(true)
        })
    }

    async fn plan_work_card(
        &self,
        ctx: &Context<'_>,
        input: PlanWorkCardInput,
    ) -> async_graphql::Result<WorkCard> {
        let planned = input.planned.into_model()?;
        with_store!(ctx, |store| {
            let card = work_cards::plan_work_card(
                &store,
                work_cards::NewWorkCard {
                    company_id: input.company_id,
                    project_id: input.project_id,
                    title: input.title,
                    work_type: input.work_type,
                    planned,
                    notes: input.notes.unwrap_or_default(),
                },
            )?;
            Ok(card.into())
        })
    }

    /// Changes the plan of a card that has not been submitted
    async fn edit_work_card(
        &self,
        ctx: &Context<'_>,
        input: EditPlanInput,
    ) -> async_graphql::Result<WorkCard> {
        let planned = input.planned.map(WorkPlanInput::into_model).transpose()?;
        with_store!(ctx, |store| {
            let card = work_cards::edit_plan(
                &store,
                &input.id,
                work_cards::PlanEdit {
                    title: input.title,
                    work_type: input.work_type,
                    planned,
                    notes: input.notes,
                },
            )?;
            Ok(card.into())
        })
    }

    async fn submit_work_card(
        &self,
        ctx: &Context<'_>,
        id: String,
        actual: WorkPlanInput,
        submitted_by: Option<String>,
    ) -> async_graphql::Result<WorkCard> {
        let actual = actual.into_model()?;
        with_store!(ctx, |store| Ok(
            work_cards::submit_actual(&store, &id, actual, submitted_by)?.into()
        ))
    }

    /// Approves the submitted actuals and writes the matching work log
    async fn approve_work_card(
        &self,
        ctx: &Context<'_>,
        id: String,
        reviewed_by: Option<String>,
    ) -> async_graphql::Result<ApprovalResult> {
        with_store!(ctx, |store| {
            let (card, log) = work_cards::approve_work_card(&store, &id, reviewed_by)?;
            Ok(ApprovalResult {
                card: card.into(),
                work_log: log.into(),
            })
        })
    }

    async fn reject_work_card(
        &self,
        ctx: &Context<'_>,
        id: String,
        reason: String,
        reviewed_by: Option<String>,
    ) -> async_graphql::Result<WorkCard> {
        with_store!(ctx, |store| Ok(
            work_cards::reject_work_card(&store, &id, &reason, reviewed_by)?.into()
        ))
    }

    async fn mark_work_card_paid(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<WorkCard> {
        with_store!(ctx, |store| Ok(
            work_cards::mark_work_card_paid(&store, &id)?.into()
        ))
    }

    async fn delete_work_card(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        with_store!(ctx, |store| {
            work_cards::delete_work_card(&store, &id)?;
            Ok(true)
        })
    }

    async fn report_challenge(
        &self,
        ctx: &Context<'_>,
        input: ReportChallengeInput,
    ) -> async_graphql::Result<SeasonChallenge> {
        let observed_on = parse_date(input.observed_on)?;
        with_store!(ctx, |store| {
            let challenge = challenges::report_challenge(
                &store,
                challenges::NewChallenge {
                    company_id: input.company_id,
                    project_id: input.project_id,
                    season: input.season,
                    title: input.title,
                    category: input.category.map(Into::into).unwrap_or_default(),
                    severity: input.severity.map(Into::into).unwrap_or_default(),
                    observed_on,
                    notes: input.notes.unwrap_or_default(),
                },
            )?;
            Ok(challenge.into())
        })
    }

    async fn update_challenge(
        &self,
        ctx: &Context<'_>,
        input: UpdateChallengeInput,
    ) -> async_graphql::Result<SeasonChallenge> {
        let observed_on = parse_date(input.observed_on)?;
        with_store!(ctx, |store| {
            let challenge = challenges::update_challenge(
                &store,
                &input.id,
                challenges::ChallengeUpdate {
                    project_id: input.project_id,
                    season: input.season,
                    title: input.title,
                    category: input.category.map(Into::into),
                    severity: input.severity.map(Into::into),
                    observed_on,
                    notes: input.notes,
                },
            )?;
            Ok(challenge.into())
        })
    }

    async fn resolve_challenge(
        &self,
        ctx: &Context<'_>,
        id: String,
        resolution: String,
    ) -> async_graphql::Result<SeasonChallenge> {
        with_store!(ctx, |store| Ok(
            challenges::resolve_challenge(&store, &id, &resolution)?.into()
        ))
    }

    async fn reopen_challenge(
        &self,
        ctx: &Context<'_>,
        id: String,
    ) -> async_graphql::Result<SeasonChallenge> {
        with_store!(ctx, |store| Ok(challenges::reopen_challenge(&store, &id)?.into()))
    }

    async fn delete_challenge(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        with_store!(ctx, |store| {
            challenges::delete_challenge(&store, &id)?;
            Ok(true)
        })
    }
}
