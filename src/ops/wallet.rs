use super::{clean, companies};
use crate::error::Result;
use crate::model::{CashEntry, CashPool};
use crate::store::{Collection, Store};
use crate::validation;
use rust_decimal::Decimal;

/// The pool for this project and crop, if one exists.
pub fn find_pool(store: &Store, company_id: &str, project_id: &str, crop: &str) -> Result<Option<CashPool>> {
    Ok(store
        .list::<CashPool>()?
        .into_iter()
        .find(|p| p.matches(company_id, project_id.trim(), crop.trim())))
}

/// A fresh, unsaved pool for this project and crop.
pub(crate) fn new_pool(store: &Store, company_id: &str, project_id: &str, crop: &str) -> Result<CashPool> {
    validation::validate_label("Project", project_id)?;
    validation::validate_label("Crop", crop)?;
    Ok(CashPool::new(
        store.generate_id(Collection::HarvestCashPools),
        company_id.to_string(),
        project_id.trim().to_string(),
        crop.trim().to_string(),
    ))
}

/// One pool per company, project and crop: returns the existing one or creates it.
pub fn find_or_create_pool(store: &Store, company_id: &str, project_id: &str, crop: &str) -> Result<CashPool> {
    if let Some(pool) = find_pool(store, company_id, project_id, crop)? {
        return Ok(pool);
    }
    companies::require_active_company(store, company_id)?;
    let pool = new_pool(store, company_id, project_id, crop)?;
    store.insert(&pool)?;
    tracing::info!(id = %pool.id, project = %pool.project_id, crop = %pool.crop, "Created cash pool");
    Ok(pool)
}

pub fn get_pool(store: &Store, id: &str) -> Result<CashPool> {
    store.get(id)
}

pub fn list_pools(store: &Store, company_id: Option<&str>) -> Result<Vec<CashPool>> {
    store.list_where(|p: &CashPool| company_id.is_none_or(|c| p.company_id == c))
}

/// Ledger entries of a pool, oldest first.
pub fn ledger(store: &Store, pool_id: &str) -> Result<Vec<CashEntry>> {
    Ok(get_pool(store, pool_id)?.entries)
}

/// Add cash to a pool.
pub fn top_up(store: &Store, pool_id: &str, amount: Decimal, reference: Option<String>) -> Result<CashPool> {
    let mut pool = get_pool(store, pool_id)?;
    pool.top_up(amount, clean(reference))?;
    store.update(&mut pool)?;
    tracing::info!(pool = %pool.id, %amount, balance = %pool.balance, "Topped up cash pool");
    Ok(pool)
}

/// Books a picker payout on an in-memory pool; the caller writes the pool in its batch.
pub fn record_payout(
    pool: &mut CashPool,
    amount: Decimal,
    collection_id: &str,
    reference: Option<String>,
) -> Result<()> {
    pool.pay_out(amount, collection_id, clean(reference))?;
    Ok(())
}

/// Books the hand-over of the remaining balance when a collection closes.
pub fn record_carry_forward(pool: &mut CashPool, collection_id: &str) -> Decimal {
    pool.carry_forward(collection_id).amount
}
