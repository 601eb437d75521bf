use super::clean;
use crate::error::{FurrowError, Result};
use crate::model::{
    CashPool, Company, HarvestCollection, InventoryItem, InventoryPurchase, InventoryUsage,
    NeededItem, Picker, SeasonChallenge, WeighEntry, WorkCard, WorkLog,
};
use crate::store::{Collection, Document, Store};
use crate::validation;

#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub notes: String,
}

impl NewCompany {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Fields to change on a company; `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
}

pub fn create_company(store: &Store, input: NewCompany) -> Result<Company> {
    let name = input.name.trim().to_string();
    validation::validate_name("Company name", &name)?;
    validation::validate_notes(&input.notes)?;
    ensure_unique_name(store, &name, None)?;

    let company = Company::new(store.generate_id(Collection::Companies), name)
        .with_location(clean(input.location))
        .with_contact(clean(input.contact))
        .with_notes(input.notes);
    store.insert(&company)?;
    tracing::info!(id = %company.id, name = %company.name, "Created company");
    Ok(company)
}

pub fn get_company(store: &Store, id: &str) -> Result<Company> {
    store.get(id)
}

pub fn list_companies(store: &Store, include_inactive: bool) -> Result<Vec<Company>> {
    store.list_where(|c: &Company| include_inactive || c.active)
}

pub fn update_company(store: &Store, id: &str, update: CompanyUpdate) -> Result<Company> {
    let mut company: Company = store.get(id)?;

    if let Some(name) = update.name {
        let name = name.trim().to_string();
        validation::validate_name("Company name", &name)?;
        ensure_unique_name(store, &name, Some(id))?;
        company.name = name;
    }
    if let Some(location) = update.location {
        company.location = clean(Some(location));
    }
    if let Some(contact) = update.contact {
        company.contact = clean(Some(contact));
    }
    if let Some(notes) = update.notes {
        validation::validate_notes(&notes)?;
        company.notes = notes;
    }

    store.update(&mut company)?;
    tracing::info!(id = %company.id, "Updated company");
    Ok(company)
}

pub fn set_company_active(store: &Store, id: &str, active: bool) -> Result<Company> {
    let mut company: Company = store.get(id)?;
    if company.active == active {
        return Ok(company);
    }
    company.active = active;
    store.update(&mut company)?;
    tracing::info!(id = %company.id, active, "Changed company status");
    Ok(company)
}

/// Delete a company that nothing refers to anymore.
pub fn delete_company(store: &Store, id: &str) -> Result<()> {
    store.get::<Company>(id)?;
    let referencing: usize = document_counts(store, Some(id))?
        .iter()
        .map(|(_, count)| count)
        .sum();
    if referencing > 0 {
        return Err(FurrowError::Validation(format!(
            "Company {} still owns {} document(s); deactivate it instead",
            id, referencing
        )));
    }
    store.delete::<Company>(id)?;
    tracing::info!(id, "Deleted company");
    Ok(())
}

/// The company a record is written for; it must exist and be active.
pub fn require_active_company(store: &Store, id: &str) -> Result<Company> {
    let company: Company = store.get(id)?;
    if !company.active {
        return Err(FurrowError::Validation(format!(
            "Company {} ({}) is inactive",
            company.name, company.id
        )));
    }
    Ok(company)
}

/// Number of documents per collection, optionally only those owned by one company.
/// The companies collection itself is not included.
pub fn document_counts(store: &Store, company_id: Option<&str>) -> Result<Vec<(Collection, usize)>> {
    Ok(vec![
        count_owned::<InventoryItem>(store, company_id)?,
        count_owned::<InventoryPurchase>(store, company_id)?,
        count_owned::<InventoryUsage>(store, company_id)?,
        count_owned::<NeededItem>(store, company_id)?,
        count_owned::<HarvestCollection>(store, company_id)?,
        count_owned::<Picker>(store, company_id)?,
        count_owned::<WeighEntry>(store, company_id)?,
        count_owned::<CashPool>(store, company_id)?,
        count_owned::<WorkLog>(store, company_id)?,
        count_owned::<WorkCard>(store, company_id)?,
        count_owned::<SeasonChallenge>(store, company_id)?,
    ])
}

fn count_owned<T: Document>(store: &Store, company_id: Option<&str>) -> Result<(Collection, usize)> {
    let count = match company_id {
        None => store.count(T::COLLECTION)?,
        Some(id) => store.list_where(|d: &T| d.company_id() == Some(id))?.len(),
    };
    Ok((T::COLLECTION, count))
}

fn ensure_unique_name(store: &Store, name: &str, except_id: Option<&str>) -> Result<()> {
    let taken = store
        .list::<Company>()?
        .into_iter()
        .any(|c| c.name.eq_ignore_ascii_case(name) && Some(c.id.as_str()) != except_id);
    if taken {
        return Err(FurrowError::Validation(format!(
            "A company named '{}' already exists",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemCategory, InventoryItem};
    use crate::ops::testing::setup_store;

    #[test]
    fn test_create_and_list() {
        let (store, _temp_dir) = setup_store();
        let company = create_company(
            &store,
            NewCompany {
                name: "  Kericho Highlands ".to_string(),
                location: Some("Kericho".to_string()),
                contact: Some("   ".to_string()),
                notes: String::new(),
            },
        )
        .unwrap();

        assert!(company.id.starts_with("co-"));
        assert_eq!(company.name, "Kericho Highlands");
        assert_eq!(company.contact, None);
        assert_eq!(list_companies(&store, false).unwrap().len(), 1);
    }

    #[test]
    fn test_names_are_unique_ignoring_case() {
        let (store, _temp_dir) = setup_store();
        create_company(&store, NewCompany::named("Mau Farm")).unwrap();
        let err = create_company(&store, NewCompany::named("mau farm")).unwrap_err();
        assert!(matches!(err, FurrowError::Validation(_)));

        let other = create_company(&store, NewCompany::named("Molo Farm")).unwrap();
        let rename = CompanyUpdate {
            name: Some("MAU FARM".to_string()),
            ..Default::default()
        };
        assert!(update_company(&store, &other.id, rename).is_err());
    }

    #[test]
    fn test_update_keeps_own_name() {
        let (store, _temp_dir) = setup_store();
        let company = create_company(&store, NewCompany::named("Mau Farm")).unwrap();
        let updated = update_company(
            &store,
            &company.id,
            CompanyUpdate {
                name: Some("Mau farm".to_string()),
                location: Some("Molo".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Mau farm");
        assert_eq!(updated.location.as_deref(), Some("Molo"));
    }

    #[test]
    fn test_inactive_company_is_rejected() {
        let (store, _temp_dir) = setup_store();
        let company = create_company(&store, NewCompany::named("Mau Farm")).unwrap();
        assert!(require_active_company(&store, &company.id).is_ok());

        set_company_active(&store, &company.id, false).unwrap();
        assert!(require_active_company(&store, &company.id).is_err());
        assert!(list_companies(&store, false).unwrap().is_empty());
        assert_eq!(list_companies(&store, true).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_refused_while_referenced() {
        let (store, _temp_dir) = setup_store();
        let company = create_company(&store, NewCompany::named("Mau Farm")).unwrap();
        let item = InventoryItem::new(
            store.generate_id(Collection::InventoryItems),
            company.id.clone(),
            "Diesel".to_string(),
            ItemCategory::Fuel,
            "l".to_string(),
        );
        store.insert(&item).unwrap();

        assert!(delete_company(&store, &company.id).is_err());
        store.delete::<InventoryItem>(&item.id).unwrap();
        delete_company(&store, &company.id).unwrap();
        assert!(get_company(&store, &company.id).is_err());
    }
}
