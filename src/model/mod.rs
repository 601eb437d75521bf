//! Data models for farm operations.
//!
//! Every record is a [`Document`](crate::store::Document) stored in its own collection:
//!
//! - [`Company`]: the farming business that owns every other record
//! - [`InventoryItem`], [`InventoryPurchase`], [`InventoryUsage`], [`NeededItem`]: stock keeping
//! - [`HarvestCollection`], [`Picker`], [`WeighEntry`]: harvest intake and picker payroll
//! - [`CashPool`]: the cash wallet pickers are paid from
//! - [`WorkLog`], [`WorkCard`]: daily work records and planned-vs-actual work
//! - [`SeasonChallenge`]: problems reported during a season

/// Implements [`Document`](crate::store::Document) for a record with the standard
/// `id`, `company_id`, `created`, `updated` and `notes` fields.
macro_rules! impl_document {
    ($ty:ty, $collection:expr, |$doc:ident| $label:expr) => {
        impl crate::store::Document for $ty {
            const COLLECTION: crate::store::Collection = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn label(&self) -> String {
                let $doc = self;
                $label
            }

            fn created(&self) -> chrono::DateTime<chrono::Utc> {
                self.created
            }

            fn updated(&self) -> chrono::DateTime<chrono::Utc> {
                self.updated
            }

            fn touch(&mut self) {
                self.updated = chrono::Utc::now();
            }

            fn notes(&self) -> &str {
                &self.notes
            }

            fn set_notes(&mut self, notes: String) {
                self.notes = notes;
            }

            fn company_id(&self) -> Option<&str> {
                Some(&self.company_id)
            }
        }
    };
}

mod cash;
mod challenge;
mod company;
mod harvest;
mod inventory;
mod types;
mod work;

pub use cash::{CashEntry, CashPool};
pub use challenge::SeasonChallenge;
pub use company::Company;
pub use harvest::{
    CollectionSummary, HarvestCollection, PaymentBatch, Picker, PickerTotal, WeighEntry,
    batch_letter,
};
pub use inventory::{InventoryItem, InventoryPurchase, InventoryUsage, NeededItem};
pub use types::{
    CashEntryKind, ChallengeCategory, CollectionStatus, ItemCategory, NeededStatus, Severity,
    WorkCardStatus, WorkLogSource,
};
pub use work::{InputLine, InputVariance, WorkCard, WorkCardAction, WorkCardVariance, WorkLog, WorkPlan};
