use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// The document collections kept under the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Companies,
    InventoryItems,
    InventoryPurchases,
    InventoryUsage,
    NeededItems,
    HarvestCollections,
    HarvestPickers,
    PickerWeighEntries,
    HarvestCashPools,
    WorkLogs,
    OperationsWorkCards,
    SeasonChallenges,
}

impl Collection {
    pub const ALL: [Collection; 12] = [
        Collection::Companies,
        Collection::InventoryItems,
        Collection::InventoryPurchases,
        Collection::InventoryUsage,
        Collection::NeededItems,
        Collection::HarvestCollections,
        Collection::HarvestPickers,
        Collection::PickerWeighEntries,
        Collection::HarvestCashPools,
        Collection::WorkLogs,
        Collection::OperationsWorkCards,
        Collection::SeasonChallenges,
    ];

    /// Directory name of the collection inside the data directory.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Companies => "companies",
            Collection::InventoryItems => "inventoryItems",
            Collection::InventoryPurchases => "inventoryPurchases",
            Collection::InventoryUsage => "inventoryUsage",
            Collection::NeededItems => "neededItems",
            Collection::HarvestCollections => "harvestCollections",
            Collection::HarvestPickers => "harvestPickers",
            Collection::PickerWeighEntries => "pickerWeighEntries",
            Collection::HarvestCashPools => "harvestCashPools",
            Collection::WorkLogs => "workLogs",
            Collection::OperationsWorkCards => "operationsWorkCards",
            Collection::SeasonChallenges => "seasonChallenges",
        }
    }

    /// Prefix of generated document IDs.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Collection::Companies => "co-",
            Collection::InventoryItems => "inv-",
            Collection::InventoryPurchases => "ipu-",
            Collection::InventoryUsage => "ius-",
            Collection::NeededItems => "need-",
            Collection::HarvestCollections => "hc-",
            Collection::HarvestPickers => "pk-",
            Collection::PickerWeighEntries => "wt-",
            Collection::HarvestCashPools => "pool-",
            Collection::WorkLogs => "wl-",
            Collection::OperationsWorkCards => "wc-",
            Collection::SeasonChallenges => "ch-",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record stored as one file in a [`Collection`].
///
/// The serialized fields form the frontmatter; [`Document::notes`] is written as the
/// markdown body below it.
pub trait Document: Serialize + DeserializeOwned + Clone {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    /// Human-readable label used to build the file name.
    fn label(&self) -> String;

    fn created(&self) -> DateTime<Utc>;

    fn updated(&self) -> DateTime<Utc>;

    fn touch(&mut self);

    fn notes(&self) -> &str;

    fn set_notes(&mut self, notes: String);

    /// Company the document belongs to, if any.
    fn company_id(&self) -> Option<&str> {
        None
    }
}
