use crate::error::{FurrowError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Fertilizer,
    Chemical,
    Seed,
    Fuel,
    Packaging,
    Tool,
    #[default]
    Other,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::Fertilizer => write!(f, "fertilizer"),
            ItemCategory::Chemical => write!(f, "chemical"),
            ItemCategory::Seed => write!(f, "seed"),
            ItemCategory::Fuel => write!(f, "fuel"),
            ItemCategory::Packaging => write!(f, "packaging"),
            ItemCategory::Tool => write!(f, "tool"),
            ItemCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ItemCategory {
    type Err = FurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fertilizer" | "fertiliser" => Ok(ItemCategory::Fertilizer),
            "chemical" | "chemicals" | "agrochemical" => Ok(ItemCategory::Chemical),
            "seed" | "seeds" | "seedling" | "seedlings" => Ok(ItemCategory::Seed),
            "fuel" | "diesel" => Ok(ItemCategory::Fuel),
            "packaging" => Ok(ItemCategory::Packaging),
            "tool" | "tools" | "equipment" => Ok(ItemCategory::Tool),
            "other" => Ok(ItemCategory::Other),
            _ => Err(FurrowError::Parse(format!("Invalid item category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NeededStatus {
    #[default]
    Pending,
    Ordered,
    Received,
    Cancelled,
}

impl fmt::Display for NeededStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeededStatus::Pending => write!(f, "pending"),
            NeededStatus::Ordered => write!(f, "ordered"),
            NeededStatus::Received => write!(f, "received"),
            NeededStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for NeededStatus {
    type Err = FurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(NeededStatus::Pending),
            "ordered" => Ok(NeededStatus::Ordered),
            "received" => Ok(NeededStatus::Received),
            "cancelled" | "canceled" => Ok(NeededStatus::Cancelled),
            _ => Err(FurrowError::Parse(format!("Invalid needed item status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStatus {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionStatus::Open => write!(f, "open"),
            CollectionStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for CollectionStatus {
    type Err = FurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(CollectionStatus::Open),
            "closed" => Ok(CollectionStatus::Closed),
            _ => Err(FurrowError::Parse(format!("Invalid collection status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashEntryKind {
    TopUp,
    Payout,
    CarryForward,
}

impl fmt::Display for CashEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashEntryKind::TopUp => write!(f, "top-up"),
            CashEntryKind::Payout => write!(f, "payout"),
            CashEntryKind::CarryForward => write!(f, "carry-forward"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkLogSource {
    #[default]
    Manual,
    InventoryUsage,
    WorkCard,
}

impl fmt::Display for WorkLogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkLogSource::Manual => write!(f, "manual"),
            WorkLogSource::InventoryUsage => write!(f, "inventory-usage"),
            WorkLogSource::WorkCard => write!(f, "work-card"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkCardStatus {
    #[default]
    Planned,
    Submitted,
    Approved,
    Rejected,
}

impl fmt::Display for WorkCardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkCardStatus::Planned => write!(f, "planned"),
            WorkCardStatus::Submitted => write!(f, "submitted"),
            WorkCardStatus::Approved => write!(f, "approved"),
            WorkCardStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for WorkCardStatus {
    type Err = FurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "planned" | "plan" => Ok(WorkCardStatus::Planned),
            "submitted" => Ok(WorkCardStatus::Submitted),
            "approved" => Ok(WorkCardStatus::Approved),
            "rejected" => Ok(WorkCardStatus::Rejected),
            _ => Err(FurrowError::Parse(format!("Invalid work card status: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeCategory {
    Pest,
    Disease,
    Weather,
    Labor,
    Market,
    Equipment,
    #[default]
    Other,
}

impl fmt::Display for ChallengeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeCategory::Pest => write!(f, "pest"),
            ChallengeCategory::Disease => write!(f, "disease"),
            ChallengeCategory::Weather => write!(f, "weather"),
            ChallengeCategory::Labor => write!(f, "labor"),
            ChallengeCategory::Market => write!(f, "market"),
            ChallengeCategory::Equipment => write!(f, "equipment"),
            ChallengeCategory::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ChallengeCategory {
    type Err = FurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pest" | "pests" => Ok(ChallengeCategory::Pest),
            "disease" => Ok(ChallengeCategory::Disease),
            "weather" | "climate" => Ok(ChallengeCategory::Weather),
            "labor" | "labour" => Ok(ChallengeCategory::Labor),
            "market" => Ok(ChallengeCategory::Market),
            "equipment" | "machinery" => Ok(ChallengeCategory::Equipment),
            "other" => Ok(ChallengeCategory::Other),
            _ => Err(FurrowError::Parse(format!("Invalid challenge category: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Severity {
    type Err = FurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" | "severe" => Ok(Severity::Critical),
            _ => Err(FurrowError::Parse(format!("Invalid severity: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases() {
        assert_eq!("Fertiliser".parse::<ItemCategory>().unwrap(), ItemCategory::Fertilizer);
        assert_eq!("labour".parse::<ChallengeCategory>().unwrap(), ChallengeCategory::Labor);
        assert!("gravel".parse::<ItemCategory>().is_err());
    }

    #[test]
    fn test_severity_is_ordered() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low < Severity::Medium);
    }

    #[test]
    fn test_display_matches_from_str() {
        for status in [
            WorkCardStatus::Planned,
            WorkCardStatus::Submitted,
            WorkCardStatus::Approved,
            WorkCardStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<WorkCardStatus>().unwrap(), status);
        }
    }
}
