use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FurrowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{collection} document not found: {id}")]
    NotFound { collection: String, id: String },

    #[error("Invalid document ID: {0}")]
    InvalidId(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(
        "Concurrent modification detected for '{id}'. The document was changed by another process; reload and try again."
    )]
    Conflict { id: String },

    #[error("Cannot {action} work card {id} while it is {status}")]
    InvalidTransition {
        id: String,
        status: String,
        action: String,
    },

    #[error("Insufficient stock for {item}: {available} available, {requested} requested")]
    InsufficientStock {
        item: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Insufficient funds in cash pool {pool}: balance {available}, required {required}")]
    InsufficientFunds {
        pool: String,
        available: Decimal,
        required: Decimal,
    },

    #[error("Picker number {number} is already taken in collection {collection}")]
    DuplicatePicker { collection: String, number: u32 },

    #[error("Harvest collection {0} is closed")]
    CollectionClosed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project not initialized. Run 'furrow init' first.")]
    NotInitialized,

    #[error("Project already initialized at {0}")]
    AlreadyInitialized(String),
}

impl FurrowError {
    pub fn not_found(collection: impl ToString, id: impl Into<String>) -> Self {
        FurrowError::NotFound {
            collection: collection.to_string(),
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FurrowError>;
