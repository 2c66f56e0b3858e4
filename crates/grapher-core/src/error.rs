// File: crates/grapher-core/src/error.rs
// Summary: Error taxonomy for configuration, derivation and host/environment failures.

use thiserror::Error;

/// Malformed initial or partial configuration. Never leaves partial state behind.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("`data` must be an ordered sequence of mappings, found {found}")]
    InvalidData { found: &'static str },

    #[error("`data[{index}]` must be a mapping, found {found}")]
    InvalidRow { index: usize, found: &'static str },

    #[error("partial configuration must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    #[error("unknown configuration key `{path}`")]
    UnknownKey { path: String },

    #[error("unknown chart kind `{0}`")]
    UnknownKind(String),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("configuration store is not initialized")]
    NotInitialized,

    #[error("configuration store is already initialized")]
    AlreadyInitialized,
}

/// Derived state could not be computed from the canonical configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("category field `{0}` is not present in any data row")]
    MissingCategoryField(String),

    #[error("stacked charts require `category.name` to be set")]
    StackWithoutCategory,

    #[error("chart state has not been derived yet")]
    NotDerived,
}

/// Everything `Chart` can surface to its caller.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error("container element `{0}` not found")]
    ElementNotFound(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;

/// Short JSON type name used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "a mapping",
    }
}
