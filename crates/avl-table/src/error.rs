//! Errors reported by [`AvlTable`](crate::AvlTable) and [`TableConfig`](crate::TableConfig).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    /// A metadata accessor was called with a key that has no node.
    #[error("key not present in table")]
    KeyNotPresent,
    #[error("invalid table config: {0}")]
    InvalidConfig(String),
    #[error("failed to parse table config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
