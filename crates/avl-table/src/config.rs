//! Table configuration.

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// Lines per page used when no config is given.
pub const DEFAULT_LINES_PER_PAGE: u32 = 67;

/// Options recognised by [`AvlTable`](crate::AvlTable).
///
/// The JSON form uses camelCase keys; missing keys fall back to their
/// defaults.
///
/// ```
/// use avl_table::TableConfig;
///
/// let config = TableConfig::from_json(r#"{ "linesPerPage": 50 }"#).unwrap();
/// assert_eq!(config.lines_per_page, 50);
/// assert_eq!(config.page_of(120), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TableConfig {
    /// Page width in lines. Page numbers are `line / lines_per_page`.
    pub lines_per_page: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            lines_per_page: DEFAULT_LINES_PER_PAGE,
        }
    }
}

impl TableConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(input: &str) -> Result<Self, TableError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.lines_per_page == 0 {
            return Err(TableError::InvalidConfig(
                "linesPerPage must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Page holding `line`. Pages are 0-indexed.
    #[inline]
    pub fn page_of(&self, line: u32) -> u32 {
        line / self.lines_per_page
    }
}
