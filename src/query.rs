//! Query locator construction.
//!
//! `<api_root><category>/<query_token>.json?count=<field>`
//!
//! The aggregation mode is always `count`. Some openFDA datasets also support
//! `search`, but choosing per dataset is not part of the query policy here.

use crate::catalog::CategoryCatalog;
use crate::error::InvalidSelectionError;
use crate::selection::{Selection, SelectionState};

pub const OPENFDA_API_ROOT: &str = "https://api.fda.gov/";

/// Fixed aggregation-mode parameter.
pub const AGGREGATION_PARAM: &str = "count";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBuilder {
    api_root: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            api_root: OPENFDA_API_ROOT.to_string(),
        }
    }
}

impl QueryBuilder {
    /// Use another API root; it is normalised to end in exactly one `/`.
    pub fn with_api_root(api_root: &str) -> Self {
        Self {
            api_root: format!("{}/", api_root.trim_end_matches('/')),
        }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Compose the locator for a selection in `FieldChosen`.
    pub fn build(
        &self,
        selection: &Selection,
        catalog: &CategoryCatalog,
    ) -> Result<String, InvalidSelectionError> {
        let (category, dataset, field) =
            match (selection.category(), selection.dataset(), selection.field()) {
                (Some(c), Some(d), Some(f)) => (c, d, f),
                _ => return Err(InvalidSelectionError::Incomplete(selection.state())),
            };
        debug_assert_eq!(selection.state(), SelectionState::FieldChosen);

        if !catalog.contains_category(category) {
            return Err(InvalidSelectionError::UnknownCategory(category.to_string()));
        }
        let entry =
            catalog
                .dataset(category, dataset)
                .ok_or_else(|| InvalidSelectionError::UnknownDataset {
                    category: category.to_string(),
                    dataset: dataset.to_string(),
                })?;

        // openFDA endpoint segments are lower-case ("Drug" -> drug).
        Ok(format!(
            "{}{}/{}.json?{}={}",
            self.api_root,
            category.to_lowercase(),
            entry.query_token,
            AGGREGATION_PARAM,
            field
        ))
    }
}
