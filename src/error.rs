//! Typed library errors.
//!
//! Loader and CLI code uses `anyhow` on top of these; the state machine and
//! the schema layer only ever return the enums below.

use crate::selection::SelectionState;
use thiserror::Error;

/// Malformed schema text. `path` is the dotted location of the offending node
/// (`<root>` for the document itself).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema parse error at {path}: {reason}")]
pub struct SchemaParseError {
    pub path: String,
    pub reason: String,
}

impl SchemaParseError {
    pub fn new(path: &str, reason: impl Into<String>) -> Self {
        let path = if path.is_empty() { "<root>" } else { path };
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Transport failure from a `Fetcher`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {locator}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{locator} is unavailable: {reason}")]
    Unavailable { locator: String, reason: String },
}

/// Why a dataset's field list could not be produced.
#[derive(Debug, Error)]
pub enum DatasetFetchCause {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] SchemaParseError),
}

#[derive(Debug, Error)]
#[error("failed to load fields for dataset '{dataset}'")]
pub struct DatasetFetchError {
    pub dataset: String,
    #[source]
    pub cause: DatasetFetchCause,
}

/// The query builder was called with a selection that cannot produce a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelectionError {
    #[error("a query needs a chosen field, but the selection is {0}")]
    Incomplete(SelectionState),

    #[error("category '{0}' is not in the catalog")]
    UnknownCategory(String),

    #[error("dataset '{dataset}' is not in category '{category}'")]
    UnknownDataset { category: String, dataset: String },
}

/// A rejected selection transition. The selection is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("choose a category before choosing a dataset")]
    NoCategory,

    #[error("dataset '{dataset}' is not in category '{category}'")]
    UnknownDataset { category: String, dataset: String },

    #[error("choose a dataset before choosing a field")]
    NoDataset,

    #[error("field '{field}' is not available for dataset '{dataset}'")]
    UnknownField { dataset: String, field: String },
}
