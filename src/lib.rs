//! fieldscope: build openFDA-style count queries through a cascading
//! category -> dataset -> field selection.
//!
//! Layers, leaf-first:
//! - `schema`: parse field-schema text and flatten it into dotted field paths
//! - `catalog`: static category/dataset configuration
//! - `selection`: the cascading selection state machine
//! - `query`: deterministic query locator construction
//! - `fetch`, `results`, `render`: collaborators at the edges (schema
//!   retrieval, query-result parsing, bar chart output)

pub mod catalog;
pub mod error;
pub mod fetch;
pub mod query;
pub mod render;
pub mod results;
pub mod schema;
pub mod selection;

pub use catalog::{CategoryCatalog, DatasetEntry};
pub use error::{
    DatasetFetchCause, DatasetFetchError, FetchError, InvalidSelectionError, SchemaParseError,
    TransitionError,
};
pub use query::QueryBuilder;
pub use schema::{FieldPath, SchemaNode};
pub use selection::{Effect, Selection, SelectionMachine, SelectionState};

pub type Result<T> = anyhow::Result<T>;
