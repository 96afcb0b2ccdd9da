//! Field schemas: parsing and flattening into addressable field paths.

pub mod flatten;
pub mod node;
pub mod parse;

pub use flatten::{flatten, flatten_root};
pub use node::{FieldPath, Properties, SchemaNode};
pub use parse::parse;
