//! Cascading category -> dataset -> field selection.

pub mod machine;
pub mod state;

pub use machine::{Effect, FetchTicket, SchemaRequest, SchemaResponse, SelectionMachine};
pub use state::{Selection, SelectionState};
