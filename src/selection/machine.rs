//! Selection state machine.
//!
//! Transitions return the UI effects to apply instead of touching widgets.
//! Choosing a dataset hands back a `SchemaRequest`; the caller fetches the
//! schema however it likes and feeds the outcome to `complete_schema_fetch`.
//! Only the response for the latest request is published, so a slow fetch
//! for a dataset the user already moved away from is dropped.

use crate::catalog::CategoryCatalog;
use crate::error::{
    DatasetFetchCause, DatasetFetchError, FetchError, InvalidSelectionError, TransitionError,
};
use crate::query::QueryBuilder;
use crate::schema::{self, FieldPath};
use crate::selection::state::{Selection, SelectionState};

use tracing::{debug, info, warn};

/// Identifies one schema fetch. Tickets are never reused within a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// Work the caller must do after `choose_dataset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRequest {
    pub ticket: FetchTicket,
    pub category: String,
    pub dataset: String,
    pub schema_location: String,
}

/// Outcome of a schema fetch, addressed by ticket.
#[derive(Debug)]
pub struct SchemaResponse {
    pub ticket: FetchTicket,
    pub outcome: Result<String, FetchError>,
}

/// What the option controls should display after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ReplaceDatasetOptions(Vec<String>),
    ReplaceFieldOptions(Vec<FieldPath>),
}

#[derive(Debug, Clone)]
pub struct SelectionMachine {
    catalog: CategoryCatalog,
    selection: Selection,
    field_options: Vec<FieldPath>,
    next_ticket: u64,
    pending: Option<FetchTicket>,
}

impl SelectionMachine {
    pub fn new(catalog: CategoryCatalog) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
            field_options: Vec::new(),
            next_ticket: 0,
            pending: None,
        }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> SelectionState {
        self.selection.state()
    }

    /// Field paths published for the current dataset (empty until its fetch lands).
    pub fn field_options(&self) -> &[FieldPath] {
        &self.field_options
    }

    /// Ticket of the schema fetch whose result would still be accepted.
    pub fn pending(&self) -> Option<FetchTicket> {
        self.pending
    }

    /// Choose a category. Dataset, field and field options are always reset,
    /// even when `name` is the category already chosen.
    pub fn choose_category(&mut self, name: &str) -> Result<Vec<Effect>, TransitionError> {
        let datasets = self
            .catalog
            .dataset_names(name)
            .ok_or_else(|| TransitionError::UnknownCategory(name.to_string()))?;

        self.selection = Selection {
            category: Some(name.to_string()),
            dataset: None,
            field: None,
        };
        self.field_options.clear();
        self.pending = None;
        debug!(category = name, "category chosen");

        Ok(vec![
            Effect::ReplaceDatasetOptions(datasets),
            Effect::ReplaceFieldOptions(Vec::new()),
        ])
    }

    /// Choose a dataset of the current category. The choice is accepted right
    /// away; field options stay empty until the returned request completes.
    pub fn choose_dataset(
        &mut self,
        display_name: &str,
    ) -> Result<(SchemaRequest, Vec<Effect>), TransitionError> {
        let category = self
            .selection
            .category
            .clone()
            .ok_or(TransitionError::NoCategory)?;
        let entry = self
            .catalog
            .dataset(&category, display_name)
            .ok_or_else(|| TransitionError::UnknownDataset {
                category: category.clone(),
                dataset: display_name.to_string(),
            })?;
        let schema_location = entry.schema_location.clone();

        self.selection.dataset = Some(display_name.to_string());
        self.selection.field = None;
        self.field_options.clear();

        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        debug!(
            category = %category,
            dataset = display_name,
            location = %schema_location,
            ticket = ticket.0,
            "dataset chosen, schema fetch requested"
        );

        let request = SchemaRequest {
            ticket,
            category,
            dataset: display_name.to_string(),
            schema_location,
        };
        Ok((request, vec![Effect::ReplaceFieldOptions(Vec::new())]))
    }

    /// Apply a finished schema fetch.
    ///
    /// Returns `Ok(None)` when the response belongs to a superseded request.
    /// On fetch or parse failure the field options stay empty and the error
    /// is returned; choosing the dataset again retries.
    pub fn complete_schema_fetch(
        &mut self,
        response: SchemaResponse,
    ) -> Result<Option<Vec<Effect>>, DatasetFetchError> {
        if self.pending != Some(response.ticket) {
            debug!(ticket = response.ticket.0, "discarding stale schema response");
            return Ok(None);
        }
        self.pending = None;

        let dataset = self.selection.dataset.clone().unwrap_or_default();
        let fields = response
            .outcome
            .map_err(DatasetFetchCause::from)
            .and_then(|text| schema::parse(&text).map_err(DatasetFetchCause::from))
            .map(|root| schema::flatten_root(&root));

        match fields {
            Ok(fields) => {
                info!(dataset = %dataset, fields = fields.len(), "field options published");
                self.field_options = fields.clone();
                Ok(Some(vec![Effect::ReplaceFieldOptions(fields)]))
            }
            Err(cause) => {
                warn!(dataset = %dataset, error = %cause, "could not load field options");
                self.field_options.clear();
                Err(DatasetFetchError { dataset, cause })
            }
        }
    }

    /// Choose one of the published field paths.
    pub fn choose_field(&mut self, field_path: &str) -> Result<Vec<Effect>, TransitionError> {
        let dataset = self
            .selection
            .dataset
            .as_deref()
            .ok_or(TransitionError::NoDataset)?;
        if !self.field_options.iter().any(|f| f == field_path) {
            return Err(TransitionError::UnknownField {
                dataset: dataset.to_string(),
                field: field_path.to_string(),
            });
        }

        self.selection.field = Some(field_path.to_string());
        debug!(field = field_path, "field chosen");
        Ok(Vec::new())
    }

    /// Locator for the current selection against the default API root.
    pub fn build_query(&self) -> Result<String, InvalidSelectionError> {
        QueryBuilder::default().build(&self.selection, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EVENT_SCHEMA: &str = r#"
properties:
  patient:
    type: object
    properties:
      reaction:
        type: array
        items:
          type: object
          properties:
            reactionmeddrapt: {type: string, is_exact: true}
      patientsex: {type: string}
"#;

    fn machine() -> SelectionMachine {
        SelectionMachine::new(CategoryCatalog::openfda())
    }

    fn ok(ticket: FetchTicket, text: &str) -> SchemaResponse {
        SchemaResponse {
            ticket,
            outcome: Ok(text.to_string()),
        }
    }

    fn fields(paths: &[&str]) -> Vec<FieldPath> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn full_walk_reaches_field_chosen() {
        let mut m = machine();
        assert_eq!(m.state(), SelectionState::Empty);

        let effects = m.choose_category("Drug").unwrap();
        assert_eq!(
            effects[0],
            Effect::ReplaceDatasetOptions(
                ["Adverse Effects", "Product Labeling", "NDC Directory", "Recall Reports", "FDA Drugs"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            )
        );
        assert_eq!(m.state(), SelectionState::CategoryChosen);

        let (req, _) = m.choose_dataset("Adverse Effects").unwrap();
        assert_eq!(req.schema_location, "fieldData/drugEvent.yaml");
        assert_eq!(m.state(), SelectionState::DatasetChosen);
        assert!(m.field_options().is_empty());

        let effects = m.complete_schema_fetch(ok(req.ticket, EVENT_SCHEMA)).unwrap();
        let expected = fields(&["patient.reaction.reactionmeddrapt.exact", "patient.patientsex"]);
        assert_eq!(effects, Some(vec![Effect::ReplaceFieldOptions(expected.clone())]));
        assert_eq!(m.field_options(), expected.as_slice());
        assert_eq!(m.pending(), None);

        m.choose_field("patient.patientsex").unwrap();
        assert_eq!(m.state(), SelectionState::FieldChosen);
        assert_eq!(
            m.build_query().unwrap(),
            "https://api.fda.gov/drug/event.json?count=patient.patientsex"
        );
    }

    #[test]
    fn choosing_a_category_resets_downstream_even_when_unchanged() {
        let mut m = machine();
        m.choose_category("Drug").unwrap();
        let (req, _) = m.choose_dataset("Adverse Effects").unwrap();
        m.complete_schema_fetch(ok(req.ticket, EVENT_SCHEMA)).unwrap();
        m.choose_field("patient.patientsex").unwrap();

        m.choose_category("Drug").unwrap();
        assert_eq!(m.selection().category(), Some("Drug"));
        assert_eq!(m.selection().dataset(), None);
        assert_eq!(m.selection().field(), None);
        assert!(m.field_options().is_empty());
        assert_eq!(m.state(), SelectionState::CategoryChosen);
    }

    #[test]
    fn choosing_a_dataset_clears_the_field() {
        let mut m = machine();
        m.choose_category("Drug").unwrap();
        let (req, _) = m.choose_dataset("Adverse Effects").unwrap();
        m.complete_schema_fetch(ok(req.ticket, EVENT_SCHEMA)).unwrap();
        m.choose_field("patient.patientsex").unwrap();

        let (_, effects) = m.choose_dataset("Adverse Effects").unwrap();
        assert_eq!(effects, vec![Effect::ReplaceFieldOptions(Vec::new())]);
        assert_eq!(m.selection().field(), None);
        assert_eq!(m.state(), SelectionState::DatasetChosen);
    }

    #[test]
    fn stale_schema_response_is_discarded() {
        let mut m = machine();
        m.choose_category("Drug").unwrap();
        let (first, _) = m.choose_dataset("Adverse Effects").unwrap();
        let (second, _) = m.choose_dataset("Product Labeling").unwrap();
        assert_ne!(first.ticket, second.ticket);

        let label_schema = "properties:\n  openfda:\n    properties:\n      route: {type: string, is_exact: true}\n";
        m.complete_schema_fetch(ok(second.ticket, label_schema)).unwrap();
        let late = m.complete_schema_fetch(ok(first.ticket, EVENT_SCHEMA)).unwrap();

        assert_eq!(late, None);
        assert_eq!(m.field_options(), fields(&["openfda.route.exact"]).as_slice());
        assert_eq!(m.selection().dataset(), Some("Product Labeling"));
    }

    #[test]
    fn stale_response_arriving_first_is_also_discarded() {
        let mut m = machine();
        m.choose_category("Drug").unwrap();
        let (first, _) = m.choose_dataset("Adverse Effects").unwrap();
        let (second, _) = m.choose_dataset("NDC Directory").unwrap();

        assert_eq!(m.complete_schema_fetch(ok(first.ticket, EVENT_SCHEMA)).unwrap(), None);
        assert!(m.field_options().is_empty());
        assert_eq!(m.pending(), Some(second.ticket));
    }

    #[test]
    fn category_change_invalidates_outstanding_fetch() {
        let mut m = machine();
        m.choose_category("Drug").unwrap();
        let (req, _) = m.choose_dataset("Adverse Effects").unwrap();
        m.choose_category("Food").unwrap();

        assert_eq!(m.complete_schema_fetch(ok(req.ticket, EVENT_SCHEMA)).unwrap(), None);
        assert!(m.field_options().is_empty());
    }

    #[test]
    fn parse_failure_surfaces_and_leaves_options_empty() {
        let mut m = machine();
        m.choose_category("Drug").unwrap();
        let (req, _) = m.choose_dataset("Adverse Effects").unwrap();

        let err = m
            .complete_schema_fetch(ok(req.ticket, "properties:\n  a: {type: object}\n"))
            .unwrap_err();
        assert_eq!(err.dataset, "Adverse Effects");
        assert!(matches!(err.cause, DatasetFetchCause::Parse(_)));
        assert!(m.field_options().is_empty());
        assert_eq!(m.state(), SelectionState::DatasetChosen);

        // Retry by choosing the dataset again.
        let (retry, _) = m.choose_dataset("Adverse Effects").unwrap();
        m.complete_schema_fetch(ok(retry.ticket, EVENT_SCHEMA)).unwrap();
        assert_eq!(m.field_options().len(), 2);
    }

    #[test]
    fn fetch_failure_surfaces() {
        let mut m = machine();
        m.choose_category("Food").unwrap();
        let (req, _) = m.choose_dataset("Recall Reports").unwrap();
        let err = m
            .complete_schema_fetch(SchemaResponse {
                ticket: req.ticket,
                outcome: Err(FetchError::Unavailable {
                    locator: req.schema_location.clone(),
                    reason: "offline".to_string(),
                }),
            })
            .unwrap_err();
        assert!(matches!(err.cause, DatasetFetchCause::Fetch(_)));
        assert!(m.field_options().is_empty());
    }

    #[test]
    fn rejected_transitions_leave_state_untouched() {
        let mut m = machine();
        assert_eq!(m.choose_dataset("Adverse Effects").unwrap_err(), TransitionError::NoCategory);
        assert_eq!(m.choose_field("x").unwrap_err(), TransitionError::NoDataset);
        assert_eq!(
            m.choose_category("Cosmetics").unwrap_err(),
            TransitionError::UnknownCategory("Cosmetics".to_string())
        );
        assert_eq!(m.state(), SelectionState::Empty);

        m.choose_category("Food").unwrap();
        let before = m.selection().clone();
        assert!(matches!(
            m.choose_dataset("510k").unwrap_err(),
            TransitionError::UnknownDataset { .. }
        ));
        assert_eq!(m.selection(), &before);
        assert_eq!(m.pending(), None);

        let (req, _) = m.choose_dataset("Adverse Effects").unwrap();
        // Options not published yet: nothing is choosable.
        assert!(matches!(
            m.choose_field("products.role").unwrap_err(),
            TransitionError::UnknownField { .. }
        ));
        m.complete_schema_fetch(ok(req.ticket, "properties:\n  outcomes: {type: string}\n"))
            .unwrap();
        assert!(m.choose_field("products.role").is_err());
        assert_eq!(m.state(), SelectionState::DatasetChosen);
    }

    #[test]
    fn query_needs_field_chosen() {
        let mut m = machine();
        assert_eq!(
            m.build_query().unwrap_err(),
            InvalidSelectionError::Incomplete(SelectionState::Empty)
        );
        m.choose_category("Drug").unwrap();
        m.choose_dataset("Adverse Effects").unwrap();
        assert_eq!(
            m.build_query().unwrap_err(),
            InvalidSelectionError::Incomplete(SelectionState::DatasetChosen)
        );
    }
}
