use std::fmt;

/// Current choices. The populated prefix of (category, dataset, field)
/// decides the `SelectionState`; only `SelectionMachine` mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub(crate) category: Option<String>,
    pub(crate) dataset: Option<String>,
    pub(crate) field: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SelectionState {
    Empty,
    CategoryChosen,
    DatasetChosen,
    FieldChosen,
}

impl Selection {
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn state(&self) -> SelectionState {
        match (&self.category, &self.dataset, &self.field) {
            (None, _, _) => SelectionState::Empty,
            (Some(_), None, _) => SelectionState::CategoryChosen,
            (Some(_), Some(_), None) => SelectionState::DatasetChosen,
            (Some(_), Some(_), Some(_)) => SelectionState::FieldChosen,
        }
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SelectionState::Empty => "empty",
            SelectionState::CategoryChosen => "category chosen",
            SelectionState::DatasetChosen => "dataset chosen",
            SelectionState::FieldChosen => "field chosen",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(c: Option<&str>, d: Option<&str>, f: Option<&str>) -> Selection {
        Selection {
            category: c.map(str::to_string),
            dataset: d.map(str::to_string),
            field: f.map(str::to_string),
        }
    }

    #[test]
    fn state_follows_populated_prefix() {
        assert_eq!(Selection::default().state(), SelectionState::Empty);
        assert_eq!(sel(Some("Drug"), None, None).state(), SelectionState::CategoryChosen);
        assert_eq!(
            sel(Some("Drug"), Some("Adverse Effects"), None).state(),
            SelectionState::DatasetChosen
        );
        assert_eq!(
            sel(Some("Drug"), Some("Adverse Effects"), Some("x")).state(),
            SelectionState::FieldChosen
        );
        // A gap in the prefix stops it.
        assert_eq!(sel(None, Some("d"), Some("f")).state(), SelectionState::Empty);
        assert_eq!(sel(Some("c"), None, Some("f")).state(), SelectionState::CategoryChosen);
    }
}
