/// Dotted path from the schema root to a leaf, e.g. `patient.drug.openfda.brand_name.exact`.
pub type FieldPath = String;

/// Child nodes in declaration order.
pub type Properties = Vec<(String, SchemaNode)>;

/// One element of a field schema.
///
/// The tree is owned top-down, so it is acyclic by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object { properties: Properties },
    /// `items` is an `Object` when the array holds records, anything else
    /// for arrays of scalars.
    Array { items: Box<SchemaNode> },
    Leaf { is_exact: bool },
}

impl SchemaNode {
    pub fn leaf() -> Self {
        SchemaNode::Leaf { is_exact: false }
    }

    pub fn exact_leaf() -> Self {
        SchemaNode::Leaf { is_exact: true }
    }

    /// Nested properties for objects, and for arrays whose items are objects.
    pub fn properties(&self) -> Option<&Properties> {
        match self {
            SchemaNode::Object { properties } => Some(properties),
            SchemaNode::Array { items } => match items.as_ref() {
                SchemaNode::Object { properties } => Some(properties),
                _ => None,
            },
            SchemaNode::Leaf { .. } => None,
        }
    }
}
