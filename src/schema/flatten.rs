//! Schema tree -> ordered list of addressable field paths.
//!
//! Walk is depth-first in declaration order. Array boundaries add no path
//! segment; arrays of scalars are not addressable and contribute nothing.
//! Exact-match leaves get a literal `.exact` suffix.

use crate::schema::node::{FieldPath, SchemaNode};

/// Flatten a property list (usually the root's) into field paths.
pub fn flatten(properties: &[(String, SchemaNode)]) -> Vec<FieldPath> {
    let mut out = Vec::new();
    walk_properties(properties, "", &mut out);
    out
}

/// Flatten a whole parsed schema.
pub fn flatten_root(root: &SchemaNode) -> Vec<FieldPath> {
    let mut out = Vec::new();
    walk_node(root, "", &mut out);
    out
}

fn walk_properties(properties: &[(String, SchemaNode)], prefix: &str, out: &mut Vec<FieldPath>) {
    for (name, child) in properties {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        walk_node(child, &path, out);
    }
}

fn walk_node(node: &SchemaNode, path: &str, out: &mut Vec<FieldPath>) {
    match node {
        SchemaNode::Leaf { is_exact: true } => out.push(format!("{}.exact", path)),
        SchemaNode::Leaf { is_exact: false } => out.push(path.to_string()),
        // Objects, and arrays of objects under the array's own prefix;
        // arrays of scalars have no properties and are skipped.
        SchemaNode::Object { .. } | SchemaNode::Array { .. } => {
            if let Some(properties) = node.properties() {
                walk_properties(properties, path, out);
            }
        }
    }
}
