//! Schema text (YAML, which also covers JSON) into a `SchemaNode` tree.
//!
//! Expected shape, as used by the openFDA field definition files:
//!
//! ```yaml
//! type: object
//! properties:
//!   patient:
//!     type: object
//!     properties:
//!       reaction:
//!         type: array
//!         items:
//!           type: object
//!           properties:
//!             reactionmeddrapt:
//!               type: string
//!               is_exact: true
//! ```

use crate::error::SchemaParseError;
use crate::schema::node::{Properties, SchemaNode};
use serde_yaml::{Mapping, Value};

/// Parse a schema document. The returned root is always an `Object`.
pub fn parse(raw_text: &str) -> Result<SchemaNode, SchemaParseError> {
    let doc: Value = serde_yaml::from_str(raw_text)
        .map_err(|e| SchemaParseError::new("", format!("not a nested mapping: {}", e)))?;

    let root = match &doc {
        Value::Mapping(m) => m,
        other => {
            return Err(SchemaParseError::new(
                "",
                format!("document must be a mapping, found {}", kind_name(other)),
            ));
        }
    };

    match type_of(root, "")? {
        None | Some("object") => {}
        Some(other) => {
            return Err(SchemaParseError::new(
                "",
                format!("root must be an object, found type '{}'", other),
            ));
        }
    }

    let properties = root
        .get("properties")
        .ok_or_else(|| SchemaParseError::new("", "root has no 'properties' mapping"))?;

    Ok(SchemaNode::Object {
        properties: parse_properties(properties, "")?,
    })
}

fn parse_properties(value: &Value, path: &str) -> Result<Properties, SchemaParseError> {
    let map = match value {
        Value::Mapping(m) => m,
        other => {
            return Err(SchemaParseError::new(
                path,
                format!("'properties' must be a mapping, found {}", kind_name(other)),
            ));
        }
    };

    let mut out = Properties::with_capacity(map.len());
    for (key, child) in map {
        let name = property_name(key, path)?;
        let child_path = join(path, &name);
        let node = parse_node(child, &child_path)?;
        out.push((name, node));
    }
    Ok(out)
}

fn parse_node(value: &Value, path: &str) -> Result<SchemaNode, SchemaParseError> {
    let map = match value {
        Value::Mapping(m) => m,
        other => {
            return Err(SchemaParseError::new(
                path,
                format!("node must be a mapping, found {}", kind_name(other)),
            ));
        }
    };

    match (type_of(map, path)?, map.get("properties")) {
        // Untyped nodes that carry properties are objects (common for array items).
        (Some("object"), Some(properties)) | (None, Some(properties)) => Ok(SchemaNode::Object {
            properties: parse_properties(properties, path)?,
        }),
        (Some("object"), None) => Err(SchemaParseError::new(
            path,
            "type 'object' without a 'properties' mapping",
        )),
        (Some("array"), _) => {
            let items = map
                .get("items")
                .ok_or_else(|| SchemaParseError::new(path, "type 'array' without 'items'"))?;
            // Non-mapping items (`items: string`, `items: [..]`) describe scalars.
            let items = match items {
                Value::Mapping(_) => parse_node(items, path)?,
                _ => SchemaNode::leaf(),
            };
            Ok(SchemaNode::Array {
                items: Box::new(items),
            })
        }
        _ => Ok(SchemaNode::Leaf {
            is_exact: is_exact(map, path)?,
        }),
    }
}

fn type_of<'a>(map: &'a Mapping, path: &str) -> Result<Option<&'a str>, SchemaParseError> {
    match map.get("type") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(SchemaParseError::new(
            path,
            format!("'type' must be a string, found {}", kind_name(other)),
        )),
    }
}

fn is_exact(map: &Mapping, path: &str) -> Result<bool, SchemaParseError> {
    match map.get("is_exact") {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        Some(other) => Err(SchemaParseError::new(
            path,
            format!("'is_exact' must be a boolean, found {}", kind_name(other)),
        )),
    }
}

/// YAML keys like `2020:` or `true:` are scalars; use their text.
fn property_name(key: &Value, path: &str) -> Result<String, SchemaParseError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(SchemaParseError::new(
            path,
            format!("property name must be a scalar, found {}", kind_name(other)),
        )),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
