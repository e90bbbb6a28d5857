use std::collections::BTreeMap;

use serde_json::Value;

/// One node of a backend UI tree.
///
/// Backends hand back maps and lists nested in any order, so the shape is
/// decided once here and traversal dispatches on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotNode {
    /// A node with an attribute map and ordered children
    Map {
        attributes: BTreeMap<String, String>,
        children: Vec<SnapshotNode>,
    },

    /// A bare list of nodes
    Sequence(Vec<SnapshotNode>),

    /// Anything else (numbers, strings, nulls); carries no elements
    Leaf,
}

impl SnapshotNode {
    /// Attribute value on a `Map` node.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match self {
            SnapshotNode::Map { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }
}

impl From<&Value> for SnapshotNode {
    fn from(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                // Only textual attribute values are kept: `clickable` must be
                // the string "true", not a JSON boolean.
                let attributes = match map.get("attributes") {
                    Some(Value::Object(attrs)) => attrs
                        .iter()
                        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                        .collect(),
                    _ => BTreeMap::new(),
                };

                let children = match map.get("children") {
                    Some(Value::Array(items)) => items.iter().map(SnapshotNode::from).collect(),
                    _ => Vec::new(),
                };

                SnapshotNode::Map {
                    attributes,
                    children,
                }
            }
            Value::Array(items) => {
                SnapshotNode::Sequence(items.iter().map(SnapshotNode::from).collect())
            }
            _ => SnapshotNode::Leaf,
        }
    }
}

impl From<Value> for SnapshotNode {
    fn from(value: Value) -> Self {
        SnapshotNode::from(&value)
    }
}
