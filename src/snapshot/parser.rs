use serde_json::Value;

use crate::error::SnapshotError;
use crate::snapshot::element::Element;
use crate::snapshot::node::SnapshotNode;

// ============================================================================
// Raw backend output -> SnapshotNode
// ============================================================================

/// Decode the textual output of a hierarchy dump into a tree.
///
/// Backends print status lines (e.g. "Running on emulator-5554") before the
/// JSON document, so everything ahead of the first line starting with `{`
/// is dropped.
pub fn decode_snapshot(raw: &str) -> Result<SnapshotNode, SnapshotError> {
    if raw.trim().is_empty() {
        return Err(SnapshotError::Empty);
    }

    let mut offset = 0;
    let mut start = None;
    for line in raw.split_inclusive('\n') {
        if line.trim_start().starts_with('{') {
            start = Some(offset);
            break;
        }
        offset += line.len();
    }

    let start = start.ok_or(SnapshotError::NoStructuredContent)?;
    let value: Value = serde_json::from_str(&raw[start..])?;
    Ok(SnapshotNode::from(&value))
}

// ============================================================================
// SnapshotNode -> Elements
// ============================================================================

/// Collect every clickable element in pre-order.
pub fn collect_elements(root: &SnapshotNode) -> Vec<Element> {
    let mut elements = Vec::new();
    traverse(root, "", &mut elements);
    elements
}

fn traverse(node: &SnapshotNode, path: &str, out: &mut Vec<Element>) {
    match node {
        SnapshotNode::Map {
            attributes,
            children,
        } => {
            if attributes.get("clickable").map(String::as_str) == Some("true") {
                out.push(build_element(node, path));
            }
            for (i, child) in children.iter().enumerate() {
                traverse(child, &format!("{}/child[{}]", path, i), out);
            }
        }
        SnapshotNode::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                traverse(item, &format!("{}/item[{}]", path, i), out);
            }
        }
        SnapshotNode::Leaf => {}
    }
}

fn build_element(node: &SnapshotNode, path: &str) -> Element {
    let owned = |key: &str| node.attribute(key).map(str::to_string);

    Element {
        display_text: owned("text"),
        accessibility_label: owned("accessibilityText"),
        resource_id: owned("resource-id"),
        bounds: owned("bounds").unwrap_or_default(),
        node_class: owned("class").unwrap_or_default(),
        path: path.to_string(),
    }
}

/// Decode raw backend output and list its clickable elements.
pub fn parse(raw: &str) -> Result<Vec<Element>, SnapshotError> {
    let root = decode_snapshot(raw)?;
    Ok(collect_elements(&root))
}
