use serde::{Deserialize, Serialize};

/// An interactable node observed in one snapshot.
///
/// Elements are rebuilt from every snapshot and never carried across
/// screens by reference; only their derived identity outlives the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Primary visible label (`text` attribute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,

    /// Label exposed to assistive tooling (`accessibilityText` attribute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_label: Option<String>,

    /// Stable platform identifier (`resource-id` attribute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// Raw geometry, e.g. `[0,100][200,180]`
    #[serde(default)]
    pub bounds: String,

    /// Backend element type, diagnostic only
    #[serde(default)]
    pub node_class: String,

    /// Position in the snapshot tree at capture time, diagnostic only
    #[serde(default)]
    pub path: String,
}

impl Element {
    pub fn display_text(&self) -> Option<&str> {
        non_empty(self.display_text.as_deref())
    }

    pub fn accessibility_label(&self) -> Option<&str> {
        non_empty(self.accessibility_label.as_deref())
    }

    pub fn resource_id(&self) -> Option<&str> {
        non_empty(self.resource_id.as_deref())
    }
}

/// Trimmed value, or `None` when missing or blank.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
