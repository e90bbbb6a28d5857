use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::element::Element;

/// Deduplication key for an element, e.g. `text:Settings` or `id:btn_ok`.
///
/// Equal identities name the same action target on every screen: the
/// explorer deduplicates globally, not per screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementIdentity(String);

impl ElementIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementIdentity {
    fn from(value: &str) -> Self {
        ElementIdentity(value.to_string())
    }
}

/// Derive the identity of an element from its most specific descriptor.
///
/// Priority: display text, accessibility label, resource id, then raw
/// bounds. Labels are trimmed and ignored when blank; bounds are used
/// verbatim, so an element with nothing at all maps to `bounds:`.
pub fn identify(element: &Element) -> ElementIdentity {
    let key = if let Some(text) = element.display_text() {
        format!("text:{}", text)
    } else if let Some(acc) = element.accessibility_label() {
        format!("acc:{}", acc)
    } else if let Some(id) = element.resource_id() {
        format!("id:{}", id)
    } else {
        format!("bounds:{}", element.bounds)
    };
    ElementIdentity(key)
}
