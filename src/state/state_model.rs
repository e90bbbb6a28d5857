use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::snapshot::element::Element;
use crate::state::fingerprint::screen_fingerprint;
use crate::state::identity::identify;

/// One observation of the live application at a given traversal depth.
///
/// Appended once to the run's screen log and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenState {
    pub depth: usize,
    pub captured_at: DateTime<Utc>,

    /// Name of the screenshot taken for this observation
    pub screenshot_ref: String,

    /// File written by the driver, when the capture succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,

    /// Every interactable element of the snapshot, in backend order
    pub elements: Vec<Element>,

    pub fingerprint: String,
}

impl ScreenState {
    pub fn new(
        depth: usize,
        captured_at: DateTime<Utc>,
        screenshot_ref: String,
        artifact: Option<String>,
        elements: Vec<Element>,
    ) -> Self {
        let identities: Vec<_> = elements.iter().map(identify).collect();
        let fingerprint = screen_fingerprint(&identities);
        Self {
            depth,
            captured_at,
            screenshot_ref,
            artifact,
            elements,
            fingerprint,
        }
    }
}
