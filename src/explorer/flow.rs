use serde::{Deserialize, Serialize};

use crate::snapshot::element::Element;
use crate::state::identity::ElementIdentity;

/// One observed transition: `action` on `from_screen` led to `to_screen`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub from_screen: String,
    pub to_screen: String,
    pub action: ElementIdentity,
    pub depth: usize,

    /// The element that was activated, kept to rebuild its locator
    pub element: Element,
}

/// Append-only log of transitions.
///
/// No deduplication here; the frontier already guarantees each action
/// identity is attempted once per run.
#[derive(Debug, Clone, Default)]
pub struct FlowRecorder {
    records: Vec<FlowRecord>,
}

impl FlowRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        from_screen: &str,
        to_screen: &str,
        action: ElementIdentity,
        depth: usize,
        element: Element,
    ) {
        self.records.push(FlowRecord {
            from_screen: from_screen.to_string(),
            to_screen: to_screen.to_string(),
            action,
            depth,
            element,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn into_records(self) -> Vec<FlowRecord> {
        self.records
    }
}
