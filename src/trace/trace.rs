use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// What happened at one explorer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    ScreenObserved,
    ActivationAttempted,
    FlowRecorded,
    BackNavigation,
    Fault,
    Cancelled,
}

/// One JSONL line of the exploration trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,
    pub depth: usize,

    pub kind: TraceKind,

    pub screen: Option<String>,
    pub identity: Option<String>,

    /// Fault kind, e.g. `activation_failed`
    pub fault: Option<String>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, depth: usize, kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            step,
            depth,
            kind,
            screen: None,
            identity: None,
            fault: None,
            detail: None,
        }
    }

    pub fn with_screen(mut self, screen: &str) -> Self {
        self.screen = Some(screen.to_string());
        self
    }

    pub fn with_identity(mut self, identity: impl ToString) -> Self {
        self.identity = Some(identity.to_string());
        self
    }

    pub fn with_fault(mut self, fault: &str) -> Self {
        self.fault = Some(fault.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
