use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::driver::Platform;
use crate::explorer::flow::FlowRecord;
use crate::explorer::frontier::Frontier;
use crate::state::state_model::ScreenState;

// ============================================================================
// Explorer configuration
// ============================================================================

/// Configuration for one exploration run.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    /// Application package / bundle id
    pub app_id: String,

    pub platform: Platform,

    /// Deepest traversal level to observe; 0 explores only the start
    /// screen's direct transitions
    pub max_depth: usize,

    /// Blocking wait after a successful activation
    pub settle: Duration,

    /// Blocking wait after a back navigation
    pub back_settle: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            platform: Platform::Android,
            max_depth: 3,
            settle: Duration::from_millis(2000),
            back_settle: Duration::from_millis(1000),
        }
    }
}

// ============================================================================
// Finished run
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Traversal ran until every branch was exhausted or depth-bounded
    Completed,

    /// Operator interrupt stopped the traversal early
    Cancelled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Everything an exploration run observed.
///
/// Consumed by the script generator and the console summary. Carries its
/// own start time so generating artifacts twice yields identical bytes.
#[derive(Debug, Clone)]
pub struct ExplorationRun {
    pub app_id: String,
    pub platform: Platform,
    pub max_depth: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub outcome: RunOutcome,
    pub screens: Vec<ScreenState>,
    pub flows: Vec<FlowRecord>,
    pub frontier: Frontier,
    pub screenshots_dir: String,
}

impl ExplorationRun {
    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    pub fn interaction_count(&self) -> usize {
        self.flows.len()
    }
}
