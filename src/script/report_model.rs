use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::driver::Platform;
use crate::explorer::flow::FlowRecord;
use crate::explorer::run_model::{ExplorationRun, RunOutcome};
use crate::state::identity::ElementIdentity;
use crate::state::state_model::ScreenState;

// ============================================================================
// Exploration report: machine-readable companion of the generated script
// ============================================================================

/// Structured summary of a run, written as `exploration_report.json`.
///
/// Holds the full screen and flow logs, so a saved report is enough to
/// rebuild the run and regenerate its script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorationReport {
    /// Start of the run
    pub timestamp: DateTime<Utc>,

    pub app_id: String,
    pub platform: Platform,
    pub max_depth: usize,
    pub outcome: RunOutcome,
    pub elapsed_ms: u64,

    pub total_screens: usize,
    pub total_interactions: usize,

    /// Frontier contents in the order identities were attempted
    pub visited_elements: Vec<ElementIdentity>,

    pub screens: Vec<ScreenState>,
    pub flows: Vec<FlowRecord>,
    pub screenshots_dir: String,
}

impl ExplorationReport {
    pub fn from_run(run: &ExplorationRun) -> Self {
        Self {
            timestamp: run.started_at,
            app_id: run.app_id.clone(),
            platform: run.platform,
            max_depth: run.max_depth,
            outcome: run.outcome,
            elapsed_ms: run.elapsed_ms,
            total_screens: run.screen_count(),
            total_interactions: run.interaction_count(),
            visited_elements: run.frontier.identities().to_vec(),
            screens: run.screens.clone(),
            flows: run.flows.clone(),
            screenshots_dir: run.screenshots_dir.clone(),
        }
    }

    /// Rebuild the run this report was generated from.
    pub fn into_run(self) -> ExplorationRun {
        ExplorationRun {
            app_id: self.app_id,
            platform: self.platform,
            max_depth: self.max_depth,
            started_at: self.timestamp,
            elapsed_ms: self.elapsed_ms,
            outcome: self.outcome,
            screens: self.screens,
            flows: self.flows,
            frontier: self.visited_elements.into_iter().collect(),
            screenshots_dir: self.screenshots_dir,
        }
    }
}
