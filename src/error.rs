use std::process::ExitStatus;

use thiserror::Error;

/// Failure of a single Action Driver call.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Backend binary could not be started
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// Backend call exceeded its bounded timeout and was killed
    #[error("{program} timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    /// Backend exited with a non-zero status
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// Local file handling around a backend call failed
    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    /// Element exposes neither a label, an id nor bounds to tap on
    #[error("no usable locator for element {identity}")]
    NoLocator { identity: String },

    /// Scripted backends report this for targets they cannot resolve
    #[error("{0}")]
    Rejected(String),
}

/// The raw snapshot could not be turned into a UI tree.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot output was empty")]
    Empty,

    #[error("no structured content found in snapshot output")]
    NoStructuredContent,

    #[error("snapshot JSON decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Conditions the explorer handles at the point of occurrence.
///
/// None of these abort a run: each one turns into "skip this branch" or
/// "skip this element" and is logged and traced.
#[derive(Debug, Error)]
pub enum ExploreFault {
    #[error("snapshot unavailable: {0}")]
    SnapshotUnavailable(#[from] SnapshotError),

    #[error("observation failed: {0}")]
    ObservationFailed(#[source] DriverError),

    #[error("activation of {identity} failed: {source}")]
    ActivationFailed {
        identity: String,
        #[source]
        source: DriverError,
    },

    #[error("back navigation failed: {0}")]
    BackNavigationFailed(#[source] DriverError),
}

impl ExploreFault {
    /// Short stable name used in trace events.
    pub fn kind(&self) -> &'static str {
        match self {
            ExploreFault::SnapshotUnavailable(_) => "snapshot_unavailable",
            ExploreFault::ObservationFailed(_) => "observation_failed",
            ExploreFault::ActivationFailed { .. } => "activation_failed",
            ExploreFault::BackNavigationFailed(_) => "back_navigation_failed",
        }
    }
}
