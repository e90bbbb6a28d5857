use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::locator::Locator;
use crate::error::DriverError;

pub mod locator;
pub mod maestro;
pub mod process;
pub mod scripted;

// ============================================================================
// ActionDriver trait: the automation backend seen by the explorer
// ============================================================================

/// Observes and manipulates the live application under test.
///
/// Every call is bounded by its own timeout and reports failure through
/// `DriverError`; a timeout is just another failure.
pub trait ActionDriver {
    /// Raw textual hierarchy dump of the current screen.
    fn capture_snapshot(&mut self) -> Result<String, DriverError>;

    /// Capture a screenshot named `name`; returns the artifact location.
    fn capture_screenshot(&mut self, name: &str) -> Result<String, DriverError>;

    /// Tap/activate the element addressed by `locator`.
    fn activate(&mut self, locator: &Locator) -> Result<(), DriverError>;

    /// Best-effort "back" / dismiss.
    fn navigate_back(&mut self) -> Result<(), DriverError>;
}

/// Target platform. Only selects the screenshot mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "android"),
            Platform::Ios => write!(f, "ios"),
        }
    }
}

/// Per-call timeouts for backend operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTimeouts {
    pub snapshot: Duration,
    pub activate: Duration,
    pub back: Duration,
    pub screenshot: Duration,
}

impl Default for DriverTimeouts {
    fn default() -> Self {
        Self {
            snapshot: Duration::from_secs(30),
            activate: Duration::from_secs(15),
            back: Duration::from_secs(10),
            screenshot: Duration::from_secs(5),
        }
    }
}
