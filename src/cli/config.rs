use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::driver::maestro::{MaestroConfig, default_maestro_path};
use crate::driver::{DriverTimeouts, Platform};
use crate::explorer::run_model::ExplorerConfig;

pub const DEFAULT_CONFIG_FILE: &str = "ui-explorer.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ui-explorer",
    version,
    about = "Autonomous UI exploration and replay-flow generation for mobile apps"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: ui-explorer.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explore a running app and generate a replay flow
    Explore {
        /// App package / bundle id
        #[arg(long)]
        app_id: String,

        /// Target platform (selects the screenshot mechanism)
        #[arg(long, value_enum, default_value_t = Platform::Android)]
        platform: Platform,

        /// Maximum exploration depth (0 = start screen's transitions only)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Directory receiving the ui_exploration_<timestamp> run folder
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Wait after each tap before observing, in milliseconds
        #[arg(long)]
        settle_ms: Option<u64>,
    },

    /// Rebuild the replay flow from a saved exploration report
    Regenerate {
        /// Path to exploration_report.json
        #[arg(long)]
        report: String,

        /// Output path (default: exploration_flow.yaml next to the report)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the interactable elements of a saved hierarchy dump
    Inspect {
        /// File holding `maestro hierarchy` output
        #[arg(long)]
        hierarchy: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ui-explorer.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub explore: ExploreConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploreConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "default_back_settle_ms")]
    pub back_settle_ms: u64,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            settle_ms: default_settle_ms(),
            back_settle_ms: default_back_settle_ms(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Maestro binary (default: ~/.maestro/bin/maestro)
    pub maestro_path: Option<String>,

    #[serde(default = "default_adb")]
    pub adb_path: String,

    #[serde(default = "default_xcrun")]
    pub xcrun_path: String,

    pub java_home: Option<String>,

    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            maestro_path: None,
            adb_path: default_adb(),
            xcrun_path: default_xcrun(),
            java_home: None,
            timeouts: TimeoutConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_snapshot_ms")]
    pub snapshot_ms: u64,
    #[serde(default = "default_activate_ms")]
    pub activate_ms: u64,
    #[serde(default = "default_back_ms")]
    pub back_ms: u64,
    #[serde(default = "default_screenshot_ms")]
    pub screenshot_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            snapshot_ms: default_snapshot_ms(),
            activate_ms: default_activate_ms(),
            back_ms: default_back_ms(),
            screenshot_ms: default_screenshot_ms(),
        }
    }
}

// Serde default helpers
fn default_max_depth() -> usize { 3 }
fn default_settle_ms() -> u64 { 2000 }
fn default_back_settle_ms() -> u64 { 1000 }
fn default_output_dir() -> String { ".".to_string() }
fn default_adb() -> String { "adb".to_string() }
fn default_xcrun() -> String { "xcrun".to_string() }
fn default_snapshot_ms() -> u64 { 30_000 }
fn default_activate_ms() -> u64 { 15_000 }
fn default_back_ms() -> u64 { 10_000 }
fn default_screenshot_ms() -> u64 { 5_000 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing;
/// a malformed file is reported and ignored.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build an ExplorerConfig; CLI values win over the config file.
pub fn build_explorer_config(
    app_id: &str,
    platform: Platform,
    max_depth: Option<usize>,
    settle_ms: Option<u64>,
    explore: &ExploreConfig,
) -> ExplorerConfig {
    ExplorerConfig {
        app_id: app_id.to_string(),
        platform,
        max_depth: max_depth.unwrap_or(explore.max_depth),
        settle: Duration::from_millis(settle_ms.unwrap_or(explore.settle_ms)),
        back_settle: Duration::from_millis(explore.back_settle_ms),
    }
}

/// Build the Maestro driver settings from the `driver` section.
pub fn build_maestro_config(driver: &DriverConfig) -> MaestroConfig {
    MaestroConfig {
        maestro_path: driver
            .maestro_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_maestro_path),
        adb_path: PathBuf::from(&driver.adb_path),
        xcrun_path: PathBuf::from(&driver.xcrun_path),
        java_home: driver.java_home.as_ref().map(PathBuf::from),
        timeouts: DriverTimeouts {
            snapshot: Duration::from_millis(driver.timeouts.snapshot_ms),
            activate: Duration::from_millis(driver.timeouts.activate_ms),
            back: Duration::from_millis(driver.timeouts.back_ms),
            screenshot: Duration::from_millis(driver.timeouts.screenshot_ms),
        },
    }
}
