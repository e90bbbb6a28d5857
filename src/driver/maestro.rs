use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::debug;

use crate::driver::locator::Locator;
use crate::driver::process::{CapturedOutput, run_with_timeout};
use crate::driver::{ActionDriver, DriverTimeouts, Platform};
use crate::error::DriverError;
use crate::script::step::{ScriptStep, flow_document};

/// Paths and limits for the Maestro-backed driver.
#[derive(Debug, Clone)]
pub struct MaestroConfig {
    pub maestro_path: PathBuf,
    pub adb_path: PathBuf,
    pub xcrun_path: PathBuf,

    /// When set, exported as JAVA_HOME with its `bin` prepended to PATH
    pub java_home: Option<PathBuf>,

    pub timeouts: DriverTimeouts,
}

impl Default for MaestroConfig {
    fn default() -> Self {
        Self {
            maestro_path: default_maestro_path(),
            adb_path: PathBuf::from("adb"),
            xcrun_path: PathBuf::from("xcrun"),
            java_home: None,
            timeouts: DriverTimeouts::default(),
        }
    }
}

/// `~/.maestro/bin/maestro`, or plain `maestro` when there is no home dir.
pub fn default_maestro_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".maestro").join("bin").join("maestro"))
        .unwrap_or_else(|| PathBuf::from("maestro"))
}

/// Drives a device or simulator through the Maestro CLI.
///
/// Each tap or back is a one-step flow file run with `maestro test`;
/// hierarchy dumps come from `maestro hierarchy`. Screenshots go through
/// adb (Android) or simctl (iOS).
pub struct MaestroDriver {
    app_id: String,
    platform: Platform,
    config: MaestroConfig,
    screenshots_dir: PathBuf,
}

impl MaestroDriver {
    pub fn new(app_id: &str, platform: Platform, config: MaestroConfig, screenshots_dir: &Path) -> Self {
        Self {
            app_id: app_id.to_string(),
            platform,
            config,
            screenshots_dir: screenshots_dir.to_path_buf(),
        }
    }

    fn maestro(&self) -> Command {
        let mut command = Command::new(&self.config.maestro_path);
        if let Some(java_home) = &self.config.java_home {
            let path = std::env::var_os("PATH").unwrap_or_default();
            let mut paths = vec![java_home.join("bin")];
            paths.extend(std::env::split_paths(&path));
            command.env("JAVA_HOME", java_home);
            if let Ok(joined) = std::env::join_paths(paths) {
                command.env("PATH", joined);
            }
        }
        command
    }

    /// Write `steps` to a temporary flow file and run it.
    fn run_flow(&self, steps: &[ScriptStep], timeout: Duration) -> Result<CapturedOutput, DriverError> {
        let mut flow = tempfile::Builder::new()
            .prefix("maestro_flow_")
            .suffix(".yaml")
            .tempfile()
            .map_err(io_error("creating flow file"))?;
        flow.write_all(flow_document(&self.app_id, steps).as_bytes())
            .map_err(io_error("writing flow file"))?;
        flow.flush().map_err(io_error("flushing flow file"))?;

        let mut command = self.maestro();
        command.arg("test").arg(flow.path());
        // flow file is removed when `flow` drops, after the run
        run_with_timeout(&mut command, timeout)
    }
}

impl ActionDriver for MaestroDriver {
    fn capture_snapshot(&mut self) -> Result<String, DriverError> {
        let mut command = self.maestro();
        command.arg("hierarchy");
        let output = run_with_timeout(&mut command, self.config.timeouts.snapshot)?;
        Ok(output.stdout_text())
    }

    fn capture_screenshot(&mut self, name: &str) -> Result<String, DriverError> {
        let path = self.screenshots_dir.join(format!("{}.png", name));
        let timeout = self.config.timeouts.screenshot;

        match self.platform {
            Platform::Android => {
                let mut command = Command::new(&self.config.adb_path);
                command.args(["exec-out", "screencap", "-p"]);
                let output = run_with_timeout(&mut command, timeout)?;
                std::fs::write(&path, &output.stdout).map_err(|source| DriverError::Io {
                    context: format!("writing {}", path.display()),
                    source,
                })?;
            }
            Platform::Ios => {
                let mut command = Command::new(&self.config.xcrun_path);
                command.args(["simctl", "io", "booted", "screenshot"]).arg(&path);
                run_with_timeout(&mut command, timeout)?;
            }
        }

        debug!(path = %path.display(), "screenshot captured");
        Ok(path.display().to_string())
    }

    fn activate(&mut self, locator: &Locator) -> Result<(), DriverError> {
        self.run_flow(&[ScriptStep::Tap(locator.clone())], self.config.timeouts.activate)?;
        Ok(())
    }

    fn navigate_back(&mut self) -> Result<(), DriverError> {
        self.run_flow(&[ScriptStep::Back], self.config.timeouts.back)?;
        Ok(())
    }
}

fn io_error(context: &'static str) -> impl FnOnce(std::io::Error) -> DriverError {
    move |source| DriverError::Io {
        context: context.to_string(),
        source,
    }
}
