use std::path::{Path, PathBuf};

use crate::{
    driver::ActionDriver,
    explorer::{
        cancel::CancelToken,
        explorer::Explorer,
        run_model::{ExplorationRun, ExplorerConfig},
    },
    script::generator::{ArtifactPaths, generate, write_artifacts},
    trace::logger::TraceLogger,
};

pub mod cli;
pub mod driver;
pub mod error;
pub mod explorer;
pub mod report;
pub mod script;
pub mod snapshot;
pub mod state;
pub mod trace;

pub const TRACE_FILE: &str = "exploration_trace.jsonl";
pub const SCREENSHOTS_DIR: &str = "screenshots";

/// Screenshot folder inside a run directory.
pub fn screenshots_dir(run_dir: &Path) -> PathBuf {
    run_dir.join(SCREENSHOTS_DIR)
}

/// Explore with `driver`, then write script, report and trace to `run_dir`.
///
/// Exploration itself never fails; artifacts are written whether the run
/// completed or was cancelled. Only filesystem errors are returned.
pub fn run_exploration(
    driver: &mut dyn ActionDriver,
    config: ExplorerConfig,
    cancel: CancelToken,
    run_dir: &Path,
) -> std::io::Result<(ExplorationRun, ArtifactPaths)> {
    let screenshots = screenshots_dir(run_dir);
    std::fs::create_dir_all(&screenshots)?;

    let tracer = TraceLogger::new(&run_dir.join(TRACE_FILE));
    let run = Explorer::new(config, driver)
        .with_cancel(cancel)
        .with_tracer(tracer)
        .with_screenshots_dir(&screenshots.display().to_string())
        .run();

    let artifacts = generate(&run);
    let paths = write_artifacts(run_dir, &artifacts)?;
    Ok((run, paths))
}
