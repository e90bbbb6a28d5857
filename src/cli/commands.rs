use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::cli::config::{AppConfig, build_explorer_config, build_maestro_config};
use crate::driver::Platform;
use crate::driver::locator::Locator;
use crate::driver::maestro::MaestroDriver;
use crate::error::SnapshotError;
use crate::explorer::cancel::{CancelToken, install_interrupt_handler};
use crate::explorer::run_model::ExplorationRun;
use crate::report::console::format_summary;
use crate::script::generator::{SCRIPT_FILE, generate_script};
use crate::script::report_model::ExplorationReport;
use crate::snapshot::parser::parse;
use crate::state::identity::identify;

// ============================================================================
// explore subcommand
// ============================================================================

pub fn cmd_explore(
    app_id: &str,
    platform: Platform,
    max_depth: Option<usize>,
    output_dir: Option<&str>,
    settle_ms: Option<u64>,
    config: &AppConfig,
    verbose: u8,
) -> Result<ExplorationRun, Box<dyn std::error::Error>> {
    let explorer_config =
        build_explorer_config(app_id, platform, max_depth, settle_ms, &config.explore);
    let output_root = output_dir.unwrap_or(config.explore.output_dir.as_str());
    // UTC, matching the run's `started_at`.
    let run_dir = run_directory(Path::new(output_root), &Utc::now().format("%Y%m%d_%H%M%S").to_string());
    let screenshots = crate::screenshots_dir(&run_dir);
    std::fs::create_dir_all(&screenshots)?;

    if verbose > 0 {
        eprintln!(
            "Exploring {} on {} (max_depth={}) into {}",
            app_id,
            platform,
            explorer_config.max_depth,
            run_dir.display()
        );
    }

    let cancel = install_interrupt_handler().unwrap_or_else(|e| {
        warn!("Ctrl-C will not stop exploration gracefully: {}", e);
        CancelToken::new()
    });

    let mut driver = MaestroDriver::new(
        app_id,
        platform,
        build_maestro_config(&config.driver),
        &screenshots,
    );

    let (run, paths) = crate::run_exploration(&mut driver, explorer_config, cancel, &run_dir)?;

    print!("{}", format_summary(&run));
    println!("Generated: {}", paths.script.display());
    println!("Generated: {}", paths.report.display());
    println!("Screenshots saved to: {}/", screenshots.display());

    Ok(run)
}

/// `<root>/ui_exploration_<stamp>`
pub fn run_directory(root: &Path, stamp: &str) -> PathBuf {
    root.join(format!("ui_exploration_{}", stamp))
}

// ============================================================================
// regenerate subcommand
// ============================================================================

/// Rebuild the replay script from a saved report; returns where it went.
pub fn cmd_regenerate(
    report_path: &str,
    output: Option<&str>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(report_path)?;
    let report: ExplorationReport = serde_json::from_str(&content)?;
    let run = report.into_run();
    let script = generate_script(&run);

    let target = match output {
        Some(path) => PathBuf::from(path),
        None => Path::new(report_path)
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(SCRIPT_FILE),
    };
    std::fs::write(&target, script)?;

    info!(
        screens = run.screen_count(),
        flows = run.interaction_count(),
        "regenerated flow"
    );
    println!("Generated: {}", target.display());
    Ok(target)
}

// ============================================================================
// inspect subcommand
// ============================================================================

pub fn cmd_inspect(hierarchy_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(hierarchy_path)?;
    print!("{}", inspect_hierarchy(&raw)?);
    Ok(())
}

/// One line per interactable element: identity, locator, class, tree path.
pub fn inspect_hierarchy(raw: &str) -> Result<String, SnapshotError> {
    let elements = parse(raw)?;
    let mut out = format!("{} interactable elements\n", elements.len());

    for element in &elements {
        let locator = Locator::for_element(element)
            .map(|l| l.to_string())
            .unwrap_or_else(|| "<none>".to_string());
        out.push_str(&format!(
            "  {:<40} {:<30} {:<28} {}\n",
            identify(element).as_str(),
            locator,
            element.node_class,
            element.path
        ));
    }

    Ok(out)
}
