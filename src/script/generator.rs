use std::fs;
use std::path::{Path, PathBuf};

use crate::driver::locator::Locator;
use crate::explorer::flow::FlowRecord;
use crate::explorer::run_model::ExplorationRun;
use crate::script::report_model::ExplorationReport;
use crate::script::step::{ScriptStep, flow_header};

pub const SCRIPT_FILE: &str = "exploration_flow.yaml";
pub const REPORT_FILE: &str = "exploration_report.json";

/// Screenshot taken by the bootstrap steps of every generated script.
pub const START_SCREENSHOT: &str = "exploration_start";

/// Script text plus structured report for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifacts {
    pub script: String,
    pub report: ExplorationReport,
}

/// Where `write_artifacts` put things.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub script: PathBuf,
    pub report: PathBuf,
}

// ============================================================================
// Generation
// ============================================================================

/// Project a finished run into a replay script and a report.
///
/// Pure: the same run always yields identical artifacts, since every
/// timestamp comes from the run itself.
pub fn generate(run: &ExplorationRun) -> GeneratedArtifacts {
    GeneratedArtifacts {
        script: generate_script(run),
        report: ExplorationReport::from_run(run),
    }
}

/// Render the Maestro flow replaying every recorded transition, grouped by
/// origin screen in order of first appearance.
pub fn generate_script(run: &ExplorationRun) -> String {
    let mut out = flow_header(&run.app_id);

    out.push_str("# Auto-generated UI exploration flow\n");
    out.push_str(&format!(
        "# Generated: {}\n",
        run.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!("# Total screens explored: {}\n", run.screen_count()));
    out.push_str(&format!(
        "# Total interactions discovered: {}\n\n",
        run.interaction_count()
    ));

    for step in bootstrap_steps() {
        out.push_str(&step.render());
    }
    out.push('\n');

    for (screen, flows) in group_by_origin(&run.flows) {
        out.push_str(&format!("\n# Screen: {}\n", comment(screen)));
        out.push_str(&format!("# Discovered {} interactions\n\n", flows.len()));

        for flow in flows {
            out.push_str(&format!("# Test: {}\n", comment(flow.action.as_str())));
            for step in replay_steps(flow) {
                out.push_str(&step.render());
            }
            out.push('\n');
        }
    }

    out
}

/// Steps every script starts with, before any transition.
pub fn bootstrap_steps() -> Vec<ScriptStep> {
    vec![
        ScriptStep::WaitForAnimationToEnd,
        ScriptStep::TakeScreenshot(START_SCREENSHOT.into()),
    ]
}

/// Tap, settle, capture, back, settle.
pub fn replay_steps(flow: &FlowRecord) -> Vec<ScriptStep> {
    let mut steps = Vec::with_capacity(5);
    if let Some(locator) = Locator::for_element(&flow.element) {
        steps.push(ScriptStep::Tap(locator));
    }
    steps.push(ScriptStep::WaitForAnimationToEnd);
    steps.push(ScriptStep::TakeScreenshot(flow.to_screen.clone()));
    steps.push(ScriptStep::Back);
    steps.push(ScriptStep::WaitForAnimationToEnd);
    steps
}

/// Group flows by `from_screen`, keeping first-appearance order of screens
/// and recorded order within each group.
pub fn group_by_origin(flows: &[FlowRecord]) -> Vec<(&str, Vec<&FlowRecord>)> {
    let mut groups: Vec<(&str, Vec<&FlowRecord>)> = Vec::new();
    for flow in flows {
        match groups.iter_mut().find(|(screen, _)| *screen == flow.from_screen) {
            Some((_, members)) => members.push(flow),
            None => groups.push((flow.from_screen.as_str(), vec![flow])),
        }
    }
    groups
}

fn comment(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

// ============================================================================
// Output
// ============================================================================

/// Write the script and the pretty-printed report into `dir`.
pub fn write_artifacts(dir: &Path, artifacts: &GeneratedArtifacts) -> std::io::Result<ArtifactPaths> {
    fs::create_dir_all(dir)?;

    let script = dir.join(SCRIPT_FILE);
    fs::write(&script, &artifacts.script)?;

    let report = dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(&artifacts.report)?;
    fs::write(&report, json)?;

    Ok(ArtifactPaths { script, report })
}
