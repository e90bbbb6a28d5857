use std::collections::HashSet;

use ui_explorer::driver::locator::{Locator, ScreenPoint};
use ui_explorer::driver::scripted::{DriverCall, ScriptedDriver, ScriptedElement};
use ui_explorer::explorer::cancel::CancelToken;
use ui_explorer::explorer::explorer::Explorer;
use ui_explorer::explorer::run_model::{ExplorationRun, RunOutcome};
use ui_explorer::script::generator::{REPORT_FILE, SCRIPT_FILE, START_SCREENSHOT, generate};
use ui_explorer::script::report_model::ExplorationReport;
use ui_explorer::state::identity::ElementIdentity;
use ui_explorer::trace::logger::TraceLogger;
use ui_explorer::trace::trace::{TraceEvent, TraceKind};
use ui_explorer::{SCREENSHOTS_DIR, TRACE_FILE, run_exploration};

use crate::common::fast_config;

mod common;

// ============================================================================
// Helpers
// ============================================================================

fn explore(driver: &mut ScriptedDriver, max_depth: usize) -> ExplorationRun {
    Explorer::new(fast_config(max_depth), driver).run()
}

fn actions(run: &ExplorationRun) -> Vec<&str> {
    run.flows.iter().map(|f| f.action.as_str()).collect()
}

fn back_count(driver: &ScriptedDriver) -> usize {
    driver
        .calls()
        .iter()
        .filter(|c| matches!(c, DriverCall::Back))
        .count()
}

fn assert_bootstrap_only(run: &ExplorationRun) {
    let script = generate(run).script;
    assert!(script.contains(&format!("- takeScreenshot: \"{}\"", START_SCREENSHOT)));
    assert!(!script.contains("tapOn"));
    assert!(!script.contains("# Screen:"));
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn empty_app_observes_one_screen_and_stops() {
    let mut driver = ScriptedDriver::new("home").with_screen("home", vec![]);
    let run = explore(&mut driver, 3);

    assert_eq!(run.outcome, RunOutcome::Completed);
    assert_eq!(run.screen_count(), 1);
    assert_eq!(run.interaction_count(), 0);
    assert!(run.frontier.is_empty());
    assert_eq!(back_count(&driver), 0);

    let report = generate(&run).report;
    assert_eq!(report.total_screens, 1);
    assert_eq!(report.total_interactions, 0);
    assert_bootstrap_only(&run);
}

#[test]
fn failed_activation_is_marked_visited_but_not_recorded() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen(
            "home",
            vec![
                ScriptedElement::text("First").leads_to("first"),
                ScriptedElement::text("Second").leads_to("second"),
                ScriptedElement::text("Third").leads_to("third"),
            ],
        )
        .with_screen("first", vec![])
        .with_screen("second", vec![])
        .with_screen("third", vec![])
        .with_failing_activation(Locator::Text("Second".into()));

    let run = explore(&mut driver, 3);

    let frontier: Vec<&str> = run.frontier.identities().iter().map(|i| i.as_str()).collect();
    assert_eq!(frontier, vec!["text:First", "text:Second", "text:Third"]);
    assert_eq!(actions(&run), vec!["text:First", "text:Third"]);
    assert_eq!(generate(&run).report.total_interactions, 2);

    // No back after the failed tap: one per successful activation.
    assert_eq!(back_count(&driver), 2);
    assert_eq!(driver.current_screen(), "home");
}

#[test]
fn depth_zero_records_transitions_without_descending() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen("home", vec![ScriptedElement::text("Settings").leads_to("settings")])
        .with_screen("settings", vec![ScriptedElement::text("Wi-Fi").leads_to("wifi")]);

    let run = explore(&mut driver, 0);

    assert_eq!(actions(&run), vec!["text:Settings"]);
    assert_eq!(run.screen_count(), 1);
    assert!(run.screens.iter().all(|s| s.depth == 0));
    assert!(!run.frontier.contains(&ElementIdentity::from("text:Wi-Fi")));
    assert_eq!(back_count(&driver), 1);
}

#[test]
fn root_snapshot_failure_yields_empty_run() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen("home", vec![ScriptedElement::text("Go")])
        .with_failing_snapshot("home");

    let run = explore(&mut driver, 3);

    assert_eq!(run.outcome, RunOutcome::Completed);
    assert_eq!(run.screen_count(), 0);
    assert_eq!(run.interaction_count(), 0);
    assert!(run.frontier.is_empty());
    assert_bootstrap_only(&run);
}

#[test]
fn malformed_snapshot_is_treated_as_no_elements() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen("home", vec![ScriptedElement::text("Go")])
        .with_raw_snapshot("home", "Running on device\nERROR: device offline\n");

    let run = explore(&mut driver, 3);
    assert_eq!(run.screen_count(), 0);
    assert!(
        !driver
            .calls()
            .iter()
            .any(|c| matches!(c, DriverCall::Activate { .. }))
    );
}

#[test]
fn child_snapshot_failure_backs_out_and_continues_with_siblings() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen(
            "home",
            vec![
                ScriptedElement::text("Broken").leads_to("broken"),
                ScriptedElement::text("Fine").leads_to("fine"),
            ],
        )
        .with_screen("broken", vec![ScriptedElement::text("Unreachable")])
        .with_screen("fine", vec![])
        .with_failing_snapshot("broken");

    let run = explore(&mut driver, 2);

    assert_eq!(actions(&run), vec!["text:Broken", "text:Fine"]);
    assert_eq!(back_count(&driver), 2);
    assert_eq!(driver.current_screen(), "home");
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn identities_are_explored_once_across_screens() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen(
            "home",
            vec![
                ScriptedElement::text("Profile").leads_to("profile"),
                ScriptedElement::text("OK").leads_to("ok_home"),
            ],
        )
        .with_screen(
            "profile",
            vec![
                ScriptedElement::text("OK").leads_to("ok_profile"),
                ScriptedElement::text("Edit").leads_to("edit"),
            ],
        )
        .with_screen("ok_home", vec![])
        .with_screen("ok_profile", vec![ScriptedElement::text("Profile")])
        .with_screen("edit", vec![]);

    let run = explore(&mut driver, 3);

    let mut seen = HashSet::new();
    for flow in &run.flows {
        assert!(seen.insert(flow.action.clone()), "{} recorded twice", flow.action);
    }
    let ok_flows: Vec<_> = run.flows.iter().filter(|f| f.action.as_str() == "text:OK").collect();
    assert_eq!(ok_flows.len(), 1);
    assert_eq!(ok_flows[0].depth, 1);
}

#[test]
fn duplicate_labels_on_one_screen_are_tapped_once() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen(
            "home",
            vec![ScriptedElement::text("Like"), ScriptedElement::text("Like")],
        );

    let run = explore(&mut driver, 0);
    assert_eq!(actions(&run), vec!["text:Like"]);
    assert_eq!(run.screens[0].elements.len(), 2);
}

fn chain() -> ScriptedDriver {
    ScriptedDriver::new("s0")
        .with_screen("s0", vec![ScriptedElement::text("Next").leads_to("s1")])
        .with_screen("s1", vec![ScriptedElement::text("Deeper").leads_to("s2")])
        .with_screen("s2", vec![ScriptedElement::text("Deepest").leads_to("s3")])
        .with_screen("s3", vec![ScriptedElement::text("End").leads_to("s4")])
        .with_screen("s4", vec![])
}

#[test]
fn no_screen_exceeds_max_depth() {
    for max_depth in 0..4 {
        let mut driver = chain();
        let run = explore(&mut driver, max_depth);

        assert!(run.screens.iter().all(|s| s.depth <= max_depth));
        assert_eq!(run.screen_count(), max_depth + 1);
        assert_eq!(run.interaction_count(), max_depth + 1);
        assert_eq!(back_count(&driver), max_depth + 1);
        assert_eq!(driver.current_screen(), "s0");
    }
}

#[test]
fn every_descent_is_paired_with_one_back() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen("home", vec![ScriptedElement::text("A").leads_to("a")])
        .with_screen("a", vec![ScriptedElement::text("X").leads_to("x")])
        .with_screen("x", vec![]);

    let run = explore(&mut driver, 3);
    assert_eq!(run.interaction_count(), 2);

    let expected = vec![
        DriverCall::Snapshot { screen: "home".into() },
        DriverCall::Screenshot { name: "screen_depth0_0001".into() },
        DriverCall::Activate { locator: Locator::Text("A".into()) },
        DriverCall::Screenshot { name: "after_tap_text_A_0002".into() },
        DriverCall::Snapshot { screen: "a".into() },
        DriverCall::Screenshot { name: "screen_depth1_0003".into() },
        DriverCall::Activate { locator: Locator::Text("X".into()) },
        DriverCall::Screenshot { name: "after_tap_text_X_0004".into() },
        DriverCall::Snapshot { screen: "x".into() },
        DriverCall::Screenshot { name: "screen_depth2_0005".into() },
        DriverCall::Back,
        DriverCall::Back,
    ];
    assert_eq!(driver.calls(), expected.as_slice());
}

#[test]
fn siblings_start_from_the_restored_screen() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen(
            "home",
            vec![
                ScriptedElement::text("Inbox").leads_to("inbox"),
                ScriptedElement::text("Outbox").leads_to("outbox"),
            ],
        )
        .with_screen("inbox", vec![ScriptedElement::text("Compose").leads_to("compose")])
        .with_screen("compose", vec![])
        .with_screen("outbox", vec![]);

    let run = explore(&mut driver, 3);

    // Outbox only resolves on "home"; a missing back would make it fail.
    assert_eq!(actions(&run), vec!["text:Inbox", "text:Compose", "text:Outbox"]);
    assert_eq!(run.flows[2].from_screen, run.flows[0].from_screen);
    assert_eq!(back_count(&driver), run.interaction_count());
}

#[test]
fn flow_records_link_pre_and_post_screens() {
    let mut driver = ScriptedDriver::new("home")
        .with_screen("home", vec![ScriptedElement::text("Open").leads_to("detail")])
        .with_screen("detail", vec![]);

    let run = explore(&mut driver, 1);
    let flow = &run.flows[0];

    assert_eq!(flow.from_screen, run.screens[0].screenshot_ref);
    assert!(flow.to_screen.starts_with("after_tap_text_Open_"));
    assert_eq!(flow.depth, 0);
    assert_eq!(flow.element.display_text(), Some("Open"));
    assert_eq!(run.screens[1].depth, 1);
}

#[test]
fn element_without_locator_counts_as_tried() {
    let mut driver = ScriptedDriver::new("home").with_screen(
        "home",
        vec![
            ScriptedElement::bounds(""),
            ScriptedElement::bounds("[0,0][100,100]"),
        ],
    );

    let run = explore(&mut driver, 0);

    assert!(run.frontier.contains(&ElementIdentity::from("bounds:")));
    assert_eq!(actions(&run), vec!["bounds:[0,0][100,100]"]);
    assert!(driver.calls().contains(&DriverCall::Activate {
        locator: Locator::Position(ScreenPoint::Absolute { x: 50, y: 50 })
    }));
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn cancellation_stops_between_elements_and_keeps_partial_logs() {
    let token = CancelToken::new();
    let mut driver = ScriptedDriver::new("home")
        .with_screen(
            "home",
            vec![
                ScriptedElement::text("One"),
                ScriptedElement::text("Two"),
                ScriptedElement::text("Three"),
            ],
        )
        .cancel_after_activations(1, token.clone());

    let run = Explorer::new(fast_config(0), &mut driver)
        .with_cancel(token)
        .run();

    assert_eq!(run.outcome, RunOutcome::Cancelled);
    assert_eq!(actions(&run), vec!["text:One"]);
    assert!(!run.frontier.contains(&ElementIdentity::from("text:Two")));

    let artifacts = generate(&run);
    assert!(artifacts.script.contains("# Test: text:One"));
    assert_eq!(artifacts.report.outcome, RunOutcome::Cancelled);
}

#[test]
fn cancellation_before_descent_skips_child_and_pending_backs() {
    let token = CancelToken::new();
    let mut driver = ScriptedDriver::new("home")
        .with_screen("home", vec![ScriptedElement::text("A").leads_to("a")])
        .with_screen(
            "a",
            vec![
                ScriptedElement::text("X").leads_to("x"),
                ScriptedElement::text("Y").leads_to("y"),
            ],
        )
        .with_screen("x", vec![ScriptedElement::text("Deeper")])
        .with_screen("y", vec![])
        .cancel_after_activations(2, token.clone());

    let run = Explorer::new(fast_config(3), &mut driver)
        .with_cancel(token)
        .run();

    assert_eq!(run.outcome, RunOutcome::Cancelled);
    assert_eq!(actions(&run), vec!["text:A", "text:X"]);
    assert_eq!(run.screen_count(), 2);
    assert!(run.screens.iter().all(|s| s.depth < 2));
    assert!(!driver.calls().contains(&DriverCall::Snapshot { screen: "x".into() }));
    assert_eq!(back_count(&driver), 0);
    assert_eq!(driver.current_screen(), "x");

    let script = generate(&run).script;
    assert!(script.contains("# Test: text:A\n"));
    assert!(script.contains("# Test: text:X\n"));
}

#[test]
fn cancel_token_clones_share_state() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(!token.is_cancelled());

    clone.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn cancelled_before_start_observes_nothing() {
    let token = CancelToken::new();
    token.cancel();
    let mut driver = ScriptedDriver::new("home").with_screen("home", vec![ScriptedElement::text("Go")]);

    let run = Explorer::new(fast_config(3), &mut driver).with_cancel(token).run();

    assert_eq!(run.outcome, RunOutcome::Cancelled);
    assert_eq!(run.screen_count(), 0);
    assert!(driver.calls().is_empty());
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn run_exploration_writes_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let run_dir = dir.path().join("ui_exploration_20261019_120000");
    let mut driver = ScriptedDriver::new("home")
        .with_screen("home", vec![ScriptedElement::text("Login").leads_to("login")])
        .with_screen("login", vec![ScriptedElement::resource_id("submit")]);

    let (run, paths) =
        run_exploration(&mut driver, fast_config(1), CancelToken::new(), &run_dir).unwrap();

    assert_eq!(paths.script, run_dir.join(SCRIPT_FILE));
    assert_eq!(paths.report, run_dir.join(REPORT_FILE));
    assert!(run_dir.join(SCREENSHOTS_DIR).is_dir());

    let script = std::fs::read_to_string(&paths.script).unwrap();
    assert_eq!(script, generate(&run).script);
    assert!(script.contains("# Test: id:submit"));

    let report: ExplorationReport =
        serde_json::from_str(&std::fs::read_to_string(&paths.report).unwrap()).unwrap();
    assert_eq!(report.total_screens, 2);
    assert_eq!(report.total_interactions, 2);

    let trace = std::fs::read_to_string(run_dir.join(TRACE_FILE)).unwrap();
    assert!(!trace.is_empty());
    for line in trace.lines() {
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(event.get("kind").is_some());
    }
}

// ============================================================================
// Trace
// ============================================================================

#[test]
fn trace_logger_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(TRACE_FILE);
    let logger = TraceLogger::new(&path);
    assert!(logger.is_enabled());

    logger.log(
        &TraceEvent::now(0, 1, TraceKind::Fault)
            .with_screen("screen_depth1_0003")
            .with_fault("activation_failed"),
    );
    logger.log(&TraceEvent::now(1, 1, TraceKind::BackNavigation));

    let content = std::fs::read_to_string(&path).unwrap();
    let events: Vec<TraceEvent> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, TraceKind::Fault);
    assert_eq!(events[0].fault.as_deref(), Some("activation_failed"));
    assert_eq!(events[1].step, 1);
}

#[test]
fn disabled_trace_logger_writes_nothing() {
    let logger = TraceLogger::disabled();
    assert!(!logger.is_enabled());
    logger.log(&TraceEvent::now(0, 0, TraceKind::Cancelled));
}
