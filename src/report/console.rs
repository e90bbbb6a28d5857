use crate::explorer::run_model::ExplorationRun;

// ============================================================================
// Console summary: printed after every run
// ============================================================================

/// Format the end-of-run summary.
///
/// Produces output like:
/// ```text
/// === Exploration complete: com.example.app (android) ===
/// Time elapsed:        42.3s
/// Screens visited:     7
/// Elements discovered: 12
/// Flows recorded:      9
/// Outcome:             completed
/// ```
pub fn format_summary(run: &ExplorationRun) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Exploration complete: {} ({}) ===\n",
        run.app_id, run.platform
    ));
    out.push_str(&format!(
        "Time elapsed:        {:.1}s\n",
        run.elapsed_ms as f64 / 1000.0
    ));
    out.push_str(&format!("Screens visited:     {}\n", run.screen_count()));
    out.push_str(&format!("Elements discovered: {}\n", run.frontier.len()));
    out.push_str(&format!("Flows recorded:      {}\n", run.interaction_count()));
    out.push_str(&format!("Outcome:             {}\n", run.outcome));

    out
}
