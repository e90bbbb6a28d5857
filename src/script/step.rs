use crate::driver::locator::Locator;

/// One command of a Maestro flow.
///
/// Shared by the live driver (single-step flows) and the script generator,
/// so a generated script replays exactly what the explorer sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Tap(Locator),
    WaitForAnimationToEnd,
    TakeScreenshot(String),
    Back,
}

impl ScriptStep {
    /// Render as a YAML list item, newline terminated.
    pub fn render(&self) -> String {
        match self {
            ScriptStep::Tap(Locator::Text(label))
            | ScriptStep::Tap(Locator::AccessibilityLabel(label)) => {
                format!("- tapOn: {}\n", quote(&literal_pattern(label)))
            }
            ScriptStep::Tap(Locator::StableId(id)) => {
                format!("- tapOn:\n    id: {}\n", quote(id))
            }
            ScriptStep::Tap(Locator::Position(point)) => {
                format!("- tapOn:\n    point: {}\n", quote(&point.to_string()))
            }
            ScriptStep::WaitForAnimationToEnd => "- waitForAnimationToEnd\n".to_string(),
            ScriptStep::TakeScreenshot(name) => format!("- takeScreenshot: {}\n", quote(name)),
            ScriptStep::Back => "- back\n".to_string(),
        }
    }
}

/// Flow header binding the steps to an application.
pub fn flow_header(app_id: &str) -> String {
    format!("appId: {}\n---\n", app_id)
}

/// A complete, standalone flow document.
pub fn flow_document(app_id: &str, steps: &[ScriptStep]) -> String {
    let mut out = flow_header(app_id);
    for step in steps {
        out.push_str(&step.render());
    }
    out
}

/// Maestro matches tap text as a regular expression; escape it so a label
/// only matches itself.
fn literal_pattern(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Double-quoted YAML scalar.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
