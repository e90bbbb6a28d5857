use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value, json};

use crate::driver::ActionDriver;
use crate::driver::locator::Locator;
use crate::error::DriverError;
use crate::explorer::cancel::CancelToken;
use crate::snapshot::element::Element;

// ============================================================================
// Scripted application model
// ============================================================================

/// A clickable element of a scripted screen.
#[derive(Debug, Clone, Default)]
pub struct ScriptedElement {
    pub text: Option<String>,
    pub accessibility_text: Option<String>,
    pub resource_id: Option<String>,
    pub bounds: String,

    /// Screen pushed when this element is tapped; `None` re-pushes the
    /// current screen (an overlay that "back" dismisses)
    pub target: Option<String>,
}

impl ScriptedElement {
    pub fn text(label: &str) -> Self {
        Self {
            text: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn accessibility(label: &str) -> Self {
        Self {
            accessibility_text: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn resource_id(id: &str) -> Self {
        Self {
            resource_id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn bounds(bounds: &str) -> Self {
        Self {
            bounds: bounds.into(),
            ..Default::default()
        }
    }

    pub fn leads_to(mut self, screen: &str) -> Self {
        self.target = Some(screen.into());
        self
    }

    fn as_element(&self) -> Element {
        Element {
            display_text: self.text.clone(),
            accessibility_label: self.accessibility_text.clone(),
            resource_id: self.resource_id.clone(),
            bounds: self.bounds.clone(),
            node_class: "scripted.Button".into(),
            path: String::new(),
        }
    }

    fn to_node(&self) -> Value {
        let mut attributes = Map::new();
        attributes.insert("clickable".into(), json!("true"));
        attributes.insert("class".into(), json!("scripted.Button"));
        attributes.insert("bounds".into(), json!(self.bounds));
        if let Some(text) = &self.text {
            attributes.insert("text".into(), json!(text));
        }
        if let Some(acc) = &self.accessibility_text {
            attributes.insert("accessibilityText".into(), json!(acc));
        }
        if let Some(id) = &self.resource_id {
            attributes.insert("resource-id".into(), json!(id));
        }
        json!({ "attributes": attributes, "children": [] })
    }
}

/// Every call the explorer made, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Snapshot { screen: String },
    Screenshot { name: String },
    Activate { locator: Locator },
    Back,
}

// ============================================================================
// ScriptedDriver
// ============================================================================

/// In-memory `ActionDriver` simulating an app as a graph of screens.
///
/// Keeps a navigation stack: taps push the target screen, back pops it.
/// Used in tests and for offline dry runs.
pub struct ScriptedDriver {
    screens: HashMap<String, Vec<ScriptedElement>>,
    stack: Vec<String>,
    calls: Vec<DriverCall>,
    failing_activations: HashSet<Locator>,
    failing_snapshots: HashSet<String>,
    raw_snapshots: HashMap<String, String>,
    cancel_after: Option<(usize, CancelToken)>,
}

impl ScriptedDriver {
    /// Driver whose app starts on `start`.
    pub fn new(start: &str) -> Self {
        Self {
            screens: HashMap::new(),
            stack: vec![start.to_string()],
            calls: Vec::new(),
            failing_activations: HashSet::new(),
            failing_snapshots: HashSet::new(),
            raw_snapshots: HashMap::new(),
            cancel_after: None,
        }
    }

    /// Define a screen and its clickable elements.
    pub fn with_screen(mut self, name: &str, elements: Vec<ScriptedElement>) -> Self {
        self.screens.insert(name.to_string(), elements);
        self
    }

    /// Taps resolved to `locator` report failure and leave the screen as is.
    pub fn with_failing_activation(mut self, locator: Locator) -> Self {
        self.failing_activations.insert(locator);
        self
    }

    /// Hierarchy capture fails while `screen` is showing.
    pub fn with_failing_snapshot(mut self, screen: &str) -> Self {
        self.failing_snapshots.insert(screen.to_string());
        self
    }

    /// Return `raw` verbatim as the hierarchy dump of `screen`.
    pub fn with_raw_snapshot(mut self, screen: &str, raw: &str) -> Self {
        self.raw_snapshots.insert(screen.to_string(), raw.to_string());
        self
    }

    /// Trip `token` once `activations` taps have been attempted.
    pub fn cancel_after_activations(mut self, activations: usize, token: CancelToken) -> Self {
        self.cancel_after = Some((activations, token));
        self
    }

    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    pub fn current_screen(&self) -> &str {
        self.stack.last().map(String::as_str).unwrap_or_default()
    }

    /// The hierarchy dump the backend would print for `screen`.
    pub fn hierarchy(&self, screen: &str) -> Value {
        let children: Vec<Value> = self
            .screens
            .get(screen)
            .map(|elements| elements.iter().map(ScriptedElement::to_node).collect())
            .unwrap_or_default();

        json!({
            "attributes": { "class": "scripted.Window", "clickable": "false" },
            "children": [ { "attributes": {}, "children": children } ]
        })
    }

    fn activation_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DriverCall::Activate { .. }))
            .count()
    }
}

impl ActionDriver for ScriptedDriver {
    fn capture_snapshot(&mut self) -> Result<String, DriverError> {
        let screen = self.current_screen().to_string();
        self.calls.push(DriverCall::Snapshot {
            screen: screen.clone(),
        });

        if self.failing_snapshots.contains(&screen) {
            return Err(DriverError::Rejected(format!("hierarchy unavailable on {}", screen)));
        }
        if let Some(raw) = self.raw_snapshots.get(&screen) {
            return Ok(raw.clone());
        }
        Ok(format!("Running on scripted-device\n{}", self.hierarchy(&screen)))
    }

    fn capture_screenshot(&mut self, name: &str) -> Result<String, DriverError> {
        self.calls.push(DriverCall::Screenshot {
            name: name.to_string(),
        });
        Ok(format!("scripted://{}.png", name))
    }

    fn activate(&mut self, locator: &Locator) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Activate {
            locator: locator.clone(),
        });

        if let Some((limit, token)) = &self.cancel_after {
            if self.activation_count() >= *limit {
                token.cancel();
            }
        }

        if self.failing_activations.contains(locator) {
            return Err(DriverError::Rejected(format!("tap on {} had no effect", locator)));
        }

        let current = self.current_screen().to_string();
        let target = self
            .screens
            .get(&current)
            .and_then(|elements| {
                elements
                    .iter()
                    .find(|e| Locator::for_element(&e.as_element()).as_ref() == Some(locator))
            })
            .map(|e| e.target.clone().unwrap_or_else(|| current.clone()))
            .ok_or_else(|| DriverError::Rejected(format!("no element for {} on {}", locator, current)))?;

        self.stack.push(target);
        Ok(())
    }

    fn navigate_back(&mut self) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Back);
        if self.stack.len() <= 1 {
            return Err(DriverError::Rejected("already on the start screen".into()));
        }
        self.stack.pop();
        Ok(())
    }
}
