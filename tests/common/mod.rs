#![allow(dead_code)]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use ui_explorer::driver::Platform;
use ui_explorer::explorer::run_model::ExplorerConfig;
use ui_explorer::snapshot::element::Element;

pub const APP_ID: &str = "com.example.app";

/// Explorer config with no settle waits, for scripted drivers.
pub fn fast_config(max_depth: usize) -> ExplorerConfig {
    ExplorerConfig {
        app_id: APP_ID.into(),
        platform: Platform::Android,
        max_depth,
        settle: Duration::ZERO,
        back_settle: Duration::ZERO,
    }
}

pub fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub fn text_element(text: &str) -> Element {
    Element {
        display_text: Some(text.into()),
        accessibility_label: None,
        resource_id: None,
        bounds: "[0,0][100,50]".into(),
        node_class: "android.widget.Button".into(),
        path: "/child[0]".into(),
    }
}

pub fn bare_element(bounds: &str) -> Element {
    Element {
        display_text: None,
        accessibility_label: None,
        resource_id: None,
        bounds: bounds.into(),
        node_class: "android.view.View".into(),
        path: String::new(),
    }
}

/// Hierarchy node with the given attributes and children.
pub fn node(attributes: Value, children: Vec<Value>) -> Value {
    json!({ "attributes": attributes, "children": children })
}

pub fn clickable(text: &str) -> Value {
    node(
        json!({ "clickable": "true", "text": text, "class": "android.widget.Button", "bounds": "[0,0][10,10]" }),
        vec![],
    )
}
