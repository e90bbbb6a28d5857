use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::element::Element;

/// Screen position used when an element has no label or id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenPoint {
    /// Pixel coordinates (centre of the element's bounds)
    Absolute { x: i64, y: i64 },

    /// Percentage of the screen, for bounds that could not be read
    Relative { x_pct: u8, y_pct: u8 },
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenPoint::Absolute { x, y } => write!(f, "{},{}", x, y),
            ScreenPoint::Relative { x_pct, y_pct } => write!(f, "{}%,{}%", x_pct, y_pct),
        }
    }
}

/// How the backend should find an element, most to least specific.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Locator {
    Text(String),
    AccessibilityLabel(String),
    StableId(String),
    Position(ScreenPoint),
}

impl Locator {
    /// Pick the locator for an element: text, accessibility label, stable
    /// id, then an approximate tap on its bounds.
    ///
    /// Returns `None` when the element has nothing to go on (no labels and
    /// empty bounds).
    pub fn for_element(element: &Element) -> Option<Locator> {
        if let Some(text) = element.display_text() {
            return Some(Locator::Text(text.to_string()));
        }
        if let Some(acc) = element.accessibility_label() {
            return Some(Locator::AccessibilityLabel(acc.to_string()));
        }
        if let Some(id) = element.resource_id() {
            return Some(Locator::StableId(id.to_string()));
        }
        if element.bounds.trim().is_empty() {
            return None;
        }

        let point = match bounds_center(&element.bounds) {
            Some((x, y)) => ScreenPoint::Absolute { x, y },
            None => ScreenPoint::Relative {
                x_pct: 50,
                y_pct: 50,
            },
        };
        Some(Locator::Position(point))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Text(t) => write!(f, "text \"{}\"", t),
            Locator::AccessibilityLabel(a) => write!(f, "accessibility \"{}\"", a),
            Locator::StableId(id) => write!(f, "id {}", id),
            Locator::Position(p) => write!(f, "point {}", p),
        }
    }
}

/// Centre of a `[x1,y1][x2,y2]` bounds string.
pub fn bounds_center(bounds: &str) -> Option<(i64, i64)> {
    let numbers: Vec<i64> = bounds
        .split(|c: char| !(c.is_ascii_digit() || c == '-'))
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    match numbers.as_slice() {
        [x1, y1, x2, y2] => Some((x1.checked_add(*x2)? / 2, y1.checked_add(*y2)? / 2)),
        _ => None,
    }
}
