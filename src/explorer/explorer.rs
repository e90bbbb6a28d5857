use std::collections::VecDeque;
use std::thread;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use crate::driver::ActionDriver;
use crate::driver::locator::Locator;
use crate::error::{DriverError, ExploreFault};
use crate::explorer::cancel::CancelToken;
use crate::explorer::flow::FlowRecorder;
use crate::explorer::frontier::Frontier;
use crate::explorer::run_model::{ExplorationRun, ExplorerConfig, RunOutcome};
use crate::snapshot::element::Element;
use crate::snapshot::parser::parse;
use crate::state::identity::{ElementIdentity, identify};
use crate::state::state_model::ScreenState;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind};

/// Longest identity fragment embedded in a screenshot name.
const NAME_FRAGMENT_LEN: usize = 30;

/// One screen on the traversal stack and the elements still to try there.
struct Frame {
    screen_ref: String,
    depth: usize,
    pending: VecDeque<(Element, ElementIdentity)>,
}

// ============================================================================
// Explorer
// ============================================================================

/// Depth-bounded, depth-first exploration of a live application.
///
/// The traversal stack mirrors the app's navigation stack: every
/// successful activation is followed by exactly one back navigation, either
/// right away or once the screen it opened has been fully explored.
///
/// The explorer owns the frontier and both logs for the whole run; all
/// backend failures degrade to "treat as explored, move on".
pub struct Explorer<'a> {
    config: ExplorerConfig,
    driver: &'a mut dyn ActionDriver,
    cancel: CancelToken,
    tracer: TraceLogger,
    screenshots_dir: String,

    frontier: Frontier,
    screens: Vec<ScreenState>,
    recorder: FlowRecorder,

    shots_taken: usize,
    step: u64,
}

impl<'a> Explorer<'a> {
    pub fn new(config: ExplorerConfig, driver: &'a mut dyn ActionDriver) -> Self {
        Self {
            config,
            driver,
            cancel: CancelToken::new(),
            tracer: TraceLogger::disabled(),
            screenshots_dir: String::new(),
            frontier: Frontier::new(),
            screens: Vec::new(),
            recorder: FlowRecorder::new(),
            shots_taken: 0,
            step: 0,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    /// Directory recorded in the run as the home of captured screenshots.
    pub fn with_screenshots_dir(mut self, dir: &str) -> Self {
        self.screenshots_dir = dir.to_string();
        self
    }

    /// Explore from the screen currently showing and return everything seen.
    ///
    /// Never fails: a run stopped by cancellation returns its partial logs
    /// with `RunOutcome::Cancelled`.
    pub fn run(mut self) -> ExplorationRun {
        let started_at = Utc::now();
        let clock = Instant::now();

        info!(
            app_id = %self.config.app_id,
            platform = %self.config.platform,
            max_depth = self.config.max_depth,
            "starting UI exploration"
        );

        let outcome = self.traverse();
        let elapsed_ms = clock.elapsed().as_millis() as u64;

        info!(
            screens = self.screens.len(),
            actions = self.frontier.len(),
            flows = self.recorder.len(),
            elapsed_ms,
            outcome = %outcome,
            "exploration finished"
        );

        ExplorationRun {
            app_id: self.config.app_id,
            platform: self.config.platform,
            max_depth: self.config.max_depth,
            started_at,
            elapsed_ms,
            outcome,
            screens: self.screens,
            flows: self.recorder.into_records(),
            frontier: self.frontier,
            screenshots_dir: self.screenshots_dir,
        }
    }

    fn traverse(&mut self) -> RunOutcome {
        let mut stack: Vec<Frame> = Vec::new();

        if self.cancelled(0) {
            return RunOutcome::Cancelled;
        }
        if let Some(root) = self.observe(0) {
            stack.push(root);
        }

        while let Some(frame) = stack.last_mut() {
            let depth = frame.depth;
            if self.cancelled(depth) {
                return RunOutcome::Cancelled;
            }

            let Some((element, identity)) = frame.pending.pop_front() else {
                // Screen exhausted: undo the activation that opened it.
                stack.pop();
                if let Some(parent) = stack.last() {
                    let parent_depth = parent.depth;
                    self.navigate_back(parent_depth);
                }
                continue;
            };
            let from_screen = frame.screen_ref.clone();

            // Siblings or deeper screens may have claimed this identity since
            // the screen was observed.
            if !self.frontier.insert(identity.clone()) {
                continue;
            }

            if let Some(child) = self.try_element(&element, identity, &from_screen, depth) {
                stack.push(child);
            }
        }

        RunOutcome::Completed
    }

    /// Observe the current screen; `None` when nothing can be explored from
    /// it (depth exceeded or observation failed).
    fn observe(&mut self, depth: usize) -> Option<Frame> {
        if depth > self.config.max_depth {
            return None;
        }

        info!(depth, "exploring screen");

        let raw = match self.driver.capture_snapshot() {
            Ok(raw) => raw,
            Err(e) => {
                self.fault(depth, None, ExploreFault::ObservationFailed(e));
                return None;
            }
        };

        let elements = match parse(&raw) {
            Ok(elements) => elements,
            Err(e) => {
                self.fault(depth, None, ExploreFault::SnapshotUnavailable(e));
                return None;
            }
        };

        let screen_ref = self.next_shot_name(&format!("screen_depth{}", depth));
        let artifact = self.screenshot(depth, &screen_ref);
        let state = ScreenState::new(depth, Utc::now(), screen_ref.clone(), artifact, elements);

        let pending: VecDeque<_> = state
            .elements
            .iter()
            .map(|e| (e.clone(), identify(e)))
            .filter(|(_, identity)| !self.frontier.contains(identity))
            .collect();

        info!(
            depth,
            screen = %screen_ref,
            clickable = state.elements.len(),
            unvisited = pending.len(),
            "found clickable elements"
        );
        self.trace(
            TraceEvent::now(self.step, depth, TraceKind::ScreenObserved)
                .with_screen(&screen_ref)
                .with_detail(format!("{} unvisited of {}", pending.len(), state.elements.len())),
        );

        self.screens.push(state);

        Some(Frame {
            screen_ref,
            depth,
            pending,
        })
    }

    /// Activate one element. Returns the frame of the screen it opened when
    /// the traversal should descend into it; otherwise the screen has
    /// already been restored.
    fn try_element(
        &mut self,
        element: &Element,
        identity: ElementIdentity,
        from_screen: &str,
        depth: usize,
    ) -> Option<Frame> {
        info!(depth, identity = %identity, "tapping");
        self.trace(
            TraceEvent::now(self.step, depth, TraceKind::ActivationAttempted)
                .with_screen(from_screen)
                .with_identity(&identity),
        );

        let result = match Locator::for_element(element) {
            Some(locator) => self.driver.activate(&locator),
            None => Err(DriverError::NoLocator {
                identity: identity.to_string(),
            }),
        };

        if let Err(source) = result {
            let fault = ExploreFault::ActivationFailed {
                identity: identity.to_string(),
                source,
            };
            self.fault(depth, Some(from_screen), fault);
            return None;
        }

        thread::sleep(self.config.settle);

        let to_screen = self.next_shot_name(&format!("after_tap_{}", name_fragment(&identity)));
        self.screenshot(depth, &to_screen);

        self.recorder
            .record(from_screen, &to_screen, identity.clone(), depth, element.clone());
        self.trace(
            TraceEvent::now(self.step, depth, TraceKind::FlowRecorded)
                .with_screen(&to_screen)
                .with_identity(&identity),
        );

        if depth < self.config.max_depth && !self.cancel.is_cancelled() {
            if let Some(child) = self.observe(depth + 1) {
                return Some(child);
            }
        }

        if !self.cancel.is_cancelled() {
            self.navigate_back(depth);
        }
        None
    }

    fn navigate_back(&mut self, depth: usize) {
        info!(depth, "going back");
        if let Err(e) = self.driver.navigate_back() {
            self.fault(depth, None, ExploreFault::BackNavigationFailed(e));
        }
        self.trace(TraceEvent::now(self.step, depth, TraceKind::BackNavigation));
        thread::sleep(self.config.back_settle);
    }

    /// Capture a screenshot; failures are logged and leave no artifact.
    fn screenshot(&mut self, depth: usize, name: &str) -> Option<String> {
        match self.driver.capture_screenshot(name) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!(depth, screenshot = name, "screenshot failed: {}", e);
                None
            }
        }
    }

    fn next_shot_name(&mut self, prefix: &str) -> String {
        self.shots_taken += 1;
        format!("{}_{:04}", prefix, self.shots_taken)
    }

    fn cancelled(&mut self, depth: usize) -> bool {
        if !self.cancel.is_cancelled() {
            return false;
        }
        warn!(depth, "exploration interrupted");
        self.trace(TraceEvent::now(self.step, depth, TraceKind::Cancelled));
        true
    }

    fn fault(&mut self, depth: usize, screen: Option<&str>, fault: ExploreFault) {
        warn!(depth, kind = fault.kind(), "{}", fault);
        let mut event = TraceEvent::now(self.step, depth, TraceKind::Fault)
            .with_fault(fault.kind())
            .with_detail(&fault);
        if let Some(screen) = screen {
            event = event.with_screen(screen);
        }
        self.trace(event);
    }

    fn trace(&mut self, event: TraceEvent) {
        self.tracer.log(&event);
        self.step += 1;
    }
}

/// Filename-safe, length-capped form of an identity.
fn name_fragment(identity: &ElementIdentity) -> String {
    identity
        .as_str()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .take(NAME_FRAGMENT_LEN)
        .collect()
}
