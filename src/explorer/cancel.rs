use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag checked by the explorer between elements
/// and before each descent.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Route Ctrl-C to a token instead of killing the process, so an
/// interrupted run still writes its partial script and report.
///
/// Only one handler can be installed per process.
pub fn install_interrupt_handler() -> Result<CancelToken, ctrlc::Error> {
    let token = CancelToken::new();
    let handler_token = token.clone();

    ctrlc::set_handler(move || {
        handler_token.cancel();
    })?;

    Ok(token)
}
