use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const START_LABEL: &str = "START CAMERA";
pub const STOP_LABEL: &str = "STOP CAMERA";

/// UI element that starts and stops capture and shows the current state.
pub trait ToggleControl {
    fn set_label(&mut self, label: &str);
}

/// Label the toggle should show for a given running state.
pub fn toggle_label(running: bool) -> &'static str {
    if running {
        STOP_LABEL
    } else {
        START_LABEL
    }
}

/// Shared run/stop flag checked by the frame loop before every iteration.
///
/// Clearing it from another task stops rescheduling; the frame in flight
/// still completes.
#[derive(Debug, Clone, Default)]
pub struct RunFlag {
    running: Arc<AtomicBool>,
}

impl RunFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.set(false);
    }
}
