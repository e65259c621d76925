use log::{debug, error, info, warn};

/// Thin wrapper over the `log` facade that tags records with a component target.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn record(&self, message: &str) {
        info!(target: self.target, "{}", message);
    }

    pub fn trace_frame(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }

    pub fn failure(&self, context: &str, err: &dyn std::error::Error) {
        error!(target: self.target, "{}: {}", context, err);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("gesturecore")
    }
}
