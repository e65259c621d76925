use serde::Serialize;
use std::sync::Mutex;

/// Counters for the frame loop, shared between the session and its renderer.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub ticks: usize,
    pub detector_calls: usize,
    pub deduplicated: usize,
    pub detector_errors: usize,
    pub frames_rendered: usize,
    pub hands_drawn: usize,
    pub hand_errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_tick(&self) {
        self.update(|m| m.ticks += 1);
    }

    pub fn record_detection(&self) {
        self.update(|m| m.detector_calls += 1);
    }

    pub fn record_deduplicated(&self) {
        self.update(|m| m.deduplicated += 1);
    }

    pub fn record_detector_error(&self) {
        self.update(|m| m.detector_errors += 1);
    }

    pub fn record_frame(&self, hands_drawn: usize, hand_errors: usize) {
        self.update(|m| {
            m.frames_rendered += 1;
            m.hands_drawn += hands_drawn;
            m.hand_errors += hand_errors;
        });
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
