use crate::prelude::OverlayResult;
use crate::render::overlay::{FrameReport, HandOverlay};
use std::fs;
use std::path::{Path, PathBuf};

/// Best-effort destination for per-frame gesture data.
///
/// Failures are reported to the caller, which logs them and moves on; a sink
/// never affects rendering.
pub trait GestureSink {
    fn publish(&mut self, report: &FrameReport) -> OverlayResult<()>;
}

impl<F> GestureSink for F
where
    F: FnMut(&FrameReport) -> OverlayResult<()>,
{
    fn publish(&mut self, report: &FrameReport) -> OverlayResult<()> {
        self(report)
    }
}

/// Writes the latest report as pretty JSON, rewriting the file only when the
/// per-hand data changes.
pub struct JsonFileSink {
    path: PathBuf,
    last: Option<Vec<HandOverlay>>,
}

impl JsonFileSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            last: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GestureSink for JsonFileSink {
    fn publish(&mut self, report: &FrameReport) -> OverlayResult<()> {
        if self.last.as_ref() == Some(&report.hands) {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(report)?)?;
        self.last = Some(report.hands.clone());
        Ok(())
    }
}
