use crate::generator::profile::{HandPose, ScriptedHand};
use anyhow::{bail, Context};
use gesturecore::gesture::ClassifierConfig;
use gesturecore::landmarks::Handedness;
use gesturecore::prelude::FrameSize;
use gesturecore::render::OverlayStyle;
use gesturecore::session::DetectorOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Highest refresh rate the frame loop is driven at.
pub const MAX_REFRESH_HZ: f32 = 1000.0;
/// Largest landmark noise accepted, in normalized units.
pub const MAX_JITTER: f32 = 0.1;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub width: u32,
    pub height: u32,
    /// Display refresh rate driving the frame loop, in Hz.
    pub refresh_hz: f32,
    /// Ticks to run before stopping; ignored when serving.
    pub frames: usize,
    pub seed: u64,
    /// Uniform landmark noise, in normalized units.
    pub jitter: f32,
    /// Repeat the media timestamp on every n-th poll.
    pub stall_every: Option<usize>,
    pub hands: Vec<ScriptedHand>,
    pub style: OverlayStyle,
    pub classifier: ClassifierConfig,
    pub detector: DetectorOptions,
    /// Simulate a model that fails to load.
    pub fail_detector_load: bool,
    /// Best-effort JSON write-out of the latest gesture data.
    pub sync_file: Option<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            refresh_hz: 60.0,
            frames: 120,
            seed: 0,
            jitter: 0.002,
            stall_every: None,
            hands: vec![
                ScriptedHand {
                    pose: HandPose::Count { fingers: 3 },
                    wrist_x: 0.3,
                    handedness: Handedness::Left,
                    ..Default::default()
                },
                ScriptedHand {
                    pose: HandPose::PinchSweep {
                        min: 0.02,
                        max: 0.42,
                    },
                    wrist_x: 0.7,
                    handedness: Handedness::Right,
                    ..Default::default()
                },
            ],
            style: OverlayStyle::default(),
            classifier: ClassifierConfig::default(),
            detector: DetectorOptions::default(),
            fail_detector_load: false,
            sync_file: None,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.refresh_hz > 0.0 && self.refresh_hz <= MAX_REFRESH_HZ) {
            bail!(
                "refresh_hz must be in (0, {}], got {}",
                MAX_REFRESH_HZ,
                self.refresh_hz
            );
        }
        if !(0.0..=MAX_JITTER).contains(&self.jitter) {
            bail!("jitter must be in [0, {}], got {}", MAX_JITTER, self.jitter);
        }
        Ok(())
    }

    pub fn from_args(width: u32, height: u32, frames: usize) -> Self {
        Self {
            width,
            height,
            frames,
            ..Default::default()
        }
    }

    pub fn frame_size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }

    pub fn refresh_interval(&self) -> Duration {
        let hz = if self.refresh_hz.is_finite() && self.refresh_hz > 0.0 {
            self.refresh_hz.min(MAX_REFRESH_HZ)
        } else {
            60.0
        };
        Duration::from_secs_f32(1.0 / hz)
    }
}
