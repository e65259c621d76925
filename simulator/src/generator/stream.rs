use crate::generator::profile::{build_hand, ScriptedHand};
use crate::workflow::config::WorkflowConfig;
use gesturecore::landmarks::{DetectedHand, DetectionResult};
use gesturecore::prelude::{FrameSize, OverlayError, OverlayResult, VideoFrame};
use gesturecore::session::{CaptureSource, HandDetector};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

/// Camera stand-in that advances its media clock once per poll.
///
/// With `stall_every = Some(n)` every n-th poll repeats the previous
/// timestamp, the way a stalled webcam does.
pub struct SyntheticCapture {
    size: FrameSize,
    frame_interval: f64,
    stall_every: Option<usize>,
    polls: usize,
    media_time: f64,
    open: bool,
}

impl SyntheticCapture {
    pub fn new(config: &WorkflowConfig) -> Self {
        Self {
            size: config.frame_size(),
            frame_interval: config.refresh_interval().as_secs_f64(),
            stall_every: config.stall_every.filter(|&n| n > 0),
            polls: 0,
            media_time: 0.0,
            open: false,
        }
    }
}

impl CaptureSource for SyntheticCapture {
    fn open(&mut self) -> OverlayResult<()> {
        if self.size.is_empty() {
            return Err(OverlayError::Capture("frame size must be non-zero".into()));
        }
        self.open = true;
        self.polls = 0;
        self.media_time = 0.0;
        Ok(())
    }

    fn current_frame(&mut self) -> Option<VideoFrame> {
        if !self.open {
            return None;
        }
        let stalled = self
            .stall_every
            .map_or(false, |n| self.polls > 0 && self.polls % n == 0);
        if !stalled {
            self.media_time += self.frame_interval;
        }
        self.polls += 1;
        Some(VideoFrame::new(self.size, self.media_time))
    }

    fn close(&mut self) {
        self.open = false;
    }
}

/// Detector stand-in producing the scripted hands, one animation step per call.
pub struct ScriptedDetector {
    hands: Vec<ScriptedHand>,
    rng: StdRng,
    jitter: f32,
    step: usize,
}

impl ScriptedDetector {
    pub fn new(config: &WorkflowConfig) -> Self {
        Self {
            hands: config
                .hands
                .iter()
                .take(config.detector.num_hands)
                .cloned()
                .collect(),
            rng: StdRng::seed_from_u64(config.seed),
            jitter: config.jitter,
            step: 0,
        }
    }
}

impl HandDetector for ScriptedDetector {
    fn detect_for_frame(
        &mut self,
        _frame: &VideoFrame,
        _timestamp_ms: f64,
    ) -> OverlayResult<DetectionResult> {
        let step = self.step;
        self.step += 1;
        let hands = self
            .hands
            .iter()
            .map(|spec| {
                DetectedHand::new(
                    build_hand(spec, step, &mut self.rng, self.jitter),
                    spec.handedness,
                )
                .with_score(spec.score)
            })
            .collect();
        Ok(DetectionResult::new(hands))
    }
}

/// Loads the scripted detector the way a model-backed one would be loaded.
pub async fn load_detector(config: &WorkflowConfig) -> OverlayResult<Box<dyn HandDetector>> {
    let options = &config.detector;
    if config.fail_detector_load {
        return Err(OverlayError::DetectorInit(format!(
            "could not load model asset {}",
            options.model_asset_path
        )));
    }
    tokio::task::yield_now().await;
    info!(
        "loaded hand landmarker {} ({:?} delegate, {:?} mode, {} hands)",
        options.model_asset_path, options.delegate, options.running_mode, options.num_hands
    );
    Ok(Box::new(ScriptedDetector::new(config)))
}
