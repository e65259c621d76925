use crate::landmarks::DetectionResult;
use crate::prelude::{OverlayError, OverlayResult, VideoFrame};
use crate::render::overlay::{FrameReport, OverlayRenderer};
use crate::render::surface::DrawingSurface;
use crate::session::capture::CaptureSource;
use crate::session::control::{toggle_label, RunFlag, ToggleControl};
use crate::session::detector::HandDetector;
use crate::sync::GestureSink;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{interval_at, Instant as TokioInstant, MissedTickBehavior};

/// Shortest refresh period `run` schedules.
pub const MIN_REFRESH: Duration = Duration::from_millis(1);

/// Owns everything the per-frame loop touches: the detector handle, the
/// run flag, the last seen media time and the cached detections.
pub struct OverlaySession {
    detector: Option<Box<dyn HandDetector>>,
    running: RunFlag,
    last_video_time: Option<f64>,
    results: Option<DetectionResult>,
    renderer: OverlayRenderer,
    control: Option<Box<dyn ToggleControl>>,
    control_missing: bool,
    sinks: Vec<Box<dyn GestureSink>>,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
    clock: Instant,
}

impl OverlaySession {
    pub fn new(renderer: OverlayRenderer) -> Self {
        let metrics = Arc::new(MetricsRecorder::new());
        Self {
            detector: None,
            running: RunFlag::new(),
            last_video_time: None,
            results: None,
            renderer: renderer.with_metrics(metrics.clone()),
            control: None,
            control_missing: false,
            sinks: Vec::new(),
            metrics,
            logger: LogManager::new("gesturecore::session"),
            clock: Instant::now(),
        }
    }

    /// Loads the detector. A failed load is logged and leaves the session
    /// without a detector; start requests are then refused.
    pub async fn initialize<F, Fut>(&mut self, loader: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = OverlayResult<Box<dyn HandDetector>>>,
    {
        match loader().await {
            Ok(detector) => {
                self.detector = Some(detector);
                self.logger.record("hand detector ready");
                true
            }
            Err(err) => {
                self.logger.failure("initializing hand detector", &err);
                false
            }
        }
    }

    /// Binds the start/stop control. Passing `None` records that the host has
    /// no such control; [`OverlaySession::toggle`] is then disabled.
    pub fn attach_control(&mut self, control: Option<Box<dyn ToggleControl>>) {
        match control {
            Some(mut control) => {
                control.set_label(toggle_label(self.is_running()));
                self.control = Some(control);
                self.control_missing = false;
            }
            None => {
                self.logger
                    .warn("toggle control not found; camera toggle disabled");
                self.control = None;
                self.control_missing = true;
            }
        }
    }

    /// Adds a consumer of per-frame gesture data. Sinks are fed in
    /// attachment order.
    pub fn attach_sink(&mut self, sink: Box<dyn GestureSink>) {
        self.sinks.push(sink);
    }

    pub fn is_ready(&self) -> bool {
        self.detector.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Handle for stopping the loop from outside, e.g. a signal handler.
    pub fn run_flag(&self) -> RunFlag {
        self.running.clone()
    }

    pub fn cached_detections(&self) -> Option<&DetectionResult> {
        self.results.as_ref()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Flips between running and stopped. Returns the new running state.
    ///
    /// Without a loaded detector, with unsupported capture or after the host
    /// reported a missing control the toggle is inert.
    pub fn toggle<C: CaptureSource + ?Sized>(&mut self, capture: &mut C) -> OverlayResult<bool> {
        if self.control_missing {
            return Ok(self.is_running());
        }
        if self.detector.is_none() {
            self.logger
                .record("hand detector still loading; toggle ignored");
            return Ok(self.is_running());
        }
        if !capture.is_supported() {
            self.logger
                .warn("camera capture is not supported on this platform");
            return Ok(false);
        }

        if self.is_running() {
            self.stop(capture);
        } else {
            self.start(capture)?;
        }
        Ok(self.is_running())
    }

    pub fn start<C: CaptureSource + ?Sized>(&mut self, capture: &mut C) -> OverlayResult<()> {
        if self.detector.is_none() {
            return Err(OverlayError::DetectorUnavailable);
        }
        if !capture.is_supported() {
            return Err(OverlayError::CaptureUnsupported);
        }
        capture.open()?;
        self.last_video_time = None;
        self.running.set(true);
        self.update_label();
        Ok(())
    }

    pub fn stop<C: CaptureSource + ?Sized>(&mut self, capture: &mut C) {
        self.running.clear();
        capture.close();
        self.update_label();
    }

    /// Stops capture and releases the detector, cache and sinks.
    pub fn dispose<C: CaptureSource + ?Sized>(&mut self, capture: &mut C) {
        self.stop(capture);
        self.detector = None;
        self.results = None;
        self.last_video_time = None;
        self.sinks.clear();
    }

    fn update_label(&mut self) {
        let label = toggle_label(self.running.is_running());
        if let Some(control) = self.control.as_mut() {
            control.set_label(label);
        }
    }

    /// Runs one iteration: detect if the media time moved, then render.
    ///
    /// Returns `None` when the capture has no frame yet.
    pub fn tick<C, S>(&mut self, capture: &mut C, surface: &mut S) -> Option<FrameReport>
    where
        C: CaptureSource + ?Sized,
        S: DrawingSurface + ?Sized,
    {
        self.metrics.record_tick();
        let frame = capture.current_frame()?;
        if frame.size.is_empty() {
            return None;
        }
        surface.resize(frame.size);

        if self.last_video_time != Some(frame.current_time) {
            self.last_video_time = Some(frame.current_time);
            let now_ms = self.clock.elapsed().as_secs_f64() * 1000.0;
            self.refresh_detections(&frame, now_ms);
        } else {
            self.metrics.record_deduplicated();
        }

        let report = self
            .renderer
            .render(surface, &frame, self.results.as_ref());
        self.publish(&report);
        Some(report)
    }

    fn refresh_detections(&mut self, frame: &VideoFrame, now_ms: f64) {
        let Some(detector) = self.detector.as_mut() else {
            self.results = None;
            return;
        };
        self.metrics.record_detection();
        match detector.detect_for_frame(frame, now_ms) {
            Ok(result) => self.results = Some(result),
            Err(err) => {
                self.metrics.record_detector_error();
                self.logger.failure("hand detection failed", &err);
                self.results = None;
            }
        }
    }

    fn publish(&mut self, report: &FrameReport) {
        for sink in self.sinks.iter_mut() {
            if let Err(err) = sink.publish(report) {
                self.logger.failure("publishing gesture data", &err);
            }
        }
    }

    /// Ticks once per refresh interval while the run flag is set.
    ///
    /// The flag is checked before every iteration; `limit` caps the number of
    /// iterations for headless runs. Refresh periods below one millisecond are
    /// raised to it. Returns the number of ticks performed.
    pub async fn run<C, S>(
        &mut self,
        capture: &mut C,
        surface: &mut S,
        refresh: Duration,
        limit: Option<usize>,
    ) -> usize
    where
        C: CaptureSource + ?Sized,
        S: DrawingSurface + ?Sized,
    {
        let refresh = refresh.max(MIN_REFRESH);
        let mut refresh_timer = interval_at(TokioInstant::now() + refresh, refresh);
        refresh_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let within_limit = |ticks: usize| limit.map_or(true, |max| ticks < max);
        let mut ticks = 0;
        while self.is_running() && within_limit(ticks) {
            self.tick(capture, surface);
            ticks += 1;
            if !self.is_running() || !within_limit(ticks) {
                break;
            }
            refresh_timer.tick().await;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::FrameSize;
    use crate::render::recording::{DrawCommand, RecordingSurface};
    use crate::testing::{detections, open_palm};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedCapture {
        times: Vec<f64>,
        cursor: usize,
        size: FrameSize,
        supported: bool,
        opened: bool,
    }

    impl ScriptedCapture {
        fn new(times: &[f64]) -> Self {
            Self {
                times: times.to_vec(),
                cursor: 0,
                size: FrameSize::new(640, 480),
                supported: true,
                opened: false,
            }
        }
    }

    impl CaptureSource for ScriptedCapture {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn open(&mut self) -> OverlayResult<()> {
            self.opened = true;
            Ok(())
        }

        fn current_frame(&mut self) -> Option<VideoFrame> {
            let time = *self.times.get(self.cursor).or(self.times.last())?;
            self.cursor += 1;
            Some(VideoFrame::new(self.size, time))
        }

        fn close(&mut self) {
            self.opened = false;
        }
    }

    struct LabelLog(Arc<Mutex<Vec<String>>>);

    impl ToggleControl for LabelLog {
        fn set_label(&mut self, label: &str) {
            self.0.lock().unwrap().push(label.to_string());
        }
    }

    fn counting_detector(calls: Arc<AtomicUsize>) -> Box<dyn HandDetector> {
        Box::new(move |_frame: &VideoFrame, _ts: f64| -> OverlayResult<DetectionResult> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(detections(vec![open_palm(0.3)]))
        })
    }

    async fn ready_session(calls: Arc<AtomicUsize>) -> OverlaySession {
        let mut session = OverlaySession::new(OverlayRenderer::default());
        let detector = counting_detector(calls);
        assert!(session.initialize(move || async move { Ok::<_, OverlayError>(detector) }).await);
        session
    }

    #[tokio::test]
    async fn failed_initialization_leaves_session_disabled() {
        let mut session = OverlaySession::new(OverlayRenderer::default());
        let loaded = session
            .initialize(|| async {
                Err::<Box<dyn HandDetector>, _>(OverlayError::DetectorInit("model missing".into()))
            })
            .await;
        assert!(!loaded);
        assert!(!session.is_ready());

        let mut capture = ScriptedCapture::new(&[0.0]);
        assert!(!session.toggle(&mut capture).unwrap());
        assert!(!capture.opened);
        assert!(matches!(
            session.start(&mut capture),
            Err(OverlayError::DetectorUnavailable)
        ));
    }

    #[tokio::test]
    async fn toggle_updates_control_label() {
        let labels = Arc::new(Mutex::new(Vec::new()));
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        session.attach_control(Some(Box::new(LabelLog(labels.clone()))));

        let mut capture = ScriptedCapture::new(&[0.0]);
        assert!(session.toggle(&mut capture).unwrap());
        assert!(capture.opened);
        assert!(!session.toggle(&mut capture).unwrap());
        assert!(!capture.opened);

        assert_eq!(
            *labels.lock().unwrap(),
            vec!["START CAMERA", "STOP CAMERA", "START CAMERA"]
        );
    }

    #[tokio::test]
    async fn missing_control_disables_toggle() {
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        session.attach_control(None);
        let mut capture = ScriptedCapture::new(&[0.0]);
        assert!(!session.toggle(&mut capture).unwrap());
        assert!(!capture.opened);
    }

    #[tokio::test]
    async fn unsupported_capture_keeps_toggle_inert() {
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        let mut capture = ScriptedCapture::new(&[0.0]);
        capture.supported = false;
        assert!(!session.toggle(&mut capture).unwrap());
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn stalled_media_time_skips_detection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = ready_session(calls.clone()).await;
        let mut capture = ScriptedCapture::new(&[0.1, 0.1, 0.2]);
        let mut surface = RecordingSurface::default();

        for _ in 0..3 {
            let report = session.tick(&mut capture, &mut surface).unwrap();
            assert_eq!(report.hands.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let metrics = session.metrics();
        assert_eq!(metrics.detector_calls, 2);
        assert_eq!(metrics.deduplicated, 1);
        assert_eq!(metrics.frames_rendered, 3);
        assert_eq!(surface.size(), FrameSize::new(640, 480));
    }

    #[tokio::test]
    async fn new_result_replaces_cached_one() {
        let mut session = OverlaySession::new(OverlayRenderer::default());
        let mut frames = 0;
        let detector: Box<dyn HandDetector> = Box::new(move |_frame: &VideoFrame, _ts: f64| -> OverlayResult<DetectionResult> {
            frames += 1;
            if frames == 1 {
                Ok(detections(vec![open_palm(0.3), open_palm(0.7)]))
            } else {
                Ok(DetectionResult::empty())
            }
        });
        session.initialize(move || async move { Ok::<_, OverlayError>(detector) }).await;

        let mut capture = ScriptedCapture::new(&[0.1, 0.2]);
        let mut surface = RecordingSurface::default();
        session.tick(&mut capture, &mut surface);
        assert_eq!(session.cached_detections().unwrap().len(), 2);

        let report = session.tick(&mut capture, &mut surface).unwrap();
        assert!(session.cached_detections().unwrap().is_empty());
        assert!(report.hands.is_empty());
        assert!(surface.texts().is_empty());
    }

    #[tokio::test]
    async fn missing_frame_skips_everything() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut session = ready_session(calls.clone()).await;
        let mut capture = ScriptedCapture::new(&[]);
        let mut surface = RecordingSurface::default();
        assert!(session.tick(&mut capture, &mut surface).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(surface.commands().is_empty());
    }

    #[tokio::test]
    async fn detector_error_renders_background_only() {
        let mut session = OverlaySession::new(OverlayRenderer::default());
        session
            .initialize(|| async {
                let detector: Box<dyn HandDetector> =
                    Box::new(|_frame: &VideoFrame, _ts: f64| -> OverlayResult<DetectionResult> {
                        Err(OverlayError::Detection("backend lost".into()))
                    });
                Ok::<_, OverlayError>(detector)
            })
            .await;

        let mut capture = ScriptedCapture::new(&[0.1]);
        let mut surface = RecordingSurface::default();
        let report = session.tick(&mut capture, &mut surface).unwrap();
        assert!(report.hands.is_empty());
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Clear, DrawCommand::Frame { current_time: 0.1 }]
        );
        assert_eq!(session.metrics().detector_errors, 1);
    }

    #[tokio::test]
    async fn sink_failure_does_not_interrupt_rendering() {
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        let published = Arc::new(AtomicUsize::new(0));
        let seen = published.clone();
        session.attach_sink(Box::new(move |_report: &FrameReport| -> OverlayResult<()> {
            seen.fetch_add(1, Ordering::SeqCst);
            Err(OverlayError::Sink("endpoint offline".into()))
        }));

        let mut capture = ScriptedCapture::new(&[0.1, 0.2]);
        let mut surface = RecordingSurface::default();
        assert!(session.tick(&mut capture, &mut surface).is_some());
        assert!(session.tick(&mut capture, &mut surface).is_some());
        assert_eq!(published.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn every_sink_sees_each_report() {
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["first", "second"] {
            let order = order.clone();
            session.attach_sink(Box::new(move |report: &FrameReport| -> OverlayResult<()> {
                order.lock().unwrap().push((name, report.hands.len()));
                Ok(())
            }));
        }

        let mut capture = ScriptedCapture::new(&[0.1]);
        session.tick(&mut capture, &mut RecordingSurface::default());
        assert_eq!(*order.lock().unwrap(), vec![("first", 1), ("second", 1)]);
    }

    #[tokio::test]
    async fn run_stops_when_flag_is_cleared() {
        let mut session = OverlaySession::new(OverlayRenderer::default());
        let flag = session.run_flag();
        let mut calls = 0;
        let detector: Box<dyn HandDetector> = Box::new(move |_frame: &VideoFrame, _ts: f64| -> OverlayResult<DetectionResult> {
            calls += 1;
            if calls == 3 {
                flag.clear();
            }
            Ok(DetectionResult::empty())
        });
        session.initialize(move || async move { Ok::<_, OverlayError>(detector) }).await;

        let mut capture = ScriptedCapture::new(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        let mut surface = RecordingSurface::default();
        session.start(&mut capture).unwrap();
        let ticks = session
            .run(&mut capture, &mut surface, Duration::from_millis(1), None)
            .await;
        assert_eq!(ticks, 3);
        assert!(!session.is_running());
    }

    #[tokio::test]
    async fn run_honours_tick_limit() {
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        let mut capture = ScriptedCapture::new(&[0.1, 0.2, 0.3]);
        let mut surface = RecordingSurface::default();
        session.start(&mut capture).unwrap();
        let ticks = session
            .run(&mut capture, &mut surface, Duration::from_millis(1), Some(4))
            .await;
        assert_eq!(ticks, 4);
        assert!(session.is_running());
        assert_eq!(session.metrics().deduplicated, 1);
    }

    #[tokio::test]
    async fn zero_refresh_period_is_clamped() {
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        let mut capture = ScriptedCapture::new(&[0.1, 0.2, 0.3]);
        let mut surface = RecordingSurface::default();
        session.start(&mut capture).unwrap();
        let ticks = session
            .run(&mut capture, &mut surface, Duration::ZERO, Some(3))
            .await;
        assert_eq!(ticks, 3);
    }

    #[tokio::test]
    async fn reaching_the_limit_returns_without_waiting_for_the_next_refresh() {
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        let mut capture = ScriptedCapture::new(&[0.1]);
        let mut surface = RecordingSurface::default();
        session.start(&mut capture).unwrap();
        let ticks = tokio::time::timeout(
            Duration::from_secs(5),
            session.run(&mut capture, &mut surface, Duration::from_secs(3600), Some(1)),
        )
        .await
        .expect("run should return as soon as the limit is hit");
        assert_eq!(ticks, 1);
    }

    #[tokio::test]
    async fn dispose_releases_detector() {
        let mut session = ready_session(Arc::new(AtomicUsize::new(0))).await;
        let mut capture = ScriptedCapture::new(&[0.1]);
        session.start(&mut capture).unwrap();
        session.tick(&mut capture, &mut RecordingSurface::default());
        session.dispose(&mut capture);
        assert!(!session.is_ready());
        assert!(!session.is_running());
        assert!(session.cached_detections().is_none());
    }
}
