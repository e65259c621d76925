use crate::generator::stream::{load_detector, SyntheticCapture};
use crate::gui_bridge::bridge::GuiBridge;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use gesturecore::prelude::OverlayResult;
use gesturecore::render::{FrameReport, OverlayRenderer, RecordingSurface};
use gesturecore::session::{HandDetector, OverlaySession, ToggleControl};
use gesturecore::sync::JsonFileSink;
use gesturecore::telemetry::MetricsSnapshot;
use log::info;
use std::future::{pending, Future};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct WorkflowResult {
    pub detector_ready: bool,
    pub ticks: usize,
    pub metrics: MetricsSnapshot,
    pub last_report: Option<FrameReport>,
    /// Draw calls issued for the final frame.
    pub draw_commands: usize,
}

/// Camera button stand-in: logs the label and mirrors it to the bridge status.
struct StatusToggle {
    bridge: Option<GuiBridge>,
}

impl ToggleControl for StatusToggle {
    fn set_label(&mut self, label: &str) {
        match &self.bridge {
            Some(bridge) => bridge.publish_status(label),
            None => info!("camera control: {}", label),
        }
    }
}

async fn load_tapped(
    config: &WorkflowConfig,
    bridge: Option<&GuiBridge>,
) -> OverlayResult<Box<dyn HandDetector>> {
    let detector = load_detector(config).await?;
    Ok(match bridge {
        Some(bridge) => bridge.detector_tap(detector),
        None => detector,
    })
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub async fn execute(
        &self,
        bridge: Option<&GuiBridge>,
        limit: Option<usize>,
    ) -> anyhow::Result<WorkflowResult> {
        self.execute_until(bridge, limit, pending::<()>()).await
    }

    /// Drives the overlay session until `limit` ticks have run or `shutdown`
    /// resolves, whichever comes first.
    pub async fn execute_until<F>(
        &self,
        bridge: Option<&GuiBridge>,
        limit: Option<usize>,
        shutdown: F,
    ) -> anyhow::Result<WorkflowResult>
    where
        F: Future<Output = ()>,
    {
        self.config.validate().context("invalid workflow config")?;
        let renderer =
            OverlayRenderer::new(self.config.style.clone(), self.config.classifier.clone());
        let mut session = OverlaySession::new(renderer);
        let detector_ready = session
            .initialize(|| load_tapped(&self.config, bridge))
            .await;

        session.attach_control(Some(Box::new(StatusToggle {
            bridge: bridge.cloned(),
        })));

        let last_report = Arc::new(Mutex::new(None));
        let latest = last_report.clone();
        session.attach_sink(Box::new(move |report: &FrameReport| -> OverlayResult<()> {
            if let Ok(mut guard) = latest.lock() {
                *guard = Some(report.clone());
            }
            Ok(())
        }));
        if let Some(path) = &self.config.sync_file {
            session.attach_sink(Box::new(JsonFileSink::new(path)));
        }
        if let Some(bridge) = bridge {
            session.attach_sink(bridge.report_sink());
        }

        let mut capture = SyntheticCapture::new(&self.config);
        let mut surface = RecordingSurface::new(self.config.frame_size());

        if !detector_ready {
            return Ok(WorkflowResult {
                detector_ready,
                ticks: 0,
                metrics: session.metrics(),
                last_report: None,
                draw_commands: 0,
            });
        }

        let running = session
            .toggle(&mut capture)
            .context("starting synthetic capture")?;
        if running {
            tokio::select! {
                _ = session.run(&mut capture, &mut surface, self.config.refresh_interval(), limit) => {}
                _ = shutdown => info!("shutdown requested; stopping overlay loop"),
            }
        }
        session.dispose(&mut capture);

        let metrics = session.metrics();
        let last_report = last_report.lock().ok().and_then(|guard| guard.clone());
        Ok(WorkflowResult {
            detector_ready,
            ticks: metrics.ticks,
            metrics,
            last_report,
            draw_commands: surface.commands().len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{HandPose, ScriptedHand};
    use gesturecore::gesture::DisplaySide;
    use std::fs;
    use tempfile::tempdir;

    fn quick_config(frames: usize) -> WorkflowConfig {
        let mut cfg = WorkflowConfig::from_args(320, 240, frames);
        cfg.refresh_hz = 1000.0;
        cfg.jitter = 0.0;
        cfg
    }

    #[tokio::test]
    async fn offline_run_ticks_requested_frames() {
        let cfg = quick_config(5);
        let result = Runner::new(cfg.clone())
            .execute(None, Some(cfg.frames))
            .await
            .unwrap();
        assert!(result.detector_ready);
        assert_eq!(result.ticks, 5);
        assert_eq!(result.metrics.frames_rendered, 5);

        let report = result.last_report.unwrap();
        assert_eq!(report.hands.len(), 2);
        assert_eq!(report.hands[0].display_side, DisplaySide::Right);
        assert_eq!(report.hands[0].metrics.finger_count, 3);
        assert_eq!(report.hands[0].label, "Right hand: 3 fingers");
        assert_eq!(report.hands[1].display_side, DisplaySide::Left);
        // clear + frame + two hands of 20 lines, 21 joints, backdrop and label
        assert_eq!(result.draw_commands, 2 + 2 * (20 + 21 + 2));
    }

    #[tokio::test]
    async fn failed_model_load_skips_the_loop() {
        let mut cfg = quick_config(5);
        cfg.fail_detector_load = true;
        let result = Runner::new(cfg).execute(None, Some(5)).await.unwrap();
        assert!(!result.detector_ready);
        assert_eq!(result.ticks, 0);
        assert!(result.last_report.is_none());
    }

    #[tokio::test]
    async fn out_of_range_settings_are_rejected_before_running() {
        let mut fast = quick_config(3);
        fast.refresh_hz = 1.0e12;
        let err = Runner::new(fast).execute(None, Some(3)).await.unwrap_err();
        assert!(format!("{:#}", err).contains("refresh_hz"));

        let mut noisy = quick_config(2);
        noisy.jitter = f32::INFINITY;
        let err = Runner::new(noisy).execute(None, Some(2)).await.unwrap_err();
        assert!(format!("{:#}", err).contains("jitter"));
    }

    #[tokio::test]
    async fn sync_file_receives_latest_gestures() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sync").join("gestures.json");
        let mut cfg = quick_config(3);
        cfg.sync_file = Some(path.clone());
        cfg.hands = vec![ScriptedHand {
            pose: HandPose::Pinch { spread: 0.2 },
            wrist_x: 0.7,
            ..Default::default()
        }];
        Runner::new(cfg).execute(None, Some(3)).await.unwrap();

        let written: FrameReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.hands.len(), 1);
        assert_eq!(written.hands[0].metrics.brightness_level, 109);
    }

    #[tokio::test]
    async fn bridge_sees_detections_and_report() {
        let bridge = GuiBridge::new();
        let cfg = quick_config(2);
        Runner::new(cfg).execute(Some(&bridge), Some(2)).await.unwrap();

        let model = bridge.snapshot();
        assert_eq!(model.detections.len(), 2);
        assert_eq!(model.report.hands.len(), 2);
        assert_eq!(model.status, "START CAMERA");
    }

    #[tokio::test]
    async fn shutdown_future_ends_unbounded_run() {
        let cfg = quick_config(0);
        let result = Runner::new(cfg)
            .execute_until(None, None, async {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            })
            .await
            .unwrap();
        assert!(result.ticks > 0);
    }
}
