use crate::gui_bridge::model::OverlayModel;
use gesturecore::landmarks::DetectionResult;
use gesturecore::prelude::{OverlayError, OverlayResult, VideoFrame};
use gesturecore::render::FrameReport;
use gesturecore::session::HandDetector;
use gesturecore::sync::GestureSink;
use log::{error, info};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Bridge that hosts the overlay HTTP endpoint and the gesture sync store.
#[derive(Clone, Default)]
pub struct GuiBridge {
    state: Arc<RwLock<OverlayModel>>,
    gestures: Arc<RwLock<Option<FrameReport>>>,
}

impl GuiBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());
        let gestures = self.gestures.clone();
        let gestures_filter = warp::any().map(move || gestures.clone());

        let overlay_route = warp::path("overlay")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<OverlayModel>>| {
                let model = state.read().map(|guard| guard.clone()).unwrap_or_default();
                warp::reply::json(&model)
            });

        let gestures_get = warp::path("gestures")
            .and(warp::get())
            .and(gestures_filter.clone())
            .map(|gestures: Arc<RwLock<Option<FrameReport>>>| {
                let latest = gestures.read().ok().and_then(|guard| guard.clone());
                warp::reply::json(&latest)
            });

        let gestures_put = warp::path("gestures")
            .and(warp::put())
            .and(warp::body::json())
            .and(gestures_filter)
            .map(
                |report: FrameReport, gestures: Arc<RwLock<Option<FrameReport>>>| {
                    let hands = report.hands.len();
                    match gestures.write() {
                        Ok(mut guard) => {
                            *guard = Some(report);
                            warp::reply::with_status(
                                warp::reply::json(&json!({"status": "ok", "hands": hands})),
                                StatusCode::OK,
                            )
                        }
                        Err(_) => warp::reply::with_status(
                            warp::reply::json(&json!({"status": "unavailable"})),
                            StatusCode::SERVICE_UNAVAILABLE,
                        ),
                    }
                },
            );

        overlay_route.or(gestures_get).or(gestures_put)
    }

    /// Serves the routes on a background thread with its own runtime.
    pub fn serve(&self, address: SocketAddr) {
        let routes = self.routes();
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        });
        info!("overlay bridge listening on http://{}", address);
    }

    /// Wraps a detector so every fresh result is mirrored into the bridge.
    pub fn detector_tap(&self, inner: Box<dyn HandDetector>) -> Box<dyn HandDetector> {
        Box::new(DetectorTap {
            inner,
            state: self.state.clone(),
        })
    }

    /// Sink that stores each frame report for the visualizer.
    pub fn report_sink(&self) -> Box<dyn GestureSink> {
        Box::new(ReportSink {
            state: self.state.clone(),
        })
    }

    pub fn publish_status(&self, message: &str) {
        if let Ok(mut guard) = self.state.write() {
            guard.status = message.to_string();
        }
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> OverlayModel {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

struct DetectorTap {
    inner: Box<dyn HandDetector>,
    state: Arc<RwLock<OverlayModel>>,
}

impl HandDetector for DetectorTap {
    fn detect_for_frame(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: f64,
    ) -> OverlayResult<DetectionResult> {
        let result = self.inner.detect_for_frame(frame, timestamp_ms)?;
        if let Ok(mut guard) = self.state.write() {
            guard.frame = Some(*frame);
            guard.detections = result.clone();
        }
        Ok(result)
    }
}

struct ReportSink {
    state: Arc<RwLock<OverlayModel>>,
}

impl GestureSink for ReportSink {
    fn publish(&mut self, report: &FrameReport) -> OverlayResult<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| OverlayError::Sink("bridge state poisoned".into()))?;
        guard.report = report.clone();
        Ok(())
    }
}
