use gesturecore::landmarks::DetectionResult;
use gesturecore::prelude::VideoFrame;
use gesturecore::render::{
    DrawingSurface, FrameReport, HandOverlay, OverlayRenderer, RecordingSurface,
};
use gesturecore::session::toggle_label;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry},
        column, row, scrollable, text, Column, Container,
    },
    Alignment, Element, Length, Rectangle, Renderer, Subscription, Task, Theme,
};
use log::{info, warn};
use serde::Deserialize;
use std::time::Duration;
use surface::CanvasSurface;

mod surface;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";
const POLL_INTERVAL: Duration = Duration::from_millis(33);

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Hand Gesture Overlay".into()
}

// Frames are only pulled while the camera is on.
fn application_subscription(state: &Visualizer) -> Subscription<Message> {
    if state.running {
        time::every(POLL_INTERVAL).map(|_| Message::Tick)
    } else {
        Subscription::none()
    }
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

struct Visualizer {
    renderer: OverlayRenderer,
    running: bool,
    overlay: Option<OverlayModel>,
    report: FrameReport,
    synced: Option<Vec<HandOverlay>>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    ToggleCamera,
    OverlayFetched(Result<OverlayModel, String>),
    GesturesSynced(Result<(), String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                renderer: OverlayRenderer::default(),
                running: false,
                overlay: None,
                report: FrameReport::default(),
                synced: None,
                status: "Camera stopped.".into(),
                history: Vec::new(),
            },
            Task::none(),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_overlay(), Message::OverlayFetched),
            Message::ToggleCamera => {
                state.running = !state.running;
                if !state.running {
                    state.overlay = None;
                    state.report = FrameReport::default();
                }
                state.status = if state.running {
                    "Waiting for frames...".into()
                } else {
                    "Camera stopped.".into()
                };
                let label = toggle_label(state.running);
                state.push_history(format!("Camera control -> {}", label));
                Task::none()
            }
            Message::OverlayFetched(Ok(model)) => {
                // a stop may have raced an in-flight fetch
                if !state.running {
                    return Task::none();
                }
                state.report = state.classify(&model);
                state.status = if model.status.is_empty() {
                    format!("{} hand(s) tracked", state.report.hands.len())
                } else {
                    format!("{} | {} hand(s)", model.status, state.report.hands.len())
                };
                state.overlay = Some(model);

                if state.synced.as_ref() == Some(&state.report.hands) {
                    return Task::none();
                }
                state.synced = Some(state.report.hands.clone());
                Task::perform(put_gestures(state.report.clone()), Message::GesturesSynced)
            }
            Message::OverlayFetched(Err(err)) => {
                state.status = format!("Overlay error: {err}");
                Task::none()
            }
            Message::GesturesSynced(Ok(())) => {
                let labels = state
                    .report
                    .hands
                    .iter()
                    .map(|hand| hand.label.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("gesture data synced: {}", labels);
                state.push_history(format!("Synced: {}", labels));
                Task::none()
            }
            Message::GesturesSynced(Err(err)) => {
                warn!("gesture sync failed: {}", err);
                state.push_history(format!("Sync failed: {err}"));
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let toggle = button(toggle_label(state.running))
            .on_press(Message::ToggleCamera)
            .padding(10);

        let hands_list = if state.report.hands.is_empty() {
            Column::new().push(text("No hands detected").size(14))
        } else {
            state
                .report
                .hands
                .iter()
                .fold(Column::new().spacing(4), |col, hand| {
                    col.push(
                        text(format!(
                            "#{} {} (detector: {})",
                            hand.index + 1,
                            hand.label,
                            hand.handedness
                        ))
                        .size(14),
                    )
                })
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let controls = column![
            text("Camera").size(26),
            toggle,
            text(&state.status).size(14),
            text("Gestures").size(18),
            Container::new(hands_list).padding(6),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(160.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(320.0));

        let overlay = Canvas::new(OverlayCanvas {
            renderer: &state.renderer,
            frame: state.overlay.as_ref().and_then(|model| model.frame),
            detections: state.overlay.as_ref().map(|model| &model.detections),
        })
        .width(Length::Fill)
        .height(Length::Fixed(480.0));

        let layout = row![controls, overlay]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Runs the overlay pass headless to obtain the per-hand metrics.
    fn classify(&self, model: &OverlayModel) -> FrameReport {
        match model.frame {
            Some(frame) => {
                let mut surface = RecordingSurface::new(frame.size);
                self.renderer
                    .render(&mut surface, &frame, Some(&model.detections))
            }
            None => FrameReport::default(),
        }
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_overlay() -> Result<OverlayModel, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/overlay"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<OverlayModel>()
        .await
        .map_err(|e| e.to_string())
}

async fn put_gestures(report: FrameReport) -> Result<(), String> {
    let client = reqwest::Client::new();
    let response = client
        .put(format!("{BRIDGE_URL}/gestures"))
        .json(&report)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok(())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OverlayModel {
    #[serde(default)]
    frame: Option<VideoFrame>,
    #[serde(default)]
    detections: DetectionResult,
    #[serde(default)]
    status: String,
}

struct OverlayCanvas<'a> {
    renderer: &'a OverlayRenderer,
    frame: Option<VideoFrame>,
    detections: Option<&'a DetectionResult>,
}

impl canvas::Program<Message> for OverlayCanvas<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        match self.frame {
            Some(video) => {
                let mut surface = CanvasSurface::new(&mut frame, video.size);
                self.renderer.render(&mut surface, &video, self.detections);
            }
            None => {
                CanvasSurface::new(&mut frame, Default::default()).clear();
            }
        }
        vec![frame.into_geometry()]
    }
}
