use crate::gesture::DisplaySide;
use crate::render::color::Rgba;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f32,
    pub bold: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Arial".into(),
            size_px: 20.0,
            bold: true,
        }
    }
}

/// Visual parameters for the hand overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub line_width: f32,
    pub joint_radius: f32,
    pub font: FontSpec,
    /// Horizontal gap between the wrist and the label text.
    pub label_offset_x: f32,
    /// Backdrop padding on each side of the text.
    pub label_padding_x: f32,
    /// Distance from the baseline up to the top of the backdrop.
    pub label_rise: f32,
    pub label_box_height: f32,
    pub right_color: Rgba,
    pub left_color: Rgba,
    pub right_backdrop: Rgba,
    pub left_backdrop: Rgba,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_width: 5.0,
            joint_radius: 3.0,
            font: FontSpec::default(),
            label_offset_x: 20.0,
            label_padding_x: 5.0,
            label_rise: 25.0,
            label_box_height: 30.0,
            right_color: Rgba::RED,
            left_color: Rgba::GREEN,
            right_backdrop: Rgba::rgba(100, 66, 66, 0.5),
            left_backdrop: Rgba::rgba(66, 95, 66, 0.5),
        }
    }
}

impl OverlayStyle {
    pub fn color(&self, side: DisplaySide) -> Rgba {
        match side {
            DisplaySide::Right => self.right_color,
            DisplaySide::Left => self.left_color,
        }
    }

    pub fn backdrop(&self, side: DisplaySide) -> Rgba {
        match side {
            DisplaySide::Right => self.right_backdrop,
            DisplaySide::Left => self.left_backdrop,
        }
    }
}
