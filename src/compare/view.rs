//! Comparison view state and slider geometry.

use serde::{Deserialize, Serialize};

pub const INITIAL_SLIDER_PERCENT: f64 = 50.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    SideBySide,
    Slider,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub mode: ViewMode,
    /// Share of the processed layer revealed from the left, in `[0, 100]`
    pub slider_percent: f64,
}

impl Default for ComparisonView {
    fn default() -> Self {
        Self {
            mode: ViewMode::default(),
            slider_percent: INITIAL_SLIDER_PERCENT,
        }
    }
}

/// Horizontal extent of the slider container in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ContainerBounds {
    pub left: f64,
    pub width: f64,
}

/// Pointer and touch input forwarded from the slider container.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerEvent {
    MouseDown,
    MouseMove { x: f64 },
    MouseUp,
    MouseLeave,
    TouchStart,
    /// `x` of the first touch point
    TouchMove { x: f64 },
    TouchEnd,
}

impl PointerEvent {
    pub fn starts_drag(&self) -> bool {
        matches!(self, Self::MouseDown | Self::TouchStart)
    }

    pub fn ends_drag(&self) -> bool {
        matches!(self, Self::MouseUp | Self::MouseLeave | Self::TouchEnd)
    }

    pub fn position(&self) -> Option<f64> {
        match self {
            Self::MouseMove { x } | Self::TouchMove { x } => Some(*x),
            _ => None,
        }
    }
}

/// Maps a pointer `x` to a reveal percentage, clamped to `[0, 100]`.
///
/// Returns `None` for a collapsed container or a non-finite coordinate.
pub fn reveal_percent(x: f64, bounds: ContainerBounds) -> Option<f64> {
    if !x.is_finite() || !bounds.left.is_finite() || !bounds.width.is_finite() || bounds.width <= 0.0 {
        return None;
    }
    Some(((x - bounds.left) / bounds.width * 100.0).clamp(0.0, 100.0))
}
