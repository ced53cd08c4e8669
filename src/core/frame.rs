use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Outer chart size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Per-side offsets used for position, margin and padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

impl Insets {
    #[must_use]
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn validate(self, name: &str) -> ChartResult<()> {
        for (side, value) in [
            ("top", self.top),
            ("left", self.left),
            ("bottom", self.bottom),
            ("right", self.right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name}.{side} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn inset(self, insets: Insets) -> Self {
        let top = self.top + insets.top;
        let left = self.left + insets.left;
        let bottom = self.bottom - insets.bottom;
        let right = self.right - insets.right;
        Self {
            top,
            left,
            bottom,
            right,
            width: right - left,
            height: bottom - top,
        }
    }

    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        other.top >= self.top
            && other.left >= self.left
            && other.bottom <= self.bottom
            && other.right <= self.right
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (
            self.left + (self.right - self.left) * 0.5,
            self.top + (self.bottom - self.top) * 0.5,
        )
    }

    fn ensure_positive(self, frame: &'static str) -> ChartResult<Self> {
        let spans_positive = self.right - self.left > 0.0 && self.bottom - self.top > 0.0;
        if !(self.width > 0.0) || !(self.height > 0.0) || !spans_positive {
            return Err(ChartError::InvalidFrame {
                frame,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// The three nested coordinate frames of a chart: `view ⊇ axis ⊇ data`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frames {
    pub view: Rect,
    pub axis: Rect,
    pub data: Rect,
}

/// Derives the view, axis and data frames.
///
/// `axis` insets `view` by `margin`, and `data` insets `axis` by `padding`.
/// Any frame with a non-positive width or height is a configuration error.
pub fn compute_frames(
    size: Size,
    position: Insets,
    margin: Insets,
    padding: Insets,
) -> ChartResult<Frames> {
    if !size.width.is_finite() || !size.height.is_finite() {
        return Err(ChartError::InvalidFrame {
            frame: "view",
            width: size.width,
            height: size.height,
        });
    }
    position.validate("position")?;
    margin.validate("margin")?;
    padding.validate("padding")?;

    let view = Rect {
        top: position.top,
        left: position.left,
        bottom: size.height - position.bottom,
        right: size.width - position.right,
        width: size.width,
        height: size.height,
    }
    .ensure_positive("view")?;
    let axis = view.inset(margin).ensure_positive("axis")?;
    let data = axis.inset(padding).ensure_positive("data")?;

    Ok(Frames { view, axis, data })
}
