use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(raw: &str) -> ChartResult<Self> {
        let invalid = || ChartError::InvalidConfig(format!("invalid palette color `{raw}`"));
        let hex = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map(|v| f64::from(v) / 255.0);
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => hex.to_owned(),
            _ => return Err(invalid()),
        };
        let red = channel(&expanded[0..2]).map_err(|_| invalid())?;
        let green = channel(&expanded[2..4]).map_err(|_| invalid())?;
        let blue = channel(&expanded[4..6]).map_err(|_| invalid())?;
        let alpha = if expanded.len() == 8 {
            channel(&expanded[6..8]).map_err(|_| invalid())?
        } else {
            1.0
        };
        Ok(Self::rgba(red, green, blue, alpha))
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn ensure_finite(values: &[f64], what: &str) -> ChartResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

/// Line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.x1, self.y1, self.x2, self.y2], "line")?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Filled rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.x, self.y, self.width, self.height], "rect")?;
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// One label in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.y], "text")?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Annular sector centered at (`cx`, `cy`); angles are radians clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcPrimitive {
    pub cx: f64,
    pub cy: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub fill: Color,
}

impl ArcPrimitive {
    /// Point at the middle of the sector.
    #[must_use]
    pub fn centroid(&self) -> (f64, f64) {
        let r = (self.inner_radius + self.outer_radius) * 0.5;
        let a = (self.start_angle + self.end_angle) * 0.5;
        (self.cx + r * a.sin(), self.cy - r * a.cos())
    }

    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(
            &[
                self.cx,
                self.cy,
                self.inner_radius,
                self.outer_radius,
                self.start_angle,
                self.end_angle,
            ],
            "arc",
        )?;
        if self.inner_radius < 0.0 || self.outer_radius < self.inner_radius {
            return Err(ChartError::InvalidData(
                "arc radii must satisfy 0 <= inner <= outer".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Open polyline, used for series paths, leader lines and sankey link centerlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylinePrimitive {
    pub points: Vec<(f64, f64)>,
    pub stroke_width: f64,
    pub color: Color,
}

impl PolylinePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        for &(x, y) in &self.points {
            ensure_finite(&[x, y], "polyline")?;
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "polyline stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Color,
}

impl CirclePrimitive {
    pub fn validate(self) -> ChartResult<()> {
        ensure_finite(&[self.cx, self.cy, self.radius], "circle")?;
        if self.radius < 0.0 {
            return Err(ChartError::InvalidData(
                "circle radius must be >= 0".to_owned(),
            ));
        }
        self.fill.validate()
    }
}

/// Any drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Line(LinePrimitive),
    Rect(RectPrimitive),
    Text(TextPrimitive),
    Arc(ArcPrimitive),
    Polyline(PolylinePrimitive),
    Circle(CirclePrimitive),
}

impl Shape {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Text(text) => text.validate(),
            Self::Arc(arc) => arc.validate(),
            Self::Polyline(polyline) => polyline.validate(),
            Self::Circle(circle) => circle.validate(),
        }
    }
}
