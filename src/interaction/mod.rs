//! Interaction overlays (legend, tooltip, filter) and the shared mount lifecycle.

pub mod filter;
pub mod legend;
pub mod tooltip;

use serde::{Deserialize, Serialize};

use crate::core::{Insets, Rect};

pub use filter::FilterControl;
pub use legend::{Legend, LegendEntry};
pub use tooltip::{PLACEHOLDER, Tooltip, TooltipItem};

/// Lifecycle shared by charts and overlays.
///
/// `Unmounted -> Mounted -> [Filtered <-> Mounted] -> Cleared`; `Cleared`
/// is re-entered through a fresh mount.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MountState {
    #[default]
    Unmounted,
    Mounted,
    Filtered(String),
    Cleared,
}

impl MountState {
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted | Self::Filtered(_))
    }

    /// State after binding data with `filter` (`None` or `"All"` means unfiltered).
    #[must_use]
    pub fn after_bind(filter: Option<&str>) -> Self {
        match filter {
            Some(value) if value != crate::core::FILTER_ALL => Self::Filtered(value.to_owned()),
            _ => Self::Mounted,
        }
    }
}

/// Interaction input routed to a chart instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartEvent {
    /// Pointer entered a data element (bar, point, arc, node).
    ElementEnter(String),
    ElementLeave(String),
    /// Pointer entered a legend entry, by its label.
    LegendEnter(String),
    LegendLeave(String),
    /// Filter control changed to the given option.
    FilterChanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPosition {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalPosition {
    Left,
    Center,
    #[default]
    Right,
}

fn default_item_size() -> f64 {
    12.0
}

fn default_font_size() -> f64 {
    12.0
}

/// Box geometry shared by legend, tooltip and filter overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_item_size")]
    pub itemsize: f64,
    #[serde(default = "default_font_size")]
    pub fontsize: f64,
    #[serde(default)]
    pub padding: Insets,
    #[serde(default)]
    pub vposition: VerticalPosition,
    #[serde(default)]
    pub hposition: HorizontalPosition,
}

impl OverlayConfig {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            itemsize: default_item_size(),
            fontsize: default_font_size(),
            padding: Insets::default(),
            vposition: VerticalPosition::default(),
            hposition: HorizontalPosition::default(),
        }
    }

    /// Top-left corner of the overlay box inside `container`.
    #[must_use]
    pub fn origin(&self, container: Rect, margin: Insets) -> (f64, f64) {
        let x = match self.hposition {
            HorizontalPosition::Left => container.left + margin.left + self.padding.left,
            HorizontalPosition::Right => {
                container.width - margin.right - self.padding.right - self.width
            }
            HorizontalPosition::Center => (container.width - self.width) / 2.0,
        };
        let y = match self.vposition {
            VerticalPosition::Top => container.top + margin.top + self.padding.top,
            VerticalPosition::Bottom => {
                container.height - margin.bottom - self.padding.bottom - self.height
            }
            VerticalPosition::Center => (container.height - self.height) / 2.0,
        };
        (x, y)
    }
}
