use serde::{Deserialize, Serialize};

use crate::core::{
    AccessorSpec, Insets, NodeAlign, RecordKeying, Role, SankeyLayoutConfig, Size, SortDirection,
    StackOrder,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::OverlayConfig;
use crate::render::Color;

/// Chart families with their own aggregation and scene building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartFamily {
    #[serde(alias = "stackedbar")]
    StackedBar,
    Line,
    #[serde(alias = "pie")]
    Doughnut,
    Sankey,
}

impl ChartFamily {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::StackedBar => "stacked-bar",
            Self::Line => "line",
            Self::Doughnut => "doughnut",
            Self::Sankey => "sankey",
        }
    }

    /// Accessor roles the family's aggregation reads.
    #[must_use]
    pub fn required_roles(self) -> &'static [Role] {
        match self {
            Self::StackedBar => &[Role::Group, Role::Subgroup, Role::Value],
            Self::Line => &[Role::Subgroup, Role::X, Role::Y],
            Self::Doughnut => &[Role::Group, Role::Value],
            Self::Sankey => &[Role::Source, Role::Target, Role::Value],
        }
    }

    /// Roles shown by the tooltip, in display order.
    #[must_use]
    pub fn tooltip_roles(self) -> &'static [Role] {
        self.required_roles()
    }

    /// Stacked bars and sankey key records by role; line and doughnut keep field keys.
    #[must_use]
    pub fn keying(self) -> RecordKeying {
        match self {
            Self::StackedBar | Self::Sankey => RecordKeying::ByRole,
            Self::Line | Self::Doughnut => RecordKeying::ByField,
        }
    }

    /// Element prefix a legend entry highlights.
    #[must_use]
    pub fn legend_target_prefix(self) -> &'static str {
        match self {
            Self::StackedBar => "bar-group",
            Self::Line => "series",
            Self::Doughnut => "arc",
            Self::Sankey => "node",
        }
    }
}

fn default_palette() -> Vec<String> {
    [
        "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
        "#bcbd22", "#17becf",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

fn default_opacity() -> f64 {
    0.8
}

fn default_point_radius() -> f64 {
    3.0
}

fn default_inner_ratio() -> f64 {
    0.5
}

fn default_outer_ratio() -> f64 {
    0.8
}

fn default_label_ratio() -> f64 {
    0.85
}

fn default_doughnut_font_size() -> f64 {
    9.6
}

/// Ring geometry as fractions of the axis-frame radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoughnutConfig {
    #[serde(default = "default_inner_ratio")]
    pub inner_ratio: f64,
    #[serde(default = "default_outer_ratio")]
    pub outer_ratio: f64,
    /// Radius of the leader-line bend and label anchor.
    #[serde(default = "default_label_ratio")]
    pub label_ratio: f64,
    #[serde(default = "default_doughnut_font_size")]
    pub fontsize: f64,
}

impl Default for DoughnutConfig {
    fn default() -> Self {
        Self {
            inner_ratio: default_inner_ratio(),
            outer_ratio: default_outer_ratio(),
            label_ratio: default_label_ratio(),
            fontsize: default_doughnut_font_size(),
        }
    }
}

fn default_node_width() -> f64 {
    24.0
}

fn default_node_padding() -> f64 {
    8.0
}

fn default_node_opacity() -> f64 {
    1.0
}

fn default_node_font_size() -> f64 {
    12.0
}

fn default_link_opacity() -> f64 {
    0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SankeyNodeConfig {
    #[serde(default = "default_node_width")]
    pub width: f64,
    #[serde(default = "default_node_padding")]
    pub padding: f64,
    #[serde(default, alias = "alignment")]
    pub align: NodeAlign,
    #[serde(default = "default_node_opacity")]
    pub opacity: f64,
    #[serde(default = "default_node_font_size")]
    pub fontsize: f64,
    #[serde(default)]
    pub sort: Option<SortDirection>,
}

impl Default for SankeyNodeConfig {
    fn default() -> Self {
        Self {
            width: default_node_width(),
            padding: default_node_padding(),
            align: NodeAlign::default(),
            opacity: default_node_opacity(),
            fontsize: default_node_font_size(),
            sort: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SankeyLinkConfig {
    #[serde(default = "default_link_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub sort: Option<SortDirection>,
}

impl Default for SankeyLinkConfig {
    fn default() -> Self {
        Self {
            opacity: default_link_opacity(),
            sort: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SankeyConfig {
    #[serde(default)]
    pub node: SankeyNodeConfig,
    #[serde(default)]
    pub link: SankeyLinkConfig,
}

impl SankeyConfig {
    #[must_use]
    pub fn layout_config(&self) -> SankeyLayoutConfig {
        SankeyLayoutConfig {
            node_width: self.node.width,
            node_padding: self.node.padding,
            align: self.node.align,
            node_sort: self.node.sort,
            link_sort: self.link.sort,
        }
    }
}

/// Per-instance chart configuration.
///
/// Serializable so dashboards can keep chart setup in JSON files next to
/// their data sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub id: String,
    pub family: ChartFamily,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub position: Insets,
    #[serde(default)]
    pub margin: Insets,
    #[serde(default)]
    pub padding: Insets,
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
    pub accessors: AccessorSpec,
    /// Resting opacity of data elements; hovered elements go to 1.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub rotate: bool,
    #[serde(default, alias = "ordering")]
    pub order: StackOrder,
    #[serde(default = "default_point_radius", alias = "pointradius")]
    pub point_radius: f64,
    #[serde(default)]
    pub doughnut: DoughnutConfig,
    #[serde(default)]
    pub sankey: SankeyConfig,
    #[serde(default)]
    pub legend: Option<OverlayConfig>,
    #[serde(default)]
    pub tooltip: Option<OverlayConfig>,
    #[serde(default)]
    pub filters: Option<OverlayConfig>,
}

impl ChartConfig {
    /// Minimal config with default palette, opacity and no overlays.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        family: ChartFamily,
        size: Size,
        accessors: AccessorSpec,
    ) -> Self {
        Self {
            id: id.into(),
            family,
            width: size.width,
            height: size.height,
            position: Insets::default(),
            margin: Insets::default(),
            padding: Insets::default(),
            palette: default_palette(),
            accessors,
            opacity: default_opacity(),
            rotate: false,
            order: StackOrder::default(),
            point_radius: default_point_radius(),
            doughnut: DoughnutConfig::default(),
            sankey: SankeyConfig::default(),
            legend: None,
            tooltip: None,
            filters: None,
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Vec<String>) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_order(mut self, order: StackOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn with_rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, legend: OverlayConfig) -> Self {
        self.legend = Some(legend);
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: OverlayConfig) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: OverlayConfig) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Palette parsed into colors.
    pub fn palette_colors(&self) -> ChartResult<Vec<Color>> {
        self.palette.iter().map(|raw| Color::from_hex(raw)).collect()
    }

    /// Checks everything that can be checked without data. Frame geometry is
    /// validated separately when frames are computed.
    pub fn validate(&self) -> ChartResult<()> {
        if self.id.trim().is_empty() {
            return Err(ChartError::InvalidConfig(
                "chart id must not be empty".to_owned(),
            ));
        }
        if self.palette.is_empty() {
            return Err(ChartError::InvalidConfig(
                "palette must contain at least one color".to_owned(),
            ));
        }
        self.palette_colors()?;
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(ChartError::InvalidConfig(format!(
                "opacity must be in [0, 1], got {}",
                self.opacity
            )));
        }
        if !self.point_radius.is_finite() || self.point_radius < 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "point radius must be finite and >= 0, got {}",
                self.point_radius
            )));
        }

        self.accessors
            .require_all(self.family.name(), self.family.required_roles())?;

        if self.filters.is_some() && self.accessors.get(Role::Subgroup).is_none() {
            return Err(ChartError::InvalidConfig(format!(
                "{} chart has no subgroup accessor to filter on",
                self.family.name()
            )));
        }

        let doughnut = self.doughnut;
        let ordered = 0.0 <= doughnut.inner_ratio
            && doughnut.inner_ratio <= doughnut.outer_ratio
            && doughnut.outer_ratio <= doughnut.label_ratio;
        if self.family == ChartFamily::Doughnut && !ordered {
            return Err(ChartError::InvalidConfig(
                "doughnut ratios must satisfy 0 <= inner <= outer <= label".to_owned(),
            ));
        }

        for (name, opacity) in [
            ("sankey.node.opacity", self.sankey.node.opacity),
            ("sankey.link.opacity", self.sankey.link.opacity),
        ] {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {opacity}"
                )));
            }
        }

        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse chart config: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize chart config: {e}"))
        })
    }
}
