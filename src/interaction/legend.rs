use tracing::{debug, trace};

use crate::core::{Insets, Rect};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{MountState, OverlayConfig};
use crate::render::{
    Color, OpacityTransition, RectPrimitive, Scene, SceneNode, Shape, TextHAlign, TextPrimitive,
    TokenRegistry, element_id,
};

const ITEM_GAP: f64 = 7.0;
const LABEL_GAP: f64 = 8.0;

/// One legend row: a swatch and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    /// Chart element (and its children) highlighted while hovering this entry.
    pub target: String,
}

/// Legend overlay bound to a chart's group or subgroup domain.
#[derive(Debug, Clone)]
pub struct Legend {
    uid: String,
    target_prefix: String,
    config: OverlayConfig,
    origin: (f64, f64),
    rest_opacity: f64,
    entries: Vec<LegendEntry>,
    state: MountState,
}

impl Legend {
    /// `target_prefix` names the chart elements an entry highlights, e.g.
    /// `bar-group` targets `bar-group_{label}_{uid}`.
    pub fn new(
        uid: impl Into<String>,
        target_prefix: impl Into<String>,
        config: OverlayConfig,
        container: Rect,
        margin: Insets,
        rest_opacity: f64,
    ) -> ChartResult<Self> {
        if !(config.width > 0.0) || !(config.height > 0.0) {
            return Err(ChartError::InvalidFrame {
                frame: "legend",
                width: config.width,
                height: config.height,
            });
        }
        Ok(Self {
            uid: uid.into(),
            target_prefix: target_prefix.into(),
            origin: config.origin(container, margin),
            config,
            rest_opacity,
            entries: Vec::new(),
            state: MountState::Unmounted,
        })
    }

    #[must_use]
    pub fn scope(&self) -> String {
        format!("{}_legend", self.uid)
    }

    #[must_use]
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    #[must_use]
    pub fn state(&self) -> &MountState {
        &self.state
    }

    #[must_use]
    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    /// Rebuilds the legend rows from `(label, color)` pairs in domain order.
    ///
    /// Targets use the same collision-free tokens as the chart elements, so
    /// the pairs must come in the chart's color-domain order.
    pub fn update(&mut self, scene: &mut Scene, items: &[(String, Color)]) {
        self.clear(scene);
        let scope = self.scope();
        let (x, y) = self.origin;
        let step = self.config.itemsize + ITEM_GAP;

        let mut registry = TokenRegistry::new();
        let tokens: Vec<String> = items.iter().map(|(label, _)| registry.token(label)).collect();
        self.entries = items
            .iter()
            .zip(&tokens)
            .map(|((label, color), token)| LegendEntry {
                label: label.clone(),
                color: *color,
                target: element_id(&self.target_prefix, &[token], &self.uid),
            })
            .collect();

        for ((index, entry), token) in self.entries.iter().enumerate().zip(&tokens) {
            let top = y + index as f64 * step;
            scene.insert(SceneNode::new(
                element_id("legend-color", &[token], &self.uid),
                scope.clone(),
                "legend-color",
                Shape::Rect(RectPrimitive {
                    x,
                    y: top,
                    width: self.config.itemsize,
                    height: self.config.itemsize,
                    fill: entry.color,
                }),
            ));
            scene.insert(SceneNode::new(
                element_id("legend-label", &[token], &self.uid),
                scope.clone(),
                "legend-label",
                Shape::Text(TextPrimitive::new(
                    entry.label.clone(),
                    x + self.config.itemsize + LABEL_GAP,
                    top + self.config.itemsize / 2.0,
                    self.config.fontsize,
                    Color::BLACK,
                    TextHAlign::Left,
                )),
            ));
        }

        self.state = MountState::Mounted;
        debug!(uid = %self.uid, entries = self.entries.len(), "legend mounted");
    }

    /// Highlight request for the chart elements behind `label`.
    #[must_use]
    pub fn hover_enter(&self, label: &str) -> Option<OpacityTransition> {
        let entry = self.entries.iter().find(|entry| entry.label == label)?;
        trace!(uid = %self.uid, label, "legend enter");
        Some(OpacityTransition::new(entry.target.clone(), 1.0))
    }

    /// Request restoring the resting opacity of the elements behind `label`.
    #[must_use]
    pub fn hover_leave(&self, label: &str) -> Option<OpacityTransition> {
        let entry = self.entries.iter().find(|entry| entry.label == label)?;
        trace!(uid = %self.uid, label, "legend leave");
        Some(OpacityTransition::new(entry.target.clone(), self.rest_opacity))
    }

    pub fn clear(&mut self, scene: &mut Scene) {
        scene.remove_scope(&self.scope());
        self.entries.clear();
        if self.state != MountState::Unmounted {
            self.state = MountState::Cleared;
        }
    }
}
