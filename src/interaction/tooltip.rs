use tracing::trace;

use crate::core::{Accessor, Insets, Rect, Role};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{MountState, OverlayConfig};
use crate::render::{
    Color, DatumField, Scene, SceneNode, Shape, TextHAlign, TextPrimitive, element_id,
};

/// Text shown for a field while nothing is hovered.
pub const PLACEHOLDER: &str = "-";

const LINE_SPACING: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipItem {
    pub role: Role,
    pub label: String,
    pub value: String,
}

/// Field readout for the hovered datum.
#[derive(Debug, Clone)]
pub struct Tooltip {
    uid: String,
    config: OverlayConfig,
    origin: (f64, f64),
    items: Vec<TooltipItem>,
    state: MountState,
}

impl Tooltip {
    /// `fields` lists the roles to display, in order, with their accessors.
    pub fn new(
        uid: impl Into<String>,
        config: OverlayConfig,
        container: Rect,
        margin: Insets,
        fields: &[(Role, &Accessor)],
    ) -> ChartResult<Self> {
        if !(config.width > 0.0) || !(config.height > 0.0) {
            return Err(ChartError::InvalidFrame {
                frame: "tooltip",
                width: config.width,
                height: config.height,
            });
        }
        let items = fields
            .iter()
            .map(|(role, accessor)| TooltipItem {
                role: *role,
                label: accessor.label().to_owned(),
                value: PLACEHOLDER.to_owned(),
            })
            .collect();
        Ok(Self {
            uid: uid.into(),
            origin: config.origin(container, margin),
            config,
            items,
            state: MountState::Unmounted,
        })
    }

    #[must_use]
    pub fn scope(&self) -> String {
        format!("{}_tooltip", self.uid)
    }

    #[must_use]
    pub fn items(&self) -> &[TooltipItem] {
        &self.items
    }

    #[must_use]
    pub fn state(&self) -> &MountState {
        &self.state
    }

    /// Mounts the tooltip with every value set to the placeholder.
    pub fn mount(&mut self, scene: &mut Scene) {
        self.reset(scene);
    }

    /// Shows the datum's values for the configured roles; missing roles read `-`.
    pub fn show(&mut self, scene: &mut Scene, datum: &[DatumField]) {
        for item in &mut self.items {
            item.value = datum
                .iter()
                .find(|field| field.role == item.role)
                .map_or_else(|| PLACEHOLDER.to_owned(), |field| field.value.to_string());
        }
        trace!(uid = %self.uid, fields = datum.len(), "tooltip show");
        self.draw(scene);
    }

    /// Reverts every value to the placeholder.
    pub fn reset(&mut self, scene: &mut Scene) {
        for item in &mut self.items {
            item.value = PLACEHOLDER.to_owned();
        }
        self.draw(scene);
    }

    pub fn clear(&mut self, scene: &mut Scene) {
        scene.remove_scope(&self.scope());
        if self.state != MountState::Unmounted {
            self.state = MountState::Cleared;
        }
    }

    fn draw(&mut self, scene: &mut Scene) {
        scene.remove_scope(&self.scope());
        let scope = self.scope();
        let (x, y) = self.origin;
        let line_height = self.config.fontsize * LINE_SPACING;
        for (index, item) in self.items.iter().enumerate() {
            scene.insert(SceneNode::new(
                element_id("tooltip-item", &[item.role.as_str()], &self.uid),
                scope.clone(),
                "tooltip-item",
                Shape::Text(TextPrimitive::new(
                    format!("{}: {}", item.label, item.value),
                    x,
                    y + (index as f64 + 1.0) * line_height,
                    self.config.fontsize,
                    Color::BLACK,
                    TextHAlign::Left,
                )),
            ));
        }
        self.state = MountState::Mounted;
    }
}
