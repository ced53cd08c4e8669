use tracing::debug;

use crate::core::{FILTER_ALL, Insets, Rect, SubgroupFilter, UniqueValues};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{MountState, OverlayConfig};
use crate::render::{
    Color, Scene, SceneNode, Shape, TextHAlign, TextPrimitive, element_id,
};

const OPTION_SPACING: f64 = 1.5;

/// Single-select subgroup filter with options `["All", ...subgroups]`.
#[derive(Debug, Clone)]
pub struct FilterControl {
    uid: String,
    config: OverlayConfig,
    origin: (f64, f64),
    options: Vec<String>,
    selected: String,
    state: MountState,
}

impl FilterControl {
    /// Option list is fixed at construction from the unfiltered subgroup set.
    pub fn new(
        uid: impl Into<String>,
        config: OverlayConfig,
        container: Rect,
        margin: Insets,
        subgroups: &UniqueValues,
    ) -> ChartResult<Self> {
        if !(config.width > 0.0) || !(config.height > 0.0) {
            return Err(ChartError::InvalidFrame {
                frame: "filters",
                width: config.width,
                height: config.height,
            });
        }
        let mut options = vec![FILTER_ALL.to_owned()];
        options.extend(
            subgroups
                .labels()
                .into_iter()
                .filter(|label| label != FILTER_ALL),
        );
        Ok(Self {
            uid: uid.into(),
            origin: config.origin(container, margin),
            config,
            options,
            selected: FILTER_ALL.to_owned(),
            state: MountState::Unmounted,
        })
    }

    #[must_use]
    pub fn scope(&self) -> String {
        format!("{}_filters", self.uid)
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn selected(&self) -> &str {
        &self.selected
    }

    #[must_use]
    pub fn state(&self) -> &MountState {
        &self.state
    }

    /// Changes the selection and returns the filter the owning chart re-aggregates with.
    pub fn select(&mut self, option: &str) -> ChartResult<SubgroupFilter> {
        if !self.options.iter().any(|candidate| candidate == option) {
            return Err(ChartError::UnknownFilterOption(option.to_owned()));
        }
        self.selected = option.to_owned();
        self.state = MountState::after_bind(Some(option));
        debug!(uid = %self.uid, option, "filter changed");
        Ok(SubgroupFilter::from_option(option))
    }

    pub fn mount(&mut self, scene: &mut Scene) {
        scene.remove_scope(&self.scope());
        let scope = self.scope();
        let (x, y) = self.origin;
        let line_height = self.config.fontsize * OPTION_SPACING;
        for (index, option) in self.options.iter().enumerate() {
            let class = if *option == self.selected {
                "filter selected"
            } else {
                "filter"
            };
            scene.insert(SceneNode::new(
                element_id("filter", &[option], &self.uid),
                scope.clone(),
                class,
                Shape::Text(TextPrimitive::new(
                    option.clone(),
                    x,
                    y + (index as f64 + 1.0) * line_height,
                    self.config.fontsize,
                    Color::BLACK,
                    TextHAlign::Left,
                )),
            ));
        }
        if !self.state.is_mounted() {
            self.state = MountState::after_bind(Some(&self.selected));
        }
    }

    pub fn clear(&mut self, scene: &mut Scene) {
        scene.remove_scope(&self.scope());
        if self.state != MountState::Unmounted {
            self.state = MountState::Cleared;
        }
    }
}
