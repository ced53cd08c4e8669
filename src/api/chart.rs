use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::core::{
    FILTER_ALL, Frames, OrdinalScale, RecordSet, Role, Row, SubgroupFilter, compute_frames,
    map_rows, unique_values,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ChartEvent, FilterControl, Legend, MountState, Tooltip};
use crate::render::{Color, OpacityTransition, Renderer, Scene, TokenRegistry};

use super::doughnut_scene_builder::build_doughnut;
use super::line_scene_builder::build_line;
use super::sankey_scene_builder::build_sankey;
use super::scene_context::SceneContext;
use super::stacked_bar_scene_builder::build_stacked_bar;
use super::{ChartConfig, ChartFamily, FamilyAggregation};

/// One chart instance: configuration, mapped records, the bound scene and
/// its overlays.
///
/// Every `update` tears the chart's scope down and rebuilds it from the
/// full record set; nothing is patched incrementally.
pub struct Chart<R: Renderer> {
    renderer: R,
    config: ChartConfig,
    uid: String,
    frames: Frames,
    records: RecordSet,
    filter: SubgroupFilter,
    aggregation: Option<FamilyAggregation>,
    colors: OrdinalScale,
    scene: Scene,
    legend: Option<Legend>,
    tooltip: Option<Tooltip>,
    filters: Option<FilterControl>,
    state: MountState,
    events: VecDeque<ChartEvent>,
}

impl<R: Renderer> Chart<R> {
    /// Validates `config`, maps `rows` and binds the unfiltered aggregation.
    ///
    /// `uid` namespaces every element id the chart creates; use a
    /// [`super::NamespaceAllocator`] for deterministic values.
    pub fn construct(
        renderer: R,
        config: ChartConfig,
        rows: &[Row],
        uid: impl Into<String>,
    ) -> ChartResult<Self> {
        config.validate()?;
        let frames = compute_frames(config.size(), config.position, config.margin, config.padding)?;
        let uid = uid.into();
        let records = map_rows(rows, &config.accessors, config.family.keying());

        let rest_opacity = match config.family {
            ChartFamily::Sankey => config.sankey.node.opacity,
            _ => config.opacity,
        };
        let legend = config
            .legend
            .map(|overlay| {
                Legend::new(
                    uid.clone(),
                    config.family.legend_target_prefix(),
                    overlay,
                    frames.view,
                    config.margin,
                    rest_opacity,
                )
            })
            .transpose()?;
        let tooltip_fields: Vec<_> = config
            .family
            .tooltip_roles()
            .iter()
            .filter_map(|role| config.accessors.get(*role).map(|accessor| (*role, accessor)))
            .collect();
        let tooltip = config
            .tooltip
            .map(|overlay| {
                Tooltip::new(uid.clone(), overlay, frames.view, config.margin, &tooltip_fields)
            })
            .transpose()?;
        let filters = config
            .filters
            .map(|overlay| {
                FilterControl::new(
                    uid.clone(),
                    overlay,
                    frames.view,
                    config.margin,
                    &unique_values(&records, Role::Subgroup),
                )
            })
            .transpose()?;

        debug!(
            uid = %uid,
            id = %config.id,
            family = config.family.name(),
            records = records.len(),
            issues = records.issues().len(),
            "chart constructed"
        );

        let mut chart = Self {
            renderer,
            colors: OrdinalScale::new(&[], config.palette.clone()),
            config,
            uid,
            frames,
            records,
            filter: SubgroupFilter::All,
            aggregation: None,
            scene: Scene::new(),
            legend,
            tooltip,
            filters,
            state: MountState::Unmounted,
            events: VecDeque::new(),
        };
        chart.update(None)?;
        Ok(chart)
    }

    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn frames(&self) -> Frames {
        self.frames
    }

    /// Unfiltered mapped records, with their coercion issues.
    #[must_use]
    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    #[must_use]
    pub fn filter(&self) -> &SubgroupFilter {
        &self.filter
    }

    /// Aggregation currently bound to the scene; `None` after `clear`.
    #[must_use]
    pub fn aggregation(&self) -> Option<&FamilyAggregation> {
        self.aggregation.as_ref()
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn state(&self) -> &MountState {
        &self.state
    }

    #[must_use]
    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    #[must_use]
    pub fn filters(&self) -> Option<&FilterControl> {
        self.filters.as_ref()
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Re-aggregates with `filter` (`None` or `"All"` for everything) and rebinds.
    pub fn update(&mut self, filter: Option<&str>) -> ChartResult<()> {
        let option = filter.unwrap_or(FILTER_ALL);
        let filter = match self.filters.as_mut() {
            Some(control) => control.select(option)?,
            None => {
                let filter = SubgroupFilter::from_option(option);
                let known = filter.is_all()
                    || unique_values(&self.records, Role::Subgroup)
                        .labels()
                        .iter()
                        .any(|label| label == option);
                if !known {
                    return Err(ChartError::UnknownFilterOption(option.to_owned()));
                }
                filter
            }
        };

        self.unbind();

        let filtered = filter.apply(&self.records);
        let aggregation = FamilyAggregation::compute(&self.config, &filtered, &self.frames)?;
        self.bind(&aggregation)?;

        self.state = MountState::after_bind(Some(filter.label()));
        debug!(
            uid = %self.uid,
            filter = filter.label(),
            records = filtered.len(),
            nodes = self.scene.len(),
            "chart updated"
        );
        self.aggregation = Some(aggregation);
        self.filter = filter;
        Ok(())
    }

    /// Removes every element the chart and its overlays created.
    ///
    /// Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.unbind();
        if let Some(filters) = self.filters.as_mut() {
            filters.clear(&mut self.scene);
        }
        debug!(uid = %self.uid, "chart cleared");
    }

    /// Draws the current scene.
    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.scene.to_frame(self.config.size());
        self.renderer.render(&frame)
    }

    /// Advances running hover transitions.
    pub fn advance(&mut self, elapsed_ms: f64) {
        self.scene.advance(elapsed_ms);
    }

    pub fn enqueue(&mut self, event: ChartEvent) {
        self.events.push_back(event);
    }

    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Handles queued events in arrival order until the queue is empty.
    ///
    /// Stops at the first failing event; events behind it stay queued.
    pub fn drain_events(&mut self) -> ChartResult<usize> {
        let mut handled = 0;
        while let Some(event) = self.events.pop_front() {
            self.handle(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Queues `event` and drains the queue.
    pub fn dispatch(&mut self, event: ChartEvent) -> ChartResult<usize> {
        self.enqueue(event);
        self.drain_events()
    }

    fn handle(&mut self, event: ChartEvent) -> ChartResult<()> {
        trace!(uid = %self.uid, ?event, "chart event");
        match event {
            ChartEvent::FilterChanged(option) => return self.update(Some(&option)),
            _ if !self.state.is_mounted() => {
                warn!(uid = %self.uid, "interaction event on an unmounted chart ignored");
            }
            ChartEvent::ElementEnter(id) => {
                let Some(datum) = self
                    .scene
                    .node(&id)
                    .filter(|node| !node.datum.is_empty())
                    .map(|node| node.datum.clone())
                else {
                    return Ok(());
                };
                self.scene.start_transition(OpacityTransition::new(id, 1.0));
                if let Some(tooltip) = self.tooltip.as_mut() {
                    tooltip.show(&mut self.scene, &datum);
                }
            }
            ChartEvent::ElementLeave(id) => {
                let Some(rest) = self
                    .scene
                    .node(&id)
                    .filter(|node| !node.datum.is_empty())
                    .map(|node| self.rest_opacity(&node.class))
                else {
                    return Ok(());
                };
                self.scene.start_transition(OpacityTransition::new(id, rest));
                if let Some(tooltip) = self.tooltip.as_mut() {
                    tooltip.reset(&mut self.scene);
                }
            }
            ChartEvent::LegendEnter(label) => {
                if let Some(request) = self.legend.as_ref().and_then(|l| l.hover_enter(&label)) {
                    self.scene.start_group_transition(&request);
                }
            }
            ChartEvent::LegendLeave(label) => {
                if let Some(request) = self.legend.as_ref().and_then(|l| l.hover_leave(&label)) {
                    self.scene.start_group_transition(&request);
                }
            }
        }
        Ok(())
    }

    fn rest_opacity(&self, class: &str) -> f64 {
        match class {
            "node" => self.config.sankey.node.opacity,
            "link" => self.config.sankey.link.opacity,
            _ => self.config.opacity,
        }
    }

    /// Clears chart-owned elements and data overlays; the filter control
    /// keeps its mount so it survives its own change events.
    fn unbind(&mut self) {
        self.scene.remove_scope(&self.uid);
        if let Some(legend) = self.legend.as_mut() {
            legend.clear(&mut self.scene);
        }
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.clear(&mut self.scene);
        }
        self.aggregation = None;
        if self.state != MountState::Unmounted {
            self.state = MountState::Cleared;
        }
    }

    fn bind(&mut self, aggregation: &FamilyAggregation) -> ChartResult<()> {
        // Palette order follows first occurrence, not the order builders draw in.
        let domain = aggregation.color_domain();
        for value in &domain {
            self.colors.color(value);
        }
        let mut ctx = SceneContext {
            scene: &mut self.scene,
            uid: &self.uid,
            frames: self.frames,
            config: &self.config,
            colors: &mut self.colors,
            tokens: TokenRegistry::seeded(domain.iter().map(ToString::to_string)),
        };
        match aggregation {
            FamilyAggregation::StackedBar(stacked) => build_stacked_bar(&mut ctx, stacked)?,
            FamilyAggregation::Line(line) => build_line(&mut ctx, line)?,
            FamilyAggregation::Doughnut(pie) => build_doughnut(&mut ctx, pie),
            FamilyAggregation::Sankey { layout, .. } => build_sankey(&mut ctx, layout),
        }

        if let Some(legend) = self.legend.as_mut() {
            let items: Vec<(String, Color)> = domain
                .iter()
                .map(|value| {
                    let color = self
                        .colors
                        .color(value)
                        .and_then(|raw| Color::from_hex(raw).ok())
                        .unwrap_or(Color::BLACK);
                    (value.to_string(), color)
                })
                .collect();
            legend.update(&mut self.scene, &items);
        }
        if let Some(tooltip) = self.tooltip.as_mut() {
            tooltip.mount(&mut self.scene);
        }
        if let Some(filters) = self.filters.as_mut() {
            filters.mount(&mut self.scene);
        }
        Ok(())
    }
}
