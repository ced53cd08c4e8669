use crate::core::{Frames, OrdinalScale, Rect, Value};
use crate::render::{
    Color, LinePrimitive, Scene, SceneNode, Shape, TextHAlign, TextPrimitive, TokenRegistry,
    child_id,
};

use super::ChartConfig;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 10.0;
const AXIS_FONT_SIZE: f64 = 10.0;

/// Everything a family scene builder writes through.
pub(crate) struct SceneContext<'a> {
    pub scene: &'a mut Scene,
    pub uid: &'a str,
    pub frames: Frames,
    pub config: &'a ChartConfig,
    pub colors: &'a mut OrdinalScale,
    /// Id tokens of the color domain, shared with the legend.
    pub tokens: TokenRegistry,
}

impl SceneContext<'_> {
    /// Palette color bound to `value`; unkeyable values draw black.
    pub fn color_for(&mut self, value: &Value) -> Color {
        self.colors
            .color(value)
            .and_then(|raw| Color::from_hex(raw).ok())
            .unwrap_or(Color::BLACK)
    }

    /// Collision-free id token for a color-domain value.
    pub fn token(&mut self, value: &Value) -> String {
        self.tokens.token(&value.to_string())
    }

    pub fn push(&mut self, node: SceneNode) {
        self.scene.insert(node);
    }

    pub fn node(&self, id: String, class: &str, shape: Shape) -> SceneNode {
        SceneNode::new(id, self.uid, class, shape)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AxisSide {
    Bottom,
    Left,
}

/// Tick at `position` pixels from the data frame's left (bottom axis) or top (left axis).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Emits the domain line, tick marks and tick labels of one axis along the data frame.
pub(crate) fn push_axis(ctx: &mut SceneContext<'_>, side: AxisSide, ticks: &[AxisTick]) {
    let data: Rect = ctx.frames.data;
    let (name, domain) = match side {
        AxisSide::Bottom => (
            "x-axis",
            LinePrimitive::new(data.left, data.bottom, data.right, data.bottom, 1.0, Color::BLACK),
        ),
        AxisSide::Left => (
            "y-axis",
            LinePrimitive::new(data.left, data.top, data.left, data.bottom, 1.0, Color::BLACK),
        ),
    };
    let axis_id = format!("{name}_{}", ctx.uid);
    let node = ctx.node(axis_id.clone(), name, Shape::Line(domain));
    ctx.push(node);

    for (index, tick) in ticks.iter().enumerate() {
        let (mark, label) = match side {
            AxisSide::Bottom => {
                let x = data.left + tick.position;
                (
                    LinePrimitive::new(x, data.bottom, x, data.bottom + TICK_SIZE, 1.0, Color::BLACK),
                    TextPrimitive::new(
                        tick.label.clone(),
                        x,
                        data.bottom + TICK_SIZE + TICK_PADDING,
                        AXIS_FONT_SIZE,
                        Color::BLACK,
                        TextHAlign::Center,
                    ),
                )
            }
            AxisSide::Left => {
                let y = data.top + tick.position;
                (
                    LinePrimitive::new(data.left - TICK_SIZE, y, data.left, y, 1.0, Color::BLACK),
                    TextPrimitive::new(
                        tick.label.clone(),
                        data.left - TICK_SIZE - TICK_PADDING,
                        y,
                        AXIS_FONT_SIZE,
                        Color::BLACK,
                        TextHAlign::Right,
                    ),
                )
            }
        };
        let tick_node = ctx.node(
            child_id(&axis_id, &format!("tick-{index}")),
            "tick",
            Shape::Line(mark),
        );
        ctx.push(tick_node);
        if !tick.label.is_empty() {
            let label_node = ctx.node(
                child_id(&axis_id, &format!("label-{index}")),
                "label",
                Shape::Text(label),
            );
            ctx.push(label_node);
        }
    }
}
