use std::f64::consts::PI;

use tracing::trace;

use crate::core::{PieAggregation, Role, Value};
use crate::render::{
    ArcPrimitive, Color, DatumField, PolylinePrimitive, Shape, TextHAlign, TextPrimitive,
    child_id, element_id,
};

use super::scene_context::SceneContext;

/// Binds slices to ring arcs centered in the axis frame, with a leader line
/// and label per slice on the right (mid-angle < π) or left side.
pub(crate) fn build_doughnut(ctx: &mut SceneContext<'_>, aggregation: &PieAggregation) {
    let axis = ctx.frames.axis;
    let (cx, cy) = axis.center();
    let radius = axis.width.min(axis.height) / 2.0;
    let ring = ctx.config.doughnut;
    let opacity = ctx.config.opacity;

    for slice in &aggregation.slices {
        let fill = ctx.color_for(&slice.label);
        let label = slice.label.to_string();
        let arc_id = element_id("arc", &[&ctx.token(&slice.label)], ctx.uid);
        let arc = ArcPrimitive {
            cx,
            cy,
            inner_radius: radius * ring.inner_ratio,
            outer_radius: radius * ring.outer_ratio,
            start_angle: slice.start_angle,
            end_angle: slice.end_angle,
            fill,
        };
        let label_arc = ArcPrimitive {
            inner_radius: radius * ring.label_ratio,
            outer_radius: radius * (ring.label_ratio + 0.05),
            ..arc
        };
        let right_side = slice.mid_angle() < PI;
        let side = if right_side { 1.0 } else { -1.0 };
        let bend = label_arc.centroid();

        let node = ctx
            .node(arc_id.clone(), "data-arc", Shape::Arc(arc))
            .with_opacity(opacity)
            .with_datum(vec![
                DatumField {
                    role: Role::Group,
                    value: slice.label.clone(),
                },
                DatumField {
                    role: Role::Value,
                    value: Value::Number(slice.value),
                },
            ]);
        ctx.push(node);

        let leader = ctx.node(
            child_id(&arc_id, "label-line"),
            "label-line",
            Shape::Polyline(PolylinePrimitive {
                points: vec![arc.centroid(), bend, (cx + radius * 0.9 * side, bend.1)],
                stroke_width: 1.0,
                color: Color::BLACK,
            }),
        );
        ctx.push(leader);

        if !label.is_empty() {
            let text = ctx.node(
                child_id(&arc_id, "label"),
                "label",
                Shape::Text(TextPrimitive::new(
                    label,
                    cx + radius * 0.95 * side,
                    bend.1,
                    ring.fontsize,
                    Color::BLACK,
                    if right_side {
                        TextHAlign::Left
                    } else {
                        TextHAlign::Right
                    },
                )),
            );
            ctx.push(text);
        }
    }

    trace!(uid = ctx.uid, slices = aggregation.slices.len(), "doughnut scene built");
}
