use chrono::DateTime;
use tracing::trace;

use crate::core::{FieldType, LineAggregation, LinearScale, Role, Value, format_number};
use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, DatumField, PolylinePrimitive, Shape, child_id, element_id,
};

use super::scene_context::{AxisSide, AxisTick, SceneContext, push_axis};

const X_TICKS: usize = 6;
const Y_TICKS: usize = 10;
const STROKE_WIDTH: f64 = 2.0;

fn time_label(epoch_ms: f64) -> String {
    DateTime::from_timestamp_millis(epoch_ms as i64)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Binds each subgroup series to a polyline with one circle per point.
///
/// Series own `series_{subgroup}_{uid}`; points nest under it as `point-{i}`.
pub(crate) fn build_line(ctx: &mut SceneContext<'_>, aggregation: &LineAggregation) -> ChartResult<()> {
    let data = ctx.frames.data;
    let x_domain = aggregation.x_domain.unwrap_or((0.0, 1.0));
    let x = LinearScale::new(x_domain, (0.0, data.width))?;
    let y = LinearScale::new((0.0, aggregation.y_extent.max.max(0.0)), (data.height, 0.0))?;

    let is_time = ctx
        .config
        .accessors
        .get(Role::X)
        .is_some_and(|accessor| accessor.field_type == FieldType::Date);
    let x_ticks: Vec<AxisTick> = x
        .ticks(X_TICKS)
        .into_iter()
        .map(|tick| AxisTick {
            position: x.map(tick),
            label: if is_time {
                time_label(tick)
            } else {
                format_number(tick)
            },
        })
        .collect();
    let y_ticks: Vec<AxisTick> = y
        .ticks(Y_TICKS)
        .into_iter()
        .map(|tick| AxisTick {
            position: y.map(tick),
            label: format_number(tick),
        })
        .collect();
    push_axis(ctx, AxisSide::Bottom, &x_ticks);
    push_axis(ctx, AxisSide::Left, &y_ticks);

    let opacity = ctx.config.opacity;
    let radius = ctx.config.point_radius;
    for series in &aggregation.series {
        let color = ctx.color_for(&series.subgroup);
        let series_id = element_id("series", &[&ctx.token(&series.subgroup)], ctx.uid);
        let points: Vec<(f64, f64, &Value, f64)> = series
            .points
            .iter()
            .filter(|point| point.x_position().is_finite() && point.y.is_finite())
            .map(|point| {
                (
                    data.left + x.map(point.x_position()),
                    data.top + y.map(point.y),
                    &point.x,
                    point.y,
                )
            })
            .collect();

        let line = ctx
            .node(
                series_id.clone(),
                "line",
                Shape::Polyline(PolylinePrimitive {
                    points: points.iter().map(|&(px, py, _, _)| (px, py)).collect(),
                    stroke_width: STROKE_WIDTH,
                    color,
                }),
            )
            .with_opacity(opacity)
            .with_datum(vec![DatumField {
                role: Role::Subgroup,
                value: series.subgroup.clone(),
            }]);
        ctx.push(line);

        for (index, &(cx, cy, x_value, y_value)) in points.iter().enumerate() {
            let point = ctx
                .node(
                    child_id(&series_id, &format!("point-{index}")),
                    "point",
                    Shape::Circle(CirclePrimitive {
                        cx,
                        cy,
                        radius,
                        fill: color,
                    }),
                )
                .with_opacity(opacity)
                .with_datum(vec![
                    DatumField {
                        role: Role::Subgroup,
                        value: series.subgroup.clone(),
                    },
                    DatumField {
                        role: Role::X,
                        value: x_value.clone(),
                    },
                    DatumField {
                        role: Role::Y,
                        value: Value::Number(y_value),
                    },
                ]);
            ctx.push(point);
        }
    }

    trace!(uid = ctx.uid, series = aggregation.series.len(), "line scene built");
    Ok(())
}
