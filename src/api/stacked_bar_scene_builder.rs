use tracing::trace;

use crate::core::{BandScale, LinearScale, Role, StackedAggregation, Value, format_number};
use crate::error::ChartResult;
use crate::render::{DatumField, RectPrimitive, Shape, TokenRegistry, child_id, element_id};

use super::scene_context::{AxisSide, AxisTick, SceneContext, push_axis};

const BAND_PADDING_INNER: f64 = 0.05;
const VALUE_TICKS: usize = 10;

/// Binds stacked cells to bars.
///
/// Each subgroup owns the id prefix `bar-group_{subgroup}_{uid}` and its bars
/// nest under it, one per group.
pub(crate) fn build_stacked_bar(
    ctx: &mut SceneContext<'_>,
    aggregation: &StackedAggregation,
) -> ChartResult<()> {
    let data = ctx.frames.data;
    let extent = aggregation.extent;
    let domain = (extent.min.min(0.0).floor(), extent.max.ceil());
    let groups = aggregation.groups.values();

    let (band, value) = if ctx.config.rotate {
        (
            BandScale::new(groups, (data.height, 0.0), BAND_PADDING_INNER)?,
            LinearScale::new(domain, (0.0, data.width))?,
        )
    } else {
        (
            BandScale::new(groups, (0.0, data.width), BAND_PADDING_INNER)?,
            LinearScale::new(domain, (data.height, 0.0))?,
        )
    };

    let band_ticks: Vec<AxisTick> = groups
        .iter()
        .filter_map(|group| {
            band.position(group).map(|start| AxisTick {
                position: start + band.bandwidth() / 2.0,
                label: group.to_string(),
            })
        })
        .collect();
    let value_ticks: Vec<AxisTick> = value
        .ticks(VALUE_TICKS)
        .into_iter()
        .map(|tick| AxisTick {
            position: value.map(tick),
            label: format_number(tick),
        })
        .collect();
    if ctx.config.rotate {
        push_axis(ctx, AxisSide::Bottom, &value_ticks);
        push_axis(ctx, AxisSide::Left, &band_ticks);
    } else {
        push_axis(ctx, AxisSide::Bottom, &band_ticks);
        push_axis(ctx, AxisSide::Left, &value_ticks);
    }

    let opacity = ctx.config.opacity;
    let mut group_tokens = TokenRegistry::seeded(groups.iter().map(ToString::to_string));
    let mut bars = 0usize;
    for layer in &aggregation.layers {
        let fill = ctx.color_for(&layer.subgroup);
        let group_id = element_id("bar-group", &[&ctx.token(&layer.subgroup)], ctx.uid);
        for cell in layer.cells.iter().filter(|cell| cell.present) {
            let Some(band_start) = band.position(&cell.group) else {
                continue;
            };
            let (a, b) = (value.map(cell.from), value.map(cell.to));
            let rect = if ctx.config.rotate {
                RectPrimitive::new(
                    data.left + a.min(b),
                    data.top + band_start,
                    (b - a).abs(),
                    band.bandwidth(),
                    fill,
                )
            } else {
                RectPrimitive::new(
                    data.left + band_start,
                    data.top + a.min(b),
                    band.bandwidth(),
                    (a - b).abs(),
                    fill,
                )
            };
            let node = ctx
                .node(
                    child_id(&group_id, &group_tokens.token(&cell.group.to_string())),
                    "bar",
                    Shape::Rect(rect),
                )
                .with_opacity(opacity)
                .with_datum(vec![
                    DatumField {
                        role: Role::Group,
                        value: cell.group.clone(),
                    },
                    DatumField {
                        role: Role::Subgroup,
                        value: cell.subgroup.clone(),
                    },
                    DatumField {
                        role: Role::Value,
                        value: Value::Number(cell.value),
                    },
                ]);
            ctx.push(node);
            bars += 1;
        }
    }

    trace!(uid = ctx.uid, bars, rotate = ctx.config.rotate, "stacked bar scene built");
    Ok(())
}
