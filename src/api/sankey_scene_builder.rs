use tracing::trace;

use crate::core::{Role, SankeyLayout, Value, format_number};
use crate::render::{
    Color, DatumField, PolylinePrimitive, RectPrimitive, Shape, TextHAlign, TextPrimitive,
    element_id,
};

use super::scene_context::SceneContext;

const LINK_SEGMENTS: usize = 16;

/// Samples the horizontal cubic band centerline from `(x0, y0)` to `(x1, y1)`.
fn horizontal_link(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<(f64, f64)> {
    let xm = (x0 + x1) / 2.0;
    (0..=LINK_SEGMENTS)
        .map(|i| {
            let t = i as f64 / LINK_SEGMENTS as f64;
            let u = 1.0 - t;
            let a = u * u * u;
            let b = 3.0 * u * u * t;
            let c = 3.0 * u * t * t;
            let d = t * t * t;
            (
                a * x0 + b * xm + c * xm + d * x1,
                a * y0 + b * y0 + c * y1 + d * y1,
            )
        })
        .collect()
}

/// Binds a computed layout to node rects, link bands and `"{name} ({value})"` labels.
pub(crate) fn build_sankey(ctx: &mut SceneContext<'_>, layout: &SankeyLayout) {
    let node_style = ctx.config.sankey.node;
    let link_opacity = ctx.config.sankey.link.opacity;

    let fills: Vec<Color> = layout
        .nodes
        .iter()
        .map(|node| ctx.color_for(&node.name))
        .collect();
    let tokens: Vec<String> = layout
        .nodes
        .iter()
        .map(|node| ctx.token(&node.name))
        .collect();

    for (link, index) in layout.links.iter().zip(0usize..) {
        let (Some(source), Some(target)) = (layout.nodes.get(link.source), layout.nodes.get(link.target))
        else {
            continue;
        };
        let (Some(source_token), Some(target_token)) =
            (tokens.get(link.source), tokens.get(link.target))
        else {
            continue;
        };
        let color = fills.get(link.source).copied().unwrap_or(Color::BLACK);
        let mut id = element_id("link", &[source_token, target_token], ctx.uid);
        if ctx.scene.node(&id).is_some() {
            // Parallel links between the same pair keep distinct ids.
            id = format!("{id}-{index}");
        }
        let node = ctx
            .node(
                id,
                "link",
                Shape::Polyline(PolylinePrimitive {
                    points: horizontal_link(source.x1, link.y0, target.x0, link.y1),
                    stroke_width: link.width.max(0.0),
                    color,
                }),
            )
            .with_opacity(link_opacity)
            .with_datum(vec![
                DatumField {
                    role: Role::Source,
                    value: source.name.clone(),
                },
                DatumField {
                    role: Role::Target,
                    value: target.name.clone(),
                },
                DatumField {
                    role: Role::Value,
                    value: Value::Number(link.value),
                },
            ]);
        ctx.push(node);
    }

    for ((node, fill), token) in layout.nodes.iter().zip(fills).zip(&tokens) {
        let name = node.name.to_string();
        let rect = ctx
            .node(
                element_id("node", &[token], ctx.uid),
                "node",
                Shape::Rect(RectPrimitive::new(
                    node.x0,
                    node.y0,
                    (node.x1 - node.x0).max(0.0),
                    (node.y1 - node.y0).max(0.0),
                    fill,
                )),
            )
            .with_opacity(node_style.opacity)
            .with_datum(vec![
                DatumField {
                    role: Role::Source,
                    value: node.name.clone(),
                },
                DatumField {
                    role: Role::Value,
                    value: Value::Number(node.value),
                },
            ]);
        ctx.push(rect);

        let label = ctx.node(
            element_id("node-label", &[token], ctx.uid),
            "node-label",
            Shape::Text(TextPrimitive::new(
                format!("{name} ({})", format_number(node.value)),
                node.x0,
                node.y0 - node_style.fontsize / 2.0,
                node_style.fontsize,
                Color::BLACK,
                TextHAlign::Left,
            )),
        );
        ctx.push(label);
    }

    trace!(
        uid = ctx.uid,
        nodes = layout.nodes.len(),
        links = layout.links.len(),
        "sankey scene built"
    );
}
