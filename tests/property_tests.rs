use std::f64::consts::TAU;

use dashchart::core::{
    Accessor, AccessorSpec, FieldType, Insets, RecordKeying, RecordSet, Role, Row, Size,
    SankeyLayoutConfig, StackOrder, Value, aggregate_pie, aggregate_stacked, build_sankey,
    compute_frames, layout_sankey, map_rows,
};
use proptest::prelude::*;
use serde_json::json;

fn records(entries: &[(u8, u8, f64)], accessors: &AccessorSpec) -> RecordSet {
    let rows: Vec<Row> = entries
        .iter()
        .map(|(a, b, v)| {
            serde_json::from_value(json!({ "a": format!("k{a}"), "b": format!("k{b}"), "v": v }))
                .expect("row fixture")
        })
        .collect();
    map_rows(&rows, accessors, RecordKeying::ByRole)
}

fn stacked_spec() -> AccessorSpec {
    AccessorSpec::new()
        .with(Role::Group, Accessor::new("a", FieldType::String))
        .with(Role::Subgroup, Accessor::new("b", FieldType::String))
        .with(Role::Value, Accessor::new("v", FieldType::Number))
}

fn sankey_spec() -> AccessorSpec {
    AccessorSpec::new()
        .with(Role::Source, Accessor::new("a", FieldType::String))
        .with(Role::Target, Accessor::new("b", FieldType::String))
        .with(Role::Value, Accessor::new("v", FieldType::Number))
}

fn any_order() -> impl Strategy<Value = StackOrder> {
    prop_oneof![
        Just(StackOrder::None),
        Just(StackOrder::Reverse),
        Just(StackOrder::Ascending),
        Just(StackOrder::Descending),
        Just(StackOrder::Appearance),
        Just(StackOrder::InsideOut),
    ]
}

proptest! {
    #[test]
    fn frames_always_nest(
        width in 1.0f64..2_000.0,
        height in 1.0f64..2_000.0,
        margin in 0.0f64..200.0,
        padding in 0.0f64..200.0
    ) {
        let result = compute_frames(
            Size::new(width, height),
            Insets::default(),
            Insets::uniform(margin),
            Insets::uniform(padding),
        );
        if let Ok(frames) = result {
            prop_assert!(frames.view.contains(frames.axis));
            prop_assert!(frames.axis.contains(frames.data));
            prop_assert!(frames.data.width > 0.0 && frames.data.height > 0.0);
        } else {
            prop_assert!(2.0 * (margin + padding) >= width.min(height));
        }
    }

    #[test]
    fn mapping_is_total(values in proptest::collection::vec(any::<Option<i32>>(), 0..40)) {
        let rows: Vec<Row> = values
            .iter()
            .map(|v| {
                let row = match v {
                    Some(v) => json!({ "a": "k", "v": v }),
                    None => json!({ "a": "k" }),
                };
                serde_json::from_value(row).expect("row fixture")
            })
            .collect();
        let accessors = AccessorSpec::new()
            .with(Role::Group, Accessor::new("a", FieldType::String))
            .with(Role::Value, Accessor::new("v", FieldType::Number));

        let mapped = map_rows(&rows, &accessors, RecordKeying::ByRole);

        prop_assert_eq!(mapped.len(), rows.len());
        let missing = values.iter().filter(|v| v.is_none()).count();
        prop_assert_eq!(mapped.issues().len(), missing);
    }

    #[test]
    fn stacking_conserves_group_totals(
        entries in proptest::collection::vec((0u8..4, 0u8..4, 0.0f64..1_000.0), 1..30),
        order in any_order()
    ) {
        let records = records(&entries, &stacked_spec());
        let stacked = aggregate_stacked(&records, order);

        for (g, group) in stacked.groups.values().iter().enumerate() {
            let expected: f64 = entries
                .iter()
                .filter(|(a, _, _)| Value::from(format!("k{a}").as_str()) == *group)
                .map(|(_, _, v)| v)
                .sum();
            prop_assert!((stacked.totals[g].max - expected).abs() <= 1e-6 * expected.max(1.0));

            let mut offset = 0.0;
            for layer in &stacked.layers {
                let cell = &layer.cells[g];
                prop_assert_eq!(cell.from, offset);
                offset = cell.to;
            }
        }
    }

    #[test]
    fn pie_angles_close_the_circle(
        entries in proptest::collection::vec((0u8..6, 0u8..1, 0.001f64..1_000.0), 1..30)
    ) {
        let accessors = AccessorSpec::new()
            .with(Role::Group, Accessor::new("a", FieldType::String))
            .with(Role::Value, Accessor::new("v", FieldType::Number));
        let pie = aggregate_pie(&records(&entries, &accessors));

        prop_assert_eq!(pie.slices[0].start_angle, 0.0);
        for pair in pie.slices.windows(2) {
            prop_assert_eq!(pair[0].end_angle, pair[1].start_angle);
        }
        let last = pie.slices.last().expect("at least one slice");
        prop_assert!((last.end_angle - TAU).abs() <= 1e-9);
    }

    #[test]
    fn sankey_links_reference_nodes_and_fill_them(
        entries in proptest::collection::vec((0u8..3, 3u8..6, 1.0f64..100.0), 1..20)
    ) {
        // Sources and targets come from disjoint ranges, so the graph is acyclic.
        let graph = build_sankey(&records(&entries, &sankey_spec()));
        for link in &graph.links {
            prop_assert!(link.source < graph.nodes.len());
            prop_assert!(link.target < graph.nodes.len());
        }

        let extent = compute_frames(
            Size::new(600.0, 400.0),
            Insets::default(),
            Insets::default(),
            Insets::default(),
        )
        .expect("frames")
        .data;
        let layout = layout_sankey(&graph, extent, SankeyLayoutConfig::default())
            .expect("acyclic layout");

        for (index, node) in layout.nodes.iter().enumerate() {
            let outgoing: f64 = layout
                .links
                .iter()
                .filter(|link| link.source == index)
                .map(|link| link.width)
                .sum();
            if outgoing > 0.0 {
                prop_assert!((outgoing - (node.y1 - node.y0)).abs() <= 1e-6);
            }
            prop_assert!(node.y0 >= extent.top - 1e-6);
            prop_assert!(node.y1 <= extent.bottom + 1e-6);
        }
    }
}
