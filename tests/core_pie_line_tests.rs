use std::f64::consts::TAU;

use approx::assert_relative_eq;
use dashchart::core::{
    Accessor, AccessorSpec, Extent, FieldType, RecordKeying, RecordSet, Role, Row, Value,
    aggregate_line, aggregate_pie, map_rows,
};
use serde_json::json;

fn map(value: serde_json::Value, accessors: &AccessorSpec) -> RecordSet {
    let rows: Vec<Row> = serde_json::from_value(value).expect("rows fixture");
    map_rows(&rows, accessors, RecordKeying::ByField)
}

fn pie_spec() -> AccessorSpec {
    AccessorSpec::new()
        .with(Role::Group, Accessor::new("status", FieldType::String))
        .with(Role::Value, Accessor::new("n", FieldType::Number))
}

fn line_spec(x_type: FieldType) -> AccessorSpec {
    AccessorSpec::new()
        .with(Role::Subgroup, Accessor::new("arm", FieldType::String))
        .with(Role::X, Accessor::new("t", x_type))
        .with(Role::Y, Accessor::new("v", FieldType::Number))
}

#[test]
fn pie_slices_cover_the_circle_contiguously() {
    let records = map(
        json!([
            { "status": "enrolled", "n": 100 },
            { "status": "screening", "n": 80 },
            { "status": "withdrawn", "n": 50 },
        ]),
        &pie_spec(),
    );

    let pie = aggregate_pie(&records);

    assert_eq!(pie.total, 230.0);
    assert_eq!(pie.slices.len(), 3);
    assert_eq!(pie.slices[0].start_angle, 0.0);
    for pair in pie.slices.windows(2) {
        assert_eq!(pair[0].end_angle, pair[1].start_angle);
    }
    assert_relative_eq!(pie.slices[0].sweep(), 100.0 / 230.0 * TAU, epsilon = 1e-12);
    assert_relative_eq!(pie.slices[2].end_angle, TAU, epsilon = 1e-12);
}

#[test]
fn pie_sums_repeated_groups_and_skips_non_positive_values() {
    let records = map(
        json!([
            { "status": "a", "n": 1 },
            { "status": "b", "n": -4 },
            { "status": "a", "n": 2 },
            { "status": "c", "n": "oops" },
        ]),
        &pie_spec(),
    );

    let pie = aggregate_pie(&records);

    assert_eq!(pie.groups.labels(), vec!["a", "b", "c"]);
    assert_eq!(pie.slices[0].value, 3.0);
    assert_eq!(pie.total, 3.0);
    assert_eq!(pie.slices[1].value, -4.0);
    assert_eq!(pie.slices[1].sweep(), 0.0);
    assert_eq!(pie.slices[2].sweep(), 0.0);
    assert_relative_eq!(pie.slices[2].end_angle, TAU, epsilon = 1e-12);
}

#[test]
fn pie_with_nothing_positive_has_zero_sweeps() {
    let records = map(json!([{ "status": "a", "n": 0 }]), &pie_spec());

    let pie = aggregate_pie(&records);

    assert_eq!(pie.total, 0.0);
    assert_eq!(pie.slices[0].sweep(), 0.0);
}

#[test]
fn line_series_are_split_by_subgroup_and_sorted_by_x() {
    let records = map(
        json!([
            { "arm": "s1", "t": 3, "v": 1 },
            { "arm": "s1", "t": 1, "v": 2 },
            { "arm": "s2", "t": 2, "v": 5 },
            { "arm": "s1", "t": 2, "v": "abc" },
        ]),
        &line_spec(FieldType::Number),
    );

    let line = aggregate_line(&records);

    assert_eq!(line.subgroups.labels(), vec!["s1", "s2"]);
    let xs: Vec<f64> = line.series[0].points.iter().map(|p| p.x_position()).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    assert!(line.series[0].points[1].y.is_nan());
    assert_eq!(line.series[1].points.len(), 1);
    assert_eq!(line.y_extent, Extent { min: 1.0, max: 5.0 });
    assert_eq!(line.x_domain, Some((1.0, 3.0)));
}

#[test]
fn line_dates_order_by_instant_and_invalid_dates_sort_last() {
    let records = map(
        json!([
            { "arm": "s", "t": "not a date", "v": 9 },
            { "arm": "s", "t": "2024-02-01", "v": 2 },
            { "arm": "s", "t": "2024-01-01", "v": 1 },
        ]),
        &line_spec(FieldType::Date),
    );

    let line = aggregate_line(&records);
    let points = &line.series[0].points;

    assert_eq!(points[0].y, 1.0);
    assert_eq!(points[1].y, 2.0);
    assert!(!points[2].x.is_valid());
    let (lo, hi) = line.x_domain.expect("finite x values");
    assert!(lo < hi);
}

#[test]
fn line_without_x_values_has_no_domain() {
    let records = map(
        json!([{ "arm": "s", "v": 1 }]),
        &line_spec(FieldType::Number),
    );

    let line = aggregate_line(&records);

    assert_eq!(line.x_domain, None);
    let point = &line.series[0].points[0];
    assert!(matches!(point.x, Value::Number(x) if x.is_nan()));
    assert_eq!(point.y, 1.0);
}
