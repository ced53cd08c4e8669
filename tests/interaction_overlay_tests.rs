use dashchart::core::{
    Accessor, AccessorSpec, FieldType, Insets, RecordKeying, Rect, Role, Row, SubgroupFilter,
    Value, map_rows, unique_values,
};
use dashchart::interaction::{
    FilterControl, HorizontalPosition, Legend, MountState, OverlayConfig, PLACEHOLDER, Tooltip,
    VerticalPosition,
};
use dashchart::render::{Color, DatumField, Scene, Shape};
use dashchart::ChartError;
use serde_json::json;

fn container() -> Rect {
    Rect {
        top: 0.0,
        left: 0.0,
        bottom: 300.0,
        right: 400.0,
        width: 400.0,
        height: 300.0,
    }
}

fn margin() -> Insets {
    Insets::new(10.0, 20.0, 30.0, 40.0)
}

fn text_of(scene: &Scene, id: &str) -> String {
    match &scene.node(id).expect("text node").shape {
        Shape::Text(text) => text.text.clone(),
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn overlay_origin_follows_alignment() {
    let mut config = OverlayConfig::new(100.0, 50.0);
    config.padding = Insets::uniform(5.0);

    assert_eq!(config.origin(container(), margin()), (255.0, 15.0));

    config.hposition = HorizontalPosition::Left;
    config.vposition = VerticalPosition::Bottom;
    assert_eq!(config.origin(container(), margin()), (25.0, 215.0));

    config.hposition = HorizontalPosition::Center;
    config.vposition = VerticalPosition::Center;
    assert_eq!(config.origin(container(), margin()), (150.0, 125.0));
}

#[test]
fn overlay_config_defaults_from_json() {
    let config: OverlayConfig =
        serde_json::from_value(json!({ "width": 80, "height": 40, "hposition": "left" }))
            .expect("overlay config");

    assert_eq!(config.itemsize, 12.0);
    assert_eq!(config.fontsize, 12.0);
    assert_eq!(config.hposition, HorizontalPosition::Left);
    assert_eq!(config.vposition, VerticalPosition::Top);
}

#[test]
fn mount_state_after_bind() {
    assert_eq!(MountState::after_bind(None), MountState::Mounted);
    assert_eq!(MountState::after_bind(Some("All")), MountState::Mounted);
    assert_eq!(
        MountState::after_bind(Some("x")),
        MountState::Filtered("x".to_owned())
    );
    assert!(MountState::Filtered("x".to_owned()).is_mounted());
    assert!(!MountState::Cleared.is_mounted());
    assert!(!MountState::default().is_mounted());
}

#[test]
fn legend_rows_stack_below_the_origin() {
    let mut scene = Scene::new();
    let mut legend = Legend::new(
        "c1",
        "bar-group",
        OverlayConfig::new(100.0, 60.0),
        container(),
        margin(),
        0.8,
    )
    .expect("legend");
    assert_eq!(legend.state(), &MountState::Unmounted);

    legend.update(
        &mut scene,
        &[
            ("Arm A".to_owned(), Color::BLACK),
            ("Arm B".to_owned(), Color::rgb(1.0, 0.0, 0.0)),
        ],
    );

    assert_eq!(legend.state(), &MountState::Mounted);
    assert_eq!(legend.entries().len(), 2);
    assert_eq!(legend.entries()[1].target, "bar-group_arm-b_c1");
    assert_eq!(scene.nodes_in_scope("c1_legend").count(), 4);

    let (x, y) = legend.origin();
    let Shape::Rect(swatch) = &scene.node("legend-color_arm-b_c1").expect("swatch").shape else {
        panic!("swatch is a rect");
    };
    assert_eq!((swatch.x, swatch.y), (x, y + 19.0));
    let Shape::Text(label) = &scene.node("legend-label_arm-b_c1").expect("label").shape else {
        panic!("label is text");
    };
    assert_eq!(label.x, x + 20.0);
    assert_eq!(label.text, "Arm B");
}

#[test]
fn legend_hover_targets_the_entry_group() {
    let mut scene = Scene::new();
    let mut legend = Legend::new(
        "c1",
        "series",
        OverlayConfig::new(100.0, 60.0),
        container(),
        margin(),
        0.6,
    )
    .expect("legend");
    legend.update(&mut scene, &[("s1".to_owned(), Color::BLACK)]);

    let enter = legend.hover_enter("s1").expect("known entry");
    assert_eq!(enter.target, "series_s1_c1");
    assert_eq!(enter.to, 1.0);
    assert_eq!(legend.hover_leave("s1").expect("known entry").to, 0.6);
    assert!(legend.hover_enter("nope").is_none());

    legend.clear(&mut scene);
    assert!(scene.is_empty());
    assert_eq!(legend.state(), &MountState::Cleared);
    assert!(legend.hover_enter("s1").is_none());
}

#[test]
fn legend_rejects_an_empty_box() {
    let err = Legend::new(
        "c1",
        "arc",
        OverlayConfig::new(0.0, 10.0),
        container(),
        margin(),
        0.8,
    )
    .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidFrame { frame: "legend", .. }));
}

#[test]
fn tooltip_shows_datum_values_and_resets_to_placeholders() {
    let group = Accessor::new("site", FieldType::String).with_name("Site");
    let value = Accessor::new("count", FieldType::Number);
    let mut scene = Scene::new();
    let mut tooltip = Tooltip::new(
        "c1",
        OverlayConfig::new(120.0, 60.0),
        container(),
        margin(),
        &[(Role::Group, &group), (Role::Value, &value)],
    )
    .expect("tooltip");

    tooltip.mount(&mut scene);
    assert_eq!(tooltip.state(), &MountState::Mounted);
    assert_eq!(text_of(&scene, "tooltip-item_group_c1"), "Site: -");
    assert_eq!(text_of(&scene, "tooltip-item_value_c1"), "count: -");

    tooltip.show(
        &mut scene,
        &[DatumField {
            role: Role::Group,
            value: Value::from("A"),
        }],
    );
    assert_eq!(tooltip.items()[0].value, "A");
    assert_eq!(tooltip.items()[1].value, PLACEHOLDER);
    assert_eq!(text_of(&scene, "tooltip-item_group_c1"), "Site: A");

    tooltip.reset(&mut scene);
    assert!(tooltip.items().iter().all(|item| item.value == PLACEHOLDER));

    tooltip.clear(&mut scene);
    assert!(scene.is_empty());
    assert_eq!(tooltip.state(), &MountState::Cleared);
}

#[test]
fn filter_options_start_with_all_and_track_the_selection() {
    let rows: Vec<Row> = serde_json::from_value(json!([
        { "arm": "x" },
        { "arm": "All" },
        { "arm": "y" },
        { "arm": "x" },
    ]))
    .expect("rows fixture");
    let accessors = AccessorSpec::new().with(Role::Subgroup, Accessor::new("arm", FieldType::String));
    let records = map_rows(&rows, &accessors, RecordKeying::ByRole);

    let mut scene = Scene::new();
    let mut filters = FilterControl::new(
        "c1",
        OverlayConfig::new(80.0, 80.0),
        container(),
        margin(),
        &unique_values(&records, Role::Subgroup),
    )
    .expect("filter control");

    assert_eq!(filters.options(), &["All", "x", "y"]);
    assert_eq!(filters.selected(), "All");

    filters.mount(&mut scene);
    assert_eq!(filters.state(), &MountState::Mounted);
    assert_eq!(scene.nodes_in_scope("c1_filters").count(), 3);
    assert_eq!(scene.node("filter_all_c1").expect("All").class, "filter selected");

    let filter = filters.select("y").expect("known option");
    assert_eq!(filter, SubgroupFilter::Only("y".to_owned()));
    assert_eq!(filters.state(), &MountState::Filtered("y".to_owned()));
    filters.mount(&mut scene);
    assert_eq!(scene.node("filter_y_c1").expect("y").class, "filter selected");
    assert_eq!(scene.node("filter_all_c1").expect("All").class, "filter");

    let err = filters.select("z").expect_err("unknown option");
    assert!(matches!(err, ChartError::UnknownFilterOption(option) if option == "z"));
    assert_eq!(filters.selected(), "y");

    filters.clear(&mut scene);
    assert!(scene.is_empty());
    assert_eq!(filters.state(), &MountState::Cleared);
}
