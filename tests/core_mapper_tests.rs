use chrono::{TimeZone, Utc};
use dashchart::core::{
    Accessor, AccessorSpec, FieldType, IssueKind, RecordKeying, Role, Row, SubgroupFilter, Value,
    map_rows, tokenize, unique_values,
};
use serde_json::json;

fn rows(value: serde_json::Value) -> Vec<Row> {
    serde_json::from_value(value).expect("rows fixture")
}

fn group_value_spec() -> AccessorSpec {
    AccessorSpec::new()
        .with(Role::Group, Accessor::new("site", FieldType::String))
        .with(Role::Value, Accessor::new("count", FieldType::Number))
}

#[test]
fn number_coercion_follows_dashboard_rules() {
    let number = |raw: Option<serde_json::Value>| Value::coerce(FieldType::Number, raw.as_ref());

    assert_eq!(number(Some(json!(42))), Value::Number(42.0));
    assert_eq!(number(Some(json!("7.5"))), Value::Number(7.5));
    assert_eq!(number(Some(json!(null))), Value::Number(0.0));
    assert_eq!(number(Some(json!(true))), Value::Number(1.0));
    assert_eq!(number(Some(json!(false))), Value::Number(0.0));
    assert_eq!(number(Some(json!(""))), Value::Number(0.0));
    assert_eq!(number(Some(json!("Infinity"))), Value::Number(f64::INFINITY));
    assert!(!number(Some(json!("inf"))).is_valid());
    assert!(!number(Some(json!("abc"))).is_valid());
    assert!(!number(None).is_valid());
}

#[test]
fn string_coercion_keeps_missing_and_null_distinct() {
    let string = |raw: Option<serde_json::Value>| Value::coerce(FieldType::String, raw.as_ref());

    assert_eq!(string(None), Value::from("undefined"));
    assert_eq!(string(Some(json!(null))), Value::from("null"));
    assert_eq!(string(Some(json!(119))), Value::from("119"));
    assert_eq!(string(Some(json!(2.5))), Value::from("2.5"));
    assert_eq!(string(Some(json!("Site A"))), Value::from("Site A"));
}

#[test]
fn date_coercion_accepts_iso_dates_and_epoch_millis() {
    let date = |raw: serde_json::Value| Value::coerce(FieldType::Date, Some(&raw));

    let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single();
    assert_eq!(date(json!("2024-03-01")), Value::Date(expected));
    assert_eq!(date(json!("2024-03-01T00:00:00Z")), Value::Date(expected));
    assert_eq!(
        date(json!(0)),
        Value::Date(Utc.timestamp_millis_opt(0).single())
    );

    let invalid = date(json!("not a date"));
    assert!(!invalid.is_valid());
    assert_eq!(invalid.to_string(), "Invalid Date");
    assert_eq!(
        date(json!("2024-03-01")).to_string(),
        "2024-03-01T00:00:00.000Z"
    );
}

#[test]
fn mapping_keeps_one_record_per_row_and_reports_issues() {
    let input = rows(json!([
        { "site": "A", "count": "10" },
        { "site": "B", "count": "abc" },
        { "site": "C" },
    ]));

    let records = map_rows(&input, &group_value_spec(), RecordKeying::ByRole);

    assert_eq!(records.len(), 3);
    let first = &records.records()[0];
    assert_eq!(first.field("group"), Some(&Value::from("A")));
    assert_eq!(first.field("value"), Some(&Value::Number(10.0)));
    assert!(!records.records()[1].field("value").expect("value").is_valid());

    let issues = records.issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].row, 1);
    assert_eq!(issues[0].role, Role::Value);
    assert_eq!(issues[0].key, "count");
    assert_eq!(issues[0].kind, IssueKind::NotANumber);
    assert_eq!(issues[1].row, 2);
    assert_eq!(issues[1].kind, IssueKind::MissingField);
}

#[test]
fn field_keying_keeps_raw_keys_as_columns() {
    let input = rows(json!([{ "site": "A", "count": 1 }]));

    let by_field = map_rows(&input, &group_value_spec(), RecordKeying::ByField);
    assert_eq!(by_field.column(Role::Group), Some("site"));
    let record = &by_field.records()[0];
    assert_eq!(by_field.value(record, Role::Value), Some(&Value::Number(1.0)));

    let by_role = map_rows(&input, &group_value_spec(), RecordKeying::ByRole);
    assert_eq!(by_role.column(Role::Group), Some("group"));
}

#[test]
fn invalid_dates_are_reported() {
    let accessors = AccessorSpec::new().with(Role::X, Accessor::new("visit", FieldType::Date));
    let records = map_rows(
        &rows(json!([{ "visit": "2024-13-45" }])),
        &accessors,
        RecordKeying::ByField,
    );

    assert_eq!(records.issues().len(), 1);
    assert_eq!(records.issues()[0].kind, IssueKind::InvalidDate);
}

#[test]
fn unique_values_keep_first_occurrence_order() {
    let input = rows(json!([
        { "site": "B", "count": 1 },
        { "site": "A", "count": 2 },
        { "site": "B", "count": 3 },
        { "site": "C", "count": 4 },
    ]));
    let records = map_rows(&input, &group_value_spec(), RecordKeying::ByRole);

    let groups = unique_values(&records, Role::Group);
    assert_eq!(groups.labels(), vec!["B", "A", "C"]);
    assert_eq!(groups.position(&Value::from("C")), Some(2));
    assert_eq!(groups.position(&Value::from("Z")), None);
}

#[test]
fn nan_values_never_enter_a_unique_set() {
    let input = rows(json!([{ "count": "x" }, { "count": 1 }, { "count": "y" }]));
    let accessors = AccessorSpec::new().with(Role::Group, Accessor::new("count", FieldType::Number));
    let records = map_rows(&input, &accessors, RecordKeying::ByRole);

    let groups = unique_values(&records, Role::Group);
    assert_eq!(groups.values(), &[Value::Number(1.0)]);
}

#[test]
fn subgroup_filter_keeps_matching_records_only() {
    let accessors = AccessorSpec::new()
        .with(Role::Subgroup, Accessor::new("arm", FieldType::String))
        .with(Role::Value, Accessor::new("count", FieldType::Number));
    let input = rows(json!([
        { "arm": "x", "count": 1 },
        { "arm": "y", "count": 2 },
        { "arm": "x", "count": 3 },
    ]));
    let records = map_rows(&input, &accessors, RecordKeying::ByRole);

    assert_eq!(SubgroupFilter::from_option("All"), SubgroupFilter::All);
    assert_eq!(SubgroupFilter::All.apply(&records).len(), 3);

    let only_x = SubgroupFilter::from_option("x").apply(&records);
    assert_eq!(only_x.len(), 2);
    assert_eq!(only_x.issues(), records.issues());
    assert_eq!(SubgroupFilter::from_option("x").label(), "x");
}

#[test]
fn tokenize_collapses_whitespace_and_lowercases() {
    assert_eq!(tokenize("Site A"), "site-a");
    assert_eq!(tokenize("Two   Spaces\tTab"), "two-spaces-tab");
    assert_eq!(tokenize("plain"), "plain");
}
