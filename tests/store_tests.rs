use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use dashchart::core::Row;
use dashchart::store::{CancelToken, FetchState, RecordSource, RecordStore, RedcapConfig};
use dashchart::{ChartError, ChartResult};
use serde_json::json;

/// Replays scripted responses and counts calls.
struct ScriptedSource {
    responses: RefCell<VecDeque<ChartResult<Vec<Row>>>>,
    calls: Cell<usize>,
    cancel_during_fetch: bool,
}

impl ScriptedSource {
    fn new(responses: Vec<ChartResult<Vec<Row>>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: Cell::new(0),
            cancel_during_fetch: false,
        }
    }
}

impl RecordSource for ScriptedSource {
    fn fetch(&self, cancel: &CancelToken) -> ChartResult<Vec<Row>> {
        self.calls.set(self.calls.get() + 1);
        if self.cancel_during_fetch {
            cancel.cancel();
        }
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ChartError::Fetch("script exhausted".to_owned())))
    }
}

fn rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            serde_json::from_value(json!({ "record_id": i.to_string() })).expect("row fixture")
        })
        .collect()
}

#[test]
fn successful_fetch_fills_the_cache() {
    let mut store = RecordStore::new();
    let source = ScriptedSource::new(vec![Ok(rows(3))]);

    let state = store.fetch("enrollment", &source, &CancelToken::new());

    assert_eq!(state, FetchState::Loaded { rows: 3 });
    assert_eq!(store.state("enrollment"), FetchState::Loaded { rows: 3 });
    assert_eq!(store.rows("enrollment").expect("cached rows").len(), 3);
    assert_eq!(store.caches().collect::<Vec<_>>(), vec!["enrollment"]);
    assert_eq!(store.state("unknown"), FetchState::Idle);
    assert!(store.rows("unknown").is_none());
}

#[test]
fn failure_keeps_previously_cached_rows() {
    let mut store = RecordStore::new();
    let source = ScriptedSource::new(vec![
        Ok(rows(2)),
        Err(ChartError::Fetch("timeout".to_owned())),
    ]);
    let cancel = CancelToken::new();

    store.fetch("enrollment", &source, &cancel);
    let state = store.fetch("enrollment", &source, &cancel);

    assert!(matches!(state, FetchState::Failed(message) if message.contains("timeout")));
    assert_eq!(store.rows("enrollment").expect("old rows kept").len(), 2);
}

#[test]
fn single_retry_recovers_from_one_transport_failure() {
    let mut store = RecordStore::new().with_single_retry(true);
    let source = ScriptedSource::new(vec![
        Err(ChartError::Fetch("reset".to_owned())),
        Ok(rows(1)),
    ]);

    let state = store.fetch("enrollment", &source, &CancelToken::new());

    assert_eq!(state, FetchState::Loaded { rows: 1 });
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn decode_errors_are_not_retried() {
    let mut store = RecordStore::new().with_single_retry(true);
    let source = ScriptedSource::new(vec![
        Err(ChartError::InvalidData("bad json".to_owned())),
        Ok(rows(1)),
    ]);

    let state = store.fetch("enrollment", &source, &CancelToken::new());

    assert!(matches!(state, FetchState::Failed(_)));
    assert_eq!(source.calls.get(), 1);
}

#[test]
fn cancelled_requests_never_commit() {
    let mut store = RecordStore::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let source = ScriptedSource::new(vec![Ok(rows(1))]);

    assert_eq!(store.fetch("enrollment", &source, &cancel), FetchState::Cancelled);
    assert_eq!(source.calls.get(), 0);
    assert!(store.rows("enrollment").is_none());

    let mut late = ScriptedSource::new(vec![Ok(rows(4))]);
    late.cancel_during_fetch = true;
    let cancel = CancelToken::new();
    assert_eq!(store.fetch("enrollment", &late, &cancel), FetchState::Cancelled);
    assert!(cancel.is_cancelled());
    assert!(store.rows("enrollment").is_none());
}

#[test]
fn redcap_export_form_requests_flat_json_records() {
    let config = RedcapConfig::new("https://redcap.example.org/api/", "secret")
        .with_fields(vec!["record_id".to_owned(), "arm".to_owned()])
        .with_timeout(Duration::from_secs(5));

    let form = config.export_form();
    let get = |key: &str| {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(get("token"), Some("secret"));
    assert_eq!(get("content"), Some("record"));
    assert_eq!(get("format"), Some("json"));
    assert_eq!(get("type"), Some("flat"));
    assert_eq!(get("returnFormat"), Some("json"));
    assert_eq!(get("fields[0]"), Some("record_id"));
    assert_eq!(get("fields[1]"), Some("arm"));
    assert_eq!(get("fields[2]"), None);
    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn redcap_defaults_export_the_record_id() {
    let config = RedcapConfig::new("https://redcap.example.org/api/", "secret");

    assert_eq!(config.fields, vec!["record_id"]);
    assert_eq!(config.timeout, Duration::from_secs(12));
}
