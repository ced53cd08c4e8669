//! Cached remote records shared read-only by chart instances.

mod redcap;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::Row;
use crate::error::{ChartError, ChartResult};

pub use redcap::RedcapConfig;
#[cfg(feature = "redcap")]
pub use redcap::RedcapSource;

/// Transport that produces a flat list of rows.
pub trait RecordSource {
    /// `cancel` may be checked by long-running transports; the store checks it
    /// before sending and before committing.
    fn fetch(&self, cancel: &CancelToken) -> ChartResult<Vec<Row>>;
}

/// Shared cancellation flag for an in-flight fetch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome of the last fetch of one cache.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FetchState {
    #[default]
    Idle,
    Loaded { rows: usize },
    Failed(String),
    Cancelled,
}

#[derive(Debug, Clone, Default)]
struct CacheEntry {
    rows: Option<Arc<Vec<Row>>>,
    state: FetchState,
}

/// Named record caches.
///
/// A failed or cancelled fetch leaves the previously cached rows in place.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    caches: IndexMap<String, CacheEntry>,
    retry_once: bool,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retries a failed transport call once before giving up.
    #[must_use]
    pub fn with_single_retry(mut self, retry_once: bool) -> Self {
        self.retry_once = retry_once;
        self
    }

    /// Fetches `cache` from `source` and returns the resulting state.
    pub fn fetch(
        &mut self,
        cache: &str,
        source: &dyn RecordSource,
        cancel: &CancelToken,
    ) -> FetchState {
        let state = match self.fetch_rows(cache, source, cancel) {
            Ok(rows) => {
                let state = FetchState::Loaded { rows: rows.len() };
                let entry = self.caches.entry(cache.to_owned()).or_default();
                entry.rows = Some(Arc::new(rows));
                state
            }
            Err(FetchOutcome::Cancelled) => {
                debug!(cache, "fetch cancelled");
                FetchState::Cancelled
            }
            Err(FetchOutcome::Failed(err)) => {
                warn!(cache, error = %err, "fetch failed");
                FetchState::Failed(err.to_string())
            }
        };
        self.caches.entry(cache.to_owned()).or_default().state = state.clone();
        state
    }

    fn fetch_rows(
        &self,
        cache: &str,
        source: &dyn RecordSource,
        cancel: &CancelToken,
    ) -> Result<Vec<Row>, FetchOutcome> {
        let attempts = if self.retry_once { 2 } else { 1 };
        let mut last_error = None;
        for attempt in 1..=attempts {
            if cancel.is_cancelled() {
                return Err(FetchOutcome::Cancelled);
            }
            match source.fetch(cancel) {
                Ok(rows) => {
                    if cancel.is_cancelled() {
                        return Err(FetchOutcome::Cancelled);
                    }
                    debug!(cache, attempt, rows = rows.len(), "fetch completed");
                    return Ok(rows);
                }
                Err(err @ ChartError::Fetch(_)) => {
                    debug!(cache, attempt, error = %err, "fetch attempt failed");
                    last_error = Some(err);
                }
                Err(err) => return Err(FetchOutcome::Failed(err)),
            }
        }
        Err(FetchOutcome::Failed(last_error.unwrap_or_else(|| {
            ChartError::Fetch("no fetch attempt was made".to_owned())
        })))
    }

    /// Cached rows, or `None` while nothing has been loaded.
    #[must_use]
    pub fn rows(&self, cache: &str) -> Option<Arc<Vec<Row>>> {
        self.caches.get(cache).and_then(|entry| entry.rows.clone())
    }

    #[must_use]
    pub fn state(&self, cache: &str) -> FetchState {
        self.caches
            .get(cache)
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    pub fn caches(&self) -> impl Iterator<Item = &str> {
        self.caches.keys().map(String::as_str)
    }
}

enum FetchOutcome {
    Cancelled,
    Failed(ChartError),
}
