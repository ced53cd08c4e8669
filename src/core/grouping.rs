use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::accessor::Role;
use crate::core::mapper::RecordSet;
use crate::core::value::{Value, ValueKey};

/// Sentinel filter option meaning "no filtering".
pub const FILTER_ALL: &str = "All";

/// Ordered-by-first-occurrence set of distinct values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UniqueValues {
    values: Vec<Value>,
}

impl UniqueValues {
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn position(&self, value: &Value) -> Option<usize> {
        let key = value.key()?;
        self.values.iter().position(|v| v.key().as_ref() == Some(&key))
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.values.iter().map(ToString::to_string).collect()
    }
}

/// Extracts distinct values of `role` in first-occurrence order.
///
/// NaN numbers and invalid dates never compare equal to anything and are
/// left out.
#[must_use]
pub fn unique_values(records: &RecordSet, role: Role) -> UniqueValues {
    let mut seen: IndexSet<ValueKey> = IndexSet::new();
    let mut values = Vec::new();
    for record in records.records() {
        let Some(value) = records.value(record, role) else {
            continue;
        };
        let Some(key) = value.key() else {
            continue;
        };
        if seen.insert(key) {
            values.push(value.clone());
        }
    }
    UniqueValues { values }
}

/// Subgroup filter applied before re-aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubgroupFilter {
    #[default]
    All,
    Only(String),
}

impl SubgroupFilter {
    /// Parses a filter-control value; `"All"` disables filtering.
    #[must_use]
    pub fn from_option(option: &str) -> Self {
        if option == FILTER_ALL {
            Self::All
        } else {
            Self::Only(option.to_owned())
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => FILTER_ALL,
            Self::Only(value) => value,
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns the records whose subgroup matches; `All` returns a copy.
    #[must_use]
    pub fn apply(&self, records: &RecordSet) -> RecordSet {
        match self {
            Self::All => records.clone(),
            Self::Only(selected) => records.retain_records(|record| {
                records
                    .value(record, Role::Subgroup)
                    .is_some_and(|value| value.to_string() == *selected)
            }),
        }
    }
}

/// Rounded min/max of a linear scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub const EMPTY: Self = Self { min: 0.0, max: 0.0 };
}

/// Running min/max accumulator.
///
/// `max` starts at 0 and `min` at `+∞`; non-finite samples are skipped.
/// `finish` rounds `max` up and `min` down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtentAccumulator {
    min: f64,
    max: f64,
    samples: usize,
}

impl Default for ExtentAccumulator {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: 0.0,
            samples: 0,
        }
    }
}

impl ExtentAccumulator {
    pub fn push(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.samples += 1;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Feeds only the minimum side, used when `max` is tracked separately.
    pub fn push_min(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.samples += 1;
        if value < self.min {
            self.min = value;
        }
    }

    pub fn push_max(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.samples += 1;
        if value > self.max {
            self.max = value;
        }
    }

    #[must_use]
    pub fn finish(self) -> Extent {
        if self.samples == 0 {
            return Extent::EMPTY;
        }
        let min = if self.min.is_finite() { self.min } else { 0.0 };
        Extent {
            min: min.floor(),
            max: self.max.ceil(),
        }
    }
}
