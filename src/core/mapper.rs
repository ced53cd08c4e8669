use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::core::accessor::{AccessorSpec, Role};
use crate::core::value::{FieldType, Value};

/// One raw record as delivered by the data source.
pub type Row = serde_json::Map<String, JsonValue>;

/// How mapped record fields are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKeying {
    /// Fields are named after their role (`group`, `value`, ...).
    ByRole,
    /// Fields keep the raw field key from the accessor.
    ByField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    MissingField,
    NotANumber,
    InvalidDate,
}

/// Recoverable per-record coercion problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIssue {
    pub row: usize,
    pub role: Role,
    pub key: String,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappedRecord {
    fields: IndexMap<String, Value>,
}

impl MappedRecord {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Mapped records together with the naming convention used to build them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    keying: RecordKeying,
    columns: IndexMap<Role, String>,
    records: Vec<MappedRecord>,
    issues: Vec<RecordIssue>,
}

impl RecordSet {
    #[must_use]
    pub fn keying(&self) -> RecordKeying {
        self.keying
    }

    #[must_use]
    pub fn records(&self) -> &[MappedRecord] {
        &self.records
    }

    #[must_use]
    pub fn issues(&self) -> &[RecordIssue] {
        &self.issues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Field name under which `role` is stored in each record.
    #[must_use]
    pub fn column(&self, role: Role) -> Option<&str> {
        self.columns.get(&role).map(String::as_str)
    }

    #[must_use]
    pub fn value<'a>(&self, record: &'a MappedRecord, role: Role) -> Option<&'a Value> {
        record.field(self.column(role)?)
    }

    /// Keeps the records for which `keep` returns `true`, preserving order.
    #[must_use]
    pub fn retain_records(&self, mut keep: impl FnMut(&MappedRecord) -> bool) -> Self {
        Self {
            keying: self.keying,
            columns: self.columns.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
            issues: self.issues.clone(),
        }
    }
}

/// Applies accessor coercion to every row.
///
/// Output has exactly one record per input row, in input order. Malformed
/// values are kept (as NaN / invalid dates) and reported as issues.
#[must_use]
pub fn map_rows(rows: &[Row], accessors: &AccessorSpec, keying: RecordKeying) -> RecordSet {
    let columns: IndexMap<Role, String> = accessors
        .iter()
        .map(|(role, accessor)| {
            let name = match keying {
                RecordKeying::ByRole => role.as_str().to_owned(),
                RecordKeying::ByField => accessor.key.clone(),
            };
            (role, name)
        })
        .collect();

    let mut records = Vec::with_capacity(rows.len());
    let mut issues = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        let mut fields = IndexMap::with_capacity(accessors.len());
        for ((role, accessor), name) in accessors.iter().zip(columns.values()) {
            let raw = row.get(&accessor.key);
            let value = Value::coerce(accessor.field_type, raw);
            let kind = if raw.is_none() {
                Some(IssueKind::MissingField)
            } else if !value.is_valid() {
                Some(match accessor.field_type {
                    FieldType::Date => IssueKind::InvalidDate,
                    _ => IssueKind::NotANumber,
                })
            } else {
                None
            };
            if let Some(kind) = kind {
                issues.push(RecordIssue {
                    row: index,
                    role,
                    key: accessor.key.clone(),
                    kind,
                });
            }
            fields.insert(name.clone(), value);
        }
        records.push(MappedRecord { fields });
    }

    if !issues.is_empty() {
        warn!(
            rows = rows.len(),
            issues = issues.len(),
            "mapped rows with coercion issues"
        );
    }
    debug!(rows = rows.len(), roles = accessors.len(), ?keying, "mapped rows");

    RecordSet {
        keying,
        columns,
        records,
        issues,
    }
}
