use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Declared type of an accessor field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Date,
}

/// A field value after accessor coercion.
///
/// `Number(NaN)` and `Date(None)` are the permissive results of coercing
/// malformed input; they are kept rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    String(String),
    Number(f64),
    Date(Option<DateTime<Utc>>),
}

/// Hashable identity of a [`Value`] used for unique-set extraction.
///
/// Equality is strict equality after coercion: `0.0 == -0.0`, dates compare
/// by instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    String(String),
    Number(OrderedFloat<f64>),
    Date(i64),
}

impl Value {
    /// Coerces a raw field. `None` means the field is absent from the row.
    #[must_use]
    pub fn coerce(field_type: FieldType, raw: Option<&JsonValue>) -> Self {
        match field_type {
            FieldType::String => Self::String(coerce_string(raw)),
            FieldType::Number => Self::Number(coerce_number(raw)),
            FieldType::Date => Self::Date(coerce_date(raw)),
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Date(Some(d)) => Some(d.timestamp_millis() as f64),
            Self::Date(None) => Some(f64::NAN),
            Self::String(_) => None,
        }
    }

    /// Numeric view used by aggregations: strings and invalid dates are NaN.
    #[must_use]
    pub fn number_or_nan(&self) -> f64 {
        self.as_f64().unwrap_or(f64::NAN)
    }

    /// Returns `false` for NaN numbers and invalid dates.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Self::String(_) => true,
            Self::Number(v) => !v.is_nan(),
            Self::Date(d) => d.is_some(),
        }
    }

    #[must_use]
    pub fn key(&self) -> Option<ValueKey> {
        match self {
            Self::String(s) => Some(ValueKey::String(s.clone())),
            Self::Number(v) if v.is_nan() => None,
            Self::Number(v) => Some(ValueKey::Number(OrderedFloat(*v))),
            Self::Date(Some(d)) => Some(ValueKey::Date(d.timestamp_millis())),
            Self::Date(None) => None,
        }
    }

    /// Element-identifier token for this value.
    #[must_use]
    pub fn token(&self) -> String {
        tokenize(&self.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(v) => f.write_str(&format_number(*v)),
            Self::Date(Some(d)) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            Self::Date(None) => f.write_str("Invalid Date"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Replaces whitespace runs with `-` and lowercases.
#[must_use]
pub fn tokenize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// Formats a number the way a dashboard label expects (`119`, `2.5`, `NaN`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        }
    } else if value == 0.0 {
        "0".to_owned()
    } else {
        format!("{value}")
    }
}

fn coerce_string(raw: Option<&JsonValue>) -> String {
    match raw {
        None => "undefined".to_owned(),
        Some(JsonValue::Null) => "null".to_owned(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .map_or_else(|| n.to_string(), format_number),
        Some(other) => other.to_string(),
    }
}

fn coerce_number(raw: Option<&JsonValue>) -> f64 {
    match raw {
        None => f64::NAN,
        Some(JsonValue::Null) => 0.0,
        Some(JsonValue::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(JsonValue::String(s)) => parse_numeric_str(s),
        Some(_) => f64::NAN,
    }
}

fn parse_numeric_str(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // Rust accepts spellings such as `inf` and `nan` that a dashboard export never means.
    if trimmed
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn coerce_date(raw: Option<&JsonValue>) -> Option<DateTime<Utc>> {
    match raw? {
        JsonValue::Null => DateTime::from_timestamp_millis(0),
        JsonValue::Number(n) => {
            let millis = n.as_f64()?;
            if !millis.is_finite() {
                return None;
            }
            DateTime::from_timestamp_millis(millis as i64)
        }
        JsonValue::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
