use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

/// A single cell value read out of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    List(Vec<String>),
    Json(Value),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::text)
    }

    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Date)
    }

    pub fn opt_decimal(value: Option<Decimal>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Decimal)
    }

    pub fn opt_int<N: Into<i64>>(value: Option<N>) -> Self {
        value.map_or(FieldValue::Null, |n| FieldValue::Int(n.into()))
    }

    pub fn timestamp_ms(ms: i64) -> Self {
        FieldValue::Timestamp(crate::time::to_date(ms))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text used for default cell rendering and for search matching.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Decimal(d) => d.normalize().to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Timestamp(ts) => ts.format("%Y-%m-%d").to_string(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Json(v) => v.to_string(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Int(_) | FieldValue::Decimal(_) => 1,
            FieldValue::Date(_) | FieldValue::Timestamp(_) => 2,
            FieldValue::Text(_) => 3,
            FieldValue::List(_) => 4,
            FieldValue::Json(_) => 5,
            FieldValue::Null => 6,
        }
    }

    fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Int(n) => Some(Decimal::from(*n)),
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    fn as_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(d.and_time(NaiveTime::default()).and_utc()),
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Natural ordering between two cell values.
    ///
    /// Values of different kinds order by kind rank; `Null` ranks after
    /// everything. Callers that want nulls last in both directions must handle
    /// `Null` before reversing (see [`crate::table::sort_rows`]).
    pub fn natural_cmp(&self, other: &FieldValue) -> Ordering {
        let (left_rank, right_rank) = (self.rank(), other.rank());
        if left_rank != right_rank {
            return left_rank.cmp(&right_rank);
        }
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (FieldValue::List(a), FieldValue::List(b)) => a.cmp(b),
            (FieldValue::Json(a), FieldValue::Json(b)) => a.to_string().cmp(&b.to_string()),
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            _ => {
                if let (Some(a), Some(b)) = (self.as_decimal(), other.as_decimal()) {
                    a.cmp(&b)
                } else if let (Some(a), Some(b)) = (self.as_instant(), other.as_instant()) {
                    a.cmp(&b)
                } else {
                    Ordering::Equal
                }
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::text(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}
