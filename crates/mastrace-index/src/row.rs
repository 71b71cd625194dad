use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use mastrace_types::empty_object;
use rusqlite::types::ValueRef;
use rusqlite::{Row, Statement};
use serde_json::Value;
use tracing::warn;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Name → index lookup for one `SELECT *` statement.
///
/// Accessors take a column name; a column the table does not have reads as
/// NULL.
pub(crate) struct Columns {
    table: &'static str,
    index: HashMap<String, usize>,
}

impl Columns {
    pub fn new(table: &'static str, stmt: &Statement<'_>) -> Self {
        let index = stmt
            .column_names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_ascii_lowercase(), i))
            .collect();
        Self { table, index }
    }

    fn raw<'a>(&self, row: &'a Row<'_>, name: &str) -> rusqlite::Result<ValueRef<'a>> {
        match self.index.get(name) {
            Some(&i) => row.get_ref(i),
            None => Ok(ValueRef::Null),
        }
    }

    /// Identifier column rendered as text. SQLite stores ids as INTEGER or
    /// TEXT depending on the logger version.
    pub fn id<T: From<String>>(&self, row: &Row<'_>, name: &str) -> rusqlite::Result<Option<T>> {
        let text = match self.raw(row, name)? {
            ValueRef::Integer(i) => Some(i.to_string()),
            ValueRef::Real(f) if f.fract() == 0.0 && f.is_finite() => Some((f as i64).to_string()),
            ValueRef::Real(f) => Some(f.to_string()),
            ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Null | ValueRef::Blob(_) => None,
        };
        Ok(text.filter(|s| !s.is_empty()).map(T::from))
    }

    pub fn text(&self, row: &Row<'_>, name: &str) -> rusqlite::Result<Option<String>> {
        Ok(match self.raw(row, name)? {
            ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Integer(i) => Some(i.to_string()),
            ValueRef::Real(f) => Some(f.to_string()),
            ValueRef::Null | ValueRef::Blob(_) => None,
        })
    }

    pub fn real(&self, row: &Row<'_>, name: &str) -> rusqlite::Result<Option<f64>> {
        Ok(match self.raw(row, name)? {
            ValueRef::Real(f) => Some(f),
            ValueRef::Integer(i) => Some(i as f64),
            ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).trim().parse().ok(),
            ValueRef::Null | ValueRef::Blob(_) => None,
        })
    }

    pub fn flag(&self, row: &Row<'_>, name: &str) -> rusqlite::Result<bool> {
        Ok(match self.raw(row, name)? {
            ValueRef::Integer(i) => i != 0,
            ValueRef::Real(f) => f != 0.0,
            ValueRef::Text(bytes) => {
                let text = String::from_utf8_lossy(bytes);
                matches!(text.trim().to_ascii_lowercase().as_str(), "1" | "true")
            }
            ValueRef::Null | ValueRef::Blob(_) => false,
        })
    }

    /// Text timestamp in RFC 3339 or `YYYY-MM-DD HH:MM:SS[.f]` (UTC).
    pub fn timestamp(&self, row: &Row<'_>, name: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
        let Some(text) = self.text(row, name)? else {
            return Ok(None);
        };
        let parsed = parse_timestamp(&text);
        if parsed.is_none() {
            warn!(table = self.table, column = name, value = %text, "unparseable timestamp");
        }
        Ok(parsed)
    }

    /// JSON text column; NULL, empty or malformed text reads as `{}`.
    pub fn json(&self, row: &Row<'_>, name: &str) -> rusqlite::Result<Value> {
        let text = self.text(row, name)?;
        let Some(raw) = text.as_deref().filter(|t| !t.trim().is_empty()) else {
            return Ok(empty_object());
        };
        match serde_json::from_str(raw) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    table = self.table,
                    column = name,
                    error = %err,
                    "malformed JSON column, using {{}}"
                );
                Ok(empty_object())
            }
        }
    }
}

pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}
