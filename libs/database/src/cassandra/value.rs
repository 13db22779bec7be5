use std::collections::HashMap;
use std::fmt;

use scylla::value::{CqlDuration, CqlValue, Row};

use super::error::CursorError;

/// A single cell decoded from a result row.
///
/// The set of kinds is closed: every scalar the store returns is folded into
/// one of these variants. Identifier-like and calendar types (uuid, timeuuid,
/// inet, date, time, duration) are carried as their canonical text form.
#[derive(Debug, Clone, PartialEq)]
pub enum CasValue {
    Text(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    /// Milliseconds since the unix epoch
    Timestamp(i64),
    Blob(Vec<u8>),
    Null,
}

/// One result row, keyed by column name
pub type CasRow = HashMap<String, CasValue>;

/// All rows of a result, in cursor order
pub type CasRows = Vec<CasRow>;

impl CasValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CasValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CasValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CasValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            CasValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CasValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Decode a driver cell. `column` is only used for error reporting.
    pub fn from_cql(column: &str, cell: Option<CqlValue>) -> Result<Self, CursorError> {
        let Some(value) = cell else {
            return Ok(CasValue::Null);
        };

        let decoded = match value {
            CqlValue::Empty => CasValue::Null,
            CqlValue::Ascii(s) | CqlValue::Text(s) => CasValue::Text(s),
            CqlValue::TinyInt(i) => CasValue::Int(i.into()),
            CqlValue::SmallInt(i) => CasValue::Int(i.into()),
            CqlValue::Int(i) => CasValue::Int(i.into()),
            CqlValue::BigInt(i) => CasValue::Int(i),
            CqlValue::Counter(c) => CasValue::Int(c.0),
            CqlValue::Float(f) => CasValue::Float(f.into()),
            CqlValue::Double(f) => CasValue::Float(f),
            CqlValue::Boolean(b) => CasValue::Boolean(b),
            CqlValue::Timestamp(ts) => CasValue::Timestamp(ts.0),
            CqlValue::Blob(bytes) => CasValue::Blob(bytes),
            CqlValue::Uuid(uuid) => CasValue::Text(uuid.to_string()),
            CqlValue::Timeuuid(uuid) => CasValue::Text(uuid.to_string()),
            CqlValue::Inet(addr) => CasValue::Text(addr.to_string()),
            CqlValue::Date(date) => {
                let date: chrono::NaiveDate = date.try_into().map_err(|_| {
                    CursorError::OutOfRange {
                        column: column.to_string(),
                        kind: "date",
                    }
                })?;
                CasValue::Text(date.to_string())
            }
            CqlValue::Time(time) => {
                let time: chrono::NaiveTime = time.try_into().map_err(|_| {
                    CursorError::OutOfRange {
                        column: column.to_string(),
                        kind: "time",
                    }
                })?;
                CasValue::Text(time.to_string())
            }
            CqlValue::Duration(duration) => CasValue::Text(format_duration(&duration)),
            other => {
                return Err(CursorError::UnsupportedType {
                    column: column.to_string(),
                    kind: kind_name(&other),
                });
            }
        };

        Ok(decoded)
    }
}

impl fmt::Display for CasValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CasValue::Text(s) => write!(f, "{s}"),
            CasValue::Int(i) => write!(f, "{i}"),
            CasValue::Float(v) => write!(f, "{v}"),
            CasValue::Boolean(b) => write!(f, "{b}"),
            CasValue::Timestamp(ms) => write!(f, "{ms}"),
            CasValue::Blob(bytes) => {
                write!(f, "0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            CasValue::Null => write!(f, "null"),
        }
    }
}

/// Zip a driver row with its column names.
pub(crate) fn decode_row(columns: &[String], row: Row) -> Result<CasRow, CursorError> {
    if row.columns.len() != columns.len() {
        return Err(CursorError::ColumnCount {
            expected: columns.len(),
            actual: row.columns.len(),
        });
    }

    columns
        .iter()
        .zip(row.columns)
        .map(|(name, cell)| Ok((name.clone(), CasValue::from_cql(name, cell)?)))
        .collect()
}

/// CQL duration literal, e.g. `1mo2d30ns`
fn format_duration(duration: &CqlDuration) -> String {
    let mut out = String::new();
    if duration.months != 0 {
        out.push_str(&format!("{}mo", duration.months));
    }
    if duration.days != 0 {
        out.push_str(&format!("{}d", duration.days));
    }
    if duration.nanoseconds != 0 || out.is_empty() {
        out.push_str(&format!("{}ns", duration.nanoseconds));
    }
    out
}

fn kind_name(value: &CqlValue) -> &'static str {
    match value {
        CqlValue::List(_) => "list",
        CqlValue::Set(_) => "set",
        CqlValue::Map(_) => "map",
        CqlValue::Tuple(_) => "tuple",
        CqlValue::UserDefinedType { .. } => "udt",
        CqlValue::Decimal(_) => "decimal",
        CqlValue::Varint(_) => "varint",
        _ => "unknown",
    }
}
