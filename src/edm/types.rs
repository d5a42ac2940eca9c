//! EDM primitive types, column kinds and value coercion

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::time::parse_time;
use crate::error::{ODataError, Result};

pub const EDM_STRING: &str = "Edm.String";
pub const EDM_BOOLEAN: &str = "Edm.Boolean";
pub const EDM_SINGLE: &str = "Edm.Single";
pub const EDM_DOUBLE: &str = "Edm.Double";
pub const EDM_DECIMAL: &str = "Edm.Decimal";
pub const EDM_SBYTE: &str = "Edm.SByte";
pub const EDM_BYTE: &str = "Edm.Byte";
pub const EDM_INT16: &str = "Edm.Int16";
pub const EDM_INT32: &str = "Edm.Int32";
pub const EDM_INT64: &str = "Edm.Int64";
pub const EDM_DATE_TIME_OFFSET: &str = "Edm.DateTimeOffset";
pub const EDM_DATE_TIME: &str = "Edm.DateTime";
pub const EDM_DATE: &str = "Edm.Date";
pub const EDM_GUID: &str = "Edm.Guid";
pub const EDM_TIME: &str = "Edm.Time";

/// OData primitive type name.
///
/// Names outside the known set are kept verbatim in `Other` so metadata
/// round-trips unchanged; they are handled as strings everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EdmType {
    String,
    Boolean,
    Single,
    Double,
    Decimal,
    SByte,
    Byte,
    Int16,
    Int32,
    Int64,
    DateTimeOffset,
    DateTime,
    Date,
    Guid,
    Time,
    Other(String),
}

impl EdmType {
    pub fn as_str(&self) -> &str {
        match self {
            EdmType::String => EDM_STRING,
            EdmType::Boolean => EDM_BOOLEAN,
            EdmType::Single => EDM_SINGLE,
            EdmType::Double => EDM_DOUBLE,
            EdmType::Decimal => EDM_DECIMAL,
            EdmType::SByte => EDM_SBYTE,
            EdmType::Byte => EDM_BYTE,
            EdmType::Int16 => EDM_INT16,
            EdmType::Int32 => EDM_INT32,
            EdmType::Int64 => EDM_INT64,
            EdmType::DateTimeOffset => EDM_DATE_TIME_OFFSET,
            EdmType::DateTime => EDM_DATE_TIME,
            EdmType::Date => EDM_DATE,
            EdmType::Guid => EDM_GUID,
            EdmType::Time => EDM_TIME,
            EdmType::Other(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            EdmType::Single
                | EdmType::Double
                | EdmType::Decimal
                | EdmType::SByte
                | EdmType::Byte
                | EdmType::Int16
                | EdmType::Int32
                | EdmType::Int64
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            EdmType::DateTimeOffset | EdmType::DateTime | EdmType::Date
        )
    }

    /// Column kind to allocate for values of this type
    pub fn column_kind(&self) -> ColumnKind {
        match self {
            EdmType::Boolean => ColumnKind::Bool,
            EdmType::Single => ColumnKind::Float32,
            EdmType::Double | EdmType::Decimal => ColumnKind::Float64,
            EdmType::SByte => ColumnKind::Int8,
            EdmType::Byte => ColumnKind::UInt8,
            EdmType::Int16 => ColumnKind::Int16,
            EdmType::Int32 => ColumnKind::Int32,
            EdmType::Int64 => ColumnKind::Int64,
            EdmType::DateTimeOffset | EdmType::DateTime | EdmType::Date => ColumnKind::Time,
            _ => ColumnKind::String,
        }
    }
}

impl From<&str> for EdmType {
    fn from(name: &str) -> Self {
        match name {
            EDM_STRING => EdmType::String,
            EDM_BOOLEAN => EdmType::Boolean,
            EDM_SINGLE => EdmType::Single,
            EDM_DOUBLE => EdmType::Double,
            EDM_DECIMAL => EdmType::Decimal,
            EDM_SBYTE => EdmType::SByte,
            EDM_BYTE => EdmType::Byte,
            EDM_INT16 => EdmType::Int16,
            EDM_INT32 => EdmType::Int32,
            EDM_INT64 => EdmType::Int64,
            EDM_DATE_TIME_OFFSET => EdmType::DateTimeOffset,
            EDM_DATE_TIME => EdmType::DateTime,
            EDM_DATE => EdmType::Date,
            EDM_GUID => EdmType::Guid,
            EDM_TIME => EdmType::Time,
            other => EdmType::Other(other.to_string()),
        }
    }
}

impl From<String> for EdmType {
    fn from(name: String) -> Self {
        match EdmType::from(name.as_str()) {
            EdmType::Other(_) => EdmType::Other(name),
            known => known,
        }
    }
}

impl From<EdmType> for String {
    fn from(edm_type: EdmType) -> Self {
        match edm_type {
            EdmType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Native storage kind of an output column; every column is nullable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Bool,
    Float32,
    Float64,
    Int8,
    UInt8,
    Int16,
    Int32,
    Int64,
    Time,
    String,
}

/// A single non-null cell value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Float32(f32),
    Float64(f64),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Time(DateTime<Utc>),
    String(String),
}

impl CellValue {
    pub fn kind(&self) -> ColumnKind {
        match self {
            CellValue::Bool(_) => ColumnKind::Bool,
            CellValue::Float32(_) => ColumnKind::Float32,
            CellValue::Float64(_) => ColumnKind::Float64,
            CellValue::Int8(_) => ColumnKind::Int8,
            CellValue::UInt8(_) => ColumnKind::UInt8,
            CellValue::Int16(_) => ColumnKind::Int16,
            CellValue::Int32(_) => ColumnKind::Int32,
            CellValue::Int64(_) => ColumnKind::Int64,
            CellValue::Time(_) => ColumnKind::Time,
            CellValue::String(_) => ColumnKind::String,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Float32(v) => write!(f, "{}", v),
            CellValue::Float64(v) => write!(f, "{}", v),
            CellValue::Int8(v) => write!(f, "{}", v),
            CellValue::UInt8(v) => write!(f, "{}", v),
            CellValue::Int16(v) => write!(f, "{}", v),
            CellValue::Int32(v) => write!(f, "{}", v),
            CellValue::Int64(v) => write!(f, "{}", v),
            CellValue::Time(v) => write!(f, "{}", v.to_rfc3339()),
            CellValue::String(v) => f.write_str(v),
        }
    }
}

/// Column kind for an EDM type name; unknown names map to strings
pub fn column_kind_for(type_name: &str) -> ColumnKind {
    EdmType::from(type_name).column_kind()
}

/// Convert a raw JSON value into a cell of the given EDM type.
///
/// `null` is always `Ok(None)`. Booleans must already be JSON booleans and
/// numerics must be numbers or numeric strings (no surrounding whitespace),
/// anything else is an error.
/// Unparseable time literals yield `Ok(None)`.
pub fn coerce_value(raw: &Value, edm_type: &EdmType) -> Result<Option<CellValue>> {
    if raw.is_null() {
        return Ok(None);
    }

    match edm_type {
        EdmType::Boolean => match raw.as_bool() {
            Some(value) => Ok(Some(CellValue::Bool(value))),
            None => Err(coercion_error(raw, edm_type)),
        },
        t if t.is_numeric() => {
            let number = to_f64(raw).ok_or_else(|| coercion_error(raw, edm_type))?;
            Ok(Some(narrow_number(number, edm_type)))
        }
        t if t.is_temporal() => Ok(parse_time(&stringify(raw)).ok().map(CellValue::Time)),
        _ => Ok(Some(CellValue::String(stringify(raw)))),
    }
}

/// Like [`coerce_value`] but failures become a null cell
pub fn coerce_value_or_null(raw: &Value, edm_type: &EdmType) -> Option<CellValue> {
    match coerce_value(raw, edm_type) {
        Ok(cell) => cell,
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

fn coercion_error(raw: &Value, edm_type: &EdmType) -> ODataError {
    ODataError::ValueCoercion {
        value: raw.to_string(),
        edm_type: edm_type.to_string(),
    }
}

fn to_f64(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

// `as` truncates toward zero (and saturates) when narrowing
fn narrow_number(value: f64, edm_type: &EdmType) -> CellValue {
    match edm_type {
        EdmType::Single => CellValue::Float32(value as f32),
        EdmType::SByte => CellValue::Int8(value as i8),
        EdmType::Byte => CellValue::UInt8(value as u8),
        EdmType::Int16 => CellValue::Int16(value as i16),
        EdmType::Int32 => CellValue::Int32(value as i32),
        EdmType::Int64 => CellValue::Int64(value as i64),
        _ => CellValue::Float64(value),
    }
}

/// Generic string conversion used for string-like and unknown types
pub fn stringify(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_column_kinds() {
        assert_eq!(column_kind_for("Edm.Boolean"), ColumnKind::Bool);
        assert_eq!(column_kind_for("Edm.Single"), ColumnKind::Float32);
        assert_eq!(column_kind_for("Edm.Double"), ColumnKind::Float64);
        assert_eq!(column_kind_for("Edm.Decimal"), ColumnKind::Float64);
        assert_eq!(column_kind_for("Edm.SByte"), ColumnKind::Int8);
        assert_eq!(column_kind_for("Edm.Byte"), ColumnKind::UInt8);
        assert_eq!(column_kind_for("Edm.Int16"), ColumnKind::Int16);
        assert_eq!(column_kind_for("Edm.Int32"), ColumnKind::Int32);
        assert_eq!(column_kind_for("Edm.Int64"), ColumnKind::Int64);
        assert_eq!(column_kind_for("Edm.DateTimeOffset"), ColumnKind::Time);
        assert_eq!(column_kind_for("Edm.DateTime"), ColumnKind::Time);
        assert_eq!(column_kind_for("Edm.Date"), ColumnKind::Time);
    }

    #[test]
    fn test_string_fallback_kinds() {
        for name in ["Edm.String", "Edm.Guid", "Edm.Time", "Edm.Binary", "string", ""] {
            assert_eq!(column_kind_for(name), ColumnKind::String, "{}", name);
        }
    }

    #[test]
    fn test_unknown_type_round_trips() {
        let edm_type = EdmType::from("Edm.GeographyPoint");
        assert_eq!(edm_type, EdmType::Other("Edm.GeographyPoint".to_string()));
        assert_eq!(edm_type.to_string(), "Edm.GeographyPoint");

        let json = serde_json::to_string(&EdmType::Int32).unwrap();
        assert_eq!(json, "\"Edm.Int32\"");
        let parsed: EdmType = serde_json::from_str("\"custom\"").unwrap();
        assert_eq!(parsed, EdmType::Other("custom".to_string()));
    }

    #[test]
    fn test_null_is_null_for_every_type() {
        for edm_type in [EdmType::Boolean, EdmType::Int32, EdmType::Date, EdmType::String] {
            assert_eq!(coerce_value(&Value::Null, &edm_type).unwrap(), None);
        }
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(
            coerce_value(&json!(true), &EdmType::Boolean).unwrap(),
            Some(CellValue::Bool(true))
        );
        assert!(coerce_value(&json!("true"), &EdmType::Boolean).is_err());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(
            coerce_value(&json!(10.0), &EdmType::Int32).unwrap(),
            Some(CellValue::Int32(10))
        );
        assert_eq!(
            coerce_value(&json!("12.5"), &EdmType::Double).unwrap(),
            Some(CellValue::Float64(12.5))
        );
        assert_eq!(
            coerce_value(&json!("1.5"), &EdmType::Decimal).unwrap(),
            Some(CellValue::Float64(1.5))
        );
        assert_eq!(
            coerce_value(&json!(2.5), &EdmType::Single).unwrap(),
            Some(CellValue::Float32(2.5))
        );
    }

    #[test]
    fn test_numeric_narrowing_truncates() {
        assert_eq!(
            coerce_value(&json!(9.99), &EdmType::Int16).unwrap(),
            Some(CellValue::Int16(9))
        );
        assert_eq!(
            coerce_value(&json!(-3.7), &EdmType::SByte).unwrap(),
            Some(CellValue::Int8(-3))
        );
        assert_eq!(
            coerce_value(&json!("200.9"), &EdmType::Byte).unwrap(),
            Some(CellValue::UInt8(200))
        );
        assert_eq!(
            coerce_value(&json!("9007199254740993"), &EdmType::Int64).unwrap(),
            Some(CellValue::Int64(9007199254740992))
        );
    }

    #[test]
    fn test_numeric_coercion_failure() {
        let err = coerce_value(&json!("abc"), &EdmType::Int32).unwrap_err();
        assert!(matches!(err, ODataError::ValueCoercion { .. }));
        assert!(coerce_value(&json!(true), &EdmType::Double).is_err());
        assert_eq!(coerce_value_or_null(&json!("abc"), &EdmType::Int32), None);
    }

    #[test]
    fn test_padded_numeric_string_is_rejected() {
        assert!(coerce_value(&json!(" 12 "), &EdmType::Int32).is_err());
        assert!(coerce_value(&json!("12\n"), &EdmType::Double).is_err());
        assert_eq!(coerce_value_or_null(&json!(" 12 "), &EdmType::Int32), None);
    }

    #[test]
    fn test_legacy_offset_out_of_range_is_null() {
        assert_eq!(
            coerce_value(&json!("/Date(0+999999999999999)/"), &EdmType::DateTime).unwrap(),
            None
        );
        assert_eq!(
            coerce_value_or_null(&json!("/Date(0+999999999999999)/"), &EdmType::DateTime),
            None
        );
    }

    #[test]
    fn test_time_coercion() {
        let expected = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            coerce_value(&json!("/Date(1672531200000)/"), &EdmType::DateTime).unwrap(),
            Some(CellValue::Time(expected))
        );
        assert_eq!(
            coerce_value(&json!("2023-01-01"), &EdmType::Date).unwrap(),
            Some(CellValue::Time(expected))
        );
        assert_eq!(
            coerce_value(&json!("not a date"), &EdmType::DateTimeOffset).unwrap(),
            None
        );
    }

    #[test]
    fn test_string_fallback_coercion() {
        assert_eq!(
            coerce_value(&json!("abc"), &EdmType::Guid).unwrap(),
            Some(CellValue::String("abc".to_string()))
        );
        assert_eq!(
            coerce_value(&json!(42), &EdmType::Other("Edm.Whatever".to_string())).unwrap(),
            Some(CellValue::String("42".to_string()))
        );
        assert_eq!(
            coerce_value(&json!(false), &EdmType::String).unwrap(),
            Some(CellValue::String("false".to_string()))
        );
    }
}
