//! EDM type mapping
//!
//! Maps OData primitive type names to output column kinds and converts
//! loosely typed JSON values into typed cells.

pub mod time;
pub mod types;

pub use time::parse_time;
pub use types::{
    CellValue, ColumnKind, EdmType, coerce_value, coerce_value_or_null, column_kind_for,
};
