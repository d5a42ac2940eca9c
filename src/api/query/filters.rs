//! OData `$filter` expression building
//!
//! Plain string concatenation. String values are wrapped in single quotes
//! but embedded quotes are not escaped, so a value containing `'` yields a
//! broken expression.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::api::models::{FilterCondition, Property, TimeRange};
use crate::edm::EdmType;

/// Combine the time window clause and the filter conditions into one expression
pub fn build_filter(
    time_property: Option<&Property>,
    time_range: Option<&TimeRange>,
    conditions: &[FilterCondition],
) -> String {
    let mut clauses = Vec::with_capacity(conditions.len() + 1);

    if let (Some(property), Some(range)) = (time_property, time_range) {
        clauses.push(time_range_clause(&property.name, range));
    }
    clauses.extend(conditions.iter().map(condition_to_odata));

    clauses.join(" and ")
}

fn time_range_clause(name: &str, range: &TimeRange) -> String {
    format!(
        "{name} ge {} and {name} le {}",
        format_instant(&range.from),
        format_instant(&range.to)
    )
}

/// RFC 3339, UTC, whole seconds
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn condition_to_odata(condition: &FilterCondition) -> String {
    format!(
        "{} {} {}",
        condition.property.name,
        condition.operator,
        value_to_odata(&condition.property.edm_type, &condition.value)
    )
}

fn value_to_odata(edm_type: &EdmType, value: &str) -> String {
    match edm_type {
        EdmType::String => format!("'{}'", value),
        _ => value.to_string(),
    }
}
