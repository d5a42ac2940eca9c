//! Value objects shared by query building, transport and metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::edm::EdmType;

/// A selectable or filterable field and its EDM type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub edm_type: EdmType,
}

impl Property {
    pub fn new(name: impl Into<String>, edm_type: impl Into<EdmType>) -> Self {
        Self {
            name: name.into(),
            edm_type: edm_type.into(),
        }
    }
}

/// `<property> <operator> <value>`; the operator is passed through verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub property: Property,
    pub operator: String,
    pub value: String,
}

impl FilterCondition {
    pub fn new(property: Property, operator: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property,
            operator: operator.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySetRef {
    pub name: String,
    #[serde(default)]
    pub entity_type: String,
}

/// Inclusive time window applied to the time property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }
}
