//! Query payload sent by the host for every panel query

use serde::{Deserialize, Deserializer, Serialize};

use crate::api::models::{EntitySetRef, FilterCondition, Property, TimeRange};
use crate::error::{ODataError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryModel {
    #[serde(default)]
    pub entity_set: EntitySetRef,
    /// `null`, missing or nameless means no time column and no time window
    #[serde(default, deserialize_with = "named_property")]
    pub time_property: Option<Property>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub filter_conditions: Vec<FilterCondition>,
}

impl QueryModel {
    pub fn from_json(json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).map_err(ODataError::InvalidQuery)
    }

    /// Nothing selected: running it would fetch whole entities
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.time_property.is_none()
    }
}

fn named_property<'de, D>(deserializer: D) -> std::result::Result<Option<Property>, D::Error>
where
    D: Deserializer<'de>,
{
    let property = Option::<Property>::deserialize(deserializer)?;
    Ok(property.filter(|p| !p.name.is_empty()))
}

/// One query of a batch
#[derive(Debug, Clone)]
pub struct DataQuery {
    pub ref_id: String,
    /// Raw query payload, parsed lazily so a bad payload only fails its own query
    pub json: Vec<u8>,
    pub time_range: TimeRange,
}

impl DataQuery {
    pub fn new(ref_id: impl Into<String>, json: impl Into<Vec<u8>>, time_range: TimeRange) -> Self {
        Self {
            ref_id: ref_id.into(),
            json: json.into(),
            time_range,
        }
    }
}
