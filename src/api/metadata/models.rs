//! Simplified EDM schema returned by the metadata resource

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::models::Property;

/// Entity types keyed by qualified name, entity sets keyed by set name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdmSchema {
    pub entity_types: BTreeMap<String, EntityTypeDescriptor>,
    pub entity_sets: BTreeMap<String, EntitySetDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTypeDescriptor {
    pub name: String,
    pub qualified_name: String,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySetDescriptor {
    pub name: String,
    pub entity_type: String,
}
