//! Response envelope decoding
//!
//! OData services wrap entity collections differently depending on the
//! protocol generation:
//!
//! - v3/v4: `{"value": [...]}`
//! - v2: `{"d": {"results": [...]}}` or `{"d": [...]}`
//! - bare: `{"results": [...]}`

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::api::client::RawResponse;
use crate::api::constants::{envelope, headers};
use crate::config::ODataVersion;
use crate::error::{ODataError, Result};

/// One decoded entity: field name to raw JSON value
pub type EntityRecord = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Envelope {
    Value,
    DResults,
    DArray,
    Results,
}

const DEFAULT_ORDER: [Envelope; 4] = [
    Envelope::Value,
    Envelope::DResults,
    Envelope::DArray,
    Envelope::Results,
];

const V2_ORDER: [Envelope; 4] = [
    Envelope::DResults,
    Envelope::DArray,
    Envelope::Value,
    Envelope::Results,
];

impl Envelope {
    fn entries_in<'a>(&self, body: &'a Map<String, Value>) -> Option<&'a Vec<Value>> {
        match self {
            Envelope::Value => body.get(envelope::VALUE)?.as_array(),
            Envelope::DResults => body
                .get(envelope::D)?
                .as_object()?
                .get(envelope::RESULTS)?
                .as_array(),
            Envelope::DArray => body.get(envelope::D)?.as_array(),
            Envelope::Results => body.get(envelope::RESULTS)?.as_array(),
        }
    }
}

/// Decode an entity collection body, trying each known envelope in order.
///
/// Valid JSON without a recognisable envelope decodes to no records.
pub fn decode_entities(body: &[u8]) -> Result<Vec<EntityRecord>> {
    decode_entities_as(body, ODataVersion::Auto)
}

/// Same as [`decode_entities`], trying the envelopes of `version` first
pub fn decode_entities_as(body: &[u8], version: ODataVersion) -> Result<Vec<EntityRecord>> {
    let json: Value = serde_json::from_slice(body).map_err(ODataError::Decode)?;

    let Some(object) = json.as_object() else {
        debug!("Response body is not a JSON object, no entities decoded");
        return Ok(Vec::new());
    };

    let order = match version {
        ODataVersion::V2 => &V2_ORDER,
        _ => &DEFAULT_ORDER,
    };

    let Some((shape, entries)) = order
        .iter()
        .find_map(|shape| shape.entries_in(object).map(|entries| (shape, entries)))
    else {
        debug!("No known response envelope found, no entities decoded");
        return Ok(Vec::new());
    };
    debug!("Decoding {:?} envelope with {} entries", shape, entries.len());

    let records = entries
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(record) => Some(record.clone()),
            other => {
                warn!("Skipping non-object entity entry: {}", other);
                None
            }
        })
        .collect();
    Ok(records)
}

/// Decide which protocol version a response speaks.
///
/// Only `Auto` consults the headers: `DataServiceVersion` starting with
/// `2` or `3`, else `OData-Version` starting with `4`. Anything else stays
/// `Auto`, which decodes the v4 way.
pub fn resolve_version(configured: ODataVersion, response: &RawResponse) -> ODataVersion {
    if configured != ODataVersion::Auto {
        return configured;
    }

    let data_service_version = response
        .header(headers::DATA_SERVICE_VERSION)
        .unwrap_or_default();
    if data_service_version.starts_with('2') {
        return ODataVersion::V2;
    }
    if data_service_version.starts_with('3') {
        return ODataVersion::V3;
    }

    let odata_version = response.header(headers::ODATA_VERSION).unwrap_or_default();
    if odata_version.starts_with('4') {
        ODataVersion::V4
    } else {
        ODataVersion::Auto
    }
}
