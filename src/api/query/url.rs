//! Request URL construction
//!
//! Query parameters are sorted by name and percent-encoded, which puts
//! `$filter` before `$select`. Spaces are written as `+` unless the
//! instance asks for `%20`.

use log::debug;
use reqwest::Url;

use super::filters::build_filter;
use crate::api::constants::{FILTER, SELECT};
use crate::api::models::{FilterCondition, Property, TimeRange};
use crate::config::UrlSpaceEncoding;
use crate::error::{ODataError, Result};

/// Build the entity collection URL for one query
pub fn build_query_url(
    base_url: &str,
    entity_set: &str,
    properties: &[Property],
    time_property: Option<&Property>,
    filter: &str,
    space_encoding: UrlSpaceEncoding,
) -> Result<Url> {
    let mut url = join_url(base_url, entity_set)?;

    let mut params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if !filter.is_empty() {
        params.push((FILTER.to_string(), filter.to_string()));
    }
    let select = map_select(properties, time_property);
    if !select.is_empty() {
        params.push((SELECT.to_string(), select));
    }

    if params.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&encode_query(&mut params, space_encoding)));
    }
    Ok(url)
}

/// [`build_query_url`] with the filter built from the time window and conditions
pub fn build_entities_url(
    base_url: &str,
    entity_set: &str,
    properties: &[Property],
    time_property: Option<&Property>,
    time_range: Option<&TimeRange>,
    conditions: &[FilterCondition],
    space_encoding: UrlSpaceEncoding,
) -> Result<Url> {
    let filter = build_filter(time_property, time_range, conditions);
    let url = build_query_url(
        base_url,
        entity_set,
        properties,
        time_property,
        &filter,
        space_encoding,
    )?;
    debug!("Constructed request url: {}", url);
    Ok(url)
}

/// Append `segment` to the path of `base_url`, collapsing duplicate slashes
pub fn join_url(base_url: &str, segment: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| ODataError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    let joined: Vec<&str> = url
        .path()
        .split('/')
        .chain(segment.split('/'))
        .filter(|part| !part.is_empty())
        .collect();
    let path = format!("/{}", joined.join("/"));
    url.set_path(&path);
    Ok(url)
}

/// `$select` list in the given order, time property last
pub fn map_select(properties: &[Property], time_property: Option<&Property>) -> String {
    properties
        .iter()
        .map(|p| p.name.as_str())
        .chain(
            time_property
                .map(|p| p.name.as_str())
                .filter(|name| !name.is_empty()),
        )
        .collect::<Vec<_>>()
        .join(",")
}

fn encode_query(params: &mut [(String, String)], space_encoding: UrlSpaceEncoding) -> String {
    params.sort_by(|a, b| a.0.cmp(&b.0));

    let encoded = params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&");

    // literal `%` is always escaped as %25, so %20 only ever stands for a space
    match space_encoding {
        UrlSpaceEncoding::Plus => encoded.replace("%20", "+"),
        UrlSpaceEncoding::Percent20 => encoded,
    }
}

fn encode_component(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
