//! Time literal grammar
//!
//! OData v2 services emit `/Date(<millis>[+|-<minutes>])/`, later versions
//! emit RFC 3339. Some services also return bare dates or timestamps
//! without a zone. All of them resolve to a UTC instant.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::{ODataError, Result};

const DATE_ONLY: &str = "%Y-%m-%d";
const DATE_TIME_WITHOUT_TZ: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse an OData time literal, trying each grammar in turn
pub fn parse_time(literal: &str) -> Result<DateTime<Utc>> {
    if literal.starts_with('/') {
        if let Some(ts) = parse_legacy_date(literal).filter(|ts| !is_zero(ts)) {
            return Ok(ts);
        }
    }

    let parsers: [fn(&str) -> Option<DateTime<Utc>>; 3] =
        [parse_rfc3339, parse_date_only, parse_without_zone];
    parsers
        .iter()
        .filter_map(|parse| parse(literal))
        .find(|ts| !is_zero(ts))
        .ok_or_else(|| ODataError::TimeParse(literal.to_string()))
}

/// `/Date(1672531200000+0060)/` style literal.
///
/// The optional suffix is an offset in minutes, added to (or for `-`
/// subtracted from) the instant.
fn parse_legacy_date(literal: &str) -> Option<DateTime<Utc>> {
    let inner = literal.strip_prefix("/Date(")?.strip_suffix(")/")?;

    // a leading sign belongs to the millis, not the offset
    let (millis, offset_minutes) = match inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
    {
        Some((idx, sign)) => {
            let minutes: i64 = inner[idx + 1..].parse().ok()?;
            let sign = if sign == '-' { -1 } else { 1 };
            (&inner[..idx], sign * minutes)
        }
        None => (inner, 0),
    };

    let millis: i64 = millis.parse().ok()?;
    let instant = DateTime::<Utc>::from_timestamp_millis(millis)?;
    instant.checked_add_signed(Duration::try_minutes(offset_minutes)?)
}

fn parse_rfc3339(literal: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(literal)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn parse_date_only(literal: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(literal, DATE_ONLY)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

fn parse_without_zone(literal: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(literal, DATE_TIME_WITHOUT_TZ)
        .ok()
        .map(|ts| ts.and_utc())
}

// 0001-01-01T00:00:00Z, the "no value" instant some services send
fn is_zero(ts: &DateTime<Utc>) -> bool {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .is_some_and(|zero| ts.naive_utc() == zero)
}
