//! Error taxonomy for the OData translation layer
//!
//! Each variant maps to one failure class of a query, health check or
//! metadata call. Transport timeouts are kept apart from other transport
//! failures so callers can tell a slow service from an unreachable one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ODataError {
    /// Query payload could not be deserialized
    #[error("error unmarshalling query json: {0}")]
    InvalidQuery(#[source] serde_json::Error),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Entity fetch answered with something other than 200
    #[error("get failed - code {status}{}", format_body(.body))]
    Status { status: u16, body: String },

    #[error("get metadata failed with status code {status}")]
    MetadataStatus { status: u16 },

    /// Response body was not valid JSON
    #[error("error decoding response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("error parsing metadata xml: {0}")]
    MetadataParse(String),

    #[error("cannot convert {value} to {edm_type}")]
    ValueCoercion { value: String, edm_type: String },

    #[error("cannot parse '{0}' as a time literal")]
    TimeParse(String),

    #[error("error encoding response body: {0}")]
    Encode(#[source] serde_json::Error),
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

impl ODataError {
    /// Classify an HTTP client error, keeping timeouts distinguishable
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ODataError::Timeout(err)
        } else {
            ODataError::Transport(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ODataError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, ODataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_with_body() {
        let err = ODataError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "get failed - code 500: boom");
    }

    #[test]
    fn test_status_message_without_body() {
        let err = ODataError::Status {
            status: 404,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "get failed - code 404");
    }

    #[test]
    fn test_invalid_query_prefix() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ODataError::InvalidQuery(parse_err);
        assert!(err.to_string().starts_with("error unmarshalling query json"));
    }
}
