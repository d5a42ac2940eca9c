use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;

use super::constants::{METADATA, headers};
use super::models::{FilterCondition, Property, TimeRange};
use super::query::url::{build_entities_url, join_url};
use crate::config::{InstanceSettings, ODataVersion, UrlSpaceEncoding};
use crate::error::{ODataError, Result};

/// A fully read HTTP response.
///
/// The body is drained before the response is handed out, so the
/// connection goes back to the pool on every path. Header names are
/// stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_lowercase(), value.into());
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The three requests issued against an OData service.
///
/// Non-2xx answers are not errors here; callers decide what a status means.
#[async_trait]
pub trait ODataClient: Send + Sync {
    /// Configured protocol version, `Auto` when the headers decide
    fn odata_version(&self) -> ODataVersion;

    async fn get_service_root(&self) -> Result<RawResponse>;

    async fn get_metadata(&self) -> Result<RawResponse>;

    async fn get_entities(
        &self,
        entity_set: &str,
        properties: &[Property],
        time_property: Option<&Property>,
        time_range: Option<&TimeRange>,
        conditions: &[FilterCondition],
    ) -> Result<RawResponse>;
}

/// reqwest-backed [`ODataClient`]
#[derive(Clone)]
pub struct HttpODataClient {
    http_client: reqwest::Client,
    base_url: String,
    url_space_encoding: UrlSpaceEncoding,
    odata_version: ODataVersion,
}

impl HttpODataClient {
    pub fn new(instance: &InstanceSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .timeout(instance.timeout)
            .connect_timeout(instance.connect_timeout)
            .user_agent(concat!("odata-datasource/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ODataError::from_transport)?;

        Ok(Self::with_custom_client(instance, http_client))
    }

    /// Create a client around an existing HTTP client (shared pool, custom TLS, ...)
    pub fn with_custom_client(instance: &InstanceSettings, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            base_url: instance.url.trim_end_matches('/').to_string(),
            url_space_encoding: instance.settings.url_space_encoding,
            odata_version: instance.settings.odata_version,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str, mime_type: &str) -> Result<RawResponse> {
        let response = self
            .http_client
            .get(url)
            .header(headers::ACCEPT, mime_type)
            .send()
            .await
            .map_err(ODataError::from_transport)?;

        let status = response.status().as_u16();
        debug!("Request response status: {}", response.status());

        let mut response_headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                response_headers.insert(name.as_str().to_lowercase(), value_str.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(ODataError::from_transport)?
            .to_vec();

        Ok(RawResponse {
            status,
            headers: response_headers,
            body,
        })
    }
}

#[async_trait]
impl ODataClient for HttpODataClient {
    fn odata_version(&self) -> ODataVersion {
        self.odata_version
    }

    async fn get_service_root(&self) -> Result<RawResponse> {
        self.get(&self.base_url, headers::CONTENT_TYPE_JSON).await
    }

    async fn get_metadata(&self) -> Result<RawResponse> {
        let url = join_url(&self.base_url, METADATA)?;
        self.get(url.as_str(), headers::CONTENT_TYPE_XML).await
    }

    async fn get_entities(
        &self,
        entity_set: &str,
        properties: &[Property],
        time_property: Option<&Property>,
        time_range: Option<&TimeRange>,
        conditions: &[FilterCondition],
    ) -> Result<RawResponse> {
        let url = build_entities_url(
            &self.base_url,
            entity_set,
            properties,
            time_property,
            time_range,
            conditions,
            self.url_space_encoding,
        )?;
        self.get(url.as_str(), headers::CONTENT_TYPE_JSON).await
    }
}
