//! Query orchestration
//!
//! Entry points the host calls: batched data queries, the health check and
//! resource calls. Each query of a batch succeeds or fails on its own.

pub mod frame;
pub mod models;

pub use frame::{DataFrame, Field, FrameMeta, Visualization};
pub use models::{DataQuery, QueryModel};

use futures::future::join_all;
use log::{debug, error, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::client::{HttpODataClient, ODataClient};
use crate::api::metadata::{EdmSchema, decode_edmx};
use crate::api::query::result::{decode_entities_as, resolve_version};
use crate::config::InstanceSettings;
use crate::edm::{CellValue, coerce_value_or_null};
use crate::error::{ODataError, Result};

/// Resource path serving the flattened metadata schema
pub const METADATA_RESOURCE: &str = "metadata";

/// Name of the time column; the property name goes into its label
pub const TIME_FIELD: &str = "time";

/// Outcome of one query
pub type DataResponse = Result<DataFrame>;

/// Outcomes keyed by ref id
#[derive(Debug, Default)]
pub struct QueryDataResponse {
    pub responses: BTreeMap<String, DataResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckHealthResult {
    pub status: HealthStatus,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResourceResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One configured OData datasource instance
#[derive(Clone)]
pub struct ODataSource {
    client: Arc<dyn ODataClient>,
}

impl ODataSource {
    pub fn new(client: Arc<dyn ODataClient>) -> Self {
        Self { client }
    }

    /// Build an instance backed by the HTTP client
    pub fn from_settings(instance: &InstanceSettings) -> Result<Self> {
        let client = HttpODataClient::new(instance)?;
        info!("Created OData datasource for {}", client.base_url());
        Ok(Self::new(Arc::new(client)))
    }

    /// Run every query of a batch; failures stay with their own ref id
    pub async fn query_data(&self, queries: &[DataQuery]) -> QueryDataResponse {
        let outcomes = join_all(queries.iter().map(|q| self.query(q))).await;

        QueryDataResponse {
            responses: queries
                .iter()
                .map(|q| q.ref_id.clone())
                .zip(outcomes)
                .collect(),
        }
    }

    pub async fn query(&self, query: &DataQuery) -> DataResponse {
        debug!(
            "query {}: {}",
            query.ref_id,
            String::from_utf8_lossy(&query.json)
        );
        let model = QueryModel::from_json(&query.json)?;

        let mut frame = DataFrame::new(query.ref_id.clone());
        if model.is_empty() {
            debug!("query {}: nothing selected, skipping request", query.ref_id);
            return Ok(frame);
        }

        let time_property = model.time_property.as_ref();
        if let Some(tp) = time_property {
            frame.push_field(
                Field::new(TIME_FIELD, tp.edm_type.column_kind())
                    .with_label(TIME_FIELD, tp.name.clone()),
            );
        }
        for prop in &model.properties {
            frame.push_field(Field::new(prop.name.clone(), prop.edm_type.column_kind()));
        }

        let response = self
            .client
            .get_entities(
                &model.entity_set.name,
                &model.properties,
                time_property,
                Some(&query.time_range),
                &model.filter_conditions,
            )
            .await?;

        if !response.is_ok() {
            return Err(ODataError::Status {
                status: response.status,
                body: response.body_text(),
            });
        }

        let version = resolve_version(self.client.odata_version(), &response);
        debug!("using odata version {}", version);
        let entries = decode_entities_as(&response.body, version)?;
        debug!("query complete, {} entities", entries.len());

        for entry in &entries {
            let mut values: Vec<Option<CellValue>> = Vec::with_capacity(frame.fields.len());
            if let Some(tp) = time_property {
                values.push(
                    entry
                        .get(&tp.name)
                        .and_then(|raw| coerce_value_or_null(raw, &tp.edm_type)),
                );
            }
            for prop in &model.properties {
                values.push(
                    entry
                        .get(&prop.name)
                        .and_then(|raw| coerce_value_or_null(raw, &prop.edm_type)),
                );
            }
            frame.append_row(values);
        }

        Ok(frame)
    }

    /// 200 from the service root is healthy, anything else is not
    pub async fn check_health(&self) -> CheckHealthResult {
        match self.client.get_service_root().await {
            Err(e) => CheckHealthResult {
                status: HealthStatus::Error,
                message: format!("Health check failed: {}", e),
            },
            Ok(response) if response.is_ok() => CheckHealthResult {
                status: HealthStatus::Ok,
                message: "Data Source is working as expected.".to_string(),
            },
            Ok(response) => CheckHealthResult {
                status: HealthStatus::Error,
                message: format!(
                    "Health check failed, datasource exists but given path does not. Statuscode: {}",
                    response.status
                ),
            },
        }
    }

    pub async fn call_resource(&self, path: &str) -> Result<CallResourceResponse> {
        match path {
            METADATA_RESOURCE => {
                let schema = self.get_metadata().await?;
                let body = serde_json::to_vec(&schema).map_err(|e| {
                    error!("error marshalling response body");
                    ODataError::Encode(e)
                })?;
                Ok(CallResourceResponse { status: 200, body })
            }
            _ => Ok(CallResourceResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }

    /// Fetch and flatten `$metadata`; built fresh on every call
    pub async fn get_metadata(&self) -> Result<EdmSchema> {
        let response = self.client.get_metadata().await?;
        if !response.is_ok() {
            return Err(ODataError::MetadataStatus {
                status: response.status,
            });
        }
        decode_edmx(&response.body)
    }
}
