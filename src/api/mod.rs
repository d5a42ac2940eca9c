//! OData service access
//!
//! Request construction, the HTTP transport seam and decoding of the
//! JSON and EDMX documents a service returns.

pub mod client;
pub mod constants;
pub mod metadata;
pub mod models;
pub mod query;

pub use client::{HttpODataClient, ODataClient, RawResponse};
pub use metadata::{EdmSchema, EntitySetDescriptor, EntityTypeDescriptor, decode_edmx};
pub use models::{EntitySetRef, FilterCondition, Property, TimeRange};
pub use query::{EntityRecord, build_filter, build_query_url, decode_entities};
