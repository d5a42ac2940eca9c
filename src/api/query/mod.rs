//! OData query building and response decoding
//!
//! `filters` synthesises `$filter`, `url` composes the request URL and
//! `result` unwraps the version specific response envelopes.

pub mod filters;
pub mod result;
pub mod url;

pub use filters::build_filter;
pub use result::{EntityRecord, decode_entities, decode_entities_as, resolve_version};
pub use url::{build_entities_url, build_query_url};
