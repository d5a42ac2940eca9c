//! OData protocol constants

/// Metadata document path segment
pub const METADATA: &str = "$metadata";

/// Query option names
pub const FILTER: &str = "$filter";
pub const SELECT: &str = "$select";

/// Standard headers used when talking to OData services
pub mod headers {
    pub const ACCEPT: &str = "Accept";

    /// JSON payloads for the service root and entity sets
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// EDMX metadata documents
    pub const CONTENT_TYPE_XML: &str = "application/xml";

    /// Version header sent by v2/v3 services
    pub const DATA_SERVICE_VERSION: &str = "DataServiceVersion";

    /// Version header sent by v4 services
    pub const ODATA_VERSION: &str = "OData-Version";
}

/// Response envelope keys
pub mod envelope {
    pub const VALUE: &str = "value";
    pub const D: &str = "d";
    pub const RESULTS: &str = "results";
}
