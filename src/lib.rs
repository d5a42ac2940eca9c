pub mod api;
pub mod config;
pub mod datasource;
pub mod edm;
pub mod error;

pub use datasource::ODataSource;
pub use error::ODataError;
