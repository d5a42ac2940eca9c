use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the configured service URL
pub const URL_ENV_VAR: &str = "ODATA_URL";

/// How spaces are written in the encoded query string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UrlSpaceEncoding {
    /// `+`, form style
    #[default]
    Plus,
    /// `%20`
    Percent20,
}

impl From<&str> for UrlSpaceEncoding {
    fn from(value: &str) -> Self {
        match value {
            "%20" => UrlSpaceEncoding::Percent20,
            _ => UrlSpaceEncoding::Plus,
        }
    }
}

impl From<String> for UrlSpaceEncoding {
    fn from(value: String) -> Self {
        UrlSpaceEncoding::from(value.as_str())
    }
}

impl From<UrlSpaceEncoding> for String {
    fn from(value: UrlSpaceEncoding) -> Self {
        match value {
            UrlSpaceEncoding::Plus => "+".to_string(),
            UrlSpaceEncoding::Percent20 => "%20".to_string(),
        }
    }
}

/// Configured protocol version; `Auto` sniffs the response headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ODataVersion {
    #[default]
    Auto,
    V2,
    V3,
    V4,
}

impl From<&str> for ODataVersion {
    fn from(value: &str) -> Self {
        match value {
            "" | "Auto" => ODataVersion::Auto,
            "V2" => ODataVersion::V2,
            "V3" => ODataVersion::V3,
            // anything else is explicit but unknown, decoded the v4 way
            _ => ODataVersion::V4,
        }
    }
}

impl From<String> for ODataVersion {
    fn from(value: String) -> Self {
        ODataVersion::from(value.as_str())
    }
}

impl From<ODataVersion> for String {
    fn from(value: ODataVersion) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ODataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ODataVersion::Auto => "Auto",
            ODataVersion::V2 => "V2",
            ODataVersion::V3 => "V3",
            ODataVersion::V4 => "V4",
        };
        f.write_str(name)
    }
}

/// Per-instance settings supplied by the host as JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceSettings {
    #[serde(default)]
    pub url_space_encoding: UrlSpaceEncoding,
    #[serde(default)]
    pub odata_version: ODataVersion,
}

impl DatasourceSettings {
    /// Parse the host's JSON settings blob; a missing or trivial blob means defaults
    pub fn from_json_data(json_data: &[u8]) -> Result<Self> {
        if json_data.len() <= 1 {
            return Ok(Self::default());
        }
        serde_json::from_slice(json_data).context("Failed to parse datasource settings")
    }
}

/// Everything needed to create one datasource instance
#[derive(Debug, Clone)]
pub struct InstanceSettings {
    pub url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub settings: DatasourceSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub url_space_encoding: UrlSpaceEncoding,
    #[serde(default)]
    pub odata_version: ODataVersion,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            url_space_encoding: UrlSpaceEncoding::default(),
            odata_version: ODataVersion::default(),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("odata-datasource");
        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path()?,
        };
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&config_content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the instance settings; `url_override` wins over the
    /// environment, which wins over the file
    pub fn instance_settings(&self, url_override: Option<&str>) -> Result<InstanceSettings> {
        dotenvy::dotenv().ok();

        let url = url_override
            .map(str::to_string)
            .or_else(|| std::env::var(URL_ENV_VAR).ok())
            .or_else(|| self.url.clone())
            .with_context(|| {
                format!(
                    "No service url configured (set `url` in the config file, {} or --url)",
                    URL_ENV_VAR
                )
            })?;

        Ok(InstanceSettings {
            url,
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            settings: DatasourceSettings {
                url_space_encoding: self.url_space_encoding,
                odata_version: self.odata_version,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_json_data() {
        let settings =
            DatasourceSettings::from_json_data(br#"{"urlSpaceEncoding":"%20","odataVersion":"V2"}"#)
                .unwrap();
        assert_eq!(settings.url_space_encoding, UrlSpaceEncoding::Percent20);
        assert_eq!(settings.odata_version, ODataVersion::V2);
    }

    #[test]
    fn test_settings_defaults() {
        assert_eq!(
            DatasourceSettings::from_json_data(b"").unwrap(),
            DatasourceSettings::default()
        );
        assert_eq!(
            DatasourceSettings::from_json_data(b"{}").unwrap(),
            DatasourceSettings::default()
        );
        let settings =
            DatasourceSettings::from_json_data(br#"{"urlSpaceEncoding":"","odataVersion":""}"#)
                .unwrap();
        assert_eq!(settings.url_space_encoding, UrlSpaceEncoding::Plus);
        assert_eq!(settings.odata_version, ODataVersion::Auto);
    }

    #[test]
    fn test_settings_invalid_json() {
        assert!(DatasourceSettings::from_json_data(b"{not json").is_err());
    }

    #[test]
    fn test_unknown_version_is_explicit() {
        assert_eq!(ODataVersion::from("V5"), ODataVersion::V4);
        assert_eq!(ODataVersion::from("Auto"), ODataVersion::Auto);
    }

    #[test]
    fn test_config_from_toml() {
        let config = Config::from_toml(
            r#"
url = "http://localhost:5000/odata"
timeout_secs = 5
url_space_encoding = "%20"
odata_version = "V3"
"#,
        )
        .unwrap();
        assert_eq!(config.url.as_deref(), Some("http://localhost:5000/odata"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.url_space_encoding, UrlSpaceEncoding::Percent20);
        assert_eq!(config.odata_version, ODataVersion::V3);
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("missing.toml"))).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.url.is_none());
    }

    #[test]
    fn test_url_override_wins() {
        let config = Config {
            url: Some("http://from-file".to_string()),
            ..Config::default()
        };
        let instance = config.instance_settings(Some("http://from-cli")).unwrap();
        assert_eq!(instance.url, "http://from-cli");
        assert_eq!(instance.timeout, Duration::from_secs(30));
    }
}
