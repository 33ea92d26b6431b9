//! ConnectorBlueprint - Config Loader output
//!
//! Describes the directory endpoint and the sink routing for captured points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Directory service endpoint
    pub directory: DirectoryConfig,

    /// Sink routing
    #[serde(default)]
    pub sink: SinkConfig,
}

impl Default for ConnectorBlueprint {
    fn default() -> Self {
        Self {
            version: ConfigVersion::V1,
            directory: DirectoryConfig::default(),
            sink: SinkConfig::default(),
        }
    }
}

/// Directory service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// `host:port`
    pub address: String,

    /// Connect timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    5000
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            address: "localhost:50051".to_string(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

/// Sink routing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Active sink
    #[serde(default)]
    pub selection: SinkSelection,

    /// Tabular file sink parameters
    #[serde(default)]
    pub file_table: FileTableConfig,

    /// Time-series sink parameters
    #[serde(default)]
    pub time_series: TimeSeriesConfig,
}

/// Name of the active sink
///
/// Any string other than the known names is kept as `Unknown` so that a typo
/// in configuration degrades to console output instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SinkSelection {
    #[default]
    Console,
    FileTable,
    TimeSeries,
    Unknown(String),
}

impl SinkSelection {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Console => "console",
            Self::FileTable => "file-table",
            Self::TimeSeries => "time-series",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for SinkSelection {
    fn from(s: &str) -> Self {
        match s {
            "console" => Self::Console,
            "file-table" => Self::FileTable,
            "time-series" => Self::TimeSeries,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for SinkSelection {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<SinkSelection> for String {
    fn from(selection: SinkSelection) -> Self {
        selection.as_str().to_string()
    }
}

impl fmt::Display for SinkSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tabular file sink parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTableConfig {
    /// Directory holding one table file per `<scope>_<direction>`
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
}

fn default_base_path() -> PathBuf {
    PathBuf::from(".")
}

impl Default for FileTableConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
        }
    }
}

/// Time-series (InfluxDB v2) sink parameters
#[derive(Clone, Serialize, Deserialize)]
pub struct TimeSeriesConfig {
    /// Base URL of the backend
    #[serde(default = "default_influx_url")]
    pub url: String,

    /// API token
    #[serde(default)]
    pub token: String,

    /// Organization
    #[serde(default = "default_influx_org")]
    pub org: String,

    /// Destination bucket
    #[serde(default = "default_influx_bucket")]
    pub bucket: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_influx_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_influx_url() -> String {
    "http://localhost:8086".to_string()
}

fn default_influx_org() -> String {
    "beyerlab".to_string()
}

fn default_influx_bucket() -> String {
    "test".to_string()
}

fn default_influx_timeout_ms() -> u64 {
    5000
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            url: default_influx_url(),
            token: String::new(),
            org: default_influx_org(),
            bucket: default_influx_bucket(),
            timeout_ms: default_influx_timeout_ms(),
        }
    }
}

// Token stays out of logs
impl fmt::Debug for TimeSeriesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeSeriesConfig")
            .field("url", &self.url)
            .field("token", &if self.token.is_empty() { "" } else { "***" })
            .field("org", &self.org)
            .field("bucket", &self.bucket)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
