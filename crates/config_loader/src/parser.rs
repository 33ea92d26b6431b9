//! Configuration parsing
//!
//! TOML (primary) and JSON.

use contracts::{ConnectorBlueprint, ContractError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<ConnectorBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<ConnectorBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<ConnectorBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::SinkSelection;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[directory]
address = "localhost:50051"
"#;
        let bp = parse_toml(content).unwrap();
        assert_eq!(bp.directory.address, "localhost:50051");
        assert_eq!(bp.sink.selection, SinkSelection::Console);
    }

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
[directory]
address = "10.0.0.1:50051"
connect_timeout_ms = 250

[sink]
selection = "time-series"

[sink.file_table]
base_path = "/tmp/tables"

[sink.time_series]
url = "http://influx:8086"
token = "abc"
org = "lab"
bucket = "calls"
"#;
        let bp = parse_toml(content).unwrap();
        assert_eq!(bp.directory.connect_timeout_ms, 250);
        assert_eq!(bp.sink.selection, SinkSelection::TimeSeries);
        assert_eq!(bp.sink.time_series.bucket, "calls");
        assert_eq!(bp.sink.time_series.timeout_ms, 5000);
    }

    #[test]
    fn test_parse_json() {
        let content = r#"{"directory": {"address": "a:1"}, "sink": {"selection": "file-table"}}"#;
        let bp = parse_json(content).unwrap();
        assert_eq!(bp.sink.selection, SinkSelection::FileTable);
    }

    #[test]
    fn test_parse_missing_directory() {
        let result = parse_toml("[sink]\nselection = \"console\"\n");
        assert!(matches!(result, Err(ContractError::ConfigParse { .. })));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
