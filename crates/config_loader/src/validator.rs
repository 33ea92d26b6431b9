//! Configuration validation
//!
//! Rules:
//! - directory address is `host:port` with a numeric port
//! - connect timeout > 0
//! - time-series URL is http(s), org and bucket are non-empty, timeout > 0
//! - file-table base path is non-empty
//!
//! An unknown sink selection is not an error: dispatch falls back to console.

use contracts::{ConnectorBlueprint, ContractError, SinkConfig};

/// Validate a ConnectorBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &ConnectorBlueprint) -> Result<(), ContractError> {
    validate_directory(blueprint)?;
    validate_file_table(&blueprint.sink)?;
    validate_time_series(&blueprint.sink)?;
    Ok(())
}

/// Split and check a `host:port` address
pub fn validate_address(field: &str, address: &str) -> Result<(), ContractError> {
    let (host, port) = address.rsplit_once(':').ok_or_else(|| {
        ContractError::config_validation(field, format!("'{address}' is not in host:port form"))
    })?;

    if host.trim().is_empty() {
        return Err(ContractError::config_validation(
            field,
            format!("'{address}' has an empty host"),
        ));
    }

    port.parse::<u16>().map_err(|e| {
        ContractError::config_validation(field, format!("invalid port '{port}': {e}"))
    })?;

    Ok(())
}

fn validate_directory(blueprint: &ConnectorBlueprint) -> Result<(), ContractError> {
    validate_address("directory.address", &blueprint.directory.address)?;

    if blueprint.directory.connect_timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "directory.connect_timeout_ms",
            "connect_timeout_ms must be > 0",
        ));
    }
    Ok(())
}

fn validate_file_table(sink: &SinkConfig) -> Result<(), ContractError> {
    if sink.file_table.base_path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "sink.file_table.base_path",
            "base_path cannot be empty",
        ));
    }
    Ok(())
}

fn validate_time_series(sink: &SinkConfig) -> Result<(), ContractError> {
    let ts = &sink.time_series;

    if !(ts.url.starts_with("http://") || ts.url.starts_with("https://")) {
        return Err(ContractError::config_validation(
            "sink.time_series.url",
            format!("url must start with http:// or https://, got '{}'", ts.url),
        ));
    }
    if ts.org.is_empty() {
        return Err(ContractError::config_validation(
            "sink.time_series.org",
            "org cannot be empty",
        ));
    }
    if ts.bucket.is_empty() {
        return Err(ContractError::config_validation(
            "sink.time_series.bucket",
            "bucket cannot be empty",
        ));
    }
    if ts.timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "sink.time_series.timeout_ms",
            "timeout_ms must be > 0",
        ));
    }
    Ok(())
}
