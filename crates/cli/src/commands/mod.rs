//! Command implementations.

mod demo;
mod lookup;
mod servers;
mod validate;

pub use demo::run_demo;
pub use lookup::run_lookup;
pub use servers::run_servers;
pub use validate::run_validate;

use anyhow::{Context, Result};
use tracing::info;

use config_loader::ConfigLoader;
use contracts::{ConnectorBlueprint, SinkSelection};
use registry::{GrpcRegistry, GrpcTransport};

use crate::cli::ConfigArgs;
use crate::error::CliError;

/// Load the configuration, apply CLI overrides, and validate the result
pub(crate) fn load_blueprint(args: &ConfigArgs) -> Result<ConnectorBlueprint> {
    let mut blueprint = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            info!("No configuration file given, using defaults");
            ConnectorBlueprint::default()
        }
    };

    apply_overrides(&mut blueprint, args);

    ConfigLoader::validate(&blueprint).map_err(|e| CliError::config_validation(e.to_string()))?;
    Ok(blueprint)
}

fn apply_overrides(blueprint: &mut ConnectorBlueprint, args: &ConfigArgs) {
    if let Some(ref directory) = args.directory {
        info!(directory = %directory, "Overriding directory address from CLI");
        blueprint.directory.address = directory.clone();
    }
    if let Some(ref sink) = args.sink {
        info!(sink = %sink, "Overriding sink selection from CLI");
        blueprint.sink.selection = SinkSelection::from(sink.as_str());
    }
    if let Some(ref token) = args.influx_token {
        blueprint.sink.time_series.token = token.clone();
    }
}

/// Start the Prometheus endpoint if requested
pub(crate) fn init_metrics(args: &ConfigArgs) -> Result<()> {
    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }
    Ok(())
}

/// Connect a gRPC registry to the configured directory
pub(crate) async fn connect_registry(blueprint: &ConnectorBlueprint) -> Result<GrpcRegistry> {
    let address = &blueprint.directory.address;
    let mut registry = GrpcRegistry::new(GrpcTransport::from_config(&blueprint.directory));
    registry
        .connect(address)
        .await
        .map_err(|e| CliError::directory_unavailable(address, e.to_string()))?;
    Ok(registry)
}
