//! `servers` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ServersArgs;
use crate::commands::{connect_registry, init_metrics, load_blueprint};

#[derive(Serialize)]
struct ServerListing<'a> {
    directory: &'a str,
    servers: Vec<ServerRow<'a>>,
}

#[derive(Serialize)]
struct ServerRow<'a> {
    name: &'a str,
    address: &'a str,
}

/// Execute the `servers` command
pub async fn run_servers(args: &ServersArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    init_metrics(&args.config)?;

    let mut registry = connect_registry(&blueprint).await?;
    info!(
        directory = %blueprint.directory.address,
        servers = registry.servers().count(),
        "Server list loaded"
    );

    let listing = ServerListing {
        directory: &blueprint.directory.address,
        servers: registry
            .servers()
            .map(|s| ServerRow {
                name: s.name.as_str(),
                address: &s.address,
            })
            .collect(),
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&listing).context("Failed to serialize server list")?;
        println!("{}", json);
    } else {
        print_listing(&listing);
    }

    registry.close().await;
    Ok(())
}

fn print_listing(listing: &ServerListing<'_>) {
    println!("Directory: {}", listing.directory);
    if listing.servers.is_empty() {
        println!("\n  (no servers registered)");
        return;
    }
    println!();
    let width = listing
        .servers
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0);
    for server in &listing.servers {
        println!("  {:<width$}  {}", server.name, server.address);
    }
}
