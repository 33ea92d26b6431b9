//! `lookup` command implementation.

use anyhow::Result;
use registry::DirectoryEntry;
use tracing::info;

use crate::cli::LookupArgs;
use crate::commands::{connect_registry, init_metrics, load_blueprint};

/// Execute the `lookup` command
pub async fn run_lookup(args: &LookupArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    init_metrics(&args.config)?;

    let mut registry = connect_registry(&blueprint).await?;
    let result = registry
        .resolve_and_connect(&args.name, |channel| channel)
        .await;

    match result {
        Ok(resolved) => {
            info!(name = %args.name, address = %resolved.entry.address, "Lookup succeeded");
            println!("{}", connected_message(&resolved.entry));
            registry.close().await;
            Ok(())
        }
        Err(e) => {
            registry.close().await;
            Err(e.into())
        }
    }
}

fn connected_message(entry: &DirectoryEntry) -> String {
    format!("✓ Connected to '{}' at {}", entry.name, entry.address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_message_uses_dialled_address() {
        let entry = DirectoryEntry::new("arduino", "10.0.0.9:9000");
        assert_eq!(
            connected_message(&entry),
            "✓ Connected to 'arduino' at 10.0.0.9:9000"
        );
    }
}
