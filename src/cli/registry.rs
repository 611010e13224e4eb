//! Registry inspection command handlers

use crate::cli::output::{format_registry_json, format_registry_table};
use crate::cli::RegistryListArgs;
use crate::config::GatewayConfig;
use crate::registry::SnapshotStore;

/// Handle `compras-gateway registry list`
///
/// Reads the persisted snapshot named by the configuration; a gateway does
/// not need to be running.
pub fn handle_registry_list(args: &RegistryListArgs) -> Result<String, Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        GatewayConfig::load(Some(&args.config))?
    } else {
        GatewayConfig::default()
    };

    let store = SnapshotStore::new(&config.registry.data_file);
    let snapshot = store.load()?;

    if args.json {
        Ok(format_registry_json(&snapshot))
    } else if snapshot.is_empty() {
        Ok("No services registered.".to_string())
    } else {
        Ok(format_registry_table(&snapshot))
    }
}
