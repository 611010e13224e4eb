//! Output formatting helpers for CLI commands

use crate::registry::RegistrySnapshot;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

/// Format the registry snapshot as a table
pub fn format_registry_table(snapshot: &RegistrySnapshot) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "URL", "Healthy", "Health Path", "Registered At"]);

    for (service, instances) in snapshot {
        for instance in instances {
            let healthy_str = if instance.healthy {
                "yes".green().to_string()
            } else {
                "no".red().to_string()
            };

            table.add_row(vec![
                Cell::new(service),
                Cell::new(&instance.url),
                Cell::new(healthy_str),
                Cell::new(&instance.health_path),
                Cell::new(instance.registered_at.to_rfc3339()),
            ]);
        }
    }

    table.to_string()
}

/// Format the registry snapshot as JSON
pub fn format_registry_json(snapshot: &RegistrySnapshot) -> String {
    serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ServiceInstance;

    fn sample_snapshot() -> RegistrySnapshot {
        let mut snapshot = RegistrySnapshot::new();
        snapshot.insert(
            "item-service".to_string(),
            vec![ServiceInstance::new("http://localhost:3003".to_string())],
        );
        snapshot
    }

    #[test]
    fn test_table_contains_service_and_url() {
        let rendered = format_registry_table(&sample_snapshot());
        assert!(rendered.contains("item-service"));
        assert!(rendered.contains("http://localhost:3003"));
    }

    #[test]
    fn test_json_round_trips() {
        let rendered = format_registry_json(&sample_snapshot());
        let parsed: RegistrySnapshot = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
