//! Structured logging helpers
//!
//! Filter-directive construction from `LoggingConfig` plus per-request
//! correlation IDs for the proxy path.

use uuid::Uuid;

/// Build filter directives string from LoggingConfig.
///
/// Constructs a tracing filter string that includes the base log level and
/// any component-specific levels, e.g. `"info,compras_gateway::api=debug"`.
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        for (component, level) in component_levels {
            filter_str.push_str(&format!(",compras_gateway::{}={}", component, level));
        }
    }

    filter_str
}

/// Generate a correlation ID for one proxied request.
///
/// # Examples
///
/// ```
/// use compras_gateway::logging::generate_request_id;
///
/// let request_id = generate_request_id();
/// assert!(!request_id.is_empty());
/// ```
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggingConfig;
    use std::collections::HashMap;

    #[test]
    fn test_base_level_only() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "info");
    }

    #[test]
    fn test_component_levels_appended() {
        let mut component_levels = HashMap::new();
        component_levels.insert("api".to_string(), "debug".to_string());

        let config = LoggingConfig {
            level: "warn".to_string(),
            component_levels: Some(component_levels),
            ..LoggingConfig::default()
        };

        assert_eq!(
            build_filter_directives(&config),
            "warn,compras_gateway::api=debug"
        );
    }

    #[test]
    fn test_request_id_unique_and_parseable() {
        let id1 = generate_request_id();
        let id2 = generate_request_id();
        assert_ne!(id1, id2);
        assert!(Uuid::parse_str(&id1).is_ok());
    }
}
