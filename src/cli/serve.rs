//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::ServeArgs;
use crate::config::{GatewayConfig, LogFormat};
use crate::registry::{InstanceRegistration, Registry, SnapshotStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        GatewayConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        GatewayConfig::default()
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_health_check {
        config.health_check.enabled = false;
    }

    Ok(config)
}

/// Initialize tracing based on configuration
pub fn init_tracing(
    config: &crate::config::LoggingConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = crate::logging::build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}

/// Register the statically configured service instances
pub fn seed_registry_from_config(config: &GatewayConfig, registry: &Registry) {
    for service in &config.services {
        registry.register(
            &service.name,
            InstanceRegistration {
                url: service.url.clone(),
                port: None,
                health_path: service.health_path.clone(),
            },
        );
        tracing::info!(
            name = %service.name,
            url = %service.url,
            "Seeded service instance from config"
        );
    }
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!("Starting Compras Gateway");
    tracing::debug!(?config, "Loaded configuration");

    // 3. Open the persisted registry and seed static instances
    let store = SnapshotStore::new(&config.registry.data_file);
    let registry = Arc::new(Registry::with_store(store)?);
    seed_registry_from_config(&config, &registry);

    // 4. Build router and state
    let config_arc = Arc::new(config.clone());
    let state = Arc::new(AppState::new(Arc::clone(&registry), config_arc));
    let app = create_router(Arc::clone(&state));

    // 5. Start the health sweeper (if enabled)
    let cancel_token = CancellationToken::new();
    let sweeper_handle = if config.health_check.enabled {
        tracing::info!("Starting health sweeper");
        Some(Arc::clone(&state.sweeper).start(cancel_token.clone()))
    } else {
        tracing::info!("Health sweeping disabled");
        None
    };

    // 6. Bind and serve
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(addr = %addr, "Gateway listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
        .await?;

    // 7. Cleanup
    if let Some(handle) = sweeper_handle {
        tracing::info!("Waiting for health sweeper to stop");
        handle.await?;
    }

    tracing::info!("Gateway stopped");
    Ok(())
}
