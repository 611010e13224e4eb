//! CLI module for the gateway
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the gateway
//! - `registry list` - Show the persisted registry snapshot
//! - `config init` - Write an example configuration file
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the gateway with default config
//! compras-gateway serve
//!
//! # Inspect the registry snapshot as JSON
//! compras-gateway registry list --json
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod registry;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;
pub use registry::handle_registry_list;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Compras Gateway - shopping-list API gateway
#[derive(Parser, Debug)]
#[command(
    name = "compras-gateway",
    version,
    about = "API gateway for the compras shopping-list microservices"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the gateway
    Serve(ServeArgs),
    /// Inspect the service registry
    #[command(subcommand)]
    Registry(RegistryCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "gateway.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "GATEWAY_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "GATEWAY_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GATEWAY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable the background health sweep
    #[arg(long)]
    pub no_health_check: bool,
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommands {
    /// List registered service instances
    List(RegistryListArgs),
}

#[derive(Args, Debug)]
pub struct RegistryListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "gateway.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write an example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path
    #[arg(short, long, default_value = "gateway.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
