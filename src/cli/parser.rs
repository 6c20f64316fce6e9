//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Storefront back-office API server
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Storefront back-office API server")]
#[command(long_about = "
Serves the storefront back-office API: prefixes, orders and audit logs,
all listed through one paginated query engine.

EXAMPLES:
    # Start with layered configuration from ./config
    storefront serve

    # Bind to all interfaces on port 9000
    storefront serve --host 0.0.0.0 --port 9000

    # Use a single configuration file
    storefront --config /etc/storefront/storefront.toml serve

    # Check configuration without starting
    storefront serve --dry-run
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads exactly this TOML file plus `STOREFRONT__*` environment
    /// overrides instead of the layered files under the config directory.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Address to bind, overrides `server.host`
    #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
    pub host: Option<String>,

    /// Port to listen on, overrides `server.port`
    #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
    pub port: Option<u16>,

    /// Validate configuration and exit
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// The subcommand to run; a bare `storefront` means `serve`.
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }
}
