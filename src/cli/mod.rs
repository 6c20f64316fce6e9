//! Command-line entry point: parse arguments, load settings, dispatch.

pub mod parser;
pub mod validation;

pub use parser::{Cli, Commands, ServeArgs};

use crate::config::{ConfigLoader, Settings};
use crate::logger::init_logger;
use crate::server::Server;

/// Runs the parsed command to completion.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = load_settings(&cli)?;

    match cli.command() {
        Commands::Serve(args) => {
            apply_serve_overrides(&mut settings, &args);
            settings.validate()?;

            if args.dry_run {
                print_dry_run(&settings);
                return Ok(());
            }

            init_logger(settings.logger.clone().into_logger_config()?)?;
            Server::new(settings).run().await
        }
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::from_file(path),
        None => ConfigLoader::new()?,
    };
    Ok(loader.load()?)
}

/// CLI flags win over file and environment values.
pub fn apply_serve_overrides(settings: &mut Settings, args: &ServeArgs) {
    if let Some(host) = &args.host {
        settings.server.host = host.clone();
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
}

fn print_dry_run(settings: &Settings) {
    println!("Configuration is valid");
    println!("  bind address:     {}", settings.server.address());
    println!("  pool size:        {}..={}", settings.database.min_connections, settings.database.max_connections);
    println!("  query timeout:    {}s", settings.database.query_timeout);
    println!("  json naming:      {}", settings.http.json_naming);
    println!("  log level:        {}", settings.logger.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_server_values() {
        let mut settings = Settings::default();
        let args = ServeArgs {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            dry_run: false,
        };
        apply_serve_overrides(&mut settings, &args);

        assert_eq!(settings.server.address(), "0.0.0.0:9000");
    }

    #[test]
    fn test_absent_overrides_keep_values() {
        let mut settings = Settings::default();
        let before = settings.server.clone();
        apply_serve_overrides(&mut settings, &ServeArgs::default());

        assert_eq!(settings.server, before);
    }
}
