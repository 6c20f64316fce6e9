//! Layered configuration for storefront
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml`
//! 2. `{environment}.toml`, chosen by `STOREFRONT_APP_ENV`
//! 3. `local.toml`, not committed
//! 4. `STOREFRONT_*` environment variables

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, ConsoleSettings, DatabaseConfig, FileSettings, HttpConfig, LoggerSettings,
    ServerConfig, Settings,
};
