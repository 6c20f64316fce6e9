//! Configuration validation
//!
//! Each section checks its own ranges; [`Settings::validate`] runs them all
//! and stops at the first failure.

use tracing_subscriber::EnvFilter;

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, HttpConfig, LoggerSettings, ServerConfig, Settings,
};

/// URL schemes accepted by the Postgres driver
const VALID_DATABASE_SCHEMES: &[&str] = &["postgres://", "postgresql://"];

impl ServerConfig {
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request and keep-alive timeouts must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// # Validation Rules
    /// - URL must be a non-empty postgres URL
    /// - Pool sizes must be positive with min <= max
    /// - Connection timeout must be positive; a zero query timeout means unbounded
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !self.is_valid_database_url() {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }

    fn is_valid_database_url(&self) -> bool {
        VALID_DATABASE_SCHEMES.iter().any(|scheme| {
            self.url
                .strip_prefix(scheme)
                .is_some_and(|rest| !rest.is_empty())
        })
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        self.parse_format()?;

        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path cannot be empty when file logging is enabled.",
            ));
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// # Validation Rules
    /// - Level must be a valid filter directive
    /// - At least one output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.level).map_err(|e| {
            ConfigError::validation(
                "logger.level",
                format!("Invalid log level '{}': {e}", self.level),
            )
        })?;

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl HttpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.naming_convention().map(|_| ())
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        self.http.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_database() -> DatabaseConfig {
        DatabaseConfig {
            url: "postgres://localhost/storefront".to_string(),
            ..DatabaseConfig::default()
        }
    }

    fn valid_settings() -> Settings {
        Settings {
            database: valid_database(),
            ..Settings::default()
        }
    }

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_server_config_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert_eq!(field_of(config.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_server_config_invalid_timeouts() {
        let config = ServerConfig {
            request_timeout: 0,
            ..ServerConfig::default()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "server.request_timeout"
        );

        let config = ServerConfig {
            keep_alive_timeout: 0,
            ..ServerConfig::default()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "server.keep_alive_timeout"
        );
    }

    #[test]
    fn test_database_config_valid_url_schemes() {
        for url in [
            "postgres://localhost/storefront",
            "postgresql://user:pass@db:5432/storefront",
        ] {
            let config = DatabaseConfig {
                url: url.to_string(),
                ..valid_database()
            };
            assert!(config.validate().is_ok(), "{url}");
        }
    }

    #[test]
    fn test_database_config_rejects_other_urls() {
        for url in ["", "mysql://localhost/db", "postgres://", "localhost:5432"] {
            let config = DatabaseConfig {
                url: url.to_string(),
                ..valid_database()
            };
            assert_eq!(field_of(config.validate().unwrap_err()), "database.url", "{url}");
        }
    }

    #[test]
    fn test_database_config_pool_bounds() {
        let config = DatabaseConfig {
            max_connections: 0,
            ..valid_database()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "database.max_connections"
        );

        let config = DatabaseConfig {
            min_connections: 20,
            max_connections: 5,
            ..valid_database()
        };
        assert_eq!(
            field_of(config.validate().unwrap_err()),
            "database.min_connections"
        );
    }

    #[test]
    fn test_database_zero_query_timeout_is_unbounded() {
        let config = DatabaseConfig {
            query_timeout: 0,
            ..valid_database()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logger_settings_levels() {
        for level in ["trace", "debug", "info", "warn", "error", "info,storefront=debug"] {
            let settings = LoggerSettings {
                level: level.to_string(),
                ..LoggerSettings::default()
            };
            assert!(settings.validate().is_ok(), "{level}");
        }

        let settings = LoggerSettings {
            level: "storefront=chatty".to_string(),
            ..LoggerSettings::default()
        };
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.level");
    }

    #[test]
    fn test_logger_settings_file_enabled_empty_path() {
        let mut settings = LoggerSettings::default();
        settings.file.enabled = true;
        settings.file.path = "  ".to_string();
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "logger.file.path"
        );
    }

    #[test]
    fn test_logger_settings_no_outputs() {
        let mut settings = LoggerSettings::default();
        settings.console.enabled = false;
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger");
    }

    #[test]
    fn test_logger_settings_invalid_format() {
        let mut settings = LoggerSettings::default();
        settings.file.format = "yaml".to_string();
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "logger.file.format"
        );
    }

    #[test]
    fn test_settings_valid() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_settings_unknown_naming_convention() {
        let mut settings = valid_settings();
        settings.http.json_naming = "kebab_case".to_string();
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "http.json_naming"
        );
    }

    #[test]
    fn test_settings_default_requires_database_url() {
        assert_eq!(
            field_of(Settings::default().validate().unwrap_err()),
            "database.url"
        );
    }
}
