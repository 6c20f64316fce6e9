use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

/// Key-casing style applied to every JSON response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingConvention {
    #[default]
    SnakeCase,
    CamelCase,
    /// Keys are sent exactly as serialized.
    PascalCase,
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Unknown JSON naming convention '{0}', expected snake_case, camel_case or pascal_case")]
    UnknownConvention(String),

    #[error("Failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl NamingConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::SnakeCase => "snake_case",
            NamingConvention::CamelCase => "camel_case",
            NamingConvention::PascalCase => "pascal_case",
        }
    }
}

impl FromStr for NamingConvention {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snake_case" => Ok(NamingConvention::SnakeCase),
            "camel_case" => Ok(NamingConvention::CamelCase),
            "pascal_case" => Ok(NamingConvention::PascalCase),
            other => Err(TranscodeError::UnknownConvention(other.to_string())),
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static CONVENTION: OnceLock<NamingConvention> = OnceLock::new();

/// Fixes the process-wide convention. Called once during startup.
///
/// Later calls keep the first value.
pub fn init(convention: NamingConvention) {
    if CONVENTION.set(convention).is_err() && current() != convention {
        tracing::warn!(
            active = %current(),
            ignored = %convention,
            "JSON naming convention already initialized"
        );
    }
}

/// The process-wide convention, `snake_case` until [`init`] runs.
pub fn current() -> NamingConvention {
    CONVENTION.get().copied().unwrap_or_default()
}
