use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Compiler configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Field separator used by the edge reader (single byte, usually tab)
    #[validate(length(equal = 1, message = "column separator must be a single character"))]
    pub column_separator: String,

    /// Reject records whose column count doesn't match the header exactly
    pub require_all_columns: bool,

    /// Reject records carrying more columns than the header
    pub prohibit_extra_columns: bool,

    /// Pad missing trailing columns with empty strings instead of failing
    pub fill_missing_columns: bool,

    /// Optional cap on distinct literals a single compilation may intern
    #[validate(range(min = 1, message = "max literal count must be positive when set"))]
    pub max_literal_count: Option<usize>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            column_separator: "\t".to_string(),
            require_all_columns: true,
            prohibit_extra_columns: true,
            fill_missing_columns: false,
            max_literal_count: None,
        }
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            column_separator: env::var("KYPHER_COLUMN_SEPARATOR")
                .unwrap_or_else(|_| "\t".to_string()),
            require_all_columns: parse_env_var("KYPHER_REQUIRE_ALL_COLUMNS", "true")?,
            prohibit_extra_columns: parse_env_var("KYPHER_PROHIBIT_EXTRA_COLUMNS", "true")?,
            fill_missing_columns: parse_env_var("KYPHER_FILL_MISSING_COLUMNS", "false")?,
            max_literal_count: match env::var("KYPHER_MAX_LITERAL_COUNT") {
                Ok(v) => Some(v.parse().map_err(|e| ConfigError::Parse {
                    field: "KYPHER_MAX_LITERAL_COUNT".to_string(),
                    value: v,
                    source: Box::new(e),
                })?),
                Err(_) => None,
            },
        };

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
