//! Storefront configuration.
//!
//! Loaded from environment variables with fallback to defaults.

use std::env;

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// HTTP listen port.
    pub http_port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,

    /// Cart tax rate in basis points (500 = 5%). The cart subsystem owns
    /// tax; pricing and checkout pass the computed value through untouched.
    pub tax_rate_bps: u32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = StorefrontConfig {
            http_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "aisle.db".to_string()),

            tax_rate_bps: env::var("TAX_RATE_BPS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TAX_RATE_BPS".to_string()))?,
        };

        if config.tax_rate_bps > 10_000 {
            return Err(ConfigError::InvalidValue("TAX_RATE_BPS".to_string()));
        }

        Ok(config)
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        StorefrontConfig {
            http_port: 8080,
            database_path: "aisle.db".to_string(),
            tax_rate_bps: 0,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.tax_rate_bps, 0);
    }
}
