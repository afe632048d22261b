//! Application configuration loaded from environment variables.

use pc_funding::YearlyTarget;

use crate::errors::{ApiError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file
    pub database_url: String,
    /// Port for the REST API server
    pub api_port: u16,
    /// Number of PCs the programme aims to finance this year
    pub yearly_target: YearlyTarget,
    /// Upper bound on pooled SQLite connections
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let yearly_target: u32 = var("YEARLY_TARGET_PCS", "1000")
            .parse()
            .map_err(|_| ApiError::Config("Invalid YEARLY_TARGET_PCS".to_string()))?;

        Ok(Config {
            database_url: var("DATABASE_URL", "sqlite:./pc_funding.db"),
            api_port: var("API_PORT", "3000")
                .parse()
                .map_err(|_| ApiError::Config("Invalid API_PORT".to_string()))?,
            yearly_target: YearlyTarget::new(yearly_target).map_err(|e| {
                ApiError::Config(format!("YEARLY_TARGET_PCS: {e}"))
            })?,
            max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ApiError::Config("Invalid DB_MAX_CONNECTIONS".to_string()))?,
        })
    }
}
