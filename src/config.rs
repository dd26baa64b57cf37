//! Application configuration management.
//!
//! Configuration is loaded from environment variables via the `envy` crate,
//! which deserializes them into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `PROVIDER_SUCCESS_RATE` (optional): success probability of the
///   simulated provider gateway, defaults to 0.9
/// - `PROVIDER_TIMEOUT_MS` (optional): upper bound on a provider call
///   before it is treated as a failure, defaults to 5000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_provider_success_rate")]
    pub provider_success_rate: f64,

    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_provider_success_rate() -> f64 {
    0.9
}

fn default_provider_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing (e.g.
    /// `DATABASE_URL`) or a value cannot be parsed into its expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}
