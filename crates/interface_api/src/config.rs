//! API configuration

use serde::Deserialize;

use domain_quote::QuoteSettings;
use infra_db::DatabaseConfig;

/// API configuration
///
/// Every field has a default; environment variables prefixed `API_` override
/// them (`API_PORT`, `API_QUOTE_VALIDITY_DAYS`, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// Minimum pooled database connections
    pub db_min_connections: u32,
    /// Validity window of new quotes in days
    pub quote_validity_days: u32,
    /// Prefix of generated quote numbers
    pub quote_number_prefix: String,
    /// Attempts before quote number generation gives up
    pub quote_number_max_attempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let quote = QuoteSettings::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/quotes".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            db_max_connections: 10,
            db_min_connections: 2,
            quote_validity_days: quote.validity_days,
            quote_number_prefix: quote.number_prefix,
            quote_number_max_attempts: quote.max_number_attempts,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// `DATABASE_URL` is used when `API_DATABASE_URL` is not set.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.set_default("database_url", url)?;
        }

        builder
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the quote lifecycle service
    pub fn quote_settings(&self) -> QuoteSettings {
        QuoteSettings {
            validity_days: self.quote_validity_days,
            number_prefix: self.quote_number_prefix.clone(),
            max_number_attempts: self.quote_number_max_attempts,
        }
    }

    /// Pool settings for the database layer
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections)
    }
}
