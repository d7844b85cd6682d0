//! Server configuration.
//!
//! Layered, later sources override earlier ones:
//! 1. Defaults in code
//! 2. `config/stockroom.toml` (optional)
//! 3. Environment variables with the `STOCKROOM__` prefix, e.g.
//!    `STOCKROOM__SERVER__PORT=9000` or `STOCKROOM__DATABASE__URL=memory`
//!
//! A `.env` file in the working directory is loaded into the environment first.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use stockroom_observability::LogFormat;

/// Database URL that selects the in-memory store instead of SQLite.
pub const MEMORY_DATABASE: &str = "memory";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL, or `memory` for the in-memory store.
    pub url: String,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.trim().eq_ignore_ascii_case(MEMORY_DATABASE)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
}

impl AppConfig {
    /// Load configuration from `.env`, the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load_from(Environment::with_prefix("STOCKROOM").separator("__"))
    }

    fn load_from(environment: Environment) -> Result<Self, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://stockroom.db")?
            .set_default("log.format", "json")?
            .add_source(File::with_name("config/stockroom").required(false))
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
