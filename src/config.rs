//! Configuration management for Home Library

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;
use std::env;

/// Environment variables overriding individual `database.*` keys.
const DATABASE_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_PORT", "database.port"),
    ("DB_CHARSET", "database.charset"),
];

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub charset: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // HOME_LIBRARY__DATABASE__HOST=... style variables
            .add_source(
                Environment::with_prefix("HOME_LIBRARY")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder, |key| env::var(key).ok())
    }

    /// Build configuration from the built-in defaults plus `DB_*` overrides
    /// resolved through `lookup` instead of the process environment.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::finish(Self::defaults()?, lookup)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let database = DatabaseConfig::default();
        let logging = LoggingConfig::default();

        Config::builder()
            .set_default("database.host", database.host)?
            .set_default("database.port", i64::from(database.port))?
            .set_default("database.user", database.user)?
            .set_default("database.password", database.password)?
            .set_default("database.name", database.name)?
            .set_default("database.charset", database.charset)?
            .set_default("database.max_connections", i64::from(database.max_connections))?
            .set_default("logging.level", logging.level)
    }

    fn finish<F>(mut builder: ConfigBuilder<DefaultState>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in DATABASE_ENV_OVERRIDES {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        builder.build()?.try_deserialize()
    }
}

impl DatabaseConfig {
    /// Connection options for the MySQL driver.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name)
            .charset(&self.charset);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }

    /// `user@host:port/name`, safe to log.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            name: "test_db".to_string(),
            charset: "utf8mb4".to_string(),
            max_connections: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
