//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use chrono::TimeDelta;

use bloglist_infra::auth::{DEFAULT_JWT_SECRET, JwtConfig};
use bloglist_infra::database::DatabaseConfig;

/// Runtime environment, selected by `RUST_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::Invalid {
                name: "RUST_ENV",
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration errors - reported at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{0} must be set in production")]
    Missing(&'static str),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("RUST_ENV") {
            Some(value) => value.parse()?,
            None => Environment::Development,
        };

        // Tests run against their own database so fixtures can be wiped freely.
        let url_var = match environment {
            Environment::Test => "TEST_DATABASE_URL",
            _ => "DATABASE_URL",
        };

        let database = match lookup(url_var) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 20)?,
                min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS", 2)?,
            }),
            None if environment == Environment::Production => {
                return Err(ConfigError::Missing("DATABASE_URL"));
            }
            None => None,
        };

        let secret = lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());
        if secret == DEFAULT_JWT_SECRET {
            if environment == Environment::Production {
                return Err(ConfigError::Missing("JWT_SECRET"));
            }
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }

        let expiration_hours = match lookup("JWT_EXPIRATION_HOURS") {
            Some(value) => match value.parse::<i64>() {
                Ok(hours) if TimeDelta::try_hours(hours).is_some() => Some(hours),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "JWT_EXPIRATION_HOURS",
                        value,
                    });
                }
            },
            None => None,
        };

        let jwt = JwtConfig {
            secret,
            expiration_hours,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "bloglist-api".to_string()),
        };

        Ok(Self {
            environment,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_var(&lookup, "PORT", 3003)?,
            database,
            jwt,
        })
    }

    /// The fixture reset endpoint is only mounted in test mode.
    pub fn testing_routes_enabled(&self) -> bool {
        self.environment == Environment::Test
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
