use dotenv::dotenv;
use dotenv::from_path;
use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Failed to load .env file from path {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Ten years; longer lifetimes overflow timestamp arithmetic.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file path, or `:memory:`.
    pub database_path: String,
    pub database_pool_size: u32,
    pub api_host: String,
    pub api_port: u16,
    /// Secret used to sign bearer tokens.
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_hash_rounds: u32,
}

impl Config {
    /// Load configuration from a specified `.env` file path or default to the root `.env` file.
    /// Variables already present in the environment take precedence over the file.
    pub fn from_env(env_path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = env_path {
            from_path(path).map_err(|e| ConfigError::EnvFile {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        } else {
            // A missing `.env` is fine; the process environment may carry everything.
            dotenv().ok();
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            database_path: var("DATABASE_PATH").unwrap_or_else(|| "marketplace.db".to_string()),
            database_pool_size: parse_within(
                "DATABASE_POOL_SIZE",
                var("DATABASE_POOL_SIZE"),
                8,
                1..=u32::MAX,
            )?,
            api_host: var("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            api_port: parse_or("API_PORT", var("API_PORT"), 5000)?,
            jwt_secret,
            token_ttl_hours: parse_within(
                "TOKEN_TTL_HOURS",
                var("TOKEN_TTL_HOURS"),
                168,
                1..=MAX_TOKEN_TTL_HOURS,
            )?,
            password_hash_rounds: parse_within(
                "PASSWORD_HASH_ROUNDS",
                var("PASSWORD_HASH_ROUNDS"),
                600_000,
                1..=u32::MAX,
            )?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// Like [`parse_or`], but values outside `range` are rejected as invalid.
fn parse_within<T: FromStr + PartialOrd>(
    name: &'static str,
    raw: Option<String>,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError> {
    let parsed = parse_or(name, raw.clone(), default)?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: raw.unwrap_or_default(),
        })
    }
}
