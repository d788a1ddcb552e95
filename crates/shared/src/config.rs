use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub migrations_dir: PathBuf,
    pub brain: Option<BrainConfig>,
}

/// Configuration for the optional external "AI brain" function. When absent,
/// every chat turn runs through the deterministic interpreter.
#[derive(Debug, Clone)]
pub struct BrainConfig {
    pub endpoint_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_u32_env("DATABASE_MAX_CONNECTIONS", 10)?,
            migrations_dir: env::var("MIGRATIONS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../db/migrations")
                }),
            brain: BrainConfig::from_env()?,
        })
    }
}

impl BrainConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let endpoint_url = match non_empty_env("BRAIN_ENDPOINT_URL") {
            Some(url) => url,
            None => return Ok(None),
        };

        let api_key = match non_empty_env("BRAIN_API_KEY") {
            Some(key) => key,
            None => return Ok(None),
        };

        Ok(Some(Self {
            endpoint_url,
            api_key,
            timeout_ms: parse_u64_env("BRAIN_TIMEOUT_MS", 15_000)?,
        }))
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_u32_env(key: &str, default: u32) -> Result<u32, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u32>()
            .map_err(|_| ConfigError::ParseInt(key.to_string())),
        Err(_) => Ok(default),
    }
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| ConfigError::ParseInt(key.to_string())),
        Err(_) => Ok(default),
    }
}
