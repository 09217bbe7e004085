use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://timetable.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
// 12 hours, same lifetime the composed views had in the old cache setup
const DEFAULT_CACHE_TTL_SECS: u64 = 12 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub cache_ttl: Duration,
}

impl AppConfig {
    /// Reads configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| AppError::Config(format!("DB_MAX_CONNECTIONS is invalid: {}", e)))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            return Err(AppError::Config("DB_MAX_CONNECTIONS must be positive".to_string()));
        }

        let cache_ttl_secs = match lookup("CACHE_TTL_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("CACHE_TTL_SECS is invalid: {}", e)))?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }

    pub fn cache_enabled(&self) -> bool {
        !self.cache_ttl.is_zero()
    }
}
