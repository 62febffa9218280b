use std::env;

use crate::constants::{DEFAULT_BIND_ADDR, DEFAULT_MAX_CONNECTIONS};
use crate::error::CustomError;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl Config {
    /// Reads the process environment. `.env` is loaded once by the binary
    /// before this is called.
    pub fn from_env() -> Result<Self, CustomError> {
        Self::from_lookup(|key| env::var(key))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CustomError>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let database_url = lookup("DATABASE_URL")
            .map_err(|e| CustomError::EnvError("DATABASE_URL".to_string(), e))?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| CustomError::InvalidConfig("DB_MAX_CONNECTIONS".to_string(), raw))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Config {
            database_url,
            bind_addr,
            max_connections,
        })
    }
}
