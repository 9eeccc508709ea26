use std::env;
use std::str::FromStr;

use anyhow::{Context, bail};
use dotenvy::dotenv;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("unknown storage backend '{other}' (expected mysql or memory)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,

    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub run_migrations: bool,

    pub api_prefix: String,

    // Rate limiting
    pub rate_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage: StorageBackend = parse(&lookup, "STORAGE_BACKEND", "mysql")?;
        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::MySql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORAGE_BACKEND is mysql");
        }

        Ok(Self {
            server_addr: var("SERVER_ADDR", "127.0.0.1:8000"),
            storage,
            database_url,
            db_max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", "5")?,
            run_migrations: parse(&lookup, "RUN_MIGRATIONS", "true")?,
            api_prefix: var("API_PREFIX", "/api"),
            rate_per_min: parse(&lookup, "RATE_PER_MIN", "1000")?,
            log_dir: var("LOG_DIR", "logs"),
            log_level: parse(&lookup, "LOG_LEVEL", "debug")?,
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid value for {key}: '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_for_memory_backend() {
        let cfg = config(&[("STORAGE_BACKEND", "memory")]).unwrap();
        assert_eq!(cfg.storage, StorageBackend::Memory);
        assert_eq!(cfg.server_addr, "127.0.0.1:8000");
        assert_eq!(cfg.api_prefix, "/api");
        assert_eq!(cfg.rate_per_min, 1000);
        assert_eq!(cfg.log_level, tracing::Level::DEBUG);
        assert!(cfg.run_migrations);
    }

    #[test]
    fn mysql_requires_database_url() {
        assert!(config(&[]).is_err());

        let cfg = config(&[("DATABASE_URL", "mysql://u:p@localhost/hrms")]).unwrap();
        assert_eq!(cfg.storage, StorageBackend::MySql);
        assert_eq!(cfg.db_max_connections, 5);
    }

    #[test]
    fn bad_number_names_the_variable() {
        let err = config(&[("STORAGE_BACKEND", "memory"), ("RATE_PER_MIN", "lots")])
            .unwrap_err()
            .to_string();
        assert!(err.contains("RATE_PER_MIN"), "{err}");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(config(&[("STORAGE_BACKEND", "postgres")]).is_err());
    }
}
