use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use explore_db::DbOptions;

/// Server settings, read from `EXPLORE_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub reader_pool_size: usize,
    pub busy_timeout: Duration,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        Ok(Self {
            host: get("EXPLORE_HOST", "0.0.0.0"),
            port: parse(&get("EXPLORE_PORT", "50051"), "EXPLORE_PORT")?,
            db_path: get("EXPLORE_DB_PATH", "explore.db").into(),
            reader_pool_size: parse(&get("EXPLORE_READER_POOL_SIZE", "4"), "EXPLORE_READER_POOL_SIZE")?,
            busy_timeout: Duration::from_millis(parse(
                &get("EXPLORE_BUSY_TIMEOUT_MS", "5000"),
                "EXPLORE_BUSY_TIMEOUT_MS",
            )?),
            request_timeout: Duration::from_millis(parse(
                &get("EXPLORE_REQUEST_TIMEOUT_MS", "3000"),
                "EXPLORE_REQUEST_TIMEOUT_MS",
            )?),
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn db_options(&self) -> DbOptions {
        DbOptions {
            reader_pool_size: self.reader_pool_size,
            busy_timeout: self.busy_timeout,
        }
    }
}

fn parse<T>(value: &str, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("{key} has invalid value '{value}'"))
}
