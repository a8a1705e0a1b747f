use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_file: PathBuf,
    /// JSON array of users used instead of the built-in pair.
    pub seed_file: Option<PathBuf>,
    pub static_dir: PathBuf,
    /// Request body cap; media messages arrive inline as data URLs.
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match get("DUET_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DUET_PORT is not a port number: {}", raw))?,
            None => 5000,
        };
        let max_body_bytes = match get("DUET_MAX_BODY_BYTES") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DUET_MAX_BODY_BYTES is not a size: {}", raw))?,
            None => 25 * 1024 * 1024,
        };

        Ok(Self {
            host: get("DUET_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            data_file: get("DUET_DATA_FILE")
                .unwrap_or_else(|| "data.json".into())
                .into(),
            seed_file: get("DUET_SEED_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            static_dir: get("DUET_STATIC_DIR")
                .unwrap_or_else(|| "static".into())
                .into(),
            max_body_bytes,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("invalid listen address {}", addr))
    }
}
