use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use anyhow::Result;
use dotenvy::dotenv;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
// 10 MB in bytes
const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_PREVIEW_ROWS: usize = 5;
const DEFAULT_CACHE_CAPACITY: u64 = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
    pub preview_rows: usize,
    pub cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let config = Config {
            bind_addr: env_or("EDA_BIND_ADDR", DEFAULT_BIND_ADDR.parse()?)?,
            max_file_size: env_or("EDA_MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE)?,
            preview_rows: env_or("EDA_PREVIEW_ROWS", DEFAULT_PREVIEW_ROWS)?,
            cache_capacity: env_or("EDA_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)?,
        };
        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}={:?}: {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}
