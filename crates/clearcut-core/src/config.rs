//! Configuration module
//!
//! Environment-based configuration for the API binary. Retention and upload
//! limits are fixed constants (see `constants`), so the surface here is small:
//! where to listen, where to store artifacts, and where the external
//! background-removal service lives.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_STORAGE_PATH: &str = "/tmp/clearcut";
const DEFAULT_REMOVER_URL: &str = "http://127.0.0.1:7000/api/remove";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    /// Directory holding artifact payloads and metadata records.
    pub storage_path: String,
    /// Endpoint of the external background-removal service.
    pub remover_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let server_port = parse_env("SERVER_PORT", DEFAULT_SERVER_PORT)?;
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let storage_path =
            env::var("STORAGE_PATH").unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string());
        let remover_url =
            env::var("REMOVER_URL").unwrap_or_else(|_| DEFAULT_REMOVER_URL.to_string());

        Ok(Config {
            server_port,
            cors_origins,
            storage_path,
            remover_url,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
