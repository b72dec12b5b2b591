use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub data_dir: PathBuf,
    /// Base URL of the remote mirror. `None` keeps the sync shim local-only.
    pub quiz_api_url: Option<String>,
    pub remote_timeout_secs: u64,
    pub admin_email: Option<String>,
    /// argon2 PHC string, e.g. `$argon2id$v=19$...`
    pub admin_password_hash: Option<String>,
    pub max_body_bytes: usize,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            data_dir: PathBuf::from(get_env("DATA_DIR")?),
            quiz_api_url: get_env_opt("QUIZ_API_URL"),
            remote_timeout_secs: get_env_parse_or("REMOTE_TIMEOUT_SECS", DEFAULT_REMOTE_TIMEOUT_SECS)?,
            admin_email: get_env_opt("ADMIN_EMAIL"),
            admin_password_hash: get_env_opt("ADMIN_PASSWORD_HASH"),
            max_body_bytes: get_env_parse_or("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
