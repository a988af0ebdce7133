use std::env;
use std::net::SocketAddr;

use crate::error::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://portal.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DRAFT_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_DRAFT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub draft_ttl_secs: u64,
    pub draft_sweep_interval_secs: u64,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::BadRequest(format!("BIND_ADDR is invalid: {}", e)))?;

        Ok(Self {
            database_url,
            bind_addr,
            draft_ttl_secs: secs_from_env("DRAFT_TTL_SECS", DEFAULT_DRAFT_TTL_SECS)?,
            draft_sweep_interval_secs: secs_from_env(
                "DRAFT_SWEEP_INTERVAL_SECS",
                DEFAULT_DRAFT_SWEEP_INTERVAL_SECS,
            )?,
        })
    }
}

fn secs_from_env(key: &str, default: u64) -> Result<u64, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| AppError::BadRequest(format!("{} must be a positive integer", key))),
        Err(_) => Ok(default),
    }
}
