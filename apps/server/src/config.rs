use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_PATH: &str = "./db/goaltrack.db";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Server settings, read from `GT_*` environment variables (a `.env` file is
/// honoured):
///
/// - `GT_LISTEN_ADDR`: socket to bind, default `0.0.0.0:8080`
/// - `GT_DB_PATH`: SQLite file holding users, goals and their days
/// - `GT_CORS_ALLOW_ORIGINS`: comma separated origins, `*` for any
/// - `GT_REQUEST_TIMEOUT_MS`: per-request timeout, default 30s
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr = var_or("GT_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .context("GT_LISTEN_ADDR is not a socket address")?;
        let cors_allow = var_or("GT_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let timeout_ms = match std::env::var("GT_REQUEST_TIMEOUT_MS") {
            Ok(raw) => raw
                .parse()
                .context("GT_REQUEST_TIMEOUT_MS is not a number of milliseconds")?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_MS,
        };

        Ok(Self {
            listen_addr,
            db_path: var_or("GT_DB_PATH", DEFAULT_DB_PATH),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
