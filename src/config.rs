// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. Every variable has
//! a default so a bare `cargo run` talks to a local dev node.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `RPC_ADDR` | Node JSON-RPC endpoint | `http://127.0.0.1:8545` |
//! | `DB_PATH` | Ledger database file | `data/ledger.redb` |
//! | `WALLETS_PASSWORD` | Shared passphrase for node-managed accounts | `changeit` |
//! | `RPC_TIMEOUT_SECS` | Bound on each node call | `10` |
//! | `STORE_TIMEOUT_SECS` | Bound on each ledger store call | `5` |
//! | `REQUEST_TIMEOUT_SECS` | Bound on a whole HTTP request | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const RPC_ADDR_ENV: &str = "RPC_ADDR";
pub const DB_PATH_ENV: &str = "DB_PATH";
pub const WALLETS_PASSWORD_ENV: &str = "WALLETS_PASSWORD";
pub const RPC_TIMEOUT_ENV: &str = "RPC_TIMEOUT_SECS";
pub const STORE_TIMEOUT_ENV: &str = "STORE_TIMEOUT_SECS";
pub const REQUEST_TIMEOUT_ENV: &str = "REQUEST_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_RPC_ADDR: &str = "http://127.0.0.1:8545";
const DEFAULT_DB_PATH: &str = "data/ledger.redb";
const DEFAULT_WALLETS_PASSWORD: &str = "changeit";
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Fully parsed service configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rpc_url: Url,
    pub db_path: PathBuf,
    pub wallets_password: String,
    pub rpc_timeout: Duration,
    pub store_timeout: Duration,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let rpc_raw = get(RPC_ADDR_ENV).unwrap_or_else(|| DEFAULT_RPC_ADDR.to_string());
        let rpc_url = Url::parse(rpc_raw.trim()).map_err(|_| ConfigError::Invalid {
            key: RPC_ADDR_ENV,
            value: rpc_raw.clone(),
        })?;
        if !matches!(rpc_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: RPC_ADDR_ENV,
                value: rpc_raw,
            });
        }

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            rpc_url,
            db_path: PathBuf::from(get(DB_PATH_ENV).unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
            wallets_password: lookup(WALLETS_PASSWORD_ENV)
                .unwrap_or_else(|| DEFAULT_WALLETS_PASSWORD.to_string()),
            rpc_timeout: seconds(&get, RPC_TIMEOUT_ENV, DEFAULT_RPC_TIMEOUT_SECS)?,
            store_timeout: seconds(&get, STORE_TIMEOUT_ENV, DEFAULT_STORE_TIMEOUT_SECS)?,
            request_timeout: seconds(&get, REQUEST_TIMEOUT_ENV, DEFAULT_REQUEST_TIMEOUT_SECS)?,
            log_format,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a strictly positive number of seconds.
fn seconds<G>(get: &G, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
        None => Ok(Duration::from_secs(default)),
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("db_path", &self.db_path)
            .field("wallets_password", &"<redacted>")
            .field("rpc_timeout", &self.rpc_timeout)
            .field("store_timeout", &self.store_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
