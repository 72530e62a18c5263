// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the JSON store | `data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `BASE_NETWORK` | `base` or `base-sepolia` | `base-sepolia` |
//! | `BASE_RPC_URL` | RPC endpoint override | network default |
//! | `ENCRYPTION_MASTER_PASSWORD` | Master secret sealing signing keys (min 32 chars) | Required |
//! | `CHAIN_CONFIRMATION_TIMEOUT_SECS` | Timeout for transfer confirmation | `120` |
//! | `EXCHANGE_RATE_API_URL` | Exchange-rate API base URL | `https://api.exchangerate-api.com/v4` |
//! | `RESEND_API_KEY` | Resend API key for email notifications | Optional |
//! | `NOTIFY_EMAIL` | Confirmation inbox for the email notifier | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;

use crate::domain::Network;

pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const NETWORK_ENV: &str = "BASE_NETWORK";
pub const RPC_URL_ENV: &str = "BASE_RPC_URL";
pub const MASTER_PASSWORD_ENV: &str = "ENCRYPTION_MASTER_PASSWORD";
pub const CONFIRMATION_TIMEOUT_ENV: &str = "CHAIN_CONFIRMATION_TIMEOUT_SECS";
pub const RATE_API_URL_ENV: &str = "EXCHANGE_RATE_API_URL";
pub const RESEND_API_KEY_ENV: &str = "RESEND_API_KEY";
pub const NOTIFY_EMAIL_ENV: &str = "NOTIFY_EMAIL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_RATE_API_URL: &str = "https://api.exchangerate-api.com/v4";
const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 120;

/// Configuration errors surfaced at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{MASTER_PASSWORD_ENV} must be set")]
    MissingMasterPassword,

    #[error("{MASTER_PASSWORD_ENV} must be at least 32 characters")]
    WeakMasterPassword,

    #[error("Invalid {0}: {1}")]
    Invalid(&'static str, String),
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub network: Network,
    pub rpc_url: Option<String>,
    pub master_secret: String,
    pub confirmation_timeout_secs: u64,
    pub rate_api_url: String,
    pub resend_api_key: Option<String>,
    pub notify_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let master_secret =
            env::var(MASTER_PASSWORD_ENV).map_err(|_| ConfigError::MissingMasterPassword)?;
        if master_secret.len() < 32 {
            return Err(ConfigError::WeakMasterPassword);
        }

        let network = match env::var(NETWORK_ENV) {
            Ok(value) => value
                .parse::<Network>()
                .map_err(|e| ConfigError::Invalid(NETWORK_ENV, e.to_string()))?,
            Err(_) => Network::default(),
        };

        let port = match env::var(PORT_ENV) {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|e| ConfigError::Invalid(PORT_ENV, e.to_string()))?,
            Err(_) => 8080,
        };

        let confirmation_timeout_secs = match env::var(CONFIRMATION_TIMEOUT_ENV) {
            Ok(value) => value
                .parse::<u64>()
                .map_err(|e| ConfigError::Invalid(CONFIRMATION_TIMEOUT_ENV, e.to_string()))?,
            Err(_) => DEFAULT_CONFIRMATION_TIMEOUT_SECS,
        };

        Ok(Self {
            host: env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            data_dir: env::var(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            network,
            rpc_url: env::var(RPC_URL_ENV).ok(),
            master_secret,
            confirmation_timeout_secs,
            rate_api_url: env::var(RATE_API_URL_ENV)
                .unwrap_or_else(|_| DEFAULT_RATE_API_URL.to_string()),
            resend_api_key: env::var(RESEND_API_KEY_ENV).ok(),
            notify_email: env::var(NOTIFY_EMAIL_ENV).ok(),
        })
    }
}
