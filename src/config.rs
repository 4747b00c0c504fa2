// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Secrets and endpoints are read from the process environment. Swap
//! parameters (chains, tokens, amount) come from the command line.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DRPC_API_KEY` | RPC access key appended to the dRPC endpoint | Required |
//! | `LIFI_API_KEY` | Aggregator API key (`x-lifi-api-key` header) | Required |
//! | `WALLET_PRIVATE_KEY` | Signing key (hex or PEM); falls back to `POLYGON_PRIVATE_KEY` | Required |
//! | `RPC_URL` | Full RPC URL, overrides the dRPC endpoint | Optional |
//! | `LIFI_API_BASE_URL` | Aggregator base URL | `https://li.quest` |
//! | `LIFI_INTEGRATOR` | Integrator tag sent with each quote | Optional |
//! | `SWAP_TIMEOUT_SECS` | Upper bound for a whole swap run | `3600` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::{fmt, time::Duration};

use crate::blockchain::WalletIdentity;
use crate::error::SwapError;

pub const DRPC_API_KEY_ENV: &str = "DRPC_API_KEY";
pub const LIFI_API_KEY_ENV: &str = "LIFI_API_KEY";
pub const WALLET_PRIVATE_KEY_ENV: &str = "WALLET_PRIVATE_KEY";
/// Name used by the original Polygon test setup; still honoured.
pub const LEGACY_PRIVATE_KEY_ENV: &str = "POLYGON_PRIVATE_KEY";
pub const RPC_URL_ENV: &str = "RPC_URL";
pub const LIFI_API_BASE_URL_ENV: &str = "LIFI_API_BASE_URL";
pub const LIFI_INTEGRATOR_ENV: &str = "LIFI_INTEGRATOR";
pub const SWAP_TIMEOUT_SECS_ENV: &str = "SWAP_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_LIFI_API_BASE_URL: &str = "https://li.quest";
pub const DEFAULT_SWAP_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// A credential that must never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Everything a swap run needs from the environment.
#[derive(Debug)]
pub struct SwapConfig {
    pub rpc_api_key: Secret,
    pub rpc_url_override: Option<String>,
    pub aggregator_api_key: Secret,
    pub aggregator_base_url: String,
    pub integrator: Option<String>,
    pub identity: WalletIdentity,
    pub timeout: Duration,
}

impl SwapConfig {
    /// Load and validate configuration. The wallet secret is parsed here so
    /// that malformed credentials abort before any network call.
    pub fn from_env() -> Result<Self, SwapError> {
        let rpc_api_key = Secret::new(env_required(DRPC_API_KEY_ENV)?);
        let aggregator_api_key = Secret::new(env_required(LIFI_API_KEY_ENV)?);

        let private_key = env_optional(WALLET_PRIVATE_KEY_ENV)
            .or_else(|| env_optional(LEGACY_PRIVATE_KEY_ENV))
            .ok_or_else(|| {
                SwapError::InvalidCredentials(format!(
                    "{WALLET_PRIVATE_KEY_ENV} (or {LEGACY_PRIVATE_KEY_ENV}) is not set"
                ))
            })?;
        let identity = WalletIdentity::from_secret(&private_key)?;

        let timeout = match env_optional(SWAP_TIMEOUT_SECS_ENV) {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                SwapError::MissingConfig(format!("{SWAP_TIMEOUT_SECS_ENV} is not a number: {e}"))
            })?,
            None => DEFAULT_SWAP_TIMEOUT,
        };

        Ok(Self {
            rpc_api_key,
            rpc_url_override: env_optional(RPC_URL_ENV),
            aggregator_api_key,
            aggregator_base_url: env_or_default(LIFI_API_BASE_URL_ENV, DEFAULT_LIFI_API_BASE_URL),
            integrator: env_optional(LIFI_INTEGRATOR_ENV),
            identity,
            timeout,
        })
    }
}

/// Initialize the global tracing subscriber.
///
/// `LOG_FORMAT=json` switches to structured JSON lines; anything else gives
/// the human-readable formatter. `RUST_LOG` overrides the default `info`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env_optional(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        fmt().json().with_env_filter(filter).with_target(true).init();
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }
}

fn env_required(name: &str) -> Result<String, SwapError> {
    env_optional(name).ok_or_else(|| SwapError::MissingConfig(name.to_string()))
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
