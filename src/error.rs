// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy for a swap run.
//!
//! Every variant is terminal: the workflow never retries, it surfaces the
//! error to the caller with whatever diagnostic the provider returned.

use std::time::Duration;

use alloy::{
    primitives::U256,
    sol_types::decode_revert_reason,
    transports::{RpcError, TransportErrorKind},
};

/// Errors that can occur while preparing or executing a swap.
#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("Invalid wallet credentials: {0}")]
    InvalidCredentials(String),

    #[error("Configuration missing: {0}")]
    MissingConfig(String),

    #[error("RPC endpoint unavailable: {0}")]
    Connectivity(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Quote request failed: {0}")]
    QuoteRequest(String),

    #[error("Quote rejected by aggregator (HTTP {status}): {message}")]
    QuoteRejected { status: u16, message: String },

    #[error("Aggregator response has no transaction request")]
    MissingTransactionRequest,

    #[error("Quote does not match the request: {0}")]
    QuoteMismatch(String),

    #[error("Invalid transaction field `{field}`: {message}")]
    InvalidTransactionField { field: &'static str, message: String },

    #[error("Insufficient balance of {asset}: have {available}, need {required}")]
    InsufficientBalance {
        asset: String,
        available: U256,
        required: U256,
    },

    #[error("Approval failed: {0}")]
    Approval(String),

    #[error("Gas estimation failed: {}", .reason.as_deref().unwrap_or("no reason given"))]
    GasEstimation { reason: Option<String> },

    #[error("Transaction execution failed: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Execution { reason: Option<String> },

    #[error("Swap did not finish within {0:?}")]
    Timeout(Duration),
}

impl SwapError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidTransactionField {
            field,
            message: message.into(),
        }
    }

    /// Strip URL paths and query strings from transport diagnostics.
    ///
    /// RPC endpoints carry their access key in the URL, and HTTP client
    /// errors quote the full request URL.
    pub fn redacted(self) -> Self {
        match self {
            Self::Connectivity(m) => Self::Connectivity(redact_urls(&m)),
            Self::Rpc(m) => Self::Rpc(redact_urls(&m)),
            Self::Contract(m) => Self::Contract(redact_urls(&m)),
            Self::Approval(m) => Self::Approval(redact_urls(&m)),
            Self::GasEstimation { reason } => Self::GasEstimation {
                reason: reason.map(|r| redact_urls(&r)),
            },
            Self::Execution { reason } => Self::Execution {
                reason: reason.map(|r| redact_urls(&r)),
            },
            other => other,
        }
    }

    /// Provider-supplied revert reason attached to this error, if any.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Self::GasEstimation { reason } | Self::Execution { reason } => reason.as_deref(),
            _ => None,
        }
    }
}

/// Extract the most useful diagnostic from a JSON-RPC failure.
///
/// ABI-encoded `Error(string)` revert data wins over the node's message,
/// which in turn wins over the transport error text.
pub fn rpc_revert_reason(err: &RpcError<TransportErrorKind>) -> Option<String> {
    match err.as_error_resp() {
        Some(payload) => {
            if let Some(reason) = payload
                .as_revert_data()
                .and_then(|data| decode_revert_reason(&data))
            {
                return Some(reason);
            }
            let message = payload.message.trim();
            if message.is_empty() {
                None
            } else {
                Some(message.to_string())
            }
        }
        None => Some(redact_urls(&err.to_string())),
    }
}

/// Replace every `http(s)://` URL in `text` with its scheme and host.
pub fn redact_urls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = [rest.find("http://"), rest.find("https://")]
        .into_iter()
        .flatten()
        .min()
    {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let end = tail
            .find(|c: char| c.is_whitespace() || matches!(c, ')' | '"' | '\'' | '>'))
            .unwrap_or(tail.len());
        out.push_str(&redact_url(&tail[..end]));
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

fn redact_url(raw: &str) -> String {
    let Ok(url) = url::Url::parse(raw) else {
        return "<redacted url>".to_string();
    };
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}://{host}:{port}/***", url.scheme()),
        (Some(host), None) => format!("{}://{host}/***", url.scheme()),
        _ => "<redacted url>".to_string(),
    }
}
