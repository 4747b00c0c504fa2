// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wire types for the quote API.
//!
//! Only the fields the swap flow reads are typed; everything numeric in the
//! transaction payload is kept loose and normalized later.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Desired swap, sent as query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub from_chain: u64,
    pub to_chain: u64,
    pub from_token: Address,
    pub to_token: Address,
    /// Source amount in the token's smallest unit.
    pub from_amount: U256,
    pub from_address: Address,
    pub to_address: Address,
    pub integrator: Option<String>,
    /// Maximum slippage as a fraction (0.005 = 0.5%).
    pub slippage: Option<f64>,
}

impl QuoteRequest {
    /// Swap `amount` of `from_token` into `to_token` for a single wallet.
    pub fn for_wallet(
        wallet: Address,
        from_chain: u64,
        to_chain: u64,
        from_token: Address,
        to_token: Address,
        amount: U256,
    ) -> Self {
        Self {
            from_chain,
            to_chain,
            from_token,
            to_token,
            from_amount: amount,
            from_address: wallet,
            to_address: wallet,
            integrator: None,
            slippage: None,
        }
    }

    pub fn is_same_chain(&self) -> bool {
        self.from_chain == self.to_chain
    }

    /// Query parameters in the order the API documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("fromChain", self.from_chain.to_string()),
            ("toChain", self.to_chain.to_string()),
            ("fromToken", self.from_token.to_checksum(None)),
            ("toToken", self.to_token.to_checksum(None)),
            ("fromAmount", self.from_amount.to_string()),
            ("fromAddress", self.from_address.to_checksum(None)),
            ("toAddress", self.to_address.to_checksum(None)),
        ];
        if let Some(integrator) = &self.integrator {
            pairs.push(("integrator", integrator.clone()));
        }
        if let Some(slippage) = self.slippage {
            pairs.push(("slippage", slippage.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: String,
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAction {
    #[serde(default)]
    pub from_chain_id: Option<u64>,
    #[serde(default)]
    pub to_chain_id: Option<u64>,
    #[serde(default)]
    pub from_token: Option<Token>,
    #[serde(default)]
    pub to_token: Option<Token>,
    #[serde(default)]
    pub from_amount: Option<String>,
    #[serde(default)]
    pub from_address: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    #[serde(default)]
    pub slippage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEstimate {
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub from_amount: Option<String>,
    #[serde(default)]
    pub to_amount: Option<String>,
    #[serde(default)]
    pub to_amount_min: Option<String>,
    #[serde(default)]
    pub approval_address: Option<String>,
    #[serde(default)]
    pub execution_duration: Option<f64>,
}

/// One routing hop of the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub action: Option<QuoteAction>,
    #[serde(default)]
    pub estimate: Option<QuoteEstimate>,
}

impl Step {
    /// Short `kind:tool` label for logs.
    pub fn label(&self) -> String {
        format!(
            "{}:{}",
            self.kind.as_deref().unwrap_or("step"),
            self.tool.as_deref().unwrap_or("unknown")
        )
    }
}

/// Transaction payload exactly as the aggregator returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<Value>,
}

/// Quote plus ready-to-sign transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub action: Option<QuoteAction>,
    #[serde(default)]
    pub estimate: Option<QuoteEstimate>,
    #[serde(default)]
    pub included_steps: Vec<Step>,
    #[serde(default)]
    pub transaction_request: Option<RawTransactionRequest>,
}

impl QuoteResponse {
    /// Source amount the quote commits to pulling, if stated.
    pub fn quoted_from_amount(&self) -> Option<&str> {
        self.estimate
            .as_ref()
            .and_then(|e| e.from_amount.as_deref())
            .or_else(|| self.action.as_ref().and_then(|a| a.from_amount.as_deref()))
    }

    pub fn step_labels(&self) -> Vec<String> {
        self.included_steps.iter().map(Step::label).collect()
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<i64>,
}
