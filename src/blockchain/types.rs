// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::{address, Address, U256};
use serde::Serialize;

/// EVM network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// dRPC network slug (`network=` query parameter)
    pub drpc_network: &'static str,
    /// Native gas token symbol
    pub native_symbol: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

impl NetworkConfig {
    /// dRPC load-balanced endpoint for this network, keyed by `api_key`.
    pub fn drpc_url(&self, api_key: &str) -> String {
        format!(
            "https://lb.drpc.org/ogrpc?network={}&dkey={}",
            self.drpc_network, api_key
        )
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

pub const ETHEREUM: NetworkConfig = NetworkConfig {
    name: "Ethereum",
    chain_id: 1,
    drpc_network: "ethereum",
    native_symbol: "ETH",
    explorer_url: "https://etherscan.io",
};

pub const OPTIMISM: NetworkConfig = NetworkConfig {
    name: "Optimism",
    chain_id: 10,
    drpc_network: "optimism",
    native_symbol: "ETH",
    explorer_url: "https://optimistic.etherscan.io",
};

pub const POLYGON: NetworkConfig = NetworkConfig {
    name: "Polygon",
    chain_id: 137,
    drpc_network: "polygon",
    native_symbol: "POL",
    explorer_url: "https://polygonscan.com",
};

pub const ARBITRUM: NetworkConfig = NetworkConfig {
    name: "Arbitrum One",
    chain_id: 42161,
    drpc_network: "arbitrum",
    native_symbol: "ETH",
    explorer_url: "https://arbiscan.io",
};

pub const SCROLL: NetworkConfig = NetworkConfig {
    name: "Scroll",
    chain_id: 534352,
    drpc_network: "scroll",
    native_symbol: "ETH",
    explorer_url: "https://scrollscan.com",
};

pub const SUPPORTED_NETWORKS: [NetworkConfig; 5] = [ETHEREUM, OPTIMISM, POLYGON, ARBITRUM, SCROLL];

/// Look up a supported network by chain id.
pub fn network_by_chain_id(chain_id: u64) -> Option<NetworkConfig> {
    SUPPORTED_NETWORKS
        .iter()
        .find(|network| network.chain_id == chain_id)
        .cloned()
}

/// Well-known ERC-20 token.
#[derive(Debug, Clone, Copy)]
pub struct Erc20Token {
    pub symbol: &'static str,
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
}

/// Tether USD on Polygon PoS.
pub const POLYGON_USDT: Erc20Token = Erc20Token {
    symbol: "USDT",
    chain_id: 137,
    address: address!("c2132d05d31c914a87c6611c10748aeb04b58e8f"),
    decimals: 6,
};

/// Native USDC on Polygon PoS.
pub const POLYGON_USDC: Erc20Token = Erc20Token {
    symbol: "USDC",
    chain_id: 137,
    address: address!("3c499c542cEF5E3811e1192ce70d8cC03d5c3359"),
    decimals: 6,
};

/// Look up a well-known token by chain and contract address.
pub fn known_token(chain_id: u64, address: Address) -> Option<Erc20Token> {
    [POLYGON_USDC, POLYGON_USDT]
        .into_iter()
        .find(|token| token.chain_id == chain_id && token.address == address)
}

/// Tokens whose balances are reported by default on a given chain.
pub fn tracked_tokens(chain_id: u64) -> Vec<Address> {
    [POLYGON_USDC, POLYGON_USDT]
        .iter()
        .filter(|token| token.chain_id == chain_id)
        .map(|token| token.address)
        .collect()
}

/// Placeholder some aggregators use for the native gas asset.
pub const NATIVE_TOKEN_SENTINEL: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Whether `token` designates the chain's native gas asset rather than an
/// allowance-gated ERC-20 contract.
pub fn is_native_token(token: Address) -> bool {
    token == Address::ZERO || token == NATIVE_TOKEN_SENTINEL
}

/// Token balance information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBalance {
    /// Token symbol (e.g., "POL", "USDC")
    pub symbol: String,
    /// Balance in smallest unit
    pub balance_raw: U256,
    /// Balance formatted with decimals
    pub balance_formatted: String,
    /// Number of decimals
    pub decimals: u8,
    /// Contract address (None for native token)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
}

impl TokenBalance {
    pub fn new(symbol: impl Into<String>, raw: U256, decimals: u8, contract: Option<Address>) -> Self {
        Self {
            symbol: symbol.into(),
            balance_raw: raw,
            balance_formatted: format_amount(raw, decimals),
            decimals,
            contract_address: contract,
        }
    }
}

/// Point-in-time view of a wallet's gas and tracked token balances.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSnapshot {
    pub address: Address,
    pub chain_id: u64,
    /// None when the node could not report it.
    pub native: Option<TokenBalance>,
    pub tokens: Vec<TokenBalance>,
}

/// Mined transaction summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceiptSummary {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}

/// Format an integer amount given the token decimals, keeping at most six
/// fractional digits.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
    let trimmed = decimal_str.trim_end_matches('0');
    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, &trimmed[..trimmed.len().min(6)])
    }
}
