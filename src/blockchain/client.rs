// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM chain client: reads, approvals and swap submission for one wallet.

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;

use super::erc20::Erc20Contract;
use super::signing::WalletIdentity;
use super::transactions;
use super::types::*;
use crate::error::SwapError;
use crate::workflow::SwapChain;

/// Wallet-bound client for a single EVM network.
pub struct ChainClient {
    /// Network configuration
    network: NetworkConfig,
    /// Provider with nonce/gas/chain-id fillers and the wallet signer
    provider: DynProvider<Ethereum>,
    wallet_address: Address,
}

impl ChainClient {
    /// Create a client for `network` signing with `identity`.
    ///
    /// No request is made here; liveness is checked by the workflow.
    pub fn connect(
        network: NetworkConfig,
        rpc_url: &str,
        identity: &WalletIdentity,
    ) -> Result<Self, SwapError> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| SwapError::Connectivity(format!("invalid RPC URL: {e}")))?;

        let provider = ProviderBuilder::new()
            .wallet(identity.wallet())
            .connect_http(url)
            .erased();

        Ok(Self {
            network,
            provider,
            wallet_address: identity.address(),
        })
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Decimals of an ERC-20 token; 18 for native placeholders.
    pub async fn token_decimals(&self, token: Address) -> Result<u8, SwapError> {
        if is_native_token(token) {
            return Ok(18);
        }
        if let Some(known) = known_token(self.network.chain_id, token) {
            tracing::debug!(symbol = known.symbol, decimals = known.decimals, "Known token");
            return Ok(known.decimals);
        }
        Erc20Contract::new(&self.provider, token)
            .decimals()
            .await
            .map_err(SwapError::redacted)
    }

    /// Native plus ERC-20 balances for `owner`. Reads that fail are skipped
    /// with a warning.
    pub async fn balance_snapshot(
        &self,
        owner: Address,
        tokens: &[Address],
    ) -> Result<BalanceSnapshot, SwapError> {
        let native = match SwapChain::native_balance(self, owner).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to get native balance");
                None
            }
        };

        let mut balances = Vec::new();
        for token in tokens {
            match SwapChain::token_balance(self, *token, owner).await {
                Ok(balance) => balances.push(balance),
                Err(e) => {
                    tracing::warn!(token = %token, error = %e, "Failed to get token balance");
                }
            }
        }

        Ok(BalanceSnapshot {
            address: owner,
            chain_id: self.network.chain_id,
            native,
            tokens: balances,
        })
    }
}

#[async_trait]
impl SwapChain for ChainClient {
    fn wallet_address(&self) -> Address {
        self.wallet_address
    }

    async fn chain_id(&self) -> Result<u64, SwapError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| SwapError::Connectivity(e.to_string()).redacted())
    }

    async fn block_number(&self) -> Result<u64, SwapError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| SwapError::Connectivity(e.to_string()).redacted())
    }

    async fn native_balance(&self, owner: Address) -> Result<TokenBalance, SwapError> {
        let balance = self
            .provider
            .get_balance(owner)
            .await
            .map_err(|e| SwapError::Rpc(e.to_string()).redacted())?;

        Ok(TokenBalance::new(self.network.native_symbol, balance, 18, None))
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<TokenBalance, SwapError> {
        Erc20Contract::new(&self.provider, token)
            .token_balance(owner)
            .await
            .map_err(SwapError::redacted)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, SwapError> {
        Erc20Contract::new(&self.provider, token)
            .allowance(owner, spender)
            .await
            .map_err(SwapError::redacted)
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxReceiptSummary, SwapError> {
        Erc20Contract::new(&self.provider, token)
            .approve(spender, amount)
            .await
            .map_err(SwapError::redacted)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, SwapError> {
        transactions::estimate_gas(&self.provider, tx)
            .await
            .map_err(SwapError::redacted)
    }

    async fn send_and_confirm(&self, tx: TransactionRequest) -> Result<TxReceiptSummary, SwapError> {
        let receipt = transactions::send_and_confirm(&self.provider, tx)
            .await
            .map_err(SwapError::redacted)?;
        tracing::info!(explorer = %self.network.tx_url(&receipt.tx_hash), "Swap transaction mined");
        Ok(receipt)
    }
}
