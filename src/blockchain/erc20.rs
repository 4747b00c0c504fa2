// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 token contract interactions.

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
};

use super::types::{TokenBalance, TxReceiptSummary};
use crate::error::SwapError;

// Define the ERC-20 interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface IERC20 {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

/// ERC-20 contract wrapper.
pub struct Erc20Contract<P> {
    contract: IERC20::IERC20Instance<P>,
    address: Address,
}

impl<P: Provider + Clone> Erc20Contract<P> {
    pub fn new(provider: &P, address: Address) -> Self {
        let contract = IERC20::new(address, provider.clone());
        Self { contract, address }
    }

    /// Get the token symbol.
    pub async fn symbol(&self) -> Result<String, SwapError> {
        self.contract
            .symbol()
            .call()
            .await
            .map_err(|e| SwapError::Contract(format!("symbol() on {}: {e}", self.address)))
    }

    /// Get the token decimals.
    pub async fn decimals(&self) -> Result<u8, SwapError> {
        self.contract
            .decimals()
            .call()
            .await
            .map_err(|e| SwapError::Contract(format!("decimals() on {}: {e}", self.address)))
    }

    /// Raw balance of `owner` in the token's smallest unit.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, SwapError> {
        self.contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| SwapError::Contract(format!("balanceOf() on {}: {e}", self.address)))
    }

    /// Balance with display metadata. Metadata lookups are best effort.
    pub async fn token_balance(&self, owner: Address) -> Result<TokenBalance, SwapError> {
        let symbol: String = self.symbol().await.unwrap_or_else(|_| "???".to_string());
        let decimals: u8 = self.decimals().await.unwrap_or(18);
        let balance = self.balance_of(owner).await?;

        Ok(TokenBalance::new(symbol, balance, decimals, Some(self.address)))
    }

    /// Amount `spender` may currently pull from `owner`.
    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, SwapError> {
        self.contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| SwapError::Contract(format!("allowance() on {}: {e}", self.address)))
    }

    /// Approve `spender` for `amount` and wait until the approval is mined.
    ///
    /// Requires a provider with a wallet filler.
    pub async fn approve(
        &self,
        spender: Address,
        amount: U256,
    ) -> Result<TxReceiptSummary, SwapError> {
        let pending = self
            .contract
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| SwapError::Approval(format!("failed to send approve: {e}")))?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        tracing::info!(token = %self.address, %spender, %amount, %tx_hash, "Approval broadcast");

        let receipt = pending
            .with_required_confirmations(1)
            .get_receipt()
            .await
            .map_err(|e| SwapError::Approval(format!("approval {tx_hash} not confirmed: {e}")))?;

        if !receipt.status() {
            return Err(SwapError::Approval(format!("approval {tx_hash} reverted")));
        }

        Ok(TxReceiptSummary {
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used as u64,
            success: true,
        })
    }
}
