// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gas estimation, broadcasting and confirmation of prepared transactions.
//!
//! Nothing here retries or bumps fees: the first failure is returned with the
//! provider's revert reason when one can be recovered.

use alloy::{
    eips::BlockId,
    primitives::U256,
    providers::{PendingTransactionError, Provider},
    rpc::types::TransactionRequest,
};
use tracing::{info, warn};

use super::types::TxReceiptSummary;
use crate::error::{rpc_revert_reason, SwapError};

/// Confirmations required before a transaction counts as mined.
pub const REQUIRED_CONFIRMATIONS: u64 = 1;

/// Ask the node how much gas `tx` needs.
pub async fn estimate_gas<P: Provider>(
    provider: &P,
    tx: &TransactionRequest,
) -> Result<u64, SwapError> {
    provider
        .estimate_gas(tx.clone())
        .await
        .map_err(|e| SwapError::GasEstimation {
            reason: rpc_revert_reason(&e),
        })
}

/// Sign (through the provider's wallet), broadcast and wait for `tx` to be
/// mined.
pub async fn send_and_confirm<P: Provider>(
    provider: &P,
    tx: TransactionRequest,
) -> Result<TxReceiptSummary, SwapError> {
    let pending = provider
        .send_transaction(tx.clone())
        .await
        .map_err(|e| SwapError::Execution {
            reason: rpc_revert_reason(&e),
        })?;

    let tx_hash = format!("{:?}", pending.tx_hash());
    info!(%tx_hash, "Transaction broadcast, waiting for confirmation");

    let receipt = pending
        .with_required_confirmations(REQUIRED_CONFIRMATIONS)
        .get_receipt()
        .await
        .map_err(|e| SwapError::Execution {
            reason: Some(match e {
                PendingTransactionError::TransportError(ref err) => rpc_revert_reason(err)
                    .unwrap_or_else(|| format!("{tx_hash}: {e}")),
                other => format!("{tx_hash}: {other}"),
            }),
        })?;

    let summary = TxReceiptSummary {
        tx_hash: tx_hash.clone(),
        block_number: receipt.block_number,
        gas_used: receipt.gas_used as u64,
        success: receipt.status(),
    };

    if !summary.success {
        let replayed = match receipt.block_number {
            Some(block) => replay_revert_reason(provider, tx, block).await,
            None => None,
        };
        warn!(%tx_hash, block = ?summary.block_number, reason = ?replayed, "Transaction reverted");
        return Err(SwapError::Execution {
            reason: Some(match replayed {
                Some(reason) => format!("{tx_hash} reverted: {reason}"),
                None => format!("{tx_hash} reverted"),
            }),
        });
    }

    info!(
        %tx_hash,
        block = ?summary.block_number,
        gas_used = summary.gas_used,
        "Transaction confirmed"
    );
    Ok(summary)
}

/// Re-run a mined, failed transaction as a call against the block it was
/// included in to recover the revert message.
async fn replay_revert_reason<P: Provider>(
    provider: &P,
    tx: TransactionRequest,
    block: u64,
) -> Option<String> {
    match provider.call(tx).block(BlockId::number(block)).await {
        Ok(_) => None,
        Err(e) => rpc_revert_reason(&e),
    }
}

/// Parse a human-readable amount into the token's smallest unit.
///
/// `"1.5"` with 6 decimals becomes `1_500_000`.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, SwapError> {
    let invalid = |msg: String| SwapError::InvalidAmount(format!("{amount:?}: {msg}"));

    let parts: Vec<&str> = amount.trim().split('.').collect();
    if parts.len() > 2 || parts[0].is_empty() && parts.get(1).map_or(true, |p| p.is_empty()) {
        return Err(invalid("expected <whole>[.<fraction>]".to_string()));
    }

    let whole = if parts[0].is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(parts[0], 10).map_err(|e| invalid(e.to_string()))?
    };

    let fraction = match parts.get(1) {
        Some(frac) if !frac.is_empty() => {
            if frac.len() > decimals as usize {
                return Err(invalid(format!("too many decimal places (max {decimals})")));
            }
            let padded = format!("{:0<width$}", frac, width = decimals as usize);
            U256::from_str_radix(&padded, 10).map_err(|e| invalid(e.to_string()))?
        }
        _ => U256::ZERO,
    };

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| invalid("overflow".to_string()))
}
