// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Swap Execution Workflow
//!
//! Drives one swap from quote to on-chain confirmation:
//!
//! 1. Check RPC liveness (block height, chain id)
//! 2. Snapshot balances (diagnostic)
//! 3. Fetch a quote with a ready-to-sign transaction
//! 4. Check the source balance covers the amount (optional)
//! 5. Approve the spender when the allowance is short
//! 6. Normalize the transaction fields
//! 7. Estimate gas
//! 8. Broadcast and wait for one confirmation
//!
//! Each stage either produces the input of the next one or ends the run.
//! Nothing is retried.

use std::time::Duration;

use alloy::{
    primitives::{Address, U256},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::aggregator::{NormalizedTransaction, QuoteRequest, QuoteResponse};
use crate::blockchain::{is_native_token, BalanceSnapshot, TokenBalance, TxReceiptSummary};
use crate::config::DEFAULT_SWAP_TIMEOUT;
use crate::error::SwapError;

/// RPC and token-contract operations the workflow needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SwapChain: Send + Sync {
    /// Address that signs and funds the swap.
    fn wallet_address(&self) -> Address;

    async fn chain_id(&self) -> Result<u64, SwapError>;

    async fn block_number(&self) -> Result<u64, SwapError>;

    async fn native_balance(&self, owner: Address) -> Result<TokenBalance, SwapError>;

    async fn token_balance(&self, token: Address, owner: Address)
        -> Result<TokenBalance, SwapError>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, SwapError>;

    /// Approve and wait until the approval is mined.
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxReceiptSummary, SwapError>;

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64, SwapError>;

    /// Sign, broadcast and wait for one confirmation.
    async fn send_and_confirm(&self, tx: TransactionRequest)
        -> Result<TxReceiptSummary, SwapError>;
}

/// Source of quotes with attached transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, SwapError>;
}

#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Tokens whose balances are logged before the swap.
    pub tracked_tokens: Vec<Address>,
    /// Abort before approval/submission when the wallet cannot cover the
    /// source amount.
    pub require_sufficient_balance: bool,
    /// Upper bound for the whole run.
    pub timeout: Duration,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            tracked_tokens: Vec::new(),
            require_sufficient_balance: true,
            timeout: DEFAULT_SWAP_TIMEOUT,
        }
    }
}

/// Everything observed during a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct SwapOutcome {
    pub quote_id: Option<String>,
    pub tool: Option<String>,
    pub included_steps: Vec<String>,
    pub balances: BalanceSnapshot,
    pub approval: Option<TxReceiptSummary>,
    pub gas_estimate: u64,
    pub swap: TxReceiptSummary,
}

pub struct SwapWorkflow<'a, C, Q> {
    chain: &'a C,
    quotes: &'a Q,
    options: WorkflowOptions,
}

impl<'a, C: SwapChain, Q: QuoteSource> SwapWorkflow<'a, C, Q> {
    pub fn new(chain: &'a C, quotes: &'a Q, options: WorkflowOptions) -> Self {
        Self {
            chain,
            quotes,
            options,
        }
    }

    /// Run the whole pipeline within the configured timeout.
    pub async fn execute(&self, request: &QuoteRequest) -> Result<SwapOutcome, SwapError> {
        let span = tracing::info_span!(
            "swap",
            run_id = %Uuid::new_v4(),
            from_chain = request.from_chain,
            to_chain = request.to_chain,
            same_chain = request.is_same_chain(),
            amount = %request.from_amount,
        );

        match tokio::time::timeout(self.options.timeout, self.run(request).instrument(span)).await
        {
            Ok(result) => result,
            Err(_) => Err(SwapError::Timeout(self.options.timeout)),
        }
    }

    async fn run(&self, request: &QuoteRequest) -> Result<SwapOutcome, SwapError> {
        self.check_connectivity(request.from_chain).await?;

        let wallet = self.chain.wallet_address();
        info!(%wallet, "Wallet loaded");

        let balances = self.snapshot_balances(wallet, request.from_chain).await;

        let quote = self.quotes.quote(request).await?;
        let raw_tx = quote
            .transaction_request
            .as_ref()
            .ok_or(SwapError::MissingTransactionRequest)?;
        let included_steps = quote.step_labels();
        info!(
            quote_id = quote.id.as_deref().unwrap_or("-"),
            steps = ?included_steps,
            "Route planned"
        );
        check_quoted_amount(&quote, request)?;

        if self.options.require_sufficient_balance {
            self.check_source_balance(request, wallet).await?;
        }

        let mut normalized = NormalizedTransaction::from_raw(raw_tx)?;
        if let Some(chain_id) = normalized.chain_id {
            if chain_id != request.from_chain {
                return Err(SwapError::QuoteMismatch(format!(
                    "transaction targets chain {chain_id}, expected {}",
                    request.from_chain
                )));
            }
        }
        match normalized.from {
            Some(from) if from != wallet => {
                return Err(SwapError::QuoteMismatch(format!(
                    "transaction is sent from {from}, wallet is {wallet}"
                )));
            }
            Some(_) => {}
            None => normalized.from = Some(wallet),
        }
        let spender = normalized
            .to
            .ok_or_else(|| SwapError::field("to", "missing destination contract"))?;

        let approval = self.ensure_allowance(request, wallet, spender).await?;

        let mut tx = normalized.to_request();
        let gas_estimate = self.chain.estimate_gas(&tx).await?;
        info!(gas_estimate, quoted_gas_limit = ?normalized.gas_limit, "Gas estimated");
        tx.gas = Some(gas_estimate);

        let swap = self.chain.send_and_confirm(tx).await?;
        info!(tx_hash = %swap.tx_hash, block = ?swap.block_number, "Swap confirmed");

        Ok(SwapOutcome {
            quote_id: quote.id.clone(),
            tool: quote.tool.clone(),
            included_steps,
            balances,
            approval,
            gas_estimate,
            swap,
        })
    }

    async fn check_connectivity(&self, expected_chain: u64) -> Result<(), SwapError> {
        let height = self.chain.block_number().await?;
        if height == 0 {
            return Err(SwapError::Connectivity(
                "RPC reported block height 0".to_string(),
            ));
        }

        let chain_id = self.chain.chain_id().await?;
        if chain_id != expected_chain {
            return Err(SwapError::Connectivity(format!(
                "RPC serves chain {chain_id}, swap starts on chain {expected_chain}"
            )));
        }

        info!(height, chain_id, "RPC reachable");
        Ok(())
    }

    /// Diagnostic only: failed reads are logged and left out.
    async fn snapshot_balances(&self, wallet: Address, chain_id: u64) -> BalanceSnapshot {
        let native = match self.chain.native_balance(wallet).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!(error = %e, "Failed to get native balance");
                None
            }
        };

        let mut tokens = Vec::with_capacity(self.options.tracked_tokens.len());
        for token in &self.options.tracked_tokens {
            match self.chain.token_balance(*token, wallet).await {
                Ok(balance) => tokens.push(balance),
                Err(e) => warn!(%token, error = %e, "Failed to get token balance"),
            }
        }

        info!(
            native = native.as_ref().map_or("-", |n| n.balance_formatted.as_str()),
            tokens = ?tokens
                .iter()
                .map(|t| format!("{}={}", t.symbol, t.balance_formatted))
                .collect::<Vec<_>>(),
            "Balances"
        );

        BalanceSnapshot {
            address: wallet,
            chain_id,
            native,
            tokens,
        }
    }

    async fn check_source_balance(
        &self,
        request: &QuoteRequest,
        wallet: Address,
    ) -> Result<(), SwapError> {
        let balance = if is_native_token(request.from_token) {
            self.chain.native_balance(wallet).await?
        } else {
            self.chain.token_balance(request.from_token, wallet).await?
        };

        if balance.balance_raw < request.from_amount {
            return Err(SwapError::InsufficientBalance {
                asset: balance.symbol,
                available: balance.balance_raw,
                required: request.from_amount,
            });
        }
        Ok(())
    }

    async fn ensure_allowance(
        &self,
        request: &QuoteRequest,
        wallet: Address,
        spender: Address,
    ) -> Result<Option<TxReceiptSummary>, SwapError> {
        if is_native_token(request.from_token) {
            return Ok(None);
        }

        let token = request.from_token;
        let required = request.from_amount;
        let current = self.chain.allowance(token, wallet, spender).await?;
        if current >= required {
            info!(%spender, allowance = %current, "Allowance sufficient");
            return Ok(None);
        }

        info!(%spender, allowance = %current, %required, "Allowance too low, approving");
        let receipt = self.chain.approve(token, spender, required).await?;

        let updated = self.chain.allowance(token, wallet, spender).await?;
        if updated < required {
            return Err(SwapError::Approval(format!(
                "allowance is {updated} after approval {}, need {required}",
                receipt.tx_hash
            )));
        }

        info!(tx_hash = %receipt.tx_hash, allowance = %updated, "Approval confirmed");
        Ok(Some(receipt))
    }
}

/// The quote must not commit to pulling more than was asked for.
fn check_quoted_amount(quote: &QuoteResponse, request: &QuoteRequest) -> Result<(), SwapError> {
    let Some(quoted) = quote.quoted_from_amount() else {
        return Ok(());
    };
    let quoted = U256::from_str_radix(quoted.trim(), 10)
        .map_err(|e| SwapError::QuoteMismatch(format!("quoted fromAmount {quoted:?}: {e}")))?;
    if quoted > request.from_amount {
        return Err(SwapError::QuoteMismatch(format!(
            "quote pulls {quoted}, requested {}",
            request.from_amount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::RawTransactionRequest;
    use crate::blockchain::{POLYGON_USDC, POLYGON_USDT};
    use mockall::{predicate::eq, Sequence};
    use serde_json::{json, Value};

    const SPENDER: &str = "0x1231DEB6f5749EF6cE6943a275A1D3E7486F4EaE";
    const AMOUNT: u64 = 5_000_000;

    fn wallet() -> Address {
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
    }

    fn spender() -> Address {
        SPENDER.parse().unwrap()
    }

    fn request() -> QuoteRequest {
        QuoteRequest::for_wallet(
            wallet(),
            137,
            137,
            POLYGON_USDT.address,
            POLYGON_USDC.address,
            U256::from(AMOUNT),
        )
    }

    fn quote_with(tx: Option<Value>, from_amount: &str) -> QuoteResponse {
        QuoteResponse {
            id: Some("quote-1".to_string()),
            kind: Some("lifi".to_string()),
            tool: Some("paraswap".to_string()),
            action: None,
            estimate: serde_json::from_value(json!({ "fromAmount": from_amount })).ok(),
            included_steps: serde_json::from_value(json!([{ "type": "swap", "tool": "paraswap" }]))
                .unwrap(),
            transaction_request: tx
                .map(|v| serde_json::from_value::<RawTransactionRequest>(v).unwrap()),
        }
    }

    fn swap_quote() -> QuoteResponse {
        quote_with(
            Some(json!({
                "to": SPENDER,
                "data": "0xdeadbeef",
                "value": "0x0",
                "chainId": 137,
                "gasLimit": "0x0a4cb8",
                "gasPrice": "122553923781"
            })),
            "5000000",
        )
    }

    fn balance(symbol: &str, raw: u64, token: Option<Address>) -> TokenBalance {
        TokenBalance::new(symbol, U256::from(raw), if token.is_some() { 6 } else { 18 }, token)
    }

    fn receipt(hash: &str) -> TxReceiptSummary {
        TxReceiptSummary {
            tx_hash: hash.to_string(),
            block_number: Some(60_000_000),
            gas_used: 180_000,
            success: true,
        }
    }

    /// Chain that is live on Polygon and holds `usdt` USDT.
    fn live_chain(usdt: u64) -> MockSwapChain {
        let mut chain = MockSwapChain::new();
        chain.expect_wallet_address().return_const(wallet());
        chain.expect_block_number().returning(|| Ok(60_000_000));
        chain.expect_chain_id().returning(|| Ok(137));
        chain
            .expect_native_balance()
            .returning(|_| Ok(balance("POL", 3_000_000_000_000_000_000, None)));
        chain
            .expect_token_balance()
            .returning(move |token, _| Ok(balance("USDT", usdt, Some(token))));
        chain
    }

    fn options() -> WorkflowOptions {
        WorkflowOptions {
            tracked_tokens: vec![POLYGON_USDC.address, POLYGON_USDT.address],
            ..WorkflowOptions::default()
        }
    }

    fn quotes(quote: QuoteResponse) -> MockQuoteSource {
        let mut quotes = MockQuoteSource::new();
        quotes.expect_quote().times(1).return_once(move |_| Ok(quote));
        quotes
    }

    #[tokio::test]
    async fn same_chain_swap_approves_then_submits() {
        let mut chain = live_chain(AMOUNT);
        let mut seq = Sequence::new();

        chain
            .expect_allowance()
            .with(eq(POLYGON_USDT.address), eq(wallet()), eq(spender()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(U256::ZERO));
        chain
            .expect_approve()
            .with(eq(POLYGON_USDT.address), eq(spender()), eq(U256::from(AMOUNT)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(receipt("0xapprove")));
        chain
            .expect_allowance()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(U256::from(AMOUNT)));
        chain
            .expect_estimate_gas()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(412_000));
        chain
            .expect_send_and_confirm()
            .withf(|tx| {
                tx.gas == Some(412_000)
                    && tx.from == Some(wallet())
                    && tx.gas_price == Some(122_553_923_781)
                    && tx.max_fee_per_gas.is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(receipt("0xswap")));

        let quotes = quotes(swap_quote());
        let outcome = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap();

        let approval = outcome.approval.expect("approval expected");
        assert_eq!(approval.tx_hash, "0xapprove");
        assert!(!outcome.swap.tx_hash.is_empty());
        assert_eq!(outcome.gas_estimate, 412_000);
        assert_eq!(outcome.included_steps, vec!["swap:paraswap"]);
        assert_eq!(outcome.balances.tokens.len(), 2);
    }

    #[tokio::test]
    async fn sufficient_allowance_skips_approval() {
        let mut chain = live_chain(AMOUNT);
        chain
            .expect_allowance()
            .times(1)
            .returning(|_, _, _| Ok(U256::MAX));
        chain.expect_approve().never();
        chain.expect_estimate_gas().returning(|_| Ok(300_000));
        chain
            .expect_send_and_confirm()
            .times(1)
            .returning(|_| Ok(receipt("0xswap")));

        let quotes = quotes(swap_quote());
        let outcome = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap();
        assert!(outcome.approval.is_none());
    }

    #[tokio::test]
    async fn native_source_needs_no_allowance() {
        let mut chain = live_chain(0);
        chain.expect_allowance().never();
        chain.expect_approve().never();
        chain.expect_estimate_gas().returning(|_| Ok(21_000));
        chain
            .expect_send_and_confirm()
            .withf(|tx| tx.value == Some(U256::from(AMOUNT)))
            .times(1)
            .returning(|_| Ok(receipt("0xswap")));

        let mut request = request();
        request.from_token = Address::ZERO;
        let quote = quote_with(
            Some(json!({ "to": SPENDER, "value": AMOUNT.to_string(), "data": "0x" })),
            "5000000",
        );
        let quotes = quotes(quote);

        let outcome = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request)
            .await
            .unwrap();
        assert!(outcome.approval.is_none());
    }

    #[tokio::test]
    async fn missing_transaction_request_aborts_before_any_write() {
        let mut chain = live_chain(AMOUNT);
        chain.expect_allowance().never();
        chain.expect_approve().never();
        chain.expect_estimate_gas().never();
        chain.expect_send_and_confirm().never();

        let quotes = quotes(quote_with(None, "5000000"));
        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::MissingTransactionRequest));
    }

    #[tokio::test]
    async fn gas_estimation_failure_never_broadcasts() {
        let mut chain = live_chain(AMOUNT);
        chain
            .expect_allowance()
            .returning(|_, _, _| Ok(U256::from(AMOUNT)));
        chain.expect_estimate_gas().times(1).returning(|_| {
            Err(SwapError::GasEstimation {
                reason: Some("execution reverted: TRANSFER_FROM_FAILED".to_string()),
            })
        });
        chain.expect_send_and_confirm().never();

        let quotes = quotes(swap_quote());
        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert_eq!(
            err.revert_reason(),
            Some("execution reverted: TRANSFER_FROM_FAILED")
        );
    }

    #[tokio::test]
    async fn zero_balance_gets_a_quote_but_never_submits() {
        let mut chain = live_chain(0);
        chain.expect_approve().never();
        chain.expect_estimate_gas().never();
        chain.expect_send_and_confirm().never();

        // The quote is still fetched.
        let quotes = quotes(swap_quote());
        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();

        match err {
            SwapError::InsufficientBalance {
                available,
                required,
                ..
            } => {
                assert_eq!(available, U256::ZERO);
                assert_eq!(required, U256::from(AMOUNT));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_balance_without_precheck_fails_at_estimation() {
        let mut chain = live_chain(0);
        chain.expect_allowance().returning(|_, _, _| Ok(U256::MAX));
        chain.expect_estimate_gas().times(1).returning(|_| {
            Err(SwapError::GasEstimation {
                reason: Some("ERC20: transfer amount exceeds balance".to_string()),
            })
        });
        chain.expect_send_and_confirm().never();

        let quotes = quotes(swap_quote());
        let options = WorkflowOptions {
            require_sufficient_balance: false,
            ..options()
        };
        let err = SwapWorkflow::new(&chain, &quotes, options)
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::GasEstimation { .. }));
    }

    #[tokio::test]
    async fn inflated_quote_amount_is_rejected() {
        let mut chain = live_chain(AMOUNT * 10);
        chain.expect_approve().never();
        chain.expect_send_and_confirm().never();

        let quotes = quotes(quote_with(Some(json!({ "to": SPENDER })), "5000001"));
        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::QuoteMismatch(_)));
    }

    #[tokio::test]
    async fn approval_that_does_not_raise_allowance_aborts() {
        let mut chain = live_chain(AMOUNT);
        chain
            .expect_allowance()
            .times(2)
            .returning(|_, _, _| Ok(U256::from(1u64)));
        chain
            .expect_approve()
            .times(1)
            .returning(|_, _, _| Ok(receipt("0xapprove")));
        chain.expect_estimate_gas().never();
        chain.expect_send_and_confirm().never();

        let quotes = quotes(swap_quote());
        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::Approval(_)));
    }

    #[tokio::test]
    async fn dead_rpc_fails_before_quoting() {
        let mut chain = MockSwapChain::new();
        chain.expect_block_number().returning(|| Ok(0));
        chain.expect_chain_id().never();

        let mut quotes = MockQuoteSource::new();
        quotes.expect_quote().never();

        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::Connectivity(_)));
    }

    #[tokio::test]
    async fn wrong_chain_rpc_is_rejected() {
        let mut chain = MockSwapChain::new();
        chain.expect_block_number().returning(|| Ok(19_000_000));
        chain.expect_chain_id().returning(|| Ok(1));

        let mut quotes = MockQuoteSource::new();
        quotes.expect_quote().never();

        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::Connectivity(_)));
    }

    #[tokio::test]
    async fn quote_for_another_chain_is_rejected() {
        let mut chain = live_chain(AMOUNT);
        chain.expect_approve().never();
        chain.expect_send_and_confirm().never();

        let quote = quote_with(Some(json!({ "to": SPENDER, "chainId": 42161 })), "5000000");
        let quotes = quotes(quote);
        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::QuoteMismatch(_)));
    }

    #[tokio::test]
    async fn quote_sent_from_another_wallet_is_rejected() {
        let mut chain = live_chain(AMOUNT);
        chain.expect_allowance().never();
        chain.expect_approve().never();
        chain.expect_estimate_gas().never();
        chain.expect_send_and_confirm().never();

        let quote = quote_with(
            Some(json!({
                "to": SPENDER,
                "from": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
                "chainId": 137
            })),
            "5000000",
        );
        let quotes = quotes(quote);
        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::QuoteMismatch(ref m) if m.contains("sent from")));
    }

    #[tokio::test]
    async fn native_balance_failure_does_not_stop_the_run() {
        let mut chain = MockSwapChain::new();
        chain.expect_wallet_address().return_const(wallet());
        chain.expect_block_number().returning(|| Ok(60_000_000));
        chain.expect_chain_id().returning(|| Ok(137));
        chain
            .expect_native_balance()
            .returning(|_| Err(SwapError::Rpc("eth_getBalance timed out".to_string())));
        chain
            .expect_token_balance()
            .returning(|token, _| Ok(balance("USDT", AMOUNT, Some(token))));
        chain.expect_allowance().returning(|_, _, _| Ok(U256::MAX));
        chain.expect_estimate_gas().returning(|_| Ok(300_000));
        chain
            .expect_send_and_confirm()
            .times(1)
            .returning(|_| Ok(receipt("0xswap")));

        let quotes = quotes(swap_quote());
        let outcome = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap();
        assert!(outcome.balances.native.is_none());
        assert_eq!(outcome.balances.tokens.len(), 2);
    }

    #[tokio::test]
    async fn execution_revert_is_surfaced() {
        let mut chain = live_chain(AMOUNT);
        chain.expect_allowance().returning(|_, _, _| Ok(U256::MAX));
        chain.expect_estimate_gas().returning(|_| Ok(300_000));
        chain.expect_send_and_confirm().times(1).returning(|_| {
            Err(SwapError::Execution {
                reason: Some("0xabc reverted: Return amount is not enough".to_string()),
            })
        });

        let quotes = quotes(swap_quote());
        let err = SwapWorkflow::new(&chain, &quotes, options())
            .execute(&request())
            .await
            .unwrap_err();
        assert_eq!(
            err.revert_reason(),
            Some("0xabc reverted: Return amount is not enough")
        );
    }

    struct StalledQuotes;

    #[async_trait]
    impl QuoteSource for StalledQuotes {
        async fn quote(&self, _request: &QuoteRequest) -> Result<QuoteResponse, SwapError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(swap_quote())
        }
    }

    #[tokio::test]
    async fn stalled_run_times_out() {
        let mut chain = live_chain(AMOUNT);
        chain.expect_send_and_confirm().never();

        let options = WorkflowOptions {
            timeout: Duration::from_millis(50),
            ..options()
        };
        let err = SwapWorkflow::new(&chain, &StalledQuotes, options)
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, SwapError::Timeout(_)));
    }

    #[test]
    fn quoted_amount_check_accepts_equal_and_missing() {
        assert!(check_quoted_amount(&swap_quote(), &request()).is_ok());
        assert!(check_quoted_amount(&quote_with(None, "4999999"), &request()).is_ok());

        let mut no_amount = swap_quote();
        no_amount.estimate = None;
        assert!(check_quoted_amount(&no_amount, &request()).is_ok());
    }
}
