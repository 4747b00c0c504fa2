// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM chain integration.
//!
//! This module provides functionality for:
//! - Deriving the signing wallet from a private credential
//! - Querying native and ERC-20 token balances
//! - Token allowance checks and approvals
//! - Gas estimation, transaction broadcasting and confirmation

pub mod client;
pub mod erc20;
pub mod signing;
pub mod transactions;
pub mod types;

pub use client::ChainClient;
pub use signing::WalletIdentity;
pub use transactions::parse_amount;
pub use types::*;
