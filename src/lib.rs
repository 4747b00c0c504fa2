// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Swap Runner - aggregator-routed token swaps on EVM chains
//!
//! Fetches a quote with a ready-to-sign transaction from the aggregation
//! API, grants the router an allowance when needed, and submits the swap
//! from a locally held key.
//!
//! ## Modules
//!
//! - `aggregator` - Quote API client and transaction payload normalization
//! - `blockchain` - RPC provider, ERC-20 contracts and signing (alloy)
//! - `workflow` - The quote-to-confirmation pipeline
//! - `config` - Environment configuration and logging setup

pub mod aggregator;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod workflow;

pub use error::SwapError;
pub use workflow::{SwapOutcome, SwapWorkflow, WorkflowOptions};
