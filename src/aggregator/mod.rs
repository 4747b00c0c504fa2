// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Quote-and-route aggregation API.
//!
//! This module provides:
//! - Quote request/response wire types
//! - The HTTP quote client
//! - Normalization of the returned transaction payload

pub mod client;
pub mod normalize;
pub mod types;

pub use client::AggregatorClient;
pub use normalize::NormalizedTransaction;
pub use types::*;
