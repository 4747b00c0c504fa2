// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion of the aggregator's loosely typed transaction payload into
//! exact integers.
//!
//! Numeric fields may arrive as decimal strings, `0x` hex strings or JSON
//! numbers. Absent (or `null`) fields stay unset; they never default to zero.

use std::str::FromStr;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, U256},
    rpc::types::TransactionRequest,
};
use serde_json::Value;

use super::types::RawTransactionRequest;
use crate::error::SwapError;

/// Transaction fields as exact integers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTransaction {
    pub to: Option<Address>,
    pub from: Option<Address>,
    pub data: Option<Bytes>,
    pub chain_id: Option<u64>,
    pub value: Option<U256>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl NormalizedTransaction {
    pub fn from_raw(raw: &RawTransactionRequest) -> Result<Self, SwapError> {
        Ok(Self {
            to: parse_address("to", raw.to.as_deref())?,
            from: parse_address("from", raw.from.as_deref())?,
            data: parse_data(raw.data.as_deref())?,
            chain_id: parse_narrow("chainId", raw.chain_id.as_ref())?,
            value: parse_quantity("value", raw.value.as_ref())?,
            gas_limit: parse_narrow("gasLimit", raw.gas_limit.as_ref())?,
            gas_price: parse_narrow("gasPrice", raw.gas_price.as_ref())?,
            max_fee_per_gas: parse_narrow("maxFeePerGas", raw.max_fee_per_gas.as_ref())?,
            max_priority_fee_per_gas: parse_narrow(
                "maxPriorityFeePerGas",
                raw.max_priority_fee_per_gas.as_ref(),
            )?,
        })
    }

    /// Back to wire form, numbers as `0x` quantities.
    pub fn to_raw(&self) -> RawTransactionRequest {
        let hex = |v: U256| Value::String(format!("{v:#x}"));
        RawTransactionRequest {
            to: self.to.map(|a| a.to_checksum(None)),
            from: self.from.map(|a| a.to_checksum(None)),
            data: self.data.as_ref().map(|d| d.to_string()),
            chain_id: self.chain_id.map(|v| hex(U256::from(v))),
            value: self.value.map(hex),
            gas_limit: self.gas_limit.map(|v| hex(U256::from(v))),
            gas_price: self.gas_price.map(|v| hex(U256::from(v))),
            max_fee_per_gas: self.max_fee_per_gas.map(|v| hex(U256::from(v))),
            max_priority_fee_per_gas: self.max_priority_fee_per_gas.map(|v| hex(U256::from(v))),
        }
    }

    /// Build the RPC request. Unset fields are left for the provider's
    /// fillers.
    pub fn to_request(&self) -> TransactionRequest {
        let mut tx = TransactionRequest::default();
        if let Some(to) = self.to {
            tx.set_to(to);
        }
        if let Some(from) = self.from {
            tx.set_from(from);
        }
        if let Some(data) = &self.data {
            tx.set_input(data.clone());
        }
        if let Some(chain_id) = self.chain_id {
            tx.set_chain_id(chain_id);
        }
        if let Some(value) = self.value {
            tx.set_value(value);
        }
        if let Some(gas_limit) = self.gas_limit {
            tx.set_gas_limit(gas_limit);
        }
        if let Some(gas_price) = self.gas_price {
            tx.set_gas_price(gas_price);
        }
        if let Some(max_fee) = self.max_fee_per_gas {
            tx.set_max_fee_per_gas(max_fee);
        }
        if let Some(priority_fee) = self.max_priority_fee_per_gas {
            tx.set_max_priority_fee_per_gas(priority_fee);
        }
        tx
    }
}

/// Parse a loose numeric value into a `U256`. `None` and `null` map to
/// `None`.
pub fn parse_quantity(field: &'static str, value: Option<&Value>) -> Result<Option<U256>, SwapError> {
    let value = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => value,
    };

    match value {
        Value::String(s) => parse_numeric_str(field, s).map(Some),
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(Some(U256::from(v)))
            } else {
                // Large JSON numbers lose precision in f64; accept only
                // integral renderings.
                parse_numeric_str(field, &n.to_string()).map(Some)
            }
        }
        other => Err(SwapError::field(field, format!("unsupported JSON type: {other}"))),
    }
}

fn parse_numeric_str(field: &'static str, s: &str) -> Result<U256, SwapError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SwapError::field(field, "empty string"));
    }
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some("") => return Err(SwapError::field(field, "empty hex quantity")),
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(s, 10),
    };
    parsed.map_err(|e| SwapError::field(field, format!("{s:?} is not an integer: {e}")))
}

fn parse_narrow<T>(field: &'static str, value: Option<&Value>) -> Result<Option<T>, SwapError>
where
    T: TryFrom<U256>,
{
    parse_quantity(field, value)?
        .map(|v| T::try_from(v).map_err(|_| SwapError::field(field, format!("{v} out of range"))))
        .transpose()
}

fn parse_address(field: &'static str, value: Option<&str>) -> Result<Option<Address>, SwapError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => Address::from_str(v)
            .map(Some)
            .map_err(|e| SwapError::field(field, format!("{v:?}: {e}"))),
    }
}

fn parse_data(value: Option<&str>) -> Result<Option<Bytes>, SwapError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => Bytes::from_str(v)
            .map(Some)
            .map_err(|e| SwapError::field("data", format!("{e}"))),
    }
}
