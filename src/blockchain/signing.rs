// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet identity derived from a private signing credential.
//!
//! Accepts the raw 32-byte key as hex (with or without `0x`) or a PEM
//! encoded secp256k1 key (SEC1 or PKCS#8).

use std::fmt;

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};
use k256::SecretKey;

use crate::error::SwapError;

/// Signing identity used as both source and destination of a swap.
#[derive(Clone)]
pub struct WalletIdentity {
    signer: PrivateKeySigner,
}

impl WalletIdentity {
    /// Parse a secret in any supported format.
    pub fn from_secret(secret: &str) -> Result<Self, SwapError> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(SwapError::InvalidCredentials("secret is empty".to_string()));
        }

        let signer = if secret.starts_with("-----BEGIN") {
            signer_from_pem(secret.replace("\\n", "\n").as_bytes())?
        } else {
            signer_from_hex(secret)?
        };
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Network wallet for signing transactions through a provider.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl fmt::Debug for WalletIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletIdentity")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Create a signer from a hex private key (64 characters, optional 0x).
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, SwapError> {
    let stripped = private_key_hex
        .strip_prefix("0x")
        .or_else(|| private_key_hex.strip_prefix("0X"))
        .unwrap_or(private_key_hex);

    if stripped.len() != 64 {
        return Err(SwapError::InvalidCredentials(format!(
            "expected 64 hex characters, got {}",
            stripped.len()
        )));
    }

    let key_bytes = alloy::hex::decode(stripped)
        .map_err(|e| SwapError::InvalidCredentials(format!("invalid hex: {e}")))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| SwapError::InvalidCredentials(e.to_string()))
}

/// Create a signer from a PEM-encoded private key.
pub fn signer_from_pem(pem_bytes: &[u8]) -> Result<PrivateKeySigner, SwapError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| SwapError::InvalidCredentials(format!("Invalid UTF-8: {e}")))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| SwapError::InvalidCredentials(format!("Invalid PEM: {e}")))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| {
            use k256::pkcs8::DecodePrivateKey;
            SecretKey::from_pkcs8_der(pem.contents()).map_err(|e| e.to_string())
        })
        .map_err(|e| SwapError::InvalidCredentials(format!("Invalid key format: {e}")))?;

    PrivateKeySigner::from_slice(&secret_key.to_bytes())
        .map_err(|e| SwapError::InvalidCredentials(e.to_string()))
}
