// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Custodial wallet entity.
//!
//! A wallet binds a platform user to one Base account: the public address,
//! the AES-GCM-sealed signing key (absent for externally-custodied wallets)
//! and the last-synced balance snapshot. Balances are only written from an
//! authoritative chain query, never decremented optimistically, so the
//! snapshot can be stale but never wrong.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported ledger networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Network {
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "base-sepolia")]
    BaseSepolia,
}

impl Default for Network {
    fn default() -> Self {
        Self::BaseSepolia
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Base => write!(f, "base"),
            Network::BaseSepolia => write!(f, "base-sepolia"),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Network::Base),
            "base-sepolia" => Ok(Network::BaseSepolia),
            other => Err(WalletError::UnknownNetwork(other.to_string())),
        }
    }
}

/// Per-asset balance keys within a wallet snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Eth,
    Usdc,
}

/// Last-synced per-asset balances (human units, not wei).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    pub eth: f64,
    pub usdc: f64,
}

impl Balance {
    /// Build a balance snapshot; negative figures are rejected.
    pub fn new(eth: f64, usdc: f64) -> Result<Self, WalletError> {
        if eth < 0.0 || usdc < 0.0 {
            return Err(WalletError::NegativeBalance);
        }
        Ok(Self { eth, usdc })
    }

    pub fn of(&self, asset: Asset) -> f64 {
        match asset {
            Asset::Eth => self.eth,
            Asset::Usdc => self.usdc,
        }
    }
}

/// Errors from wallet construction and validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WalletError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Balance figures cannot be negative")]
    NegativeBalance,
}

/// Validate an EVM address: `0x` followed by 40 hex characters.
pub fn validate_address(address: &str) -> Result<(), WalletError> {
    if !address.starts_with("0x") {
        return Err(WalletError::InvalidAddress(
            "address must start with 0x".to_string(),
        ));
    }
    if address.len() != 42 {
        return Err(WalletError::InvalidAddress(
            "address must be 42 characters (0x + 40 hex)".to_string(),
        ));
    }
    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidAddress(
            "address must contain only hex characters".to_string(),
        ));
    }
    Ok(())
}

/// One user's custodial account on Base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique wallet identifier (UUID).
    pub id: String,
    /// Owning platform user (1:1 with active wallets).
    pub user_id: String,
    /// Public address on the configured network.
    pub address: String,
    /// Sealed signing key (`salt:nonce:tag:ciphertext` hex), absent for
    /// externally-custodied wallets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_signing_key: Option<String>,
    /// Last-synced balance snapshot.
    pub balance: Balance,
    /// Deactivated wallets are retained but unusable.
    pub is_active: bool,
    pub network: Network,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Create an active wallet for `user_id` at `address`.
    pub fn new(
        user_id: impl Into<String>,
        address: impl Into<String>,
        encrypted_signing_key: Option<String>,
        network: Network,
    ) -> Result<Self, WalletError> {
        let address = address.into();
        validate_address(&address)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            address,
            encrypted_signing_key,
            balance: Balance::default(),
            is_active: true,
            network,
            created_at: now,
            updated_at: now,
        })
    }

    /// Point-in-time check against the last-synced snapshot. This is not a
    /// lock: the chain remains the arbiter at execution time.
    pub fn has_enough_balance(&self, amount: f64, asset: Asset) -> bool {
        self.balance.of(asset) >= amount
    }

    /// Display form: `0x1234...abcd`.
    pub fn truncated_address(&self) -> String {
        format!("{}...{}", &self.address[..6], &self.address[self.address.len() - 4..])
    }

    /// Copy of this wallet with a fresh balance snapshot.
    pub fn with_balance(&self, balance: Balance) -> Self {
        Self {
            balance,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Copy of this wallet, deactivated. Wallets are never deleted.
    pub fn deactivated(&self) -> Self {
        Self {
            is_active: false,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12";

    fn test_wallet() -> Wallet {
        Wallet::new("user-1", ADDR, Some("sealed".to_string()), Network::BaseSepolia).unwrap()
    }

    #[test]
    fn new_wallet_is_active_with_zero_balance() {
        let wallet = test_wallet();
        assert!(wallet.is_active);
        assert_eq!(wallet.balance, Balance::default());
        assert_eq!(wallet.user_id, "user-1");
        assert!(!wallet.id.is_empty());
    }

    #[test]
    fn address_validation() {
        assert!(validate_address(ADDR).is_ok());
        assert!(validate_address("742d35Cc6634C0532925a3b844Bc9e7595f4aB12").is_err());
        assert!(validate_address("0x742d35").is_err());
        assert!(validate_address("0xZZ2d35Cc6634C0532925a3b844Bc9e7595f4aB12").is_err());
    }

    #[test]
    fn invalid_address_rejected_at_construction() {
        let result = Wallet::new("user-1", "not-an-address", None, Network::Base);
        assert!(matches!(result, Err(WalletError::InvalidAddress(_))));
    }

    #[test]
    fn has_enough_balance_checks_requested_asset() {
        let wallet = test_wallet().with_balance(Balance::new(0.5, 100.0).unwrap());
        assert!(wallet.has_enough_balance(100.0, Asset::Usdc));
        assert!(!wallet.has_enough_balance(100.5, Asset::Usdc));
        assert!(wallet.has_enough_balance(0.5, Asset::Eth));
        assert!(!wallet.has_enough_balance(1.0, Asset::Eth));
    }

    #[test]
    fn negative_balance_rejected() {
        assert!(matches!(
            Balance::new(-0.1, 0.0),
            Err(WalletError::NegativeBalance)
        ));
        assert!(matches!(
            Balance::new(0.0, -1.0),
            Err(WalletError::NegativeBalance)
        ));
    }

    #[test]
    fn with_balance_returns_new_snapshot() {
        let wallet = test_wallet();
        let updated = wallet.with_balance(Balance::new(0.0, 42.0).unwrap());
        assert_eq!(updated.balance.usdc, 42.0);
        assert_eq!(wallet.balance.usdc, 0.0);
        assert_eq!(updated.id, wallet.id);
    }

    #[test]
    fn truncated_address_form() {
        let wallet = test_wallet();
        assert_eq!(wallet.truncated_address(), "0x742d...aB12");
    }

    #[test]
    fn network_round_trips_from_str() {
        assert_eq!("base".parse::<Network>().unwrap(), Network::Base);
        assert_eq!(
            "base-sepolia".parse::<Network>().unwrap(),
            Network::BaseSepolia
        );
        assert!("polygon".parse::<Network>().is_err());
    }
}
