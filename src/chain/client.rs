// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Read-only Base client and token-unit conversion helpers.

use std::str::FromStr;

use alloy::{
    eips::BlockNumberOrTag,
    primitives::{Address, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};

use super::erc20::IERC20;
use super::types::{NetworkConfig, ETH_DECIMALS, USDC_DECIMALS};

/// HTTP provider type for Base (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<alloy::network::Ethereum>,
>;

/// Errors from blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Transfer reverted on chain: {tx_hash}")]
    Reverted { tx_hash: String },

    #[error("Transfer not confirmed after {seconds}s; on-chain state unknown")]
    ConfirmationTimeout { seconds: u64 },
}

/// Read-only Base client.
pub struct BaseClient {
    network: NetworkConfig,
    provider: HttpProvider,
}

impl BaseClient {
    /// Connect a read-only provider for the given network.
    pub fn new(network: NetworkConfig) -> Result<Self, ChainError> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { network, provider })
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Native ETH balance for an address, in whole ETH.
    pub async fn native_balance(&self, address: &str) -> Result<f64, ChainError> {
        let addr = Address::from_str(address)
            .map_err(|e| ChainError::InvalidAddress(e.to_string()))?;

        let balance = self
            .provider
            .get_balance(addr)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(from_token_units(balance, ETH_DECIMALS))
    }

    /// USDC balance for an address, in whole USDC.
    pub async fn usdc_balance(&self, address: &str) -> Result<f64, ChainError> {
        let addr = Address::from_str(address)
            .map_err(|e| ChainError::InvalidAddress(e.to_string()))?;
        let token = Address::from_str(self.network.usdc_address)
            .map_err(|e| ChainError::InvalidAddress(e.to_string()))?;

        let contract = IERC20::new(token, self.provider.clone());
        let balance: U256 = contract
            .balanceOf(addr)
            .call()
            .await
            .map_err(|e| ChainError::Contract(e.to_string()))?;

        Ok(from_token_units(balance, USDC_DECIMALS))
    }

    /// Current block number.
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Current EIP-1559 gas prices: `(max_fee_per_gas, max_priority_fee_per_gas)`.
    ///
    /// Max fee is twice the latest base fee plus the tip, which tolerates a
    /// base-fee increase between estimation and inclusion.
    pub(crate) async fn gas_prices(&self) -> Result<(u128, u128), ChainError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to get block: {e}")))?
            .ok_or_else(|| ChainError::Rpc("No latest block".to_string()))?;

        let base_fee: u128 = block
            .header
            .base_fee_per_gas
            .map(|f| f as u128)
            .unwrap_or(1_000_000_000u128); // 1 gwei default

        // Modest tip; Base inclusion is cheap.
        let priority_fee: u128 = 10_000_000; // 0.01 gwei

        let max_fee = base_fee.saturating_mul(2).saturating_add(priority_fee);

        Ok((max_fee, priority_fee))
    }
}

/// Convert a human-readable amount to the token's smallest unit.
///
/// The amount is rendered with exactly `decimals` fractional digits, so any
/// precision beyond what the token can represent is rejected by `f64`
/// formatting before it can silently truncate value.
pub fn to_token_units(amount: f64, decimals: u8) -> Result<U256, ChainError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ChainError::InvalidAmount(format!(
            "amount must be a non-negative number, got {amount}"
        )));
    }

    let text = format!("{amount:.prec$}", prec = decimals as usize);
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text.as_str(), ""),
    };

    let whole: u128 = whole
        .parse()
        .map_err(|_| ChainError::InvalidAmount(format!("amount out of range: {amount}")))?;
    let frac: u128 = if frac.is_empty() {
        0
    } else {
        frac.parse()
            .map_err(|_| ChainError::InvalidAmount(format!("amount out of range: {amount}")))?
    };

    let multiplier = 10u128.pow(decimals as u32);
    let total = whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| ChainError::InvalidAmount(format!("amount overflow: {amount}")))?;

    Ok(U256::from(total))
}

/// Convert a token amount in smallest units to a human-readable `f64`.
pub fn from_token_units(units: U256, decimals: u8) -> f64 {
    if units.is_zero() {
        return 0.0;
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = units / divisor;
    let remainder = units % divisor;

    format!("{}.{:0>width$}", whole, remainder, width = decimals as usize)
        .parse()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_units_whole_and_fractional() {
        assert_eq!(to_token_units(1.0, USDC_DECIMALS).unwrap(), U256::from(1_000_000u64));
        assert_eq!(to_token_units(1.5, USDC_DECIMALS).unwrap(), U256::from(1_500_000u64));
        assert_eq!(to_token_units(0.000001, USDC_DECIMALS).unwrap(), U256::from(1u64));
        assert_eq!(
            to_token_units(1.0, ETH_DECIMALS).unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn to_units_rejects_bad_amounts() {
        assert!(matches!(
            to_token_units(-1.0, USDC_DECIMALS),
            Err(ChainError::InvalidAmount(_))
        ));
        assert!(matches!(
            to_token_units(f64::NAN, USDC_DECIMALS),
            Err(ChainError::InvalidAmount(_))
        ));
        assert!(matches!(
            to_token_units(f64::INFINITY, USDC_DECIMALS),
            Err(ChainError::InvalidAmount(_))
        ));
    }

    #[test]
    fn from_units_round_trips() {
        assert_eq!(from_token_units(U256::from(1_500_000u64), USDC_DECIMALS), 1.5);
        assert_eq!(from_token_units(U256::ZERO, USDC_DECIMALS), 0.0);
        assert_eq!(
            from_token_units(U256::from(500_000_000_000_000_000u64), ETH_DECIMALS),
            0.5
        );

        let amount = 42.75;
        let units = to_token_units(amount, USDC_DECIMALS).unwrap();
        assert_eq!(from_token_units(units, USDC_DECIMALS), amount);
    }
}
