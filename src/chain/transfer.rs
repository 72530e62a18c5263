// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! USDC transfer submission for Base.
//!
//! Builds an EIP-1559 ERC-20 `transfer` transaction, signs it with the
//! caller-supplied key, broadcasts, and waits for the receipt. The whole
//! submit-and-confirm sequence runs under a timeout: a hung RPC node or a
//! transaction stuck in the mempool surfaces as
//! [`ChainError::ConfirmationTimeout`] instead of blocking the pipeline
//! forever.

use std::str::FromStr;
use std::time::Duration;

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    sol_types::SolCall,
};
use async_trait::async_trait;

use crate::remit::{ChainTransferClient, TransferOutcome};

use super::client::{to_token_units, BaseClient, ChainError};
use super::erc20::IERC20;
use super::types::{NetworkConfig, USDC_DECIMALS};

/// Signing USDC transfer client.
pub struct UsdcTransfer {
    network: NetworkConfig,
    reads: BaseClient,
    confirmation_timeout: Duration,
}

impl UsdcTransfer {
    /// Create a transfer client for the given network.
    pub fn new(
        network: NetworkConfig,
        confirmation_timeout: Duration,
    ) -> Result<Self, ChainError> {
        let reads = BaseClient::new(network.clone())?;
        Ok(Self {
            network,
            reads,
            confirmation_timeout,
        })
    }

    /// Build a signer from a hex private key (with or without 0x prefix).
    fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, ChainError> {
        let hex_key = private_key_hex.trim_start_matches("0x");
        let key_bytes = alloy::hex::decode(hex_key)
            .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?;

        PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))
    }

    /// Submit a USDC transfer and wait for its receipt.
    pub async fn send_usdc(
        &self,
        signing_key: &str,
        to_address: &str,
        amount: f64,
    ) -> Result<TransferOutcome, ChainError> {
        let to_addr = Address::from_str(to_address)
            .map_err(|e| ChainError::InvalidAddress(format!("Invalid to address: {e}")))?;
        let token_addr = Address::from_str(self.network.usdc_address)
            .map_err(|e| ChainError::InvalidAddress(format!("Invalid token address: {e}")))?;
        let amount_units = to_token_units(amount, USDC_DECIMALS)?;

        let signer = Self::signer_from_hex(signing_key)?;
        let wallet = EthereumWallet::from(signer);

        let url: url::Url = self
            .network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))?;
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        let call = IERC20::transferCall {
            to: to_addr,
            amount: amount_units,
        };
        let data = call.abi_encode();

        let (max_fee_per_gas, max_priority_fee_per_gas) = self.reads.gas_prices().await?;

        let tx = TransactionRequest::default()
            .to(token_addr)
            .input(data.into())
            .max_fee_per_gas(max_fee_per_gas)
            .max_priority_fee_per_gas(max_priority_fee_per_gas);

        let seconds = self.confirmation_timeout.as_secs();
        let receipt = tokio::time::timeout(self.confirmation_timeout, async {
            let pending = provider
                .send_transaction(tx)
                .await
                .map_err(|e| ChainError::TransferFailed(format!("Failed to send: {e}")))?;
            pending
                .get_receipt()
                .await
                .map_err(|e| ChainError::Rpc(format!("Failed to get receipt: {e}")))
        })
        .await
        .map_err(|_| ChainError::ConfirmationTimeout { seconds })??;

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if !receipt.status() {
            return Err(ChainError::Reverted { tx_hash });
        }

        Ok(TransferOutcome {
            tx_hash,
            block_number: receipt.block_number.unwrap_or(0),
            gas_used: receipt.gas_used as u64,
        })
    }
}

#[async_trait]
impl ChainTransferClient for UsdcTransfer {
    async fn transfer(
        &self,
        signing_key: &str,
        to_address: &str,
        amount: f64,
    ) -> Result<TransferOutcome, ChainError> {
        self.send_usdc(signing_key, to_address, amount).await
    }

    async fn stablecoin_balance(&self, address: &str) -> Result<f64, ChainError> {
        self.reads.usdc_balance(address).await
    }
}
