// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Base network configuration and token constants.

use crate::domain::Network;

/// USDC uses 6 decimals on Base.
pub const USDC_DECIMALS: u8 = 6;

/// Native ETH uses 18 decimals.
pub const ETH_DECIMALS: u8 = 18;

/// Base network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Block explorer URL
    pub explorer_url: &'static str,
    /// Circle's USDC contract on this network
    pub usdc_address: &'static str,
}

impl NetworkConfig {
    /// Base mainnet configuration.
    pub fn base() -> Self {
        Self {
            name: "Base",
            chain_id: 8453,
            rpc_url: "https://mainnet.base.org".to_string(),
            explorer_url: "https://basescan.org",
            usdc_address: "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
        }
    }

    /// Base Sepolia testnet configuration.
    pub fn base_sepolia() -> Self {
        Self {
            name: "Base Sepolia",
            chain_id: 84532,
            rpc_url: "https://sepolia.base.org".to_string(),
            explorer_url: "https://sepolia.basescan.org",
            usdc_address: "0x036CbD53842c5426634e7929541eC2318f3dCF7e",
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Base => Self::base(),
            Network::BaseSepolia => Self::base_sepolia(),
        }
    }

    /// Override the public RPC endpoint (e.g. a dedicated node provider).
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Explorer link for a transaction hash.
    pub fn tx_explorer_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }

    /// The [`Network`] this configuration belongs to.
    pub fn network(&self) -> Network {
        match self.chain_id {
            8453 => Network::Base,
            _ => Network::BaseSepolia,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_configs_resolve() {
        let mainnet = NetworkConfig::for_network(Network::Base);
        assert_eq!(mainnet.chain_id, 8453);

        let testnet = NetworkConfig::for_network(Network::BaseSepolia);
        assert_eq!(testnet.chain_id, 84532);
        assert_ne!(mainnet.usdc_address, testnet.usdc_address);
    }

    #[test]
    fn rpc_override_applies() {
        let config = NetworkConfig::base_sepolia().with_rpc_url("http://localhost:8545");
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.chain_id, 84532);
    }

    #[test]
    fn explorer_url_for_tx() {
        let config = NetworkConfig::base();
        assert_eq!(
            config.tx_explorer_url("0xabc"),
            "https://basescan.org/tx/0xabc"
        );
    }
}
