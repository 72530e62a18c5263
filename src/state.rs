// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

use std::sync::Arc;

use crate::chain::{BaseClient, NetworkConfig};
use crate::rates::ExchangeRateProvider;
use crate::remit::SendRemittance;
use crate::storage::{TransactionStore, WalletStore};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub remit: Arc<SendRemittance>,
    pub wallets: Arc<dyn WalletStore>,
    pub transactions: Arc<dyn TransactionStore>,
    pub chain: Arc<BaseClient>,
    pub rates: Arc<dyn ExchangeRateProvider>,
    pub network: NetworkConfig,
}
