// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! The remittance send pipeline.
//!
//! [`SendRemittance`] drives one transfer attempt from request to a
//! persisted terminal state: validate funds, record intent, unseal the
//! signing key, execute the on-chain transfer, reconcile the stored record
//! with the chain outcome, refresh the wallet balance, notify.
//!
//! Collaborators are injected at construction; the orchestrator holds no
//! global state and caches nothing across calls.
//!
//! ## Concurrency
//!
//! Steps within one execution are strictly sequential. Across concurrent
//! executions for the same wallet there is deliberately no mutual
//! exclusion: two sends can both pass the snapshot balance check and both
//! reach the chain, which then rejects the second if funds are short. The
//! local balance is only ever written from an authoritative post-transfer
//! chain query, so it can be stale but never wrong.
//!
//! ## Failure handling
//!
//! Failures before or during the chain call mark the recorded transaction
//! `Failed` (best effort) and re-throw. Failures *after* a confirmed
//! transfer (persisting the `Completed` snapshot, the balance refresh)
//! propagate without rewriting the record: funds have moved, and a stale
//! `Pending` row for an out-of-band sweep is preferable to a `Failed` row
//! that contradicts the chain.

use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::ChainError;
use crate::custody::KeyCipherError;
use crate::domain::{
    wallet::validate_address, Asset, Currency, Money, NewTransaction, Transaction,
    TransitionError, TxType,
};
use crate::notify::TransactionNotifier;
use crate::storage::{StoreError, TransactionStore, WalletStore};

/// Result of a confirmed on-chain transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub tx_hash: String,
    pub block_number: u64,
    pub gas_used: u64,
}

/// Executes token transfers and balance queries against the ledger.
///
/// `transfer` may take arbitrarily long: implementations wait for
/// confirmation and are expected to impose their own timeout, surfacing it
/// as a distinguishable error so operators know the chain state is unknown
/// rather than definitively failed.
#[async_trait]
pub trait ChainTransferClient: Send + Sync {
    async fn transfer(
        &self,
        signing_key: &str,
        to_address: &str,
        amount: f64,
    ) -> Result<TransferOutcome, ChainError>;

    /// Authoritative stablecoin balance for an address.
    async fn stablecoin_balance(&self, address: &str) -> Result<f64, ChainError>;
}

/// Recovers a wallet's signing key from its sealed form.
#[async_trait]
pub trait KeyDecryptor: Send + Sync {
    async fn decrypt_signing_key(
        &self,
        encrypted: &str,
        master_secret: &str,
    ) -> Result<String, KeyCipherError>;
}

/// A remittance send request, as mapped from caller input.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub from_user_id: String,
    /// Set when the recipient is a platform user.
    pub to_user_id: Option<String>,
    /// Validated destination address on Base.
    pub to_address: String,
    pub amount: Money,
    /// USD→PEN rate to capture on the transaction, if known.
    pub exchange_rate: Option<f64>,
    pub description: Option<String>,
}

/// Successful pipeline result.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub transaction_id: String,
    pub tx_hash: String,
}

/// Distinguishable failure kinds of the send pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Wallet not found for user {0}")]
    WalletNotFound(String),

    #[error("Insufficient funds in wallet")]
    InsufficientFunds,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    KeyDecryption(#[from] KeyCipherError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// An illegal status transition: an ordering bug, not a user error.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// The remittance send orchestrator.
pub struct SendRemittance {
    transactions: Arc<dyn TransactionStore>,
    wallets: Arc<dyn WalletStore>,
    chain: Arc<dyn ChainTransferClient>,
    keys: Arc<dyn KeyDecryptor>,
    notifier: Arc<dyn TransactionNotifier>,
    master_secret: String,
}

impl SendRemittance {
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        wallets: Arc<dyn WalletStore>,
        chain: Arc<dyn ChainTransferClient>,
        keys: Arc<dyn KeyDecryptor>,
        notifier: Arc<dyn TransactionNotifier>,
        master_secret: impl Into<String>,
    ) -> Self {
        Self {
            transactions,
            wallets,
            chain,
            keys,
            notifier,
            master_secret: master_secret.into(),
        }
    }

    /// Run one remittance attempt to a persisted terminal state.
    pub async fn execute(&self, request: SendRequest) -> Result<SendOutcome, SendError> {
        // Preconditions: nothing is written until all of these hold.
        if request.amount.currency() != Currency::Usdc {
            return Err(SendError::Validation(format!(
                "Remittances are denominated in USDC, got {}",
                request.amount.currency()
            )));
        }
        validate_address(&request.to_address)
            .map_err(|e| SendError::Validation(e.to_string()))?;

        let wallet = self
            .wallets
            .find_by_user(&request.from_user_id)
            .await?
            .ok_or_else(|| SendError::WalletNotFound(request.from_user_id.clone()))?;

        // Point-in-time check against the last-synced snapshot; the chain
        // is the arbiter if a concurrent send races past it.
        if !wallet.has_enough_balance(request.amount.value(), Asset::Usdc) {
            return Err(SendError::InsufficientFunds);
        }

        let Some(encrypted_key) = wallet.encrypted_signing_key.clone() else {
            return Err(SendError::Validation(
                "Wallet signing key not available".to_string(),
            ));
        };

        // Intent recording: every attempt leaves an auditable row, even one
        // that dies mid-flight.
        let pending = Transaction::create(NewTransaction {
            from_user_id: request.from_user_id.clone(),
            to_user_id: request.to_user_id.clone(),
            to_address: request.to_address.clone(),
            tx_type: TxType::Send,
            amount: request.amount,
            exchange_rate: request.exchange_rate,
            description: request.description.clone(),
        });
        self.transactions.save(&pending).await?;

        let signing_key = match self
            .keys
            .decrypt_signing_key(&encrypted_key, &self.master_secret)
            .await
        {
            Ok(key) => key,
            Err(e) => return self.fail(&pending, SendError::KeyDecryption(e)).await,
        };

        let outcome = match self
            .chain
            .transfer(&signing_key, &request.to_address, request.amount.value())
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => return self.fail(&pending, SendError::Chain(e)).await,
        };

        // The transfer is confirmed; from here on the record must never be
        // rewritten to Failed.
        let completed = pending.mark_as_completed(
            outcome.tx_hash.clone(),
            outcome.block_number,
            outcome.gas_used,
        )?;
        self.transactions.update(&completed).await?;

        let usdc = self.chain.stablecoin_balance(&wallet.address).await?;
        self.wallets
            .update_balance(
                &wallet.id,
                crate::domain::Balance {
                    eth: wallet.balance.eth,
                    usdc,
                },
            )
            .await?;

        // Fire-and-forget: a notification failure must not affect the
        // persisted status.
        if let Err(e) = self.notifier.notify_transaction(&completed).await {
            tracing::warn!(
                transaction_id = %completed.id,
                error = %e,
                "transaction notification failed"
            );
        }

        tracing::info!(
            transaction_id = %completed.id,
            tx_hash = %outcome.tx_hash,
            "remittance completed"
        );

        Ok(SendOutcome {
            transaction_id: completed.id,
            tx_hash: outcome.tx_hash,
        })
    }

    /// Record the terminal `Failed` snapshot (best effort) and re-throw the
    /// original error.
    async fn fail(
        &self,
        pending: &Transaction,
        error: SendError,
    ) -> Result<SendOutcome, SendError> {
        match pending.mark_as_failed(error.to_string()) {
            Ok(failed) => {
                if let Err(update_err) = self.transactions.update(&failed).await {
                    tracing::error!(
                        transaction_id = %pending.id,
                        error = %update_err,
                        "failed to persist Failed status; record remains pending"
                    );
                }
            }
            Err(transition_err) => {
                tracing::error!(
                    transaction_id = %pending.id,
                    error = %transition_err,
                    "illegal transition while recording failure"
                );
            }
        }
        Err(error)
    }
}
