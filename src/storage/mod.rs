// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! # Persistence Contracts
//!
//! Repository traits for wallets and transactions, plus the two bundled
//! implementations:
//!
//! - [`memory::MemoryStore`]: `HashMap` behind a `tokio` lock; used by
//!   tests and local development.
//! - [`fs::JsonStore`]: one JSON file per entity with atomic
//!   temp-file+rename writes; the production store.
//!
//! All operations are atomic at the single-entity level; no cross-entity
//! transaction is assumed or required by callers.

use async_trait::async_trait;

use crate::domain::{Balance, Transaction, Wallet};

pub mod fs;
pub mod memory;

pub use fs::JsonStore;
pub use memory::MemoryStore;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for [`Transaction`] records.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a new transaction. Fails with [`StoreError::AlreadyExists`]
    /// if the id is already present.
    async fn save(&self, tx: &Transaction) -> StoreResult<()>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Transaction>>;

    /// Transactions where the user is sender or recipient, newest first,
    /// truncated to `limit`.
    async fn find_by_user(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Transaction>>;

    async fn find_by_tx_hash(&self, tx_hash: &str) -> StoreResult<Option<Transaction>>;

    /// Replace an existing transaction snapshot. Fails with
    /// [`StoreError::NotFound`] if the id is unknown.
    async fn update(&self, tx: &Transaction) -> StoreResult<()>;
}

/// Persistence contract for [`Wallet`] records.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// The active wallet for a user, if any.
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<Wallet>>;

    async fn find_by_address(&self, address: &str) -> StoreResult<Option<Wallet>>;

    /// Upsert by wallet id.
    async fn save(&self, wallet: &Wallet) -> StoreResult<()>;

    /// Replace the balance snapshot of an existing wallet.
    async fn update_balance(&self, wallet_id: &str, balance: Balance) -> StoreResult<()>;
}
