// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! JSON-file store.
//!
//! ## Storage Layout
//!
//! ```text
//! {data_dir}/
//!   wallets/{wallet_id}.json
//!   transactions/{transaction_id}.json
//! ```
//!
//! Writes go to a temp file first and are renamed into place, so a reader
//! never observes a partially written record. Queries scan the directory;
//! unreadable files are logged and skipped rather than failing the whole
//! listing.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::domain::{Balance, Transaction, Wallet};

use super::{StoreError, StoreResult, TransactionStore, WalletStore};

/// File-per-entity JSON store implementing both repository contracts.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("wallets"))?;
        fs::create_dir_all(root.join("transactions"))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn wallet_path(&self, wallet_id: &str) -> PathBuf {
        self.root.join("wallets").join(format!("{wallet_id}.json"))
    }

    fn tx_path(&self, tx_id: &str) -> PathBuf {
        self.root
            .join("transactions")
            .join(format!("{tx_id}.json"))
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write to a temp file, then rename into place.
    fn write_json<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// All records in a directory, skipping unreadable files.
    fn scan<T: DeserializeOwned>(&self, dir: &str) -> StoreResult<Vec<T>> {
        let dir = self.root.join(dir);
        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_json(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable record");
                }
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl TransactionStore for JsonStore {
    async fn save(&self, tx: &Transaction) -> StoreResult<()> {
        let path = self.tx_path(&tx.id);
        if path.exists() {
            return Err(StoreError::AlreadyExists(format!("Transaction {}", tx.id)));
        }
        Self::write_json(&path, tx)
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Transaction>> {
        let path = self.tx_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_json(&path).map(Some)
    }

    async fn find_by_user(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Transaction>> {
        let mut matching: Vec<Transaction> = self
            .scan::<Transaction>("transactions")?
            .into_iter()
            .filter(|tx| {
                tx.from_user_id == user_id || tx.to_user_id.as_deref() == Some(user_id)
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn find_by_tx_hash(&self, tx_hash: &str) -> StoreResult<Option<Transaction>> {
        Ok(self
            .scan::<Transaction>("transactions")?
            .into_iter()
            .find(|tx| tx.tx_hash.as_deref() == Some(tx_hash)))
    }

    async fn update(&self, tx: &Transaction) -> StoreResult<()> {
        let path = self.tx_path(&tx.id);
        if !path.exists() {
            return Err(StoreError::NotFound(format!("Transaction {}", tx.id)));
        }
        Self::write_json(&path, tx)
    }
}

#[async_trait]
impl WalletStore for JsonStore {
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<Wallet>> {
        Ok(self
            .scan::<Wallet>("wallets")?
            .into_iter()
            .find(|w| w.user_id == user_id && w.is_active))
    }

    async fn find_by_address(&self, address: &str) -> StoreResult<Option<Wallet>> {
        Ok(self
            .scan::<Wallet>("wallets")?
            .into_iter()
            .find(|w| w.address.eq_ignore_ascii_case(address)))
    }

    async fn save(&self, wallet: &Wallet) -> StoreResult<()> {
        Self::write_json(&self.wallet_path(&wallet.id), wallet)
    }

    async fn update_balance(&self, wallet_id: &str, balance: Balance) -> StoreResult<()> {
        let path = self.wallet_path(wallet_id);
        if !path.exists() {
            return Err(StoreError::NotFound(format!("Wallet {wallet_id}")));
        }
        let wallet: Wallet = Self::read_json(&path)?;
        Self::write_json(&path, &wallet.with_balance(balance))
    }
}
