// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! In-memory store for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Balance, Transaction, Wallet};

use super::{StoreError, StoreResult, TransactionStore, WalletStore};

/// `HashMap`-backed store implementing both repository contracts.
#[derive(Default)]
pub struct MemoryStore {
    wallets: RwLock<HashMap<String, Wallet>>,
    transactions: RwLock<HashMap<String, Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn save(&self, tx: &Transaction) -> StoreResult<()> {
        let mut transactions = self.transactions.write().await;
        if transactions.contains_key(&tx.id) {
            return Err(StoreError::AlreadyExists(format!("Transaction {}", tx.id)));
        }
        transactions.insert(tx.id.clone(), tx.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Transaction>> {
        Ok(self.transactions.read().await.get(id).cloned())
    }

    async fn find_by_user(&self, user_id: &str, limit: usize) -> StoreResult<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut matching: Vec<Transaction> = transactions
            .values()
            .filter(|tx| {
                tx.from_user_id == user_id || tx.to_user_id.as_deref() == Some(user_id)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn find_by_tx_hash(&self, tx_hash: &str) -> StoreResult<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .find(|tx| tx.tx_hash.as_deref() == Some(tx_hash))
            .cloned())
    }

    async fn update(&self, tx: &Transaction) -> StoreResult<()> {
        let mut transactions = self.transactions.write().await;
        if !transactions.contains_key(&tx.id) {
            return Err(StoreError::NotFound(format!("Transaction {}", tx.id)));
        }
        transactions.insert(tx.id.clone(), tx.clone());
        Ok(())
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Option<Wallet>> {
        let wallets = self.wallets.read().await;
        Ok(wallets
            .values()
            .find(|w| w.user_id == user_id && w.is_active)
            .cloned())
    }

    async fn find_by_address(&self, address: &str) -> StoreResult<Option<Wallet>> {
        let wallets = self.wallets.read().await;
        Ok(wallets
            .values()
            .find(|w| w.address.eq_ignore_ascii_case(address))
            .cloned())
    }

    async fn save(&self, wallet: &Wallet) -> StoreResult<()> {
        self.wallets
            .write()
            .await
            .insert(wallet.id.clone(), wallet.clone());
        Ok(())
    }

    async fn update_balance(&self, wallet_id: &str, balance: Balance) -> StoreResult<()> {
        let mut wallets = self.wallets.write().await;
        let Some(wallet) = wallets.get(wallet_id) else {
            return Err(StoreError::NotFound(format!("Wallet {wallet_id}")));
        };
        let updated = wallet.with_balance(balance);
        wallets.insert(wallet_id.to_string(), updated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, Network, NewTransaction, TxType};

    const ADDR: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12";

    fn sample_wallet(user_id: &str) -> Wallet {
        Wallet::new(user_id, ADDR, Some("sealed".into()), Network::BaseSepolia).unwrap()
    }

    fn sample_tx(from: &str, to: Option<&str>) -> Transaction {
        Transaction::create(NewTransaction {
            from_user_id: from.to_string(),
            to_user_id: to.map(str::to_string),
            to_address: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
            tx_type: TxType::Send,
            amount: Money::from_usdc(5.0).unwrap(),
            exchange_rate: None,
            description: None,
        })
    }

    #[tokio::test]
    async fn save_then_update_transaction() {
        let store = MemoryStore::new();
        let tx = sample_tx("user-1", None);
        TransactionStore::save(&store, &tx).await.unwrap();

        // Duplicate save fails.
        assert!(matches!(
            TransactionStore::save(&store, &tx).await,
            Err(StoreError::AlreadyExists(_))
        ));

        let completed = tx.mark_as_completed("0xAAA", 1, 21000).unwrap();
        store.update(&completed).await.unwrap();

        let loaded = store.find_by_id(&tx.id).await.unwrap().unwrap();
        assert_eq!(loaded.tx_hash.as_deref(), Some("0xAAA"));

        let by_hash = store.find_by_tx_hash("0xAAA").await.unwrap().unwrap();
        assert_eq!(by_hash.id, tx.id);
    }

    #[tokio::test]
    async fn update_unknown_transaction_fails() {
        let store = MemoryStore::new();
        let tx = sample_tx("user-1", None);
        assert!(matches!(
            store.update(&tx).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn find_by_user_covers_both_directions_and_limit() {
        let store = MemoryStore::new();
        TransactionStore::save(&store, &sample_tx("user-1", Some("user-2")))
            .await
            .unwrap();
        TransactionStore::save(&store, &sample_tx("user-2", Some("user-1")))
            .await
            .unwrap();
        TransactionStore::save(&store, &sample_tx("user-3", None))
            .await
            .unwrap();

        let for_user1 = TransactionStore::find_by_user(&store, "user-1", 50)
            .await
            .unwrap();
        assert_eq!(for_user1.len(), 2);

        let limited = TransactionStore::find_by_user(&store, "user-1", 1)
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);

        let none = TransactionStore::find_by_user(&store, "user-9", 50)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn wallet_lookup_and_balance_update() {
        let store = MemoryStore::new();
        let wallet = sample_wallet("user-1");
        WalletStore::save(&store, &wallet).await.unwrap();

        let found = WalletStore::find_by_user(&store, "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, wallet.id);

        // Address lookup is case-insensitive.
        let by_addr = store
            .find_by_address(&ADDR.to_lowercase())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_addr.id, wallet.id);

        store
            .update_balance(&wallet.id, Balance::new(0.1, 75.0).unwrap())
            .await
            .unwrap();
        let refreshed = WalletStore::find_by_user(&store, "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(refreshed.balance.usdc, 75.0);

        assert!(matches!(
            store.update_balance("missing", Balance::default()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn inactive_wallets_are_not_returned_by_user_lookup() {
        let store = MemoryStore::new();
        let wallet = sample_wallet("user-1").deactivated();
        WalletStore::save(&store, &wallet).await.unwrap();

        assert!(WalletStore::find_by_user(&store, "user-1")
            .await
            .unwrap()
            .is_none());
    }
}
