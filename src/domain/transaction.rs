// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Transaction entity and its status state machine.
//!
//! A transaction records one attempted value movement. Status transitions
//! are monotonic: once a transaction reaches a terminal status (`Completed`,
//! `Failed`, `Cancelled`) no further transition is permitted. Every
//! transition returns a new snapshot; the caller persists it.
//!
//! Invariants maintained here:
//! - `tx_hash` is set if and only if the status is `Completed`.
//! - `error_message` is set if and only if the status is `Failed`.
//! - The amount and its currency are fixed at creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

/// Transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Intent recorded, no chain attempt resolved yet.
    Pending,
    /// Chain attempt in flight.
    Processing,
    /// Confirmed on chain.
    Completed,
    /// Attempt failed; `error_message` holds the cause.
    Failed,
    /// Abandoned before any chain attempt.
    Cancelled,
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxStatus::Completed | TxStatus::Failed | TxStatus::Cancelled)
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TxStatus::Pending => "pending",
            TxStatus::Processing => "processing",
            TxStatus::Completed => "completed",
            TxStatus::Failed => "failed",
            TxStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Direction/kind of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Send,
    Receive,
    Buy,
    Sell,
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TxType::Send => "send",
            TxType::Receive => "receive",
            TxType::Buy => "buy",
            TxType::Sell => "sell",
        };
        write!(f, "{s}")
    }
}

/// Rejected status transition. A transition attempted from a status that
/// does not allow it is an ordering bug in the caller, not a user error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Only pending or processing transactions can be completed")]
    Complete { from: TxStatus },

    #[error("Only pending transactions can be set to processing")]
    Process { from: TxStatus },

    #[error("Terminal transactions cannot be marked failed")]
    Fail { from: TxStatus },

    #[error("Only pending transactions can be cancelled")]
    Cancel { from: TxStatus },
}

/// Parameters for [`Transaction::create`].
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub from_user_id: String,
    /// Set when the recipient is a platform user.
    pub to_user_id: Option<String>,
    /// Destination address on Base.
    pub to_address: String,
    pub tx_type: TxType,
    pub amount: Money,
    /// USD→PEN rate captured at creation time, if known.
    pub exchange_rate: Option<f64>,
    pub description: Option<String>,
}

/// One attempted value movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub from_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<String>,
    pub to_address: String,
    pub tx_type: TxType,
    pub status: TxStatus,
    /// Principal in the stablecoin unit; currency fixed at creation.
    pub amount: Money,
    /// Local-currency equivalent at creation time (PEN).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_amount_pen: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    /// Network fee charged to the sender. Zero in the send path.
    pub fee_usdc: f64,
    /// Platform fee. Zero in the send path.
    pub platform_fee_usdc: f64,
    /// On-chain hash; present exactly when `status` is `Completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Present exactly when `status` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Record a new intent in `Pending`. The PEN equivalent is computed
    /// eagerly when an exchange rate is supplied (pure multiplication).
    pub fn create(params: NewTransaction) -> Self {
        let converted_amount_pen = params
            .exchange_rate
            .map(|rate| params.amount.value() * rate);
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            from_user_id: params.from_user_id,
            to_user_id: params.to_user_id,
            to_address: params.to_address,
            tx_type: params.tx_type,
            status: TxStatus::Pending,
            amount: params.amount,
            converted_amount_pen,
            exchange_rate: params.exchange_rate,
            fee_usdc: 0.0,
            platform_fee_usdc: 0.0,
            tx_hash: None,
            block_number: None,
            gas_used: None,
            description: params.description,
            error_message: None,
            created_at: now,
            completed_at: None,
            updated_at: now,
        }
    }

    pub fn can_be_cancelled(&self) -> bool {
        self.status == TxStatus::Pending
    }

    /// New snapshot in `Processing`. Valid only from `Pending`.
    pub fn mark_as_processing(&self) -> Result<Transaction, TransitionError> {
        if self.status != TxStatus::Pending {
            return Err(TransitionError::Process { from: self.status });
        }
        Ok(Transaction {
            status: TxStatus::Processing,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    /// New snapshot in `Completed` with the on-chain outcome. Valid only
    /// from `Pending` or `Processing`.
    pub fn mark_as_completed(
        &self,
        tx_hash: impl Into<String>,
        block_number: u64,
        gas_used: u64,
    ) -> Result<Transaction, TransitionError> {
        if self.status != TxStatus::Pending && self.status != TxStatus::Processing {
            return Err(TransitionError::Complete { from: self.status });
        }
        let now = Utc::now();
        Ok(Transaction {
            status: TxStatus::Completed,
            tx_hash: Some(tx_hash.into()),
            block_number: Some(block_number),
            gas_used: Some(gas_used),
            completed_at: Some(now),
            updated_at: now,
            ..self.clone()
        })
    }

    /// New snapshot in `Failed` carrying the error message. Valid from any
    /// non-terminal status. `completed_at` stays unset.
    pub fn mark_as_failed(
        &self,
        error_message: impl Into<String>,
    ) -> Result<Transaction, TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Fail { from: self.status });
        }
        Ok(Transaction {
            status: TxStatus::Failed,
            error_message: Some(error_message.into()),
            updated_at: Utc::now(),
            ..self.clone()
        })
    }

    /// New snapshot in `Cancelled`. Valid only from `Pending` (no chain
    /// attempt has been made yet). Not exercised by the send pipeline.
    pub fn cancel(&self) -> Result<Transaction, TransitionError> {
        if !self.can_be_cancelled() {
            return Err(TransitionError::Cancel { from: self.status });
        }
        Ok(Transaction {
            status: TxStatus::Cancelled,
            updated_at: Utc::now(),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;

    fn new_send(amount: f64, rate: Option<f64>) -> Transaction {
        Transaction::create(NewTransaction {
            from_user_id: "user-1".to_string(),
            to_user_id: Some("user-2".to_string()),
            to_address: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
            tx_type: TxType::Send,
            amount: Money::from_usdc(amount).unwrap(),
            exchange_rate: rate,
            description: None,
        })
    }

    #[test]
    fn create_starts_pending_with_zero_fees() {
        let tx = new_send(100.0, None);
        assert_eq!(tx.status, TxStatus::Pending);
        assert_eq!(tx.amount.value(), 100.0);
        assert_eq!(tx.fee_usdc, 0.0);
        assert_eq!(tx.platform_fee_usdc, 0.0);
        assert!(tx.tx_hash.is_none());
        assert!(tx.error_message.is_none());
        assert!(!tx.id.is_empty());
    }

    #[test]
    fn create_computes_pen_equivalent_eagerly() {
        let tx = new_send(100.0, Some(3.72));
        assert_eq!(tx.converted_amount_pen, Some(372.0));
        assert_eq!(tx.exchange_rate, Some(3.72));

        let without_rate = new_send(100.0, None);
        assert!(without_rate.converted_amount_pen.is_none());
    }

    #[test]
    fn mark_as_completed_sets_outcome_fields() {
        let tx = new_send(100.0, None);
        let completed = tx.mark_as_completed("0xTxHash123", 12345, 21000).unwrap();

        assert_eq!(completed.status, TxStatus::Completed);
        assert_eq!(completed.tx_hash.as_deref(), Some("0xTxHash123"));
        assert_eq!(completed.block_number, Some(12345));
        assert_eq!(completed.gas_used, Some(21000));
        assert!(completed.completed_at.is_some());
        assert_eq!(completed.id, tx.id);

        // The original snapshot is unchanged.
        assert_eq!(tx.status, TxStatus::Pending);
        assert!(tx.tx_hash.is_none());
    }

    #[test]
    fn completing_twice_is_rejected() {
        let completed = new_send(100.0, None)
            .mark_as_completed("0xTxHash123", 1, 1)
            .unwrap();
        let err = completed.mark_as_completed("0xTxHash456", 2, 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Only pending or processing transactions can be completed"
        );
    }

    #[test]
    fn completing_a_failed_transaction_is_rejected() {
        let failed = new_send(100.0, None).mark_as_failed("boom").unwrap();
        assert!(matches!(
            failed.mark_as_completed("0xHash", 1, 1),
            Err(TransitionError::Complete {
                from: TxStatus::Failed
            })
        ));
    }

    #[test]
    fn processing_is_only_reachable_from_pending() {
        let tx = new_send(100.0, None);
        let processing = tx.mark_as_processing().unwrap();
        assert_eq!(processing.status, TxStatus::Processing);

        // Processing → Completed is legal.
        let completed = processing.mark_as_completed("0xHash", 1, 1).unwrap();
        assert_eq!(completed.status, TxStatus::Completed);

        // Processing → Processing is not.
        assert!(matches!(
            processing.mark_as_processing(),
            Err(TransitionError::Process { .. })
        ));
    }

    #[test]
    fn mark_as_failed_sets_message_and_no_completed_at() {
        let tx = new_send(100.0, None);
        let failed = tx.mark_as_failed("Insufficient gas").unwrap();
        assert_eq!(failed.status, TxStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("Insufficient gas"));
        assert!(failed.completed_at.is_none());

        // Failing from Processing is also legal.
        let failed_from_processing = tx
            .mark_as_processing()
            .unwrap()
            .mark_as_failed("rpc down")
            .unwrap();
        assert_eq!(failed_from_processing.status, TxStatus::Failed);
    }

    #[test]
    fn terminal_transactions_cannot_be_failed_again() {
        let failed = new_send(100.0, None).mark_as_failed("boom").unwrap();
        assert!(matches!(
            failed.mark_as_failed("again"),
            Err(TransitionError::Fail { .. })
        ));

        let cancelled = new_send(100.0, None).cancel().unwrap();
        assert!(matches!(
            cancelled.mark_as_failed("again"),
            Err(TransitionError::Fail { .. })
        ));
    }

    #[test]
    fn cancel_only_from_pending() {
        let tx = new_send(100.0, None);
        assert!(tx.can_be_cancelled());
        let cancelled = tx.cancel().unwrap();
        assert_eq!(cancelled.status, TxStatus::Cancelled);

        let completed = new_send(100.0, None)
            .mark_as_completed("0xHash", 1, 1)
            .unwrap();
        assert!(!completed.can_be_cancelled());
        assert!(matches!(
            completed.cancel(),
            Err(TransitionError::Cancel { .. })
        ));
    }

    #[test]
    fn status_terminality() {
        assert!(!TxStatus::Pending.is_terminal());
        assert!(!TxStatus::Processing.is_terminal());
        assert!(TxStatus::Completed.is_terminal());
        assert!(TxStatus::Failed.is_terminal());
        assert!(TxStatus::Cancelled.is_terminal());
    }
}
