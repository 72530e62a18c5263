// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Transaction notifications.
//!
//! Notification is a fire-and-forget collaborator: the pipeline catches and
//! logs delivery failures, and they never affect a transaction's persisted
//! status.

use async_trait::async_trait;

use crate::domain::Transaction;

/// Errors from notification delivery.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Email API returned status {status}")]
    Api { status: u16 },
}

/// Consumes a terminal transaction to notify the parties involved.
#[async_trait]
pub trait TransactionNotifier: Send + Sync {
    async fn notify_transaction(&self, tx: &Transaction) -> Result<(), NotifyError>;
}

/// Log-only notifier, used when no email provider is configured.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

#[async_trait]
impl TransactionNotifier for TracingNotifier {
    async fn notify_transaction(&self, tx: &Transaction) -> Result<(), NotifyError> {
        tracing::info!(
            transaction_id = %tx.id,
            status = %tx.status,
            "transaction notification"
        );
        Ok(())
    }
}

/// Email notifier backed by the Resend HTTP API.
pub struct EmailNotifier {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    from_email: String,
    /// Confirmation inbox; per-user address resolution lives in the
    /// excluded identity layer.
    to_email: String,
    explorer_url: String,
}

impl EmailNotifier {
    pub fn new(
        api_key: impl Into<String>,
        to_email: impl Into<String>,
        explorer_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: "https://api.resend.com".to_string(),
            api_key: api_key.into(),
            from_email: "noreply@altoke.app".to_string(),
            to_email: to_email.into(),
            explorer_url: explorer_url.into(),
        }
    }

    fn confirmation_email(&self, tx: &Transaction) -> (String, String) {
        let subject = format!("Transacción {} - Altoke", tx.status);
        let tx_hash = tx.tx_hash.as_deref().unwrap_or("-");
        let html = format!(
            "<h1>Transacción {status}</h1>\
             <p>Tu transferencia de {amount} ha sido procesada.</p>\
             <p>Hash de transacción: <code>{tx_hash}</code></p>\
             <p><a href=\"{explorer}/tx/{tx_hash}\">Ver en explorador</a></p>",
            status = tx.status,
            amount = tx.amount.format(),
            explorer = self.explorer_url,
        );
        (subject, html)
    }
}

#[async_trait]
impl TransactionNotifier for EmailNotifier {
    async fn notify_transaction(&self, tx: &Transaction) -> Result<(), NotifyError> {
        let (subject, html) = self.confirmation_email(tx);

        let response = self
            .http
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from_email,
                "to": self.to_email,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Api {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Money, NewTransaction, TxType};

    fn completed_tx() -> Transaction {
        Transaction::create(NewTransaction {
            from_user_id: "user-1".to_string(),
            to_user_id: None,
            to_address: "0x1234567890abcdef1234567890abcdef12345678".to_string(),
            tx_type: TxType::Send,
            amount: Money::from_usdc(25.0).unwrap(),
            exchange_rate: None,
            description: None,
        })
        .mark_as_completed("0xAAA", 1, 21000)
        .unwrap()
    }

    #[tokio::test]
    async fn tracing_notifier_always_succeeds() {
        let notifier = TracingNotifier;
        assert!(notifier.notify_transaction(&completed_tx()).await.is_ok());
    }

    #[test]
    fn confirmation_email_carries_amount_and_hash() {
        let notifier = EmailNotifier::new("key", "ops@altoke.app", "https://sepolia.basescan.org");
        let (subject, html) = notifier.confirmation_email(&completed_tx());

        assert!(subject.contains("completed"));
        assert!(html.contains("$25.00"));
        assert!(html.contains("0xAAA"));
        assert!(html.contains("https://sepolia.basescan.org/tx/0xAAA"));
    }
}
