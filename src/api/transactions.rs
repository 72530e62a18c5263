// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Transaction history and lookup endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    chain::NetworkConfig,
    domain::Transaction,
    error::ApiError,
    state::AppState,
};

/// Query parameters for transaction history.
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Maximum number of results (default: 50).
    #[param(default = 50)]
    pub limit: Option<usize>,
}

/// Transaction list response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionView>,
    pub total: usize,
}

/// API view of a transaction. Amounts are split out of the domain
/// representation for flat JSON.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionView {
    pub id: String,
    pub from_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_user_id: Option<String>,
    pub to_address: String,
    /// send, receive, buy or sell.
    pub tx_type: String,
    /// pending, processing, completed, failed or cancelled.
    pub status: String,
    pub amount_usdc: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_amount_pen: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    pub fee_usdc: f64,
    pub platform_fee_usdc: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub updated_at: String,
}

impl TransactionView {
    pub fn from_transaction(tx: &Transaction, network: &NetworkConfig) -> Self {
        Self {
            id: tx.id.clone(),
            from_user_id: tx.from_user_id.clone(),
            to_user_id: tx.to_user_id.clone(),
            to_address: tx.to_address.clone(),
            tx_type: tx.tx_type.to_string(),
            status: tx.status.to_string(),
            amount_usdc: tx.amount.value(),
            converted_amount_pen: tx.converted_amount_pen,
            exchange_rate: tx.exchange_rate,
            fee_usdc: tx.fee_usdc,
            platform_fee_usdc: tx.platform_fee_usdc,
            tx_hash: tx.tx_hash.clone(),
            block_number: tx.block_number,
            gas_used: tx.gas_used,
            explorer_url: tx
                .tx_hash
                .as_deref()
                .map(|hash| network.tx_explorer_url(hash)),
            description: tx.description.clone(),
            error_message: tx.error_message.clone(),
            created_at: tx.created_at.to_rfc3339(),
            completed_at: tx.completed_at.map(|t| t.to_rfc3339()),
            updated_at: tx.updated_at.to_rfc3339(),
        }
    }
}

/// Get one transaction by id.
#[utoipa::path(
    get,
    path = "/v1/transactions/{transaction_id}",
    tag = "Transactions",
    params(
        ("transaction_id" = String, Path, description = "Transaction id")
    ),
    responses(
        (status = 200, description = "Transaction detail", body = TransactionView),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionView>, ApiError> {
    let tx = state
        .transactions
        .find_by_id(&transaction_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction not found"))?;

    Ok(Json(TransactionView::from_transaction(&tx, &state.network)))
}

/// List a user's transactions, newest first.
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/transactions",
    tag = "Transactions",
    params(
        ("user_id" = String, Path, description = "Platform user id"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Transaction history", body = TransactionListResponse)
    )
)]
pub async fn list_user_transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let limit = query.limit.unwrap_or(50);
    let transactions = state.transactions.find_by_user(&user_id, limit).await?;

    let views: Vec<TransactionView> = transactions
        .iter()
        .map(|tx| TransactionView::from_transaction(tx, &state.network))
        .collect();

    Ok(Json(TransactionListResponse {
        total: views.len(),
        transactions: views,
    }))
}
