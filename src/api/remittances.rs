// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Remittance send endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::Money,
    error::ApiError,
    remit::SendRequest,
    state::AppState,
};

/// Request to send a remittance. The caller is authenticated by the
/// upstream identity layer, which supplies `from_user_id`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SendRemittanceRequest {
    /// Sending platform user.
    pub from_user_id: String,
    /// Receiving platform user, when the recipient has an account.
    #[serde(default)]
    pub to_user_id: Option<String>,
    /// Destination address (0x + 40 hex chars).
    pub to_address: String,
    /// Amount in USDC.
    pub amount: f64,
    /// USD→PEN rate to record on the transaction.
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    /// Free-text note.
    #[serde(default)]
    pub description: Option<String>,
}

/// Successful remittance response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SendRemittanceResponse {
    /// Persisted transaction id.
    pub transaction_id: String,
    /// On-chain transaction hash.
    pub tx_hash: String,
    /// Terminal status (`completed`).
    pub status: String,
    /// Block explorer URL for the transfer.
    pub explorer_url: String,
}

/// Send a USDC remittance.
///
/// Runs the full pipeline: funds check, intent recording, on-chain
/// transfer, reconciliation, balance refresh, notification.
#[utoipa::path(
    post,
    path = "/v1/remittances",
    tag = "Remittances",
    request_body = SendRemittanceRequest,
    responses(
        (status = 200, description = "Remittance completed", body = SendRemittanceResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Wallet not found"),
        (status = 422, description = "Insufficient funds"),
        (status = 502, description = "Chain transfer failed or timed out")
    )
)]
pub async fn send_remittance(
    State(state): State<AppState>,
    Json(request): Json<SendRemittanceRequest>,
) -> Result<Json<SendRemittanceResponse>, ApiError> {
    let amount = Money::from_usdc(request.amount)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let outcome = state
        .remit
        .execute(SendRequest {
            from_user_id: request.from_user_id,
            to_user_id: request.to_user_id,
            to_address: request.to_address,
            amount,
            exchange_rate: request.exchange_rate,
            description: request.description,
        })
        .await?;

    let explorer_url = state.network.tx_explorer_url(&outcome.tx_hash);

    Ok(Json(SendRemittanceResponse {
        transaction_id: outcome.transaction_id,
        tx_hash: outcome.tx_hash,
        status: "completed".to_string(),
        explorer_url,
    }))
}
