// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Wallet registration and balance endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    domain::{Balance, Network, Wallet},
    error::ApiError,
    state::AppState,
};

/// Request to register an externally provisioned wallet.
///
/// Key generation happens in the wallet-provisioning collaborator; this
/// endpoint only persists the result. The signing key must already be
/// sealed (`salt:nonce:tag:ciphertext` hex).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterWalletRequest {
    pub user_id: String,
    /// Public address (0x + 40 hex chars).
    pub address: String,
    /// Sealed signing key; omit for externally-custodied wallets.
    #[serde(default)]
    pub encrypted_signing_key: Option<String>,
    /// `base` or `base-sepolia`; defaults to the service network.
    #[serde(default)]
    pub network: Option<String>,
}

/// API view of a wallet. Never includes key material.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WalletView {
    pub wallet_id: String,
    pub user_id: String,
    pub address: String,
    /// `0x1234...abcd` display form.
    pub truncated_address: String,
    pub balance_eth: f64,
    pub balance_usdc: f64,
    pub is_active: bool,
    pub network: String,
    pub created_at: String,
}

impl From<Wallet> for WalletView {
    fn from(wallet: Wallet) -> Self {
        Self {
            wallet_id: wallet.id.clone(),
            truncated_address: wallet.truncated_address(),
            user_id: wallet.user_id,
            address: wallet.address,
            balance_eth: wallet.balance.eth,
            balance_usdc: wallet.balance.usdc,
            is_active: wallet.is_active,
            network: wallet.network.to_string(),
            created_at: wallet.created_at.to_rfc3339(),
        }
    }
}

/// Query parameters for the wallet endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct WalletQuery {
    /// Re-query the chain and persist fresh balances before responding.
    #[param(default = false)]
    pub refresh: Option<bool>,
}

/// Register a wallet for a user.
///
/// A user can have at most one active wallet.
#[utoipa::path(
    post,
    path = "/v1/wallets",
    tag = "Wallets",
    request_body = RegisterWalletRequest,
    responses(
        (status = 200, description = "Wallet registered", body = WalletView),
        (status = 400, description = "Invalid address or network"),
        (status = 409, description = "User already has an active wallet")
    )
)]
pub async fn register_wallet(
    State(state): State<AppState>,
    Json(request): Json<RegisterWalletRequest>,
) -> Result<Json<WalletView>, ApiError> {
    let network = match &request.network {
        Some(raw) => raw
            .parse::<Network>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => state.network.network(),
    };

    if state.wallets.find_by_user(&request.user_id).await?.is_some() {
        return Err(ApiError::conflict("User already has an active wallet"));
    }

    let wallet = Wallet::new(
        request.user_id,
        request.address,
        request.encrypted_signing_key,
        network,
    )
    .map_err(|e| ApiError::bad_request(e.to_string()))?;

    state.wallets.save(&wallet).await?;

    tracing::info!(wallet_id = %wallet.id, user_id = %wallet.user_id, "wallet registered");

    Ok(Json(wallet.into()))
}

/// Get a user's wallet and balance snapshot.
///
/// With `refresh=true` the chain is queried for authoritative balances and
/// the snapshot is persisted before responding: the balance-sync step.
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/wallet",
    tag = "Wallets",
    params(
        ("user_id" = String, Path, description = "Platform user id"),
        WalletQuery
    ),
    responses(
        (status = 200, description = "Wallet detail", body = WalletView),
        (status = 404, description = "Wallet not found"),
        (status = 502, description = "Chain query failed")
    )
)]
pub async fn get_wallet(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<WalletQuery>,
) -> Result<Json<WalletView>, ApiError> {
    let wallet = state
        .wallets
        .find_by_user(&user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Wallet not found"))?;

    if !query.refresh.unwrap_or(false) {
        return Ok(Json(wallet.into()));
    }

    let eth = state
        .chain
        .native_balance(&wallet.address)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;
    let usdc = state
        .chain
        .usdc_balance(&wallet.address)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    let balance = Balance::new(eth, usdc).map_err(|e| ApiError::internal(e.to_string()))?;
    state.wallets.update_balance(&wallet.id, balance).await?;

    Ok(Json(wallet.with_balance(balance).into()))
}
