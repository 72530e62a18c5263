// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod health;
pub mod rates;
pub mod remittances;
pub mod transactions;
pub mod wallets;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/remittances", post(remittances::send_remittance))
        .route(
            "/transactions/{transaction_id}",
            get(transactions::get_transaction),
        )
        .route(
            "/users/{user_id}/transactions",
            get(transactions::list_user_transactions),
        )
        .route("/users/{user_id}/wallet", get(wallets::get_wallet))
        .route("/wallets", post(wallets::register_wallet))
        .route("/rates/quote", get(rates::quote_rate))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        remittances::send_remittance,
        transactions::get_transaction,
        transactions::list_user_transactions,
        wallets::register_wallet,
        wallets::get_wallet,
        rates::quote_rate,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            remittances::SendRemittanceRequest,
            remittances::SendRemittanceResponse,
            transactions::TransactionView,
            transactions::TransactionListResponse,
            wallets::RegisterWalletRequest,
            wallets::WalletView,
            crate::rates::RateQuote,
            health::ReadyResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Remittances", description = "USDC remittance sends"),
        (name = "Transactions", description = "Transaction history and lookup"),
        (name = "Wallets", description = "Wallet registration and balances"),
        (name = "Rates", description = "Exchange-rate quotes"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
