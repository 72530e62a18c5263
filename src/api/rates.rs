// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Exchange-rate quote endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    domain::Currency,
    error::ApiError,
    rates::{quote, RateQuote},
    state::AppState,
};

/// Query parameters for a conversion quote.
#[derive(Debug, Deserialize, IntoParams)]
pub struct QuoteQuery {
    /// Source amount in USD.
    pub amount_usd: f64,
    /// Target currency ticker (default: PEN).
    pub to: Option<String>,
}

fn parse_currency(raw: &str) -> Result<Currency, ApiError> {
    match raw.to_ascii_uppercase().as_str() {
        "USDC" => Ok(Currency::Usdc),
        "USD" => Ok(Currency::Usd),
        "PEN" => Ok(Currency::Pen),
        "ETH" => Ok(Currency::Eth),
        other => Err(ApiError::bad_request(format!(
            "Unsupported currency: {other}"
        ))),
    }
}

/// Quote a USD conversion with the platform fee applied.
#[utoipa::path(
    get,
    path = "/v1/rates/quote",
    tag = "Rates",
    params(QuoteQuery),
    responses(
        (status = 200, description = "Conversion quote", body = RateQuote),
        (status = 400, description = "Invalid amount or currency"),
        (status = 502, description = "Rate provider unavailable")
    )
)]
pub async fn quote_rate(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<RateQuote>, ApiError> {
    if !query.amount_usd.is_finite() || query.amount_usd <= 0.0 {
        return Err(ApiError::bad_request("amount_usd must be positive"));
    }

    let to = parse_currency(query.to.as_deref().unwrap_or("PEN"))?;
    let rate = state
        .rates
        .rate(Currency::Usd, to)
        .await
        .map_err(|e| ApiError::bad_gateway(e.to_string()))?;

    Ok(Json(quote(query.amount_usd, to, rate)))
}
