// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Exchange rates: provider contract, HTTP client with an in-process TTL
//! cache, and the fee-inclusive quote computation.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Currency;

/// Fee applied to quotes, matching the product's published pricing.
pub const QUOTE_FEE_RATE: f64 = 0.005; // 0.5%

/// Static USD→PEN rate used when the provider is unreachable.
pub const FALLBACK_USD_PEN: f64 = 3.72;

/// Errors from exchange-rate lookups.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RateError {
    #[error("Exchange rate API error: {0}")]
    Api(String),

    #[error("Rate not found for {from} -> {to}")]
    NotFound { from: Currency, to: Currency },
}

/// Supplies live conversion rates between currencies.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn rate(&self, from: Currency, to: Currency) -> Result<f64, RateError>;
}

struct CachedRate {
    rate: f64,
    inserted_at: Instant,
}

/// In-process LRU cache for rate lookups.
pub struct RateCache {
    cache: Mutex<LruCache<String, CachedRate>>,
    ttl: Duration,
}

impl RateCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            )),
            ttl,
        }
    }

    fn key(from: Currency, to: Currency) -> String {
        format!("{from}:{to}")
    }

    pub fn get(&self, from: Currency, to: Currency) -> Option<f64> {
        let key = Self::key(from, to);
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.rate);
            }
            cache.pop(&key);
        }
        None
    }

    pub fn put(&self, from: Currency, to: Currency, rate: f64) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                Self::key(from, to),
                CachedRate {
                    rate,
                    inserted_at: Instant::now(),
                },
            );
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: std::collections::HashMap<String, f64>,
}

/// HTTP exchange-rate client with caching and a USD→PEN fallback.
pub struct HttpRateProvider {
    http: reqwest::Client,
    api_url: String,
    cache: RateCache,
}

impl HttpRateProvider {
    /// Default cache: 32 pairs, 5 minute TTL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            cache: RateCache::new(32, Duration::from_secs(300)),
        }
    }

    async fn fetch(&self, from: Currency, to: Currency) -> Result<f64, RateError> {
        let url = format!("{}/latest/{}", self.api_url, from);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RateError::Api(format!("status {}", response.status())));
        }

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| RateError::Api(e.to_string()))?;

        body.rates
            .get(&to.to_string())
            .copied()
            .ok_or(RateError::NotFound { from, to })
    }
}

#[async_trait]
impl ExchangeRateProvider for HttpRateProvider {
    async fn rate(&self, from: Currency, to: Currency) -> Result<f64, RateError> {
        if let Some(cached) = self.cache.get(from, to) {
            return Ok(cached);
        }

        match self.fetch(from, to).await {
            Ok(rate) => {
                self.cache.put(from, to, rate);
                Ok(rate)
            }
            Err(e) => {
                // Static fallback keeps the main corridor quotable during
                // provider outages.
                if from == Currency::Usd && to == Currency::Pen {
                    tracing::warn!(error = %e, "rate provider unavailable, using USD/PEN fallback");
                    return Ok(FALLBACK_USD_PEN);
                }
                Err(e)
            }
        }
    }
}

/// A fee-inclusive conversion quote.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RateQuote {
    pub from_amount: f64,
    pub from_currency: Currency,
    pub to_amount: f64,
    pub to_currency: Currency,
    pub rate: f64,
    pub fee: f64,
    pub total_cost: f64,
}

/// Compute a quote: the fee comes off the source amount before conversion,
/// and the converted amount is rounded to 2 decimal places for display.
pub fn quote(amount_usd: f64, to: Currency, rate: f64) -> RateQuote {
    let fee = amount_usd * QUOTE_FEE_RATE;
    let net = amount_usd - fee;
    let to_amount = (net * rate * 100.0).round() / 100.0;

    RateQuote {
        from_amount: amount_usd,
        from_currency: Currency::Usd,
        to_amount,
        to_currency: to,
        rate,
        fee,
        total_cost: amount_usd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_applies_fee_before_conversion() {
        let q = quote(100.0, Currency::Pen, 3.72);
        assert_eq!(q.fee, 0.5);
        assert_eq!(q.to_amount, 370.14); // (100 - 0.5) * 3.72
        assert_eq!(q.total_cost, 100.0);
        assert_eq!(q.from_currency, Currency::Usd);
        assert_eq!(q.to_currency, Currency::Pen);
    }

    #[test]
    fn quote_rounds_to_two_decimals() {
        let q = quote(33.33, Currency::Pen, 3.777);
        let cents = q.to_amount * 100.0;
        assert!((cents - cents.round()).abs() < 1e-9);
    }

    #[test]
    fn cache_hit_and_expiry() {
        let cache = RateCache::new(4, Duration::from_millis(20));
        assert!(cache.get(Currency::Usd, Currency::Pen).is_none());

        cache.put(Currency::Usd, Currency::Pen, 3.7);
        assert_eq!(cache.get(Currency::Usd, Currency::Pen), Some(3.7));

        std::thread::sleep(Duration::from_millis(30));
        assert!(cache.get(Currency::Usd, Currency::Pen).is_none());
    }

    #[test]
    fn cache_keys_are_directional() {
        let cache = RateCache::new(4, Duration::from_secs(60));
        cache.put(Currency::Usd, Currency::Pen, 3.7);
        assert!(cache.get(Currency::Pen, Currency::Usd).is_none());
    }

    #[tokio::test]
    async fn unreachable_provider_falls_back_for_usd_pen() {
        let provider = HttpRateProvider::new("http://127.0.0.1:1");
        let rate = provider.rate(Currency::Usd, Currency::Pen).await.unwrap();
        assert_eq!(rate, FALLBACK_USD_PEN);
    }

    #[tokio::test]
    async fn unreachable_provider_errors_for_other_pairs() {
        let provider = HttpRateProvider::new("http://127.0.0.1:1");
        assert!(provider.rate(Currency::Usd, Currency::Eth).await.is_err());
    }
}
