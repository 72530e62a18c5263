// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Altoke Server - Custodial USDC Remittance Service
//!
//! This crate provides the backend for a consumer remittance product:
//! custodial wallets on Base, peer-to-peer USDC transfers with an auditable
//! transaction state machine, and balance reconciliation against the chain.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `domain` - Money, Wallet and Transaction entities
//! - `remit` - the send pipeline orchestrator
//! - `chain` - Base (EVM) integration
//! - `storage` - repository contracts and stores
//! - `custody` - signing-key encryption at rest
//! - `rates` - exchange-rate provider and quoting
//! - `notify` - transaction notifications

pub mod api;
pub mod chain;
pub mod config;
pub mod custody;
pub mod domain;
pub mod error;
pub mod notify;
pub mod rates;
pub mod remit;
pub mod state;
pub mod storage;
