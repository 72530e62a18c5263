// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Base (EVM) integration.
//!
//! This module provides:
//! - Read-only queries: native ETH and USDC balances, block number
//! - USDC transfer submission with receipt confirmation and an explicit
//!   timeout

pub mod client;
pub mod erc20;
pub mod transfer;
pub mod types;

pub use client::{BaseClient, ChainError};
pub use transfer::UsdcTransfer;
pub use types::*;
