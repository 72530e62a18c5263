// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

//! Domain entities and value objects for the remittance pipeline.
//!
//! Everything in this module is a pure value: entities are immutable and
//! every state change returns a new instance, so a store always persists a
//! coherent snapshot.

pub mod money;
pub mod transaction;
pub mod wallet;

pub use money::{Currency, Money, MoneyError};
pub use transaction::{NewTransaction, Transaction, TransitionError, TxStatus, TxType};
pub use wallet::{Asset, Balance, Network, Wallet, WalletError};
