// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Gateway - Custodial Wallet Service for Ethereum-compatible nodes
//!
//! Clients create wallets, read balances, submit transfers and read
//! statements over HTTP. Keys stay in the node; the gateway keeps the
//! wallet id → address mapping and the transaction ledger.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - JSON-RPC node integration
//! - `custody` - Passphrases for node-managed accounts
//! - `services` - Provisioning, balance, ledger and network services
//! - `storage` - Ledger store (redb)

pub mod api;
pub mod blockchain;
pub mod config;
pub mod custody;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
