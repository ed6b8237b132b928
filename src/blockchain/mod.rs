// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ethereum-compatible node integration.
//!
//! This module provides functionality for:
//! - Creating node-managed accounts
//! - Querying native balances
//! - Broadcasting value transfers
//! - Reading mempool and chain-head status

pub mod client;
pub mod quantity;
pub mod types;

pub use client::{ChainRpc, JsonRpcClient, RpcError};
pub use types::{Transfer, TxPoolStatus};
