// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persisted record types.
//!
//! Records are JSON-encoded inside redb values. Quantities are stored as
//! decimal strings so no width is lost on the way through serde.

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blockchain::Transfer;
use crate::models::decimal_u256;

/// Mapping from a client-chosen wallet id to its node-managed account.
///
/// Written once at provisioning and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Client-chosen identifier (unique)
    pub wallet_id: String,
    /// Address returned by the node at account creation
    pub chain_address: String,
    /// When the wallet was provisioned
    pub created_at: DateTime<Utc>,
}

impl WalletRecord {
    pub fn new(wallet_id: impl Into<String>, chain_address: impl Into<String>) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            chain_address: chain_address.into(),
            created_at: Utc::now(),
        }
    }
}

/// Ledger entry for a broadcast transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTransaction {
    /// Generated ledger id (UUIDv4)
    pub id: String,
    /// Sender wallet id
    pub from: String,
    /// Recipient wallet id or raw chain address
    pub to: String,
    /// Amount in the chain's smallest unit
    #[serde(with = "decimal_u256")]
    pub value: U256,
    /// Hash returned by the node when the transfer was broadcast
    pub tx_hash: String,
    /// When the submission was accepted
    pub created_at: DateTime<Utc>,
}

/// Journal entry written before a broadcast and removed when its outcome is
/// known. A surviving entry means the ledger may disagree with the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionIntent {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Resolved sender account
    pub from_address: String,
    /// Resolved recipient account
    pub to_address: String,
    #[serde(with = "decimal_u256")]
    pub value: U256,
    pub created_at: DateTime<Utc>,
}

impl SubmissionIntent {
    /// New intent with a fresh id and the current time.
    pub fn new(
        from: String,
        to: String,
        from_address: String,
        to_address: String,
        value: U256,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            to,
            from_address,
            to_address,
            value,
            created_at: Utc::now(),
        }
    }

    /// The on-chain transfer this intent describes.
    pub fn transfer(&self) -> Transfer {
        Transfer {
            from: self.from_address.clone(),
            to: self.to_address.clone(),
            value: self.value,
        }
    }

    /// Ledger record once the node has accepted the broadcast.
    pub fn into_transaction(self, tx_hash: String) -> StoredTransaction {
        StoredTransaction {
            id: self.id,
            from: self.from,
            to: self.to,
            value: self.value,
            tx_hash,
            created_at: self.created_at,
        }
    }
}
