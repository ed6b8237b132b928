// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the HTTP surface. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and the OpenAPI
//! document.
//!
//! ## Quantities
//!
//! Balances and transfer values are 256-bit integers. They are written to
//! JSON as decimal strings (see [`decimal_u256`]) because JSON numbers lose
//! precision past 2^53 in most clients.

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::blockchain::quantity::parse_decimal_u256;
use crate::storage::{StoredTransaction, WalletRecord};

// =============================================================================
// Quantity encoding
// =============================================================================

/// Serde adapter writing a `U256` as a decimal string.
pub mod decimal_u256 {
    use alloy::primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::blockchain::quantity::parse_decimal_u256;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_decimal_u256(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid decimal quantity {raw:?}")))
    }
}

/// Transfer value as sent by clients: a JSON integer, or a decimal string for
/// values that do not fit a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Amount {
    /// The amount as an unsigned integer, or `None` for negatives, fractions
    /// and malformed strings.
    pub fn to_u256(&self) -> Option<U256> {
        match self {
            Amount::Number(n) => n.as_u64().map(U256::from),
            Amount::Text(s) => parse_decimal_u256(s.trim()),
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::Number(value.into())
    }
}

// =============================================================================
// Wallet Models
// =============================================================================

/// Response after provisioning a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WalletCreated {
    /// Client-chosen wallet id.
    pub id: String,
    /// Node-managed account backing the wallet.
    pub address: String,
    /// When the wallet was provisioned.
    pub created_at: DateTime<Utc>,
}

impl From<WalletRecord> for WalletCreated {
    fn from(record: WalletRecord) -> Self {
        Self {
            id: record.wallet_id,
            address: record.chain_address,
            created_at: record.created_at,
        }
    }
}

/// Live on-chain balance of a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BalanceResponse {
    /// Balance in the chain's smallest unit, as a decimal string.
    #[serde(with = "decimal_u256")]
    #[schema(value_type = String, example = "1000000000000000000")]
    pub balance: U256,
}

// =============================================================================
// Transaction Models
// =============================================================================

/// Request to submit a transfer.
///
/// Every field is optional at the JSON level so that missing data surfaces as
/// a validation error rather than a decoding error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmitTransactionRequest {
    /// Sender wallet id.
    pub from: Option<String>,
    /// Recipient wallet id or chain address.
    pub to: Option<String>,
    /// Positive amount in the chain's smallest unit.
    #[schema(value_type = Option<String>, example = "10")]
    pub value: Option<Amount>,
}

/// A ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TransactionResponse {
    /// Generated ledger id.
    pub id: String,
    /// Sender wallet id.
    pub from: String,
    /// Recipient wallet id or chain address.
    pub to: String,
    /// Amount as a decimal string.
    #[serde(with = "decimal_u256")]
    #[schema(value_type = String, example = "10")]
    pub value: U256,
    /// When the submission was accepted.
    pub date: DateTime<Utc>,
    /// Chain transaction hash.
    pub hash: String,
}

impl From<StoredTransaction> for TransactionResponse {
    fn from(tx: StoredTransaction) -> Self {
        Self {
            id: tx.id,
            from: tx.from,
            to: tx.to,
            value: tx.value,
            date: tx.created_at,
            hash: tx.tx_hash,
        }
    }
}

/// Query parameters for a wallet statement.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatementQuery {
    /// Wallet whose sent and received transactions are listed.
    #[serde(rename = "walletId")]
    pub wallet_id: Option<String>,
}

// =============================================================================
// Network Models
// =============================================================================

/// Snapshot of the node's mempool.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    /// Executable transactions waiting in the node's pool.
    pub pending_transactions: u64,
}
