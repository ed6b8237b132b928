// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded ledger database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `wallets`: wallet_id → serialized WalletRecord
//! - `transactions`: ledger id → serialized StoredTransaction
//! - `wallet_tx_index`: composite key (wallet_id|timestamp|ledger id) → role
//! - `submission_journal`: ledger id → serialized SubmissionIntent
//!
//! redb admits one write transaction at a time, so a check and an insert made
//! inside the same write transaction cannot interleave with another writer.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::records::{StoredTransaction, SubmissionIntent, WalletRecord};
use super::{LedgerStore, StoreError, StoreResult};

// =============================================================================
// Table Definitions
// =============================================================================

/// wallet_id → serialized WalletRecord (JSON bytes).
const WALLETS: TableDefinition<&str, &[u8]> = TableDefinition::new("wallets");

/// Ledger id → serialized StoredTransaction (JSON bytes).
const TRANSACTIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("transactions");

/// Index: composite key → role ("sent" | "received" | "self").
/// Key format: `len(wallet_id) | wallet_id | sortable_timestamp_be | ledger_id`.
const WALLET_TX_INDEX: TableDefinition<&[u8], &str> = TableDefinition::new("wallet_tx_index");

/// Ledger id → serialized SubmissionIntent, present while a broadcast is in flight.
const SUBMISSION_JOURNAL: TableDefinition<&str, &[u8]> =
    TableDefinition::new("submission_journal");

/// Scratch table touched by the health check; writes to it are always aborted.
const HEALTH: TableDefinition<&str, u64> = TableDefinition::new("health");

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Length-prefixed wallet id, so that no wallet id is a key prefix of another.
fn make_prefix(wallet_id: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(4 + wallet_id.len());
    prefix.extend_from_slice(&(wallet_id.len() as u32).to_be_bytes());
    prefix.extend_from_slice(wallet_id.as_bytes());
    prefix
}

/// Map a timestamp to a u64 whose big-endian bytes sort chronologically.
fn sortable_nanos(ts: DateTime<Utc>) -> u64 {
    let nanos = ts.timestamp_nanos_opt().unwrap_or(i64::MAX);
    (nanos as u64) ^ (1 << 63)
}

/// Build a composite key for the wallet_tx_index table (oldest first).
fn make_index_key(wallet_id: &str, created_at: DateTime<Utc>, ledger_id: &str) -> Vec<u8> {
    let mut key = make_prefix(wallet_id);
    key.extend_from_slice(&sortable_nanos(created_at).to_be_bytes());
    key.extend_from_slice(ledger_id.as_bytes());
    key
}

// =============================================================================
// LedgerDatabase
// =============================================================================

/// redb-backed [`LedgerStore`].
pub struct LedgerDatabase {
    db: Database,
}

impl LedgerDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WALLETS)?;
            let _ = write_txn.open_table(TRANSACTIONS)?;
            let _ = write_txn.open_table(WALLET_TX_INDEX)?;
            let _ = write_txn.open_table(SUBMISSION_JOURNAL)?;
            let _ = write_txn.open_table(HEALTH)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl LedgerStore for LedgerDatabase {
    fn get_wallet(&self, wallet_id: &str) -> StoreResult<Option<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        match table.get(wallet_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn insert_wallet(&self, wallet: &WalletRecord) -> StoreResult<()> {
        let json = serde_json::to_vec(wallet)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(WALLETS)?;
            let exists = table.get(wallet.wallet_id.as_str())?.is_some();
            if exists {
                return Err(StoreError::AlreadyExists(wallet.wallet_id.clone()));
            }
            table.insert(wallet.wallet_id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn reserve_submission(&self, intent: &SubmissionIntent) -> StoreResult<()> {
        let json = serde_json::to_vec(intent)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut journal = write_txn.open_table(SUBMISSION_JOURNAL)?;
            let exists = journal.get(intent.id.as_str())?.is_some();
            if exists {
                return Err(StoreError::AlreadyExists(intent.id.clone()));
            }
            journal.insert(intent.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn discard_submission(&self, id: &str) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut journal = write_txn.open_table(SUBMISSION_JOURNAL)?;
            journal.remove(id)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn commit_transaction(&self, tx: &StoredTransaction) -> StoreResult<()> {
        let json = serde_json::to_vec(tx)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut tx_table = write_txn.open_table(TRANSACTIONS)?;
            let exists = tx_table.get(tx.id.as_str())?.is_some();
            if exists {
                return Err(StoreError::AlreadyExists(tx.id.clone()));
            }
            tx_table.insert(tx.id.as_str(), json.as_slice())?;

            let mut idx_table = write_txn.open_table(WALLET_TX_INDEX)?;
            if tx.from == tx.to {
                let key = make_index_key(&tx.from, tx.created_at, &tx.id);
                idx_table.insert(key.as_slice(), "self")?;
            } else {
                let sent = make_index_key(&tx.from, tx.created_at, &tx.id);
                idx_table.insert(sent.as_slice(), "sent")?;
                let received = make_index_key(&tx.to, tx.created_at, &tx.id);
                idx_table.insert(received.as_slice(), "received")?;
            }

            let mut journal = write_txn.open_table(SUBMISSION_JOURNAL)?;
            journal.remove(tx.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn statement(&self, wallet_id: &str) -> StoreResult<Vec<StoredTransaction>> {
        let read_txn = self.db.begin_read()?;
        let idx_table = read_txn.open_table(WALLET_TX_INDEX)?;
        let tx_table = read_txn.open_table(TRANSACTIONS)?;

        let prefix = make_prefix(wallet_id);
        let id_offset = prefix.len() + 8;
        let mut results = Vec::new();

        for entry in idx_table.range(prefix.as_slice()..)? {
            let (key, _role) = entry?;
            let key = key.value();
            if !key.starts_with(&prefix) {
                break;
            }

            let ledger_id = std::str::from_utf8(&key[id_offset..])
                .map_err(|e| StoreError::Corrupted(format!("index key: {e}")))?;
            let value = tx_table.get(ledger_id)?.ok_or_else(|| {
                StoreError::Corrupted(format!("index points at missing transaction {ledger_id}"))
            })?;
            results.push(serde_json::from_slice(value.value())?);
        }

        Ok(results)
    }

    fn pending_submissions(&self) -> StoreResult<Vec<SubmissionIntent>> {
        let read_txn = self.db.begin_read()?;
        let journal = read_txn.open_table(SUBMISSION_JOURNAL)?;

        let mut intents = Vec::new();
        for entry in journal.iter()? {
            let (_id, value) = entry?;
            intents.push(serde_json::from_slice(value.value())?);
        }
        Ok(intents)
    }

    fn health_check(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        let read_back = {
            let mut table = write_txn.open_table(HEALTH)?;
            table.insert("probe", 1u64)?;
            let value = table.get("probe")?.map(|v| v.value());
            value
        };
        write_txn.abort()?;

        if read_back != Some(1u64) {
            return Err(StoreError::Corrupted(
                "health check data mismatch".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
