// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Storage
//!
//! System of record for identity mapping (wallet id → chain address) and
//! ledger history. Chain truth (balances, mempool) is never stored here.
//!
//! ## Guarantees
//!
//! - A wallet id is inserted at most once; the store rejects the second insert
//! - A transaction record and its index entries are written together
//! - Journal entries for in-flight submissions never show up in statements

pub mod ledger_db;
pub mod records;

pub use ledger_db::LedgerDatabase;
pub use records::{StoredTransaction, SubmissionIntent, WalletRecord};

/// Typed access to the ledger store.
///
/// Calls are blocking; async callers run them on the blocking pool.
pub trait LedgerStore: Send + Sync {
    /// Look up a wallet by id.
    fn get_wallet(&self, wallet_id: &str) -> StoreResult<Option<WalletRecord>>;

    /// Insert a wallet.
    ///
    /// # Returns
    /// - `Ok(())` if successful
    /// - `Err(StoreError::AlreadyExists)` if the id is taken
    fn insert_wallet(&self, wallet: &WalletRecord) -> StoreResult<()>;

    /// Record that a broadcast is about to happen.
    fn reserve_submission(&self, intent: &SubmissionIntent) -> StoreResult<()>;

    /// Drop a journal entry whose broadcast failed.
    fn discard_submission(&self, id: &str) -> StoreResult<()>;

    /// Append a broadcast transaction and clear its journal entry, atomically.
    fn commit_transaction(&self, tx: &StoredTransaction) -> StoreResult<()>;

    /// Transactions where `wallet_id` is sender or recipient, oldest first.
    fn statement(&self, wallet_id: &str) -> StoreResult<Vec<StoredTransaction>>;

    /// Journal entries whose outcome was never recorded.
    fn pending_submissions(&self) -> StoreResult<Vec<SubmissionIntent>>;

    /// Verify the store accepts writes.
    fn health_check(&self) -> StoreResult<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("corrupted ledger data: {0}")]
    Corrupted(String),

    #[error("store call timed out")]
    Timeout,

    #[error("store task failed: {0}")]
    TaskFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
