// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway services.
//!
//! Each service owns one contract of the gateway and talks to the ledger store
//! and/or the node. Only provisioning and submission span both backends.
//!
//! - `wallets` - idempotent wallet provisioning
//! - `balance` - live balance lookup by wallet id
//! - `ledger` - transaction submission and statements
//! - `network` - mempool snapshot and readiness

pub mod balance;
pub mod ledger;
pub mod network;
pub mod wallets;

use std::sync::Arc;
use std::time::Duration;

use crate::storage::{LedgerStore, StoreError, StoreResult};

pub use balance::BalanceService;
pub use ledger::TransactionLedger;
pub use network::{NetworkInfo, Readiness};
pub use wallets::WalletProvisioning;

/// Async access to a blocking [`LedgerStore`].
///
/// Every call runs on the blocking pool. Reads are bounded by `timeout` and
/// abandoned past it. Writes are never abandoned: once a write has started its
/// outcome is awaited, so an error always means nothing was persisted.
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<dyn LedgerStore>,
    timeout: Duration,
}

impl StoreHandle {
    pub fn new(store: Arc<dyn LedgerStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Run a read-only `op` against the store off the async runtime.
    ///
    /// A read that overruns the deadline keeps running in the background; its
    /// result is dropped.
    pub async fn run<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&dyn LedgerStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let task = tokio::task::spawn_blocking(move || op(store.as_ref()));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => flatten(joined),
            Err(_) => Err(StoreError::Timeout),
        }
    }

    /// Run a mutating `op` and wait for its real outcome.
    ///
    /// Overrunning the deadline is logged, then the write is awaited to
    /// completion.
    pub async fn write<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&dyn LedgerStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let mut task = tokio::task::spawn_blocking(move || op(store.as_ref()));

        match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(joined) => flatten(joined),
            Err(_) => {
                tracing::warn!(
                    deadline = ?self.timeout,
                    "Store write overran its deadline; waiting for the outcome"
                );
                flatten(task.await)
            }
        }
    }
}

fn flatten<T>(joined: Result<StoreResult<T>, tokio::task::JoinError>) -> StoreResult<T> {
    joined.unwrap_or_else(|join| Err(StoreError::TaskFailed(join.to_string())))
}
