// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process doubles for the node and the ledger store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use alloy::primitives::U256;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::blockchain::{ChainRpc, RpcError, Transfer, TxPoolStatus};
use crate::storage::{
    LedgerDatabase, LedgerStore, StoreError, StoreResult, StoredTransaction, SubmissionIntent,
    WalletRecord,
};

// =============================================================================
// Node
// =============================================================================

#[derive(Default)]
struct ChainState {
    accounts: u64,
    balances: HashMap<String, U256>,
    passphrases: Vec<String>,
    sent: Vec<Transfer>,
    pending: Option<Value>,
    fail_new_account: bool,
    fail_balance: bool,
    fail_send: bool,
    lose_send_replies: bool,
    fail_block_number: bool,
}

/// Scriptable stand-in for an Ethereum node with `personal_*` enabled.
pub struct FakeChain {
    state: Mutex<ChainState>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ChainState {
                pending: Some(json!("0x0")),
                ..ChainState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }

    pub fn set_balance(&self, address: &str, balance: U256) {
        self.state().balances.insert(address.to_string(), balance);
    }

    pub fn set_pending(&self, pending: Option<Value>) {
        self.state().pending = pending;
    }

    pub fn fail_new_account(&self) {
        self.state().fail_new_account = true;
    }

    pub fn fail_balance(&self) {
        self.state().fail_balance = true;
    }

    pub fn fail_send(&self) {
        self.state().fail_send = true;
    }

    /// Accept transfers but answer as if the connection dropped.
    pub fn lose_send_replies(&self) {
        self.state().lose_send_replies = true;
    }

    pub fn fail_block_number(&self) {
        self.state().fail_block_number = true;
    }

    pub fn new_account_calls(&self) -> u64 {
        self.state().accounts
    }

    /// Passphrases seen by account creation and signing, in call order.
    pub fn passphrases(&self) -> Vec<String> {
        self.state().passphrases.clone()
    }

    /// Transfers accepted for broadcast.
    pub fn sent(&self) -> Vec<Transfer> {
        self.state().sent.clone()
    }
}

fn unreachable_node() -> RpcError {
    RpcError::Transport("connection refused".to_string())
}

#[async_trait]
impl ChainRpc for FakeChain {
    async fn new_account(&self, passphrase: &str) -> Result<String, RpcError> {
        let mut state = self.state();
        if state.fail_new_account {
            return Err(unreachable_node());
        }
        state.accounts += 1;
        state.passphrases.push(passphrase.to_string());
        Ok(format!("0x{:040x}", state.accounts))
    }

    async fn balance(&self, address: &str) -> Result<U256, RpcError> {
        let state = self.state();
        if state.fail_balance {
            return Err(unreachable_node());
        }
        Ok(state.balances.get(address).copied().unwrap_or(U256::ZERO))
    }

    async fn txpool_status(&self) -> Result<TxPoolStatus, RpcError> {
        Ok(TxPoolStatus {
            pending: self.state().pending.clone(),
            queued: Some(json!("0x0")),
        })
    }

    async fn send_transaction(&self, transfer: &Transfer, passphrase: &str) -> Result<String, RpcError> {
        let mut state = self.state();
        if state.fail_send {
            return Err(RpcError::Node {
                code: -32000,
                message: "could not decrypt key with given password".to_string(),
            });
        }
        state.passphrases.push(passphrase.to_string());
        state.sent.push(transfer.clone());
        if state.lose_send_replies {
            return Err(RpcError::Transport(
                "personal_sendTransaction: operation timed out".to_string(),
            ));
        }
        Ok(format!("0x{:064x}", state.sent.len()))
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        if self.state().fail_block_number {
            return Err(unreachable_node());
        }
        Ok(1)
    }
}

// =============================================================================
// Store
// =============================================================================

/// A real [`LedgerDatabase`] with switchable write failures and latency.
pub struct FlakyStore {
    inner: LedgerDatabase,
    fail_wallet_inserts: AtomicBool,
    fail_reservations: AtomicBool,
    fail_commits: AtomicBool,
    write_delay_ms: AtomicU64,
}

impl FlakyStore {
    /// Stall every write for `delay` before it reaches the database.
    pub fn delay_writes(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn stall(&self) {
        let ms = self.write_delay_ms.load(Ordering::SeqCst);
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(ms));
        }
    }

    pub fn fail_wallet_inserts(&self) {
        self.fail_wallet_inserts.store(true, Ordering::SeqCst);
    }

    pub fn fail_reservations(&self) {
        self.fail_reservations.store(true, Ordering::SeqCst);
    }

    pub fn fail_commits(&self) {
        self.fail_commits.store(true, Ordering::SeqCst);
    }
}

fn injected(flag: &AtomicBool) -> StoreResult<()> {
    if flag.load(Ordering::SeqCst) {
        return Err(StoreError::Io(std::io::Error::other("injected write failure")));
    }
    Ok(())
}

impl LedgerStore for FlakyStore {
    fn get_wallet(&self, wallet_id: &str) -> StoreResult<Option<WalletRecord>> {
        self.inner.get_wallet(wallet_id)
    }

    fn insert_wallet(&self, wallet: &WalletRecord) -> StoreResult<()> {
        injected(&self.fail_wallet_inserts)?;
        self.stall();
        self.inner.insert_wallet(wallet)
    }

    fn reserve_submission(&self, intent: &SubmissionIntent) -> StoreResult<()> {
        injected(&self.fail_reservations)?;
        self.stall();
        self.inner.reserve_submission(intent)
    }

    fn discard_submission(&self, id: &str) -> StoreResult<()> {
        self.stall();
        self.inner.discard_submission(id)
    }

    fn commit_transaction(&self, tx: &StoredTransaction) -> StoreResult<()> {
        injected(&self.fail_commits)?;
        self.stall();
        self.inner.commit_transaction(tx)
    }

    fn statement(&self, wallet_id: &str) -> StoreResult<Vec<StoredTransaction>> {
        self.inner.statement(wallet_id)
    }

    fn pending_submissions(&self) -> StoreResult<Vec<SubmissionIntent>> {
        self.inner.pending_submissions()
    }

    fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check()
    }
}

/// Fresh ledger in a temporary directory. Keep the directory alive for the
/// duration of the test.
pub fn temp_store() -> (Arc<FlakyStore>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let inner = LedgerDatabase::open(&dir.path().join("ledger.redb")).unwrap();
    let store = FlakyStore {
        inner,
        fail_wallet_inserts: AtomicBool::new(false),
        fail_reservations: AtomicBool::new(false),
        fail_commits: AtomicBool::new(false),
        write_delay_ms: AtomicU64::new(0),
    };
    (Arc::new(store), dir)
}
