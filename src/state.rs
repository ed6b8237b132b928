// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::ChainRpc;
use crate::custody::KeyCustody;
use crate::services::{
    BalanceService, NetworkInfo, StoreHandle, TransactionLedger, WalletProvisioning,
};
use crate::storage::LedgerStore;

/// Shared handler state. Cloning is cheap; every service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub wallets: Arc<WalletProvisioning>,
    pub balances: Arc<BalanceService>,
    pub ledger: Arc<TransactionLedger>,
    pub network: Arc<NetworkInfo>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        chain: Arc<dyn ChainRpc>,
        custody: Arc<dyn KeyCustody>,
        store_timeout: Duration,
    ) -> Self {
        let store = StoreHandle::new(store, store_timeout);
        Self {
            wallets: Arc::new(WalletProvisioning::new(
                store.clone(),
                chain.clone(),
                custody.clone(),
            )),
            balances: Arc::new(BalanceService::new(store.clone(), chain.clone())),
            ledger: Arc::new(TransactionLedger::new(store.clone(), chain.clone(), custody)),
            network: Arc::new(NetworkInfo::new(store, chain)),
        }
    }
}
