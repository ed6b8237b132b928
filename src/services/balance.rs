// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Live balance lookup. Balances are always read from the node, never cached.

use std::sync::Arc;

use alloy::primitives::U256;

use crate::blockchain::ChainRpc;
use crate::error::GatewayError;

use super::StoreHandle;

pub struct BalanceService {
    store: StoreHandle,
    chain: Arc<dyn ChainRpc>,
}

impl BalanceService {
    pub fn new(store: StoreHandle, chain: Arc<dyn ChainRpc>) -> Self {
        Self { store, chain }
    }

    /// Current balance of `wallet_id` at the latest block.
    pub async fn balance(&self, wallet_id: &str) -> Result<U256, GatewayError> {
        let id = wallet_id.to_string();
        let wallet = self
            .store
            .run(move |s| s.get_wallet(&id))
            .await?
            .ok_or_else(|| GatewayError::WalletNotFound(wallet_id.to_string()))?;

        let balance = self.chain.balance(&wallet.chain_address).await?;
        tracing::debug!(wallet_id, address = %wallet.chain_address, %balance, "Balance read");
        Ok(balance)
    }
}
