// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Node mempool snapshot and dependency readiness.

use std::sync::Arc;

use crate::blockchain::quantity::decode_counter;
use crate::blockchain::ChainRpc;
use crate::error::GatewayError;

use super::StoreHandle;

pub struct NetworkInfo {
    store: StoreHandle,
    chain: Arc<dyn ChainRpc>,
}

/// Reachability of the gateway's two backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub store: bool,
    pub node: bool,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.store && self.node
    }
}

impl NetworkInfo {
    pub fn new(store: StoreHandle, chain: Arc<dyn ChainRpc>) -> Self {
        Self { store, chain }
    }

    /// Number of executable transactions in the node's pool.
    pub async fn pending_count(&self) -> Result<u64, GatewayError> {
        let status = self.chain.txpool_status().await?;
        let pending = status.pending.ok_or_else(|| {
            GatewayError::ProtocolError("txpool_status reply has no pending field".to_string())
        })?;
        Ok(decode_counter(&pending)?)
    }

    /// Probe the store with a write and the node with `eth_blockNumber`.
    pub async fn readiness(&self) -> Readiness {
        let store = match self.store.run(|s| s.health_check()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Ledger store not ready");
                false
            }
        };
        let node = match self.chain.block_number().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Node not ready");
                false
            }
        };
        Readiness { store, node }
    }
}
