// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provisioning.
//!
//! A wallet is a client-chosen id bound to an account the node creates and
//! keeps the keys for. The binding is written once.
//!
//! ## Failure semantics
//!
//! - Node failure: nothing is persisted
//! - Store failure after the node created the account: the account is orphaned
//!   and logged with its address for manual reclamation

use std::sync::Arc;

use crate::blockchain::ChainRpc;
use crate::custody::KeyCustody;
use crate::error::GatewayError;
use crate::storage::{StoreError, WalletRecord};

use super::StoreHandle;

pub struct WalletProvisioning {
    store: StoreHandle,
    chain: Arc<dyn ChainRpc>,
    custody: Arc<dyn KeyCustody>,
}

impl WalletProvisioning {
    pub fn new(store: StoreHandle, chain: Arc<dyn ChainRpc>, custody: Arc<dyn KeyCustody>) -> Self {
        Self {
            store,
            chain,
            custody,
        }
    }

    /// Provision `wallet_id`, locking the new account with `passphrase` or,
    /// when none is given, with the custody passphrase for that wallet.
    ///
    /// Performs one account-creation call and at most one insert. A second
    /// call with the same id fails with `DuplicateWallet`, also when the two
    /// calls race: the store rejects the losing insert.
    pub async fn create_wallet(
        &self,
        wallet_id: &str,
        passphrase: Option<&str>,
    ) -> Result<WalletRecord, GatewayError> {
        if wallet_id.trim().is_empty() {
            return Err(GatewayError::InvalidInput("Missing wallet id".to_string()));
        }
        let id = wallet_id.to_string();

        // Fast path only; the insert below is what enforces uniqueness.
        let lookup_id = id.clone();
        if self
            .store
            .run(move |s| s.get_wallet(&lookup_id))
            .await?
            .is_some()
        {
            return Err(GatewayError::DuplicateWallet(id));
        }

        let passphrase = match passphrase {
            Some(p) => p.to_string(),
            None => self.custody.passphrase_for(&id),
        };

        let address = self.chain.new_account(&passphrase).await.map_err(|e| {
            tracing::warn!(wallet_id = %id, error = %e, "Account creation failed");
            GatewayError::UpstreamUnavailable(e.to_string())
        })?;

        let record = WalletRecord::new(id.clone(), address.clone());
        let to_insert = record.clone();
        match self.store.write(move |s| s.insert_wallet(&to_insert)).await {
            Ok(()) => {
                tracing::info!(wallet_id = %id, address = %address, "Wallet created");
                Ok(record)
            }
            Err(StoreError::AlreadyExists(_)) => {
                tracing::warn!(
                    wallet_id = %id,
                    orphaned_address = %address,
                    "Lost creation race; node account is orphaned"
                );
                Err(GatewayError::DuplicateWallet(id))
            }
            Err(e) => {
                tracing::error!(
                    wallet_id = %id,
                    orphaned_address = %address,
                    error = %e,
                    "Failed to persist wallet; node account is orphaned"
                );
                Err(e.into())
            }
        }
    }
}
