// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transaction Ledger
//!
//! Submission broadcasts a transfer through the node and records it in the
//! ledger. The two writes live in different systems, so a journal entry
//! brackets the broadcast:
//!
//! 1. Reserve: persist a [`SubmissionIntent`]. A store failure here stops the
//!    submission before anything reaches the chain.
//! 2. Broadcast: `personal_sendTransaction` from the sender's account. When
//!    the node definitely rejected the call the intent is discarded and
//!    nothing remains. When the outcome is unknown (lost reply, 5xx, garbled
//!    answer) the intent is kept for reconciliation.
//! 3. Commit: write the transaction, its statement index entries and the
//!    journal removal in one store transaction.
//!
//! If step 3 fails the transfer is on chain but not in the ledger. The
//! journal entry survives and is reported at startup for reconciliation.
//!
//! A successful submission appears exactly once in the statement of its
//! sender and once in that of its recipient.

use std::sync::Arc;

use alloy::primitives::U256;

use crate::blockchain::ChainRpc;
use crate::custody::KeyCustody;
use crate::error::GatewayError;
use crate::models::SubmitTransactionRequest;
use crate::storage::{StoredTransaction, SubmissionIntent};

use super::StoreHandle;

pub struct TransactionLedger {
    store: StoreHandle,
    chain: Arc<dyn ChainRpc>,
    custody: Arc<dyn KeyCustody>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidTransfer {
    from: String,
    to: String,
    value: U256,
}

impl ValidTransfer {
    fn parse(request: SubmitTransactionRequest) -> Result<Self, GatewayError> {
        let to = non_empty(request.to)
            .ok_or_else(|| GatewayError::InvalidInput("Mandatory info missing: to".to_string()))?;
        let value = request
            .value
            .as_ref()
            .and_then(|v| v.to_u256())
            .filter(|v| !v.is_zero())
            .ok_or_else(|| {
                GatewayError::InvalidInput("value must be a positive integer".to_string())
            })?;
        let from = non_empty(request.from)
            .ok_or_else(|| GatewayError::InvalidInput("Mandatory info missing: from".to_string()))?;

        Ok(Self { from, to, value })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl TransactionLedger {
    pub fn new(store: StoreHandle, chain: Arc<dyn ChainRpc>, custody: Arc<dyn KeyCustody>) -> Self {
        Self {
            store,
            chain,
            custody,
        }
    }

    /// Validate, broadcast and record a transfer.
    pub async fn submit(
        &self,
        request: SubmitTransactionRequest,
    ) -> Result<StoredTransaction, GatewayError> {
        let transfer = ValidTransfer::parse(request)?;

        let (from_id, to_id) = (transfer.from.clone(), transfer.to.clone());
        let (sender, recipient) = self
            .store
            .run(move |s| Ok((s.get_wallet(&from_id)?, s.get_wallet(&to_id)?)))
            .await?;
        let sender = sender.ok_or_else(|| GatewayError::WalletNotFound(transfer.from.clone()))?;
        // Unknown recipients are taken to be raw chain addresses.
        let to_address = recipient
            .map(|w| w.chain_address)
            .unwrap_or_else(|| transfer.to.clone());

        let intent = SubmissionIntent::new(
            transfer.from,
            transfer.to,
            sender.chain_address,
            to_address,
            transfer.value,
        );
        let reserved = intent.clone();
        self.store
            .write(move |s| s.reserve_submission(&reserved))
            .await?;

        let passphrase = self.custody.passphrase_for(&intent.from);
        let tx_hash = match self.chain.send_transaction(&intent.transfer(), &passphrase).await {
            Ok(hash) => hash,
            Err(e) if e.is_rejection() => {
                tracing::warn!(ledger_id = %intent.id, from = %intent.from, error = %e, "Broadcast rejected");
                self.discard(&intent.id).await;
                return Err(e.into());
            }
            Err(e) => {
                tracing::error!(
                    ledger_id = %intent.id,
                    from = %intent.from,
                    to = %intent.to,
                    value = %intent.value,
                    error = %e,
                    "Broadcast outcome unknown; journal entry kept for reconciliation"
                );
                return Err(e.into());
            }
        };

        let tx = intent.into_transaction(tx_hash);
        let record = tx.clone();
        if let Err(e) = self.store.write(move |s| s.commit_transaction(&record)).await {
            tracing::error!(
                ledger_id = %tx.id,
                tx_hash = %tx.tx_hash,
                error = %e,
                "Transfer broadcast but not recorded; journal entry kept for reconciliation"
            );
            return Err(e.into());
        }

        tracing::info!(
            ledger_id = %tx.id,
            from = %tx.from,
            to = %tx.to,
            value = %tx.value,
            tx_hash = %tx.tx_hash,
            "Transaction submitted"
        );
        Ok(tx)
    }

    async fn discard(&self, id: &str) {
        let journal_id = id.to_string();
        if let Err(e) = self
            .store
            .write(move |s| s.discard_submission(&journal_id))
            .await
        {
            tracing::warn!(ledger_id = %id, error = %e, "Failed to discard journal entry");
        }
    }

    /// Transactions sent or received by `wallet_id`, oldest first.
    pub async fn statement(&self, wallet_id: &str) -> Result<Vec<StoredTransaction>, GatewayError> {
        if wallet_id.trim().is_empty() {
            return Err(GatewayError::InvalidInput("Missing walletId".to_string()));
        }
        let id = wallet_id.to_string();
        Ok(self.store.run(move |s| s.statement(&id)).await?)
    }

    /// Submissions whose outcome was never recorded.
    pub async fn unreconciled(&self) -> Result<Vec<SubmissionIntent>, GatewayError> {
        Ok(self.store.run(|s| s.pending_submissions()).await?)
    }
}
