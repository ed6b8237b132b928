// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Passphrases for node-managed accounts.
//!
//! The node holds the keys; the gateway only knows how to unlock them. Which
//! passphrase unlocks which wallet is owned by a [`KeyCustody`] implementation
//! so that a per-wallet secret store can replace the shared secret without
//! touching the services.

use std::fmt;

/// Source of the passphrase that locks a wallet's node-managed account.
pub trait KeyCustody: Send + Sync {
    /// Passphrase for `wallet_id`, used both at creation and when signing.
    fn passphrase_for(&self, wallet_id: &str) -> String;
}

/// One configured secret for every wallet.
#[derive(Clone)]
pub struct SharedPassphrase {
    passphrase: String,
}

impl SharedPassphrase {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }
}

impl KeyCustody for SharedPassphrase {
    fn passphrase_for(&self, _wallet_id: &str) -> String {
        self.passphrase.clone()
    }
}

impl fmt::Debug for SharedPassphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedPassphrase")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}
