// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::contract::ContractCall;
use crate::rpc::TxReceipt;
use crate::{AccountId, Error, WalletExtension};

/// A granted wallet session.
///
/// The session is owned by the caller and lives until [`Session::disconnect`]
/// consumes it; nothing about it is global.
pub struct Session {
    account: AccountId,
    wallet: Arc<dyn WalletExtension>,
}

impl Session {
    /// Bind `account` to the wallet that granted it
    pub fn new(account: AccountId, wallet: Arc<dyn WalletExtension>) -> Self {
        Self { account, wallet }
    }

    /// The session's account
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// The session's account address
    pub fn address(&self) -> &str {
        self.account.address()
    }

    /// Name of the wallet backing the session
    pub fn wallet_name(&self) -> &str {
        self.wallet.name()
    }

    /// Have the wallet sign and submit `call`
    ///
    /// # Errors
    /// Any error raised by the wallet.
    pub async fn send_transaction(
        &self,
        call: &ContractCall,
    ) -> Result<TxReceipt, Error> {
        self.wallet.send_transaction(&self.account, call).await
    }

    /// Have the wallet sign `message`
    ///
    /// # Errors
    /// Any error raised by the wallet, [`Error::Unsupported`] if it cannot
    /// sign messages.
    pub async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        self.wallet.sign_message(&self.account, message).await
    }

    /// Tear the session down.
    ///
    /// The handle is consumed even if the wallet reports an error.
    pub async fn disconnect(self) {
        match self.wallet.disconnect().await {
            Ok(()) => info!(account = %self.account, "wallet disconnected"),
            Err(e) => warn!(account = %self.account, "disconnect failed: {e}"),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("wallet", &self.wallet.name())
            .finish()
    }
}
