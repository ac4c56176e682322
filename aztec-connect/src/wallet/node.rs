// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use super::{ConnectRequest, WalletExtension};
use crate::contract::ContractCall;
use crate::rpc::{RpcClient, Transport, TxReceipt};
use crate::sponsor::{create_sponsored_account, AddressDerivation};
use crate::{AccountId, Error, AZTEC_NAMESPACE};

/// A wallet backed directly by the node.
///
/// Used where no browser extension exists: connecting creates a sponsored
/// account and transactions are submitted with `aztec_sendTransaction`. The
/// node holds no key for the account, so messages cannot be signed.
pub struct NodeWallet<T> {
    rpc: Arc<RpcClient<T>>,
    sponsor: String,
    derivation: AddressDerivation,
    fallback_chain_id: u64,
}

impl<T: Transport> NodeWallet<T> {
    /// A wallet creating accounts sponsored by `sponsor`
    pub fn new<S: Into<String>>(
        rpc: Arc<RpcClient<T>>,
        sponsor: S,
        fallback_chain_id: u64,
    ) -> Self {
        Self {
            rpc,
            sponsor: sponsor.into(),
            derivation: AddressDerivation::default(),
            fallback_chain_id,
        }
    }

    /// Set how new account addresses are derived
    pub fn with_derivation(mut self, derivation: AddressDerivation) -> Self {
        self.derivation = derivation;
        self
    }

    async fn chain_id(&self) -> u64 {
        match self.rpc.node_info().await {
            Ok(info) => info.l1_chain_id.unwrap_or(self.fallback_chain_id),
            Err(e) => {
                warn!("Unable to fetch node info: {e}");
                self.fallback_chain_id
            }
        }
    }
}

#[async_trait]
impl<T: Transport + 'static> WalletExtension for NodeWallet<T> {
    fn name(&self) -> &str {
        "node"
    }

    async fn connect(
        &self,
        request: &ConnectRequest,
    ) -> Result<Vec<String>, Error> {
        debug!(dapp = %request.dapp.name, "node wallet session requested");

        let chain_id = self.chain_id().await;
        let mut rng = StdRng::from_entropy();
        let account = create_sponsored_account(
            &self.rpc,
            &self.sponsor,
            &self.derivation,
            &mut rng,
        )
        .await?;

        let account =
            AccountId::new(AZTEC_NAMESPACE, chain_id, account.address);
        Ok(vec![account.to_string()])
    }

    async fn send_transaction(
        &self,
        account: &AccountId,
        call: &ContractCall,
    ) -> Result<TxReceipt, Error> {
        let tx = call.to_tx_request(Some(account.address()));
        self.rpc.send_transaction(tx).await
    }

    async fn sign_message(
        &self,
        _account: &AccountId,
        _message: &[u8],
    ) -> Result<Vec<u8>, Error> {
        Err(Error::Unsupported("Message signing"))
    }
}

impl<T> fmt::Debug for NodeWallet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeWallet")
            .field("sponsor", &self.sponsor)
            .field("derivation", &self.derivation)
            .finish()
    }
}
