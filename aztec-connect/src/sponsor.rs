// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Sponsored account creation.
//!
//! A candidate address is derived locally and a fee-sponsored deployment is
//! sent through the PXE. When the node reports the deployed address that one
//! is used; otherwise the local candidate is kept and flagged as unverified,
//! since nothing ties it to the network's real address derivation.

use std::fmt;

use rand::RngCore;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::rpc::{RpcClient, SponsoredTxRequest, Transport, TxRequest};
use crate::Error;

/// Function invoked on the sponsor to deploy the account contract
pub const DEPLOY_ACCOUNT: &str = "deploy_account";

/// How the candidate address is derived
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AddressDerivation {
    /// 32 random bytes
    #[default]
    Random,
    /// SHA-256 of a public key
    PublicKeyHash(Vec<u8>),
}

impl AddressDerivation {
    /// Derive a `0x`-prefixed hex address
    pub fn derive<R: RngCore>(&self, rng: &mut R) -> String {
        let bytes: [u8; 32] = match self {
            Self::Random => {
                let mut bytes = [0u8; 32];
                rng.fill_bytes(&mut bytes);
                bytes
            }
            Self::PublicKeyHash(pk) => Sha256::digest(pk).into(),
        };
        format!("0x{}", hex::encode(bytes))
    }
}

/// Where the account address comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressOrigin {
    /// Reported by the node
    Node,
    /// Derived locally, never confirmed by the node
    Local,
}

impl fmt::Display for AddressOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Local => write!(f, "local (unverified)"),
        }
    }
}

/// An account created through a sponsored transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsoredAccount {
    /// Account address
    pub address: String,
    /// Hash of the deployment transaction, when reported
    pub tx_hash: Option<String>,
    /// Where `address` comes from
    pub origin: AddressOrigin,
}

impl SponsoredAccount {
    /// Whether the node confirmed the address
    pub fn is_verified(&self) -> bool {
        self.origin == AddressOrigin::Node
    }
}

/// Create an account whose deployment fee is paid by `sponsor`.
///
/// # Errors
/// This method errors if the sponsored transaction is rejected or the node
/// cannot be reached.
pub async fn create_sponsored_account<T, R>(
    rpc: &RpcClient<T>,
    sponsor: &str,
    derivation: &AddressDerivation,
    rng: &mut R,
) -> Result<SponsoredAccount, Error>
where
    T: Transport,
    R: RngCore,
{
    let candidate = derivation.derive(rng);

    let request = SponsoredTxRequest {
        from: candidate.clone(),
        sponsor: sponsor.to_string(),
        call: TxRequest {
            contract_address: sponsor.to_string(),
            function_name: DEPLOY_ACCOUNT.to_string(),
            args: vec![Value::String(candidate.clone())],
            from: Some(candidate.clone()),
        },
    };

    let receipt = rpc.pxe_send_transaction(request).await?;

    let account = match receipt.address {
        Some(address) => SponsoredAccount {
            address,
            tx_hash: receipt.tx_hash,
            origin: AddressOrigin::Node,
        },
        None => {
            warn!(
                address = %candidate,
                "node did not report an address, keeping local candidate"
            );
            SponsoredAccount {
                address: candidate,
                tx_hash: receipt.tx_hash,
                origin: AddressOrigin::Local,
            }
        }
    };

    info!(
        address = %account.address,
        origin = %account.origin,
        "sponsored account created"
    );
    Ok(account)
}
