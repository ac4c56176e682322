// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! # Aztec Connect Lib
//!
//! The `aztec_connect` library connects an application to an Aztec wallet
//! and to a remote node speaking JSON-RPC.
//!
//! Clients use a [`WalletConnector`] to open a [`Session`], a [`RpcClient`]
//! to talk to the node, and a [`ProfileContract`] to call the profile and
//! verification contracts on behalf of the session's account.

#![deny(missing_docs)]

mod account;
mod error;
mod session;

pub mod config;
pub mod contract;
pub mod encoding;
pub mod rpc;
pub mod sponsor;
pub mod wallet;

pub use account::{extract_address, AccountId, ACCOUNT_SEPARATOR};
pub use config::{ArgEncoding, Config, ConfigError};
pub use contract::{CallOutcome, ContractCall, ProfileContract, Verifications};
pub use error::Error;
pub use rpc::{HttpTransport, RpcClient, Transport};
pub use session::Session;
pub use wallet::{
    ConnectRequest, Connection, DappMetadata, Permission, WalletConnector,
    WalletExtension,
};

/// Namespace of Aztec account identifiers
pub const AZTEC_NAMESPACE: &str = "aztec";
/// Number of verification flags tracked per profile
pub const VERIFICATION_COUNT: usize = 6;
