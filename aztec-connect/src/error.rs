// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io;

use crate::config::ConfigError;

/// Errors returned by this library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No wallet extension could be detected
    #[error("Wallet extension is not installed")]
    WalletNotInstalled,
    /// The wallet refused or failed the session request
    #[error("Wallet connection failed: {0}")]
    Connection(String),
    /// The wallet granted a session without any account
    #[error("The wallet did not return any account")]
    NoAccounts,
    /// Account identifier is not `namespace:chainId:address`
    #[error("Invalid account identifier: {0}")]
    BadAccount(String),
    /// The wallet does not implement the requested capability
    #[error("{0} is not supported by this wallet")]
    Unsupported(&'static str),
    /// Error object returned inside a JSON-RPC response
    #[error("RPC error ({code}): {message}")]
    Rpc {
        /// JSON-RPC error code, zero when the node omits it
        code: i64,
        /// Message reported by the node
        message: String,
    },
    /// The response was valid JSON but not a JSON-RPC envelope
    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),
    /// The node answered with an HTTP error status
    #[error("Node error occurred: {0}")]
    Node(String),
    /// The transport failed before a response was received
    #[error("Transport error: {0}")]
    Transport(String),
    /// The HTTP client could not be built
    #[error("Failed to initialize the HTTP client")]
    HttpClient,
    /// Reqwest errors
    #[error("A request error occurred: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// JSON serialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Filesystem errors
    #[error(transparent)]
    IO(#[from] io::Error),
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}
