// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Wallet extension connector.
//!
//! The wallet holds the keys and the session protocol; this module only asks
//! it for a session and keeps the account it hands back.

mod node;

pub use node::NodeWallet;

use std::fmt;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::account::{extract_address, AccountId};
use crate::contract::ContractCall;
use crate::rpc::TxReceipt;
use crate::{Config, Error, Session, AZTEC_NAMESPACE};

/// Methods requested by default when opening a session
pub const DEFAULT_METHODS: [&str; 3] =
    ["send_transaction", "add_private_authwit", "call"];

/// A wallet able to grant sessions and act on behalf of its accounts
#[async_trait]
pub trait WalletExtension: Send + Sync + fmt::Debug {
    /// Name of the wallet, for logs
    fn name(&self) -> &str;

    /// Negotiate a session, returning the granted accounts as
    /// `namespace:chainId:address` strings
    async fn connect(
        &self,
        request: &ConnectRequest,
    ) -> Result<Vec<String>, Error>;

    /// Sign and submit `call` from `account`
    async fn send_transaction(
        &self,
        account: &AccountId,
        call: &ContractCall,
    ) -> Result<TxReceipt, Error>;

    /// Sign an arbitrary message with `account`
    async fn sign_message(
        &self,
        account: &AccountId,
        message: &[u8],
    ) -> Result<Vec<u8>, Error>;

    /// Drop the session on the wallet side
    async fn disconnect(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// Application metadata shown by the wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DappMetadata {
    /// Application name
    pub name: String,
    /// Short description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Application URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    /// Logo URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Url>,
}

/// Chains and methods the application asks access to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permission {
    /// Chains as `namespace:chainId`
    pub chains: Vec<String>,
    /// Wallet methods
    pub methods: Vec<String>,
}

impl Permission {
    /// The default permission set for `chain_id`
    pub fn aztec(chain_id: u64) -> Self {
        Self {
            chains: vec![format!("{AZTEC_NAMESPACE}:{chain_id}")],
            methods: DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// A session request: who is asking and for what
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectRequest {
    /// Application metadata
    pub dapp: DappMetadata,
    /// Requested permissions
    pub permissions: Vec<Permission>,
}

impl ConnectRequest {
    /// A request for `dapp_name` with the default permissions
    pub fn new<S: Into<String>>(dapp_name: S, chain_id: u64) -> Self {
        Self {
            dapp: DappMetadata {
                name: dapp_name.into(),
                description: None,
                url: None,
                logo: None,
            },
            permissions: vec![Permission::aztec(chain_id)],
        }
    }

    /// The request described by `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dapp_name.clone(), config.chain_id)
    }
}

/// Outcome of [`WalletConnector::connect`]
#[derive(Debug)]
pub enum Connection {
    /// A session was granted
    Connected(Session),
    /// No wallet extension is installed, the install page was opened
    NotInstalled,
    /// The wallet refused or failed the request
    Failed(String),
}

impl Connection {
    /// Whether a session was granted
    pub fn success(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// The error message, if the connection did not succeed
    pub fn error(&self) -> Option<String> {
        match self {
            Self::Connected(_) => None,
            Self::NotInstalled => Some(Error::WalletNotInstalled.to_string()),
            Self::Failed(msg) => Some(msg.clone()),
        }
    }

    /// The granted session, if any
    pub fn into_session(self) -> Option<Session> {
        match self {
            Self::Connected(session) => Some(session),
            _ => None,
        }
    }
}

/// Opens the wallet install page
pub type InstallOpener = fn(&str) -> io::Result<()>;

fn open_in_browser(url: &str) -> io::Result<()> {
    open::that(url)
}

/// Detects a wallet extension and requests sessions from it
#[derive(Clone)]
pub struct WalletConnector {
    extension: Option<Arc<dyn WalletExtension>>,
    install_url: Url,
    opener: InstallOpener,
    status: fn(&str),
}

impl WalletConnector {
    /// Create a connector. `extension` is `None` when no wallet was
    /// detected.
    pub fn new(
        extension: Option<Arc<dyn WalletExtension>>,
        install_url: Url,
    ) -> Self {
        Self {
            extension,
            install_url,
            opener: open_in_browser,
            status: |_| {},
        }
    }

    /// Replace the function used to open the install page
    pub fn with_opener(mut self, opener: InstallOpener) -> Self {
        self.opener = opener;
        self
    }

    /// Set the status callback
    pub fn with_status(mut self, status: fn(&str)) -> Self {
        self.status = status;
        self
    }

    /// Whether a wallet extension was detected
    pub fn is_installed(&self) -> bool {
        self.extension.is_some()
    }

    /// Request a session.
    ///
    /// This never errors: a missing wallet opens the install page and yields
    /// [`Connection::NotInstalled`], any wallet failure yields
    /// [`Connection::Failed`].
    pub async fn connect(&self, request: &ConnectRequest) -> Connection {
        let Some(wallet) = &self.extension else {
            (self.status)("Wallet extension not found, opening install page");
            if let Err(e) = (self.opener)(self.install_url.as_str()) {
                warn!("Unable to open {}: {e}", self.install_url);
            }
            return Connection::NotInstalled;
        };

        (self.status)("Requesting wallet connection...");
        match self.open_session(wallet.clone(), request).await {
            Ok(session) => {
                info!(
                    wallet = wallet.name(),
                    account = %session.account(),
                    "wallet connected"
                );
                Connection::Connected(session)
            }
            Err(e) => {
                warn!(wallet = wallet.name(), "wallet connection failed: {e}");
                Connection::Failed(e.to_string())
            }
        }
    }

    async fn open_session(
        &self,
        wallet: Arc<dyn WalletExtension>,
        request: &ConnectRequest,
    ) -> Result<Session, Error> {
        let accounts = wallet.connect(request).await?;
        let first = accounts.first().ok_or(Error::NoAccounts)?;

        // Wallets are not strict about the identifier format, only the
        // trailing address is required
        let account = match first.parse::<AccountId>() {
            Ok(account) => account,
            Err(_) => {
                let address = extract_address(first);
                if address.is_empty() {
                    return Err(Error::BadAccount(first.clone()));
                }
                let chain_id = request
                    .permissions
                    .iter()
                    .flat_map(|p| p.chains.iter())
                    .find_map(|c| c.rsplit(':').next()?.parse().ok())
                    .unwrap_or_default();
                AccountId::new(AZTEC_NAMESPACE, chain_id, address)
            }
        };

        Ok(Session::new(account, wallet))
    }
}

impl fmt::Debug for WalletConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConnector")
            .field("extension", &self.extension)
            .field("install_url", &self.install_url.as_str())
            .finish()
    }
}
