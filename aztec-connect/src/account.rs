// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Separator between the segments of an account identifier
pub const ACCOUNT_SEPARATOR: char = ':';

/// Returns the trailing address segment of an account string.
///
/// Wallets report accounts as `namespace:chainId:address`; a string without
/// any separator is returned whole.
pub fn extract_address(account: &str) -> &str {
    account
        .rsplit(ACCOUNT_SEPARATOR)
        .next()
        .unwrap_or(account)
}

/// An account as reported by a wallet: `namespace:chainId:address`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId {
    namespace: String,
    chain_id: u64,
    address: String,
}

impl AccountId {
    /// Create an account identifier from its parts
    pub fn new<N, A>(namespace: N, chain_id: u64, address: A) -> Self
    where
        N: Into<String>,
        A: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            chain_id,
            address: address.into(),
        }
    }

    /// Namespace of the chain, `aztec` for Aztec accounts
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Chain the account lives on
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The account address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// A trimmed version of the address to display as preview
    pub fn preview(&self) -> String {
        let addr = &self.address;
        if addr.len() <= 14 || !addr.is_ascii() {
            return addr.clone();
        }
        format!("{}...{}", &addr[..8], &addr[addr.len() - 6..])
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::BadAccount(s.to_string());

        let mut parts = s.splitn(3, ACCOUNT_SEPARATOR);
        let namespace =
            parts.next().filter(|p| !p.is_empty()).ok_or_else(bad)?;
        let chain_id = parts
            .next()
            .and_then(|p| p.parse::<u64>().ok())
            .ok_or_else(bad)?;
        let address = parts
            .next()
            .filter(|p| !p.is_empty() && !p.contains(ACCOUNT_SEPARATOR))
            .ok_or_else(bad)?;

        Ok(Self::new(namespace, chain_id, address))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.namespace,
            self.chain_id,
            self.address,
            sep = ACCOUNT_SEPARATOR
        )
    }
}
