// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::sync::Arc;

use aztec_connect::contract::{CallOutcome, ContractCall, Verifications};
use aztec_connect::encoding::stand_in_field;
use aztec_connect::rpc::NodeInfo;
use aztec_connect::sponsor::{
    create_sponsored_account, AddressDerivation, SponsoredAccount,
};
use aztec_connect::wallet::NodeWallet;
use aztec_connect::{
    ConnectRequest, Connection, Error, HttpTransport, ProfileContract,
    RpcClient, WalletConnector, WalletExtension,
};
use clap::Subcommand;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use crate::settings::Settings;

/// Commands that can be run against the node
#[derive(PartialEq, Eq, Hash, Clone, Subcommand, Debug)]
pub(crate) enum Command {
    /// Show the node information
    NodeInfo,

    /// Show the latest block number
    BlockNumber,

    /// Open a session and print its account
    Connect,

    /// Create a profile for a freshly connected account
    CreateProfile {
        /// Profile name
        #[arg(short, long)]
        name: String,
    },

    /// Check whether an address owns a profile
    HasProfile {
        /// Account address
        #[arg(short, long)]
        address: String,
    },

    /// Show the profile id of an address
    ProfileId {
        /// Account address
        #[arg(short, long)]
        address: String,
    },

    /// Show the verification flags of an address
    Verifications {
        /// Account address
        #[arg(short, long)]
        address: String,
    },

    /// Create a fee-sponsored account
    CreateAccount {
        /// Hex encoded public key to derive the address from [default:
        /// random address]
        #[arg(long)]
        public_key: Option<String>,
    },

    /// Simulate an arbitrary contract call
    Simulate {
        /// Contract address
        #[arg(short, long)]
        contract: String,

        /// Function name
        #[arg(short, long)]
        function: String,

        /// Arguments, parsed as JSON when possible
        args: Vec<String>,
    },

    /// Compute the stand-in hash of a string
    Hash {
        /// Input string
        input: String,
    },

    /// Show the current settings
    Settings,
}

impl Command {
    /// Runs the command with the provided settings
    pub async fn run(self, settings: &Settings) -> anyhow::Result<RunResult> {
        let config = &settings.config;

        match self {
            Command::NodeInfo => {
                let rpc = rpc_client(settings)?;
                Ok(RunResult::NodeInfo(rpc.node_info().await?))
            }
            Command::BlockNumber => {
                let rpc = rpc_client(settings)?;
                Ok(RunResult::BlockNumber(rpc.block_number().await?))
            }
            Command::Connect => {
                let connection = connect(rpc_client(settings)?, settings).await;
                let error = connection.error();
                match connection.into_session() {
                    Some(session) => {
                        let account = session.account().to_string();
                        session.disconnect().await;
                        Ok(RunResult::Account(account))
                    }
                    None => Err(anyhow::anyhow!(
                        "Unable to open a session: {}",
                        error.unwrap_or_default()
                    )),
                }
            }
            Command::CreateProfile { name } => {
                let rpc = rpc_client(settings)?;
                let contract =
                    ProfileContract::from_config(rpc.clone(), config);
                let session = match connect(rpc, settings).await {
                    Connection::Connected(session) => session,
                    other => {
                        let error = other.error().unwrap_or_default();
                        return Ok(RunResult::Call(CallOutcome::Failed(error)));
                    }
                };
                let outcome = contract.create_profile(&session, &name).await;
                session.disconnect().await;
                Ok(RunResult::Call(outcome))
            }
            Command::HasProfile { address } => {
                let contract = profile_contract(settings)?;
                Ok(RunResult::Flag(contract.has_profile(&address).await))
            }
            Command::ProfileId { address } => {
                let contract = profile_contract(settings)?;
                Ok(RunResult::ProfileId(contract.profile_id(&address).await))
            }
            Command::Verifications { address } => {
                let contract = profile_contract(settings)?;
                let flags = contract.get_profile_verifications(&address).await;
                Ok(RunResult::Verifications(flags))
            }
            Command::CreateAccount { public_key } => {
                let derivation = match public_key {
                    Some(pk) => {
                        let pk = pk.trim_start_matches("0x");
                        AddressDerivation::PublicKeyHash(hex::decode(pk)?)
                    }
                    None => AddressDerivation::Random,
                };
                let rpc = rpc_client(settings)?;
                let mut rng = StdRng::from_entropy();
                let account = create_sponsored_account(
                    &rpc,
                    &config.sponsor_address,
                    &derivation,
                    &mut rng,
                )
                .await?;
                Ok(RunResult::Sponsored(account))
            }
            Command::Simulate {
                contract: target,
                function,
                args,
            } => {
                let contract = profile_contract(settings)?;
                let args = args.iter().map(|arg| parse_arg(arg)).collect();
                let call = ContractCall::new(target, function, args);
                Ok(RunResult::Value(contract.simulate(&call).await?))
            }
            Command::Hash { input } => {
                Ok(RunResult::Hash(stand_in_field(&input)))
            }
            Command::Settings => Ok(RunResult::Settings),
        }
    }
}

// Only the commands talking to the node build a client
fn rpc_client(settings: &Settings) -> Result<Arc<RpcClient>, Error> {
    let rpc = RpcClient::http(settings.config.rpc_url.as_str())?;
    Ok(Arc::new(rpc))
}

fn profile_contract(
    settings: &Settings,
) -> Result<ProfileContract<HttpTransport>, Error> {
    let rpc = rpc_client(settings)?;
    Ok(ProfileContract::from_config(rpc, &settings.config))
}

async fn connect(rpc: Arc<RpcClient>, settings: &Settings) -> Connection {
    let config = &settings.config;
    let wallet: Arc<dyn WalletExtension> = Arc::new(NodeWallet::new(
        rpc,
        config.sponsor_address.clone(),
        config.chain_id,
    ));

    let status = match settings.headless {
        true => crate::io::status::headless,
        false => crate::io::status::interactive,
    };

    WalletConnector::new(Some(wallet), config.install_url.clone())
        .with_status(status)
        .connect(&ConnectRequest::from_config(config))
        .await
}

fn parse_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.into()))
}

/// Possible results of running a command
pub(crate) enum RunResult {
    NodeInfo(NodeInfo),
    BlockNumber(u64),
    Account(String),
    Sponsored(SponsoredAccount),
    Call(CallOutcome),
    Flag(bool),
    ProfileId(String),
    Verifications(Verifications),
    Value(Value),
    Hash(String),
    Settings,
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NodeInfo(info) => {
                let version = info.node_version.as_deref().unwrap_or("unknown");
                writeln!(f, "Node version: {version}")?;
                if let Some(chain_id) = info.l1_chain_id {
                    writeln!(f, "L1 chain id: {chain_id}")?;
                }
                if let Some(protocol) = info.protocol_version {
                    writeln!(f, "Protocol version: {protocol}")?;
                }
                Ok(())
            }
            Self::BlockNumber(n) => write!(f, "{n}"),
            Self::Account(account) => write!(f, "{account}"),
            Self::Sponsored(account) => {
                writeln!(f, "Address: {}", account.address)?;
                writeln!(f, "Origin: {}", account.origin)?;
                if let Some(hash) = &account.tx_hash {
                    writeln!(f, "Tx: {hash}")?;
                }
                Ok(())
            }
            Self::Call(CallOutcome::Submitted(receipt)) => {
                let hash = receipt.tx_hash.as_deref().unwrap_or("-");
                write!(f, "Transaction submitted: {hash}")
            }
            Self::Call(CallOutcome::Failed(error)) => {
                write!(f, "Transaction failed: {error}")
            }
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::ProfileId(id) => write!(f, "{id}"),
            Self::Verifications(flags) => {
                let flags: Vec<String> =
                    flags.iter().map(|flag| flag.to_string()).collect();
                write!(f, "[{}]", flags.join(", "))
            }
            Self::Value(value) => write!(f, "{value}"),
            Self::Hash(hash) => write!(f, "{hash}"),
            Self::Settings => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use aztec_connect::Config;

    use super::*;
    use crate::settings::{LogFormat, LogLevel, Logging};

    fn settings() -> Settings {
        let mut config = Config::embedded().unwrap();
        // nothing listens there, any request would fail
        config.rpc_url = "http://127.0.0.1:1".parse().unwrap();

        Settings {
            config,
            config_path: None,
            logging: Logging {
                level: LogLevel::Info,
                format: LogFormat::Plain,
            },
            headless: true,
        }
    }

    #[tokio::test]
    async fn offline_commands_skip_the_node() {
        let settings = settings();

        let hash = Command::Hash { input: "ab".into() }
            .run(&settings)
            .await
            .unwrap();
        assert!(matches!(hash, RunResult::Hash(h) if h == "0xc21"));

        let result = Command::Settings.run(&settings).await.unwrap();
        assert!(matches!(result, RunResult::Settings));
    }

    #[tokio::test]
    async fn node_commands_report_unreachable_node() {
        let result = Command::BlockNumber.run(&settings()).await;
        assert!(result.is_err());
    }

    #[test]
    fn args_are_parsed_as_json_when_possible() {
        assert_eq!(parse_arg("42"), serde_json::json!(42));
        assert_eq!(parse_arg("[true]"), serde_json::json!([true]));
        assert_eq!(parse_arg("alice"), serde_json::json!("alice"));
    }
}
