// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! # Client Configuration
//!
//! Node endpoint, contract addresses and wallet metadata used by the client.
//!
//! ## Configuration Sources (in order of precedence)
//!
//! 1. Environment variables (`AZTEC_RPC_URL`, `AZTEC_CHAIN_ID`,
//!    `PROFILE_CONTRACT_ADDRESS`, `VERIFICATION_CONTRACT_ADDRESS`,
//!    `SPONSOR_ADDRESS`)
//! 2. Configuration file (if specified)
//! 3. The defaults embedded from `default.config.toml`
//!
//! Unknown keys in a configuration file are rejected, missing keys take the
//! embedded default.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

/// The configuration shipped with the crate
pub const DEFAULT_CONFIG: &str = include_str!("../default.config.toml");

/// Errors that can occur while loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Error parsing TOML
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Error parsing environment variable
    #[error("Failed to parse environment variable {0}: {1}")]
    EnvParse(String, String),

    /// Validation error
    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// How string arguments are handed to contract calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgEncoding {
    /// Strings are passed as-is, the wallet or node encodes them
    #[default]
    Raw,
    /// Strings are replaced by the non-cryptographic stand-in hash, for
    /// contracts deployed against that placeholder
    StandInHash,
}

impl fmt::Display for ArgEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::StandInHash => write!(f, "stand_in_hash"),
        }
    }
}

/// Config holds the settings of the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON-RPC endpoint of the node
    pub rpc_url: Url,
    /// Chain used when the node does not report one
    pub chain_id: u64,
    /// Address of the profile contract
    pub profile_contract: String,
    /// Address of the verification contract
    pub verification_contract: String,
    /// Address paying the fees of sponsored transactions
    pub sponsor_address: String,
    /// Name presented to the wallet when requesting a session
    pub dapp_name: String,
    /// Page opened when no wallet extension is installed
    pub install_url: Url,
    /// Encoding of string arguments
    #[serde(default)]
    pub arg_encoding: ArgEncoding,
}

// Partial view of a configuration file, every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParsedConfig {
    rpc_url: Option<Url>,
    chain_id: Option<u64>,
    profile_contract: Option<String>,
    verification_contract: Option<String>,
    sponsor_address: Option<String>,
    dapp_name: Option<String>,
    install_url: Option<Url>,
    arg_encoding: Option<ArgEncoding>,
}

impl Config {
    /// Default configuration file name
    pub const DEFAULT_CONFIG_FILENAME: &'static str = "config.toml";

    /// The configuration embedded in the crate.
    ///
    /// # Errors
    /// Errors only if the embedded file does not parse.
    pub fn embedded() -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(DEFAULT_CONFIG)?;
        Ok(config)
    }

    /// Parse a configuration from TOML, layered over the embedded defaults.
    ///
    /// # Errors
    /// Errors if the content is not valid TOML, carries unknown keys or
    /// fails validation.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let parsed: ParsedConfig = toml::from_str(content)?;
        let mut config = Self::embedded()?;
        config.merge(parsed);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Errors if the file cannot be read or [`Config::from_toml`] fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration with the following precedence:
    /// 1. Environment variables
    /// 2. Config file (if specified and present)
    /// 3. Embedded defaults
    ///
    /// # Errors
    /// Errors if the file is invalid or an environment variable cannot be
    /// parsed.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_file {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Self::embedded()?,
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Override values with the ones found through `get_env`.
    ///
    /// # Errors
    /// Errors if a variable is set but cannot be parsed.
    pub fn apply_env<F>(&mut self, get_env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = get_env("AZTEC_RPC_URL") {
            self.rpc_url = Url::parse(&url).map_err(|e| {
                ConfigError::EnvParse("AZTEC_RPC_URL".into(), e.to_string())
            })?;
        }
        if let Some(chain_id) = get_env("AZTEC_CHAIN_ID") {
            self.chain_id = chain_id.parse().map_err(|_| {
                ConfigError::EnvParse("AZTEC_CHAIN_ID".into(), chain_id)
            })?;
        }
        if let Some(addr) = get_env("PROFILE_CONTRACT_ADDRESS") {
            self.profile_contract = addr;
        }
        if let Some(addr) = get_env("VERIFICATION_CONTRACT_ADDRESS") {
            self.verification_contract = addr;
        }
        if let Some(addr) = get_env("SPONSOR_ADDRESS") {
            self.sponsor_address = addr;
        }

        Ok(())
    }

    /// Check that the addresses are usable
    ///
    /// # Errors
    /// Errors if an address is empty or the RPC URL is not HTTP(S).
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.rpc_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ConfigError::Validation(format!(
                    "unsupported RPC scheme `{scheme}`"
                )));
            }
        }

        let addresses = [
            ("profile_contract", &self.profile_contract),
            ("verification_contract", &self.verification_contract),
            ("sponsor_address", &self.sponsor_address),
        ];
        for (name, addr) in addresses {
            if addr.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{name} cannot be empty"
                )));
            }
        }

        Ok(())
    }

    fn merge(&mut self, parsed: ParsedConfig) {
        if let Some(v) = parsed.rpc_url {
            self.rpc_url = v;
        }
        if let Some(v) = parsed.chain_id {
            self.chain_id = v;
        }
        if let Some(v) = parsed.profile_contract {
            self.profile_contract = v;
        }
        if let Some(v) = parsed.verification_contract {
            self.verification_contract = v;
        }
        if let Some(v) = parsed.sponsor_address {
            self.sponsor_address = v;
        }
        if let Some(v) = parsed.dapp_name {
            self.dapp_name = v;
        }
        if let Some(v) = parsed.install_url {
            self.install_url = v;
        }
        if let Some(v) = parsed.arg_encoding {
            self.arg_encoding = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    #[test]
    fn embedded_config_is_valid() {
        let config = Config::embedded().expect("embedded config to parse");
        config.validate().expect("embedded config to be valid");

        assert_eq!(config.rpc_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.arg_encoding, ArgEncoding::Raw);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
rpc_url = "https://node.example.org/rpc"
profile_contract = "0x01"
arg_encoding = "stand_in_hash"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.rpc_url.as_str(), "https://node.example.org/rpc");
        assert_eq!(config.profile_contract, "0x01");
        assert_eq!(config.arg_encoding, ArgEncoding::StandInHash);
        // untouched keys keep the embedded values
        assert_eq!(config.chain_id, 11155111);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml("not_a_key = 1").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(Config::DEFAULT_CONFIG_FILENAME);

        let config = Config::load(Some(missing.as_path())).unwrap();

        let mut expected = Config::embedded().unwrap();
        expected.apply_env(|name| std::env::var(name).ok()).unwrap();
        assert_eq!(config, expected);
    }

    #[test]
    fn env_overrides_file() {
        let vars: HashMap<&str, &str> = [
            ("AZTEC_RPC_URL", "http://10.0.0.1:8080"),
            ("AZTEC_CHAIN_ID", "31337"),
            ("SPONSOR_ADDRESS", "0xsponsor"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::from_toml(r#"chain_id = 1"#).unwrap();
        config
            .apply_env(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.rpc_url.as_str(), "http://10.0.0.1:8080/");
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.sponsor_address, "0xsponsor");
    }

    #[test]
    fn bad_env_value_is_reported() {
        let mut config = Config::embedded().unwrap();
        let err = config
            .apply_env(|name| {
                (name == "AZTEC_CHAIN_ID").then(|| "sepolia".to_string())
            })
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::EnvParse(var, _) if var == "AZTEC_CHAIN_ID"
        ));
    }

    #[test]
    fn validation_rejects_empty_addresses() {
        let err =
            Config::from_toml(r#"verification_contract = " ""#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = Config::from_toml(r#"rpc_url = "ws://localhost:8080""#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
