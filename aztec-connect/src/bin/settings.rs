// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::path::PathBuf;

use aztec_connect::{Config, ConfigError};
use tracing::Level;
use url::Url;

use crate::io::Args;

#[derive(clap::ValueEnum, Debug, Clone)]
pub(crate) enum LogFormat {
    Json,
    Plain,
    Coloured,
}

#[derive(clap::ValueEnum, Debug, Clone)]
pub(crate) enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,
    /// Designates lower priority information.
    Debug,
    /// Designates useful information.
    Info,
    /// Designates hazardous situations.
    Warn,
    /// Designates very serious errors.
    Error,
}

#[derive(Debug)]
pub(crate) struct Logging {
    /// Max log level
    pub level: LogLevel,
    /// Log format
    pub format: LogFormat,
}

#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) config: Config,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) logging: Logging,
    pub(crate) headless: bool,
}

pub(crate) struct SettingsBuilder {
    config_path: Option<PathBuf>,
    pub(crate) args: Args,
}

impl SettingsBuilder {
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub fn config(self, mut config: Config) -> Result<Settings, ConfigError> {
        let args = self.args;

        if let Some(url) = &args.rpc_url {
            config.rpc_url = Url::parse(url).map_err(|e| {
                ConfigError::Validation(format!("invalid --rpc-url: {e}"))
            })?;
            config.validate()?;
        }

        let logging = Logging {
            level: args.log_level,
            format: args.log_type,
        };

        Ok(Settings {
            config,
            config_path: self.config_path,
            logging,
            headless: args.headless,
        })
    }
}

impl Settings {
    pub fn args(args: Args) -> SettingsBuilder {
        let config_path = args.config.clone().or_else(|| {
            let mut path = dirs::home_dir()?;
            path.push(".config");
            path.push(env!("CARGO_BIN_NAME"));
            path.push(Config::DEFAULT_CONFIG_FILENAME);
            Some(path)
        });

        SettingsBuilder { config_path, args }
    }
}

impl From<&LogLevel> for Level {
    fn from(level: &LogLevel) -> Level {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Json => "json",
                Self::Plain => "plain",
                Self::Coloured => "coloured",
            }
        )
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Trace => "trace",
                Self::Debug => "debug",
                Self::Info => "info",
                Self::Warn => "warn",
                Self::Error => "error",
            }
        )
    }
}

impl fmt::Display for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Logging: [{}] ({})", self.level, self.format)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = &self.config;
        let separator = "─".repeat(14);
        writeln!(f, "{separator}")?;
        writeln!(f, "Settings")?;
        writeln!(f, "{separator}")?;
        match &self.config_path {
            Some(path) if path.exists() => {
                writeln!(f, "Config file: {}", path.display())?
            }
            _ => writeln!(f, "Config file: [Embedded defaults]")?,
        }
        writeln!(f, "{separator}")?;
        writeln!(f, "rpc: {}", config.rpc_url)?;
        writeln!(f, "chain id: {}", config.chain_id)?;
        writeln!(f, "profile contract: {}", config.profile_contract)?;
        writeln!(
            f,
            "verification contract: {}",
            config.verification_contract
        )?;
        writeln!(f, "sponsor: {}", config.sponsor_address)?;
        writeln!(f, "argument encoding: {}", config.arg_encoding)?;
        writeln!(f, "{separator}")?;
        writeln!(f, "{}", self.logging)
    }
}
