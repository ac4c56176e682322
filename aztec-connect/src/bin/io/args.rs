// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::path::PathBuf;

use clap::Parser;

use crate::settings::{LogFormat, LogLevel};
use crate::Command;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Connect to an Aztec node, manage profiles and check verifications."
)]
pub(crate) struct Args {
    /// Configuration file [default: `$HOME/.config/aztec-connect/config.toml`]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The node JSON-RPC fully qualified URL
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Print status messages as log lines instead of a status line
    #[arg(long)]
    pub headless: bool,

    /// Output log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Logging output type
    #[arg(long, value_enum, default_value_t = LogFormat::Coloured)]
    pub log_type: LogFormat,

    /// Command
    #[command(subcommand)]
    pub command: Command,
}
