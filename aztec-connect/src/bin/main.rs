// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

mod command;
mod io;
mod settings;

pub(crate) use command::{Command, RunResult};

use aztec_connect::Config;
use clap::Parser;
use tracing::Level;

use crate::io::Args;
use crate::settings::{LogFormat, Settings};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(err) = exec().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn exec() -> anyhow::Result<()> {
    // parse user args
    let args = Args::parse();
    let cmd = args.command.clone();

    // Get the initial settings from the args
    let settings_builder = Settings::args(args);

    // load configuration (or use the embedded default)
    let config_path = settings_builder.config_path().map(|p| p.as_path());
    let cfg = Config::load(config_path)?;

    // Finally complete the settings with the loaded configuration
    let settings = settings_builder.config(cfg)?;

    // generate a subscriber with the desired log level
    let level = &settings.logging.level;
    let level: Level = level.into();
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);

    // set the subscriber as global
    match settings.logging.format {
        LogFormat::Json => {
            let subscriber = subscriber.json().flatten_event(true).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Plain => {
            let subscriber = subscriber.with_ansi(false).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Coloured => {
            let subscriber = subscriber.finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    };

    match cmd.run(&settings).await? {
        RunResult::Settings => println!("{settings}"),
        result => println!("{result}"),
    }

    Ok(())
}
