// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # IBFT Inspect
//!
//! Entry point for the `ibft-inspect` binary. Parses CLI arguments,
//! initializes logging, loads JSON inputs, and prints the verdict of the
//! safety core as JSON on stdout.
//!
//! The binary supports four subcommands:
//!
//! - `quorum`: weigh signers against a validator table
//! - `certificate`: validate a prepared certificate
//! - `seals`: extract committed seals from a COMMIT batch
//! - `version`: print build version information

mod cli;
mod commands;
mod input;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use cli::{Commands, InspectCli};

fn main() -> Result<()> {
    let cli = InspectCli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }

    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Quorum(args) => {
            let powers = input::load_voting_powers(&args.validators)?;
            let report = commands::quorum(powers, &args.signers);
            tracing::info!(has_quorum = report.has_quorum, "quorum checked");
            print_json(&report)
        }
        Commands::Certificate(args) => {
            let messages = input::load_messages(&args.messages)?;
            let powers = args
                .validators
                .as_deref()
                .map(input::load_voting_powers)
                .transpose()?;
            let report = commands::certificate(&messages, args.height, args.round_limit, powers);
            tracing::info!(
                valid = report.valid_prepared_certificate,
                "prepared certificate checked"
            );
            print_json(&report)
        }
        Commands::Seals(args) => {
            let messages = input::load_messages(&args.messages)?;
            let seals = commands::seals(&messages)?;
            tracing::info!(
                seals = seals.iter().flatten().count(),
                messages = seals.len(),
                "committed seals extracted"
            );
            print_json(&seals)
        }
        Commands::Version => Ok(()),
    }
}

/// Writes `value` to stdout as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("ibft-inspect {}", env!("CARGO_PKG_VERSION"));
    println!("protocol     {}", ibft_protocol::config::PROTOCOL_VERSION);
    println!("rustc        {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
