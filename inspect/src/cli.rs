//! # CLI Interface
//!
//! Defines the command-line argument structure for `ibft-inspect` using
//! `clap` derive. Supports four subcommands: `quorum`, `certificate`,
//! `seals`, and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ibft_protocol::Address;

use crate::logging::LogFormat;

/// Offline IBFT safety checks.
///
/// Answers the questions a round state machine asks of the safety core
/// (is this a quorum, is this prepared certificate well formed, what are
/// the committed seals of this batch) against JSON files on disk.
#[derive(Parser, Debug)]
#[command(
    name = "ibft-inspect",
    about = "Offline quorum and certificate checks for IBFT message sets",
    version,
    propagate_version = true
)]
pub struct InspectCli {
    /// Log output format.
    #[arg(long, global = true, value_enum, env = "IBFT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "IBFT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Weigh a set of signers against a validator table.
    Quorum(QuorumArgs),
    /// Validate a prepared certificate given as a message list.
    Certificate(CertificateArgs),
    /// Extract committed seals from a batch of COMMIT messages.
    Seals(SealsArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `quorum` subcommand.
#[derive(Args, Debug)]
pub struct QuorumArgs {
    /// Validator table: a JSON object of `"0x<address>": "<voting power>"`.
    #[arg(long, short = 'v')]
    pub validators: PathBuf,

    /// Comma-separated signer addresses. Repeats are counted once.
    #[arg(long, short = 's', value_delimiter = ',', num_args = 0..)]
    pub signers: Vec<Address>,
}

/// Arguments for the `certificate` subcommand.
#[derive(Args, Debug)]
pub struct CertificateArgs {
    /// JSON array of messages: the proposal first, then its prepares.
    #[arg(long, short = 'm')]
    pub messages: PathBuf,

    /// Height the certificate must belong to.
    #[arg(long)]
    pub height: u64,

    /// Exclusive upper bound on the certificate's round.
    #[arg(long)]
    pub round_limit: u64,

    /// Optional validator table. When given, prepare quorum is checked too.
    #[arg(long, short = 'v')]
    pub validators: Option<PathBuf>,
}

/// Arguments for the `seals` subcommand.
#[derive(Args, Debug)]
pub struct SealsArgs {
    /// JSON array of COMMIT messages.
    #[arg(long, short = 'm')]
    pub messages: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        InspectCli::command().debug_assert();
    }

    #[test]
    fn parses_signer_list() {
        let cli = InspectCli::try_parse_from([
            "ibft-inspect",
            "quorum",
            "--validators",
            "v.json",
            "--signers",
            "0x0000000000000000000000000000000000000001,\
             0x0000000000000000000000000000000000000002,\
             0x0000000000000000000000000000000000000001",
        ])
        .unwrap();

        match cli.command {
            Commands::Quorum(args) => {
                assert_eq!(args.signers.len(), 3);
                assert_eq!(args.signers[0], args.signers[2]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_signer() {
        let result = InspectCli::try_parse_from([
            "ibft-inspect",
            "quorum",
            "--validators",
            "v.json",
            "--signers",
            "0xnot-hex",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn certificate_requires_height_and_round_limit() {
        let result =
            InspectCli::try_parse_from(["ibft-inspect", "certificate", "--messages", "m.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn log_format_is_global() {
        let cli = InspectCli::try_parse_from(["ibft-inspect", "version", "--log-format", "json"])
            .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
