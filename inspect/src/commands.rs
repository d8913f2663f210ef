//! # Subcommand Implementations
//!
//! Each command turns its inputs into a serializable report. A `false`
//! verdict is part of the report, not an error: errors are reserved for
//! unreadable input and for seal batches the protocol refuses outright.

use std::collections::HashSet;

use anyhow::{Context, Result};
use num_bigint::BigUint;
use serde::Serialize;

use ibft_protocol::messages::{
    extract_committed_seals, has_unique_senders, is_valid_prepared_certificate_set,
};
use ibft_protocol::{Address, CommittedSeal, IbftMessage, ValidatorManager, VotingPowers};

/// Outcome of `quorum`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct QuorumReport {
    pub validators: usize,
    pub total_voting_power: String,
    pub quorum_size: String,
    pub signers: usize,
    /// Signers present in the table, zero-power members included.
    pub known_signers: usize,
    pub signed_voting_power: String,
    pub has_quorum: bool,
}

/// Weighs `signers` against `powers`. Repeated signers count once.
pub fn quorum(powers: VotingPowers, signers: &[Address]) -> QuorumReport {
    let vm = ValidatorManager::new();
    vm.set_voting_power(powers);

    let signers: HashSet<Address> = signers.iter().copied().collect();
    let known: Vec<BigUint> = signers.iter().filter_map(|s| vm.voting_power_of(s)).collect();
    let signed: BigUint = known.iter().sum();

    QuorumReport {
        validators: vm.validator_count(),
        total_voting_power: vm.total_voting_power().to_string(),
        quorum_size: vm.quorum_size().to_string(),
        signers: signers.len(),
        known_signers: known.len(),
        signed_voting_power: signed.to_string(),
        has_quorum: vm.has_quorum(&signers),
    }
}

/// Outcome of `certificate`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CertificateReport {
    pub messages: usize,
    pub height: u64,
    pub round_limit: u64,
    pub unique_senders: bool,
    pub valid_prepared_certificate: bool,
    /// Present only when a validator table was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_prepare_quorum: Option<bool>,
}

/// Checks a prepared certificate laid out as proposal message followed by
/// its prepares.
pub fn certificate(
    messages: &[IbftMessage],
    height: u64,
    round_limit: u64,
    powers: Option<VotingPowers>,
) -> CertificateReport {
    let has_prepare_quorum = powers.map(|powers| match messages.split_first() {
        Some((proposal, prepares)) => {
            let vm = ValidatorManager::new();
            vm.set_voting_power(powers);
            vm.has_prepare_quorum(proposal, prepares)
        }
        None => false,
    });

    CertificateReport {
        messages: messages.len(),
        height,
        round_limit,
        unique_senders: has_unique_senders(messages),
        valid_prepared_certificate: is_valid_prepared_certificate_set(
            messages,
            height,
            round_limit,
        ),
        has_prepare_quorum,
    }
}

/// Extracts the committed seals of a COMMIT batch, in message order. A
/// COMMIT without commit data keeps its position as `null`.
pub fn seals(messages: &[IbftMessage]) -> Result<Vec<Option<CommittedSeal>>> {
    extract_committed_seals(messages).context("cannot extract committed seals")
}
