//! # Validator Manager
//!
//! Owns the voting-power table of the current validator set and answers one
//! question for the round state machine: do these signers carry a Byzantine
//! quorum?
//!
//! ## Quorum
//!
//! With `total` the summed voting power of the current set, the threshold is
//!
//! ```text
//! quorum(total) = floor(2 * total / 3) + 1
//! ```
//!
//! For `total = 3f + 1` this is exactly `2f + 1`: any two quorums then
//! overlap in at least `f + 1` voting power, so at least one honest
//! validator sits in both. Signers that are not in the current table
//! contribute nothing, which keeps unknown or previous-epoch identities
//! from counting.
//!
//! ## Concurrency
//!
//! [`set_voting_power`](ValidatorManager::set_voting_power) takes the write
//! lock; every query takes the read lock. Queries run in parallel with each
//! other and never overlap a table swap.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::Zero;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::{ValidatorBackend, ValidatorManagerError};
use crate::config::{QUORUM_DENOMINATOR, QUORUM_NUMERATOR};
use crate::messages::IbftMessage;
use crate::types::Address;

/// Voting power per validator address for one validator set.
pub type VotingPowers = HashMap<Address, BigUint>;

/// Minimum voting power that constitutes a Byzantine quorum of `total`.
pub fn quorum_threshold(total: &BigUint) -> BigUint {
    total * QUORUM_NUMERATOR / QUORUM_DENOMINATOR + 1u32
}

// ---------------------------------------------------------------------------
// Power Table
// ---------------------------------------------------------------------------

/// A validator set with its derived totals, immutable once built.
#[derive(Debug)]
struct PowerTable {
    powers: VotingPowers,
    total: BigUint,
    quorum: BigUint,
}

impl PowerTable {
    fn new(powers: VotingPowers) -> Self {
        let total: BigUint = powers.values().sum();
        let quorum = quorum_threshold(&total);
        Self {
            powers,
            total,
            quorum,
        }
    }

    /// Summed power of the given signers. Unknown addresses count zero.
    fn signed_power<'a>(&self, signers: impl IntoIterator<Item = &'a Address>) -> BigUint {
        signers
            .into_iter()
            .filter_map(|signer| self.powers.get(signer))
            .sum()
    }
}

impl Default for PowerTable {
    fn default() -> Self {
        Self::new(VotingPowers::new())
    }
}

// ---------------------------------------------------------------------------
// Validator Manager
// ---------------------------------------------------------------------------

/// Thread-safe holder of the current voting-power table.
///
/// Starts with an empty table, under which no signer set reaches quorum.
/// Callers only ever get owned answers back; the table itself never leaves
/// the lock.
#[derive(Default)]
pub struct ValidatorManager {
    table: RwLock<PowerTable>,
    backend: Option<Arc<dyn ValidatorBackend>>,
}

impl ValidatorManager {
    /// Creates a manager without a backend. Tables must be installed with
    /// [`set_voting_power`](Self::set_voting_power).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager that loads tables from `backend` on
    /// [`init`](Self::init).
    pub fn with_backend(backend: Arc<dyn ValidatorBackend>) -> Self {
        Self {
            table: RwLock::new(PowerTable::default()),
            backend: Some(backend),
        }
    }

    /// Loads and installs the validator set in force at `height`.
    ///
    /// On error the current table is left untouched.
    pub fn init(&self, height: u64) -> Result<(), ValidatorManagerError> {
        let backend = self
            .backend
            .as_ref()
            .ok_or(ValidatorManagerError::BackendNotSet)?;

        let powers = backend.voting_powers(height)?;
        debug!(height, validators = powers.len(), "validator set loaded from backend");
        self.set_voting_power(powers);
        Ok(())
    }

    /// Replaces the current table with `powers`.
    ///
    /// An empty table is accepted: its total is zero, its quorum is one, and
    /// nothing can reach it.
    pub fn set_voting_power(&self, powers: VotingPowers) {
        let table = PowerTable::new(powers);

        info!(
            validators = table.powers.len(),
            total = %table.total,
            quorum = %table.quorum,
            "voting power table installed"
        );

        *self.table.write() = table;
    }

    /// True if the summed voting power of `signers` that belong to the
    /// current set reaches the quorum threshold.
    pub fn has_quorum(&self, signers: &HashSet<Address>) -> bool {
        let table = self.table.read();
        table.signed_power(signers) >= table.quorum
    }

    /// Quorum check for a prepared certificate: the proposer of
    /// `proposal_message` plus the senders of `prepare_messages`.
    ///
    /// The proposer never sends its own PREPARE. If it shows up among the
    /// prepare senders the certificate is trying to count it twice, and the
    /// answer is `false`.
    pub fn has_prepare_quorum(
        &self,
        proposal_message: &IbftMessage,
        prepare_messages: &[IbftMessage],
    ) -> bool {
        let proposer = proposal_message.from;
        let mut signers = HashSet::with_capacity(prepare_messages.len() + 1);

        for message in prepare_messages {
            if message.from == proposer {
                warn!(%proposer, "proposer is among prepare senders");
                return false;
            }
            signers.insert(message.from);
        }
        signers.insert(proposer);

        self.has_quorum(&signers)
    }

    /// Quorum threshold of the current table.
    pub fn quorum_size(&self) -> BigUint {
        self.table.read().quorum.clone()
    }

    /// Summed voting power of the current table.
    pub fn total_voting_power(&self) -> BigUint {
        self.table.read().total.clone()
    }

    /// Voting power of `address`, or `None` if it is not a current validator.
    pub fn voting_power_of(&self, address: &Address) -> Option<BigUint> {
        self.table.read().powers.get(address).cloned()
    }

    /// True if `address` is in the current table, even with zero power.
    pub fn is_validator(&self, address: &Address) -> bool {
        self.table.read().powers.contains_key(address)
    }

    pub fn validator_count(&self) -> usize {
        self.table.read().powers.len()
    }

    /// True if the current table carries no voting power at all.
    pub fn is_powerless(&self) -> bool {
        self.table.read().total.is_zero()
    }
}
