//! Sources of validator sets.

use std::collections::BTreeMap;

use super::{ValidatorManagerError, VotingPowers};

/// Supplies the voting-power table in force at a given height.
///
/// Implemented by whatever owns validator-set rotation (staking state, a
/// genesis file, an epoch contract). The [`ValidatorManager`] only asks.
///
/// [`ValidatorManager`]: super::ValidatorManager
pub trait ValidatorBackend: Send + Sync {
    /// Returns the full voting-power table for `height`.
    fn voting_powers(&self, height: u64) -> Result<VotingPowers, ValidatorManagerError>;
}

/// A fixed schedule of validator sets keyed by activation height.
///
/// The set in force at height `h` is the one with the greatest activation
/// height `<= h`. Heights before the first activation are unknown.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSchedule {
    epochs: BTreeMap<u64, VotingPowers>,
}

impl ValidatorSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_epoch(mut self, activation_height: u64, powers: VotingPowers) -> Self {
        self.insert(activation_height, powers);
        self
    }

    /// Registers `powers` as the set from `activation_height` onwards,
    /// replacing any set previously registered at that exact height.
    pub fn insert(&mut self, activation_height: u64, powers: VotingPowers) {
        self.epochs.insert(activation_height, powers);
    }

    /// Number of registered epochs.
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}

impl ValidatorBackend for ValidatorSchedule {
    fn voting_powers(&self, height: u64) -> Result<VotingPowers, ValidatorManagerError> {
        self.epochs
            .range(..=height)
            .next_back()
            .map(|(_, powers)| powers.clone())
            .ok_or(ValidatorManagerError::UnknownHeight(height))
    }
}
