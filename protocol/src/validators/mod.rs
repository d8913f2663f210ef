//! # Validators Module
//!
//! Voting-power bookkeeping for the current validator set and the Byzantine
//! quorum rule built on it.
//!
//! ## Architecture
//!
//! ```text
//! manager.rs  ValidatorManager: current table behind a RwLock, quorum checks
//! backend.rs  ValidatorBackend trait + ValidatorSchedule (height -> table)
//! ```
//!
//! ## Design Decisions
//!
//! - The table is replaced wholesale, never patched. A new table (with its
//!   total and quorum precomputed) is built outside the lock and swapped in
//!   under the write lock, so a reader sees either the old table or the new
//!   one and nothing in between.
//! - `parking_lot::RwLock` rather than `std::sync::RwLock`: no poisoning to
//!   handle, and quorum checks vastly outnumber table swaps.
//! - Voting power is a `BigUint`. It cannot go negative and it cannot
//!   overflow when summed.

pub mod backend;
pub mod manager;

pub use backend::{ValidatorBackend, ValidatorSchedule};
pub use manager::{quorum_threshold, ValidatorManager, VotingPowers};

use thiserror::Error;

/// Errors raised while loading a validator set.
///
/// Quorum checks themselves never fail; an unusable table simply makes
/// quorum unreachable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidatorManagerError {
    /// [`ValidatorManager::init`] was called on a manager built without a
    /// backend.
    #[error("validator backend not set")]
    BackendNotSet,

    /// The backend has no validator set for the requested height.
    #[error("no validator set known for height {0}")]
    UnknownHeight(u64),

    /// The backend failed to produce a validator set.
    #[error("validator backend failed at height {height}: {reason}")]
    Backend {
        /// Height that was requested.
        height: u64,
        /// Backend-specific failure description.
        reason: String,
    },
}
