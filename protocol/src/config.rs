//! # Protocol Configuration & Constants
//!
//! Every fixed number the quorum and certificate logic depends on lives here.
//! These values are part of the consensus rules: two nodes that disagree on
//! any of them will disagree on whether a certificate is valid, and that is
//! a fork.

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Version of the consensus rules implemented by this crate.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Identifier Sizes
// ---------------------------------------------------------------------------

/// Validator address length in bytes. Addresses are opaque to this crate;
/// only their length is fixed.
pub const ADDRESS_LENGTH: usize = 20;

/// Proposal hash length in bytes.
pub const HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Quorum
// ---------------------------------------------------------------------------

/// Numerator of the Byzantine quorum fraction.
///
/// The threshold is `floor(total * QUORUM_NUMERATOR / QUORUM_DENOMINATOR) + 1`.
/// For `total = 3f + 1` that is exactly `2f + 1`.
pub const QUORUM_NUMERATOR: u32 = 2;

/// Denominator of the Byzantine quorum fraction.
pub const QUORUM_DENOMINATOR: u32 = 3;
