//! # Messages Module
//!
//! The consensus message model and the read-only logic applied to it before
//! the round state machine acts on a message or a certificate.
//!
//! ## Architecture
//!
//! ```text
//! types.rs       IbftMessage envelope, payload variants, certificates
//! extract.rs     discriminant-checked payload accessors
//! validation.rs  unique senders, prepared certificate set validation
//! error.rs       MessageError (batch extraction failures)
//! ```
//!
//! Everything in this module is a pure function of its arguments and is
//! safe to call from any number of threads without synchronization.

pub mod error;
pub mod extract;
pub mod types;
pub mod validation;

pub use error::MessageError;
pub use extract::{
    extract_commit_hash, extract_committed_seal, extract_committed_seals,
    extract_last_prepared_proposal, extract_latest_prepared_certificate, extract_prepare_hash,
    extract_proposal, extract_proposal_hash, extract_round_change_certificate,
};
pub use types::{
    CommitData, CommittedSeal, IbftMessage, MessageType, Payload, PrePrepareData,
    PrepareData, PreparedCertificate, Proposal, RoundChangeCertificate, RoundChangeData, View,
};
pub use validation::{has_unique_senders, is_valid_prepared_certificate_set, sender_set};
