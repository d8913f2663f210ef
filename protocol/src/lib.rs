// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # IBFT Protocol Safety Core
//!
//! The part of an IBFT consensus engine that decides whether the protocol
//! may safely advance: voting-power-weighted quorum checks over a dynamic
//! validator set, and structural validation of the messages and certificates
//! that justify each step.
//!
//! Everything around it is someone else's problem and is reached only
//! through plain data: the transport hands us decoded messages, the
//! epoch logic hands us voting-power tables, and the round state machine
//! asks yes/no questions. Signatures are never verified here.
//!
//! ## Modules
//!
//! - **types**: `Address` and `Hash`, with hex text and serde forms.
//! - **messages**: the message envelope, payload extractors, and
//!   prepared-certificate set validation.
//! - **validators**: the `ValidatorManager` and its quorum rule.
//! - **config**: protocol constants.
//!
//! ## Ground Rules
//!
//! 1. A malformed message yields `None`, never a zero value pretending to
//!    be data.
//! 2. A sender is counted once, whatever it sends.
//! 3. Only current validators carry voting power.

pub mod config;
pub mod messages;
pub mod types;
pub mod validators;

pub use messages::{CommittedSeal, IbftMessage, MessageError, MessageType, View};
pub use types::{Address, Hash};
pub use validators::{ValidatorManager, ValidatorManagerError, VotingPowers};
