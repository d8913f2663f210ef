//! # Message Set Validation
//!
//! Pure predicates over groups of messages. They decide whether a group is
//! structurally fit to form a certificate; they do not check signatures and
//! they do not count voting power (see
//! [`ValidatorManager`](crate::validators::ValidatorManager) for that).
//!
//! A prepared certificate is accepted only if every message:
//!
//! 1. is for the expected height,
//! 2. is for the same round as the first message, and that round is below
//!    the caller's round limit,
//! 3. is a PREPREPARE or a PREPARE whose hash can be extracted,
//! 4. carries the same proposal hash as the first message,
//! 5. comes from a sender not seen earlier in the set.

use std::collections::HashSet;

use tracing::debug;

use super::extract::{extract_prepare_hash, extract_proposal_hash};
use super::{IbftMessage, MessageType};
use crate::types::{Address, Hash};

/// True if the set is non-empty and no two messages share a sender.
pub fn has_unique_senders<'a, I>(messages: I) -> bool
where
    I: IntoIterator<Item = &'a IbftMessage>,
{
    let mut seen = HashSet::new();
    let mut empty = true;

    for message in messages {
        empty = false;
        if !seen.insert(message.from) {
            return false;
        }
    }

    !empty
}

/// Collects the distinct senders of a message set.
///
/// A sender that appears twice is counted once, which is the form
/// [`ValidatorManager::has_quorum`](crate::validators::ValidatorManager::has_quorum)
/// expects.
pub fn sender_set<'a, I>(messages: I) -> HashSet<Address>
where
    I: IntoIterator<Item = &'a IbftMessage>,
{
    messages.into_iter().map(|message| message.from).collect()
}

/// Checks that `messages` can form one prepared certificate at `height`,
/// for a round strictly below `round_limit`.
///
/// Short-circuits to `false` on the first violation. An empty set is never
/// valid.
pub fn is_valid_prepared_certificate_set<'a, I>(messages: I, height: u64, round_limit: u64) -> bool
where
    I: IntoIterator<Item = &'a IbftMessage>,
{
    let mut messages = messages.into_iter().peekable();

    let round = match messages.peek() {
        Some(first) => first.view.round,
        None => return reject("empty message set", None),
    };

    let mut senders = HashSet::new();
    let mut reference_hash: Option<Hash> = None;

    for message in messages {
        if message.view.height != height {
            return reject("height mismatch", Some(message));
        }

        if message.view.round != round || message.view.round >= round_limit {
            return reject("round mismatch or beyond limit", Some(message));
        }

        let Some(hash) = certificate_message_hash(message) else {
            return reject("not a prepared certificate message", Some(message));
        };

        match reference_hash {
            None => reference_hash = Some(hash),
            Some(reference) if reference != hash => {
                return reject("proposal hash mismatch", Some(message));
            }
            Some(_) => {}
        }

        if !senders.insert(message.from) {
            return reject("duplicate sender", Some(message));
        }
    }

    true
}

/// The proposal hash a message contributes to a prepared certificate.
/// COMMIT and ROUND_CHANGE messages never belong to one.
fn certificate_message_hash(message: &IbftMessage) -> Option<Hash> {
    match message.kind {
        MessageType::Preprepare => extract_proposal_hash(message),
        MessageType::Prepare => extract_prepare_hash(message),
        MessageType::Commit | MessageType::RoundChange => None,
    }
}

fn reject(reason: &'static str, message: Option<&IbftMessage>) -> bool {
    match message {
        Some(m) => debug!(
            reason,
            sender = %m.from,
            view = %m.view,
            kind = %m.kind,
            "prepared certificate rejected"
        ),
        None => debug!(reason, "prepared certificate rejected"),
    }
    false
}
