//! Error types for message extraction.

use thiserror::Error;

use super::MessageType;
use crate::types::Address;

/// Hard failures of batch extraction.
///
/// Point lookups never fail; they return `None` for anything malformed.
/// Only a caller that asked for a homogeneous batch gets an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// A non-COMMIT message was found in a batch of commit messages.
    #[error("wrong type message is included in COMMIT messages: {kind} from {sender}")]
    WrongCommitMessageType {
        /// Sender of the offending message.
        sender: Address,
        /// Its declared kind.
        kind: MessageType,
    },
}
