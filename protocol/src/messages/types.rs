//! # Consensus Message Model
//!
//! An [`IbftMessage`] is an envelope: a [`View`], a sender, a signature, a
//! declared [`MessageType`], and a [`Payload`]. On the wire the declared
//! type and the payload variant are separate fields, so a peer can send an
//! envelope that claims to be a PREPARE but carries commit data, or carries
//! nothing at all. Both fields are kept here exactly as received; the
//! extractors in [`super::extract`] check the discriminant before touching
//! the payload.
//!
//! ```text
//! IbftMessage
//! ├── view: View { height, round }
//! ├── from: Address
//! ├── signature: bytes             (never verified in this crate)
//! ├── type: MessageType
//! └── payload: Option<Payload>
//!     ├── PREPREPARE   { proposal, proposal_hash, certificate: RCC? }
//!     ├── PREPARE      { proposal_hash }
//!     ├── COMMIT       { proposal_hash, committed_seal }
//!     └── ROUND_CHANGE { last_prepared_proposal?, latest_prepared_certificate? }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Address, Hash};

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// The `(height, round)` pair identifying one consensus attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct View {
    /// Block height being decided.
    pub height: u64,
    /// Attempt number within the height. Resets to 0 at each new height.
    pub round: u64,
}

impl View {
    pub fn new(height: u64, round: u64) -> Self {
        Self { height, round }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.height, self.round)
    }
}

// ---------------------------------------------------------------------------
// Message Type
// ---------------------------------------------------------------------------

/// Declared kind of a consensus message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Preprepare,
    Prepare,
    Commit,
    RoundChange,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preprepare => "PREPREPARE",
            Self::Prepare => "PREPARE",
            Self::Commit => "COMMIT",
            Self::RoundChange => "ROUND_CHANGE",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Proposal & Certificates
// ---------------------------------------------------------------------------

/// A proposed block, opaque to this crate, tagged with the round it was
/// proposed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Serialized block. Construction and application happen elsewhere.
    #[serde(with = "crate::types::hex_bytes")]
    pub raw_proposal: Vec<u8>,
    /// Round in which this proposal was made.
    pub round: u64,
}

/// A validator's attestation to a committed proposal hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedSeal {
    /// Validator that produced the seal.
    pub signer: Address,
    /// Seal bytes. Verifying them is the signer backend's job.
    #[serde(with = "crate::types::hex_bytes")]
    pub signature: Vec<u8>,
}

/// Proof that a quorum prepared a proposal in some round: the proposer's
/// PREPREPARE plus the PREPARE votes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreparedCertificate {
    /// The PREPREPARE that carried the proposal.
    pub proposal_message: Option<Box<IbftMessage>>,
    /// PREPARE votes for the proposal hash.
    pub prepare_messages: Vec<IbftMessage>,
}

impl PreparedCertificate {
    /// The proposal message (if present) followed by every prepare message,
    /// in the order [`is_valid_prepared_certificate_set`] expects them.
    ///
    /// [`is_valid_prepared_certificate_set`]: super::is_valid_prepared_certificate_set
    pub fn messages(&self) -> impl Iterator<Item = &IbftMessage> {
        self.proposal_message
            .as_deref()
            .into_iter()
            .chain(self.prepare_messages.iter())
    }
}

/// ROUND_CHANGE messages justifying a move to a new round.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundChangeCertificate {
    pub round_change_messages: Vec<IbftMessage>,
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrePrepareData {
    pub proposal: Option<Proposal>,
    pub proposal_hash: Hash,
    /// Present when the proposal is made in a round > 0.
    pub certificate: Option<RoundChangeCertificate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareData {
    pub proposal_hash: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitData {
    pub proposal_hash: Hash,
    #[serde(with = "crate::types::hex_bytes")]
    pub committed_seal: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundChangeData {
    pub last_prepared_proposal: Option<Proposal>,
    pub latest_prepared_certificate: Option<PreparedCertificate>,
}

/// The variant-specific body of a message. Exactly one per message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Payload {
    Preprepare(PrePrepareData),
    Prepare(PrepareData),
    Commit(CommitData),
    RoundChange(RoundChangeData),
}

impl Payload {
    /// The message kind this payload variant belongs to.
    pub fn kind(&self) -> MessageType {
        match self {
            Self::Preprepare(_) => MessageType::Preprepare,
            Self::Prepare(_) => MessageType::Prepare,
            Self::Commit(_) => MessageType::Commit,
            Self::RoundChange(_) => MessageType::RoundChange,
        }
    }
}

// ---------------------------------------------------------------------------
// IbftMessage
// ---------------------------------------------------------------------------

/// A consensus message envelope, immutable once handed to this crate.
///
/// The typed constructors always produce an envelope whose declared kind
/// matches its payload. The fields stay public because envelopes decoded
/// from the network carry no such guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbftMessage {
    pub view: View,
    pub from: Address,
    #[serde(default, with = "crate::types::hex_bytes")]
    pub signature: Vec<u8>,
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default)]
    pub payload: Option<Payload>,
}

impl IbftMessage {
    /// Creates an unsigned message whose declared kind is taken from the
    /// payload.
    pub fn new(view: View, from: Address, payload: Payload) -> Self {
        Self {
            view,
            from,
            signature: Vec::new(),
            kind: payload.kind(),
            payload: Some(payload),
        }
    }

    pub fn preprepare(
        view: View,
        from: Address,
        proposal: Proposal,
        proposal_hash: Hash,
        certificate: Option<RoundChangeCertificate>,
    ) -> Self {
        Self::new(
            view,
            from,
            Payload::Preprepare(PrePrepareData {
                proposal: Some(proposal),
                proposal_hash,
                certificate,
            }),
        )
    }

    pub fn prepare(view: View, from: Address, proposal_hash: Hash) -> Self {
        Self::new(view, from, Payload::Prepare(PrepareData { proposal_hash }))
    }

    pub fn commit(view: View, from: Address, proposal_hash: Hash, committed_seal: Vec<u8>) -> Self {
        Self::new(
            view,
            from,
            Payload::Commit(CommitData {
                proposal_hash,
                committed_seal,
            }),
        )
    }

    pub fn round_change(
        view: View,
        from: Address,
        last_prepared_proposal: Option<Proposal>,
        latest_prepared_certificate: Option<PreparedCertificate>,
    ) -> Self {
        Self::new(
            view,
            from,
            Payload::RoundChange(RoundChangeData {
                last_prepared_proposal,
                latest_prepared_certificate,
            }),
        )
    }

    /// Attaches a signature. Signing itself happens outside this crate.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    /// True if a payload is present and its variant matches the declared
    /// kind.
    pub fn is_well_formed(&self) -> bool {
        matches!(&self.payload, Some(payload) if payload.kind() == self.kind)
    }
}
