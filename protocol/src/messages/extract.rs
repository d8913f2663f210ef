//! # Message Payload Extractor
//!
//! Typed accessors over [`IbftMessage`] payloads. Every accessor checks the
//! declared kind first and then the payload variant; if either disagrees
//! with what the accessor reads, the result is `None`. Nothing here ever
//! coerces one payload into another.
//!
//! A `None` means "absent". It is never a zero-valued hash, seal or
//! certificate, so callers cannot mistake a malformed message for a valid
//! one carrying default data.
//!
//! [`extract_committed_seals`] is the single exception to the no-failure
//! rule: a caller asking for a batch of commit seals has asserted the batch
//! is homogeneous, and is told with a [`MessageError`] when it is not.

use tracing::debug;

use super::{
    CommitData, CommittedSeal, IbftMessage, MessageError, MessageType, Payload, PrePrepareData,
    PreparedCertificate, PrepareData, Proposal, RoundChangeCertificate, RoundChangeData,
};
use crate::types::Hash;

// ---------------------------------------------------------------------------
// Discriminant-checked payload access
// ---------------------------------------------------------------------------

fn payload_of(message: &IbftMessage, expected: MessageType) -> Option<&Payload> {
    if message.kind != expected {
        return None;
    }
    message.payload.as_ref()
}

fn preprepare_data(message: &IbftMessage) -> Option<&PrePrepareData> {
    match payload_of(message, MessageType::Preprepare)? {
        Payload::Preprepare(data) => Some(data),
        _ => None,
    }
}

fn prepare_data(message: &IbftMessage) -> Option<&PrepareData> {
    match payload_of(message, MessageType::Prepare)? {
        Payload::Prepare(data) => Some(data),
        _ => None,
    }
}

fn commit_data(message: &IbftMessage) -> Option<&CommitData> {
    match payload_of(message, MessageType::Commit)? {
        Payload::Commit(data) => Some(data),
        _ => None,
    }
}

fn round_change_data(message: &IbftMessage) -> Option<&RoundChangeData> {
    match payload_of(message, MessageType::RoundChange)? {
        Payload::RoundChange(data) => Some(data),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// COMMIT
// ---------------------------------------------------------------------------

/// Extracts the committed seal of a COMMIT message, attributed to its sender.
pub fn extract_committed_seal(message: &IbftMessage) -> Option<CommittedSeal> {
    commit_data(message).map(|data| CommittedSeal {
        signer: message.from,
        signature: data.committed_seal.clone(),
    })
}

/// Extracts the committed seals of a batch of COMMIT messages, in order.
///
/// Fails on the first message whose declared kind is not COMMIT; no partial
/// result is returned then. A COMMIT envelope without commit data keeps its
/// slot as `None`, like every other point lookup.
pub fn extract_committed_seals<'a, I>(
    messages: I,
) -> Result<Vec<Option<CommittedSeal>>, MessageError>
where
    I: IntoIterator<Item = &'a IbftMessage>,
{
    let messages = messages.into_iter();
    let mut seals = Vec::with_capacity(messages.size_hint().0);

    for message in messages {
        if message.kind != MessageType::Commit {
            debug!(
                sender = %message.from,
                kind = %message.kind,
                "non-commit message in seal batch"
            );
            return Err(MessageError::WrongCommitMessageType {
                sender: message.from,
                kind: message.kind,
            });
        }

        let seal = extract_committed_seal(message);
        if seal.is_none() {
            debug!(
                sender = %message.from,
                "commit message without commit data in seal batch"
            );
        }
        seals.push(seal);
    }

    Ok(seals)
}

/// Extracts the proposal hash a COMMIT message commits to.
pub fn extract_commit_hash(message: &IbftMessage) -> Option<Hash> {
    commit_data(message).map(|data| data.proposal_hash)
}

// ---------------------------------------------------------------------------
// PREPREPARE
// ---------------------------------------------------------------------------

/// Extracts the proposal carried by a PREPREPARE message.
pub fn extract_proposal(message: &IbftMessage) -> Option<&Proposal> {
    preprepare_data(message)?.proposal.as_ref()
}

/// Extracts the proposal hash announced by a PREPREPARE message.
pub fn extract_proposal_hash(message: &IbftMessage) -> Option<Hash> {
    preprepare_data(message).map(|data| data.proposal_hash)
}

/// Extracts the round-change certificate justifying a PREPREPARE.
pub fn extract_round_change_certificate(message: &IbftMessage) -> Option<&RoundChangeCertificate> {
    preprepare_data(message)?.certificate.as_ref()
}

// ---------------------------------------------------------------------------
// PREPARE
// ---------------------------------------------------------------------------

/// Extracts the proposal hash a PREPARE message votes for.
pub fn extract_prepare_hash(message: &IbftMessage) -> Option<Hash> {
    prepare_data(message).map(|data| data.proposal_hash)
}

// ---------------------------------------------------------------------------
// ROUND_CHANGE
// ---------------------------------------------------------------------------

/// Extracts the latest prepared certificate carried by a ROUND_CHANGE.
pub fn extract_latest_prepared_certificate(message: &IbftMessage) -> Option<&PreparedCertificate> {
    round_change_data(message)?.latest_prepared_certificate.as_ref()
}

/// Extracts the last prepared proposal carried by a ROUND_CHANGE.
pub fn extract_last_prepared_proposal(message: &IbftMessage) -> Option<&Proposal> {
    round_change_data(message)?.last_prepared_proposal.as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::View;
    use crate::types::Address;

    fn view() -> View {
        View::new(10, 0)
    }

    fn addr(tag: &[u8]) -> Address {
        Address::from_slice(tag)
    }

    fn proposal() -> Proposal {
        Proposal {
            raw_proposal: b"block at height 10".to_vec(),
            round: 0,
        }
    }

    /// Same envelope, but the declared kind lies about the payload.
    fn relabel(mut message: IbftMessage, kind: MessageType) -> IbftMessage {
        message.kind = kind;
        message
    }

    fn strip_payload(mut message: IbftMessage) -> IbftMessage {
        message.payload = None;
        message
    }

    // -- COMMIT -------------------------------------------------------------

    #[test]
    fn committed_seal_from_commit() {
        let msg = IbftMessage::commit(view(), addr(b"A"), Hash::digest(b"p"), vec![7, 7, 7]);
        let seal = extract_committed_seal(&msg).unwrap();
        assert_eq!(seal.signer, addr(b"A"));
        assert_eq!(seal.signature, vec![7, 7, 7]);
    }

    #[test]
    fn committed_seal_absent_on_mismatch() {
        let prepare = IbftMessage::prepare(view(), addr(b"A"), Hash::digest(b"p"));
        assert!(extract_committed_seal(&prepare).is_none());

        // Declared COMMIT, carries prepare data.
        assert!(extract_committed_seal(&relabel(prepare, MessageType::Commit)).is_none());

        // Declared PREPARE, carries commit data.
        let commit = IbftMessage::commit(view(), addr(b"A"), Hash::digest(b"p"), vec![1]);
        assert!(extract_committed_seal(&relabel(commit, MessageType::Prepare)).is_none());
    }

    #[test]
    fn committed_seals_batch() {
        let hash = Hash::digest(b"p");
        let batch = vec![
            IbftMessage::commit(view(), addr(b"A"), hash, vec![1]),
            IbftMessage::commit(view(), addr(b"B"), hash, vec![2]),
        ];

        let seals = extract_committed_seals(&batch).unwrap();
        assert_eq!(
            seals,
            vec![
                Some(CommittedSeal {
                    signer: addr(b"A"),
                    signature: vec![1]
                }),
                Some(CommittedSeal {
                    signer: addr(b"B"),
                    signature: vec![2]
                }),
            ]
        );
    }

    #[test]
    fn committed_seals_empty_batch() {
        assert_eq!(extract_committed_seals(&[]).unwrap(), vec![]);
    }

    #[test]
    fn committed_seals_rejects_foreign_kind() {
        let hash = Hash::digest(b"p");
        let batch = vec![
            IbftMessage::commit(view(), addr(b"A"), hash, vec![1]),
            IbftMessage::prepare(view(), addr(b"B"), hash),
        ];

        assert_eq!(
            extract_committed_seals(&batch),
            Err(MessageError::WrongCommitMessageType {
                sender: addr(b"B"),
                kind: MessageType::Prepare,
            })
        );
    }

    #[test]
    fn committed_seals_keep_slot_for_hollow_commit() {
        let hash = Hash::digest(b"p");
        let batch = vec![
            IbftMessage::commit(view(), addr(b"A"), hash, vec![1]),
            strip_payload(IbftMessage::commit(view(), addr(b"B"), hash, vec![2])),
            IbftMessage::commit(view(), addr(b"C"), hash, vec![3]),
        ];

        let seals = extract_committed_seals(&batch).unwrap();
        assert_eq!(seals.len(), 3);
        assert_eq!(seals[0].as_ref().map(|s| s.signer), Some(addr(b"A")));
        assert!(seals[1].is_none());
        assert_eq!(seals[2].as_ref().map(|s| s.signature.clone()), Some(vec![3]));
    }

    #[test]
    fn committed_seals_keep_slot_for_mismatched_payload() {
        // Declared COMMIT, carries prepare data.
        let prepare = IbftMessage::prepare(view(), addr(b"A"), Hash::digest(b"p"));
        let batch = vec![relabel(prepare, MessageType::Commit)];

        assert_eq!(extract_committed_seals(&batch), Ok(vec![None]));
    }

    #[test]
    fn commit_hash() {
        let hash = Hash::digest(b"p");
        let msg = IbftMessage::commit(view(), addr(b"A"), hash, vec![]);
        assert_eq!(extract_commit_hash(&msg), Some(hash));
        assert_eq!(extract_commit_hash(&strip_payload(msg)), None);

        let prepare = IbftMessage::prepare(view(), addr(b"A"), hash);
        assert_eq!(extract_commit_hash(&prepare), None);
    }

    // -- PREPREPARE ---------------------------------------------------------

    #[test]
    fn preprepare_fields() {
        let hash = Hash::digest(b"block at height 10");
        let rcc = RoundChangeCertificate {
            round_change_messages: vec![IbftMessage::round_change(view(), addr(b"B"), None, None)],
        };
        let msg = IbftMessage::preprepare(view(), addr(b"A"), proposal(), hash, Some(rcc.clone()));

        assert_eq!(extract_proposal(&msg), Some(&proposal()));
        assert_eq!(extract_proposal_hash(&msg), Some(hash));
        assert_eq!(extract_round_change_certificate(&msg), Some(&rcc));
    }

    #[test]
    fn preprepare_without_certificate() {
        let msg = IbftMessage::preprepare(view(), addr(b"A"), proposal(), Hash::digest(b"x"), None);
        assert!(extract_round_change_certificate(&msg).is_none());
        assert!(extract_proposal(&msg).is_some());
    }

    #[test]
    fn preprepare_accessors_reject_other_kinds() {
        let hash = Hash::digest(b"x");
        let prepare = IbftMessage::prepare(view(), addr(b"A"), hash);
        assert!(extract_proposal(&prepare).is_none());
        assert!(extract_proposal_hash(&prepare).is_none());
        assert!(extract_round_change_certificate(&prepare).is_none());

        let lying = relabel(prepare, MessageType::Preprepare);
        assert!(extract_proposal_hash(&lying).is_none());
    }

    #[test]
    fn present_zero_hash_is_not_absent() {
        let msg = IbftMessage::preprepare(view(), addr(b"A"), proposal(), Hash::ZERO, None);
        assert_eq!(extract_proposal_hash(&msg), Some(Hash::ZERO));
    }

    // -- PREPARE ------------------------------------------------------------

    #[test]
    fn prepare_hash() {
        let hash = Hash::digest(b"x");
        let msg = IbftMessage::prepare(view(), addr(b"A"), hash);
        assert_eq!(extract_prepare_hash(&msg), Some(hash));

        let commit = IbftMessage::commit(view(), addr(b"A"), hash, vec![]);
        assert_eq!(extract_prepare_hash(&commit), None);
        assert_eq!(extract_prepare_hash(&relabel(commit, MessageType::Prepare)), None);
    }

    // -- ROUND_CHANGE -------------------------------------------------------

    #[test]
    fn round_change_fields() {
        let hash = Hash::digest(b"x");
        let pc = PreparedCertificate {
            proposal_message: Some(Box::new(IbftMessage::preprepare(
                view(),
                addr(b"A"),
                proposal(),
                hash,
                None,
            ))),
            prepare_messages: vec![IbftMessage::prepare(view(), addr(b"B"), hash)],
        };
        let msg = IbftMessage::round_change(
            View::new(10, 1),
            addr(b"C"),
            Some(proposal()),
            Some(pc.clone()),
        );

        assert_eq!(extract_latest_prepared_certificate(&msg), Some(&pc));
        assert_eq!(extract_last_prepared_proposal(&msg), Some(&proposal()));
    }

    #[test]
    fn round_change_fields_absent() {
        let empty = IbftMessage::round_change(view(), addr(b"C"), None, None);
        assert!(extract_latest_prepared_certificate(&empty).is_none());
        assert!(extract_last_prepared_proposal(&empty).is_none());

        let commit = IbftMessage::commit(view(), addr(b"C"), Hash::digest(b"x"), vec![]);
        assert!(extract_latest_prepared_certificate(&commit).is_none());
        assert!(extract_last_prepared_proposal(&commit).is_none());

        let hollow = strip_payload(IbftMessage::round_change(
            view(),
            addr(b"C"),
            Some(proposal()),
            None,
        ));
        assert!(extract_last_prepared_proposal(&hollow).is_none());
    }
}
