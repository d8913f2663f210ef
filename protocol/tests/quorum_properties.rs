//! Property and concurrency tests for quorum determination and sender
//! uniqueness.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use num_bigint::BigUint;
use proptest::prelude::*;

use ibft_protocol::messages::{has_unique_senders, IbftMessage, View};
use ibft_protocol::types::{Address, Hash};
use ibft_protocol::validators::{quorum_threshold, ValidatorManager, VotingPowers};

fn addr(i: usize) -> Address {
    Address::from_slice(&(i as u64).to_be_bytes())
}

fn table(powers: &[u64]) -> VotingPowers {
    powers
        .iter()
        .enumerate()
        .map(|(i, p)| (addr(i), BigUint::from(*p)))
        .collect()
}

proptest! {
    /// With N unit-power validators the threshold is floor(2N/3) + 1.
    #[test]
    fn unit_power_threshold(n in 0u64..10_000) {
        let vm = ValidatorManager::new();
        vm.set_voting_power(table(&vec![1; n as usize]));
        prop_assert_eq!(vm.quorum_size(), BigUint::from(2 * n / 3 + 1));
    }

    /// Any quorum holds strictly more than two thirds of the total.
    #[test]
    fn threshold_exceeds_two_thirds(total in any::<u64>()) {
        let total = BigUint::from(total);
        let q = quorum_threshold(&total);
        prop_assert!(q.clone() * 3u32 > total.clone() * 2u32);
        // And it is the least such value.
        prop_assert!((q - 1u32) * 3u32 <= total * 2u32);
    }

    /// Adding signers never loses a quorum.
    #[test]
    fn has_quorum_is_monotonic(
        powers in prop::collection::vec(0u64..1_000, 1..20),
        subset_mask in any::<u32>(),
        extra_mask in any::<u32>(),
    ) {
        let vm = ValidatorManager::new();
        vm.set_voting_power(table(&powers));

        let n = powers.len();
        let small: HashSet<Address> = (0..n)
            .filter(|i| subset_mask & (1 << i) != 0)
            .map(addr)
            .collect();
        let mut large = small.clone();
        large.extend((0..n).filter(|i| extra_mask & (1 << i) != 0).map(addr));

        if vm.has_quorum(&small) {
            prop_assert!(vm.has_quorum(&large));
        }
    }

    /// The full validator set always reaches quorum when it has any power.
    #[test]
    fn everyone_signing_is_quorum(powers in prop::collection::vec(1u64..1_000, 1..20)) {
        let vm = ValidatorManager::new();
        vm.set_voting_power(table(&powers));
        let all: HashSet<Address> = (0..powers.len()).map(addr).collect();
        prop_assert!(vm.has_quorum(&all));
    }

    /// has_unique_senders agrees with a direct count of distinct senders.
    #[test]
    fn unique_senders_matches_distinct_count(senders in prop::collection::vec(0usize..8, 0..12)) {
        let view = View::new(1, 0);
        let hash = Hash::digest(b"p");
        let messages: Vec<IbftMessage> = senders
            .iter()
            .map(|s| IbftMessage::prepare(view, addr(*s), hash))
            .collect();

        let distinct: HashSet<usize> = senders.iter().copied().collect();
        let expected = !senders.is_empty() && distinct.len() == senders.len();
        prop_assert_eq!(has_unique_senders(&messages), expected);
    }
}

/// Readers racing a writer that flips between two tables must always see
/// one complete table: the total they observe is one of the two totals and
/// the quorum they observe belongs to that same total.
#[test]
fn readers_never_observe_partial_table() {
    let small = table(&[1, 1, 1, 1]);
    let large = table(&[2, 7, 7, 5]);
    let small_total = BigUint::from(4u32);
    let large_total = BigUint::from(21u32);

    let vm = ValidatorManager::new();
    vm.set_voting_power(small.clone());
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let signers: HashSet<Address> = (0..3).map(addr).collect();
                while !done.load(Ordering::Relaxed) {
                    let total = vm.total_voting_power();
                    assert!(total == small_total || total == large_total);

                    // Three signers: 3 of 4 (quorum) or 16 of 21 (quorum).
                    assert!(vm.has_quorum(&signers));
                }
            });
        }

        scope.spawn(|| {
            for i in 0..500 {
                let next = if i % 2 == 0 { large.clone() } else { small.clone() };
                vm.set_voting_power(next);
            }
            done.store(true, Ordering::Relaxed);
        });
    });

    assert_eq!(vm.validator_count(), 4);
}
