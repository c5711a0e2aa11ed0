//! Black-box tests of the universal enumeration invariants from
//! `SPEC_FULL.md` §8, driven entirely through the public `Regex` API.

use num_bigint::BigUint;
use rexcount::{parse, Flags};

#[test]
fn seek_is_idempotent() {
    let mut re = parse(b"[a-z]{3}[0-9]{2}", Flags::empty());
    let pos = BigUint::from(12345u32);
    assert!(!re.seek(&pos));
    let first = re.current();
    assert!(!re.seek(&pos));
    let second = re.current();
    assert_eq!(first, second);
}

#[test]
fn enumeration_from_zero_visits_every_member_exactly_once() {
    let mut re = parse(b"a{0,3}b?", Flags::empty());
    let total = re.count();
    assert!(!re.seek(&BigUint::from(0u32)));

    let mut seen = std::collections::HashSet::new();
    seen.insert(re.current());
    let mut steps = BigUint::from(0u32);
    loop {
        let wrapped = re.iterate();
        steps += BigUint::from(1u32);
        if wrapped {
            break;
        }
        seen.insert(re.current());
    }
    assert_eq!(steps, total);
    assert_eq!(BigUint::from(seen.len() as u32), total);
}

#[test]
fn seek_then_walk_matches_iterate_from_zero() {
    let mut re = parse(b"[A-C]{3}", Flags::empty());
    let mut by_iterate = Vec::new();
    loop {
        by_iterate.push(re.current());
        if re.iterate() {
            break;
        }
    }

    let mut by_seek = Vec::new();
    for i in 0..by_iterate.len() {
        assert!(!re.seek(&BigUint::from(i as u32)));
        by_seek.push(re.current());
    }

    assert_eq!(by_iterate, by_seek);
}

#[test]
fn quantifier_range_multiplies_alternative_count() {
    // "[ab]{2,4}" contributes 2^2 + 2^3 + 2^4 = 4 + 8 + 16 = 28 members;
    // concatenated with a fixed two-byte class it multiplies straight
    // through.
    let re = parse(b"[ab]{2,4}[xy]", Flags::empty());
    assert_eq!(re.count(), BigUint::from(28u32 * 2));
}

#[test]
fn caseless_class_includes_both_cases() {
    let re = parse(b"[a]", Flags::CASELESS);
    assert_eq!(re.count(), BigUint::from(2u32));
}
