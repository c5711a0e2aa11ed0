//! End-to-end scenarios exercising `rexcount`'s public API the way an
//! external crate would use it: `parse`, then `count`/`current`/`next`/
//! `seek`.

use num_bigint::BigUint;
use rexcount::{parse, Flags};

#[test]
fn digit_class_repetition() {
    let mut re = parse(b"[0-9]{3}", Flags::empty());
    assert!(re.error().is_none());
    assert_eq!(re.count(), BigUint::from(1000u32));

    assert!(!re.seek(&BigUint::from(0u32)));
    assert_eq!(re.current(), b"000");

    assert!(!re.seek(&BigUint::from(999u32)));
    assert_eq!(re.current(), b"999");

    assert!(re.seek(&BigUint::from(1000u32)));
}

#[test]
fn alternation_with_optional_suffix_enumerates_in_order() {
    let mut re = parse(b"(cat|dog)s?", Flags::empty());
    assert!(re.error().is_none());
    assert_eq!(re.count(), BigUint::from(4u32));

    assert_eq!(re.current(), b"cat");
    assert_eq!(re.next(), Some(b"cats".to_vec()));
    assert_eq!(re.next(), Some(b"dog".to_vec()));
    assert_eq!(re.next(), Some(b"dogs".to_vec()));
    assert_eq!(re.next(), None); // wrapped
    assert_eq!(re.current(), b"cat");
}

#[test]
fn letters_and_digits_compose_to_a_large_count() {
    let mut re = parse(b"[A-Z]{2}-[0-9]{4}", Flags::empty());
    assert!(re.error().is_none());
    assert_eq!(re.count(), BigUint::from(6_760_000u32));

    let last = BigUint::from(6_760_000u32) - BigUint::from(1u32);
    assert!(!re.seek(&last));
    assert_eq!(re.current(), b"ZZ-9999");
}

#[test]
fn backreference_duplicates_a_chosen_alternative() {
    let mut re = parse(b"(ab|c)\\1", Flags::empty());
    assert!(re.error().is_none());
    assert_eq!(re.count(), BigUint::from(2u32));

    let mut members = vec![re.current()];
    while let Some(member) = re.next() {
        members.push(member);
    }
    members.sort();
    assert_eq!(members, vec![b"abab".to_vec(), b"cc".to_vec()]);
}

#[test]
fn dotall_lets_dot_match_every_byte() {
    let mut re = parse(b"a.b", Flags::DOTALL);
    assert!(re.error().is_none());
    assert_eq!(re.count(), BigUint::from(256u32));

    assert!(!re.seek(&BigUint::from(10u32)));
    assert_eq!(re.current(), vec![b'a', 10, b'b']);
}

#[test]
fn without_dotall_dot_excludes_newline() {
    let mut re = parse(b"a.b", Flags::empty());
    assert!(re.error().is_none());
    assert_eq!(re.count(), BigUint::from(255u32));
}
