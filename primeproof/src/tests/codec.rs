use crate::codec::*;
use num_bigint::BigUint;
use num_traits::One;

#[test]
fn test_next_prime_sequence() {
    let mut codec = SymbolCodec::new();
    let primes: Vec<BigUint> = (0..10).map(|_| codec.next_prime()).collect();
    let expected: Vec<BigUint> = [2u32, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        .into_iter()
        .map(BigUint::from)
        .collect();
    assert_eq!(primes, expected);
}

#[test]
fn test_next_prime_skips_squares_of_small_primes() {
    let mut codec = SymbolCodec::new();
    let primes: Vec<BigUint> = (0..30).map(|_| codec.next_prime()).collect();
    for square in [4u32, 9, 25, 49, 121] {
        assert!(!primes.contains(&BigUint::from(square)));
    }
    assert_eq!(primes[29], BigUint::from(113u32));
}

#[test]
fn test_primes_assigned_in_first_seen_order() {
    let mut codec = SymbolCodec::new();
    codec.encode(&["1", "+", "1"]);
    codec.encode(&["2", "+", "2", "4"]);

    assert_eq!(codec.prime_of("1"), Some(&BigUint::from(2u32)));
    assert_eq!(codec.prime_of("+"), Some(&BigUint::from(3u32)));
    assert_eq!(codec.prime_of("2"), Some(&BigUint::from(5u32)));
    assert_eq!(codec.prime_of("4"), Some(&BigUint::from(7u32)));
    assert_eq!(codec.symbols(), &["1", "+", "2", "4"]);
}

#[test]
fn test_encode_empty_sequence_is_one() {
    let mut codec = SymbolCodec::new();
    let empty: [&str; 0] = [];
    assert!(codec.encode(&empty).is_one());
    assert!(codec.is_empty());
}

#[test]
fn test_encode_ignores_order() {
    let mut codec = SymbolCodec::new();
    let forward = codec.encode(&["a", "b", "c"]);
    let backward = codec.encode(&["c", "b", "a"]);
    assert_eq!(forward, backward);
    assert_eq!(forward, BigUint::from(30u32));
}

#[test]
fn test_structural_markers_are_plain_symbols() {
    let mut codec = SymbolCodec::new();
    let scoped = codec.encode(&["{", "x", "}"]);
    assert_eq!(codec.len(), 3);
    assert_eq!(scoped, BigUint::from(2u32 * 3 * 5));
}

#[test]
fn test_from_symbols_reproduces_assignment() {
    let mut original = SymbolCodec::new();
    original.encode(&["if", "{", "x", "}", "else"]);

    let rebuilt = SymbolCodec::from_symbols(original.symbols());
    for symbol in original.symbols() {
        assert_eq!(original.prime_of(symbol), rebuilt.prime_of(symbol));
    }
}

#[test]
fn test_decode_multiset() {
    let mut codec = SymbolCodec::new();
    let composite = codec.encode(&["1", "+", "1", "+", "1"]);
    let decoded = codec.decode_multiset(&composite).unwrap();
    assert_eq!(
        decoded,
        vec![("1".to_string(), 3), ("+".to_string(), 2)]
    );
}

#[test]
fn test_decode_multiset_rejects_foreign_factor() {
    let mut codec = SymbolCodec::new();
    codec.encode(&["a"]);
    // 3 was never assigned to a symbol.
    assert_eq!(codec.decode_multiset(&BigUint::from(6u32)), None);
}
