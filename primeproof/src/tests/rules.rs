use super::{arithmetic_store, four_ones_theorem};
use crate::rules::*;
use crate::{ProofError, SymbolCodec};
use num_bigint::BigUint;

#[test]
fn test_axioms_get_sequential_guids() {
    let (_, store) = arithmetic_store();
    let ids: Vec<u64> = store.rules().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(store.get(2).unwrap().rhs_tokens, vec!["4".to_string()]);
    assert!(store.get(0).is_none());
    assert!(store.get(3).is_none());
}

#[test]
fn test_axiom_composites() {
    let (_, store) = arithmetic_store();
    let first = store.get(1).unwrap();
    assert_eq!(first.lhs, BigUint::from(12u32));
    assert_eq!(first.rhs, BigUint::from(5u32));
    assert!(!first.was_swapped);

    let second = store.get(2).unwrap();
    assert_eq!(second.lhs, BigUint::from(75u32));
    assert_eq!(second.rhs, BigUint::from(7u32));
}

#[test]
fn test_smaller_lhs_is_swapped() {
    let mut codec = SymbolCodec::new();
    let mut store = RuleStore::new();
    let record = store.add_axiom(&mut codec, &["x"], &["y", "y"]).unwrap();

    assert!(record.was_swapped);
    assert_eq!(record.lhs_tokens, vec!["y".to_string(), "y".to_string()]);
    assert_eq!(record.rhs_tokens, vec!["x".to_string()]);
    assert!(record.is_canonical());

    let (original_lhs, original_rhs) = record.original_orientation();
    assert_eq!(original_lhs, &["x".to_string()]);
    assert_eq!(original_rhs.len(), 2);
}

#[test]
fn test_canonicalize_is_idempotent() {
    let mut codec = SymbolCodec::new();
    let mut store = RuleStore::new();
    let record = store.add_axiom(&mut codec, &["a"], &["b", "c"]).unwrap().clone();
    assert_eq!(record.clone().canonicalize(), record);
}

#[test]
fn test_theorem_is_canonicalized() {
    let (mut codec, store) = arithmetic_store();
    let theorem = store.set_theorem(&mut codec, &["4"], &["2", "+", "2"]).unwrap();
    assert!(theorem.was_swapped);
    assert_eq!(theorem.lhs, BigUint::from(75u32));
    assert_eq!(theorem.rhs_tokens, vec!["4".to_string()]);
}

#[test]
fn test_empty_side_is_rejected() {
    let mut codec = SymbolCodec::new();
    let mut store = RuleStore::new();
    let empty: [&str; 0] = [];

    match store.add_axiom(&mut codec, &empty, &["x"]) {
        Err(ProofError::MalformedRule { side, rule, .. }) => {
            assert_eq!(side, Side::Lhs);
            assert_eq!(rule, "Axiom_1");
        }
        other => panic!("Expected MalformedRule, got {:?}", other.map(|r| r.id)),
    }
    match store.set_theorem(&mut codec, &["x"], &empty) {
        Err(ProofError::MalformedRule { side, .. }) => assert_eq!(side, Side::Rhs),
        other => panic!("Expected MalformedRule, got {:?}", other),
    }
}

#[test]
fn test_empty_token_is_rejected() {
    let mut codec = SymbolCodec::new();
    let mut store = RuleStore::new();
    let result = store.add_axiom(&mut codec, &["x"], &["y", ""]);
    assert!(matches!(
        result,
        Err(ProofError::MalformedRule { side: Side::Rhs, .. })
    ));
}

#[test]
fn test_failed_set_axioms_keeps_previous_rules() {
    let (mut codec, mut store) = arithmetic_store();
    let result = store.set_axioms(
        &mut codec,
        vec![(vec!["a"], vec!["b"]), (vec![], vec!["c"])],
    );
    assert!(result.is_err());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(1).unwrap().lhs_tokens.len(), 3);
}

#[test]
fn test_set_axioms_restarts_guids() {
    let (mut codec, mut store) = arithmetic_store();
    store
        .set_axioms(&mut codec, vec![(vec!["p", "q"], vec!["r"])])
        .unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.rules()[0].id, 1);
}

#[test]
fn test_state_transitions() {
    let (mut codec, store) = arithmetic_store();
    let theorem = four_ones_theorem(&mut codec, &store);
    let root = TheoremState::root(&theorem);
    assert_eq!(root.lhs, BigUint::from(432u32));
    assert_eq!(root.rhs, BigUint::from(7u32));

    let first = store.get(1).unwrap();
    let second = store.get(2).unwrap();

    let reduced = root.apply(Opcode::LhsReduce, first).unwrap();
    assert_eq!(reduced.lhs, BigUint::from(180u32));
    assert_eq!(reduced.proof, vec![ProofStep::new(Opcode::LhsReduce, 1)]);

    let expanded = root.apply(Opcode::RhsExpand, second).unwrap();
    assert_eq!(expanded.rhs, BigUint::from(75u32));
    assert_eq!(expanded.lhs, root.lhs);

    assert!(root.apply(Opcode::LhsExpand, first).is_none());
    assert!(root.apply(Opcode::RhsReduce, second).is_none());
    // The parent is untouched.
    assert!(root.proof.is_empty());
}

#[test]
fn test_opcode_display() {
    let step = ProofStep::new(Opcode::RhsExpand, 3);
    assert_eq!(step.to_string(), "rhs_expand via Axiom_3");
    assert_eq!(Opcode::LhsReduce.side(), Side::Lhs);
    assert!(!Opcode::RhsExpand.is_reduce());
}
