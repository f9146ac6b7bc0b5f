// Encoding tests
mod codec;
mod rules;

mod limiter;

mod session;

use crate::{RuleStore, SymbolCodec, Theorem};

/// `1 + 1 = 2` (Axiom_1) and `2 + 2 = 4` (Axiom_2)
pub(crate) fn arithmetic_axioms() -> Vec<(Vec<&'static str>, Vec<&'static str>)> {
    vec![
        (vec!["1", "+", "1"], vec!["2"]),
        (vec!["2", "+", "2"], vec!["4"]),
    ]
}

pub(crate) fn arithmetic_store() -> (SymbolCodec, RuleStore) {
    let mut codec = SymbolCodec::new();
    let mut store = RuleStore::new();
    store.set_axioms(&mut codec, arithmetic_axioms()).unwrap();
    (codec, store)
}

pub(crate) fn four_ones_theorem(codec: &mut SymbolCodec, store: &RuleStore) -> Theorem {
    store
        .set_theorem(codec, &["1", "+", "1", "+", "1", "+", "1"], &["4"])
        .unwrap()
}
