//! Read-only context of one proof search
//!
//! Built once before the search starts and shared by every worker.

use crate::analysis::{build_call_graph, CallGraph};
use crate::codec::SymbolCodec;
use crate::rules::{RuleStore, Theorem};
use crate::ProofResult;
use tracing::debug;

/// Everything a search reads: primes, axioms, theorem and call graph
///
/// The codec and rule store are private copies, so later changes to the
/// prover's axioms never affect a running or suspended search.
#[derive(Debug, Clone)]
pub struct ProofContext {
    pub codec: SymbolCodec,
    pub store: RuleStore,
    pub theorem: Theorem,
    pub graph: Option<CallGraph>,
}

impl ProofContext {
    /// Encode the theorem into a copy of `codec` and index the call graph
    pub fn new<S: AsRef<str>>(
        mut codec: SymbolCodec,
        store: RuleStore,
        lhs_tokens: &[S],
        rhs_tokens: &[S],
        with_graph: bool,
    ) -> ProofResult<Self> {
        let theorem = store.set_theorem(&mut codec, lhs_tokens, rhs_tokens)?;
        let graph = with_graph.then(|| build_call_graph(&theorem, store.rules()));

        debug!(
            axioms = store.len(),
            symbols = codec.len(),
            edges = graph.as_ref().map_or(0, CallGraph::len),
            "Prepared proof context"
        );

        Ok(Self {
            codec,
            store,
            theorem,
            graph,
        })
    }
}
