use crate::{ProofError, ProofResult};
use serde::{Deserialize, Serialize};

/// Order in which the frontier hands out states for expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierOrder {
    /// Numerically largest `(lhs, rhs)` composites first
    #[default]
    LargestFirst,
    /// Insertion order (breadth-first)
    BreadthFirst,
}

/// Resource limits bounding a proof search
///
/// Search is combinatorial and may not terminate on its own, so every session
/// runs under these budgets. Exhausting one is reported as a search outcome,
/// never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Admission ceiling of the recursion limiter, in sibling branches
    /// Typical fan-out: a few dozen, Limit: 4096
    pub max_fanout: usize,

    /// Tentative proofs to examine before giving up on verification
    pub max_proofs: usize,

    /// Maximum number of states popped from the frontier per search
    pub max_states: usize,

    /// Maximum search time in milliseconds
    pub max_search_time_ms: u64,

    /// Maximum number of axioms accepted by `set_axioms`
    pub max_axioms: usize,

    /// Minimum rule count before child generation is spread over worker threads
    pub parallel_threshold: usize,

    /// Frontier pop order
    pub frontier_order: FrontierOrder,

    /// Consult the precomputed call graph when expanding the root state
    pub use_call_graph: bool,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_fanout: 4096,
            max_proofs: 8,
            max_states: 200_000,
            max_search_time_ms: 10_000, // 10 seconds
            max_axioms: 10_000,
            parallel_threshold: 64,
            frontier_order: FrontierOrder::LargestFirst,
            use_call_graph: true,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject configurations under which no search could make progress
    pub fn validate(&self) -> ProofResult<()> {
        let zero_checks = [
            ("max_fanout", self.max_fanout),
            ("max_proofs", self.max_proofs),
            ("max_states", self.max_states),
        ];
        for (name, value) in zero_checks {
            if value == 0 {
                return Err(ProofError::ResourceLimitExceeded {
                    limit_name: name.to_string(),
                    limit_value: "1".to_string(),
                    actual_value: value.to_string(),
                    suggestion: format!("Set {} to at least 1", name),
                });
            }
        }
        Ok(())
    }
}
