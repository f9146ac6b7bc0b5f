//! Proof search over composite states
//!
//! A search repeatedly:
//! 1. Pops the next state from the frontier
//! 2. Stops with a tentative proof if both sides share a composite
//! 3. Collects, per rule, the rewrites whose divisor divides the state
//! 4. Asks the recursion limiter to admit all of those children at once
//! 5. Pushes unseen children back onto the frontier
//!
//! Composite equality is only a multiset match, so every candidate it hands
//! out still has to pass the token-level verifier.

pub mod context;
pub mod frontier;
pub mod timeout;

use crate::codec::Composite;
use crate::limiter::RecursionLimiter;
use crate::rules::{Opcode, RuleRecord, TheoremState, THEOREM_ID};
use crate::ResourceLimits;
use context::ProofContext;
use frontier::Frontier;
use num_integer::Integer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use timeout::TimeoutTracker;
use tracing::{debug, trace};

/// Cooperative cancellation flag, checked between frontier pops
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a search stopped handing out candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every reachable, admitted state was explored
    Exhausted,
    Cancelled,
    /// `max_states` pops were spent
    StateBudget,
    /// `max_search_time_ms` elapsed
    Timeout,
    /// `max_proofs` candidates were handed out
    ProofBudget,
}

/// What the search produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// A state whose sides encode the same multiset
    Candidate(TheoremState),
    Stopped(StopReason),
}

/// Counters describing the work a search has done
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub states_popped: usize,
    pub states_expanded: usize,
    pub children_generated: usize,
    /// Children dropped because their `(lhs, rhs)` pair was already visited
    pub duplicates_skipped: usize,
    /// Fan-out requests refused by the recursion limiter
    pub rejected_batches: usize,
    /// Transitions lost to those refusals
    pub dropped_transitions: usize,
    pub candidates: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Expansion {
    expanded: usize,
    generated: usize,
    duplicates: usize,
    rejected_batches: usize,
    dropped: usize,
}

impl Expansion {
    fn rejected(dropped: usize) -> Self {
        Self {
            rejected_batches: 1,
            dropped,
            ..Self::default()
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            expanded: self.expanded + other.expanded,
            generated: self.generated + other.generated,
            duplicates: self.duplicates + other.duplicates,
            rejected_batches: self.rejected_batches + other.rejected_batches,
            dropped: self.dropped + other.dropped,
        }
    }
}

enum Step {
    Terminal(TheoremState),
    Expanded,
    Stop(StopReason),
}

#[derive(Debug, Clone)]
struct BestState {
    state: TheoremState,
    shared_bits: u64,
}

pub struct Search {
    context: Arc<ProofContext>,
    limits: ResourceLimits,
    frontier: Frontier,
    limiter: RecursionLimiter,
    stats: SearchStats,
    best: Option<BestState>,
    cancel: CancellationToken,
    timeout: TimeoutTracker,
    finished: Option<StopReason>,
}

impl Search {
    /// Start a search at the theorem's root state
    pub fn new(context: Arc<ProofContext>, limits: ResourceLimits) -> Self {
        let frontier = Frontier::new(limits.frontier_order);
        frontier.push_unseen([TheoremState::root(&context.theorem)]);
        Self::with_frontier(context, limits, frontier, SearchStats::default(), None)
    }

    /// Continue a search from previously captured state
    pub(crate) fn restore(
        context: Arc<ProofContext>,
        limits: ResourceLimits,
        pending: Vec<TheoremState>,
        seen: Vec<(Composite, Composite)>,
        stats: SearchStats,
        best: Option<TheoremState>,
    ) -> Self {
        let frontier = Frontier::restore(limits.frontier_order, pending, seen);
        Self::with_frontier(context, limits, frontier, stats, best)
    }

    fn with_frontier(
        context: Arc<ProofContext>,
        limits: ResourceLimits,
        frontier: Frontier,
        stats: SearchStats,
        best: Option<TheoremState>,
    ) -> Self {
        let limiter = RecursionLimiter::new(limits.max_fanout);
        let best = best.map(|state| BestState {
            shared_bits: shared_bits(&state),
            state,
        });
        Self {
            context,
            limits,
            frontier,
            limiter,
            stats,
            best,
            cancel: CancellationToken::new(),
            timeout: TimeoutTracker::new(),
            finished: None,
        }
    }

    pub fn context(&self) -> &Arc<ProofContext> {
        &self.context
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn limiter(&self) -> &RecursionLimiter {
        &self.limiter
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// State whose sides share the most, preferring shorter proofs
    pub fn best(&self) -> Option<&TheoremState> {
        self.best.as_ref().map(|best| &best.state)
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn set_cancellation_token(&mut self, token: CancellationToken) {
        self.cancel = token;
    }

    /// Run until the next candidate or until the search stops
    pub fn next_candidate(&mut self) -> SearchEvent {
        loop {
            match self.step() {
                Step::Terminal(state) => return SearchEvent::Candidate(state),
                Step::Expanded => {}
                Step::Stop(reason) => return SearchEvent::Stopped(reason),
            }
        }
    }

    /// Like [`Search::next_candidate`], but give up after `budget` pops
    ///
    /// Returns `None` if the budget ran out first; the search can be
    /// continued afterwards.
    pub fn advance(&mut self, budget: usize) -> Option<SearchEvent> {
        for _ in 0..budget {
            match self.step() {
                Step::Terminal(state) => return Some(SearchEvent::Candidate(state)),
                Step::Expanded => {}
                Step::Stop(reason) => return Some(SearchEvent::Stopped(reason)),
            }
        }
        None
    }

    fn step(&mut self) -> Step {
        if let Some(reason) = self.finished.or_else(|| self.budget_exceeded()) {
            self.finished = Some(reason);
            return Step::Stop(reason);
        }

        let Some(state) = self.frontier.pop() else {
            self.finished = Some(StopReason::Exhausted);
            return Step::Stop(StopReason::Exhausted);
        };
        self.stats.states_popped += 1;
        self.observe(&state);

        if state.is_terminal() {
            self.stats.candidates += 1;
            debug!(depth = state.proof.len(), "Tentative proof found");
            return Step::Terminal(state);
        }

        let expansion = self.expand(&state);
        self.stats.states_expanded += expansion.expanded;
        self.stats.children_generated += expansion.generated;
        self.stats.duplicates_skipped += expansion.duplicates;
        self.stats.rejected_batches += expansion.rejected_batches;
        self.stats.dropped_transitions += expansion.dropped;
        Step::Expanded
    }

    fn budget_exceeded(&self) -> Option<StopReason> {
        if self.cancel.is_cancelled() {
            Some(StopReason::Cancelled)
        } else if self.stats.candidates >= self.limits.max_proofs {
            Some(StopReason::ProofBudget)
        } else if self.stats.states_popped >= self.limits.max_states {
            Some(StopReason::StateBudget)
        } else if self.timeout.is_expired(&self.limits) {
            Some(StopReason::Timeout)
        } else {
            None
        }
    }

    fn observe(&mut self, state: &TheoremState) {
        let shared = shared_bits(state);
        let better = match &self.best {
            None => true,
            Some(best) => {
                shared > best.shared_bits
                    || (shared == best.shared_bits && state.proof.len() < best.state.proof.len())
            }
        };
        if better {
            self.best = Some(BestState {
                state: state.clone(),
                shared_bits: shared,
            });
        }
    }

    /// Rules that can rewrite `state`, each with its applicable opcodes
    fn applicable(&self, state: &TheoremState) -> Vec<(&RuleRecord, Vec<Opcode>)> {
        // The call graph was computed for the root composites only.
        let graph = self
            .context
            .graph
            .as_ref()
            .filter(|_| state.proof.is_empty());

        self.context
            .store
            .rules()
            .iter()
            .filter_map(|rule| {
                let opcodes: Vec<Opcode> = match graph {
                    Some(graph) => graph.relations_from(THEOREM_ID, rule.id).to_vec(),
                    None => Opcode::ALL
                        .into_iter()
                        .filter(|opcode| state.admits(*opcode, rule))
                        .collect(),
                };
                (!opcodes.is_empty()).then_some((rule, opcodes))
            })
            .collect()
    }

    fn expand(&self, state: &TheoremState) -> Expansion {
        let candidates = self.applicable(state);
        if candidates.is_empty() {
            return Expansion::default();
        }
        let total: usize = candidates.iter().map(|(_, opcodes)| opcodes.len()).sum();

        // One request per state, sized to the children it is about to produce.
        let Some(_guard) = self.limiter.admit(total) else {
            debug!(
                rules = candidates.len(),
                transitions = total,
                "Expansion rejected by admission control"
            );
            return Expansion::rejected(total);
        };

        trace!(
            lhs = %state.lhs,
            rhs = %state.rhs,
            depth = state.proof.len(),
            rules = candidates.len(),
            transitions = total,
            "Expanding state"
        );

        let frontier = &self.frontier;
        let expansion = if self.context.store.len() >= self.limits.parallel_threshold {
            candidates
                .par_iter()
                .map(|(rule, opcodes)| expand_rule(state, rule, opcodes, frontier))
                .reduce(Expansion::default, Expansion::merge)
        } else {
            candidates
                .iter()
                .map(|(rule, opcodes)| expand_rule(state, rule, opcodes, frontier))
                .fold(Expansion::default(), Expansion::merge)
        };
        Expansion {
            expanded: 1,
            ..expansion
        }
    }

    /// Pending states and visited pairs, for suspending the search
    pub(crate) fn frontier_snapshot(&self) -> (Vec<TheoremState>, Vec<(Composite, Composite)>) {
        self.frontier.snapshot()
    }
}

fn expand_rule(
    state: &TheoremState,
    rule: &RuleRecord,
    opcodes: &[Opcode],
    frontier: &Frontier,
) -> Expansion {
    let children: Vec<TheoremState> = opcodes
        .iter()
        .filter_map(|opcode| state.apply(*opcode, rule))
        .collect();
    let generated = children.len();
    let pushed = frontier.push_unseen(children);

    Expansion {
        generated,
        duplicates: pushed.duplicates,
        ..Expansion::default()
    }
}

fn shared_bits(state: &TheoremState) -> u64 {
    state.lhs.gcd(&state.rhs).bits()
}
