//! Proof sessions
//!
//! A [`ProofSession`] is a search together with the verification loop around
//! it. Sessions can be advanced in slices, suspended into a self-contained
//! [`SessionSnapshot`] and resumed later, possibly in another process.

use crate::codec::{Composite, Symbol, SymbolCodec};
use crate::report::{ProofReport, ProofStatus};
use crate::rules::{ProofStep, RuleStore, TheoremState};
use crate::search::context::ProofContext;
use crate::search::{CancellationToken, Search, SearchEvent, SearchStats, StopReason};
use crate::verifier::{verify, Verification};
use crate::{ProofError, ProofResult, ResourceLimits};
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifier of a suspended session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub BigUint);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<BigUint>()
            .map(SessionId)
            .map_err(|e| ProofError::Snapshot(format!("Invalid session id '{}': {}", s, e)))
    }
}

/// A search state as stored in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub lhs: Composite,
    pub rhs: Composite,
    pub proof: Vec<ProofStep>,
}

impl From<&TheoremState> for StateSnapshot {
    fn from(state: &TheoremState) -> Self {
        Self {
            lhs: state.lhs.clone(),
            rhs: state.rhs.clone(),
            proof: state.proof.clone(),
        }
    }
}

impl From<StateSnapshot> for TheoremState {
    fn from(snapshot: StateSnapshot) -> Self {
        Self {
            lhs: snapshot.lhs,
            rhs: snapshot.rhs,
            proof: snapshot.proof,
        }
    }
}

/// Everything needed to continue a suspended search
///
/// Token sequences are stored in the orientation they were entered, and the
/// codec as its symbol order, so re-encoding reproduces the same primes,
/// guids and canonical orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub symbols: Vec<Symbol>,
    pub axioms: Vec<(Vec<Symbol>, Vec<Symbol>)>,
    pub theorem: (Vec<Symbol>, Vec<Symbol>),
    pub pending: Vec<StateSnapshot>,
    pub seen: Vec<(Composite, Composite)>,
    pub best: Option<StateSnapshot>,
    pub stats: SearchStats,
    pub rejected_candidates: usize,
    pub limits: ResourceLimits,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> ProofResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> ProofResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Suspended sessions, held as serialized snapshots
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: HashMap<SessionId, String>,
    next_id: BigUint,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            sessions: HashMap::new(),
            next_id: BigUint::one(),
        }
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, snapshot: &SessionSnapshot) -> ProofResult<SessionId> {
        let json = snapshot.to_json()?;
        let id = SessionId(self.next_id.clone());
        self.next_id += 1u32;
        self.sessions.insert(id.clone(), json);
        Ok(id)
    }

    /// Remove and decode a session; a session can be resumed once
    pub fn take(&mut self, id: &SessionId) -> ProofResult<SessionSnapshot> {
        let json = self
            .sessions
            .remove(id)
            .ok_or_else(|| ProofError::SessionNotFound(id.clone()))?;
        SessionSnapshot::from_json(&json)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// A running proof attempt: search plus verification of its candidates
pub struct ProofSession {
    search: Search,
    rejected_candidates: usize,
    outcome: Option<ProofReport>,
}

impl ProofSession {
    pub(crate) fn new(search: Search) -> Self {
        Self {
            search,
            rejected_candidates: 0,
            outcome: None,
        }
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn stats(&self) -> &SearchStats {
        self.search.stats()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.search.cancellation_token()
    }

    pub fn set_cancellation_token(&mut self, token: CancellationToken) {
        self.search.set_cancellation_token(token);
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Search and verify until a proof is found or the search stops
    pub fn run(&mut self) -> ProofResult<ProofReport> {
        loop {
            if let Some(report) = self.advance(usize::MAX)? {
                return Ok(report);
            }
        }
    }

    /// Pop at most `budget` states; `None` means the session can continue
    pub fn advance(&mut self, budget: usize) -> ProofResult<Option<ProofReport>> {
        if let Some(report) = &self.outcome {
            return Ok(Some(report.clone()));
        }

        let mut remaining = budget;
        loop {
            let popped_before = self.search.stats().states_popped;
            let Some(event) = self.search.advance(remaining) else {
                return Ok(None);
            };
            remaining =
                remaining.saturating_sub(self.search.stats().states_popped - popped_before);

            let report = match event {
                SearchEvent::Candidate(state) => {
                    let context = self.search.context();
                    let verification = verify(&context.theorem, &state.proof, &context.store)?;
                    if verification.valid {
                        info!(steps = state.proof.len(), "Proof verified");
                        self.report(ProofStatus::Proved, None, state.proof, verification)
                    } else {
                        self.rejected_candidates += 1;
                        warn!(
                            steps = state.proof.len(),
                            failed_step = ?verification.failed_step,
                            "Composite match failed token verification"
                        );
                        if remaining == 0 {
                            return Ok(None);
                        }
                        continue;
                    }
                }
                SearchEvent::Stopped(reason) => self.unproved(reason)?,
            };

            self.outcome = Some(report.clone());
            return Ok(Some(report));
        }
    }

    fn unproved(&self, reason: StopReason) -> ProofResult<ProofReport> {
        let status = match reason {
            StopReason::Cancelled => ProofStatus::Cancelled,
            _ if self.rejected_candidates > 0 => ProofStatus::VerificationFailed,
            StopReason::Exhausted => ProofStatus::NoProof,
            StopReason::StateBudget | StopReason::Timeout => ProofStatus::LimitReached,
            StopReason::ProofBudget => ProofStatus::VerificationFailed,
        };
        debug!(?reason, ?status, "Search stopped without a proof");

        let context = self.search.context();
        let partial = self.search.best().map(|best| best.proof.clone()).unwrap_or_default();
        let verification = verify(&context.theorem, &partial, &context.store)?;
        Ok(self.report(status, Some(reason), partial, verification))
    }

    fn report(
        &self,
        status: ProofStatus,
        stop_reason: Option<StopReason>,
        proof: Vec<ProofStep>,
        verification: Verification,
    ) -> ProofReport {
        ProofReport {
            status,
            stop_reason,
            proof,
            proof_steps: verification.steps,
            commit_log: verification.trace,
            final_lhs: verification.lhs,
            final_rhs: verification.rhs,
            theorem_swapped: self.search.context().theorem.was_swapped,
            rejected_candidates: self.rejected_candidates,
            stats: self.search.stats().clone(),
        }
    }

    /// Capture the session so it can be resumed with [`ProofSession::from_snapshot`]
    pub fn snapshot(&self) -> SessionSnapshot {
        let context = self.search.context();
        let theorem = &context.theorem;
        let theorem_tokens = if theorem.was_swapped {
            (theorem.rhs_tokens.clone(), theorem.lhs_tokens.clone())
        } else {
            (theorem.lhs_tokens.clone(), theorem.rhs_tokens.clone())
        };
        let axioms = context
            .store
            .rules()
            .iter()
            .map(|rule| {
                let (lhs, rhs) = rule.original_orientation();
                (lhs.to_vec(), rhs.to_vec())
            })
            .collect();
        let (pending, seen) = self.search.frontier_snapshot();

        SessionSnapshot {
            symbols: context.codec.symbols().to_vec(),
            axioms,
            theorem: theorem_tokens,
            pending: pending.iter().map(StateSnapshot::from).collect(),
            seen,
            best: self.search.best().map(StateSnapshot::from),
            stats: self.search.stats().clone(),
            rejected_candidates: self.rejected_candidates,
            limits: self.search.limits().clone(),
        }
    }

    /// Rebuild a session, re-deriving primes from the stored symbol order
    pub fn from_snapshot(snapshot: SessionSnapshot) -> ProofResult<Self> {
        snapshot.limits.validate()?;

        let mut codec = SymbolCodec::from_symbols(&snapshot.symbols);
        let mut store = RuleStore::new();
        store.set_axioms(&mut codec, snapshot.axioms)?;
        let (lhs, rhs) = snapshot.theorem;
        let context = ProofContext::new(codec, store, &lhs, &rhs, snapshot.limits.use_call_graph)?;

        if context.codec.len() != snapshot.symbols.len() {
            return Err(ProofError::Snapshot(
                "symbol table does not cover every token of the session".to_string(),
            ));
        }

        let search = Search::restore(
            Arc::new(context),
            snapshot.limits,
            snapshot.pending.into_iter().map(TheoremState::from).collect(),
            snapshot.seen,
            snapshot.stats,
            snapshot.best.map(TheoremState::from),
        );
        Ok(Self {
            search,
            rejected_candidates: snapshot.rejected_candidates,
            outcome: None,
        })
    }
}
