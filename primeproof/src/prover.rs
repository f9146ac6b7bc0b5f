use crate::analysis::{build_call_graph, CallGraph};
use crate::codec::SymbolCodec;
use crate::rules::{RuleRecord, RuleStore};
use crate::search::context::ProofContext;
use crate::search::Search;
use crate::session::{ProofSession, SessionId, SessionStore};
use crate::task::ProofTask;
use crate::{ProofError, ProofReport, ProofResult, ResourceLimits};
use std::sync::Arc;
use tracing::debug;

/// The primeproof engine.
///
/// Owns the symbol codec and the axioms of one proof session. Every proof
/// attempt works on its own copy of both, so attempts never observe each
/// other and the prover can be shared across threads for reading.
pub struct Prover {
    codec: SymbolCodec,
    store: RuleStore,
    limits: ResourceLimits,
    sessions: SessionStore,
}

impl Default for Prover {
    fn default() -> Self {
        Self {
            codec: SymbolCodec::new(),
            store: RuleStore::new(),
            limits: ResourceLimits::default(),
            sessions: SessionStore::new(),
        }
    }
}

impl Prover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prover with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    pub fn codec(&self) -> &SymbolCodec {
        &self.codec
    }

    pub fn axioms(&self) -> &[RuleRecord] {
        self.store.rules()
    }

    /// Replace the axioms; the symbol table starts over as well
    ///
    /// On error the previous axioms are kept.
    pub fn set_axioms<I, S>(&mut self, axioms: I) -> ProofResult<()>
    where
        I: IntoIterator<Item = (Vec<S>, Vec<S>)>,
        S: AsRef<str>,
    {
        let axioms: Vec<(Vec<S>, Vec<S>)> = axioms.into_iter().collect();
        if axioms.len() > self.limits.max_axioms {
            return Err(ProofError::ResourceLimitExceeded {
                limit_name: "max_axioms".to_string(),
                limit_value: self.limits.max_axioms.to_string(),
                actual_value: axioms.len().to_string(),
                suggestion: format!(
                    "Split the rule set or raise max_axioms above {}",
                    axioms.len()
                ),
            });
        }

        let mut codec = SymbolCodec::new();
        let mut store = RuleStore::new();
        store.set_axioms(&mut codec, axioms)?;
        debug!(
            axioms = store.len(),
            symbols = codec.len(),
            "Loaded axioms"
        );

        self.codec = codec;
        self.store = store;
        Ok(())
    }

    /// Append one axiom, returning its guid
    pub fn add_axiom<S: AsRef<str>>(&mut self, lhs: &[S], rhs: &[S]) -> ProofResult<u64> {
        if self.store.len() >= self.limits.max_axioms {
            return Err(ProofError::ResourceLimitExceeded {
                limit_name: "max_axioms".to_string(),
                limit_value: self.limits.max_axioms.to_string(),
                actual_value: (self.store.len() + 1).to_string(),
                suggestion: "Raise max_axioms to add more rules".to_string(),
            });
        }
        Ok(self.store.add_axiom(&mut self.codec, lhs, rhs)?.id)
    }

    fn context<S: AsRef<str>>(&self, lhs: &[S], rhs: &[S]) -> ProofResult<ProofContext> {
        ProofContext::new(
            self.codec.clone(),
            self.store.clone(),
            lhs,
            rhs,
            self.limits.use_call_graph,
        )
    }

    /// Begin a proof attempt without running it
    pub fn start<S: AsRef<str>>(&self, lhs: &[S], rhs: &[S]) -> ProofResult<ProofSession> {
        self.limits.validate()?;
        let context = self.context(lhs, rhs)?;
        let search = Search::new(Arc::new(context), self.limits.clone());
        Ok(ProofSession::new(search))
    }

    /// Encode, search and verify
    ///
    /// Not finding a proof is a normal outcome reported through
    /// [`crate::ProofStatus`]; errors are reserved for invalid input.
    pub fn prove<S: AsRef<str>>(&self, lhs: &[S], rhs: &[S]) -> ProofResult<ProofReport> {
        self.start(lhs, rhs)?.run()
    }

    /// Run [`Prover::prove`] on a dedicated thread
    pub fn prove_in_background<S: AsRef<str>>(&self, lhs: &[S], rhs: &[S]) -> ProofResult<ProofTask> {
        ProofTask::spawn(self.start(lhs, rhs)?)
    }

    /// Call graph between the theorem and the current axioms
    pub fn call_graph<S: AsRef<str>>(&self, lhs: &[S], rhs: &[S]) -> ProofResult<CallGraph> {
        let mut codec = self.codec.clone();
        let theorem = self.store.set_theorem(&mut codec, lhs, rhs)?;
        Ok(build_call_graph(&theorem, self.store.rules()))
    }

    /// Park a session; it can be picked up again with [`Prover::resume`]
    pub fn suspend(&mut self, session: ProofSession) -> ProofResult<SessionId> {
        let id = self.sessions.insert(&session.snapshot())?;
        debug!(session = %id, pending = session.search().frontier().len(), "Suspended session");
        Ok(id)
    }

    /// Continue a suspended session
    ///
    /// The session keeps the axioms and limits it was started with, even if
    /// the prover's have changed since.
    pub fn resume(&mut self, id: &SessionId) -> ProofResult<ProofSession> {
        let snapshot = self.sessions.take(id)?;
        debug!(session = %id, "Resuming session");
        ProofSession::from_snapshot(snapshot)
    }

    pub fn has_session(&self, id: &SessionId) -> bool {
        self.sessions.contains(id)
    }
}
