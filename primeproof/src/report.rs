use crate::codec::Symbol;
use crate::rules::ProofStep;
use crate::search::{SearchStats, StopReason};
use serde::Serialize;

/// Outcome of a proof attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofStatus {
    /// A candidate passed token-level verification
    Proved,
    /// The frontier was exhausted without a candidate
    NoProof,
    /// Candidates were found, but none survived verification
    VerificationFailed,
    Cancelled,
    /// A state or time budget ran out before a proof was found
    LimitReached,
}

/// Token sequences of both sides after one rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofStepRecord {
    pub step: ProofStep,
    pub description: String,
    pub lhs: Vec<Symbol>,
    pub rhs: Vec<Symbol>,
}

/// Response from proving a theorem
///
/// For a proof, `proof_steps`, `commit_log` and the final sequences describe
/// the verified chain. Otherwise they describe the best partial trace the
/// search observed, replayed as far as the tokens allow.
#[derive(Debug, Clone, Serialize)]
pub struct ProofReport {
    pub status: ProofStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    pub proof: Vec<ProofStep>,
    pub proof_steps: Vec<ProofStepRecord>,
    pub commit_log: Vec<String>,
    pub final_lhs: Vec<Symbol>,
    pub final_rhs: Vec<Symbol>,
    /// Theorem sides were exchanged so that the larger composite is on the left
    pub theorem_swapped: bool,
    /// Composite-equal candidates that failed verification
    pub rejected_candidates: usize,
    pub stats: SearchStats,
}

impl ProofReport {
    pub fn is_proved(&self) -> bool {
        self.status == ProofStatus::Proved
    }
}
