//! # Primeproof Engine
//!
//! **Equalities between token sequences, proved by rewriting**
//!
//! Primeproof searches for a chain of axiom applications that turns one side
//! of a theorem into the other. Token sequences are encoded as products of
//! per-symbol primes, which makes "does this pattern occur here?" a
//! divisibility test; every numeric proof is then replayed on the real tokens
//! before it is reported.
//!
//! ## Quick Start
//!
//! ```rust
//! use primeproof::{ProofResult, Prover};
//!
//! fn main() -> ProofResult<()> {
//!     let mut prover = Prover::new();
//!     prover.set_axioms([
//!         (vec!["1", "+", "1"], vec!["2"]),
//!         (vec!["2", "+", "2"], vec!["4"]),
//!     ])?;
//!
//!     let report = prover.prove(&["1", "+", "1", "+", "1", "+", "1"], &["4"])?;
//!     assert!(report.is_proved());
//!     for line in &report.commit_log {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Axioms
//! Rewrite equations usable in both directions. Each is stored with the
//! larger composite on the left and a guid starting at 1.
//!
//! ### Reduce and expand
//! Reducing replaces an occurrence of an axiom's left side by its right
//! side; expanding does the reverse. Either can apply to either side of the
//! theorem, giving four opcodes.
//!
//! ### Verification
//! Composites forget token order, so a numeric match is only a candidate.
//! The verifier replays the proof stack on the token sequences, replacing the
//! first occurrence of each pattern, and accepts it only if both sides end up
//! identical.

pub mod analysis;
pub mod codec;
pub mod error;
pub mod limiter;
pub mod prover;
pub mod report;
pub mod resource_limits;
pub mod rules;
pub mod search;
pub mod session;
pub mod task;
pub mod verifier;

pub use analysis::{build_call_graph, CallGraph, CallGraphEdge, Relation};
pub use codec::{Composite, Symbol, SymbolCodec};
pub use error::ProofError;
pub use limiter::{AdmissionGuard, RecursionLimiter, RejectionCounts};
pub use prover::Prover;
pub use report::{ProofReport, ProofStatus, ProofStepRecord};
pub use resource_limits::{FrontierOrder, ResourceLimits};
pub use rules::{Opcode, ProofStep, RuleRecord, RuleStore, Side, Theorem, TheoremState, THEOREM_ID};
pub use search::{CancellationToken, Search, SearchEvent, SearchStats, StopReason};
pub use session::{ProofSession, SessionId, SessionSnapshot};
pub use task::ProofTask;
pub use verifier::{replace_first, verify, Verification};

/// Result type for primeproof operations
pub type ProofResult<T> = Result<T, ProofError>;

#[cfg(test)]
mod tests;
