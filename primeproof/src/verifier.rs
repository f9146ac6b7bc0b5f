//! Token-level proof verification
//!
//! Replays a proof stack on the literal token sequences of the theorem.
//! The search works on composites, which forget token order, so a candidate
//! is only a proof if every step finds its pattern as a contiguous run of
//! tokens and the two sides end up identical.

use crate::codec::Symbol;
use crate::report::ProofStepRecord;
use crate::rules::{ProofStep, RuleStore, Side, Theorem};
use crate::{ProofError, ProofResult};
use serde::Serialize;

/// Result of replaying a proof stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Every step applied and both sides match token for token
    pub valid: bool,
    pub lhs: Vec<Symbol>,
    pub rhs: Vec<Symbol>,
    /// "lhs_reduce via Axiom_3", one entry per applied step
    pub trace: Vec<String>,
    /// Token sequences after each applied step
    pub steps: Vec<ProofStepRecord>,
    /// Index of the first step whose pattern was not found
    pub failed_step: Option<usize>,
}

/// Replay `proof` against the theorem's tokens
///
/// Stops at the first step whose pattern does not occur in the side it
/// rewrites. Only the first occurrence of a pattern is replaced per step.
/// Returns an error only if a step references a guid missing from `store`.
pub fn verify(theorem: &Theorem, proof: &[ProofStep], store: &RuleStore) -> ProofResult<Verification> {
    let mut lhs = theorem.lhs_tokens.clone();
    let mut rhs = theorem.rhs_tokens.clone();
    let mut trace = Vec::with_capacity(proof.len());
    let mut steps = Vec::with_capacity(proof.len());
    let mut failed_step = None;

    for (index, step) in proof.iter().enumerate() {
        let rule = store
            .get(step.rule_id)
            .ok_or(ProofError::UnknownRule(step.rule_id))?;
        let (pattern, replacement) = rule.pattern(step.opcode);
        let side = match step.opcode.side() {
            Side::Lhs => &mut lhs,
            Side::Rhs => &mut rhs,
        };

        match replace_first(side, pattern, replacement) {
            Some(rewritten) => *side = rewritten,
            None => {
                failed_step = Some(index);
                break;
            }
        }

        trace.push(step.to_string());
        steps.push(ProofStepRecord {
            step: *step,
            description: step.to_string(),
            lhs: lhs.clone(),
            rhs: rhs.clone(),
        });
    }

    let valid = failed_step.is_none() && lhs == rhs;
    Ok(Verification {
        valid,
        lhs,
        rhs,
        trace,
        steps,
        failed_step,
    })
}

/// Replace the first contiguous occurrence of `pattern` in `tokens`
///
/// Returns `None` when the pattern is empty or does not occur.
pub fn replace_first<S: AsRef<str>>(
    tokens: &[Symbol],
    pattern: &[S],
    replacement: &[S],
) -> Option<Vec<Symbol>> {
    if pattern.is_empty() || pattern.len() > tokens.len() {
        return None;
    }
    let start = tokens.windows(pattern.len()).position(|window| {
        window
            .iter()
            .zip(pattern)
            .all(|(token, expected)| token == expected.as_ref())
    })?;

    let mut rewritten = Vec::with_capacity(tokens.len() - pattern.len() + replacement.len());
    rewritten.extend_from_slice(&tokens[..start]);
    rewritten.extend(replacement.iter().map(|t| t.as_ref().to_string()));
    rewritten.extend_from_slice(&tokens[start + pattern.len()..]);
    Some(rewritten)
}
