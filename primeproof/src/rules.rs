//! Rule store
//!
//! Axioms and the working theorem in canonical form: both sides encoded as
//! composites, the larger composite on the left.

use crate::codec::{Composite, Symbol, SymbolCodec};
use crate::{ProofError, ProofResult};
use num_integer::Integer;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Guid reserved for the theorem in call graphs
pub const THEOREM_ID: u64 = 0;

/// Side of an equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Lhs,
    Rhs,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Lhs => write!(f, "left-hand side"),
            Side::Rhs => write!(f, "right-hand side"),
        }
    }
}

/// One of the four rewrite relations between a state side and a rule side
///
/// Reduce replaces a rule's LHS pattern by its RHS; expand goes the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    LhsReduce,
    LhsExpand,
    RhsReduce,
    RhsExpand,
}

impl Opcode {
    pub const ALL: [Opcode; 4] = [
        Opcode::LhsReduce,
        Opcode::LhsExpand,
        Opcode::RhsReduce,
        Opcode::RhsExpand,
    ];

    /// Side of the theorem this opcode rewrites
    pub fn side(self) -> Side {
        match self {
            Opcode::LhsReduce | Opcode::LhsExpand => Side::Lhs,
            Opcode::RhsReduce | Opcode::RhsExpand => Side::Rhs,
        }
    }

    pub fn is_reduce(self) -> bool {
        matches!(self, Opcode::LhsReduce | Opcode::RhsReduce)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Opcode::LhsReduce => "lhs_reduce",
            Opcode::LhsExpand => "lhs_expand",
            Opcode::RhsReduce => "rhs_reduce",
            Opcode::RhsExpand => "rhs_expand",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rewrite recorded on a proof stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofStep {
    pub opcode: Opcode,
    pub rule_id: u64,
}

impl ProofStep {
    pub fn new(opcode: Opcode, rule_id: u64) -> Self {
        Self { opcode, rule_id }
    }
}

impl fmt::Display for ProofStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via Axiom_{}", self.opcode, self.rule_id)
    }
}

/// A canonical axiom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub id: u64,
    pub lhs: Composite,
    pub rhs: Composite,
    pub lhs_tokens: Vec<Symbol>,
    pub rhs_tokens: Vec<Symbol>,
    /// Sides were exchanged during canonicalization
    pub was_swapped: bool,
}

impl RuleRecord {
    /// Swap sides so that `lhs >= rhs`
    ///
    /// Applying this to a canonical record changes nothing, including
    /// `was_swapped`.
    pub fn canonicalize(mut self) -> Self {
        if self.lhs < self.rhs {
            std::mem::swap(&mut self.lhs, &mut self.rhs);
            std::mem::swap(&mut self.lhs_tokens, &mut self.rhs_tokens);
            self.was_swapped = !self.was_swapped;
        }
        self
    }

    pub fn is_canonical(&self) -> bool {
        self.lhs >= self.rhs
    }

    /// Composite that must divide the rewritten side, and the one replacing it
    pub fn divisor_and_multiplier(&self, opcode: Opcode) -> (&Composite, &Composite) {
        if opcode.is_reduce() {
            (&self.lhs, &self.rhs)
        } else {
            (&self.rhs, &self.lhs)
        }
    }

    /// Token pattern to find, and its replacement
    pub fn pattern(&self, opcode: Opcode) -> (&[Symbol], &[Symbol]) {
        if opcode.is_reduce() {
            (&self.lhs_tokens, &self.rhs_tokens)
        } else {
            (&self.rhs_tokens, &self.lhs_tokens)
        }
    }

    /// Token sequences in the orientation they were entered
    pub fn original_orientation(&self) -> (&[Symbol], &[Symbol]) {
        if self.was_swapped {
            (&self.rhs_tokens, &self.lhs_tokens)
        } else {
            (&self.lhs_tokens, &self.rhs_tokens)
        }
    }
}

/// The equation being proved, canonicalized like an axiom with guid 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theorem {
    pub lhs: Composite,
    pub rhs: Composite,
    pub lhs_tokens: Vec<Symbol>,
    pub rhs_tokens: Vec<Symbol>,
    pub was_swapped: bool,
}

/// A node of the search tree
///
/// Transitions build new states; a state is never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TheoremState {
    pub lhs: Composite,
    pub rhs: Composite,
    pub proof: Vec<ProofStep>,
}

impl TheoremState {
    /// Root state for a theorem: its composites and an empty proof stack
    pub fn root(theorem: &Theorem) -> Self {
        Self {
            lhs: theorem.lhs.clone(),
            rhs: theorem.rhs.clone(),
            proof: Vec::new(),
        }
    }

    /// Both sides encode the same multiset
    pub fn is_terminal(&self) -> bool {
        self.lhs == self.rhs
    }

    pub fn side(&self, side: Side) -> &Composite {
        match side {
            Side::Lhs => &self.lhs,
            Side::Rhs => &self.rhs,
        }
    }

    pub fn key(&self) -> (Composite, Composite) {
        (self.lhs.clone(), self.rhs.clone())
    }

    /// Whether `opcode` with `rule` divides the side it rewrites
    pub fn admits(&self, opcode: Opcode, rule: &RuleRecord) -> bool {
        let (divisor, _) = rule.divisor_and_multiplier(opcode);
        !divisor.is_zero() && self.side(opcode.side()).is_multiple_of(divisor)
    }

    /// Child state produced by applying `rule` with `opcode`, if the side is divisible
    pub fn apply(&self, opcode: Opcode, rule: &RuleRecord) -> Option<TheoremState> {
        if !self.admits(opcode, rule) {
            return None;
        }
        let (divisor, multiplier) = rule.divisor_and_multiplier(opcode);
        let rewritten = self.side(opcode.side()) / divisor * multiplier;

        let mut proof = Vec::with_capacity(self.proof.len() + 1);
        proof.extend_from_slice(&self.proof);
        proof.push(ProofStep::new(opcode, rule.id));

        let (lhs, rhs) = match opcode.side() {
            Side::Lhs => (rewritten, self.rhs.clone()),
            Side::Rhs => (self.lhs.clone(), rewritten),
        };
        Some(TheoremState { lhs, rhs, proof })
    }
}

/// Axioms of a proof session, indexed by guid
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: Vec<RuleRecord>,
    next_id: u64,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            next_id: 1,
        }
    }
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode, validate and canonicalize an axiom, assigning the next guid
    pub fn add_axiom<S: AsRef<str>>(
        &mut self,
        codec: &mut SymbolCodec,
        lhs_tokens: &[S],
        rhs_tokens: &[S],
    ) -> ProofResult<&RuleRecord> {
        let id = self.next_id;
        let label = format!("Axiom_{}", id);
        let (lhs_tokens, rhs_tokens) = validated_sides(lhs_tokens, rhs_tokens, &label)?;

        let record = RuleRecord {
            id,
            lhs: codec.encode(&lhs_tokens),
            rhs: codec.encode(&rhs_tokens),
            lhs_tokens,
            rhs_tokens,
            was_swapped: false,
        }
        .canonicalize();

        self.next_id += 1;
        self.rules.push(record);
        Ok(&self.rules[self.rules.len() - 1])
    }

    /// Replace all axioms; guids restart at 1
    ///
    /// Every pair is validated before the store is touched, so a rejected set
    /// leaves the previous axioms in place.
    pub fn set_axioms<I, S>(&mut self, codec: &mut SymbolCodec, axioms: I) -> ProofResult<()>
    where
        I: IntoIterator<Item = (Vec<S>, Vec<S>)>,
        S: AsRef<str>,
    {
        let axioms: Vec<(Vec<S>, Vec<S>)> = axioms.into_iter().collect();
        for (index, (lhs, rhs)) in axioms.iter().enumerate() {
            validated_sides(lhs, rhs, &format!("Axiom_{}", index + 1))?;
        }

        let mut fresh = RuleStore::new();
        for (lhs, rhs) in &axioms {
            fresh.add_axiom(codec, lhs, rhs)?;
        }
        *self = fresh;
        Ok(())
    }

    /// Encode and canonicalize the theorem to prove
    pub fn set_theorem<S: AsRef<str>>(
        &self,
        codec: &mut SymbolCodec,
        lhs_tokens: &[S],
        rhs_tokens: &[S],
    ) -> ProofResult<Theorem> {
        let (lhs_tokens, rhs_tokens) = validated_sides(lhs_tokens, rhs_tokens, "theorem")?;
        let lhs = codec.encode(&lhs_tokens);
        let rhs = codec.encode(&rhs_tokens);

        let theorem = if lhs < rhs {
            Theorem {
                lhs: rhs,
                rhs: lhs,
                lhs_tokens: rhs_tokens,
                rhs_tokens: lhs_tokens,
                was_swapped: true,
            }
        } else {
            Theorem {
                lhs,
                rhs,
                lhs_tokens,
                rhs_tokens,
                was_swapped: false,
            }
        };
        Ok(theorem)
    }

    pub fn get(&self, id: u64) -> Option<&RuleRecord> {
        // Guids are dense and assigned in insertion order.
        id.checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.rules.get(index))
            .filter(|rule| rule.id == id)
    }

    pub fn rules(&self) -> &[RuleRecord] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validated_sides<S: AsRef<str>>(
    lhs: &[S],
    rhs: &[S],
    label: &str,
) -> ProofResult<(Vec<Symbol>, Vec<Symbol>)> {
    if lhs.is_empty() {
        return Err(ProofError::empty_side(Side::Lhs, label));
    }
    if rhs.is_empty() {
        return Err(ProofError::empty_side(Side::Rhs, label));
    }
    for (side, tokens) in [(Side::Lhs, lhs), (Side::Rhs, rhs)] {
        if tokens.iter().any(|t| t.as_ref().is_empty()) {
            return Err(ProofError::MalformedRule {
                side,
                rule: label.to_string(),
                message: "contains an empty token".to_string(),
            });
        }
    }
    Ok((
        lhs.iter().map(|t| t.as_ref().to_string()).collect(),
        rhs.iter().map(|t| t.as_ref().to_string()).collect(),
    ))
}
