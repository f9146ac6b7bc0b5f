//! Call-graph analysis
//!
//! Precomputes which rewrite relations hold between every ordered pair of
//! equations (the theorem and each axiom). The search engine uses the result
//! as an optional pruning oracle; it stays correct without it.

use crate::codec::Composite;
use crate::rules::{Opcode, RuleRecord, Side, Theorem, THEOREM_ID};
use num_integer::Integer;
use num_traits::Zero;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Relation between a source equation and a target rule
///
/// Same four cases as a search transition: the source side named by the
/// opcode is divisible by the target side that opcode would remove.
pub type Relation = Opcode;

/// `source`'s side is divisible by the corresponding side of `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CallGraphEdge {
    pub source: u64,
    pub relation: Relation,
    pub target: u64,
}

/// All qualifying edges between the theorem (guid 0) and the rules
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    edges: BTreeSet<CallGraphEdge>,
    relations: HashMap<(u64, u64), Vec<Relation>>,
}

struct Node<'a> {
    id: u64,
    lhs: &'a Composite,
    rhs: &'a Composite,
}

impl Node<'_> {
    fn side(&self, relation: Relation, as_target: bool) -> &Composite {
        if as_target {
            // Reduce removes the target's lhs, expand removes its rhs.
            if relation.is_reduce() {
                self.lhs
            } else {
                self.rhs
            }
        } else {
            match relation.side() {
                Side::Lhs => self.lhs,
                Side::Rhs => self.rhs,
            }
        }
    }
}

/// Build the call graph over `{theorem} ∪ rules`
///
/// Tests the four divisibility relations for every ordered pair of distinct
/// equations. Pure: the inputs are not modified.
pub fn build_call_graph(theorem: &Theorem, rules: &[RuleRecord]) -> CallGraph {
    let mut nodes = Vec::with_capacity(rules.len() + 1);
    nodes.push(Node {
        id: THEOREM_ID,
        lhs: &theorem.lhs,
        rhs: &theorem.rhs,
    });
    nodes.extend(rules.iter().map(|rule| Node {
        id: rule.id,
        lhs: &rule.lhs,
        rhs: &rule.rhs,
    }));

    let edges: BTreeSet<CallGraphEdge> = nodes
        .par_iter()
        .flat_map_iter(|source| {
            nodes
                .iter()
                .filter(move |target| target.id != source.id && target.id != THEOREM_ID)
                .flat_map(move |target| {
                    Opcode::ALL.into_iter().filter_map(move |relation| {
                        let divisor = target.side(relation, true);
                        let divisible = !divisor.is_zero()
                            && source.side(relation, false).is_multiple_of(divisor);
                        divisible.then_some(CallGraphEdge {
                            source: source.id,
                            relation,
                            target: target.id,
                        })
                    })
                })
        })
        .collect();

    let mut relations: HashMap<(u64, u64), Vec<Relation>> = HashMap::new();
    for edge in &edges {
        relations
            .entry((edge.source, edge.target))
            .or_default()
            .push(edge.relation);
    }

    CallGraph { edges, relations }
}

impl CallGraph {
    /// Edges in `(source, relation, target)` order
    pub fn edges(&self) -> impl Iterator<Item = &CallGraphEdge> {
        self.edges.iter()
    }

    pub fn contains(&self, edge: &CallGraphEdge) -> bool {
        self.edges.contains(edge)
    }

    /// Relations that hold from `source` to `target`, in opcode order
    pub fn relations_from(&self, source: u64, target: u64) -> &[Relation] {
        self.relations
            .get(&(source, target))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rules reachable by at least one relation from `source`
    pub fn targets_of(&self, source: u64) -> BTreeSet<u64> {
        self.edges
            .iter()
            .filter(|edge| edge.source == source)
            .map(|edge| edge.target)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
