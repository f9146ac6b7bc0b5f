//! Search frontier
//!
//! The one structure shared by concurrent workers. Insertion and the
//! visited-state check happen under a single lock, so two workers can never
//! both enqueue the same `(lhs, rhs)` pair.

use crate::codec::Composite;
use crate::resource_limits::FrontierOrder;
use crate::rules::TheoremState;
use parking_lot::Mutex;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};

struct Entry {
    state: TheoremState,
    seq: u64,
}

// Max-heap on (lhs, rhs); equal keys pop in insertion order.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.state
            .lhs
            .cmp(&other.state.lhs)
            .then_with(|| self.state.rhs.cmp(&other.state.rhs))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct Inner {
    heap: BinaryHeap<Entry>,
    queue: VecDeque<Entry>,
    seen: HashSet<(Composite, Composite)>,
    next_seq: u64,
}

/// Counts from a batch insertion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushOutcome {
    pub pushed: usize,
    pub duplicates: usize,
}

pub struct Frontier {
    order: FrontierOrder,
    inner: Mutex<Inner>,
}

impl Frontier {
    pub fn new(order: FrontierOrder) -> Self {
        Self {
            order,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Enqueue every state whose `(lhs, rhs)` pair has not been seen before
    pub fn push_unseen(&self, states: impl IntoIterator<Item = TheoremState>) -> PushOutcome {
        let mut outcome = PushOutcome::default();
        let mut inner = self.inner.lock();
        for state in states {
            if !inner.seen.insert(state.key()) {
                outcome.duplicates += 1;
                continue;
            }
            let seq = inner.next_seq;
            inner.next_seq += 1;
            let entry = Entry { state, seq };
            match self.order {
                FrontierOrder::LargestFirst => inner.heap.push(entry),
                FrontierOrder::BreadthFirst => inner.queue.push_back(entry),
            }
            outcome.pushed += 1;
        }
        outcome
    }

    pub fn pop(&self) -> Option<TheoremState> {
        let mut inner = self.inner.lock();
        let entry = match self.order {
            FrontierOrder::LargestFirst => inner.heap.pop(),
            FrontierOrder::BreadthFirst => inner.queue.pop_front(),
        };
        entry.map(|entry| entry.state)
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock();
        inner.heap.len() + inner.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pending states in insertion order, and every visited pair
    ///
    /// Pushing the states back in this order into a fresh frontier with the
    /// same [`FrontierOrder`] reproduces the pop order.
    pub fn snapshot(&self) -> (Vec<TheoremState>, Vec<(Composite, Composite)>) {
        let inner = self.inner.lock();
        let mut pending: Vec<&Entry> = inner.heap.iter().chain(inner.queue.iter()).collect();
        pending.sort_by_key(|entry| entry.seq);
        let states = pending.into_iter().map(|entry| entry.state.clone()).collect();
        let seen = inner.seen.iter().cloned().collect();
        (states, seen)
    }

    /// Rebuild from a snapshot; pending states are enqueued even though their keys are seen
    pub fn restore(
        order: FrontierOrder,
        pending: Vec<TheoremState>,
        seen: Vec<(Composite, Composite)>,
    ) -> Self {
        let frontier = Self::new(order);
        {
            let mut inner = frontier.inner.lock();
            for state in pending {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                inner.seen.insert(state.key());
                let entry = Entry { state, seq };
                match order {
                    FrontierOrder::LargestFirst => inner.heap.push(entry),
                    FrontierOrder::BreadthFirst => inner.queue.push_back(entry),
                }
            }
            inner.seen.extend(seen);
        }
        frontier
    }
}
