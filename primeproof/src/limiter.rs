//! Admission control for search fan-out
//!
//! Each worker thread keeps its own count of sibling branches currently being
//! generated. A request is admitted only while the count stays below the
//! configured ceiling; rejected requests are dropped by the caller, not queued.
//! No lock is taken: the counter is thread-local and the only shared state is
//! a pair of atomic rejection counters kept for diagnostics.
//!
//! The weight of a request is the number of sibling branches about to be
//! explored. This bounds combinatorial fan-out, not call-stack depth.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

std::thread_local! {
    static IN_FLIGHT: Cell<usize> = const { Cell::new(0) };
}

/// Rejections observed by a limiter since creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionCounts {
    /// Requests refused
    pub batches: u64,
    /// Sum of the weights of refused requests
    pub transitions: u64,
}

#[derive(Debug, Clone)]
pub struct RecursionLimiter {
    ceiling: usize,
    rejected_batches: Arc<AtomicU64>,
    rejected_transitions: Arc<AtomicU64>,
}

impl RecursionLimiter {
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            rejected_batches: Arc::new(AtomicU64::new(0)),
            rejected_transitions: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Admit `weight` branches on the current thread if `in_flight + weight < ceiling`
    ///
    /// On rejection the counter is left untouched. Every `true` must be paired
    /// with exactly one [`RecursionLimiter::release`] of the same weight; prefer
    /// [`RecursionLimiter::admit`], which does that on drop.
    pub fn try_acquire(&self, weight: usize) -> bool {
        IN_FLIGHT.with(|counter| {
            let current = counter.get();
            match current.checked_add(weight) {
                Some(next) if next < self.ceiling => {
                    counter.set(next);
                    true
                }
                _ => {
                    self.rejected_batches.fetch_add(1, Ordering::Relaxed);
                    self.rejected_transitions
                        .fetch_add(weight as u64, Ordering::Relaxed);
                    false
                }
            }
        })
    }

    pub fn release(&self, weight: usize) {
        IN_FLIGHT.with(|counter| {
            let current = counter.get();
            debug_assert!(current >= weight, "released more than was acquired");
            counter.set(current.saturating_sub(weight));
        });
    }

    /// Scoped acquisition: the weight is released when the guard drops
    pub fn admit(&self, weight: usize) -> Option<AdmissionGuard<'_>> {
        if self.try_acquire(weight) {
            Some(AdmissionGuard {
                limiter: self,
                weight,
            })
        } else {
            None
        }
    }

    /// Branches currently admitted on the calling thread
    pub fn in_flight() -> usize {
        IN_FLIGHT.with(Cell::get)
    }

    pub fn rejections(&self) -> RejectionCounts {
        RejectionCounts {
            batches: self.rejected_batches.load(Ordering::Relaxed),
            transitions: self.rejected_transitions.load(Ordering::Relaxed),
        }
    }
}

/// Admitted capacity, returned to the limiter on drop
#[must_use = "capacity is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct AdmissionGuard<'a> {
    limiter: &'a RecursionLimiter,
    weight: usize,
}

impl AdmissionGuard<'_> {
    pub fn weight(&self) -> usize {
        self.weight
    }
}

impl Drop for AdmissionGuard<'_> {
    fn drop(&mut self) {
        self.limiter.release(self.weight);
    }
}
