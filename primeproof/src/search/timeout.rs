//! Wall-clock budget tracking for a search

use crate::ResourceLimits;
use std::time::{Duration, Instant};

/// Timeout tracker for a search
///
/// Restarted whenever a suspended session is resumed; time spent suspended
/// does not count against the budget.
#[derive(Debug, Clone)]
pub struct TimeoutTracker {
    start_time: Instant,
}

impl TimeoutTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Whether the search has run longer than `max_search_time_ms`
    pub fn is_expired(&self, limits: &ResourceLimits) -> bool {
        self.elapsed().as_millis() > u128::from(limits.max_search_time_ms)
    }
}

impl Default for TimeoutTracker {
    fn default() -> Self {
        Self::new()
    }
}
