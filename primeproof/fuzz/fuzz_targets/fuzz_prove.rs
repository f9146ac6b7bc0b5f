#![no_main]

use libfuzzer_sys::fuzz_target;
use primeproof::{Prover, ResourceLimits};

fn tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

// Lines of `lhs = rhs`; the last one is the theorem.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut equations: Vec<(Vec<&str>, Vec<&str>)> = s
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(lhs, rhs)| (tokens(lhs), tokens(rhs)))
        .collect();
    let Some((lhs, rhs)) = equations.pop() else {
        return;
    };

    let limits = ResourceLimits {
        max_states: 500,
        max_search_time_ms: 200,
        ..ResourceLimits::default()
    };
    let mut prover = Prover::with_limits(limits);
    if prover.set_axioms(equations).is_err() {
        return;
    }
    if let Ok(report) = prover.prove(&lhs, &rhs) {
        if report.is_proved() {
            assert_eq!(report.final_lhs, report.final_rhs);
        }
    }
});
