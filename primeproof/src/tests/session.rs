use super::arithmetic_axioms;
use crate::session::*;
use crate::{ProofError, ProofStatus, Prover, ResourceLimits, StopReason};

const FOUR_ONES: [&str; 7] = ["1", "+", "1", "+", "1", "+", "1"];

fn arithmetic_prover() -> Prover {
    let mut prover = Prover::new();
    prover.set_axioms(arithmetic_axioms()).unwrap();
    prover
}

#[test]
fn test_session_ids_are_sequential() {
    let mut prover = arithmetic_prover();
    let first = prover.suspend(prover.start(&FOUR_ONES, &["4"]).unwrap()).unwrap();
    let second = prover.suspend(prover.start(&FOUR_ONES, &["4"]).unwrap()).unwrap();
    assert_eq!(first.to_string(), "1");
    assert_eq!(second.to_string(), "2");
    assert!(prover.has_session(&first));
    assert!(prover.has_session(&second));
}

#[test]
fn test_session_id_parse() {
    let id: SessionId = " 42 ".parse().unwrap();
    assert_eq!(id.to_string(), "42");
    assert!(matches!(
        "forty-two".parse::<SessionId>(),
        Err(ProofError::Snapshot(_))
    ));
}

#[test]
fn test_resume_continues_where_it_stopped() {
    let mut prover = arithmetic_prover();
    let direct = prover.prove(&FOUR_ONES, &["4"]).unwrap();

    let mut session = prover.start(&FOUR_ONES, &["4"]).unwrap();
    assert!(session.advance(1).unwrap().is_none());
    let id = prover.suspend(session).unwrap();

    let mut resumed = prover.resume(&id).unwrap();
    assert_eq!(resumed.stats().states_popped, 1);
    let report = resumed.run().unwrap();

    assert_eq!(report.status, ProofStatus::Proved);
    assert_eq!(report.proof, direct.proof);
    assert_eq!(report.commit_log, direct.commit_log);
    assert_eq!(report.stats, direct.stats);
}

#[test]
fn test_resume_twice_fails() {
    let mut prover = arithmetic_prover();
    let id = prover.suspend(prover.start(&FOUR_ONES, &["4"]).unwrap()).unwrap();
    prover.resume(&id).unwrap();
    assert!(!prover.has_session(&id));
    assert!(matches!(
        prover.resume(&id),
        Err(ProofError::SessionNotFound(missing)) if missing == id
    ));
}

#[test]
fn test_resume_unknown_session() {
    let mut prover = arithmetic_prover();
    let id: SessionId = "7".parse().unwrap();
    assert!(matches!(
        prover.resume(&id),
        Err(ProofError::SessionNotFound(_))
    ));
}

#[test]
fn test_session_keeps_its_axioms() {
    let mut prover = arithmetic_prover();
    let id = prover.suspend(prover.start(&FOUR_ONES, &["4"]).unwrap()).unwrap();

    prover.set_axioms([(vec!["p"], vec!["q"])]).unwrap();
    let report = prover.resume(&id).unwrap().run().unwrap();
    assert!(report.is_proved());
}

#[test]
fn test_snapshot_json_round_trip() {
    let prover = arithmetic_prover();
    let mut session = prover.start(&FOUR_ONES, &["4"]).unwrap();
    session.advance(2).unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.symbols, vec!["1", "+", "2", "4"]);
    assert_eq!(snapshot.theorem.1, vec!["4"]);
    assert_eq!(snapshot.stats.states_popped, 2);

    let restored = SessionSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(restored, snapshot);

    let mut resumed = ProofSession::from_snapshot(restored).unwrap();
    assert!(resumed.run().unwrap().is_proved());
}

#[test]
fn test_swapped_theorem_snapshot_keeps_entered_orientation() {
    let prover = arithmetic_prover();
    let session = prover.start(&["4"], &FOUR_ONES).unwrap();
    assert!(session.search().context().theorem.was_swapped);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.theorem.0, vec!["4"]);
    let resumed = ProofSession::from_snapshot(snapshot).unwrap();
    assert!(resumed.search().context().theorem.was_swapped);
}

#[test]
fn test_corrupt_snapshot() {
    assert!(matches!(
        SessionSnapshot::from_json("{\"symbols\": 3}"),
        Err(ProofError::Snapshot(_))
    ));
}

#[test]
fn test_snapshot_with_missing_symbols_is_rejected() {
    let prover = arithmetic_prover();
    let mut snapshot = prover.start(&FOUR_ONES, &["4"]).unwrap().snapshot();
    snapshot.symbols.truncate(2);
    assert!(matches!(
        ProofSession::from_snapshot(snapshot),
        Err(ProofError::Snapshot(_))
    ));
}

#[test]
fn test_order_mismatch_is_verification_failure() {
    let prover = Prover::new();
    let report = prover.prove(&["a", "b"], &["b", "a"]).unwrap();
    assert_eq!(report.status, ProofStatus::VerificationFailed);
    assert_eq!(report.stop_reason, Some(StopReason::Exhausted));
    assert_eq!(report.rejected_candidates, 1);
}

#[test]
fn test_every_candidate_rejected() {
    let mut prover = Prover::new();
    prover.set_axioms([(vec!["x", "y"], vec!["z"])]).unwrap();
    let report = prover.prove(&["y", "x"], &["z"]).unwrap();
    assert_eq!(report.status, ProofStatus::VerificationFailed);
    assert_eq!(report.rejected_candidates, 2);
    assert_eq!(report.stats.candidates, 2);
}

#[test]
fn test_no_proof_reports_partial_trace() {
    let prover = arithmetic_prover();
    let report = prover.prove(&["1", "+", "1", "+", "1"], &["4"]).unwrap();
    assert_eq!(report.status, ProofStatus::NoProof);
    assert_eq!(report.stop_reason, Some(StopReason::Exhausted));
    assert!(!report.proof.is_empty());
    assert_eq!(report.commit_log.len(), report.proof_steps.len());
}

#[test]
fn test_finished_session_repeats_its_report() {
    let prover = arithmetic_prover();
    let mut session = prover.start(&FOUR_ONES, &["4"]).unwrap();
    let first = session.run().unwrap();
    assert!(session.is_finished());
    let again = session.advance(1).unwrap().unwrap();
    assert_eq!(again.proof, first.proof);
}

#[test]
fn test_limits_travel_with_the_session() {
    let limits = ResourceLimits {
        max_states: 50,
        ..ResourceLimits::default()
    };
    let mut prover = Prover::with_limits(limits.clone());
    prover.set_axioms([(vec!["a"], vec!["a", "a"])]).unwrap();
    let session = prover.start(&["b"], &["a"]).unwrap();
    assert_eq!(session.snapshot().limits, limits);

    let id = prover.suspend(session).unwrap();
    let report = prover.resume(&id).unwrap().run().unwrap();
    assert_eq!(report.status, ProofStatus::LimitReached);
    assert_eq!(report.stop_reason, Some(StopReason::StateBudget));
    assert_eq!(report.stats.states_popped, 50);
}
