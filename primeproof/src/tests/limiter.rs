use crate::limiter::*;

#[test]
fn test_acquire_below_ceiling() {
    let limiter = RecursionLimiter::new(4);
    assert!(limiter.try_acquire(3));
    assert_eq!(RecursionLimiter::in_flight(), 3);
    limiter.release(3);
    assert_eq!(RecursionLimiter::in_flight(), 0);
}

#[test]
fn test_reaching_ceiling_is_rejected() {
    let limiter = RecursionLimiter::new(4);
    assert!(!limiter.try_acquire(4));
    assert_eq!(RecursionLimiter::in_flight(), 0);
    assert_eq!(
        limiter.rejections(),
        RejectionCounts {
            batches: 1,
            transitions: 4,
        }
    );
}

#[test]
fn test_nested_acquisitions_accumulate() {
    let limiter = RecursionLimiter::new(5);
    let outer = limiter.admit(2).unwrap();
    {
        let inner = limiter.admit(2).unwrap();
        assert_eq!(inner.weight(), 2);
        assert_eq!(RecursionLimiter::in_flight(), 4);
        assert!(limiter.admit(1).is_none());
    }
    assert_eq!(RecursionLimiter::in_flight(), 2);
    drop(outer);
    assert_eq!(RecursionLimiter::in_flight(), 0);
    assert_eq!(limiter.rejections().batches, 1);
}

#[test]
fn test_ceiling_of_one_rejects_everything() {
    let limiter = RecursionLimiter::new(1);
    assert!(limiter.admit(1).is_none());
    assert!(limiter.admit(0).is_some());
}

#[test]
fn test_guard_released_on_early_return() {
    fn bail(limiter: &RecursionLimiter) -> Result<(), &'static str> {
        let _guard = limiter.admit(2).ok_or("rejected")?;
        Err("failed midway")
    }

    let limiter = RecursionLimiter::new(10);
    assert!(bail(&limiter).is_err());
    assert_eq!(RecursionLimiter::in_flight(), 0);
}

#[test]
fn test_counters_are_per_thread() {
    let limiter = RecursionLimiter::new(3);
    let _held = limiter.admit(2).unwrap();

    let worker = limiter.clone();
    let admitted = std::thread::spawn(move || {
        let admitted = worker.try_acquire(2);
        if admitted {
            worker.release(2);
        }
        admitted
    })
    .join()
    .unwrap();

    assert!(admitted);
    assert_eq!(RecursionLimiter::in_flight(), 2);
}

#[test]
fn test_rejected_admission_leaves_counter_unchanged() {
    let limiter = RecursionLimiter::new(4);
    let outer = limiter.admit(2).unwrap();

    assert!(limiter.admit(2).is_none());
    assert_eq!(RecursionLimiter::in_flight(), 2);
    assert!(!limiter.try_acquire(3));
    assert_eq!(RecursionLimiter::in_flight(), 2);

    // The rejections did not free any capacity.
    assert!(limiter.admit(2).is_none());
    let inner = limiter.admit(1).unwrap();
    assert_eq!(RecursionLimiter::in_flight(), 3);

    drop(inner);
    drop(outer);
    assert_eq!(RecursionLimiter::in_flight(), 0);
    assert_eq!(
        limiter.rejections(),
        RejectionCounts {
            batches: 3,
            transitions: 7,
        }
    );
}
