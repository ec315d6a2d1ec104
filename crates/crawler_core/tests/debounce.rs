use crawler_core::{DebounceStage, DebounceStep, DebounceStream};

#[test]
fn burst_of_submits_commits_last_value_once() {
    let mut stream = DebounceStream::new();
    let frames: Vec<_> = [100, 200, 300, 400, 500]
        .into_iter()
        .map(|value| stream.submit(value))
        .collect();

    // Only the newest frame is still valid.
    let mut quiet = Vec::new();
    for token in frames {
        if let DebounceStep::ScheduleQuiet(next) = stream.frame_elapsed(token) {
            quiet.push(next);
        }
    }
    assert_eq!(quiet.len(), 1);
    assert_eq!(stream.stage(), DebounceStage::PendingCommit);

    assert_eq!(stream.quiet_elapsed(quiet[0]), DebounceStep::Commit(500));
    assert_eq!(stream.stage(), DebounceStage::Idle);
    assert_eq!(stream.quiet_elapsed(quiet[0]), DebounceStep::Ignored);
}

#[test]
fn new_input_during_quiet_period_restarts_the_wait() {
    let mut stream = DebounceStream::new();
    let frame = stream.submit(1.0);
    let DebounceStep::ScheduleQuiet(first_quiet) = stream.frame_elapsed(frame) else {
        panic!("expected quiet timer");
    };

    let second_frame = stream.submit(2.0);
    assert_eq!(stream.quiet_elapsed(first_quiet), DebounceStep::Ignored);
    assert_eq!(stream.pending(), Some(&2.0));

    let DebounceStep::ScheduleQuiet(second_quiet) = stream.frame_elapsed(second_frame) else {
        panic!("expected quiet timer");
    };
    assert_eq!(stream.quiet_elapsed(second_quiet), DebounceStep::Commit(2.0));
}

#[test]
fn quiet_timer_before_frame_is_ignored() {
    let mut stream = DebounceStream::new();
    let frame = stream.submit("a");

    assert_eq!(stream.quiet_elapsed(frame), DebounceStep::Ignored);
    assert_eq!(stream.stage(), DebounceStage::Coalescing);
}

#[test]
fn cancel_invalidates_outstanding_timers() {
    let mut stream = DebounceStream::new();
    let frame = stream.submit(7);
    stream.cancel();

    assert_eq!(stream.frame_elapsed(frame), DebounceStep::Ignored);
    assert_eq!(stream.pending(), None);
    assert_eq!(stream.stage(), DebounceStage::Idle);
}

#[test]
fn flush_commits_pending_value_immediately() {
    let mut stream = DebounceStream::new();
    let frame = stream.submit(42);

    assert_eq!(stream.flush(), DebounceStep::Commit(42));
    assert_eq!(stream.frame_elapsed(frame), DebounceStep::Ignored);
    assert_eq!(stream.flush(), DebounceStep::Ignored);
}
