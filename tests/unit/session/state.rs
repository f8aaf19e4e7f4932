use super::*;
use crate::capture::source::test_pattern;

fn still() -> ImageBuffer {
    ImageBuffer::encode_jpeg(&test_pattern(8, 6), 80).unwrap()
}

fn run_to_capture(s: &mut Session) {
    assert_eq!(s.apply(SessionInput::CountdownElapsed).unwrap(), Transition::Capture);
}

#[test]
fn zero_target_is_rejected() {
    assert!(matches!(Session::new(0), Err(BoothError::Validation(_))));
}

#[test]
fn full_run_reaches_complete_with_all_images() {
    let mut s = Session::new(3).unwrap();
    assert_eq!(s.apply(SessionInput::Start).unwrap(), Transition::BeginCountdown);

    for i in 0..3 {
        assert_eq!(s.status(), SessionStatus::CountingDown);
        assert_eq!(s.current_photo(), i + 1);
        run_to_capture(&mut s);
        let t = s.apply(SessionInput::Captured(still())).unwrap();
        if i < 2 {
            assert_eq!(t, Transition::Pause);
            assert_eq!(s.status(), SessionStatus::Capturing);
            assert_eq!(
                s.apply(SessionInput::PauseElapsed).unwrap(),
                Transition::BeginCountdown
            );
        } else {
            assert_eq!(t, Transition::Complete);
        }
    }

    assert_eq!(s.status(), SessionStatus::Complete);
    assert_eq!(s.captured().len(), 3);
    assert_eq!(s.remaining(), 0);
    assert_eq!(s.current_photo(), 3);
}

#[test]
fn single_photo_session_completes_without_pause() {
    let mut s = Session::new(1).unwrap();
    s.apply(SessionInput::Start).unwrap();
    run_to_capture(&mut s);
    assert_eq!(
        s.apply(SessionInput::Captured(still())).unwrap(),
        Transition::Complete
    );
}

#[test]
fn terminal_states_ignore_everything() {
    let mut s = Session::new(2).unwrap();
    s.apply(SessionInput::Start).unwrap();
    assert_eq!(s.apply(SessionInput::Cancel).unwrap(), Transition::Stopped);
    assert_eq!(s.status(), SessionStatus::Cancelled);

    // A timer that was already in flight cannot resurrect the session.
    assert_eq!(
        s.apply(SessionInput::CountdownElapsed).unwrap(),
        Transition::Ignored
    );
    assert_eq!(
        s.apply(SessionInput::Captured(still())).unwrap(),
        Transition::Ignored
    );
    assert_eq!(s.apply(SessionInput::Cancel).unwrap(), Transition::Ignored);
    assert!(s.captured().is_empty());
    assert_eq!(s.status(), SessionStatus::Cancelled);
}

#[test]
fn cancel_is_accepted_from_every_live_state() {
    // Idle
    let mut s = Session::new(2).unwrap();
    assert_eq!(s.apply(SessionInput::Cancel).unwrap(), Transition::Stopped);

    // Capturing, mid-pause
    let mut s = Session::new(2).unwrap();
    s.apply(SessionInput::Start).unwrap();
    run_to_capture(&mut s);
    s.apply(SessionInput::Captured(still())).unwrap();
    assert_eq!(s.apply(SessionInput::Cancel).unwrap(), Transition::Stopped);
    assert_eq!(s.captured().len(), 1);
    assert_eq!(
        s.apply(SessionInput::PauseElapsed).unwrap(),
        Transition::Ignored
    );
}

#[test]
fn permission_error_only_before_countdown() {
    let mut s = Session::new(2).unwrap();
    assert_eq!(
        s.apply(SessionInput::PermissionError).unwrap(),
        Transition::Stopped
    );
    assert_eq!(s.status(), SessionStatus::PermissionDenied);

    let mut s = Session::new(2).unwrap();
    s.apply(SessionInput::Start).unwrap();
    assert!(matches!(
        s.apply(SessionInput::PermissionError),
        Err(BoothError::InvalidTransition {
            from: SessionStatus::CountingDown,
            ..
        })
    ));
}

#[test]
fn capture_failure_fails_the_session() {
    let mut s = Session::new(3).unwrap();
    s.apply(SessionInput::Start).unwrap();
    run_to_capture(&mut s);
    assert_eq!(
        s.apply(SessionInput::CaptureFailed).unwrap(),
        Transition::Stopped
    );
    assert_eq!(s.status(), SessionStatus::Failed);
}

#[test]
fn captures_are_only_accepted_right_after_a_countdown() {
    let mut s = Session::new(3).unwrap();
    assert!(s.apply(SessionInput::Captured(still())).is_err());

    s.apply(SessionInput::Start).unwrap();
    assert!(s.apply(SessionInput::Captured(still())).is_err());

    run_to_capture(&mut s);
    s.apply(SessionInput::Captured(still())).unwrap();
    // Second capture during the pause is rejected; nothing is appended.
    assert!(s.apply(SessionInput::Captured(still())).is_err());
    assert_eq!(s.captured().len(), 1);
}

#[test]
fn images_never_exceed_target() {
    for n in 1..=6u32 {
        let mut s = Session::new(n).unwrap();
        let mut t = s.apply(SessionInput::Start).unwrap();
        loop {
            t = match t {
                Transition::BeginCountdown => s.apply(SessionInput::CountdownElapsed).unwrap(),
                Transition::Capture => s.apply(SessionInput::Captured(still())).unwrap(),
                Transition::Pause => s.apply(SessionInput::PauseElapsed).unwrap(),
                Transition::Complete => break,
                other => panic!("unexpected {other:?}"),
            };
            assert!(s.captured().len() as u32 <= n);
        }
        assert_eq!(s.captured().len() as u32, n);
    }
}
