use crossbeam::channel::unbounded;
use platterrs::midi::MockPulseSource;
use platterrs::pulse_loop::{run_pulse_loop, spawn_source_reader, ForwardMode, PulseLoop};
use platterrs::smoother::{EstimatorConfig, ManualClock, NotifyOutcome, PulseVelocityEstimator};

fn estimator(clock: &ManualClock) -> PulseVelocityEstimator<ManualClock> {
    PulseVelocityEstimator::new(EstimatorConfig::new(360, 1.8).unwrap(), clock.clone())
}

#[test]
fn test_bytes_dropped_while_stopped() {
    let clock = ManualClock::new();
    let (_tx, rx) = unbounded();
    let mut pulse_loop = PulseLoop::new(estimator(&clock), rx, ForwardMode::DataByte);

    clock.advance_ms(10);
    assert!(pulse_loop.handle_message(&[0xB0, 0x10, 0x05]).is_empty());
    assert_eq!(pulse_loop.estimator().velocity(), 0.0);
}

#[test]
fn test_start_and_stop_messages_drive_activation() {
    let clock = ManualClock::new();
    let (_tx, rx) = unbounded();
    let mut pulse_loop = PulseLoop::new(estimator(&clock), rx, ForwardMode::DataByte);

    pulse_loop.handle_message(&[0xFA]);
    assert!(pulse_loop.estimator().is_active());

    clock.advance_ms(10);
    let outcomes = pulse_loop.handle_message(&[0xB0, 0x10, 0x05]);
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0], NotifyOutcome::Updated(_)));
    assert!((pulse_loop.estimator().velocity() - 0.25).abs() < 1e-12);

    pulse_loop.handle_message(&[0xFC]);
    assert!(!pulse_loop.estimator().is_active());

    clock.advance_ms(10);
    assert!(pulse_loop.handle_message(&[0xB0, 0x10, 0x07]).is_empty());
    assert!((pulse_loop.estimator().velocity() - 0.25).abs() < 1e-12);

    pulse_loop.handle_message(&[0xFB]);
    assert!(pulse_loop.estimator().is_active());
}

#[test]
fn test_note_release_and_pressure_are_not_rotation() {
    let clock = ManualClock::new();
    let (_tx, rx) = unbounded();
    let mut pulse_loop = PulseLoop::new(estimator(&clock), rx, ForwardMode::DataByte);
    pulse_loop.handle_message(&[0xFA]);

    clock.advance_ms(10);
    pulse_loop.handle_message(&[0xB0, 0x10, 0x05]);
    let before = pulse_loop.estimator().velocity();
    assert!((before - 0.25).abs() < 1e-12);

    // Touch sensor release and pressure from the platter
    clock.advance_ms(10);
    assert!(pulse_loop.handle_message(&[0x80, 0x3C, 0x40]).is_empty());
    assert!(pulse_loop.handle_message(&[0xD0, 0x20]).is_empty());
    assert_eq!(pulse_loop.estimator().velocity(), before);
    assert_eq!(pulse_loop.estimator().stored_value(), 5);

    // Note-on touches still forward their data byte
    assert_eq!(pulse_loop.handle_message(&[0x90, 0x3C, 0x01]).len(), 1);
}

#[test]
fn test_controller_filter() {
    let clock = ManualClock::new();
    let (_tx, rx) = unbounded();
    let mut pulse_loop = PulseLoop::new(estimator(&clock), rx, ForwardMode::Controller(0x16));
    pulse_loop.handle_message(&[0xFA]);

    clock.advance_ms(10);
    assert!(pulse_loop.handle_message(&[0xB0, 0x17, 0x05]).is_empty());
    assert!(pulse_loop.handle_message(&[0x90, 0x16, 0x05]).is_empty());
    assert_eq!(pulse_loop.handle_message(&[0xB0, 0x16, 0x05]).len(), 1);
}

#[test]
fn test_raw_bytes_mode_sees_status_bytes() {
    let clock = ManualClock::new();
    let (_tx, rx) = unbounded();
    let mut pulse_loop = PulseLoop::new(estimator(&clock), rx, ForwardMode::RawBytes);
    pulse_loop.handle_message(&[0xFA]);

    clock.advance_ms(10);
    // Note-off status on channel 1: (0x01 << 7) | 0 keeps the note-off nibble
    let outcomes = pulse_loop.handle_message(&[0x81, 0x3C, 0x05]);
    assert_eq!(outcomes[0], NotifyOutcome::Incomplete);
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[2], NotifyOutcome::Updated(_)));
}

#[test]
fn test_loop_runs_until_source_disconnects() {
    let clock = ManualClock::new();
    let mut est = estimator(&clock);
    let state = est.state();
    est.activate();

    let source = MockPulseSource::new(vec![
        vec![0xB0, 0x10, 0x05],
        vec![0xF8],
        vec![0xB0, 0x10, 0x05],
        vec![0xB0, 0x10, 0x03],
    ]);

    // All messages arrive at the same synthetic instant: zero interval
    let handle = run_pulse_loop(source, est, ForwardMode::DataByte);
    let est = handle.join().expect("pulse loop panicked");

    assert!(!state.is_active());
    assert!(!est.is_active());
    assert_eq!(est.stored_value(), 3);
    assert_eq!(state.velocity(), 0.0);
}

#[test]
fn test_source_reader_forwards_in_order() {
    let source = MockPulseSource::new(vec![vec![0xFA], vec![0xB0, 0x10, 0x01]]);
    let (rx, handle) = spawn_source_reader(source);

    assert_eq!(rx.recv().unwrap(), vec![0xFA]);
    assert_eq!(rx.recv().unwrap(), vec![0xB0, 0x10, 0x01]);
    handle.join().unwrap();
    assert!(rx.recv().is_err());
}
