//! Integration tests for the start → deliver → check → stop lifecycle.
//!
//! Deliveries and checks are fed to the sampler directly, the way the
//! owner loop would after draining its queue.

use std::time::Duration;

use crate::mock_motion::{MockMotion, MockTimer, MotionCall, RecordingSink};

use levelbubble::app::commands::SamplerCommand;
use levelbubble::app::events::AppEvent;
use levelbubble::app::ports::MotionDelivery;
use levelbubble::config::SamplerConfig;
use levelbubble::{OrientationSample, OrientationSampler, Phase, SamplerError, SamplerState};

fn sample(pitch: f64, roll: f64) -> MotionDelivery {
    MotionDelivery::Sample(OrientationSample::new(pitch, roll))
}

fn sampler(motion: MockMotion) -> OrientationSampler<MockMotion> {
    OrientationSampler::new(motion, SamplerConfig::default())
}

// ── Capability missing ───────────────────────────────────────

#[test]
fn start_without_capability_stays_inactive() {
    let (motion, log) = MockMotion::incapable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let result = s.start(&mut timer, &mut sink);
    assert_eq!(result, Err(SamplerError::CapabilityUnavailable));
    assert!(!s.is_active());
    assert_eq!(s.phase(), Phase::Failed);
    assert_eq!(log.borrow().start_count(), 0, "facility must not be started");
    assert!(timer.scheduled.is_empty(), "no activation check without a session");

    // Repeated attempts keep failing the same way.
    assert!(s.start(&mut timer, &mut sink).is_err());
    assert!(!s.is_active());
    assert_eq!(
        sink.failures(),
        vec![SamplerError::CapabilityUnavailable, SamplerError::CapabilityUnavailable]
    );
}

#[test]
fn capability_returning_allows_a_later_start() {
    let (motion, log) = MockMotion::incapable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    assert!(s.start(&mut timer, &mut sink).is_err());
    {
        let mut log = log.borrow_mut();
        log.available = true;
        log.engages = true;
    }
    let session = s.start(&mut timer, &mut sink).unwrap();
    s.handle_delivery(session, sample(0.0, 0.0), &mut sink);
    assert!(s.is_active());
    assert!(s.last_failure().is_none());
}

// ── Scenario A: first sample goes live ───────────────────────

#[test]
fn sample_after_start_is_published_live() {
    let (motion, log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let session = s.start(&mut timer, &mut sink).unwrap();
    assert!(!s.is_active(), "no data yet");
    assert_eq!(s.phase(), Phase::Starting);

    s.handle_delivery(session, sample(0.1, -0.2), &mut sink);
    assert_eq!(
        s.state(),
        SamplerState {
            pitch: 0.1,
            roll: -0.2,
            is_active: true
        }
    );
    assert_eq!(s.phase(), Phase::Live);

    let calls = &log.borrow().calls;
    assert_eq!(
        calls[0],
        MotionCall::StartUpdates {
            interval: SamplerConfig::default().update_interval(),
            session
        }
    );
}

#[test]
fn every_sample_overwrites_readings_and_notifies() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();
    let session = s.start(&mut timer, &mut sink).unwrap();

    let readings = [(0.01, 0.02), (-0.3, 0.4), (0.5, -0.6), (0.5, -0.6)];
    for (i, (p, r)) in readings.iter().enumerate() {
        let before = sink.state_updates();
        s.handle_delivery(session, sample(*p, *r), &mut sink);
        assert_eq!(sink.state_updates(), before + 1, "sample {i} must notify");
        assert!(s.is_active());
        assert_eq!(s.latest(), OrientationSample::new(*p, *r));
    }
    assert_eq!(s.samples_in_session(), readings.len() as u64);
}

#[test]
fn empty_ticks_change_nothing() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();
    let session = s.start(&mut timer, &mut sink).unwrap();

    let events_before = sink.events.len();
    s.handle_delivery(session, MotionDelivery::Empty, &mut sink);
    assert_eq!(sink.events.len(), events_before);
    assert_eq!(s.phase(), Phase::Starting);

    s.handle_delivery(session, sample(0.2, 0.2), &mut sink);
    let state = s.state();
    s.handle_delivery(session, MotionDelivery::Empty, &mut sink);
    assert_eq!(s.state(), state);
    assert_eq!(s.phase(), Phase::Live);
}

// ── Scenario B: delivery error ───────────────────────────────

#[test]
fn delivery_error_deactivates_and_keeps_readings() {
    let (motion, log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();
    let session = s.start(&mut timer, &mut sink).unwrap();

    s.handle_delivery(session, sample(0.25, 0.35), &mut sink);
    s.handle_delivery(session, MotionDelivery::Error("sensor fault"), &mut sink);

    assert!(!s.is_active());
    assert_eq!(s.phase(), Phase::Failed);
    assert_eq!(s.latest(), OrientationSample::new(0.25, 0.35));
    assert_eq!(s.last_failure(), Some(SamplerError::DeliveryError("sensor fault")));
    assert_eq!(log.borrow().stop_count(), 1, "registration released on error");
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::StateUpdated(SamplerState {
            pitch: 0.25,
            roll: 0.35,
            is_active: false
        }))
    );
}

#[test]
fn delivery_error_before_any_sample() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();
    let session = s.start(&mut timer, &mut sink).unwrap();

    s.handle_delivery(session, MotionDelivery::Error("no gyro"), &mut sink);
    assert!(!s.is_active());
    assert_eq!(s.state(), SamplerState::default());
    assert_eq!(sink.failures(), vec![SamplerError::DeliveryError("no gyro")]);
}

#[test]
fn samples_after_error_are_ignored_until_restart() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();
    let session = s.start(&mut timer, &mut sink).unwrap();

    s.handle_delivery(session, MotionDelivery::Error("glitch"), &mut sink);
    s.handle_delivery(session, sample(0.9, 0.9), &mut sink);
    assert!(!s.is_active());
    assert_eq!(s.state(), SamplerState::default());

    let next = s.start(&mut timer, &mut sink).unwrap();
    s.handle_delivery(next, sample(0.9, 0.9), &mut sink);
    assert!(s.is_active());
}

// ── Scenario C: activation timeout ───────────────────────────

#[test]
fn silent_facility_fails_activation_check() {
    let (motion, _log) = MockMotion::silent();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let session = s.start(&mut timer, &mut sink).unwrap();
    assert_eq!(timer.scheduled, vec![(Duration::from_millis(200), session)]);

    s.handle_activation_check(session, &mut sink);
    assert!(!s.is_active());
    assert_eq!(s.phase(), Phase::Failed);
    assert_eq!(s.last_failure(), Some(SamplerError::ActivationTimeout));
    assert_eq!(sink.failures(), vec![SamplerError::ActivationTimeout]);
}

#[test]
fn engaged_facility_without_data_keeps_waiting() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let session = s.start(&mut timer, &mut sink).unwrap();
    s.handle_activation_check(session, &mut sink);
    assert_eq!(s.phase(), Phase::Starting);
    assert!(sink.failures().is_empty());

    s.handle_delivery(session, sample(0.0, 0.01), &mut sink);
    assert!(s.is_active());
}

#[test]
fn activation_check_passes_for_a_live_session() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let session = s.start(&mut timer, &mut sink).unwrap();
    s.handle_delivery(session, sample(0.1, 0.1), &mut sink);
    s.handle_activation_check(session, &mut sink);
    assert!(s.is_active());
    assert_eq!(s.phase(), Phase::Live);
}

#[test]
fn activation_check_downgrades_session_whose_sensor_died() {
    let (motion, log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let session = s.start(&mut timer, &mut sink).unwrap();
    s.handle_delivery(session, sample(0.1, 0.1), &mut sink);
    assert!(s.is_active());

    // One sample slipped through, then the sensor went quiet.
    log.borrow_mut().active = false;
    s.handle_activation_check(session, &mut sink);
    assert!(!s.is_active());
    assert_eq!(s.last_failure(), Some(SamplerError::ActivationTimeout));
}

#[test]
fn configured_grace_window_is_used() {
    let (motion, _log) = MockMotion::capable();
    let config = SamplerConfig {
        activation_grace_ms: 500,
        ..SamplerConfig::default()
    };
    let mut s = OrientationSampler::new(motion, config);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let session = s.start(&mut timer, &mut sink).unwrap();
    assert_eq!(timer.scheduled, vec![(Duration::from_millis(500), session)]);
}

// ── Scenario D: stop ─────────────────────────────────────────

#[test]
fn stop_deactivates_and_late_callbacks_are_no_ops() {
    let (motion, log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let session = s.start(&mut timer, &mut sink).unwrap();
    s.handle_delivery(session, sample(0.1, 0.2), &mut sink);
    assert!(s.is_active());

    s.stop(&mut sink);
    assert!(!s.is_active());
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(log.borrow().stop_count(), 1);

    let events_before = sink.events.len();
    s.handle_delivery(session, sample(0.7, 0.7), &mut sink);
    s.handle_activation_check(session, &mut sink);
    assert!(!s.is_active());
    assert_eq!(s.latest(), OrientationSample::new(0.1, 0.2));
    assert_eq!(sink.events.len(), events_before, "late callbacks must be silent");
}

#[test]
fn stop_is_idempotent_and_safe_before_start() {
    let (motion, log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut sink = RecordingSink::new();

    s.stop(&mut sink);
    s.stop(&mut sink);
    assert!(!s.is_active());
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(log.borrow().stop_count(), 2, "stop always reaches the facility");
    assert_eq!(sink.state_updates(), 0, "nothing changed, nothing published");
}

#[test]
fn stop_after_failure_returns_to_idle() {
    let (motion, _log) = MockMotion::silent();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let session = s.start(&mut timer, &mut sink).unwrap();
    s.handle_activation_check(session, &mut sink);
    assert_eq!(s.phase(), Phase::Failed);
    s.stop(&mut sink);
    assert_eq!(s.phase(), Phase::Idle);
}

// ── Session guarding across restarts ─────────────────────────

#[test]
fn stale_activation_check_after_restart_is_ignored() {
    let (motion, log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let first = s.start(&mut timer, &mut sink).unwrap();
    s.stop(&mut sink);
    let second = s.start(&mut timer, &mut sink).unwrap();
    s.handle_delivery(second, sample(0.0, 0.0), &mut sink);

    // Facility looks inactive at the moment the first session's check fires.
    log.borrow_mut().active = false;
    s.handle_activation_check(first, &mut sink);
    assert!(s.is_active(), "superseded check must not downgrade the new session");
    assert!(sink.failures().is_empty());
}

#[test]
fn deliveries_from_previous_session_are_dropped() {
    let (motion, log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let first = s.start(&mut timer, &mut sink).unwrap();
    let second = s.start(&mut timer, &mut sink).unwrap();
    assert_eq!(log.borrow().stop_count(), 1, "restart releases the old registration");

    s.handle_delivery(first, sample(0.4, 0.4), &mut sink);
    assert!(!s.is_active());
    s.handle_delivery(first, MotionDelivery::Error("old"), &mut sink);
    assert_eq!(s.phase(), Phase::Starting);

    s.handle_delivery(second, sample(0.3, 0.3), &mut sink);
    assert!(s.is_active());
    assert_eq!(s.latest(), OrientationSample::new(0.3, 0.3));
}

#[test]
fn every_start_issues_a_fresh_session() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    let mut seen = Vec::new();
    for _ in 0..5 {
        let session = s.start(&mut timer, &mut sink).unwrap();
        assert!(!seen.contains(&session));
        assert_eq!(timer.last_session(), Some(session));
        seen.push(session);
        s.stop(&mut sink);
    }
}

// ── Commands ─────────────────────────────────────────────────

#[test]
fn toggle_follows_the_start_stop_button() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    s.handle_command(SamplerCommand::Toggle, &mut timer, &mut sink);
    let session = s.open_session().expect("toggle from idle starts");
    s.handle_delivery(session, sample(0.0, 0.0), &mut sink);
    assert!(s.is_active());

    s.handle_command(SamplerCommand::Toggle, &mut timer, &mut sink);
    assert!(!s.is_active());
    assert_eq!(s.phase(), Phase::Idle);
}

#[test]
fn start_command_on_incapable_device_only_reports() {
    let (motion, _log) = MockMotion::incapable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    s.handle_command(SamplerCommand::Start, &mut timer, &mut sink);
    assert_eq!(sink.failures(), vec![SamplerError::CapabilityUnavailable]);
    assert!(s.open_session().is_none());
}

#[test]
fn readout_is_level_only_while_live() {
    let (motion, _log) = MockMotion::capable();
    let mut s = sampler(motion);
    let mut timer = MockTimer::new();
    let mut sink = RecordingSink::new();

    assert!(!s.readout().level, "zeroed but inactive readings are not level");

    let session = s.start(&mut timer, &mut sink).unwrap();
    s.handle_delivery(session, sample(0.01, -0.02), &mut sink);
    assert!(s.readout().level);

    s.stop(&mut sink);
    assert!(!s.readout().level);
}
