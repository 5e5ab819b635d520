//! Tests for timeline playback.

use super::*;
use crate::curve::{CurveInterpolation, CurveKey, FloatCurve};

#[test]
fn test_idle_timeline_does_not_advance() {
    let mut timeline = Timeline::default();
    assert!(timeline.advance(0.5).is_none());
    assert_eq!(timeline.playback_position(), 0.0);
}

#[test]
fn test_non_looping_finishes_exactly_once() {
    let mut timeline = Timeline::new(1.0);
    timeline.play_from_start();

    let step = timeline.advance(0.6).unwrap();
    assert!(!step.finished);
    assert!((step.value - 0.6).abs() < 1e-5);

    let step = timeline.advance(0.6).unwrap();
    assert!(step.finished);
    assert_eq!(step.position, 1.0);
    assert_eq!(step.value, 1.0);

    // После finish больше не тикает
    assert!(!timeline.is_playing());
    assert!(timeline.advance(0.6).is_none());
}

#[test]
fn test_play_rate_scales_progress() {
    let mut timeline = Timeline::new(1.0);
    timeline.set_play_rate(0.5);
    timeline.play_from_start();

    let step = timeline.advance(1.0).unwrap();
    assert!(!step.finished);
    assert!((step.position - 0.5).abs() < 1e-5);

    let step = timeline.advance(1.0).unwrap();
    assert!(step.finished);
}

#[test]
fn test_looping_wraps_and_never_finishes() {
    let mut timeline = Timeline::new(1.0);
    timeline.set_looping(true);
    timeline.play_from_start();

    for _ in 0..10 {
        let step = timeline.advance(0.3).unwrap();
        assert!(!step.finished);
        assert!(step.position < 1.0);
    }
    assert!(timeline.is_playing());
}

#[test]
fn test_reverse_runs_back_to_zero() {
    let mut timeline = Timeline::new(1.0);
    timeline.play_from_start();
    timeline.advance(0.75);

    timeline.reverse();
    assert_eq!(timeline.direction(), PlayDirection::Backward);

    let step = timeline.advance(0.5).unwrap();
    assert!((step.position - 0.25).abs() < 1e-5);
    assert!(!step.finished);

    let step = timeline.advance(0.5).unwrap();
    assert!(step.finished);
    assert_eq!(step.position, 0.0);
}

#[test]
fn test_stop_reports_previous_state() {
    let mut timeline = Timeline::default();
    assert!(!timeline.stop());

    timeline.play_from_start();
    assert!(timeline.stop());
    assert!(!timeline.is_playing());
}

#[test]
fn test_curve_defines_length_and_value() {
    let curve = FloatCurve::from_keys(
        vec![CurveKey::new(0.0, 0.0), CurveKey::new(2.0, 10.0)],
        CurveInterpolation::Linear,
    );
    let mut timeline = Timeline::new(1.0);
    timeline.set_curve(Some(curve));
    assert_eq!(timeline.length(), 2.0);

    timeline.play_from_start();
    let step = timeline.advance(1.0).unwrap();
    assert!((step.value - 5.0).abs() < 1e-4);
    assert!(!step.finished);
}

#[test]
fn test_negative_rate_is_clamped() {
    let mut timeline = Timeline::default();
    timeline.set_play_rate(-3.0);
    assert_eq!(timeline.play_rate(), 0.0);
}
