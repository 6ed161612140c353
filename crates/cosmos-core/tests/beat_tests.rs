// Host-side tests for beat onset detection.

use cosmos_core::*;

fn detector() -> BeatDetector {
    BeatDetector::new(BeatConfig::default())
}

#[test]
fn first_loud_frame_fires_then_refractory_holds() {
    let mut d = detector();
    assert!(d.detect(0.6, 0.0).is_beat);
    assert!(!d.detect(0.6, 0.1).is_beat);
    assert!(!d.detect(0.6, 0.2).is_beat);
    assert_eq!(d.state().last_beat_sec, 0.0);

    let again = d.detect(0.6, 0.31);
    assert!(again.is_beat);
    assert_eq!(again.last_beat_sec, 0.31);
}

#[test]
fn exactly_at_refractory_boundary_does_not_fire() {
    let mut d = BeatDetector::with_last_beat(BeatConfig::default(), 0.0);
    assert!(!d.detect(0.9, 0.3).is_beat);
    assert!(d.detect(0.9, 0.3001).is_beat);
}

#[test]
fn bass_below_threshold_never_fires() {
    let mut d = detector();
    for i in 0..600 {
        assert!(!d.detect(0.4, i as f64 / 60.0).is_beat);
    }
    assert_eq!(d.state().last_beat_sec, f64::NEG_INFINITY);
}

#[test]
fn threshold_is_strict() {
    let mut d = detector();
    assert!(!d.detect(0.5, 0.0).is_beat);
}

#[test]
fn full_scale_frame_fires() {
    let frame = SpectrumFrame::from_normalized(vec![1.0; 1024]);
    let bands = aggregate(&frame);
    let mut d = detector();
    let state = d.detect(bands.bass, 1.0);
    assert!(state.is_beat);
    assert_eq!(state.last_beat_sec, 1.0);
}

#[test]
fn silent_frame_does_not_fire() {
    let bands = aggregate(&SpectrumFrame::silent(256));
    let mut d = detector();
    assert!(!d.detect(bands.bass, 5.0).is_beat);
}

#[test]
fn beat_flag_clears_on_next_frame() {
    let mut d = detector();
    assert!(d.detect(0.8, 0.0).is_beat);
    assert!(!d.detect(0.1, 1.0).is_beat);
    assert_eq!(d.state().last_beat_sec, 0.0);
}

#[test]
fn custom_config_is_respected() {
    let mut d = BeatDetector::new(BeatConfig {
        threshold: 0.2,
        refractory_sec: 1.0,
    });
    assert!(d.detect(0.3, 0.0).is_beat);
    assert!(!d.detect(0.3, 0.9).is_beat);
    assert!(d.detect(0.3, 1.5).is_beat);
}

#[test]
fn reset_forgets_last_beat() {
    let mut d = detector();
    d.detect(0.9, 0.0);
    d.reset();
    assert!(d.detect(0.9, 0.1).is_beat);
}
