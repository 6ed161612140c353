// Host-side sanity checks for tuning constants.

use cosmos_core::constants::*;

#[test]
fn fft_sizes_are_powers_of_two() {
    assert!(FFT_SIZE_DESKTOP.is_power_of_two());
    assert!(FFT_SIZE_MOBILE.is_power_of_two());
    assert!(FFT_SIZE_MOBILE < FFT_SIZE_DESKTOP);
}

#[test]
fn normalization_window_covers_analyser_range() {
    assert_eq!(DB_FLOOR + DB_RANGE, 0.0);
    assert!((0.0..1.0).contains(&ANALYSER_SMOOTHING));
}

#[test]
fn beat_parameters_are_sane() {
    assert!(BEAT_THRESHOLD > 0.0 && BEAT_THRESHOLD < 1.0);
    assert!(BEAT_REFRACTORY_SEC > 0.0);
}

#[test]
fn ua_patterns_are_lowercase() {
    for p in MOBILE_UA_PATTERNS {
        assert_eq!(*p, p.to_ascii_lowercase());
    }
}

#[test]
fn lightning_lives_twenty_reference_frames() {
    assert_eq!((1.0 / LIGHTNING_DECAY).round() as u32, 20);
    assert!(MAX_DELTA_PHASE >= 1.0);
    assert_eq!(REFERENCE_FPS, 60.0);
}
