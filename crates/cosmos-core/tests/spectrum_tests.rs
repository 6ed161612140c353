// Host-side tests for spectrum sampling and normalization.

mod common;

use common::FakeAudio;
use cosmos_core::*;

#[test]
fn normalize_db_maps_floor_and_ceiling() {
    assert_eq!(normalize_db(-100.0), 0.0);
    assert_eq!(normalize_db(0.0), 1.0);
    assert!((normalize_db(-50.0) - 0.5).abs() < 1e-6);
}

#[test]
fn normalize_db_clamps_out_of_range_and_nan() {
    assert_eq!(normalize_db(-140.0), 0.0);
    assert_eq!(normalize_db(12.0), 1.0);
    assert_eq!(normalize_db(f32::NAN), 0.0);
    assert_eq!(normalize_db(f32::NEG_INFINITY), 0.0);
    assert_eq!(normalize_db(f32::INFINITY), 1.0);
}

#[test]
fn sampler_without_source_is_silent_at_configured_resolution() {
    let mut sampler = SpectrumSampler::new(2048);
    let frame = sampler.sample(None);
    assert_eq!(frame.len(), 1024);
    assert!(frame.is_silent());

    let mobile = SpectrumSampler::new(512);
    assert_eq!(mobile.resolution(), 256);
}

#[test]
fn sampler_normalizes_source_values() {
    let mut sampler = SpectrumSampler::new(64);
    let mut audio = FakeAudio::new(32);
    audio.set_level(0.25);
    let frame = sampler.sample(Some(&mut audio));
    assert_eq!(frame.len(), 32);
    for v in frame.as_slice() {
        assert!((v - 0.25).abs() < 1e-5);
    }
}

#[test]
fn sampler_follows_source_bin_count() {
    let mut sampler = SpectrumSampler::new(64);
    let mut audio = FakeAudio::new(48);
    audio.set_level(1.0);
    let frame = sampler.sample(Some(&mut audio));
    assert_eq!(frame.len(), 48);
    assert!(frame.as_slice().iter().all(|v| *v == 1.0));
}

#[test]
fn from_normalized_clamps_and_zeroes_nan() {
    let frame = SpectrumFrame::from_normalized(vec![-0.5, 0.5, 2.0, f32::NAN]);
    assert_eq!(frame.as_slice(), &[0.0, 0.5, 1.0, 0.0]);
}

#[test]
fn bucket_uses_floor_of_scaled_index() {
    let values: Vec<f32> = (0..10).map(|i| i as f32 / 10.0).collect();
    let frame = SpectrumFrame::from_normalized(values);
    // floor(i * 10 / 4) = 0, 2, 5, 7
    let picked: Vec<f32> = (0..4).map(|i| frame.bucket(i, 4)).collect();
    assert_eq!(picked, vec![0.0, 0.2, 0.5, 0.7]);
    assert_eq!(bucket_index(3, 4, 10), 7);
}

#[test]
fn bucket_on_empty_frame_is_zero() {
    let frame = SpectrumFrame::silent(0);
    assert_eq!(frame.bucket(3, 8), 0.0);
    assert_eq!(frame.bucket(0, 0), 0.0);
}

#[test]
fn downsample_to_sound_plane_resolution() {
    let values: Vec<f32> = (0..1024).map(|i| if i % 8 == 0 { 1.0 } else { 0.0 }).collect();
    let frame = SpectrumFrame::from_normalized(values);
    let down = frame.downsample(128);
    assert_eq!(down.len(), 128);
    // Every bucket lands on a multiple of 8.
    assert!(down.iter().all(|v| *v == 1.0));
}
