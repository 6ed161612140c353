// Host-side tests for individual animators driven with hand-built frame signals.

mod common;

use common::{signals, RecordingSink};
use cosmos_core::animators::bars::bar_height;
use cosmos_core::animators::crystals::crystal_drive;
use cosmos_core::animators::wormholes::WormholePulse;
use cosmos_core::animators::*;
use cosmos_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

struct Harness {
    registry: EntityRegistry,
    sink: RecordingSink,
    profile: QualityProfile,
    rng: StdRng,
}

impl Harness {
    fn new(class: DeviceClass) -> Self {
        Self {
            registry: EntityRegistry::new(),
            sink: RecordingSink::default(),
            profile: resolve(class),
            rng: StdRng::seed_from_u64(1),
        }
    }

    fn ctx(&mut self) -> AnimContext<'_> {
        AnimContext {
            registry: &mut self.registry,
            sink: &mut self.sink,
            profile: &self.profile,
            rng: &mut self.rng,
        }
    }
}

#[test]
fn lightning_bolt_expires_after_twenty_steps() {
    let mut bolt = LightningBolt::new(EntityHandle(1));
    for step in 1..20 {
        assert!(bolt.step(), "bolt died early at step {step}");
    }
    assert!(!bolt.step());
    assert!(bolt.life <= 0.0);
}

#[test]
fn lightning_spawns_on_beat_and_self_removes() {
    let mut h = Harness::new(DeviceClass::Desktop);
    let mut lightning = Lightning::default();
    let loud = SpectrumFrame::from_normalized(vec![1.0; 96]);
    let quiet = SpectrumFrame::silent(96);

    lightning.setup(&mut h.ctx()).unwrap();
    lightning
        .update(&mut h.ctx(), &signals(&loud, 0.0, true))
        .unwrap();
    assert_eq!(lightning.active().len(), 1);
    assert_eq!(h.registry.count(Family::LightningBolt), 1);

    // The spawning frame doesn't decay the new bolt; twenty more frames do.
    for i in 1..20 {
        lightning
            .update(&mut h.ctx(), &signals(&quiet, i as f64 / 60.0, false))
            .unwrap();
        assert_eq!(lightning.active().len(), 1, "frame {i}");
    }
    lightning
        .update(&mut h.ctx(), &signals(&quiet, 20.0 / 60.0, false))
        .unwrap();
    assert!(lightning.active().is_empty());
    assert_eq!(h.registry.count(Family::LightningBolt), 0);
    assert_eq!(h.sink.live_count(Family::LightningBolt), 0);
}

#[test]
fn lightning_is_capped_by_profile() {
    let mut h = Harness::new(DeviceClass::Desktop);
    let mut lightning = Lightning::default();
    let loud = SpectrumFrame::from_normalized(vec![1.0; 96]);
    for i in 0..15 {
        lightning
            .update(&mut h.ctx(), &signals(&loud, i as f64, true))
            .unwrap();
    }
    assert_eq!(lightning.active().len(), h.profile.max_lightning);
}

#[test]
fn energy_wave_deactivates_when_progress_reaches_one() {
    for index in 0..5 {
        let mut wave = EnergyWave::new(EntityHandle(1), index);
        wave.activate();
        let mut steps = 0;
        while wave.active {
            wave.step();
            steps += 1;
            assert_eq!(wave.active, wave.progress < 1.0);
            assert!(steps < 1000);
        }
        assert!(wave.progress >= 1.0);
        assert!(wave.progress - wave.speed * 0.01 < 1.0);
    }
}

#[test]
fn energy_wave_scale_and_opacity_follow_progress() {
    let mut wave = EnergyWave::new(EntityHandle(1), 2);
    assert_eq!(wave.max_scale, 7.0);
    wave.activate();
    assert!((wave.scale() - 0.1).abs() < 1e-6);
    assert!((wave.opacity() - 0.7).abs() < 1e-6);
    wave.progress = 0.5;
    assert!((wave.scale() - 3.55).abs() < 1e-5);
    assert!((wave.opacity() - 0.35).abs() < 1e-6);
}

#[test]
fn repeated_clicks_reuse_the_wave_pool() {
    let mut h = Harness::new(DeviceClass::Desktop);
    let mut waves = EnergyWaves::default();
    waves.setup(&mut h.ctx()).unwrap();
    assert_eq!(waves.pool().len(), 5);

    for _ in 0..12 {
        waves.on_trigger(&mut h.ctx(), Trigger::Click).unwrap();
    }
    assert_eq!(waves.active_count(), 5);
    assert_eq!(h.registry.count(Family::EnergyWave), 5);

    let quiet = SpectrumFrame::silent(96);
    for i in 0..300 {
        waves
            .update(&mut h.ctx(), &signals(&quiet, i as f64 / 60.0, false))
            .unwrap();
    }
    assert_eq!(waves.active_count(), 0);

    waves.on_trigger(&mut h.ctx(), Trigger::Click).unwrap();
    assert_eq!(waves.active_count(), 1);
    assert_eq!(h.registry.count(Family::EnergyWave), 5);
}

#[test]
fn bars_track_their_spectrum_bucket() {
    let mut h = Harness::new(DeviceClass::Mobile);
    let mut bars = VisualizerBars::default();
    bars.setup(&mut h.ctx()).unwrap();
    let handles = bars.handles();
    assert_eq!(handles.len(), 32);

    let values: Vec<f32> = (0..256).map(|i| i as f32 / 255.0).collect();
    let frame = SpectrumFrame::from_normalized(values);
    bars.update(&mut h.ctx(), &signals(&frame, 0.0, false)).unwrap();

    for (i, handle) in handles.iter().enumerate() {
        let expected = bar_height(frame.bucket(i, 32));
        let t = h.registry.transform(*handle).unwrap();
        assert!((t.scale.y - expected).abs() < 1e-5);
        assert!((t.position.y - expected / 2.0).abs() < 1e-5);
    }
}

#[test]
fn silent_bars_rest_at_minimum_height() {
    assert!((bar_height(0.0) - 0.1).abs() < 1e-6);
    assert!((bar_height(1.0) - 5.1).abs() < 1e-6);
}

#[test]
fn crystals_read_mid_band_bins_by_index() {
    let mut values = vec![0.0; 9];
    values[3] = 0.2;
    values[4] = 0.5;
    values[5] = 0.8;
    let frame = SpectrumFrame::from_normalized(values);
    let mut s = signals(&frame, 0.0, false);
    assert_eq!(crystal_drive(&s, 0), 0.2);
    assert_eq!(crystal_drive(&s, 1), 0.5);
    assert_eq!(crystal_drive(&s, 5), 0.8);
    s.audio_active = false;
    assert_eq!(crystal_drive(&s, 1), 0.0);
}

#[test]
fn mobile_crystals_skip_off_stride_frames() {
    let mut h = Harness::new(DeviceClass::Mobile);
    let mut crystals = FloatingCrystals::default();
    crystals.setup(&mut h.ctx()).unwrap();
    let frame = SpectrumFrame::silent(256);
    h.registry.flush(&mut h.sink);
    h.sink.clear_log();

    // floor(t * 60) == 1, stride 3.
    crystals
        .update(&mut h.ctx(), &signals(&frame, 1.5 / 60.0, false))
        .unwrap();
    assert_eq!(h.registry.flush(&mut h.sink), 0);

    crystals
        .update(&mut h.ctx(), &signals(&frame, 3.5 / 60.0, false))
        .unwrap();
    assert_eq!(h.registry.flush(&mut h.sink), 5);
}

#[test]
fn wormhole_pulse_decays_linearly() {
    let mut pulse = WormholePulse::default();
    assert_eq!(pulse.advance(), 0.0);
    assert!(pulse.start());
    assert!(!pulse.start());
    let first = pulse.advance();
    assert!((first - 0.95).abs() < 1e-6);
    let second = pulse.advance();
    assert!((second - 0.9).abs() < 1e-6);
    let mut frames = 2;
    while pulse.is_active() {
        pulse.advance();
        frames += 1;
        assert!(frames <= 21);
    }
    assert!(frames >= 19);
    assert_eq!(pulse.advance(), 0.0);
    assert!(pulse.start());
}

#[test]
fn sound_plane_interpolates_between_buckets() {
    let samples = [0.0, 1.0, 0.0];
    // Amplitude 1 and time chosen so the travelling sines are known.
    let at = |x: f32| {
        sample_elevation(&samples, 1.0, x, 0.0, 0.0)
            - (x * 3.0).sin() * 0.2
    };
    assert!(at(-1.0).abs() < 1e-6);
    assert!((at(0.0) - 1.0).abs() < 1e-6);
    assert!((at(-0.5) - 0.5).abs() < 1e-6);
    assert!(at(1.0).abs() < 1e-6);
    // Outside the plane clamps to the edge bucket.
    assert!(at(-3.0).abs() < 1e-6);
}

#[test]
fn sound_plane_handles_empty_samples() {
    let e = sample_elevation(&[], 2.0, 0.0, 0.0, 0.0);
    assert!(e.abs() < 1e-6);
}

#[test]
fn bursts_stay_hidden_until_clicked() {
    let mut h = Harness::new(DeviceClass::Desktop);
    let mut bursts = BurstParticles::default();
    bursts.setup(&mut h.ctx()).unwrap();
    assert_eq!(h.registry.count(Family::BurstParticle), 100);
    let frame = SpectrumFrame::silent(96);

    h.registry.flush(&mut h.sink);
    bursts.update(&mut h.ctx(), &signals(&frame, 0.0, false)).unwrap();
    assert_eq!(h.registry.flush(&mut h.sink), 0);

    bursts.on_trigger(&mut h.ctx(), Trigger::Click).unwrap();
    assert!(bursts.is_armed());
    let handle = bursts.handles()[0];
    assert_eq!(
        h.registry.entity(handle).and_then(|e| e.flag(MaterialKey::Visible)),
        Some(true)
    );
    bursts.update(&mut h.ctx(), &signals(&frame, 1.0 / 60.0, false)).unwrap();
    assert!(h.registry.flush(&mut h.sink) > 0);
}

#[test]
fn teardown_removes_everything_an_animator_spawned() {
    let mut h = Harness::new(DeviceClass::Desktop);
    let mut belts = AsteroidBelts::default();
    belts.setup(&mut h.ctx()).unwrap();
    let spawned = belts.handles().len();
    assert_eq!(spawned, belts.asteroid_count() + 3);
    assert!(belts.asteroid_count() <= h.profile.max_asteroids());

    belts.teardown(&mut h.ctx());
    assert!(h.registry.is_empty());
    assert_eq!(h.sink.removed, spawned);
}
