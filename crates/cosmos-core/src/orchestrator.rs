//! Per-frame driver: sample → aggregate → detect → animate → flush → render.
//!
//! The orchestrator owns the entity registry, the animator set and the audio
//! backend. The host calls [`FrameOrchestrator::frame`] once per animation
//! frame; every call that isn't after teardown ends in exactly one render
//! request, whatever the playback state and whether animators failed.

use crate::animators::{AnimContext, AnimatorSet, Asset, FrameSignals, Trigger};
use crate::bands::{aggregate, BandEnergy};
use crate::beat::{BeatConfig, BeatDetector, BeatState};
use crate::constants::{MAX_DELTA_PHASE, REFERENCE_FPS};
use crate::error::{AnimError, AudioError, SetupError};
use crate::quality::QualityProfile;
use crate::registry::{EntityRegistry, RenderSink};
use crate::spectrum::{SpectrumFrame, SpectrumSampler, SpectrumSource};
use crate::state::Pointer;
use fnv::FnvHashSet;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// No source attached, or paused. Passive animation only.
    Idle,
    Playing,
    /// The platform suspended the audio context. Treated as idle until resumed.
    Suspended,
}

/// Audio collaborator: the analysis primitive plus transport controls.
pub trait AudioBackend: SpectrumSource {
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn is_playing(&self) -> bool;
    fn resume(&mut self) -> Result<(), AudioError>;
    fn suspend(&mut self);
    fn is_suspended(&self) -> bool;
    fn close(&mut self);
}

/// What happened on one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub state: PlaybackState,
    pub bands: BandEnergy,
    pub beat: BeatState,
    /// Step handed to animators, 1.0 at the reference rate and clamped after stalls.
    pub delta_phase: f32,
    /// Animators that failed this frame.
    pub errors: usize,
    /// The pipeline was torn down; the host should cancel its frame callback.
    pub stopped: bool,
}

pub struct FrameOrchestrator<S: RenderSink> {
    profile: QualityProfile,
    sink: S,
    registry: EntityRegistry,
    animators: AnimatorSet,
    sampler: SpectrumSampler,
    detector: BeatDetector,
    rng: StdRng,
    audio: Option<Box<dyn AudioBackend>>,
    pointer: Pointer,
    pending: Vec<Trigger>,
    assets: FnvHashSet<Asset>,
    setup_pending: bool,
    last_spectrum: SpectrumFrame,
    elapsed_sec: f64,
    frame_index: u64,
    stopped: bool,
}

fn validate_fft(fft_size: u32) -> Result<(), SetupError> {
    if fft_size.is_power_of_two() && (32..=32768).contains(&fft_size) {
        Ok(())
    } else {
        Err(SetupError::InvalidResolution(fft_size))
    }
}

fn log_failures(stage: &str, failures: &[(&'static str, AnimError)]) {
    for (name, err) in failures {
        log::warn!("[{}] {}: {}", stage, name, err);
    }
}

impl<S: RenderSink> FrameOrchestrator<S> {
    /// Build the standard scene for `profile` and spawn every entity that needs no asset.
    pub fn new(profile: QualityProfile, sink: S, seed: u64) -> Result<Self, SetupError> {
        let animators = AnimatorSet::for_profile(&profile);
        Self::with_animators(profile, sink, seed, animators)
    }

    pub fn with_animators(
        profile: QualityProfile,
        sink: S,
        seed: u64,
        animators: AnimatorSet,
    ) -> Result<Self, SetupError> {
        validate_fft(profile.fft_size)?;
        let sampler = SpectrumSampler::new(profile.fft_size);
        let last_spectrum = sampler.silent();
        let mut orch = Self {
            profile,
            sink,
            registry: EntityRegistry::new(),
            animators,
            sampler,
            detector: BeatDetector::new(BeatConfig::default()),
            rng: StdRng::seed_from_u64(seed),
            audio: None,
            pointer: Pointer::default(),
            pending: Vec::new(),
            assets: FnvHashSet::default(),
            setup_pending: false,
            last_spectrum,
            elapsed_sec: 0.0,
            frame_index: 0,
            stopped: false,
        };
        orch.run_setup();
        log::info!(
            "[scene] {:?} profile: {} entities across {} animators",
            orch.profile.device_class,
            orch.registry.len(),
            orch.animators.len()
        );
        Ok(orch)
    }

    pub fn with_beat_config(mut self, config: BeatConfig) -> Self {
        self.detector = BeatDetector::new(config);
        self
    }

    fn run_setup(&mut self) {
        let assets = &self.assets;
        let mut ctx = AnimContext {
            registry: &mut self.registry,
            sink: &mut self.sink,
            profile: &self.profile,
            rng: &mut self.rng,
        };
        let failures = self
            .animators
            .setup_ready(&mut ctx, |asset| assets.contains(&asset));
        log_failures("setup", &failures);
        self.setup_pending = false;
    }

    pub fn profile(&self) -> &QualityProfile {
        &self.profile
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn animator_names(&self) -> Vec<&'static str> {
        self.animators.names()
    }

    /// Spectrum used by the most recent frame (silent when not playing).
    pub fn spectrum(&self) -> &SpectrumFrame {
        &self.last_spectrum
    }

    pub fn elapsed_sec(&self) -> f64 {
        self.elapsed_sec
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Replace the audio backend. The previous one is closed.
    pub fn attach_audio(&mut self, mut backend: Box<dyn AudioBackend>) {
        if backend.bin_count() != self.sampler.resolution() {
            log::warn!(
                "[audio] backend has {} bins, profile expects {}",
                backend.bin_count(),
                self.sampler.resolution()
            );
        }
        if self.stopped {
            backend.close();
            return;
        }
        if let Some(mut old) = self.audio.replace(backend) {
            old.close();
        }
        self.detector.reset();
    }

    pub fn state(&self) -> PlaybackState {
        match self.audio.as_deref() {
            None => PlaybackState::Idle,
            Some(a) if a.is_suspended() => PlaybackState::Suspended,
            Some(a) if a.is_playing() => PlaybackState::Playing,
            Some(_) => PlaybackState::Idle,
        }
    }

    /// Start playback, resuming a suspended context first.
    pub fn play(&mut self) -> Result<PlaybackState, AudioError> {
        let audio = self.audio.as_deref_mut().ok_or(AudioError::NoSource)?;
        if audio.is_suspended() {
            audio.resume()?;
        }
        audio.play()?;
        log::info!("[audio] playing");
        Ok(self.state())
    }

    pub fn pause(&mut self) -> PlaybackState {
        if let Some(audio) = self.audio.as_deref_mut() {
            audio.pause();
            log::info!("[audio] paused");
        }
        self.state()
    }

    /// Play/pause button behaviour.
    pub fn toggle(&mut self) -> Result<PlaybackState, AudioError> {
        let audible = match self.audio.as_deref() {
            None => return Err(AudioError::NoSource),
            Some(a) => a.is_playing() && !a.is_suspended(),
        };
        if audible {
            Ok(self.pause())
        } else {
            self.play()
        }
    }

    /// Queue a user gesture for the start of the next frame.
    pub fn trigger(&mut self, trigger: Trigger) {
        if !self.stopped {
            self.pending.push(trigger);
        }
    }

    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    /// Enable animators waiting on `asset`. They are set up on the next frame.
    pub fn mark_asset_ready(&mut self, asset: Asset) {
        if self.assets.insert(asset) {
            log::info!("[scene] asset {:?} ready", asset);
            self.setup_pending = true;
        }
    }

    /// Advance the scene by `dt_sec` and render once.
    pub fn frame(&mut self, dt_sec: f64) -> FrameReport {
        if self.stopped {
            return FrameReport {
                state: PlaybackState::Idle,
                bands: BandEnergy::SILENT,
                beat: self.detector.state(),
                delta_phase: 0.0,
                errors: 0,
                stopped: true,
            };
        }

        let dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };
        self.elapsed_sec += dt;
        let delta_phase = ((dt * REFERENCE_FPS as f64) as f32).min(MAX_DELTA_PHASE);

        if self.setup_pending {
            self.run_setup();
        }

        let state = self.state();
        let playing = state == PlaybackState::Playing;
        let spectrum = match self.audio.as_deref_mut() {
            Some(audio) if playing => self.sampler.read(audio),
            _ => self.sampler.silent(),
        };
        let bands = if playing {
            aggregate(&spectrum)
        } else {
            BandEnergy::SILENT
        };
        let beat = if playing {
            self.detector.detect(bands.bass, self.elapsed_sec)
        } else {
            BeatState {
                is_beat: false,
                ..self.detector.state()
            }
        };

        let mut errors = 0;
        {
            let mut ctx = AnimContext {
                registry: &mut self.registry,
                sink: &mut self.sink,
                profile: &self.profile,
                rng: &mut self.rng,
            };

            for trigger in self.pending.drain(..) {
                let failures = self.animators.trigger(&mut ctx, trigger);
                log_failures("trigger", &failures);
                errors += failures.len();
            }

            let signals = FrameSignals {
                spectrum: &spectrum,
                bands,
                beat,
                elapsed_sec: self.elapsed_sec,
                delta_phase,
                frame_index: self.frame_index,
                pointer: self.pointer,
                audio_active: playing,
            };
            let failures = self.animators.update(&mut ctx, &signals);
            log_failures("frame", &failures);
            errors += failures.len();
        }

        self.registry.flush(&mut self.sink);
        self.sink.request_render();
        self.frame_index += 1;
        self.last_spectrum = spectrum;

        FrameReport {
            state,
            bands,
            beat,
            delta_phase,
            errors,
            stopped: false,
        }
    }

    /// Remove every entity and close audio. Later frames report `stopped`.
    pub fn teardown(&mut self) {
        if self.stopped {
            return;
        }
        {
            let mut ctx = AnimContext {
                registry: &mut self.registry,
                sink: &mut self.sink,
                profile: &self.profile,
                rng: &mut self.rng,
            };
            self.animators.teardown(&mut ctx);
        }
        self.registry.clear(&mut self.sink);
        if let Some(mut audio) = self.audio.take() {
            audio.close();
        }
        self.pending.clear();
        self.stopped = true;
        log::info!("[scene] torn down after {} frames", self.frame_index);
    }
}

impl<S: RenderSink> Drop for FrameOrchestrator<S> {
    fn drop(&mut self) {
        if let Some(mut audio) = self.audio.take() {
            audio.close();
        }
    }
}

