//! Per-family animation strategies.
//!
//! Each animator spawns its family's entities at setup, then maps the frame's
//! audio signals onto those entities every frame. The set of animators that
//! run is decided once from the quality profile.

use crate::bands::BandEnergy;
use crate::beat::BeatState;
use crate::error::AnimError;
use crate::quality::QualityProfile;
use crate::registry::{EntityHandle, EntityRegistry, RenderSink};
use crate::spectrum::SpectrumFrame;
use crate::state::Pointer;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

pub mod asteroids;
pub mod backdrop;
pub mod bars;
pub mod bursts;
pub mod crystals;
pub mod lightning;
pub mod ring;
pub mod ship;
pub mod sound_plane;
pub mod starfield;
pub mod waves;
pub mod wormholes;

pub use asteroids::AsteroidBelts;
pub use backdrop::Backdrop;
pub use bars::VisualizerBars;
pub use bursts::BurstParticles;
pub use crystals::FloatingCrystals;
pub use lightning::{Lightning, LightningBolt};
pub use ring::GlowingRing;
pub use ship::Ship;
pub use sound_plane::{sample_elevation, SoundPlane};
pub use starfield::Starfield;
pub use waves::{EnergyWave, EnergyWaves};
pub use wormholes::Wormholes;

/// Everything an animator may read about the current frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameSignals<'a> {
    pub spectrum: &'a SpectrumFrame,
    pub bands: BandEnergy,
    pub beat: BeatState,
    pub elapsed_sec: f64,
    /// Frame step normalized to the reference rate (1.0 at 60 fps).
    pub delta_phase: f32,
    pub frame_index: u64,
    pub pointer: Pointer,
    /// False when idle or suspended; band values are zero in that case.
    pub audio_active: bool,
}

impl<'a> FrameSignals<'a> {
    /// Elapsed time as f32 for trigonometry.
    #[inline]
    pub fn t(&self) -> f32 {
        self.elapsed_sec as f32
    }

    /// True on the frame a beat fired while audio is playing.
    #[inline]
    pub fn beat_now(&self) -> bool {
        self.audio_active && self.beat.is_beat
    }
}

/// Explicit dependencies handed to animators instead of ambient globals.
pub struct AnimContext<'a> {
    pub registry: &'a mut EntityRegistry,
    pub sink: &'a mut dyn RenderSink,
    pub profile: &'a QualityProfile,
    pub rng: &'a mut StdRng,
}

/// User gestures that drive non-audio effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// A click/tap on the scene.
    Click,
}

/// External assets some animators must wait for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Asset {
    ShipModel,
}

pub trait Animator {
    fn name(&self) -> &'static str;

    /// Asset that must be ready before `setup`/`update` run.
    fn requires(&self) -> Option<Asset> {
        None
    }

    /// Spawn this family's entities.
    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError>;

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError>;

    fn on_trigger(&mut self, _ctx: &mut AnimContext, _trigger: Trigger) -> Result<(), AnimError> {
        Ok(())
    }

    /// Handles owned by this animator, for teardown.
    fn handles(&self) -> Vec<EntityHandle>;

    /// Forget owned entities after the registry removed them.
    fn reset(&mut self);

    fn teardown(&mut self, ctx: &mut AnimContext) {
        for h in self.handles() {
            ctx.registry.despawn(ctx.sink, h);
        }
        self.reset();
    }
}

/// The pluggable set of animators for a session.
pub struct AnimatorSet {
    entries: Vec<Slot>,
}

struct Slot {
    animator: Box<dyn Animator>,
    ready: bool,
}

impl AnimatorSet {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The standard scene for a profile. Families the profile disables are left out.
    pub fn for_profile(profile: &QualityProfile) -> Self {
        let mut set = Self::empty();
        set.push(Box::new(Backdrop::default()));
        set.push(Box::new(Starfield::default()));
        set.push(Box::new(FloatingCrystals::default()));
        set.push(Box::new(GlowingRing::default()));
        set.push(Box::new(VisualizerBars::default()));
        set.push(Box::new(AsteroidBelts::default()));
        set.push(Box::new(Wormholes::default()));
        if profile.use_sound_plane {
            set.push(Box::new(SoundPlane::default()));
        }
        if profile.energy_wave_count > 0 {
            set.push(Box::new(EnergyWaves::default()));
        }
        if profile.use_lightning && profile.max_lightning > 0 {
            set.push(Box::new(Lightning::default()));
        }
        if profile.burst_count > 0 {
            set.push(Box::new(BurstParticles::default()));
        }
        set.push(Box::new(Ship::default()));
        set
    }

    pub fn push(&mut self, animator: Box<dyn Animator>) {
        self.entries.push(Slot {
            animator,
            ready: false,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|s| s.animator.name()).collect()
    }

    /// Set up every animator whose asset requirement is met and that isn't set up yet.
    ///
    /// Returns the names of animators that failed.
    pub fn setup_ready(
        &mut self,
        ctx: &mut AnimContext,
        is_ready: impl Fn(Asset) -> bool,
    ) -> Vec<(&'static str, AnimError)> {
        let mut failures = Vec::new();
        for slot in &mut self.entries {
            if slot.ready {
                continue;
            }
            if let Some(asset) = slot.animator.requires() {
                if !is_ready(asset) {
                    continue;
                }
            }
            match slot.animator.setup(ctx) {
                Ok(()) => {
                    slot.ready = true;
                    log::info!(
                        "[scene] {} ready ({} entities)",
                        slot.animator.name(),
                        slot.animator.handles().len()
                    );
                }
                Err(e) => {
                    // Drop whatever was half-built so a retry starts clean.
                    slot.animator.teardown(ctx);
                    failures.push((slot.animator.name(), e));
                }
            }
        }
        failures
    }

    /// Run one frame. Each animator's error is isolated from the others.
    pub fn update(
        &mut self,
        ctx: &mut AnimContext,
        signals: &FrameSignals,
    ) -> Vec<(&'static str, AnimError)> {
        let mut failures = Vec::new();
        for slot in self.entries.iter_mut().filter(|s| s.ready) {
            if let Err(e) = slot.animator.update(ctx, signals) {
                failures.push((slot.animator.name(), e));
            }
        }
        failures
    }

    pub fn trigger(
        &mut self,
        ctx: &mut AnimContext,
        trigger: Trigger,
    ) -> Vec<(&'static str, AnimError)> {
        let mut failures = Vec::new();
        for slot in self.entries.iter_mut().filter(|s| s.ready) {
            if let Err(e) = slot.animator.on_trigger(ctx, trigger) {
                failures.push((slot.animator.name(), e));
            }
        }
        failures
    }

    pub fn teardown(&mut self, ctx: &mut AnimContext) {
        for slot in &mut self.entries {
            slot.animator.teardown(ctx);
            slot.ready = false;
        }
    }
}

/// Uniform in `-span/2..span/2`.
#[inline]
pub(crate) fn jitter(rng: &mut impl Rng, span: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * span
}

/// Random point on a sphere shell, using the same theta/phi draw as the star layout.
pub(crate) fn spherical(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = rng.gen::<f32>() * std::f32::consts::PI;
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

/// Random unit axis for slow tumbling groups.
pub(crate) fn random_axis(rng: &mut impl Rng) -> Vec3 {
    let v = Vec3::new(jitter(rng, 1.0), jitter(rng, 1.0), jitter(rng, 1.0));
    v.try_normalize().unwrap_or(Vec3::Y)
}
