//! Beat-spawned lightning bolts. The only family created and destroyed while running.

use super::{jitter, AnimContext, Animator, FrameSignals};
use crate::color::hsl;
use crate::constants::{LIGHTNING_DECAY, LIGHTNING_MAX_OFFSET, LIGHTNING_SEGMENTS};
use crate::error::AnimError;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::Vec3;
use rand::Rng;
use smallvec::SmallVec;

pub type BoltPath = SmallVec<[Vec3; LIGHTNING_SEGMENTS + 1]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightningBolt {
    pub handle: EntityHandle,
    pub life: f32,
    pub decay: f32,
}

impl LightningBolt {
    pub fn new(handle: EntityHandle) -> Self {
        Self {
            handle,
            life: 1.0,
            decay: LIGHTNING_DECAY,
        }
    }

    /// Decay by one fixed step. Returns false once the bolt is spent.
    ///
    /// Lifetime is counted in frames, not seconds, so it does not follow `delta_phase`.
    pub fn step(&mut self) -> bool {
        self.life -= self.decay;
        self.life > 0.0
    }
}

/// Zig-zag from y=10 down to y=-10, narrowing toward the bottom.
pub fn bolt_path(rng: &mut impl Rng) -> BoltPath {
    (0..=LIGHTNING_SEGMENTS)
        .map(|i| {
            let t = i as f32 / LIGHTNING_SEGMENTS as f32;
            let spread = LIGHTNING_MAX_OFFSET * (1.0 - t);
            Vec3::new(jitter(rng, spread), 10.0 - t * 20.0, jitter(rng, spread))
        })
        .collect()
}

#[derive(Default)]
pub struct Lightning {
    bolts: Vec<LightningBolt>,
}

impl Lightning {
    pub fn active(&self) -> &[LightningBolt] {
        &self.bolts
    }

    fn spawn_bolt(&mut self, ctx: &mut AnimContext) {
        let path = bolt_path(ctx.rng);
        let samples: Vec<f32> = path.iter().flat_map(|p| p.to_array()).collect();
        let color = hsl(ctx.rng.gen(), 0.8, 0.8);
        let params = EntityParams::new(Transform::default())
            .with(MaterialKey::Color, MaterialValue::Color(color))
            .with(MaterialKey::Opacity, MaterialValue::Scalar(1.0))
            .with(MaterialKey::Samples, MaterialValue::Samples(samples));
        let handle = ctx.registry.spawn(ctx.sink, Family::LightningBolt, params);
        self.bolts.push(LightningBolt::new(handle));
    }
}

impl Animator for Lightning {
    fn name(&self) -> &'static str {
        "lightning"
    }

    fn setup(&mut self, _ctx: &mut AnimContext) -> Result<(), AnimError> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let mut i = self.bolts.len();
        while i > 0 {
            i -= 1;
            let bolt = &mut self.bolts[i];
            if bolt.step() {
                let (handle, life) = (bolt.handle, bolt.life);
                ctx.registry.set_scalar(handle, MaterialKey::Opacity, life)?;
            } else {
                let spent = self.bolts.swap_remove(i);
                ctx.registry.despawn(ctx.sink, spent.handle);
            }
        }

        if signals.beat_now() && ctx.profile.use_lightning {
            if self.bolts.len() < ctx.profile.max_lightning {
                self.spawn_bolt(ctx);
            } else {
                log::debug!("[lightning] cap {} reached, beat skipped", ctx.profile.max_lightning);
            }
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.bolts.iter().map(|b| b.handle).collect()
    }

    fn reset(&mut self) {
        self.bolts.clear();
    }
}
