//! Streaming starfield. Stars drift toward -z and respawn on a far shell.

use super::{jitter, spherical, AnimContext, Animator, FrameSignals};
use crate::constants::{STAR_RESPAWN_RADIUS, STAR_RESPAWN_Z, STAR_TREBLE_SPEED_GAIN};
use crate::error::AnimError;
use crate::quality::update_window;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::Vec3;
use rand::Rng;

struct Star {
    handle: EntityHandle,
    velocity: Vec3,
}

#[derive(Default)]
pub struct Starfield {
    stars: Vec<Star>,
}

/// One of four tints: pale blue, white, yellow, red.
fn star_tint(rng: &mut impl Rng) -> Vec3 {
    let kind: f32 = rng.gen();
    let mut ch = |base: f32, span: f32| base + rng.gen::<f32>() * span;
    if kind < 0.25 {
        Vec3::new(ch(0.5, 0.2), ch(0.7, 0.3), ch(0.9, 0.1))
    } else if kind < 0.5 {
        Vec3::new(ch(0.9, 0.1), ch(0.9, 0.1), ch(0.9, 0.1))
    } else if kind < 0.75 {
        Vec3::new(ch(0.9, 0.1), ch(0.9, 0.1), ch(0.5, 0.2))
    } else {
        Vec3::new(ch(0.9, 0.1), ch(0.5, 0.2), ch(0.5, 0.2))
    }
}

impl Starfield {
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

impl Animator for Starfield {
    fn name(&self) -> &'static str {
        "starfield"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let count = ctx.profile.star_count;
        self.stars.reserve(count);
        for _ in 0..count {
            let radius = 50.0 + ctx.rng.gen::<f32>() * 150.0;
            let position = spherical(ctx.rng, radius);
            let color = star_tint(ctx.rng);
            // A tenth of the stars are large.
            let size = if ctx.rng.gen::<f32>() < 0.1 {
                ctx.rng.gen::<f32>() * 4.0 + 2.0
            } else {
                ctx.rng.gen::<f32>() * 2.0 + 1.0
            };
            let velocity = Vec3::new(
                jitter(ctx.rng, 0.03),
                jitter(ctx.rng, 0.03),
                -ctx.rng.gen::<f32>() * 0.1 - 0.05,
            );
            let params = EntityParams::new(Transform::at(position))
                .with(MaterialKey::Color, MaterialValue::Color(color))
                .with(MaterialKey::PointSize, MaterialValue::Scalar(size));
            let handle = ctx.registry.spawn(ctx.sink, Family::Star, params);
            self.stars.push(Star { handle, velocity });
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let treble = signals.bands.treble;
        ctx.registry
            .set_uniform(Family::Star, MaterialKey::Time, MaterialValue::Scalar(signals.t()));
        // Point size scales by (1 + audio intensity) in the star shader.
        ctx.registry.set_uniform(
            Family::Star,
            MaterialKey::AudioIntensity,
            MaterialValue::Scalar(treble),
        );

        let speed = (1.0 + treble * STAR_TREBLE_SPEED_GAIN) * signals.delta_phase;
        let window = update_window(self.stars.len(), ctx.profile.star_updates_per_frame, ctx.rng);
        for star in &self.stars[window] {
            let mut t = ctx.registry.transform(star.handle)?;
            t.position += star.velocity * speed;
            if t.position.z < STAR_RESPAWN_Z {
                t.position = spherical(ctx.rng, STAR_RESPAWN_RADIUS);
            }
            ctx.registry.set_transform(star.handle, t)?;
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.stars.iter().map(|s| s.handle).collect()
    }

    fn reset(&mut self) {
        self.stars.clear();
    }
}
