use super::{AnimContext, Animator, FrameSignals, Trigger};
use crate::color::hsl;
use crate::constants::{BURST_FLOOR_Y, BURST_GRAVITY, BURST_ORIGIN};
use crate::error::AnimError;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::Vec3;
use rand::Rng;

struct Particle {
    handle: EntityHandle,
    position: Vec3,
    velocity: Vec3,
}

/// Click fountain. Particles stay hidden until the first click, then keep cycling.
#[derive(Default)]
pub struct BurstParticles {
    particles: Vec<Particle>,
    armed: bool,
}

fn launch_velocity(rng: &mut impl Rng) -> Vec3 {
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = rng.gen::<f32>() * std::f32::consts::PI;
    let speed = rng.gen::<f32>() * 0.1 + 0.05;
    Vec3::new(
        speed * phi.sin() * theta.cos(),
        speed * phi.cos(),
        speed * phi.sin() * theta.sin(),
    )
}

impl BurstParticles {
    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl Animator for BurstParticles {
    fn name(&self) -> &'static str {
        "bursts"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let origin = Vec3::from_array(BURST_ORIGIN);
        for _ in 0..ctx.profile.burst_count {
            let params = EntityParams::new(Transform::at(origin))
                .with(MaterialKey::Color, MaterialValue::Color(hsl(ctx.rng.gen(), 0.9, 0.6)))
                .with(MaterialKey::PointSize, MaterialValue::Scalar(0.1))
                .with(MaterialKey::Opacity, MaterialValue::Scalar(0.8))
                .with(MaterialKey::Visible, MaterialValue::Flag(false));
            let handle = ctx.registry.spawn(ctx.sink, Family::BurstParticle, params);
            self.particles.push(Particle {
                handle,
                position: origin,
                velocity: launch_velocity(ctx.rng),
            });
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        if !self.armed {
            return Ok(());
        }
        let phase = signals.delta_phase;
        for p in &mut self.particles {
            p.position += p.velocity * phase;
            p.velocity.y -= BURST_GRAVITY * phase;
            if p.position.y < BURST_FLOOR_Y {
                p.position = Vec3::from_array(BURST_ORIGIN);
                p.velocity = launch_velocity(ctx.rng);
            }
            let position = p.position;
            ctx.registry
                .update_transform(p.handle, |tr| tr.position = position)?;
        }
        Ok(())
    }

    fn on_trigger(&mut self, ctx: &mut AnimContext, trigger: Trigger) -> Result<(), AnimError> {
        let Trigger::Click = trigger;
        let origin = Vec3::from_array(BURST_ORIGIN);
        for p in &mut self.particles {
            p.position = origin;
            p.velocity = launch_velocity(ctx.rng);
            ctx.registry
                .update_transform(p.handle, |tr| tr.position = origin)?;
            ctx.registry
                .set_color(p.handle, MaterialKey::Color, hsl(ctx.rng.gen(), 0.9, 0.6))?;
            ctx.registry.set_visible(p.handle, true)?;
        }
        self.armed = true;
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.particles.iter().map(|p| p.handle).collect()
    }

    fn reset(&mut self) {
        self.particles.clear();
        self.armed = false;
    }
}
