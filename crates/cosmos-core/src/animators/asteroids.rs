//! Asteroid belts orbiting glowing galaxy cores.
//!
//! Each belt is a rigid group: asteroids keep a local offset from their core
//! and the whole group tumbles around a random axis. The registry has no
//! hierarchy, so world transforms are composed here.

use super::{jitter, random_axis, AnimContext, Animator, FrameSignals};
use crate::color::{hsl, wrap01};
use crate::error::AnimError;
use crate::quality::stride_due;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

struct Asteroid {
    handle: EntityHandle,
    local_position: Vec3,
    euler: Vec3,
    spin: Vec3,
}

struct Belt {
    core: EntityHandle,
    core_radius: f32,
    center: Vec3,
    axis: Vec3,
    speed: f32,
    orientation: Quat,
    asteroids: Vec<Asteroid>,
}

#[derive(Default)]
pub struct AsteroidBelts {
    belts: Vec<Belt>,
}

impl AsteroidBelts {
    pub fn asteroid_count(&self) -> usize {
        self.belts.iter().map(|b| b.asteroids.len()).sum()
    }
}

impl Animator for AsteroidBelts {
    fn name(&self) -> &'static str {
        "asteroids"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let emissive = ctx.profile.use_emissive;
        for b in 0..ctx.profile.belt_count {
            let bf = b as f32;
            let count = ctx.profile.asteroids_for_belt(ctx.rng);
            let belt_radius = 25.0 + bf * 15.0;
            let thickness = 5.0 + bf * 2.0;
            let height = 10.0 + bf * 5.0;
            let core_radius = 3.0 + bf * 1.5;

            let center = Vec3::new(
                jitter(ctx.rng, 100.0),
                jitter(ctx.rng, 60.0),
                jitter(ctx.rng, 100.0),
            );
            let core_color = hsl(ctx.rng.gen(), 0.8, 0.5);
            let core_transform = Transform::at(center).with_uniform_scale(core_radius);
            let core_params = EntityParams::new(core_transform)
                .with(MaterialKey::Opacity, MaterialValue::Scalar(0.8));
            let core_params = if emissive {
                core_params
                    .with(MaterialKey::Color, MaterialValue::Color(Vec3::ZERO))
                    .with(MaterialKey::Emissive, MaterialValue::Color(core_color))
                    .with(MaterialKey::EmissiveIntensity, MaterialValue::Scalar(2.0))
            } else {
                core_params.with(MaterialKey::Color, MaterialValue::Color(core_color))
            };
            let core = ctx.registry.spawn(ctx.sink, Family::BeltCore, core_params);

            let mut asteroids = Vec::with_capacity(count);
            for _ in 0..count {
                let size = ctx.rng.gen::<f32>() * 0.8 + 0.2;
                let angle = ctx.rng.gen::<f32>() * std::f32::consts::TAU;
                let orbit = belt_radius + jitter(ctx.rng, thickness);
                let local_position =
                    Vec3::new(angle.cos() * orbit, jitter(ctx.rng, height), angle.sin() * orbit);
                let euler = Vec3::new(
                    ctx.rng.gen::<f32>() * std::f32::consts::TAU,
                    ctx.rng.gen::<f32>() * std::f32::consts::TAU,
                    ctx.rng.gen::<f32>() * std::f32::consts::TAU,
                );
                // Brown/grey rock tints.
                let color = hsl(
                    0.05 + ctx.rng.gen::<f32>() * 0.1,
                    0.3 + ctx.rng.gen::<f32>() * 0.3,
                    0.2 + ctx.rng.gen::<f32>() * 0.3,
                );
                let transform = Transform::at(center + local_position)
                    .with_rotation(Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z))
                    .with_uniform_scale(size);
                let handle = ctx.registry.spawn(
                    ctx.sink,
                    Family::Asteroid,
                    EntityParams::new(transform)
                        .with(MaterialKey::Color, MaterialValue::Color(color)),
                );
                asteroids.push(Asteroid {
                    handle,
                    local_position,
                    euler,
                    spin: Vec3::new(
                        jitter(ctx.rng, 0.01),
                        jitter(ctx.rng, 0.01),
                        jitter(ctx.rng, 0.01),
                    ),
                });
            }

            self.belts.push(Belt {
                core,
                core_radius,
                center,
                axis: random_axis(ctx.rng),
                speed: ctx.rng.gen::<f32>() * 0.0001 + 0.00005,
                orientation: Quat::IDENTITY,
                asteroids,
            });
        }

        let total = self.asteroid_count();
        let limit = ctx.profile.max_asteroids();
        if total > limit {
            return Err(AnimError::PopulationExceeded {
                family: Family::Asteroid,
                count: total,
                limit,
            });
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let bass = signals.bands.bass;
        let mid = signals.bands.mid;
        let t = signals.t();
        let emissive = ctx.profile.use_emissive;
        let spin_due = stride_due(signals.elapsed_sec, ctx.profile.asteroid_stride);

        for belt in &mut self.belts {
            let step = belt.speed * (1.0 + bass * 2.0) * signals.delta_phase;
            let turn = Quat::from_axis_angle(belt.axis, step);
            belt.orientation = (belt.orientation * turn).normalize();

            if emissive {
                ctx.registry
                    .set_scalar(belt.core, MaterialKey::EmissiveIntensity, 2.0 + bass * 3.0)?;
                let hue = wrap01(t * 0.05 + bass * 0.1);
                ctx.registry
                    .set_color(belt.core, MaterialKey::Emissive, hsl(hue, 0.8, 0.5))?;
            } else {
                let hue = wrap01(t * 0.05);
                ctx.registry
                    .set_color(belt.core, MaterialKey::Color, hsl(hue, 0.8, 0.5))?;
            }
            let core_scale = belt.core_radius * (1.0 + bass * 0.3);
            ctx.registry.update_transform(belt.core, |tr| tr.scale = Vec3::splat(core_scale))?;

            // Degraded profiles move the whole belt on stride frames only.
            if !spin_due {
                continue;
            }
            for a in &mut belt.asteroids {
                a.euler += a.spin * (1.0 + mid) * signals.delta_phase;
                let local = Quat::from_euler(EulerRot::XYZ, a.euler.x, a.euler.y, a.euler.z);
                let position = belt.center + belt.orientation * a.local_position;
                let rotation = belt.orientation * local;
                ctx.registry.update_transform(a.handle, |tr| {
                    tr.position = position;
                    tr.rotation = rotation;
                })?;
            }
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        let mut out = Vec::with_capacity(self.asteroid_count() + self.belts.len());
        for belt in &self.belts {
            out.push(belt.core);
            out.extend(belt.asteroids.iter().map(|a| a.handle));
        }
        out
    }

    fn reset(&mut self) {
        self.belts.clear();
    }
}
