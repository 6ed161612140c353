//! The loaded ship model and its thruster exhaust.
//!
//! Gated on the model asset: nothing is spawned until the host reports the
//! model loaded.

use super::{jitter, AnimContext, Animator, Asset, FrameSignals};
use crate::constants::{SHIP_FOLLOW_RATE, SHIP_REST_POSITION, SHIP_SCALE, THRUSTER_RESPAWN_Z};
use crate::error::AnimError;
use crate::quality::update_window;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

struct Thruster {
    handle: EntityHandle,
    local: Vec3,
    velocity: Vec3,
}

#[derive(Default)]
pub struct Ship {
    ship: Option<EntityHandle>,
    position: Vec3,
    yaw: f32,
    roll: f32,
    thrusters: Vec<Thruster>,
}

fn exhaust_origin(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(jitter(rng, 0.1), jitter(rng, 0.1), -rng.gen::<f32>() * 0.5)
}

/// Blue-white exhaust tint.
fn exhaust_color(rng: &mut impl Rng) -> Vec3 {
    let t: f32 = rng.gen();
    Vec3::new(t, 0.5 + t * 0.5, 1.0)
}

impl Ship {
    pub fn thruster_count(&self) -> usize {
        self.thrusters.len()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, 0.0, self.yaw, self.roll)
    }
}

impl Animator for Ship {
    fn name(&self) -> &'static str {
        "ship"
    }

    fn requires(&self) -> Option<Asset> {
        Some(Asset::ShipModel)
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        self.position = Vec3::from_array(SHIP_REST_POSITION);
        self.yaw = 0.0;
        self.roll = 0.0;
        let params =
            EntityParams::new(Transform::at(self.position).with_uniform_scale(SHIP_SCALE));
        self.ship = Some(ctx.registry.spawn(ctx.sink, Family::Ship, params));

        for _ in 0..ctx.profile.thruster_count {
            let local = exhaust_origin(ctx.rng);
            let velocity = Vec3::new(
                jitter(ctx.rng, 0.01),
                jitter(ctx.rng, 0.01),
                -ctx.rng.gen::<f32>() * 0.1 - 0.05,
            );
            let params = EntityParams::new(Transform::at(self.position + local))
                .with(MaterialKey::Color, MaterialValue::Color(exhaust_color(ctx.rng)))
                .with(MaterialKey::PointSize, MaterialValue::Scalar(0.05))
                .with(MaterialKey::Opacity, MaterialValue::Scalar(0.8));
            let handle = ctx.registry.spawn(ctx.sink, Family::ThrusterParticle, params);
            self.thrusters.push(Thruster {
                handle,
                local,
                velocity,
            });
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let Some(ship) = self.ship else {
            return Ok(());
        };
        let t = signals.t();
        let bass = signals.bands.bass;
        let steer = signals.pointer.x;
        let follow = (SHIP_FOLLOW_RATE * signals.delta_phase).min(1.0);

        self.yaw = (t * 0.1).sin() * 0.05 + bass * 0.2 * 0.1;
        self.position.x += (steer * 0.5 - self.position.x) * follow;
        self.roll += (-steer * 0.2 - self.roll) * follow;
        // Bob with the bass.
        self.position.y = SHIP_REST_POSITION[1] + bass * 0.2;

        let position = self.position;
        let orientation = self.orientation();
        ctx.registry.update_transform(ship, |tr| {
            tr.position = position;
            tr.rotation = orientation;
        })?;

        let window = update_window(
            self.thrusters.len(),
            ctx.profile.thruster_updates_per_frame,
            ctx.rng,
        );
        for th in &mut self.thrusters[window] {
            th.local += th.velocity * signals.delta_phase;
            if th.local.z < THRUSTER_RESPAWN_Z {
                th.local = exhaust_origin(ctx.rng);
                ctx.registry
                    .set_color(th.handle, MaterialKey::Color, exhaust_color(ctx.rng))?;
            }
            let world = position + orientation * th.local;
            ctx.registry
                .update_transform(th.handle, |tr| tr.position = world)?;
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.ship
            .into_iter()
            .chain(self.thrusters.iter().map(|t| t.handle))
            .collect()
    }

    fn reset(&mut self) {
        self.ship = None;
        self.thrusters.clear();
    }
}
