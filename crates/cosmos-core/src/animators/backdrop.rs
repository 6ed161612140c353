use super::{AnimContext, Animator, FrameSignals};
use crate::color::{hsl, wrap01};
use crate::error::AnimError;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::Vec3;

const SKYBOX_SIZE: f32 = 500.0;
const ORBIT_RADIUS: f32 = 10.0;

/// Skybox tint plus the audio-driven scene lights.
#[derive(Default)]
pub struct Backdrop {
    skybox: Option<EntityHandle>,
    spot: Option<EntityHandle>,
    movers: Option<[EntityHandle; 2]>,
}

fn light(position: Vec3, intensity: f32) -> EntityParams {
    EntityParams::new(Transform::at(position))
        .with(MaterialKey::Color, MaterialValue::Color(Vec3::ONE))
        .with(MaterialKey::LightIntensity, MaterialValue::Scalar(intensity))
}

impl Animator for Backdrop {
    fn name(&self) -> &'static str {
        "backdrop"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let sky = EntityParams::new(Transform::default().with_uniform_scale(SKYBOX_SIZE))
            .with(MaterialKey::Color, MaterialValue::Color(Vec3::ZERO))
            .with(MaterialKey::Opacity, MaterialValue::Scalar(0.3));
        self.skybox = Some(ctx.registry.spawn(ctx.sink, Family::Skybox, sky));

        if ctx.profile.use_dynamic_lights {
            self.spot = Some(ctx.registry.spawn(
                ctx.sink,
                Family::Light,
                light(Vec3::new(0.0, 15.0, 0.0), 50.0),
            ));
            let a = ctx.registry.spawn(ctx.sink, Family::Light, light(Vec3::ZERO, 1.0));
            let b = ctx.registry.spawn(ctx.sink, Family::Light, light(Vec3::ZERO, 1.0));
            self.movers = Some([a, b]);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let t = signals.t();
        let b = signals.bands;

        if let Some(sky) = self.skybox {
            ctx.registry
                .set_scalar(sky, MaterialKey::Opacity, 0.3 + b.bass * 0.3)?;
            let hue = wrap01(t * 0.02 + b.bass * 0.2);
            ctx.registry
                .set_color(sky, MaterialKey::Color, hsl(hue, 0.7, 0.1 + b.bass * 0.2))?;
        }

        if let Some(spot) = self.spot {
            ctx.registry.set_scalar(
                spot,
                MaterialKey::LightIntensity,
                30.0 + t.sin() * 5.0 + b.treble * 20.0,
            )?;
            let hue = wrap01(t * 0.02 + b.treble * 0.1);
            ctx.registry
                .set_color(spot, MaterialKey::Color, hsl(hue, 0.5, 0.6))?;
        }

        if let Some([first, second]) = self.movers {
            let angle = t * 0.5;
            let p1 = Vec3::new(
                angle.sin() * ORBIT_RADIUS,
                5.0 + (t * 0.7).sin() * 2.0 + b.mid * 3.0,
                angle.cos() * ORBIT_RADIUS,
            );
            let angle = angle + std::f32::consts::PI;
            let p2 = Vec3::new(
                angle.sin() * ORBIT_RADIUS,
                5.0 + (t * 0.7).cos() * 2.0 + b.treble * 3.0,
                angle.cos() * ORBIT_RADIUS,
            );
            ctx.registry.update_transform(first, |tr| tr.position = p1)?;
            ctx.registry.update_transform(second, |tr| tr.position = p2)?;
            ctx.registry
                .set_scalar(first, MaterialKey::LightIntensity, 0.5 + b.bass * 2.0)?;
            ctx.registry
                .set_scalar(second, MaterialKey::LightIntensity, 0.5 + b.treble * 2.0)?;
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        let mut out: Vec<EntityHandle> = self.skybox.into_iter().chain(self.spot).collect();
        if let Some(m) = self.movers {
            out.extend(m);
        }
        out
    }

    fn reset(&mut self) {
        self.skybox = None;
        self.spot = None;
        self.movers = None;
    }
}
