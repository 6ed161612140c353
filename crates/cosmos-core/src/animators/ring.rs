use super::{AnimContext, Animator, FrameSignals};
use crate::color::{hsl, wrap01};
use crate::error::AnimError;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::{Quat, Vec3};

const OUTER_RADIUS: f32 = 5.0;
const INNER_RADIUS: f32 = 4.7;
const RING_Y: f32 = 0.1;

/// The static glowing ring under the ship: outer ring on bass, inner ring on mids.
#[derive(Default)]
pub struct GlowingRing {
    outer: Option<EntityHandle>,
    inner: Option<EntityHandle>,
    light: Option<EntityHandle>,
}

fn ring_params(radius: f32, tint: Vec3, intensity: f32, emissive: bool) -> EntityParams {
    let transform = Transform::at(Vec3::new(0.0, RING_Y, 0.0))
        .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2))
        .with_uniform_scale(radius);
    let params = EntityParams::new(transform);
    if emissive {
        params
            .with(MaterialKey::Color, MaterialValue::Color(Vec3::ZERO))
            .with(MaterialKey::Emissive, MaterialValue::Color(tint))
            .with(MaterialKey::EmissiveIntensity, MaterialValue::Scalar(intensity))
    } else {
        params
            .with(MaterialKey::Color, MaterialValue::Color(tint))
            .with(MaterialKey::Opacity, MaterialValue::Scalar(0.8))
    }
}

impl GlowingRing {
    fn pulse(
        ctx: &mut AnimContext,
        handle: EntityHandle,
        radius: f32,
        level: f32,
        scale_gain: f32,
        hue: f32,
        intensity: f32,
    ) -> Result<(), AnimError> {
        if ctx.profile.use_emissive {
            ctx.registry
                .set_scalar(handle, MaterialKey::EmissiveIntensity, intensity)?;
            ctx.registry
                .set_color(handle, MaterialKey::Emissive, hsl(hue, 0.7, 0.5))?;
        } else {
            ctx.registry
                .set_color(handle, MaterialKey::Color, hsl(hue, 0.7, 0.5))?;
        }
        let s = radius * (1.0 + level * scale_gain);
        ctx.registry
            .update_transform(handle, |tr| tr.scale = Vec3::splat(s))
    }
}

impl Animator for GlowingRing {
    fn name(&self) -> &'static str {
        "ring"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let emissive = ctx.profile.use_emissive;
        let cyan = Vec3::new(0.0, 0.667, 1.0);
        let orange = Vec3::new(1.0, 0.333, 0.0);
        self.outer = Some(ctx.registry.spawn(
            ctx.sink,
            Family::RingSegment,
            ring_params(OUTER_RADIUS, cyan, 5.0, emissive),
        ));
        self.inner = Some(ctx.registry.spawn(
            ctx.sink,
            Family::RingSegment,
            ring_params(INNER_RADIUS, orange, 4.0, emissive),
        ));
        if ctx.profile.use_dynamic_lights {
            let params = EntityParams::new(Transform::at(Vec3::new(0.0, RING_Y, 0.0)))
                .with(MaterialKey::Color, MaterialValue::Color(cyan))
                .with(MaterialKey::LightIntensity, MaterialValue::Scalar(5.0));
            self.light = Some(ctx.registry.spawn(ctx.sink, Family::Light, params));
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let t = signals.t();
        let bass = signals.bands.bass;
        let mid = signals.bands.mid;

        if let Some(outer) = self.outer {
            let intensity = 5.0 + (t * 2.0).sin() * 2.0 + bass * 5.0;
            let hue = wrap01(t * 0.05 + bass * 0.1);
            Self::pulse(ctx, outer, OUTER_RADIUS, bass, 0.2, hue, intensity)?;
        }
        if let Some(inner) = self.inner {
            let intensity = 4.0 + (t * 2.5).cos() * 1.5 + mid * 4.0;
            let hue = wrap01(t * 0.07 + 0.5 + mid * 0.1);
            Self::pulse(ctx, inner, INNER_RADIUS, mid, 0.15, hue, intensity)?;
        }
        if let Some(light) = self.light {
            let intensity = 5.0 + (t * 3.0).sin() * 2.0 + bass * 10.0;
            ctx.registry
                .set_scalar(light, MaterialKey::LightIntensity, intensity)?;
            ctx.registry
                .set_color(light, MaterialKey::Color, hsl(wrap01(t * 0.05), 0.7, 0.5))?;
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        [self.outer, self.inner, self.light]
            .into_iter()
            .flatten()
            .collect()
    }

    fn reset(&mut self) {
        self.outer = None;
        self.inner = None;
        self.light = None;
    }
}
