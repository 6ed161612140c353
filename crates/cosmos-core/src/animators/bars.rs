//! Ring of 3D spectrum bars around the ship.

use super::{AnimContext, Animator, FrameSignals};
use crate::color::{hsl, wrap01};
use crate::constants::{BAR_HEIGHT_GAIN, BAR_HUE_DRIFT, BAR_MIN_HEIGHT, BAR_RING_RADIUS};
use crate::error::AnimError;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::{Quat, Vec3};

#[derive(Default)]
pub struct VisualizerBars {
    bars: Vec<EntityHandle>,
}

/// Bar height for a normalized magnitude.
#[inline]
pub fn bar_height(value: f32) -> f32 {
    BAR_MIN_HEIGHT + value * BAR_HEIGHT_GAIN
}

impl Animator for VisualizerBars {
    fn name(&self) -> &'static str {
        "bars"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let count = ctx.profile.bar_count;
        for i in 0..count {
            let frac = i as f32 / count as f32;
            let angle = frac * std::f32::consts::TAU;
            let position = Vec3::new(
                angle.sin() * BAR_RING_RADIUS,
                0.0,
                angle.cos() * BAR_RING_RADIUS,
            );
            // Face the ring centre.
            let rotation = Quat::from_rotation_y(angle + std::f32::consts::PI);
            let color = hsl(frac, 0.8, 0.5);
            let mut transform = Transform::at(position).with_rotation(rotation);
            transform.scale.y = BAR_MIN_HEIGHT;
            let mut params = EntityParams::new(transform)
                .with(MaterialKey::Color, MaterialValue::Color(color))
                .with(MaterialKey::Opacity, MaterialValue::Scalar(0.8));
            if ctx.profile.use_emissive {
                params = params.with(MaterialKey::Emissive, MaterialValue::Color(color * 0.3));
            }
            self.bars.push(ctx.registry.spawn(ctx.sink, Family::Bar, params));
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let count = self.bars.len();
        let t = signals.t();
        for (i, &handle) in self.bars.iter().enumerate() {
            let value = signals.spectrum.bucket(i, count);
            let height = bar_height(value);
            ctx.registry.update_transform(handle, |tr| {
                tr.scale.y = height;
                // Keep the base on the floor.
                tr.position.y = height / 2.0;
            })?;

            let hue = wrap01(i as f32 / count as f32 + t * BAR_HUE_DRIFT);
            ctx.registry
                .set_color(handle, MaterialKey::Color, hsl(hue, 0.8, 0.5 + value * 0.5))?;
            if ctx.profile.use_emissive {
                ctx.registry.set_color(
                    handle,
                    MaterialKey::Emissive,
                    hsl(hue, 0.9, 0.3 + value * 0.3),
                )?;
            }
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.bars.clone()
    }

    fn reset(&mut self) {
        self.bars.clear();
    }
}
