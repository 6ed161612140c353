use super::{jitter, AnimContext, Animator, FrameSignals};
use crate::bands::band_slices;
use crate::color::{hsl, wrap01};
use crate::constants::{CRYSTAL_AUDIO_BOOST, CRYSTAL_ORBIT_BREATH, CRYSTAL_ORBIT_CENTER};
use crate::error::AnimError;
use crate::quality::stride_due;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

struct Crystal {
    handle: EntityHandle,
    euler: Vec3,
    spin: Vec3,
    float_speed: f32,
    float_offset: f32,
    base_y: f32,
    orbit_radius: f32,
    orbit_speed: f32,
    orbit_offset: f32,
}

/// Octahedral crystals orbiting the centre, reacting to individual mid-band bins.
#[derive(Default)]
pub struct FloatingCrystals {
    crystals: Vec<Crystal>,
}

/// Mid-band magnitude driving crystal `index`, zero while audio is inactive.
pub fn crystal_drive(signals: &FrameSignals, index: usize) -> f32 {
    if !signals.audio_active {
        return 0.0;
    }
    let [_, mid, _] = band_slices(signals.spectrum);
    if mid.is_empty() {
        return 0.0;
    }
    mid[index % mid.len()]
}

impl Animator for FloatingCrystals {
    fn name(&self) -> &'static str {
        "crystals"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let center = Vec3::from_array(CRYSTAL_ORBIT_CENTER);
        for _ in 0..ctx.profile.crystal_count {
            let size = ctx.rng.gen::<f32>() * 0.5 + 0.2;
            let radius = 8.0 + ctx.rng.gen::<f32>() * 8.0;
            let theta = ctx.rng.gen::<f32>() * std::f32::consts::TAU;
            let phi = ctx.rng.gen::<f32>() * std::f32::consts::PI;
            let position = Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin() + center.y,
                radius * phi.cos(),
            );
            let euler = Vec3::new(
                ctx.rng.gen::<f32>() * std::f32::consts::PI,
                ctx.rng.gen::<f32>() * std::f32::consts::PI,
                ctx.rng.gen::<f32>() * std::f32::consts::PI,
            );
            let transform = Transform::at(position)
                .with_rotation(Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z))
                .with_uniform_scale(size);

            let mut params = EntityParams::new(transform).with(
                MaterialKey::Color,
                MaterialValue::Color(hsl(ctx.rng.gen(), 0.8, 0.6)),
            );
            if ctx.profile.use_emissive {
                params = params
                    .with(
                        MaterialKey::Emissive,
                        MaterialValue::Color(hsl(ctx.rng.gen(), 0.9, 0.4)),
                    )
                    .with(MaterialKey::EmissiveIntensity, MaterialValue::Scalar(0.6));
            } else {
                params = params.with(MaterialKey::Opacity, MaterialValue::Scalar(0.8));
            }
            let handle = ctx.registry.spawn(ctx.sink, Family::Crystal, params);

            self.crystals.push(Crystal {
                handle,
                euler,
                spin: Vec3::new(
                    jitter(ctx.rng, 0.01),
                    jitter(ctx.rng, 0.01),
                    jitter(ctx.rng, 0.01),
                ),
                float_speed: ctx.rng.gen::<f32>() * 0.01 + 0.005,
                float_offset: ctx.rng.gen::<f32>() * std::f32::consts::TAU,
                base_y: position.y,
                orbit_radius: radius,
                orbit_speed: ctx.rng.gen::<f32>() * 0.0005 + 0.0002,
                orbit_offset: ctx.rng.gen::<f32>() * std::f32::consts::TAU,
            });
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        if !stride_due(signals.elapsed_sec, ctx.profile.crystal_stride) {
            return Ok(());
        }
        let t = signals.t();
        let center = Vec3::from_array(CRYSTAL_ORBIT_CENTER);
        for (index, c) in self.crystals.iter_mut().enumerate() {
            let boost = crystal_drive(signals, index) * CRYSTAL_AUDIO_BOOST;

            c.euler += c.spin * (1.0 + boost) * signals.delta_phase;
            let float_y = (t * c.float_speed + c.float_offset).sin() * 0.5 * (1.0 + boost);
            let angle = t * c.orbit_speed + c.orbit_offset;
            let reach = c.orbit_radius * (1.0 + boost * CRYSTAL_ORBIT_BREATH);
            let position = Vec3::new(
                center.x + angle.sin() * reach,
                c.base_y + float_y,
                center.z + angle.cos() * reach,
            );
            let rotation = Quat::from_euler(EulerRot::XYZ, c.euler.x, c.euler.y, c.euler.z);
            ctx.registry.update_transform(c.handle, |tr| {
                tr.position = position;
                tr.rotation = rotation;
            })?;

            let hue = wrap01(t * 0.01 + c.float_offset + boost * 0.1);
            ctx.registry
                .set_color(c.handle, MaterialKey::Color, hsl(hue, 0.8, 0.6))?;
            if ctx.profile.use_emissive {
                ctx.registry
                    .set_color(c.handle, MaterialKey::Emissive, hsl(hue + 0.5, 0.9, 0.4))?;
                let intensity = 0.6 + (t * 2.0 + c.float_offset).sin() * 0.2 + boost;
                ctx.registry
                    .set_scalar(c.handle, MaterialKey::EmissiveIntensity, intensity)?;
            }
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.crystals.iter().map(|c| c.handle).collect()
    }

    fn reset(&mut self) {
        self.crystals.clear();
    }
}
