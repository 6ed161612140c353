use super::{AnimContext, Animator, FrameSignals};
use crate::color::{hsl, wrap01};
use crate::constants::{
    SOUND_PLANE_BASE_AMPLITUDE, SOUND_PLANE_BUCKETS, SOUND_PLANE_GAIN, SOUND_PLANE_LEVEL_AMPLITUDE,
    SOUND_PLANE_Y,
};
use crate::error::AnimError;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::{EulerRot, Quat, Vec3};

/// Surface height at plane coordinates `x`, `y` (both in -1..1).
///
/// The spectrum runs along x, linearly interpolated between adjacent buckets,
/// with two slow travelling sines on top.
pub fn sample_elevation(samples: &[f32], amplitude: f32, x: f32, y: f32, time: f32) -> f32 {
    let audio = if samples.is_empty() {
        0.0
    } else {
        let last = samples.len() - 1;
        let pos = (x * 0.5 + 0.5).clamp(0.0, 1.0) * last as f32;
        let index = (pos.floor() as usize).min(last);
        let frac = pos - index as f32;
        let a = samples[index];
        let b = samples[(index + 1).min(last)];
        a + (b - a) * frac
    };
    let mut elevation = audio * amplitude;
    elevation += (x * 3.0 + time * 0.5).sin() * 0.2 * amplitude;
    elevation += (y * 2.0 + time * 0.3).sin() * 0.1 * amplitude;
    elevation
}

/// Spectrum samples fed to the plane: the frame downsampled and amplified.
pub fn plane_samples(signals: &FrameSignals) -> Vec<f32> {
    let mut samples = signals.spectrum.downsample(SOUND_PLANE_BUCKETS);
    for v in &mut samples {
        *v *= SOUND_PLANE_GAIN;
    }
    samples
}

/// Wide wave surface below the scene. Desktop only.
#[derive(Default)]
pub struct SoundPlane {
    plane: Option<EntityHandle>,
    spin: f32,
}

impl Animator for SoundPlane {
    fn name(&self) -> &'static str {
        "sound_plane"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        if !ctx.profile.use_sound_plane {
            return Ok(());
        }
        let transform = Transform::at(Vec3::new(0.0, SOUND_PLANE_Y, 0.0))
            .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2));
        let params = EntityParams::new(transform)
            .with(MaterialKey::Samples, MaterialValue::Samples(vec![0.0; SOUND_PLANE_BUCKETS]))
            .with(MaterialKey::Amplitude, MaterialValue::Scalar(SOUND_PLANE_BASE_AMPLITUDE))
            .with(MaterialKey::Color, MaterialValue::Color(hsl(0.6, 0.8, 0.5)))
            .with(MaterialKey::SecondaryColor, MaterialValue::Color(hsl(0.7, 0.9, 0.7)))
            .with(MaterialKey::LowColor, MaterialValue::Color(hsl(0.2, 0.8, 0.3)))
            .with(MaterialKey::Opacity, MaterialValue::Scalar(0.7));
        self.plane = Some(ctx.registry.spawn(ctx.sink, Family::SoundPlane, params));
        self.spin = 0.0;
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let Some(plane) = self.plane else {
            return Ok(());
        };
        let t = signals.t();
        ctx.registry
            .set_uniform(Family::SoundPlane, MaterialKey::Time, MaterialValue::Scalar(t));

        if signals.audio_active {
            let b = signals.bands;
            ctx.registry.set_param(
                plane,
                MaterialKey::Samples,
                MaterialValue::Samples(plane_samples(signals)),
            )?;
            let low = hsl(wrap01(t * 0.05 + b.bass * 0.2), 0.8, 0.5);
            let high = hsl(wrap01(t * 0.03 + b.treble * 0.2 + 0.5), 0.9, 0.7);
            let base = hsl(wrap01(t * 0.04 + b.mid * 0.2 + 0.3), 0.8, 0.4);
            ctx.registry.set_color(plane, MaterialKey::Color, base)?;
            ctx.registry.set_color(plane, MaterialKey::SecondaryColor, high)?;
            ctx.registry.set_color(plane, MaterialKey::LowColor, low)?;
            let amplitude = SOUND_PLANE_BASE_AMPLITUDE + b.overall() * SOUND_PLANE_LEVEL_AMPLITUDE;
            ctx.registry.set_scalar(plane, MaterialKey::Amplitude, amplitude)?;
        }

        self.spin += 0.001 * signals.delta_phase;
        let tilt = -std::f32::consts::FRAC_PI_2;
        let rotation = Quat::from_euler(EulerRot::XYZ, tilt, 0.0, self.spin);
        ctx.registry
            .update_transform(plane, |tr| tr.rotation = rotation)
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.plane.into_iter().collect()
    }

    fn reset(&mut self) {
        self.plane = None;
        self.spin = 0.0;
    }
}
