use super::{jitter, random_axis, AnimContext, Animator, FrameSignals};
use crate::color::{hsl, wrap01};
use crate::constants::{
    WORMHOLE_LIGHT_IDLE, WORMHOLE_LIGHT_PULSE, WORMHOLE_PULSE_STEP, WORMHOLE_TREBLE_SCALE,
};
use crate::error::AnimError;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

/// Beat-triggered brightness pulse. Intensity falls linearly from 1 to 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WormholePulse {
    progress: Option<f32>,
}

impl WormholePulse {
    pub fn is_active(&self) -> bool {
        self.progress.is_some()
    }

    /// Start a pulse unless one is already running. Returns whether it started.
    pub fn start(&mut self) -> bool {
        if self.progress.is_some() {
            return false;
        }
        self.progress = Some(0.0);
        true
    }

    /// Advance by one frame and return the current intensity.
    pub fn advance(&mut self) -> f32 {
        let Some(p) = self.progress.as_mut() else {
            return 0.0;
        };
        *p += WORMHOLE_PULSE_STEP;
        if *p >= 1.0 {
            self.progress = None;
            return 0.0;
        }
        1.0 - *p
    }
}

struct Wormhole {
    tunnel: EntityHandle,
    light: Option<EntityHandle>,
    axis: Vec3,
    speed: f32,
    orientation: Quat,
    pulse: WormholePulse,
}

#[derive(Default)]
pub struct Wormholes {
    wormholes: Vec<Wormhole>,
}

impl Animator for Wormholes {
    fn name(&self) -> &'static str {
        "wormholes"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        for _ in 0..ctx.profile.wormhole_count {
            let position = Vec3::new(
                jitter(ctx.rng, 150.0),
                jitter(ctx.rng, 80.0),
                jitter(ctx.rng, 150.0),
            );
            let orientation = Quat::from_euler(
                EulerRot::XYZ,
                ctx.rng.gen::<f32>() * std::f32::consts::PI,
                ctx.rng.gen::<f32>() * std::f32::consts::PI,
                ctx.rng.gen::<f32>() * std::f32::consts::PI,
            );
            let hue: f32 = ctx.rng.gen();
            let primary = hsl(hue, 0.8, 0.5);
            let mut params = EntityParams::new(Transform::at(position).with_rotation(orientation))
                .with(MaterialKey::Color, MaterialValue::Color(primary))
                .with(MaterialKey::Opacity, MaterialValue::Scalar(0.7));
            if ctx.profile.use_complex_shaders {
                let secondary = hsl(ctx.rng.gen::<f32>() + 0.5, 0.8, 0.5);
                params = params
                    .with(MaterialKey::SecondaryColor, MaterialValue::Color(secondary))
                    .with(MaterialKey::PulseIntensity, MaterialValue::Scalar(0.0));
            }
            let tunnel = ctx.registry.spawn(ctx.sink, Family::Wormhole, params);

            let light = if ctx.profile.use_dynamic_lights {
                let lp = EntityParams::new(Transform::at(position))
                    .with(MaterialKey::Color, MaterialValue::Color(primary))
                    .with(MaterialKey::LightIntensity, MaterialValue::Scalar(WORMHOLE_LIGHT_IDLE));
                Some(ctx.registry.spawn(ctx.sink, Family::Light, lp))
            } else {
                None
            };

            self.wormholes.push(Wormhole {
                tunnel,
                light,
                axis: random_axis(ctx.rng),
                speed: ctx.rng.gen::<f32>() * 0.001 + 0.0005,
                orientation,
                pulse: WormholePulse::default(),
            });
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, signals: &FrameSignals) -> Result<(), AnimError> {
        let t = signals.t();
        let pulses = ctx.profile.use_wormhole_pulse;
        let shaded = ctx.profile.use_complex_shaders;
        if shaded {
            ctx.registry
                .set_uniform(Family::Wormhole, MaterialKey::Time, MaterialValue::Scalar(t));
        }
        let scale = 1.0 + signals.bands.treble * WORMHOLE_TREBLE_SCALE;
        let primary = hsl(wrap01(t * 0.03), 0.8, 0.5);
        let secondary = hsl(wrap01(t * 0.02 + 0.5), 0.8, 0.5);

        for w in &mut self.wormholes {
            if pulses && signals.beat_now() && w.pulse.start() {
                if let Some(light) = w.light {
                    ctx.registry
                        .set_scalar(light, MaterialKey::LightIntensity, WORMHOLE_LIGHT_PULSE)?;
                }
            }

            w.orientation = (w.orientation
                * Quat::from_axis_angle(w.axis, w.speed * signals.delta_phase))
            .normalize();
            let orientation = w.orientation;
            ctx.registry.update_transform(w.tunnel, |tr| {
                tr.rotation = orientation;
                tr.scale = Vec3::splat(scale);
            })?;

            if pulses && w.pulse.is_active() {
                let intensity = w.pulse.advance();
                if shaded {
                    ctx.registry
                        .set_scalar(w.tunnel, MaterialKey::PulseIntensity, intensity)?;
                }
                if !w.pulse.is_active() {
                    if let Some(light) = w.light {
                        ctx.registry
                            .set_scalar(light, MaterialKey::LightIntensity, WORMHOLE_LIGHT_IDLE)?;
                    }
                }
            }

            ctx.registry.set_color(w.tunnel, MaterialKey::Color, primary)?;
            if shaded {
                ctx.registry
                    .set_color(w.tunnel, MaterialKey::SecondaryColor, secondary)?;
            }
            if let Some(light) = w.light {
                ctx.registry.set_color(light, MaterialKey::Color, primary)?;
            }
        }
        Ok(())
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.wormholes
            .iter()
            .flat_map(|w| std::iter::once(w.tunnel).chain(w.light))
            .collect()
    }

    fn reset(&mut self) {
        self.wormholes.clear();
    }
}
