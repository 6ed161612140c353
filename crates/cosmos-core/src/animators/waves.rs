//! Expanding energy rings fired by clicks, drawn from a fixed pool.

use super::{AnimContext, Animator, FrameSignals, Trigger};
use crate::color::hsl;
use crate::constants::{
    ENERGY_WAVE_INITIAL_SCALE, ENERGY_WAVE_MAX_OPACITY, ENERGY_WAVE_PROGRESS_RATE,
};
use crate::error::AnimError;
use crate::registry::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use glam::{Quat, Vec3};
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
pub struct EnergyWave {
    pub handle: EntityHandle,
    pub initial_scale: f32,
    pub max_scale: f32,
    pub speed: f32,
    pub active: bool,
    pub progress: f32,
}

impl EnergyWave {
    pub fn new(handle: EntityHandle, index: usize) -> Self {
        Self {
            handle,
            initial_scale: ENERGY_WAVE_INITIAL_SCALE,
            max_scale: 5.0 + index as f32,
            speed: 0.5 + index as f32 * 0.1,
            active: false,
            progress: 0.0,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.progress = 0.0;
    }

    /// Advance an active wave by one frame. Deactivates once progress reaches 1.
    pub fn step(&mut self) {
        if !self.active {
            return;
        }
        self.progress += self.speed * ENERGY_WAVE_PROGRESS_RATE;
        if self.progress >= 1.0 {
            self.active = false;
        }
    }

    pub fn scale(&self) -> f32 {
        self.initial_scale + (self.max_scale - self.initial_scale) * self.progress
    }

    pub fn opacity(&self) -> f32 {
        ENERGY_WAVE_MAX_OPACITY * (1.0 - self.progress).max(0.0)
    }
}

#[derive(Default)]
pub struct EnergyWaves {
    pool: Vec<EnergyWave>,
}

impl EnergyWaves {
    pub fn pool(&self) -> &[EnergyWave] {
        &self.pool
    }

    pub fn active_count(&self) -> usize {
        self.pool.iter().filter(|w| w.active).count()
    }

    /// Wake the first idle wave with a fresh hue. No-op when the pool is busy.
    fn fire(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let Some(wave) = self.pool.iter_mut().find(|w| !w.active) else {
            log::debug!("[waves] pool of {} busy", self.pool.len());
            return Ok(());
        };
        wave.activate();
        let hue: f32 = ctx.rng.gen();
        let scale = wave.initial_scale;
        ctx.registry
            .update_transform(wave.handle, |tr| tr.scale = Vec3::splat(scale))?;
        ctx.registry.set_visible(wave.handle, true)?;
        ctx.registry
            .set_scalar(wave.handle, MaterialKey::Opacity, ENERGY_WAVE_MAX_OPACITY)?;
        ctx.registry
            .set_color(wave.handle, MaterialKey::Color, hsl(hue, 0.8, 0.5))?;
        ctx.registry
            .set_color(wave.handle, MaterialKey::Emissive, hsl(hue, 0.9, 0.3))
    }
}

impl Animator for EnergyWaves {
    fn name(&self) -> &'static str {
        "waves"
    }

    fn setup(&mut self, ctx: &mut AnimContext) -> Result<(), AnimError> {
        let count = ctx.profile.energy_wave_count;
        for i in 0..count {
            let hue = i as f32 / count as f32;
            let transform = Transform::at(Vec3::new(0.0, 0.1, 0.0))
                .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2))
                .with_uniform_scale(ENERGY_WAVE_INITIAL_SCALE);
            let params = EntityParams::new(transform)
                .with(MaterialKey::Color, MaterialValue::Color(hsl(hue, 0.8, 0.5)))
                .with(MaterialKey::Emissive, MaterialValue::Color(hsl(hue, 0.9, 0.3)))
                .with(MaterialKey::Opacity, MaterialValue::Scalar(ENERGY_WAVE_MAX_OPACITY))
                .with(MaterialKey::Visible, MaterialValue::Flag(false));
            let handle = ctx.registry.spawn(ctx.sink, Family::EnergyWave, params);
            self.pool.push(EnergyWave::new(handle, i));
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AnimContext, _signals: &FrameSignals) -> Result<(), AnimError> {
        for wave in self.pool.iter_mut().filter(|w| w.active) {
            wave.step();
            if wave.active {
                let scale = wave.scale();
                ctx.registry
                    .update_transform(wave.handle, |tr| tr.scale = Vec3::splat(scale))?;
                ctx.registry
                    .set_scalar(wave.handle, MaterialKey::Opacity, wave.opacity())?;
            } else {
                ctx.registry.set_visible(wave.handle, false)?;
            }
        }
        Ok(())
    }

    fn on_trigger(&mut self, ctx: &mut AnimContext, trigger: Trigger) -> Result<(), AnimError> {
        match trigger {
            Trigger::Click => self.fire(ctx),
        }
    }

    fn handles(&self) -> Vec<EntityHandle> {
        self.pool.iter().map(|w| w.handle).collect()
    }

    fn reset(&mut self) {
        self.pool.clear();
    }
}
