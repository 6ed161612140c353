//! Device classification and the fixed per-session quality profile.
//!
//! The profile is resolved once at startup and never re-evaluated; every
//! device-dependent choice in the scene reads it instead of branching on the
//! device class directly.

use crate::constants::{
    FFT_SIZE_DESKTOP, FFT_SIZE_MOBILE, MOBILE_MAX_VIEWPORT_WIDTH, MOBILE_UA_PATTERNS,
};
use rand::Rng;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// Mobile if the viewport is narrow or the user agent looks like a phone/tablet.
    pub fn classify(viewport_width: u32, user_agent: &str) -> Self {
        if viewport_width <= MOBILE_MAX_VIEWPORT_WIDTH {
            return DeviceClass::Mobile;
        }
        let ua = user_agent.to_ascii_lowercase();
        if MOBILE_UA_PATTERNS.iter().any(|p| ua.contains(p)) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mobile" | "low" => Some(DeviceClass::Mobile),
            "desktop" | "high" => Some(DeviceClass::Desktop),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QualityProfile {
    pub device_class: DeviceClass,
    /// Upper bound for the renderer pixel ratio.
    pub pixel_density: f32,
    pub fft_size: u32,

    // Populations
    pub star_count: usize,
    pub crystal_count: usize,
    pub bar_count: usize,
    pub belt_count: usize,
    pub asteroids_per_belt_min: usize,
    pub asteroids_per_belt_max: usize,
    pub wormhole_count: usize,
    pub thruster_count: usize,
    pub energy_wave_count: usize,
    pub burst_count: usize,
    pub max_lightning: usize,

    // Per-frame budgets and strides
    pub star_updates_per_frame: usize,
    pub thruster_updates_per_frame: usize,
    pub asteroid_stride: u32,
    pub crystal_stride: u32,
    pub overlay_bar_cap: Option<usize>,

    // Feature toggles
    pub use_post_processing: bool,
    pub use_complex_shaders: bool,
    pub use_sound_plane: bool,
    pub use_emissive: bool,
    pub use_lightning: bool,
    pub use_wormhole_pulse: bool,
    pub use_dynamic_lights: bool,
}

/// Pure mapping from device class to profile.
pub fn resolve(class: DeviceClass) -> QualityProfile {
    match class {
        DeviceClass::Mobile => QualityProfile {
            device_class: class,
            pixel_density: 0.5,
            fft_size: FFT_SIZE_MOBILE,
            star_count: 2000,
            crystal_count: 5,
            bar_count: 32,
            belt_count: 1,
            asteroids_per_belt_min: 50,
            asteroids_per_belt_max: 50,
            wormhole_count: 1,
            thruster_count: 50,
            energy_wave_count: 0,
            burst_count: 0,
            max_lightning: 0,
            star_updates_per_frame: 500,
            thruster_updates_per_frame: 10,
            asteroid_stride: 5,
            crystal_stride: 3,
            overlay_bar_cap: Some(64),
            use_post_processing: false,
            use_complex_shaders: false,
            use_sound_plane: false,
            use_emissive: false,
            use_lightning: false,
            use_wormhole_pulse: false,
            use_dynamic_lights: false,
        },
        DeviceClass::Desktop => QualityProfile {
            device_class: class,
            pixel_density: 1.5,
            fft_size: FFT_SIZE_DESKTOP,
            star_count: 10000,
            crystal_count: 15,
            bar_count: 64,
            belt_count: 3,
            asteroids_per_belt_min: 150,
            asteroids_per_belt_max: 250,
            wormhole_count: 3,
            thruster_count: 100,
            energy_wave_count: 5,
            burst_count: 100,
            max_lightning: 8,
            star_updates_per_frame: 2000,
            thruster_updates_per_frame: 100,
            asteroid_stride: 1,
            crystal_stride: 1,
            overlay_bar_cap: None,
            use_post_processing: true,
            use_complex_shaders: true,
            use_sound_plane: true,
            use_emissive: true,
            use_lightning: true,
            use_wormhole_pulse: true,
            use_dynamic_lights: true,
        },
    }
}

impl QualityProfile {
    /// Renderer pixel ratio: the device ratio capped by the profile.
    ///
    /// Mobile always renders at the profile density, trading sharpness for fill rate.
    pub fn pixel_ratio_for(&self, device_pixel_ratio: f32) -> f32 {
        match self.device_class {
            DeviceClass::Mobile => self.pixel_density,
            DeviceClass::Desktop => device_pixel_ratio.min(self.pixel_density).max(0.1),
        }
    }

    /// Analyser bin count for this profile.
    pub fn resolution(&self) -> usize {
        (self.fft_size / 2) as usize
    }

    /// Upper bound on the number of asteroids across all belts.
    pub fn max_asteroids(&self) -> usize {
        self.belt_count * self.asteroids_per_belt_max
    }

    pub fn asteroids_for_belt(&self, rng: &mut impl Rng) -> usize {
        if self.asteroids_per_belt_max <= self.asteroids_per_belt_min {
            return self.asteroids_per_belt_min;
        }
        rng.gen_range(self.asteroids_per_belt_min..self.asteroids_per_belt_max)
    }
}

/// Whether a stride-gated family runs on this frame: `floor(elapsed * 60) % stride == 0`.
#[inline]
pub fn stride_due(elapsed_sec: f64, stride: u32) -> bool {
    if stride <= 1 {
        return true;
    }
    let tick = (elapsed_sec * 60.0).floor() as u64;
    tick % stride as u64 == 0
}

/// Random contiguous window of `budget` items out of `len`.
///
/// Degraded devices update only this window each frame instead of the whole population.
pub fn update_window(len: usize, budget: usize, rng: &mut impl Rng) -> Range<usize> {
    let count = budget.min(len);
    if count == len {
        return 0..len;
    }
    let start = rng.gen_range(0..=len - count);
    start..start + count
}
