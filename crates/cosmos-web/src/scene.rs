//! CPU side of the sprite renderer.
//!
//! `SceneStore` keeps the latest state the entity registry pushed for every
//! handle and packs it into camera-facing sprite instances once per frame.
//! It has no GPU or DOM dependency, so the packing rules are host-testable.

use crate::constants::*;
use cosmos_core::animators::sound_plane::sample_elevation;
use cosmos_core::{EntityHandle, EntityParams, Family, MaterialKey, MaterialValue, Transform};
use fnv::FnvHashMap;
use glam::{Vec3, Vec4};

pub const SHAPE_DISC: f32 = 0.0;
pub const SHAPE_SQUARE: f32 = 1.0;
pub const SHAPE_RING: f32 = 2.0;
pub const SHAPE_DIAMOND: f32 = 3.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    pub pos: [f32; 3],
    pub glow: f32,
    pub color: [f32; 4],
    pub extent: [f32; 2],
    pub shape: f32,
    pub _pad: f32,
}

impl SpriteInstance {
    fn new(pos: Vec3, color: Vec3, alpha: f32, extent: [f32; 2], shape: f32, glow: f32) -> Self {
        Self {
            pos: pos.to_array(),
            glow,
            color: Vec4::from((color, alpha.clamp(0.0, 1.0))).to_array(),
            extent,
            shape,
            _pad: 0.0,
        }
    }
}

// Back to front, roughly: sky-facing sheets first, particles last.
const DRAW_ORDER: [Family; 14] = [
    Family::SoundPlane,
    Family::Star,
    Family::Wormhole,
    Family::BeltCore,
    Family::Asteroid,
    Family::RingSegment,
    Family::Bar,
    Family::Crystal,
    Family::EnergyWave,
    Family::Light,
    Family::LightningBolt,
    Family::BurstParticle,
    Family::Ship,
    Family::ThrusterParticle,
];

#[derive(Clone, Debug)]
struct Record {
    family: Family,
    /// Position in the family's member list.
    slot: usize,
    transform: Transform,
    color: Vec3,
    emissive: Vec3,
    emissive_intensity: f32,
    secondary: Option<Vec3>,
    low: Vec3,
    opacity: f32,
    size: f32,
    visible: bool,
    light: f32,
    pulse: f32,
    amplitude: f32,
    samples: Vec<f32>,
}

impl Record {
    fn new(family: Family, slot: usize, params: &EntityParams) -> Self {
        let mut r = Self {
            family,
            slot,
            transform: params.transform,
            color: Vec3::ONE,
            emissive: Vec3::ZERO,
            emissive_intensity: 1.0,
            secondary: None,
            low: Vec3::ZERO,
            opacity: 1.0,
            size: 1.0,
            visible: true,
            light: 0.0,
            pulse: 0.0,
            amplitude: 0.0,
            samples: Vec::new(),
        };
        for (key, value) in params.params.iter() {
            r.apply(*key, value);
        }
        r
    }

    fn apply(&mut self, key: MaterialKey, value: &MaterialValue) {
        match (key, value) {
            (MaterialKey::Color, MaterialValue::Color(c)) => self.color = *c,
            (MaterialKey::Emissive, MaterialValue::Color(c)) => self.emissive = *c,
            (MaterialKey::SecondaryColor, MaterialValue::Color(c)) => self.secondary = Some(*c),
            (MaterialKey::LowColor, MaterialValue::Color(c)) => self.low = *c,
            (MaterialKey::EmissiveIntensity, MaterialValue::Scalar(v)) => {
                self.emissive_intensity = *v
            }
            (MaterialKey::Opacity, MaterialValue::Scalar(v)) => self.opacity = *v,
            (MaterialKey::PointSize, MaterialValue::Scalar(v)) => self.size = *v,
            (MaterialKey::LightIntensity, MaterialValue::Scalar(v)) => self.light = *v,
            (MaterialKey::PulseIntensity, MaterialValue::Scalar(v)) => self.pulse = *v,
            (MaterialKey::Amplitude, MaterialValue::Scalar(v)) => self.amplitude = *v,
            (MaterialKey::Visible, MaterialValue::Flag(b)) => self.visible = *b,
            (MaterialKey::Samples, MaterialValue::Samples(s)) => self.samples.clone_from(s),
            (key, value) => log::debug!("[scene] ignoring {:?} = {:?}", key, value),
        }
    }

    /// Surface colour plus emission, the way a lit material reads on screen.
    fn tint(&self) -> Vec3 {
        self.color + self.emissive * self.emissive_intensity.max(0.0)
    }
}

#[derive(Default)]
pub struct SceneStore {
    next: u32,
    records: FnvHashMap<EntityHandle, Record>,
    members: FnvHashMap<Family, Vec<EntityHandle>>,
    uniforms: FnvHashMap<(Family, MaterialKey), MaterialValue>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, family: Family) -> usize {
        self.members.get(&family).map_or(0, Vec::len)
    }

    pub fn create(&mut self, family: Family, params: &EntityParams) -> EntityHandle {
        self.next += 1;
        let handle = EntityHandle(self.next);
        let list = self.members.entry(family).or_default();
        self.records.insert(handle, Record::new(family, list.len(), params));
        list.push(handle);
        handle
    }

    pub fn set_transform(&mut self, handle: EntityHandle, transform: &Transform) {
        if let Some(r) = self.records.get_mut(&handle) {
            r.transform = *transform;
        }
    }

    pub fn set_param(&mut self, handle: EntityHandle, key: MaterialKey, value: &MaterialValue) {
        if let Some(r) = self.records.get_mut(&handle) {
            r.apply(key, value);
        }
    }

    pub fn set_uniform(&mut self, family: Family, key: MaterialKey, value: &MaterialValue) {
        self.uniforms.insert((family, key), value.clone());
    }

    pub fn remove(&mut self, handle: EntityHandle) {
        let Some(r) = self.records.remove(&handle) else {
            return;
        };
        let Some(list) = self.members.get_mut(&r.family) else {
            return;
        };
        if r.slot >= list.len() || list[r.slot] != handle {
            log::warn!("[scene] {:?} missing from its family list", handle);
            return;
        }
        list.swap_remove(r.slot);
        // The former last member now sits in the freed slot.
        if let Some(moved) = list.get(r.slot) {
            if let Some(m) = self.records.get_mut(moved) {
                m.slot = r.slot;
            }
        }
    }

    fn uniform(&self, family: Family, key: MaterialKey) -> f32 {
        self.uniforms
            .get(&(family, key))
            .and_then(MaterialValue::as_scalar)
            .unwrap_or(0.0)
    }

    /// Background colour: the skybox tint over black.
    pub fn clear_color(&self) -> [f64; 3] {
        let sky = self
            .members
            .get(&Family::Skybox)
            .and_then(|list| list.first())
            .and_then(|h| self.records.get(h));
        match sky {
            Some(r) if r.visible => {
                let c = r.color * r.opacity.clamp(0.0, 1.0);
                [c.x as f64, c.y as f64, c.z as f64]
            }
            _ => CLEAR_COLOR,
        }
    }

    /// Rebuild the sprite list for this frame.
    pub fn pack(&self, out: &mut Vec<SpriteInstance>) {
        out.clear();
        for family in DRAW_ORDER {
            let Some(list) = self.members.get(&family) else {
                continue;
            };
            for handle in list {
                let Some(r) = self.records.get(handle) else {
                    continue;
                };
                if r.visible {
                    self.emit(r, out);
                }
            }
        }
    }

    fn emit(&self, r: &Record, out: &mut Vec<SpriteInstance>) {
        let t = &r.transform;
        let pos = t.position;
        match r.family {
            Family::Star => {
                let audio = self.uniform(Family::Star, MaterialKey::AudioIntensity);
                let s = r.size * STAR_SPRITE_SCALE * (1.0 + audio);
                out.push(SpriteInstance::new(pos, r.color, 1.0, [s, s], SHAPE_DISC, audio));
            }
            Family::BurstParticle | Family::ThrusterParticle => {
                let s = r.size * PARTICLE_SPRITE_SCALE;
                out.push(SpriteInstance::new(pos, r.color, r.opacity, [s, s], SHAPE_DISC, 0.5));
            }
            Family::Crystal => {
                let s = t.scale.x * CRYSTAL_SPRITE_SCALE;
                let glow = r.emissive_intensity * r.emissive.length().min(1.0);
                out.push(SpriteInstance::new(pos, r.tint(), 0.9, [s, s], SHAPE_DIAMOND, glow));
            }
            Family::Asteroid => {
                let s = t.scale.x * ASTEROID_SPRITE_SCALE;
                out.push(SpriteInstance::new(pos, r.color, 1.0, [s, s], SHAPE_DIAMOND, 0.0));
            }
            Family::BeltCore => {
                let s = t.scale.x * 2.0;
                let glow = r.emissive_intensity * 0.2;
                out.push(SpriteInstance::new(pos, r.tint(), r.opacity, [s, s], SHAPE_DISC, glow));
            }
            Family::RingSegment | Family::EnergyWave => {
                let s = t.scale.x * 2.0;
                let glow = r.emissive_intensity * 0.1;
                out.push(SpriteInstance::new(pos, r.tint(), r.opacity, [s, s], SHAPE_RING, glow));
            }
            Family::Wormhole => {
                let time = self.uniform(Family::Wormhole, MaterialKey::Time);
                let mix = (0.5 + 0.5 * (time * 2.0).sin()) * r.pulse.max(0.25);
                let color = r.secondary.map_or(r.color, |s| r.color.lerp(s, mix));
                let s = t.scale.x * WORMHOLE_SPRITE_EXTENT;
                out.push(SpriteInstance::new(pos, color, r.opacity, [s, s], SHAPE_RING, r.pulse));
            }
            Family::Bar => {
                let extent = [BAR_SPRITE_WIDTH * t.scale.x, t.scale.y];
                out.push(SpriteInstance::new(pos, r.tint(), r.opacity, extent, SHAPE_SQUARE, 0.0));
            }
            Family::Light => {
                let s = LIGHT_SPRITE_BASE + r.light * LIGHT_SPRITE_PER_INTENSITY;
                let alpha = LIGHT_SPRITE_ALPHA;
                out.push(SpriteInstance::new(pos, r.color, alpha, [s, s], SHAPE_DISC, 1.0));
            }
            Family::Ship => {
                let s = t.scale.x * SHIP_SPRITE_SCALE;
                let hull = Vec3::splat(0.85);
                out.push(SpriteInstance::new(pos, hull, 1.0, [s, s * 0.5], SHAPE_DIAMOND, 0.0));
            }
            Family::LightningBolt => emit_bolt(r, out),
            Family::SoundPlane => {
                let time = self.uniform(Family::SoundPlane, MaterialKey::Time);
                emit_plane(r, time, out)
            }
            Family::Skybox => {}
        }
    }
}

fn emit_bolt(r: &Record, out: &mut Vec<SpriteInstance>) {
    let points: Vec<Vec3> = r
        .samples
        .chunks_exact(3)
        .map(|p| r.transform.position + Vec3::new(p[0], p[1], p[2]))
        .collect();
    for pair in points.windows(2) {
        for k in 0..LIGHTNING_SPRITES_PER_SEGMENT {
            let f = k as f32 / LIGHTNING_SPRITES_PER_SEGMENT as f32;
            let p = pair[0].lerp(pair[1], f);
            let s = [LIGHTNING_SPRITE, LIGHTNING_SPRITE];
            out.push(SpriteInstance::new(p, r.color, r.opacity, s, SHAPE_DISC, 1.0));
        }
    }
}

fn emit_plane(r: &Record, time: f32, out: &mut Vec<SpriteInstance>) {
    let amplitude = r.amplitude.max(1e-3);
    let high = r.secondary.unwrap_or(r.color);
    let s = [SOUND_PLANE_SPRITE, SOUND_PLANE_SPRITE];
    for gy in 0..SOUND_PLANE_GRID_Y {
        let v = gy as f32 / (SOUND_PLANE_GRID_Y - 1) as f32 * 2.0 - 1.0;
        for gx in 0..SOUND_PLANE_GRID_X {
            let u = gx as f32 / (SOUND_PLANE_GRID_X - 1) as f32 * 2.0 - 1.0;
            let elevation = sample_elevation(&r.samples, r.amplitude, u, v, time);
            let local = Vec3::new(
                u * SOUND_PLANE_HALF_WIDTH,
                v * SOUND_PLANE_HALF_DEPTH,
                elevation,
            );
            let world = r.transform.position + r.transform.rotation * local;
            let k = (elevation / amplitude).clamp(0.0, 1.0);
            let color = if k < 0.5 {
                r.low.lerp(r.color, k * 2.0)
            } else {
                r.color.lerp(high, (k - 0.5) * 2.0)
            };
            out.push(SpriteInstance::new(world, color, r.opacity, s, SHAPE_SQUARE, k));
        }
    }
}
