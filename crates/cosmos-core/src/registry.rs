//! Entity registry: handle -> entity state, owned by the frame orchestrator.
//!
//! Animators mutate entities through the registry, which records which
//! transforms and material parameters changed. `flush` then pushes only the
//! changes to the render sink, once per frame.

use crate::error::AnimError;
use fnv::FnvHashMap;
use glam::{Quat, Vec3};
use smallvec::SmallVec;

/// Opaque handle issued by the render sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Star,
    Crystal,
    Asteroid,
    BeltCore,
    Wormhole,
    RingSegment,
    Bar,
    BurstParticle,
    EnergyWave,
    LightningBolt,
    SoundPlane,
    Ship,
    ThrusterParticle,
    Skybox,
    Light,
}

impl Family {
    pub const ALL: [Family; 15] = [
        Family::Star,
        Family::Crystal,
        Family::Asteroid,
        Family::BeltCore,
        Family::Wormhole,
        Family::RingSegment,
        Family::Bar,
        Family::BurstParticle,
        Family::EnergyWave,
        Family::LightningBolt,
        Family::SoundPlane,
        Family::Ship,
        Family::ThrusterParticle,
        Family::Skybox,
        Family::Light,
    ];

    /// Families whose instances are created and removed while the scene runs.
    pub fn is_transient(self) -> bool {
        matches!(self, Family::LightningBolt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKey {
    Color = 0,
    Emissive,
    EmissiveIntensity,
    Opacity,
    PointSize,
    Visible,
    LightIntensity,
    PulseIntensity,
    Time,
    SecondaryColor,
    LowColor,
    Amplitude,
    Samples,
    AudioIntensity,
}

impl MaterialKey {
    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MaterialValue {
    Scalar(f32),
    Color(Vec3),
    Flag(bool),
    Samples(Vec<f32>),
}

impl MaterialValue {
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            MaterialValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Vec3> {
        match self {
            MaterialValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            MaterialValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            MaterialValue::Scalar(v) => v.is_finite(),
            MaterialValue::Color(c) => c.is_finite(),
            MaterialValue::Flag(_) => true,
            MaterialValue::Samples(s) => s.iter().all(|v| v.is_finite()),
        }
    }
}

type Params = SmallVec<[(MaterialKey, MaterialValue); 4]>;

/// Initial state handed to the sink when an entity is created.
#[derive(Clone, Debug, Default)]
pub struct EntityParams {
    pub transform: Transform,
    pub params: Params,
}

impl EntityParams {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            params: Params::new(),
        }
    }

    pub fn with(mut self, key: MaterialKey, value: MaterialValue) -> Self {
        upsert(&mut self.params, key, value);
        self
    }

    pub fn param(&self, key: MaterialKey) -> Option<&MaterialValue> {
        lookup(&self.params, key)
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    family: Family,
    transform: Transform,
    params: Params,
    dirty_transform: bool,
    dirty_params: u16,
}

impl Entity {
    pub fn family(&self) -> Family {
        self.family
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn param(&self, key: MaterialKey) -> Option<&MaterialValue> {
        lookup(&self.params, key)
    }

    pub fn scalar(&self, key: MaterialKey) -> Option<f32> {
        self.param(key).and_then(MaterialValue::as_scalar)
    }

    pub fn color(&self, key: MaterialKey) -> Option<Vec3> {
        self.param(key).and_then(MaterialValue::as_color)
    }

    pub fn flag(&self, key: MaterialKey) -> Option<bool> {
        self.param(key).and_then(MaterialValue::as_flag)
    }

    fn is_dirty(&self) -> bool {
        self.dirty_transform || self.dirty_params != 0
    }
}

/// Render-side collaborator that owns the actual drawable objects.
pub trait RenderSink {
    fn create_entity(&mut self, family: Family, params: &EntityParams) -> EntityHandle;
    fn set_transform(&mut self, handle: EntityHandle, transform: &Transform);
    fn set_material_param(&mut self, handle: EntityHandle, key: MaterialKey, value: &MaterialValue);
    /// Shader-global value shared by every entity of a family.
    fn set_family_uniform(&mut self, family: Family, key: MaterialKey, value: &MaterialValue);
    fn remove_entity(&mut self, handle: EntityHandle);
    fn request_render(&mut self);
}

#[derive(Default)]
pub struct EntityRegistry {
    entities: FnvHashMap<EntityHandle, Entity>,
    counts: FnvHashMap<Family, usize>,
    dirty: Vec<EntityHandle>,
    uniforms: Vec<(Family, MaterialKey, MaterialValue)>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        sink: &mut dyn RenderSink,
        family: Family,
        params: EntityParams,
    ) -> EntityHandle {
        let handle = sink.create_entity(family, &params);
        let entity = Entity {
            family,
            transform: params.transform,
            params: params.params,
            dirty_transform: false,
            dirty_params: 0,
        };
        if self.entities.insert(handle, entity).is_some() {
            log::warn!("[registry] sink reissued live handle {:?}", handle);
        } else {
            *self.counts.entry(family).or_insert(0) += 1;
        }
        handle
    }

    pub fn despawn(&mut self, sink: &mut dyn RenderSink, handle: EntityHandle) -> bool {
        match self.entities.remove(&handle) {
            Some(e) => {
                if let Some(c) = self.counts.get_mut(&e.family) {
                    *c = c.saturating_sub(1);
                }
                sink.remove_entity(handle);
                true
            }
            None => false,
        }
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(&handle)
    }

    pub fn contains(&self, handle: EntityHandle) -> bool {
        self.entities.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn count(&self, family: Family) -> usize {
        self.counts.get(&family).copied().unwrap_or(0)
    }

    /// Live handles of one family, in no particular order.
    pub fn handles_of(&self, family: Family) -> Vec<EntityHandle> {
        self.entities
            .iter()
            .filter(|(_, e)| e.family == family)
            .map(|(h, _)| *h)
            .collect()
    }

    pub fn transform(&self, handle: EntityHandle) -> Result<Transform, AnimError> {
        self.entities
            .get(&handle)
            .map(|e| e.transform)
            .ok_or(AnimError::MissingEntity(handle))
    }

    pub fn set_transform(
        &mut self,
        handle: EntityHandle,
        transform: Transform,
    ) -> Result<(), AnimError> {
        if !(transform.position.is_finite()
            && transform.scale.is_finite()
            && transform.rotation.is_finite())
        {
            return Err(AnimError::NonFinite("transform"));
        }
        let e = self
            .entities
            .get_mut(&handle)
            .ok_or(AnimError::MissingEntity(handle))?;
        if e.transform == transform {
            return Ok(());
        }
        let was_dirty = e.is_dirty();
        e.transform = transform;
        e.dirty_transform = true;
        if !was_dirty {
            self.dirty.push(handle);
        }
        Ok(())
    }

    /// Read-modify-write a transform.
    pub fn update_transform(
        &mut self,
        handle: EntityHandle,
        f: impl FnOnce(&mut Transform),
    ) -> Result<(), AnimError> {
        let mut t = self.transform(handle)?;
        f(&mut t);
        self.set_transform(handle, t)
    }

    pub fn set_param(
        &mut self,
        handle: EntityHandle,
        key: MaterialKey,
        value: MaterialValue,
    ) -> Result<(), AnimError> {
        if !value.is_finite() {
            return Err(AnimError::NonFinite("material parameter"));
        }
        let e = self
            .entities
            .get_mut(&handle)
            .ok_or(AnimError::MissingEntity(handle))?;
        if lookup(&e.params, key) == Some(&value) {
            return Ok(());
        }
        let was_dirty = e.is_dirty();
        upsert(&mut e.params, key, value);
        e.dirty_params |= key.bit();
        if !was_dirty {
            self.dirty.push(handle);
        }
        Ok(())
    }

    pub fn set_scalar(
        &mut self,
        handle: EntityHandle,
        key: MaterialKey,
        v: f32,
    ) -> Result<(), AnimError> {
        self.set_param(handle, key, MaterialValue::Scalar(v))
    }

    pub fn set_color(
        &mut self,
        handle: EntityHandle,
        key: MaterialKey,
        c: Vec3,
    ) -> Result<(), AnimError> {
        self.set_param(handle, key, MaterialValue::Color(c))
    }

    pub fn set_visible(&mut self, handle: EntityHandle, visible: bool) -> Result<(), AnimError> {
        self.set_param(handle, MaterialKey::Visible, MaterialValue::Flag(visible))
    }

    pub fn set_uniform(&mut self, family: Family, key: MaterialKey, value: MaterialValue) {
        if let Some(slot) = self
            .uniforms
            .iter_mut()
            .find(|(f, k, _)| *f == family && *k == key)
        {
            slot.2 = value;
        } else {
            self.uniforms.push((family, key, value));
        }
    }

    /// Push all pending changes to the sink. Returns the number of entities touched.
    pub fn flush(&mut self, sink: &mut dyn RenderSink) -> usize {
        let mut touched = 0;
        for handle in self.dirty.drain(..) {
            let Some(e) = self.entities.get_mut(&handle) else {
                continue;
            };
            if !e.is_dirty() {
                continue;
            }
            if e.dirty_transform {
                sink.set_transform(handle, &e.transform);
            }
            if e.dirty_params != 0 {
                for (key, value) in e.params.iter() {
                    if e.dirty_params & key.bit() != 0 {
                        sink.set_material_param(handle, *key, value);
                    }
                }
            }
            e.dirty_transform = false;
            e.dirty_params = 0;
            touched += 1;
        }
        for (family, key, value) in self.uniforms.drain(..) {
            sink.set_family_uniform(family, key, &value);
        }
        touched
    }

    /// Remove every entity. Used at teardown.
    pub fn clear(&mut self, sink: &mut dyn RenderSink) {
        let mut handles: Vec<EntityHandle> = self.entities.keys().copied().collect();
        handles.sort();
        for h in handles {
            sink.remove_entity(h);
        }
        self.entities.clear();
        self.counts.clear();
        self.dirty.clear();
        self.uniforms.clear();
    }
}

fn lookup(params: &Params, key: MaterialKey) -> Option<&MaterialValue> {
    params.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
}

fn upsert(params: &mut Params, key: MaterialKey, value: MaterialValue) {
    if let Some(slot) = params.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        params.push((key, value));
    }
}
