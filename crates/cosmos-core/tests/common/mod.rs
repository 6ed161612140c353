// Shared fixtures for host-side tests: a recording render sink and a scriptable audio backend.

#![allow(dead_code)]

use cosmos_core::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
pub struct RecordingSink {
    next: u32,
    pub live: HashMap<EntityHandle, Family>,
    pub created: usize,
    pub removed: usize,
    pub transforms: usize,
    pub params: Vec<(EntityHandle, MaterialKey, MaterialValue)>,
    pub uniforms: Vec<(Family, MaterialKey, MaterialValue)>,
    pub renders: usize,
}

impl RecordingSink {
    pub fn live_count(&self, family: Family) -> usize {
        self.live.values().filter(|f| **f == family).count()
    }

    pub fn clear_log(&mut self) {
        self.transforms = 0;
        self.params.clear();
        self.uniforms.clear();
    }
}

impl RenderSink for RecordingSink {
    fn create_entity(&mut self, family: Family, _params: &EntityParams) -> EntityHandle {
        self.next += 1;
        let handle = EntityHandle(self.next);
        self.live.insert(handle, family);
        self.created += 1;
        handle
    }

    fn set_transform(&mut self, _handle: EntityHandle, _transform: &Transform) {
        self.transforms += 1;
    }

    fn set_material_param(
        &mut self,
        handle: EntityHandle,
        key: MaterialKey,
        value: &MaterialValue,
    ) {
        self.params.push((handle, key, value.clone()));
    }

    fn set_family_uniform(&mut self, family: Family, key: MaterialKey, value: &MaterialValue) {
        self.uniforms.push((family, key, value.clone()));
    }

    fn remove_entity(&mut self, handle: EntityHandle) {
        if self.live.remove(&handle).is_some() {
            self.removed += 1;
        }
    }

    fn request_render(&mut self) {
        self.renders += 1;
    }
}

#[derive(Default)]
pub struct FakeAudioState {
    pub decibels: Vec<f32>,
    pub playing: bool,
    pub suspended: bool,
    pub closed: bool,
    pub reject_play: bool,
    pub resumes: usize,
}

/// Audio backend whose state the test keeps a handle to after boxing it.
#[derive(Clone)]
pub struct FakeAudio(pub Rc<RefCell<FakeAudioState>>);

impl FakeAudio {
    pub fn new(bins: usize) -> Self {
        Self(Rc::new(RefCell::new(FakeAudioState {
            decibels: vec![-100.0; bins],
            ..Default::default()
        })))
    }

    /// Fill every bin with the dB value that normalizes to `level`.
    pub fn set_level(&self, level: f32) {
        let db = level * 100.0 - 100.0;
        self.0.borrow_mut().decibels.iter_mut().for_each(|v| *v = db);
    }

    /// Bass third at `bass`, everything else silent.
    pub fn set_bass(&self, bass: f32) {
        let mut s = self.0.borrow_mut();
        let third = s.decibels.len() / 3;
        for (i, v) in s.decibels.iter_mut().enumerate() {
            *v = if i < third { bass * 100.0 - 100.0 } else { -100.0 };
        }
    }
}

impl SpectrumSource for FakeAudio {
    fn bin_count(&self) -> usize {
        self.0.borrow().decibels.len()
    }

    fn read_decibels(&mut self, out: &mut [f32]) {
        let s = self.0.borrow();
        for (o, v) in out.iter_mut().zip(s.decibels.iter()) {
            *o = *v;
        }
    }
}

impl AudioBackend for FakeAudio {
    fn play(&mut self) -> Result<(), AudioError> {
        let mut s = self.0.borrow_mut();
        if s.reject_play {
            return Err(AudioError::PlaybackRejected("autoplay blocked".into()));
        }
        s.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.0.borrow_mut().playing = false;
    }

    fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        let mut s = self.0.borrow_mut();
        s.suspended = false;
        s.resumes += 1;
        Ok(())
    }

    fn suspend(&mut self) {
        self.0.borrow_mut().suspended = true;
    }

    fn is_suspended(&self) -> bool {
        self.0.borrow().suspended
    }

    fn close(&mut self) {
        let mut s = self.0.borrow_mut();
        s.closed = true;
        s.playing = false;
    }
}

pub fn signals<'a>(spectrum: &'a SpectrumFrame, elapsed_sec: f64, beat: bool) -> FrameSignals<'a> {
    FrameSignals {
        spectrum,
        bands: aggregate(spectrum),
        beat: BeatState {
            last_beat_sec: if beat { elapsed_sec } else { f64::NEG_INFINITY },
            is_beat: beat,
        },
        elapsed_sec,
        delta_phase: 1.0,
        frame_index: 0,
        pointer: Pointer::default(),
        audio_active: true,
    }
}
