// Host-side tests for the sprite scene store the WebGPU renderer draws from.

use cosmos_core::animators::sound_plane::sample_elevation;
use cosmos_core::*;
use cosmos_web::constants::*;
use cosmos_web::scene::*;
use glam::{Quat, Vec3};

/// Render sink that only records into a scene store, like the browser renderer minus the GPU.
#[derive(Default)]
struct StoreSink {
    store: SceneStore,
    sprites: Vec<SpriteInstance>,
    renders: usize,
}

impl RenderSink for StoreSink {
    fn create_entity(&mut self, family: Family, params: &EntityParams) -> EntityHandle {
        self.store.create(family, params)
    }

    fn set_transform(&mut self, handle: EntityHandle, transform: &Transform) {
        self.store.set_transform(handle, transform);
    }

    fn set_material_param(
        &mut self,
        handle: EntityHandle,
        key: MaterialKey,
        value: &MaterialValue,
    ) {
        self.store.set_param(handle, key, value);
    }

    fn set_family_uniform(&mut self, family: Family, key: MaterialKey, value: &MaterialValue) {
        self.store.set_uniform(family, key, value);
    }

    fn remove_entity(&mut self, handle: EntityHandle) {
        self.store.remove(handle);
    }

    fn request_render(&mut self) {
        self.store.pack(&mut self.sprites);
        self.renders += 1;
    }
}

fn packed(store: &SceneStore) -> Vec<SpriteInstance> {
    let mut out = Vec::new();
    store.pack(&mut out);
    out
}

#[test]
fn create_and_remove_track_families() {
    let mut store = SceneStore::new();
    let a = store.create(Family::Star, &EntityParams::default());
    let b = store.create(Family::Star, &EntityParams::default());
    assert_ne!(a, b);
    assert_eq!(store.count(Family::Star), 2);
    store.remove(a);
    store.remove(a);
    assert_eq!(store.count(Family::Star), 1);
    assert_eq!(store.len(), 1);
}

#[test]
fn removal_out_of_order_keeps_the_rest_drawn() {
    let mut store = SceneStore::new();
    let handles: Vec<EntityHandle> = (0..5)
        .map(|i| {
            let params = EntityParams::new(Transform::at(Vec3::new(i as f32, 0.0, 0.0)));
            store.create(Family::Star, &params)
        })
        .collect();
    store.remove(handles[1]);
    store.remove(handles[4]);
    store.remove(handles[0]);
    store.remove(handles[0]);

    let mut xs: Vec<f32> = packed(&store).iter().map(|s| s.pos[0]).collect();
    xs.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(xs, vec![2.0, 3.0]);
    assert_eq!(store.count(Family::Star), 2);

    store.remove(handles[3]);
    store.remove(handles[2]);
    assert!(store.is_empty());
    assert_eq!(store.count(Family::Star), 0);
}

#[test]
fn tearing_down_a_full_starfield_empties_the_store() {
    let mut store = SceneStore::new();
    let handles: Vec<EntityHandle> = (0..10_000)
        .map(|_| store.create(Family::Star, &EntityParams::default()))
        .collect();
    for h in handles.iter().step_by(2).chain(handles.iter().skip(1).step_by(2)) {
        store.remove(*h);
    }
    assert!(store.is_empty());
    assert!(packed(&store).is_empty());
}

#[test]
fn hidden_entities_are_not_drawn() {
    let mut store = SceneStore::new();
    let params = EntityParams::new(Transform::at(Vec3::ONE))
        .with(MaterialKey::Visible, MaterialValue::Flag(false));
    let h = store.create(Family::BurstParticle, &params);
    assert!(packed(&store).is_empty());

    store.set_param(h, MaterialKey::Visible, &MaterialValue::Flag(true));
    let sprites = packed(&store);
    assert_eq!(sprites.len(), 1);
    assert_eq!(sprites[0].pos, [1.0, 1.0, 1.0]);
}

#[test]
fn bars_stretch_with_their_height() {
    let mut store = SceneStore::new();
    let mut t = Transform::at(Vec3::new(0.0, 1.5, 0.0));
    t.scale = Vec3::new(1.0, 3.0, 1.0);
    store.create(Family::Bar, &EntityParams::new(t));
    let sprites = packed(&store);
    assert_eq!(sprites[0].extent, [BAR_SPRITE_WIDTH, 3.0]);
    assert_eq!(sprites[0].shape, SHAPE_SQUARE);
}

#[test]
fn star_sprites_grow_with_audio_intensity() {
    let mut store = SceneStore::new();
    let params = EntityParams::default().with(MaterialKey::PointSize, MaterialValue::Scalar(2.0));
    store.create(Family::Star, &params);
    let quiet = packed(&store)[0].extent[0];

    store.set_uniform(Family::Star, MaterialKey::AudioIntensity, &MaterialValue::Scalar(1.0));
    let loud = packed(&store)[0].extent[0];
    assert!((quiet - 2.0 * STAR_SPRITE_SCALE).abs() < 1e-6);
    assert!((loud - 2.0 * quiet).abs() < 1e-6);
}

#[test]
fn lightning_path_is_drawn_segment_by_segment() {
    let mut store = SceneStore::new();
    let path = vec![0.0, 10.0, 0.0, 1.0, 0.0, 0.0, 0.0, -10.0, 0.0];
    let params = EntityParams::default()
        .with(MaterialKey::Samples, MaterialValue::Samples(path))
        .with(MaterialKey::Opacity, MaterialValue::Scalar(0.4));
    store.create(Family::LightningBolt, &params);
    let sprites = packed(&store);
    assert_eq!(sprites.len(), 2 * LIGHTNING_SPRITES_PER_SEGMENT);
    assert_eq!(sprites[0].pos, [0.0, 10.0, 0.0]);
    assert!(sprites.iter().all(|s| (s.color[3] - 0.4).abs() < 1e-6));
}

#[test]
fn sound_plane_is_a_displaced_grid() {
    let mut store = SceneStore::new();
    let transform = Transform::at(Vec3::new(0.0, -15.0, 0.0))
        .with_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2));
    let samples = vec![1.0; 128];
    let params = EntityParams::new(transform)
        .with(MaterialKey::Samples, MaterialValue::Samples(samples.clone()))
        .with(MaterialKey::Amplitude, MaterialValue::Scalar(2.0));
    store.create(Family::SoundPlane, &params);
    store.set_uniform(Family::SoundPlane, MaterialKey::Time, &MaterialValue::Scalar(0.0));

    let sprites = packed(&store);
    assert_eq!(sprites.len(), SOUND_PLANE_GRID_X * SOUND_PLANE_GRID_Y);
    // First sprite sits at the (-1, -1) corner; elevation rises along world +y.
    let expected = -15.0 + sample_elevation(&samples, 2.0, -1.0, -1.0, 0.0);
    assert!((sprites[0].pos[1] - expected).abs() < 1e-4);
    assert!((sprites[0].pos[0] + SOUND_PLANE_HALF_WIDTH).abs() < 1e-4);
}

#[test]
fn skybox_sets_the_clear_colour() {
    let mut store = SceneStore::new();
    assert_eq!(store.clear_color(), CLEAR_COLOR);
    let params = EntityParams::default()
        .with(MaterialKey::Color, MaterialValue::Color(Vec3::new(0.5, 0.2, 1.0)))
        .with(MaterialKey::Opacity, MaterialValue::Scalar(0.5));
    let sky = store.create(Family::Skybox, &params);
    let c = store.clear_color();
    assert!((c[0] - 0.25).abs() < 1e-6 && (c[2] - 0.5).abs() < 1e-6);
    // The skybox itself is never a sprite.
    assert!(packed(&store).is_empty());
    store.remove(sky);
    assert_eq!(store.clear_color(), CLEAR_COLOR);
}

#[test]
fn full_scene_packs_finite_sprites() {
    let mut orch = FrameOrchestrator::new(resolve(DeviceClass::Desktop), StoreSink::default(), 9)
        .unwrap();
    orch.mark_asset_ready(Asset::ShipModel);
    orch.trigger(Trigger::Click);
    for _ in 0..10 {
        orch.frame(1.0 / 60.0);
    }
    let sink = orch.sink();
    assert_eq!(sink.renders, 10);
    assert_eq!(sink.store.len(), orch.registry().len());
    assert!(sink.sprites.len() >= orch.profile().star_count);
    assert!(sink
        .sprites
        .iter()
        .all(|s| s.pos.iter().chain(s.color.iter()).all(|v| v.is_finite())));

    orch.teardown();
    assert!(orch.sink().store.is_empty());
    // The frame loop ends on this report.
    assert!(orch.frame(1.0 / 60.0).stopped);
}
