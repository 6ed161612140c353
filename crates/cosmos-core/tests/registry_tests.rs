// Host-side tests for the entity registry and its flush to the render sink.

mod common;

use common::RecordingSink;
use cosmos_core::*;
use glam::Vec3;

fn spawn_star(reg: &mut EntityRegistry, sink: &mut RecordingSink) -> EntityHandle {
    let params = EntityParams::new(Transform::at(Vec3::new(1.0, 2.0, 3.0)))
        .with(MaterialKey::PointSize, MaterialValue::Scalar(2.0));
    reg.spawn(sink, Family::Star, params)
}

#[test]
fn spawn_tracks_counts_per_family() {
    let mut sink = RecordingSink::default();
    let mut reg = EntityRegistry::new();
    let a = spawn_star(&mut reg, &mut sink);
    let _b = spawn_star(&mut reg, &mut sink);
    reg.spawn(&mut sink, Family::Bar, EntityParams::default());

    assert_eq!(reg.len(), 3);
    assert_eq!(reg.count(Family::Star), 2);
    assert_eq!(reg.count(Family::Bar), 1);
    assert_eq!(reg.count(Family::Crystal), 0);
    assert_eq!(reg.entity(a).map(|e| e.family()), Some(Family::Star));
    assert_eq!(reg.entity(a).and_then(|e| e.scalar(MaterialKey::PointSize)), Some(2.0));
}

#[test]
fn flush_pushes_only_changes() {
    let mut sink = RecordingSink::default();
    let mut reg = EntityRegistry::new();
    let a = spawn_star(&mut reg, &mut sink);
    let b = spawn_star(&mut reg, &mut sink);

    assert_eq!(reg.flush(&mut sink), 0);

    reg.update_transform(a, |t| t.position.x += 1.0).unwrap();
    reg.set_scalar(a, MaterialKey::Opacity, 0.5).unwrap();
    // Unchanged value is not a change.
    reg.set_scalar(b, MaterialKey::PointSize, 2.0).unwrap();

    assert_eq!(reg.flush(&mut sink), 1);
    assert_eq!(sink.transforms, 1);
    assert_eq!(sink.params.len(), 1);
    assert_eq!(sink.params[0].0, a);
    assert_eq!(sink.params[0].1, MaterialKey::Opacity);

    sink.clear_log();
    assert_eq!(reg.flush(&mut sink), 0);
    assert_eq!(sink.transforms, 0);
}

#[test]
fn non_finite_values_are_rejected() {
    let mut sink = RecordingSink::default();
    let mut reg = EntityRegistry::new();
    let a = spawn_star(&mut reg, &mut sink);

    let err = reg
        .update_transform(a, |t| t.position.y = f32::NAN)
        .unwrap_err();
    assert_eq!(err, AnimError::NonFinite("transform"));
    assert!(reg.set_scalar(a, MaterialKey::Opacity, f32::INFINITY).is_err());
    assert_eq!(reg.transform(a).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn missing_handles_are_errors() {
    let mut reg = EntityRegistry::new();
    let ghost = EntityHandle(99);
    assert_eq!(
        reg.set_visible(ghost, true),
        Err(AnimError::MissingEntity(ghost))
    );
    assert!(reg.transform(ghost).is_err());
}

#[test]
fn despawn_removes_from_sink_and_counts() {
    let mut sink = RecordingSink::default();
    let mut reg = EntityRegistry::new();
    let a = spawn_star(&mut reg, &mut sink);
    reg.set_scalar(a, MaterialKey::Opacity, 0.1).unwrap();

    assert!(reg.despawn(&mut sink, a));
    assert!(!reg.despawn(&mut sink, a));
    assert_eq!(reg.count(Family::Star), 0);
    assert_eq!(sink.removed, 1);
    // A dirty entry for a removed entity is skipped.
    assert_eq!(reg.flush(&mut sink), 0);
    assert!(sink.params.is_empty());
}

#[test]
fn uniforms_are_coalesced_per_frame() {
    let mut sink = RecordingSink::default();
    let mut reg = EntityRegistry::new();
    reg.set_uniform(Family::Star, MaterialKey::Time, MaterialValue::Scalar(1.0));
    reg.set_uniform(Family::Star, MaterialKey::Time, MaterialValue::Scalar(2.0));
    reg.set_uniform(Family::Star, MaterialKey::AudioIntensity, MaterialValue::Scalar(0.4));
    reg.flush(&mut sink);

    assert_eq!(sink.uniforms.len(), 2);
    assert_eq!(
        sink.uniforms[0],
        (Family::Star, MaterialKey::Time, MaterialValue::Scalar(2.0))
    );
    sink.clear_log();
    reg.flush(&mut sink);
    assert!(sink.uniforms.is_empty());
}

#[test]
fn clear_removes_everything() {
    let mut sink = RecordingSink::default();
    let mut reg = EntityRegistry::new();
    for _ in 0..5 {
        spawn_star(&mut reg, &mut sink);
    }
    reg.clear(&mut sink);
    assert!(reg.is_empty());
    assert!(sink.live.is_empty());
    assert_eq!(reg.count(Family::Star), 0);
}
