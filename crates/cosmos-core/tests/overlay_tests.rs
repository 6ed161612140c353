// Host-side tests for the 2D overlay layout, colour helpers and scene camera.

use cosmos_core::color::hsl;
use cosmos_core::*;
use glam::Vec3;

#[test]
fn overlay_spans_the_canvas() {
    let frame = SpectrumFrame::from_normalized(vec![0.5; 256]);
    let bars = overlay_bars(&frame, 512.0, 100.0, None);
    assert_eq!(bars.len(), 256);
    assert_eq!(bars[0].x, 0.0);
    assert_eq!(bars[0].width, 2.0);
    let last = bars.last().unwrap();
    assert!((last.x + last.width - 512.0).abs() < 1e-3);
    assert!(bars.iter().all(|b| (b.height - 50.0).abs() < 1e-4));
}

#[test]
fn overlay_cap_limits_bar_count() {
    let frame = SpectrumFrame::from_normalized(vec![1.0; 256]);
    assert_eq!(overlay_bars(&frame, 640.0, 80.0, Some(64)).len(), 64);
    let short = SpectrumFrame::from_normalized(vec![1.0; 16]);
    assert_eq!(overlay_bars(&short, 640.0, 80.0, Some(64)).len(), 16);
    assert!(overlay_bars(&SpectrumFrame::silent(0), 640.0, 80.0, None).is_empty());
}

#[test]
fn overlay_hues_follow_frequency_thirds() {
    assert_eq!(overlay_hue(0, 90), 0.0);
    assert!((overlay_hue(15, 90) - 15.0).abs() < 1e-4);
    assert!((overlay_hue(30, 90) - 30.0).abs() < 1e-4);
    assert!((overlay_hue(45, 90) - 75.0).abs() < 1e-4);
    assert!((overlay_hue(60, 90) - 180.0).abs() < 1e-4);
    assert!((overlay_hue(89, 90) - 238.0).abs() < 1e-3);
}

#[test]
fn hsl_primaries() {
    let red = hsl(0.0, 1.0, 0.5);
    assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    let green = hsl(1.0 / 3.0, 1.0, 0.5);
    assert!((green - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    // Hue wraps.
    let wrapped = hsl(1.0 + 2.0 / 3.0, 1.0, 0.5);
    assert!((wrapped - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    assert_eq!(hsl(0.4, 0.0, 0.3), Vec3::splat(0.3));
}

#[test]
fn pointer_maps_client_coordinates_to_ndc() {
    let p = Pointer::from_client(0.0, 0.0, 800.0, 600.0);
    assert_eq!((p.x, p.y), (-1.0, 1.0));
    let c = Pointer::from_client(400.0, 300.0, 800.0, 600.0);
    assert!(c.x.abs() < 1e-6 && c.y.abs() < 1e-6);
}

#[test]
fn scene_camera_projects_target_to_centre() {
    let cam = Camera::scene(16.0 / 9.0);
    let clip = cam.view_proj() * cam.target.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    assert!((0.0..1.0).contains(&ndc.z));
}
