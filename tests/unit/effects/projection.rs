use super::*;

fn vp() -> Viewport {
    Viewport::new(800, 400).unwrap()
}

#[test]
fn world_viewport_matches_the_field_of_view() {
    let (w, h) = Camera::default().world_viewport(2.0);
    let expected = 2.0 * 30.0 * (17.5f64).to_radians().tan();
    assert!((h - expected).abs() < 1e-9);
    assert!((w - expected * 2.0).abs() < 1e-9);
}

#[test]
fn origin_projects_to_the_centre_at_unit_scale() {
    let (p, scale) = Camera::default().project(DVec3::ZERO, vp()).unwrap();
    assert!((p.x - 400.0).abs() < 1e-9 && (p.y - 200.0).abs() < 1e-9);
    assert!((scale - 1.0).abs() < 1e-9);
}

#[test]
fn nearer_points_are_larger_and_up_is_up() {
    let cam = Camera::default();
    let (_, near) = cam.project(DVec3::new(0.0, 0.0, 10.0), vp()).unwrap();
    assert!((near - 1.5).abs() < 1e-9);
    let (above, _) = cam.project(DVec3::new(0.0, 1.0, 0.0), vp()).unwrap();
    assert!(above.y < 200.0);
}

#[test]
fn points_behind_the_camera_are_culled() {
    assert!(Camera::default().project(DVec3::new(0.0, 0.0, 40.0), vp()).is_none());
}

#[test]
fn pointer_maps_back_onto_the_projection() {
    let cam = Camera::default();
    let world = cam.pointer_to_world(Point::new(600.0, 100.0), vp());
    assert_eq!(world.z, 0.0);
    let (p, _) = cam.project(world, vp()).unwrap();
    assert!((p.x - 600.0).abs() < 1e-6 && (p.y - 100.0).abs() < 1e-6);
}
