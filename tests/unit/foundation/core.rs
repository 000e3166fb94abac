use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30000, 1001).unwrap();
    assert!((fps.as_f64() - 29.97).abs() < 0.01);
    assert!((fps.frames_to_secs(30) - 1.001).abs() < 1e-9);
}

#[test]
fn viewport_bounds_are_validated() {
    assert!(Viewport::new(0, 10).is_err());
    assert!(Viewport::new(10, MAX_VIEWPORT_EDGE + 1).is_err());
    let vp = Viewport::new(640, 480).unwrap();
    assert!(vp.is_compact());
    assert_eq!(vp.center(), Point::new(320.0, 240.0));
    assert!(vp.contains(Point::new(0.0, 0.0)));
    assert!(!vp.contains(Point::new(640.0, 10.0)));
}

#[test]
fn default_viewport_is_720p() {
    let vp = Viewport::default();
    assert_eq!((vp.width, vp.height), (1280, 720));
    assert!(Viewport::new(vp.width, vp.height).is_ok());
    assert!(!vp.is_compact());
}

#[test]
fn premul_from_straight_scales_channels() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
