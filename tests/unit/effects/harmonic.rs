use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn tube() -> (Harmonic, Viewport) {
    let vp = Viewport::new(640, 360).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 2, 0);
    let mut h = Harmonic::default();
    h.reset(&mut ctx);
    (h, vp)
}

#[test]
fn spiral_spans_the_tube_front_to_back() {
    let (h, _) = tube();
    assert_eq!(h.motes.len(), COUNT);
    let first = h.motes.first().unwrap();
    let last = h.motes.last().unwrap();
    assert_eq!(first.base_z, -LENGTH / 2.0);
    assert!(last.base_z < LENGTH / 2.0 && last.base_z > LENGTH / 2.0 - 0.1);
    assert!(h.motes.iter().all(|m| (3.0..5.0).contains(&m.radius) && m.bucket < BUCKETS));
    assert!(!h.narrow);
}

#[test]
fn heartbeat_stays_near_unity() {
    for i in 0..600 {
        let b = heartbeat(i as f64 / 60.0);
        assert!((0.85..=1.15).contains(&b));
    }
    assert_eq!(heartbeat(0.0), 1.0);
}

#[test]
fn pointer_pulls_and_lights_motes() {
    let (mut h, vp) = tube();
    let mut pointer = PointerState::new(vp);
    h.step(&Tick::nth(0), &pointer);
    assert_eq!(h.excited(), 0);
    assert!(h.status().is_none());

    pointer.apply(&PointerEvent::Move { x: 320.0, y: 180.0 });
    h.step(&Tick::nth(1), &pointer);
    assert!(h.excited() > 0);
    assert_eq!(h.status().as_deref(), Some("RESONATING"));
    assert!(h.motes.iter().filter(|m| m.lit).all(|m| m.size >= 2.0 * 0.85));
}

#[test]
fn camera_sways_around_the_origin() {
    let (mut h, vp) = tube();
    let pointer = PointerState::new(vp);
    h.step(&Tick::nth(600), &pointer);
    let p = h.camera.position;
    assert!((p.x - 1.0f64.sin() * 2.0).abs() < 1e-9);
    assert!((p.y - 1.5f64.cos() * 2.0).abs() < 1e-9);
    assert_eq!(h.camera.target, DVec3::ZERO);
}

#[test]
fn fog_fades_with_distance() {
    assert_eq!(fog(5.0), 0.0);
    assert_eq!(fog(30.0), 0.5);
    assert_eq!(fog(80.0), 1.0);
}

#[test]
fn motes_glow_additively_under_the_titles() {
    let (mut h, vp) = tube();
    h.step(&Tick::nth(0), &PointerState::new(vp));
    let mut painter = Painter::new(vp);
    h.draw(&mut painter);
    let scene = painter.finish();
    let additive: Vec<_> = scene
        .passes
        .iter()
        .filter(|p| p.spec.composite == Composite::Lighter)
        .collect();
    assert!(additive.iter().any(|p| p.spec.blur > 0.0 && !p.ops.is_empty()));
    assert!(additive.iter().any(|p| p.spec.blur == 0.0 && !p.ops.is_empty()));
    let titles: Vec<&str> = scene.texts().map(|t| t.text.as_str()).collect();
    assert_eq!(titles, ["Resonance", "THE UNIVERSE BREATHES WITH YOU"]);
}
