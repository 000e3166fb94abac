use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn page() -> (Pendulum, Viewport) {
    let vp = Viewport::new(600, 400).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 11, 0);
    let mut p = Pendulum::default();
    p.reset(&mut ctx);
    (p, vp)
}

#[test]
fn rope_hangs_from_the_centre_and_text_rests_in_place() {
    let (p, _) = page();
    assert_eq!(p.rope.len(), SEGMENTS);
    assert!(p.rope.iter().all(|r| r.x == 300.0));
    assert!(!p.particles.is_empty());
    assert!(p.particles.iter().all(|q| q.pos == q.origin));
}

#[test]
fn rope_stays_attached_at_the_pivot() {
    let (mut p, vp) = page();
    let pointer = PointerState::new(vp);
    for i in 0..200 {
        p.step(&Tick::nth(i), &pointer);
        assert_eq!(p.rope[0], Point::new(p.pivot_x, PIVOT_Y));
    }
    for w in p.rope.windows(2) {
        assert!((w[1] - w[0]).hypot() < SEGMENT_LENGTH * 3.0);
    }
}

#[test]
fn pivot_follows_the_pointer() {
    let (mut p, vp) = page();
    let mut pointer = PointerState::new(vp);
    pointer.apply(&PointerEvent::Move { x: 500.0, y: 200.0 });
    for i in 0..200 {
        p.step(&Tick::nth(i), &pointer);
    }
    assert!((p.pivot_x - 500.0).abs() < 1.0);
}

#[test]
fn swinging_rope_scatters_the_text() {
    let (mut p, vp) = page();
    let pointer = PointerState::new(vp);
    for i in 0..300 {
        p.step(&Tick::nth(i), &pointer);
    }
    assert!(p.particles.iter().any(|q| (q.pos - q.origin).hypot() > 1.0));
}
