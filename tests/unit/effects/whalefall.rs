use super::*;
use crate::text::typeset::BlockTypesetter;

fn cloth() -> (Textile, Viewport) {
    let vp = Viewport::new(200, 120).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 7, 0);
    let mut t = Textile::default();
    t.reset(&mut ctx);
    (t, vp)
}

#[test]
fn hanging_cloth_keeps_its_threads() {
    let (mut t, vp) = cloth();
    let links = t.link_count();
    assert!(links > 0);
    let pointer = PointerState::new(vp);
    for i in 0..120 {
        t.step(&Tick::nth(i), &pointer);
    }
    assert_eq!(t.link_count(), links);
    assert!(t.knots.iter().filter(|k| k.pinned).all(|k| k.pos == k.prev));
}

#[test]
fn secondary_press_cuts_threads() {
    let (mut t, vp) = cloth();
    let links = t.link_count();
    let mut pointer = PointerState::new(vp);
    let down = PointerEvent::Down {
        x: 100.0,
        y: 20.0,
        button: PointerButton::Secondary,
    };
    pointer.apply(&down);
    t.pointer(&down, &pointer);
    assert_eq!(t.mode(), Mode::Tear);
    assert_eq!(t.status().as_deref(), Some("DECONSTRUCT"));

    for i in 0..5 {
        t.step(&Tick::nth(i), &pointer);
    }
    assert!(t.link_count() < links);
    assert_eq!(t.blade, Some(Point::new(100.0, 20.0)));
}

#[test]
fn primary_drag_does_not_tear() {
    let (mut t, vp) = cloth();
    let links = t.link_count();
    let mut pointer = PointerState::new(vp);
    let down = PointerEvent::Down {
        x: 100.0,
        y: 20.0,
        button: PointerButton::Primary,
    };
    pointer.apply(&down);
    t.pointer(&down, &pointer);
    t.step(&Tick::nth(0), &pointer);
    assert_eq!(t.mode(), Mode::Weave);
    assert_eq!(t.link_count(), links);
}
