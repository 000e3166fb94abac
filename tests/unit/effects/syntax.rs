use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn syntax() -> (Syntax, Viewport) {
    let vp = Viewport::new(800, 600).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 3, 0);
    let mut s = Syntax::default();
    s.reset(&mut ctx);
    (s, vp)
}

#[test]
fn letters_start_seated_on_their_wires() {
    let (s, _) = syntax();
    assert_eq!(s.wires.len(), WIRE_COUNT);
    assert!(!s.notes.is_empty());
    for n in &s.notes {
        let (home, _, _) = s.wires[n.wire].sample(n.t);
        assert_eq!(n.pos, home);
    }
    assert_eq!(s.floating(), 0);
}

#[test]
fn sweeping_across_a_wire_releases_letters() {
    let (mut s, vp) = syntax();
    let target = s.notes[3].pos;
    let mut pointer = PointerState::new(vp);
    for i in 0..40 {
        let dy = if i % 2 == 0 { -30.0 } else { 30.0 };
        pointer.apply(&PointerEvent::Move {
            x: target.x,
            y: target.y + dy,
        });
        s.step(&Tick::nth(i), &pointer);
        pointer.settle();
    }
    assert!(s.floating() > 0);

    pointer.apply(&PointerEvent::Leave);
    for i in 40..600 {
        s.step(&Tick::nth(i), &pointer);
    }
    assert!(s.notes.iter().all(|n| n.pos.is_finite() && n.vel.is_finite()));
    assert!(s.wires.iter().all(|w| w.points[0].dy == 0.0));
}
