use super::*;
use crate::foundation::core::Viewport;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn grid() -> (Kinetic, Viewport) {
    let vp = Viewport::new(300, 200).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 1, 0);
    let mut k = Kinetic::default();
    k.reset(&mut ctx);
    (k, vp)
}

#[test]
fn grid_fills_the_viewport() {
    let (k, _) = grid();
    assert_eq!(k.cells.len(), 10 * 10);
    assert_eq!(k.cells[0].word, "FUTURE");
    assert_eq!(k.base_size, 10.0);
}

#[test]
fn pointer_pushes_and_magnifies_nearby_words() {
    let (mut k, vp) = grid();
    let i = 55;
    let origin = k.cells[i].origin;
    let mut pointer = PointerState::new(vp);
    pointer.apply(&PointerEvent::Move {
        x: origin.x - 30.0,
        y: origin.y,
    });
    for t in 0..120 {
        k.step(&Tick::nth(t), &pointer);
    }
    assert!(k.cells[i].pos.x > origin.x + 20.0);
    assert!(k.cells[i].stretch > 2.0);
    assert!(k.cells[0].stretch < 1.6);
}

#[test]
fn idle_grid_only_breathes() {
    let (mut k, vp) = grid();
    let pointer = PointerState::new(vp);
    for t in 0..300 {
        k.step(&Tick::nth(t), &pointer);
    }
    assert!(k.cells.iter().all(|c| (c.pos - c.origin).hypot() <= 3.0 + 1e-9));
    assert!(k.cells.iter().all(|c| (c.stretch - 1.0).abs() < 1e-9));
}
