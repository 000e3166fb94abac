use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn crt() -> (Signal, Viewport) {
    let vp = Viewport::new(480, 320).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 6, 0);
    let mut s = Signal::default();
    s.reset(&mut ctx);
    (s, vp)
}

#[test]
fn rows_cover_the_screen() {
    let (s, vp) = crt();
    assert_eq!(s.rows.len(), 10);
    assert!(s.rows.last().unwrap().y >= vp.h());
}

#[test]
fn pointer_row_tears_with_rgb_split() {
    let (mut s, vp) = crt();
    let mut pointer = PointerState::new(vp);
    let y = s.rows[3].y;
    pointer.apply(&PointerEvent::Move { x: 100.0, y });
    s.step(&Tick::nth(0), &pointer);
    assert!(s.rows[3].split > 19.0);
    assert!(s.torn() >= 1);

    let mut painter = Painter::new(vp);
    s.draw(&mut painter);
    let scene = painter.finish();
    assert!(scene.passes.iter().any(|p| p.spec.composite == Composite::Screen));
}

#[test]
fn scrolling_wraps_within_one_line_width() {
    let (mut s, vp) = crt();
    let pointer = PointerState::new(vp);
    for i in 0..2000 {
        s.step(&Tick::nth(i), &pointer);
        assert!(s.rows.iter().all(|r| r.offset <= 0.0 && r.offset >= -r.width));
    }
}
