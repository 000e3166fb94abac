use super::*;
use crate::foundation::core::Viewport;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn web() -> (Thread, Viewport) {
    let vp = Viewport::new(800, 600).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 21, 0);
    let mut t = Thread::default();
    t.reset(&mut ctx);
    (t, vp)
}

#[test]
fn knots_sit_on_a_staggered_grid_inside_the_margin() {
    let (t, vp) = web();
    // 10 columns by 8 rows, minus the skipped knots.
    assert!(t.knots.len() > 40 && t.knots.len() <= 80);
    for k in &t.knots {
        assert!(k.origin.x >= MARGIN && k.origin.x < vp.w() - MARGIN + SPACING / 2.0);
        assert!(k.displacement() <= 20.0_f64.hypot(20.0) / 2.0 + 1e-9);
    }
    assert_eq!(t.knots[0].word, "WEB");
}

#[test]
fn pointer_strains_the_web_and_it_settles_back() {
    let (mut t, vp) = web();
    let mut pointer = PointerState::new(vp);
    pointer.apply(&PointerEvent::Move { x: 400.0, y: 300.0 });
    for i in 0..30 {
        t.step(&Tick::nth(i), &pointer);
    }
    assert!(t.strained() > 0);

    pointer.apply(&PointerEvent::Leave);
    for i in 30..400 {
        t.step(&Tick::nth(i), &pointer);
    }
    assert_eq!(t.strained(), 0);
    assert!(t.knots.iter().all(|k| k.displacement() <= SWAY + 0.5));
}

#[test]
fn thread_colour_follows_tension() {
    let relaxed = Thread::thread_color(10.0, 0.5);
    assert_eq!(relaxed, Color::rgba(200, 200, 200, 0.5));
    let taut = Thread::thread_color(TENSION + 100.0, 0.5);
    assert_eq!(taut, Color::rgba(220, 20, 60, 0.6));
}
