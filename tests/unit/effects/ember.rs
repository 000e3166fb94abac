use super::*;
use crate::foundation::core::Viewport;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn ember() -> Ember {
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(Viewport::new(320, 200).unwrap(), &mut ts, 7, 0);
    let mut e = Ember::default();
    e.reset(&mut ctx);
    e
}

#[test]
fn grid_skips_spaces() {
    let e = ember();
    assert!(e.alive() > 100);
    assert!(e.cinders.iter().all(|c| c.ch != ' '));
}

#[test]
fn burnt_glyphs_never_return() {
    let mut e = ember();
    let target = e.cinders[40].pos;
    let mut pointer = PointerState::new(Viewport::new(320, 200).unwrap());
    pointer.apply(&PointerEvent::Move {
        x: target.x,
        y: target.y,
    });
    for i in 0..10 {
        e.step(&Tick::nth(i), &pointer);
    }
    assert_ne!(e.cinders[40].phase, Phase::Stable);

    pointer.apply(&PointerEvent::Leave);
    for i in 10..400 {
        e.step(&Tick::nth(i), &pointer);
    }
    let c = &e.cinders[40];
    assert_eq!(c.phase, Phase::Ash);
    assert!(c.life <= 0.0);
    assert!(e.alive() < e.cinders.len());
}

#[test]
fn untouched_heat_cools() {
    let mut e = ember();
    e.cinders[0].heat = 0.4;
    let pointer = PointerState::new(Viewport::new(320, 200).unwrap());
    e.step(&Tick::nth(0), &pointer);
    assert!((e.cinders[0].heat - 0.39).abs() < 1e-9);
}
