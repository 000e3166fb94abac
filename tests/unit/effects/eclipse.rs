use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn stage() -> (Eclipse, Viewport) {
    let vp = Viewport::new(400, 300).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 5, 0);
    let mut e = Eclipse::default();
    e.reset(&mut ctx);
    (e, vp)
}

#[test]
fn grid_of_twelve_words() {
    let (e, vp) = stage();
    assert_eq!(e.blocks.len(), COLS * ROWS);
    assert_eq!(e.dust.len(), DUST);
    assert_eq!(e.light, vp.center());
    assert!(e.blocks.iter().all(|b| b.half.x > 0.0));
}

#[test]
fn light_pushes_words_away_and_springs_hold_them() {
    let (mut e, vp) = stage();
    let origin = e.blocks[0].origin;
    let mut pointer = PointerState::new(vp);
    pointer.apply(&PointerEvent::Move {
        x: origin.x - 20.0,
        y: origin.y,
    });
    for i in 0..5 {
        e.step(&Tick::nth(i), &pointer);
    }
    assert!(e.blocks[0].pos.x > origin.x);
    for i in 5..400 {
        e.step(&Tick::nth(i), &pointer);
    }
    // Push and spring balance well short of the push radius.
    let offset = (e.blocks[0].pos - origin).hypot();
    assert!(offset > 1.0 && offset < PUSH_RADIUS);
}

#[test]
fn shadow_extends_away_from_the_light() {
    let (e, _) = stage();
    let b = &e.blocks[0];
    let light = b.pos - Vec2::new(1000.0, 0.0);
    let bounds = kurbo::Shape::bounding_box(&b.shadow(light));
    assert!(bounds.x1 > b.pos.x + 1000.0);
    assert!(bounds.x0 >= b.pos.x - b.half.x - 1e-6);
}
