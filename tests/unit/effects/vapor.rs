use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn window() -> (Vapor, Viewport) {
    let vp = Viewport::new(400, 300).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 13, 0);
    let mut v = Vapor::default();
    v.reset(&mut ctx);
    (v, vp)
}

#[test]
fn rain_falls_and_wraps_to_the_top() {
    let (mut v, vp) = window();
    assert_eq!(v.bokeh.len(), BOKEH);
    assert_eq!(v.drops.len(), DROPS);
    let pointer = PointerState::new(vp);
    for i in 0..400 {
        v.step(&Tick::nth(i), &pointer);
        assert!(v.drops.iter().all(|d| d.pos.y <= vp.h()));
    }
}

#[test]
fn static_layers_are_primed_once() {
    let (v, vp) = window();
    let mut painter = Painter::new(vp);
    v.draw(&mut painter);
    let scene = painter.finish();
    let primed: Vec<Target> = scene
        .passes
        .iter()
        .filter(|p| p.spec.prime)
        .map(|p| p.spec.target)
        .collect();
    assert_eq!(
        primed,
        [Target::Offscreen(SHARP), Target::Offscreen(BLURRED), Target::Offscreen(FOG)]
    );
    assert!(scene.passes.iter().any(|p| p.spec.blur == FOG_BLUR as f32));
}

#[test]
fn pointer_wipes_the_fog() {
    let (mut v, vp) = window();
    let mut pointer = PointerState::new(vp);
    let draw = |v: &Vapor| {
        let mut painter = Painter::new(vp);
        v.draw(&mut painter);
        painter.finish()
    };
    v.step(&Tick::nth(0), &pointer);
    let dry = draw(&v);
    pointer.apply(&PointerEvent::Move { x: 200.0, y: 150.0 });
    v.step(&Tick::nth(1), &pointer);
    let wiped = draw(&v);
    let erase_ops = |s: &crate::scene::display::Scene| {
        s.passes
            .iter()
            .filter(|p| p.spec.composite == Composite::DestinationOut)
            .map(|p| p.ops.len())
            .sum::<usize>()
    };
    assert_eq!(erase_ops(&wiped), erase_ops(&dry) + 1);
}
