use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn sand() -> (Temporal, Viewport) {
    let vp = Viewport::new(640, 360).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 3, 0);
    let mut t = Temporal::default();
    t.reset(&mut ctx);
    (t, vp)
}

#[test]
fn title_is_sampled_into_grains_on_the_z_plane() {
    let (t, _) = sand();
    assert!(t.grain_count() > 100);
    assert!(t.grains.iter().all(|g| g.home.z == 0.0 && g.pos == g.home));
    assert!(t.grains.iter().all(|g| (0.015..0.045).contains(&g.spring)));
    let widest = t.grains.iter().map(|g| g.home.x.abs()).fold(0.0, f64::max);
    assert!(widest < t.world_w * 0.5);
}

#[test]
fn pointer_scatters_grains_that_then_settle_home() {
    let (mut t, vp) = sand();
    let near = 0;
    let (at, _) = t.camera.project(t.grains[near].home, vp).unwrap();
    let mut pointer = PointerState::new(vp);
    pointer.apply(&PointerEvent::Move {
        x: at.x + 3.0,
        y: at.y,
    });
    t.step(&Tick::nth(0), &pointer);
    assert!(t.grains[near].vel.length() > 0.1);

    pointer.apply(&PointerEvent::Leave);
    for i in 1..400 {
        t.step(&Tick::nth(i), &pointer);
    }
    assert!(t.grains[near].vel.length() < 0.5);
}

#[test]
fn pendulum_swings_across_the_title() {
    let (t, _) = sand();
    let left = t.pendulum(-std::f64::consts::PI);
    let right = t.pendulum(std::f64::consts::PI);
    assert!(left.x < 0.0 && right.x > 0.0);
    assert!((t.pendulum(0.0).y - 0.0).abs() < 1e-9);
}

#[test]
fn shards_are_batched_by_shade() {
    let (t, vp) = sand();
    let mut painter = Painter::new(vp);
    t.draw(&mut painter);
    assert!(painter.finish().op_count() <= 1 + SHADES);
}
