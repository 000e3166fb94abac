use super::*;
use crate::text::typeset::BlockTypesetter;

fn pile() -> (Gravity, Viewport) {
    let vp = Viewport::new(800, 400).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 5, 0);
    let mut g = Gravity::default();
    g.reset(&mut ctx);
    (g, vp)
}

fn mean_distance(g: &Gravity, to: Point) -> f64 {
    g.bodies.iter().map(|b| (b.pos - to).hypot()).sum::<f64>() / g.bodies.len() as f64
}

#[test]
fn words_start_above_the_screen() {
    let (g, _) = pile();
    assert_eq!(g.bodies.len(), GRAVITY_WORDS.len());
    assert!(g.bodies.iter().all(|b| b.pos.y <= -100.0 && b.mass > 0.0));
}

#[test]
fn words_fall_and_come_to_rest_on_the_floor() {
    let (mut g, vp) = pile();
    let pointer = PointerState::new(vp);
    for i in 0..900 {
        g.step(&Tick::nth(i), &pointer);
    }
    let floor = vp.h() - FLOOR - BODY_H / 2.0;
    assert!(g.bodies.iter().all(|b| b.pos.y <= floor + 1e-9));
    assert!(g.bodies.iter().all(|b| b.pos.x >= b.width / 2.0 - 1e-9));
    assert!(g.resting() > 0);
}

#[test]
fn holding_pulls_words_toward_the_well() {
    let (mut g, vp) = pile();
    let mut pointer = PointerState::new(vp);
    for i in 0..300 {
        g.step(&Tick::nth(i), &pointer);
    }
    let well = Point::new(400.0, 200.0);
    let before = mean_distance(&g, well);
    pointer.apply(&PointerEvent::Down {
        x: well.x,
        y: well.y,
        button: Default::default(),
    });
    for i in 300..360 {
        g.step(&Tick::nth(i), &pointer);
    }
    assert!(mean_distance(&g, well) < before);
}

#[test]
fn release_scatters_nearby_words() {
    let (mut g, vp) = pile();
    let mut pointer = PointerState::new(vp);
    for i in 0..900 {
        g.step(&Tick::nth(i), &pointer);
    }
    let blast = Point::new(400.0, 340.0);
    let up = PointerEvent::Up {
        x: blast.x,
        y: blast.y,
    };
    pointer.apply(&up);
    g.pointer(&up, &pointer);
    let near: Vec<&Body> = g
        .bodies
        .iter()
        .filter(|b| (b.pos - blast).hypot() < 300.0)
        .collect();
    assert!(!near.is_empty());
    assert!(near.iter().all(|b| (b.pos - blast).dot(b.vel) > 0.0));
}

#[test]
fn the_well_is_drawn_only_while_held() {
    let (mut g, vp) = pile();
    let mut pointer = PointerState::new(vp);
    g.step(&Tick::nth(0), &pointer);
    let mut painter = Painter::new(vp);
    g.draw(&mut painter);
    let idle = painter.finish().op_count();

    pointer.apply(&PointerEvent::Down {
        x: 10.0,
        y: 10.0,
        button: Default::default(),
    });
    g.step(&Tick::nth(1), &pointer);
    let mut painter = Painter::new(vp);
    g.draw(&mut painter);
    assert_eq!(painter.finish().op_count(), idle + 2);
}
