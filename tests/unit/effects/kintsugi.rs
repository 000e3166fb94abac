use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn card() -> (Kintsugi, Viewport) {
    let vp = Viewport::new(600, 500).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 8, 0);
    let mut k = Kintsugi::default();
    k.reset(&mut ctx);
    (k, vp)
}

fn area(t: &[Point; 3]) -> f64 {
    ((t[1] - t[0]).cross(t[2] - t[0]) / 2.0).abs()
}

#[test]
fn shards_tile_the_whole_card() {
    let mut rng = EffectRng::new(4);
    let tris = shatter(600.0, 500.0, &mut rng);
    assert_eq!(tris.len(), COLS * ROWS * 2);
    let total: f64 = tris.iter().map(area).sum();
    assert!((total - 600.0 * 500.0).abs() < 1e-6);
}

#[test]
fn shards_start_broken_away_from_home() {
    let (k, _) = card();
    for s in &k.shards {
        let off = (s.pos - s.home).hypot();
        assert!((50.0..150.0).contains(&off));
        assert!(s.angle.abs() <= 0.25 && s.healed == 0.0);
    }
}

#[test]
fn brushing_heals_shards_back_into_place() {
    let (mut k, vp) = card();
    let mut pointer = PointerState::new(vp);
    let target = k.shards[10].pos;
    pointer.apply(&PointerEvent::Move {
        x: target.x,
        y: target.y,
    });
    for i in 0..200 {
        k.step(&Tick::nth(i), &pointer);
    }
    let s = &k.shards[10];
    assert_eq!(s.healed, 1.0);
    assert!((s.pos - s.home).hypot() < 1.0);
    assert!(s.angle.abs() < 0.01);
    assert!(k.mended() >= 1);
    assert_eq!(k.trail.len(), TRAIL_LEN);
}

#[test]
fn untouched_shards_keep_drifting() {
    let (mut k, vp) = card();
    let pointer = PointerState::new(vp);
    let before: Vec<Point> = k.shards.iter().map(|s| s.pos).collect();
    for i in 0..10 {
        k.step(&Tick::nth(i), &pointer);
    }
    assert_eq!(k.mended(), 0);
    assert!(k.shards.iter().zip(&before).any(|(s, b)| s.pos != *b));
    assert!(k.trail.is_empty());
}

#[test]
fn card_is_primed_and_clipped_per_shard() {
    let (k, vp) = card();
    let mut painter = Painter::new(vp);
    k.draw(&mut painter);
    let scene = painter.finish();
    assert!(scene.passes[0].spec.prime);
    assert_eq!(scene.passes[0].spec.target, Target::Offscreen(CARD));
    let clips = scene
        .passes
        .iter()
        .flat_map(|p| &p.ops)
        .filter(|op| matches!(op, crate::scene::display::DrawOp::Clip { .. }))
        .count();
    assert_eq!(clips, COLS * ROWS * 2);
}
