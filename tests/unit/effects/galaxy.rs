use super::*;
use crate::input::pointer::PointerEvent;
use crate::text::typeset::BlockTypesetter;

fn disc() -> (Galaxy, Viewport) {
    let vp = Viewport::new(600, 400).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 6, 0);
    let mut g = Galaxy::default();
    g.reset(&mut ctx);
    (g, vp)
}

fn spread(g: &Galaxy, vp: Viewport) -> f64 {
    let c = vp.center();
    g.stars.iter().map(|s| (s.pos - c).hypot()).sum::<f64>() / g.stars.len() as f64
}

#[test]
fn colour_bands_run_from_core_to_rim() {
    assert_eq!(band_color(0.1), Color::hex(0xfffdd0));
    assert_eq!(band_color(0.3), Color::hex(0xffd700));
    assert_eq!(band_color(0.5), Color::hex(0xba55d3));
    assert_eq!(band_color(0.9), Color::hex(0x4169e1));
}

#[test]
fn stars_orbit_inside_the_disc_sorted_by_depth() {
    let (mut g, vp) = disc();
    assert_eq!(g.stars.len(), COUNT);
    assert!(g.stars.iter().all(|s| (INNER..=200.0).contains(&s.radius)));
    let pointer = PointerState::new(vp);
    let angles: Vec<f64> = g.stars.iter().map(|s| s.angle).collect();
    g.step(&Tick::nth(0), &pointer);
    assert!(g.stars.windows(2).all(|w| w[0].z <= w[1].z));
    let mean_before = angles.iter().sum::<f64>();
    let mean_after = g.stars.iter().map(|s| s.angle).sum::<f64>();
    assert!(mean_after > mean_before);
    // Untilted: the flat disc is centred on the viewport.
    assert!(g.stars.iter().all(|s| (s.pos - vp.center()).hypot() <= s.radius + 1e-9));
}

#[test]
fn press_pulls_the_disc_in_and_release_lets_it_go() {
    let (mut g, vp) = disc();
    let mut pointer = PointerState::new(vp);
    g.step(&Tick::nth(0), &pointer);
    let open = spread(&g, vp);

    pointer.apply(&PointerEvent::Down {
        x: 300.0,
        y: 200.0,
        button: Default::default(),
    });
    for i in 1..120 {
        g.step(&Tick::nth(i), &pointer);
    }
    assert!(g.pull() > 0.9);
    assert!(spread(&g, vp) < open * 0.6);

    pointer.apply(&PointerEvent::Up { x: 300.0, y: 200.0 });
    for i in 120..300 {
        g.step(&Tick::nth(i), &pointer);
    }
    assert!(g.pull() < 0.01);
}

#[test]
fn stars_and_links_draw_additively() {
    let (mut g, vp) = disc();
    g.step(&Tick::nth(0), &PointerState::new(vp));
    let mut painter = Painter::new(vp);
    g.draw(&mut painter);
    let scene = painter.finish();
    assert_eq!(scene.passes.len(), 2);
    assert_eq!(scene.passes[1].spec.composite, Composite::Lighter);
    assert_eq!(scene.texts().count(), COUNT);
}
