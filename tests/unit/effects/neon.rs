use super::*;
use crate::scene::display::Target;
use crate::text::typeset::BlockTypesetter;

fn rain() -> (Neon, Viewport) {
    let vp = Viewport::new(240, 160).unwrap();
    let mut ts = BlockTypesetter;
    let mut ctx = LayoutCtx::new(vp, &mut ts, 3, 0);
    let mut n = Neon::default();
    n.reset(&mut ctx);
    (n, vp)
}

#[test]
fn one_column_per_cell() {
    let (n, _) = rain();
    assert_eq!(n.drops.len(), 10);
    assert!(n.drops.iter().all(|d| d.y <= 0.0 && d.chars.len() >= 12));
}

#[test]
fn press_detonates_and_the_wave_expires() {
    let (mut n, vp) = rain();
    let pointer = PointerState::new(vp);
    let down = PointerEvent::Down {
        x: 120.0,
        y: 80.0,
        button: Default::default(),
    };
    n.pointer(&down, &pointer);
    assert!((60..100).contains(&n.sparks()));
    assert_eq!(n.shockwaves(), 1);

    for i in 0..30 {
        n.step(&Tick::nth(i), &pointer);
    }
    assert_eq!(n.shockwaves(), 0);
    for i in 30..110 {
        n.step(&Tick::nth(i), &pointer);
    }
    assert_eq!(n.sparks(), 0);
}

#[test]
fn wave_front_shoves_and_brightens_drops() {
    let (mut n, vp) = rain();
    n.drops.truncate(1);
    let d = &mut n.drops[0];
    d.x = 60.0;
    d.y = 80.0;
    d.speed = 0.0;
    d.brightness = 0.5;
    n.waves.push(Shockwave {
        center: Point::new(0.0, 80.0),
        radius: 45.0,
        force: 20.0,
    });
    n.step(&Tick::nth(0), &PointerState::new(vp));
    assert!(n.drops[0].x > 60.0);
    assert!(n.drops[0].brightness > 1.5);
}

#[test]
fn rain_draws_additively() {
    let (mut n, vp) = rain();
    for d in &mut n.drops {
        d.y = 100.0;
    }
    let mut painter = Painter::new(vp);
    n.draw(&mut painter);
    let scene = painter.finish();
    assert!(
        scene
            .passes
            .iter()
            .skip(1)
            .all(|p| p.spec.target == Target::Screen && p.spec.composite == Composite::Lighter)
    );
    assert!(scene.passes.iter().any(|p| p.spec.blur > 0.0));
}
