use super::*;
use crate::scene::display::Target;
use crate::text::typeset::BlockTypesetter;

fn config(width: u32, height: u32) -> SessionConfig {
    SessionConfig {
        width,
        height,
        ..SessionConfig::default()
    }
}

fn gallery() -> (Gallery, BlockTypesetter) {
    let mut ts = BlockTypesetter;
    let g = Gallery::new(&config(1280, 720), &mut ts);
    (g, ts)
}

fn press(g: &mut Gallery, ts: &mut BlockTypesetter, at: Point) {
    g.pointer(&PointerEvent::Down { x: at.x, y: at.y, button: Default::default() }, ts);
}

fn release(g: &mut Gallery, ts: &mut BlockTypesetter, at: Point) {
    g.pointer(&PointerEvent::Up { x: at.x, y: at.y }, ts);
}

fn tile(g: &Gallery, id: EffectId) -> Rect {
    g.layout()
        .tiles
        .iter()
        .find(|(t, _)| *t == id)
        .map(|(_, r)| *r)
        .unwrap()
}

fn scene(g: &Gallery) -> crate::scene::display::Scene {
    let mut p = Painter::new(g.viewport());
    g.draw(&mut p);
    p.finish()
}

#[test]
fn opens_on_the_default_page_with_the_menu_closed() {
    let (mut g, _) = gallery();
    assert_eq!(g.current(), EffectId::Pendulum);
    assert_eq!(g.info().label, "IMPRESSION");
    assert!(!g.menu_open());
    assert_eq!(g.generation(), 0);
    assert!(g.take_stale_surfaces());
    assert!(!g.take_stale_surfaces());
}

#[test]
fn background_follows_the_catalog_unless_overridden() {
    let (g, _) = gallery();
    assert_eq!(g.background(), EffectId::Pendulum.info().background);

    let mut ts = BlockTypesetter;
    let cfg = SessionConfig {
        background: Some(crate::foundation::color::ColorDef(Color::rgb(1, 2, 3))),
        page: EffectId::Neon,
        ..SessionConfig::default()
    };
    let g = Gallery::new(&cfg, &mut ts);
    assert_eq!(g.background(), Color::rgb(1, 2, 3));
}

#[test]
fn layout_has_a_tile_per_page_below_the_button() {
    let layout = MenuLayout::new(Viewport::new(1280, 720).unwrap());
    assert_eq!(layout.tiles.len(), EffectId::ALL.len());
    assert_eq!(layout.button, Rect::new(1216.0, 24.0, 1256.0, 64.0));
    for (i, (_, a)) in layout.tiles.iter().enumerate() {
        assert!(a.y0 >= layout.button.y1);
        for (_, b) in &layout.tiles[i + 1..] {
            assert!(a.intersect(*b).area() <= 0.0);
        }
    }
    // Four columns on a wide viewport.
    assert_eq!(layout.tiles[0].1.y0, layout.tiles[3].1.y0);
    assert!(layout.tiles[4].1.y0 > layout.tiles[3].1.y0);
}

#[test]
fn compact_layout_uses_two_columns() {
    let layout = MenuLayout::new(Viewport::new(400, 800).unwrap());
    assert_eq!(layout.tiles[0].1.y0, layout.tiles[1].1.y0);
    assert!(layout.tiles[2].1.y0 > layout.tiles[1].1.y0);
    let c = layout.tiles[5].1.center();
    assert_eq!(layout.tile_at(c), Some(layout.tiles[5].0));
    assert_eq!(layout.tile_at(Point::new(1.0, 1.0)), None);
}

#[test]
fn menu_button_toggles_without_reaching_the_effect() {
    let (mut g, mut ts) = gallery();
    let button = g.layout().button.center();
    press(&mut g, &mut ts, button);
    assert!(g.menu_open());
    assert!(!g.pointer_state().down);
    release(&mut g, &mut ts, button);

    press(&mut g, &mut ts, button);
    release(&mut g, &mut ts, button);
    assert!(!g.menu_open());
}

#[test]
fn open_menu_swallows_effect_input() {
    let (mut g, mut ts) = gallery();
    g.toggle_menu();
    // Right margin, beside the grid.
    press(&mut g, &mut ts, Point::new(1270.0, 400.0));
    assert!(!g.pointer_state().down);
    assert!(g.menu_open());
    assert_eq!(g.current(), EffectId::Pendulum);
}

#[test]
fn tile_press_selects_and_closes_the_menu() {
    let (mut g, mut ts) = gallery();
    g.restart(&mut ts);
    assert_eq!(g.generation(), 1);
    g.take_stale_surfaces();

    g.toggle_menu();
    let at = tile(&g, EffectId::Gravity).center();
    press(&mut g, &mut ts, at);
    assert_eq!(g.current(), EffectId::Gravity);
    assert!(!g.menu_open());
    assert_eq!(g.generation(), 0);
    assert!(g.take_stale_surfaces());

    // The release belongs to the menu press.
    release(&mut g, &mut ts, at);
    assert!(!g.chrome_press);
    assert!(!g.pointer_state().down);
}

#[test]
fn open_menu_freezes_the_effect() {
    let (mut g, _) = gallery();
    g.step();
    g.step();
    assert_eq!(g.ticks, 2);
    g.toggle_menu();
    for _ in 0..10 {
        g.step();
    }
    assert_eq!(g.ticks, 2);
    g.toggle_menu();
    g.step();
    assert_eq!(g.ticks, 3);
}

#[test]
fn effect_input_is_forwarded_when_the_menu_is_closed() {
    let (mut g, mut ts) = gallery();
    press(&mut g, &mut ts, Point::new(300.0, 300.0));
    assert!(g.pointer_state().down);
    assert!(g.pointer_state().inside);
    release(&mut g, &mut ts, Point::new(310.0, 300.0));
    assert!(!g.pointer_state().down);
}

#[test]
fn restart_and_resize_rebuild_the_page() {
    let (mut g, mut ts) = gallery();
    g.take_stale_surfaces();
    g.step();
    g.restart(&mut ts);
    assert_eq!(g.ticks, 0);
    assert!(g.take_stale_surfaces());

    let small = Viewport::new(500, 900).unwrap();
    g.resize(small, &mut ts);
    assert_eq!(g.viewport(), small);
    assert_eq!(g.layout().button.x1, 476.0);
    assert!(g.take_stale_surfaces());
    assert_eq!(g.current(), EffectId::Pendulum);
}

#[test]
fn chrome_is_drawn_on_the_overlay() {
    let (g, _) = gallery();
    let s = scene(&g);
    let last = s.passes.last().unwrap();
    assert_eq!(last.spec.target, Target::Overlay);
    assert!(
        s.texts()
            .any(|t| t.text == "IMPRESSION / Time erases memory" && t.color.a < 0.25)
    );
    assert!(!s.texts().any(|t| t.text == COLLECTION));
}

#[test]
fn open_menu_draws_every_page_and_hides_the_footer() {
    let (mut g, _) = gallery();
    g.toggle_menu();
    let s = scene(&g);
    let texts: Vec<&str> = s.texts().map(|t| t.text.as_str()).collect();
    assert!(texts.contains(&COLLECTION));
    assert!(!texts.iter().any(|t| t.contains(" / ")));
    for info in crate::effects::catalog() {
        assert!(texts.contains(&info.label), "missing tile {}", info.label);
    }
    assert_eq!(texts.iter().filter(|t| **t == "3D").count(), 2);
    // The current page's tile is the solid white one.
    let active = s
        .texts()
        .find(|t| t.text == "IMPRESSION")
        .map(|t| t.color)
        .unwrap();
    assert_eq!(active, Color::BLACK);
}

#[test]
fn light_and_dark_pages_theme_the_footer() {
    let mut ts = BlockTypesetter;
    let dark = Gallery::new(
        &SessionConfig {
            page: EffectId::Noir,
            ..config(800, 600)
        },
        &mut ts,
    );
    let s = scene(&dark);
    let footer = s.texts().find(|t| t.text.starts_with("NOIR / ")).unwrap();
    assert_eq!(footer.color, Color::WHITE.with_alpha(0.2));
}
