use super::*;
use crate::foundation::core::Point;
use crate::scene::display::{FontSpec, GradientStop, PassSpec, TextOp};
use crate::scene::painter::Painter;
use crate::text::typeset::BlockTypesetter;

fn vp() -> Viewport {
    Viewport::new(64, 48).unwrap()
}

fn renderer() -> CpuRenderer {
    CpuRenderer::with_typesetter(vp(), Box::new(BlockTypesetter)).unwrap()
}

#[test]
fn empty_scene_renders_background() {
    let mut r = renderer();
    let frame = r.render(&Scene::default(), Color::rgb(10, 20, 30)).unwrap();
    assert_eq!((frame.width, frame.height), (64, 48));
    assert_eq!(frame.pixel(5, 5), Some([10, 20, 30, 255]));
    assert_eq!(frame.count_not([10, 20, 30, 255]), 0);
}

#[test]
fn fills_persist_on_screen_but_overlay_does_not() {
    let mut r = renderer();
    let mut p = Painter::new(vp());
    p.fill_rect(Rect::new(0.0, 0.0, 32.0, 48.0), Color::rgb(255, 0, 0));
    p.pass(PassSpec::overlay(), |p| {
        p.fill_rect(Rect::new(32.0, 0.0, 64.0, 48.0), Color::rgb(0, 255, 0));
    });
    let frame = r.render(&p.finish(), Color::BLACK).unwrap();
    assert_eq!(frame.pixel(10, 10), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(50, 10), Some([0, 255, 0, 255]));

    let again = r.render(&Scene::default(), Color::BLACK).unwrap();
    assert_eq!(again.pixel(10, 10), Some([255, 0, 0, 255]));
    assert_eq!(again.pixel(50, 10), Some([0, 0, 0, 255]));

    r.reset_surfaces();
    let cleared = r.render(&Scene::default(), Color::BLACK).unwrap();
    assert_eq!(cleared.pixel(10, 10), Some([0, 0, 0, 255]));
}

#[test]
fn translucent_fills_accumulate_into_trails() {
    let mut r = renderer();
    let mut first = Painter::new(vp());
    first.fill_all(Color::WHITE);
    r.render(&first.finish(), Color::BLACK).unwrap();
    let mut fade = Painter::new(vp());
    fade.fill_all(Color::BLACK.with_alpha(0.5));
    let frame = r.render(&fade.finish(), Color::BLACK).unwrap();
    let [v, _, _, _] = frame.pixel(1, 1).unwrap();
    assert!((120..=135).contains(&v));
}

#[test]
fn glow_pass_blurs_beyond_the_shape() {
    let mut r = renderer();
    let mut p = Painter::new(vp());
    p.glow(12.0, Color::WHITE, |p| {
        p.fill_circle(Point::new(32.0, 24.0), 4.0, Color::WHITE);
    });
    let frame = r.render(&p.finish(), Color::BLACK).unwrap();
    let [halo, _, _, _] = frame.pixel(32, 31).unwrap();
    assert!(halo > 0);
    assert_eq!(frame.pixel(32, 24), Some([255, 255, 255, 255]));
}

#[test]
fn clip_masks_nested_ops() {
    let mut r = renderer();
    let mut p = Painter::new(vp());
    p.clip(
        Rect::new(0.0, 0.0, 16.0, 48.0).to_path(0.1),
        Affine::IDENTITY,
        |p| p.fill_all(Color::WHITE),
    );
    let frame = r.render(&p.finish(), Color::BLACK).unwrap();
    assert_eq!(frame.pixel(8, 8), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(40, 8), Some([0, 0, 0, 255]));
}

#[test]
fn offscreen_surfaces_feed_image_ops() {
    let mut r = renderer();
    let mut p = Painter::new(vp());
    p.pass(PassSpec::offscreen(1).clearing(), |p| {
        p.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Color::rgb(0, 0, 255));
    });
    p.image(Target::Offscreen(1), Affine::translate((20.0, 20.0)), 1.0);
    let frame = r.render(&p.finish(), Color::BLACK).unwrap();
    assert_eq!(frame.pixel(24, 24), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(4, 4), Some([0, 0, 0, 255]));
    assert!(r.surface_bytes(Target::Offscreen(1)).is_some());
    assert!(r.surface_bytes(Target::Offscreen(2)).is_none());
}

#[test]
fn priming_passes_run_once_per_fresh_surface() {
    let primed = || {
        let mut p = Painter::new(vp());
        p.pass(PassSpec::offscreen(0).priming(), |p| p.fill_all(Color::WHITE));
        p.pass(PassSpec::offscreen(0).composite(Composite::DestinationOut), |p| {
            p.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Color::BLACK);
        });
        p.image(Target::Offscreen(0), Affine::IDENTITY, 1.0);
        p.finish()
    };
    let mut r = renderer();
    let first = r.render(&primed(), Color::BLACK).unwrap();
    assert_eq!(first.pixel(20, 20), Some([255, 255, 255, 255]));
    assert_eq!(first.pixel(2, 2), Some([0, 0, 0, 255]));

    // The erased corner stays erased because the fill is not replayed.
    r.reset_surfaces();
    r.render(&primed(), Color::BLACK).unwrap();
    let mut wipe = Painter::new(vp());
    wipe.pass(PassSpec::offscreen(0).composite(Composite::DestinationOut), |p| {
        p.fill_rect(Rect::new(16.0, 16.0, 24.0, 24.0), Color::BLACK);
    });
    wipe.pass(PassSpec::screen().clearing(), |_| {});
    r.render(&wipe.finish(), Color::BLACK).unwrap();
    let again = r.render(&primed(), Color::BLACK).unwrap();
    assert_eq!(again.pixel(20, 20), Some([0, 0, 0, 255]));
    assert_eq!(again.pixel(40, 40), Some([255, 255, 255, 255]));
}

#[test]
fn out_of_range_offscreen_is_an_error() {
    let mut r = renderer();
    let mut p = Painter::new(vp());
    p.pass(PassSpec::offscreen(OFFSCREEN_SLOTS), |p| p.fill_all(Color::WHITE));
    assert!(r.render(&p.finish(), Color::BLACK).is_err());
}

#[test]
fn gradients_strokes_and_text_draw() {
    let mut r = renderer();
    let mut p = Painter::new(vp());
    p.fill_rect(
        Rect::new(0.0, 0.0, 64.0, 10.0),
        Paint::Linear {
            start: Point::new(0.0, 0.0),
            end: Point::new(64.0, 0.0),
            stops: vec![
                GradientStop::new(0.0, Color::BLACK),
                GradientStop::new(1.0, Color::WHITE),
            ],
        },
    );
    p.stroke_line(
        Point::new(0.0, 20.0),
        Point::new(64.0, 20.0),
        Color::rgb(255, 0, 0),
        StrokeStyle::new(4.0),
    );
    p.text(
        TextOp::new("III", Point::new(4.0, 44.0), FontSpec::sans(16.0)).color(Color::WHITE),
    );
    let frame = r.render(&p.finish(), Color::rgb(0, 0, 80)).unwrap();
    let [left, ..] = frame.pixel(1, 5).unwrap();
    let [right, ..] = frame.pixel(62, 5).unwrap();
    assert!(right > left + 150);
    assert_eq!(frame.pixel(30, 20), Some([255, 0, 0, 255]));
    let text_pixels = (30..44)
        .flat_map(|y| (4..30).map(move |x| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y) == Some([255, 255, 255, 255]))
        .count();
    assert!(text_pixels > 20);
}

#[test]
fn non_finite_geometry_is_skipped() {
    let mut r = renderer();
    let mut p = Painter::new(vp());
    p.fill_circle(Point::new(f64::NAN, 3.0), 4.0, Color::WHITE);
    p.text(TextOp::new("x", Point::new(f64::INFINITY, 0.0), FontSpec::mono(10.0)));
    let frame = r.render(&p.finish(), Color::BLACK).unwrap();
    assert_eq!(frame.count_not([0, 0, 0, 255]), 0);
}

#[test]
fn resize_reallocates_surfaces() {
    let mut r = renderer();
    r.resize(Viewport::new(20, 10).unwrap()).unwrap();
    let frame = r.render(&Scene::default(), Color::WHITE).unwrap();
    assert_eq!(frame.data.len(), 20 * 10 * 4);
}
