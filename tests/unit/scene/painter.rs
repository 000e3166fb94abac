use super::*;
use crate::scene::display::{Composite, FontSpec};

fn vp() -> Viewport {
    Viewport::new(200, 100).unwrap()
}

#[test]
fn same_spec_ops_share_a_pass() {
    let mut p = Painter::new(vp());
    p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
    p.fill_circle(Point::new(5.0, 5.0), 3.0, Color::WHITE);
    let scene = p.finish();
    assert_eq!(scene.passes.len(), 1);
    assert_eq!(scene.passes[0].ops.len(), 2);
}

#[test]
fn spec_changes_split_passes() {
    let mut p = Painter::new(vp());
    p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::BLACK);
    p.pass(PassSpec::screen().composite(Composite::Lighter), |p| {
        p.fill_circle(Point::new(5.0, 5.0), 3.0, Color::WHITE);
    });
    p.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
    let scene = p.finish();
    let composites: Vec<_> = scene.passes.iter().map(|p| p.spec.composite).collect();
    assert_eq!(
        composites,
        vec![Composite::SourceOver, Composite::Lighter, Composite::SourceOver]
    );
}

#[test]
fn invisible_and_degenerate_ops_are_skipped() {
    let mut p = Painter::new(vp());
    p.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::TRANSPARENT);
    p.fill_circle(Point::ZERO, 0.0, Color::BLACK);
    p.stroke_line(Point::ZERO, Point::new(1.0, 1.0), Color::BLACK, StrokeStyle::new(0.0));
    p.text(TextOp::new("", Point::ZERO, FontSpec::serif(12.0)));
    assert!(p.finish().is_empty());
}

#[test]
fn glow_emits_blurred_halo_before_sharp_ops() {
    let mut p = Painter::new(vp());
    p.glow(20.0, Color::rgb(255, 0, 0), |p| {
        p.fill_circle(Point::new(50.0, 50.0), 10.0, Color::WHITE);
    });
    let scene = p.finish();
    assert_eq!(scene.passes.len(), 2);
    assert_eq!(scene.passes[0].spec.blur, 10.0);
    assert_eq!(scene.passes[1].spec.blur, 0.0);
    let DrawOp::Fill { paint: Paint::Solid(c), .. } = &scene.passes[0].ops[0] else {
        panic!("expected solid fill");
    };
    assert_eq!(c.g, 0.0);
}

#[test]
fn clip_nests_recorded_ops() {
    let mut p = Painter::new(vp());
    p.clip(Rect::new(0.0, 0.0, 50.0, 50.0).to_path(0.1), Affine::IDENTITY, |p| {
        p.fill_all(Color::BLACK);
        p.glow(10.0, Color::WHITE, |p| p.fill_circle(Point::new(1.0, 1.0), 1.0, Color::BLACK));
    });
    let scene = p.finish();
    assert_eq!(scene.passes.len(), 1);
    let DrawOp::Clip { ops, .. } = &scene.passes[0].ops[0] else {
        panic!("expected clip");
    };
    assert_eq!(ops.len(), 2);
}

#[test]
fn transforms_compose() {
    let mut p = Painter::new(vp());
    p.with_transform(Affine::translate((10.0, 0.0)), |p| {
        p.fill_path_tf(
            Rect::new(0.0, 0.0, 1.0, 1.0).to_path(0.1),
            Color::BLACK,
            Affine::translate((0.0, 5.0)),
        );
    });
    let scene = p.finish();
    let b = scene.passes[0].ops[0].bounds().unwrap();
    assert_eq!((b.x0, b.y0), (10.0, 5.0));
}

#[test]
fn clear_passes_survive_without_ops() {
    let mut p = Painter::new(vp());
    p.clear(Target::Offscreen(1));
    let scene = p.finish();
    assert_eq!(scene.passes.len(), 1);
    assert!(scene.passes[0].spec.clear);
}

#[test]
fn halo_keeps_each_ops_own_colour() {
    let mut p = Painter::new(vp());
    p.halo(8.0, |p| {
        p.fill_circle(Point::new(20.0, 20.0), 5.0, Color::rgb(0, 0, 255));
    });
    let scene = p.finish();
    assert_eq!(scene.passes.len(), 2);
    assert_eq!(scene.passes[0].spec.blur, 4.0);
    assert_eq!(scene.passes[0].ops, scene.passes[1].ops);
}
