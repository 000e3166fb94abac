use super::*;
use crate::text::typeset::BlockTypesetter;

#[test]
fn wrap_breaks_on_width_and_newlines() {
    let mut ts = BlockTypesetter;
    // mono 10px: 6px per char.
    let lines = wrap_words("aaa bbb ccc\nddd", 50.0, FontSpec::mono(10.0), &mut ts);
    assert_eq!(lines, vec!["aaa bbb", "ccc", "ddd"]);
}

#[test]
fn wrap_keeps_overlong_words_whole() {
    let mut ts = BlockTypesetter;
    let lines = wrap_words("abcdefghijkl x", 30.0, FontSpec::mono(10.0), &mut ts);
    assert_eq!(lines, vec!["abcdefghijkl", "x"]);
}

#[test]
fn flow_places_each_glyph_and_wraps_words() {
    let mut ts = BlockTypesetter;
    let opts = FlowOptions::margins(100.0, 100.0, 10.0, 0.0, 0.1, 20.0);
    let glyphs = flow_layout("ab cd ef gh ij kl mn", FontSpec::mono(10.0), opts, &mut ts);
    assert_eq!(glyphs.len(), 14);
    assert_eq!(glyphs[0].pos, Point::new(10.0, 10.0));
    assert_eq!(glyphs[1].pos.x, 16.0);
    assert!(glyphs.iter().any(|g| g.line > 0));
    assert!(glyphs.iter().all(|g| g.pos.x < 90.0));
    assert_eq!(glyphs.last().unwrap().word, 6);
}

#[test]
fn flow_centered_anchor_and_gap() {
    let mut ts = BlockTypesetter;
    let opts = FlowOptions::margins(200.0, 100.0, 0.0, 0.0, 0.0, 20.0)
        .centered()
        .char_gap(1.0);
    let glyphs = flow_layout("ab", FontSpec::mono(10.0), opts, &mut ts);
    assert_eq!(glyphs[0].pos, Point::new(3.0, 10.0));
    assert_eq!(glyphs[1].pos, Point::new(10.0, 10.0));
}

#[test]
fn flow_paragraph_gap_and_bottom_limit() {
    let mut ts = BlockTypesetter;
    let opts = FlowOptions::margins(200.0, 100.0, 0.0, 0.0, 0.0, 20.0).paragraph_gap(10.0);
    let glyphs = flow_layout("a\n\nb", FontSpec::mono(10.0), opts, &mut ts);
    assert_eq!(glyphs[1].pos.y, 30.0);

    let limited = flow_layout(
        "a\nb\nc\nd",
        FontSpec::mono(10.0),
        opts.bottom(45.0),
        &mut ts,
    );
    assert_eq!(limited.len(), 3);
}
