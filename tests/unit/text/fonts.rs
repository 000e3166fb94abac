use super::*;
use crate::foundation::core::Point;

fn no_system() -> FontSources {
    FontSources {
        system_dirs: false,
        ..FontSources::default()
    }
}

#[test]
fn empty_book_falls_back_to_blocks() {
    let mut book = FontBook::empty();
    assert!(book.is_empty());
    let w = book.measure("abcd", FontSpec::serif(10.0));
    assert_eq!(w, BlockTypesetter.measure("abcd", FontSpec::serif(10.0)));
    let placed = book
        .place(&TextOp::new("x", Point::ZERO, FontSpec::sans(12.0)))
        .unwrap();
    assert!(matches!(placed.glyphs, PlacedGlyphs::Blocks(_)));
}

#[test]
fn missing_explicit_font_is_an_error() {
    let sources = FontSources {
        serif: Some(PathBuf::from("/definitely/not/here.ttf")),
        ..no_system()
    };
    let err = FontBook::load(&sources).err().unwrap();
    assert!(err.to_string().contains("failed to read font"));
}

#[test]
fn garbage_bytes_are_rejected() {
    let mut book = FontBook::empty();
    assert!(
        book.add_face(FaceKey::regular(FontFamily::Mono), vec![0u8; 16])
            .is_err()
    );
    assert!(book.is_empty());
}

#[test]
fn discovery_tolerates_missing_dirs() {
    let sources = FontSources {
        dir: Some(PathBuf::from("/definitely/not/a/dir")),
        ..no_system()
    };
    assert!(FontBook::load(&sources).is_ok());
}

#[test]
fn sources_deserialize_with_defaults() {
    let s: FontSources = serde_json::from_str(r#"{"mono":"/tmp/m.ttf"}"#).unwrap();
    assert_eq!(s.mono, Some(PathBuf::from("/tmp/m.ttf")));
    assert!(s.system_dirs);
    assert!(serde_json::from_str::<FontSources>(r#"{"bogus":1}"#).is_err());
}

#[test]
fn system_font_shapes_when_available() {
    let mut book = FontBook::load(&FontSources::default()).unwrap();
    if book.is_empty() {
        return;
    }
    let narrow = book.measure("i", FontSpec::sans(32.0));
    let wide = book.measure("iiii", FontSpec::sans(32.0));
    assert!(wide > narrow * 3.0);
    let m = book.metrics(FontSpec::sans(32.0));
    assert!(m.ascent > 0.0 && m.descent >= 0.0);
    let placed = book
        .place(&TextOp::new("Hi", Point::ZERO, FontSpec::sans(32.0).italic()))
        .unwrap();
    assert!(matches!(placed.glyphs, PlacedGlyphs::Outline { .. }));
}
