use super::*;

fn parse(json: &str) -> Color {
    serde_json::from_str::<ColorDef>(json).unwrap().0
}

#[test]
fn hex_forms_parse() {
    assert_eq!(parse("\"#ff0000\"").to_rgba8(), [255, 0, 0, 255]);
    assert_eq!(parse("\"00ff0080\"").to_rgba8(), [0, 255, 0, 128]);
    assert!(serde_json::from_str::<ColorDef>("\"#12345\"").is_err());
    assert!(parse_hex("#zz0000").is_err());
}

#[test]
fn object_and_array_forms_parse() {
    assert_eq!(
        parse(r#"{"r":0.0,"g":0.0,"b":1.0}"#).to_rgba8(),
        [0, 0, 255, 255]
    );
    assert_eq!(parse("[1.0, 1.0, 1.0, 0.0]").to_rgba8(), [255, 255, 255, 0]);
    assert!(serde_json::from_str::<ColorDef>("[1.0]").is_err());
}

#[test]
fn hsla_primaries() {
    assert_eq!(Color::hsla(0.0, 1.0, 0.5, 1.0).to_rgba8(), [255, 0, 0, 255]);
    assert_eq!(Color::hsla(120.0, 1.0, 0.5, 1.0).to_rgba8(), [0, 255, 0, 255]);
    assert_eq!(Color::hsla(-120.0, 1.0, 0.5, 1.0).to_rgba8(), [0, 0, 255, 255]);
    assert_eq!(Color::hsla(42.0, 0.0, 1.0, 1.0).to_rgba8(), [255, 255, 255, 255]);
    assert_eq!(parse(r#"{"h":240,"s":1,"l":0.5}"#).to_rgba8(), [0, 0, 255, 255]);
}

#[test]
fn hex_literal_and_lerp() {
    let c = Color::hex(0x0a0b0c);
    assert_eq!(c.to_rgba8(), [10, 11, 12, 255]);
    let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
    assert_eq!(mid.to_rgba8(), [128, 128, 128, 255]);
    assert_eq!(Color::WHITE.with_alpha(0.5).to_rgba8_premul().r, 128);
    assert!(Color::WHITE.with_alpha(0.0).is_invisible());
}
