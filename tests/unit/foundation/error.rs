use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KinetypeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        KinetypeError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        KinetypeError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        KinetypeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KinetypeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: KinetypeError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, KinetypeError::Serde(_)));
}
