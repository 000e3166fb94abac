use super::*;
use crate::foundation::color::Color;

#[test]
fn empty_document_is_the_default_session() {
    let cfg = SessionConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, SessionConfig::default());
    assert_eq!((cfg.width, cfg.height), (1280, 720));
    assert_eq!(cfg.fps, Fps::new(30, 1).unwrap());
    assert_eq!(cfg.frames, 180);
    assert_eq!(cfg.page, EffectId::Pendulum);
    assert!(cfg.pointer.is_none());
    cfg.validate().unwrap();
}

#[test]
fn fields_parse_from_json() {
    let json = r##"{
        "width": 640,
        "height": 360,
        "fps": {"num": 60, "den": 1},
        "frames": 12,
        "seed": 7,
        "page": "kintsugi",
        "fonts": {"system_dirs": false},
        "background": "#102030"
    }"##;
    let cfg = SessionConfig::from_reader(json.as_bytes()).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.viewport(), Viewport::new(640, 360).unwrap());
    assert_eq!(cfg.page, EffectId::Kintsugi);
    assert_eq!(cfg.seed, 7);
    assert!(!cfg.fonts.system_dirs);
    assert_eq!(cfg.background.unwrap().0, Color::rgb(0x10, 0x20, 0x30));
}

#[test]
fn background_accepts_arrays() {
    let cfg = SessionConfig::from_reader(r#"{"background": [1, 0, 0, 0.5]}"#.as_bytes()).unwrap();
    assert_eq!(cfg.background.unwrap().0, Color::new(1.0, 0.0, 0.0, 0.5));
}

#[test]
fn unknown_fields_and_pages_are_rejected() {
    let err = SessionConfig::from_reader(r#"{"widht": 10}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));

    let err = SessionConfig::from_reader(r#"{"page": "marquee"}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("parse session config JSON"));
}

#[test]
fn validate_rejects_degenerate_sessions() {
    let bad = [
        SessionConfig {
            width: 0,
            ..SessionConfig::default()
        },
        SessionConfig {
            height: MAX_VIEWPORT_EDGE + 1,
            ..SessionConfig::default()
        },
        SessionConfig {
            fps: Fps { num: 0, den: 1 },
            ..SessionConfig::default()
        },
        SessionConfig {
            fps: Fps { num: 30, den: 0 },
            ..SessionConfig::default()
        },
        SessionConfig {
            frames: 0,
            ..SessionConfig::default()
        },
    ];
    for cfg in bad {
        assert!(cfg.validate().is_err(), "{cfg:?}");
    }
}

#[test]
fn viewport_is_clamped_before_validation() {
    let cfg = SessionConfig {
        width: 0,
        height: 100_000,
        ..SessionConfig::default()
    };
    assert_eq!(cfg.viewport().width, 1);
    assert_eq!(cfg.viewport().height, MAX_VIEWPORT_EDGE);
}

#[test]
fn missing_pointer_script_falls_back_to_the_default() {
    let cfg = SessionConfig {
        frames: 90,
        ..SessionConfig::default()
    };
    assert_eq!(cfg.pointer_script(), PointerScript::default_for(90));
}

#[test]
fn set_frames_keeps_the_default_script_of_the_configured_length() {
    let mut cfg = SessionConfig {
        frames: 90,
        ..SessionConfig::default()
    };
    cfg.set_frames(11);
    assert_eq!(cfg.frames, 11);
    assert_eq!(cfg.pointer_script(), PointerScript::default_for(90));

    let explicit = PointerScript::default_for(4);
    let mut cfg = SessionConfig {
        pointer: Some(explicit.clone()),
        ..SessionConfig::default()
    };
    cfg.set_frames(500);
    assert_eq!(cfg.pointer_script(), explicit);
}

#[test]
fn steps_follow_the_fixed_sim_rate() {
    let cfg = SessionConfig::default();
    assert_eq!(cfg.steps_through(0), 2);
    assert_eq!(cfg.steps_through(29), 60);

    let cfg = SessionConfig {
        fps: Fps::new(24, 1).unwrap(),
        ..SessionConfig::default()
    };
    assert_eq!(cfg.steps_through(1), 5);
    assert_eq!(cfg.steps_through(23), 60);

    let cfg = SessionConfig {
        fps: Fps::new(120, 1).unwrap(),
        ..SessionConfig::default()
    };
    // Output frames outpace the simulation.
    assert_eq!(cfg.steps_through(1), 1);
    assert_eq!(cfg.steps_through(3), 2);
    assert!((0..20).all(|f| cfg.steps_through(f) <= cfg.steps_through(f + 1)));
}
