use super::*;

fn vp() -> Viewport {
    Viewport::new(400, 200).unwrap()
}

#[test]
fn default_script_presses_in_the_middle_third() {
    let s = PointerScript::default_for(90);
    s.validate().unwrap();
    let first = s.events_for(0, vp());
    assert!(matches!(first[0], PointerEvent::Move { .. }));
    let down = s.events_for(30, vp());
    assert!(down.iter().any(|e| matches!(e, PointerEvent::Down { .. })));
    let up = s.events_for(45, vp());
    assert!(up.iter().any(|e| matches!(e, PointerEvent::Up { .. })));
    assert!(s.events_for(90, vp()).is_empty());
}

#[test]
fn normalized_units_scale_to_viewport() {
    let json = r#"{
        "events": [{"frame": 2, "event": {"type": "move", "x": 0.5, "y": 0.25}}],
        "paths": [{"start": 0, "end": 3, "shape": "sweep", "from": [0, 0], "to": [1, 1]}]
    }"#;
    let s: PointerScript = serde_json::from_str(json).unwrap();
    s.validate().unwrap();
    let evs = s.events_for(2, vp());
    assert_eq!(evs[0], PointerEvent::Move { x: 200.0, y: 50.0 });
    assert_eq!(evs[1], PointerEvent::Move { x: 400.0, y: 200.0 });
}

#[test]
fn pixel_units_pass_through() {
    let json = r#"{"units": "pixels", "events": [{"frame": 0, "event": {"type": "down", "x": 12, "y": 34, "button": "secondary"}}]}"#;
    let s: PointerScript = serde_json::from_str(json).unwrap();
    assert_eq!(
        s.events_for(0, vp()),
        vec![PointerEvent::Down {
            x: 12.0,
            y: 34.0,
            button: PointerButton::Secondary
        }]
    );
}

#[test]
fn path_ending_mid_press_releases() {
    let s = PointerScript {
        units: ScriptUnits::Pixels,
        events: vec![],
        paths: vec![PointerPath {
            start: 0,
            end: 10,
            shape: PathShape::Sweep {
                from: [0.0, 0.0],
                to: [9.0, 0.0],
            },
            press: vec![PressSpan {
                start: 2,
                end: 20,
                secondary: false,
            }],
        }],
    };
    let evs = s.events_for(10, vp());
    assert_eq!(evs, vec![PointerEvent::Up { x: 9.0, y: 0.0 }]);
}

#[test]
fn press_held_until_the_path_ends_is_released_once() {
    let s = PointerScript {
        units: ScriptUnits::Pixels,
        events: vec![],
        paths: vec![PointerPath {
            start: 0,
            end: 10,
            shape: PathShape::Sweep {
                from: [0.0, 0.0],
                to: [9.0, 0.0],
            },
            press: vec![PressSpan {
                start: 2,
                end: 10,
                secondary: false,
            }],
        }],
    };
    let ups = (0..20)
        .flat_map(|f| s.events_for(f, vp()))
        .filter(|e| matches!(e, PointerEvent::Up { .. }))
        .count();
    assert_eq!(ups, 1);
    assert_eq!(s.events_for(10, vp()), vec![PointerEvent::Up { x: 9.0, y: 0.0 }]);

    let mut state = crate::input::pointer::PointerState::new(vp());
    for f in 0..20 {
        for e in s.events_for(f, vp()) {
            state.apply(&e);
        }
    }
    assert!(!state.down);
}

#[test]
fn invalid_scripts_are_rejected() {
    let mut s = PointerScript::default_for(10);
    s.paths[0].end = 0;
    assert!(s.validate().is_err());

    let bad_period = r#"{"paths": [{"start": 0, "end": 3, "shape": "orbit", "center": [0.5, 0.5], "radius": 0.1, "period": 0}]}"#;
    let s: PointerScript = serde_json::from_str(bad_period).unwrap();
    assert!(s.validate().is_err());

    let s = PointerScript {
        events: vec![ScriptedEvent {
            frame: 0,
            event: PointerEvent::Move {
                x: f64::NAN,
                y: 0.0,
            },
        }],
        ..PointerScript::default()
    };
    assert!(s.validate().is_err());
}
