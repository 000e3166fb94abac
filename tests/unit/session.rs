use super::*;
use crate::encode::sink::InMemorySink;
use crate::text::fonts::FontSources;
use crate::text::typeset::BlockTypesetter;

fn small(page: EffectId) -> SessionConfig {
    SessionConfig {
        width: 64,
        height: 48,
        frames: 4,
        page,
        fonts: FontSources {
            system_dirs: false,
            ..FontSources::default()
        },
        ..SessionConfig::default()
    }
}

fn session(page: EffectId) -> Session {
    Session::new(small(page), Box::new(BlockTypesetter)).unwrap()
}

#[test]
fn run_pushes_every_frame_in_order() {
    let mut s = session(EffectId::Vapor);
    let mut sink = InMemorySink::new();
    let stats = s.run(&mut sink).unwrap();

    assert_eq!(stats.frames, 4);
    assert_eq!(stats.steps, s.config().steps_through(3));
    assert_eq!(s.steps_done(), 8);
    assert!(sink.is_ended());

    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (64, 48));
    assert_eq!(cfg.bg_rgba, EffectId::Vapor.info().background.to_rgba8());

    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, [0, 1, 2, 3]);
    for (_, f) in sink.frames() {
        assert_eq!((f.width, f.height), (64, 48));
    }
}

#[test]
fn run_resumes_after_manual_frames() {
    let mut s = session(EffectId::Ripple);
    s.next_frame().unwrap();
    assert_eq!(s.frame_index(), FrameIndex(1));
    let mut sink = InMemorySink::new();
    let stats = s.run(&mut sink).unwrap();
    assert_eq!(stats.frames, 3);
    assert_eq!(sink.frames()[0].0, FrameIndex(1));
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let cfg = SessionConfig {
        frames: 0,
        ..small(EffectId::Neon)
    };
    assert!(Session::new(cfg, Box::new(BlockTypesetter)).is_err());
}

#[test]
fn render_frame_rejects_frames_past_the_end() {
    let err = render_frame(&small(EffectId::Neon), 4).unwrap_err();
    assert!(err.to_string().contains("outside"));
}

#[test]
fn render_frame_replays_the_same_pixels() {
    let cfg = small(EffectId::Signal);
    let mut s = Session::from_config(cfg.clone()).unwrap();
    let mut sink = InMemorySink::new();
    s.run(&mut sink).unwrap();

    let frames = sink.into_frames();
    let single = render_frame(&cfg, 2).unwrap();
    assert_eq!(single, frames[2].1);
}

#[test]
fn select_rebuilds_the_page() {
    let mut s = session(EffectId::Vapor);
    s.next_frame().unwrap();
    s.select(EffectId::Noir);
    assert_eq!(s.gallery().current(), EffectId::Noir);
    let frame = s.next_frame().unwrap();
    assert_eq!(frame.width, 64);
}

#[test]
fn menu_frames_cover_the_page() {
    let mut a = session(EffectId::Erosion);
    let mut b = session(EffectId::Erosion);
    b.toggle_menu();
    assert!(b.gallery().menu_open());
    let fa = a.next_frame().unwrap();
    let fb = b.next_frame().unwrap();
    assert_ne!(fa, fb);
    // Steps are still owed while the menu is open; the page just doesn't advance.
    assert_eq!(a.steps_done(), b.steps_done());
}

#[test]
fn sheet_tiles_pages_row_major() {
    let cfg = small(EffectId::Pendulum);
    let pages = [EffectId::Bloom, EffectId::Noir, EffectId::Lens];
    let sheet = render_sheet(&cfg, &pages, 2, Some(1)).unwrap();
    assert_eq!((sheet.width, sheet.height), (128, 96));

    // Bottom-right cell stays empty.
    assert_eq!(sheet.pixel(100, 70), Some([0, 0, 0, 0]));

    // Filled cells sit on their page's opaque background.
    for (x, y) in [(1, 1), (65, 1), (1, 49)] {
        assert_eq!(sheet.pixel(x, y).unwrap()[3], 255);
    }
}

#[test]
fn sheet_tile_matches_a_single_render() {
    let cfg = small(EffectId::Pendulum);
    let pages = [EffectId::Fluid, EffectId::Kinetic];
    let sheet = render_sheet(&cfg, &pages, 1, Some(1)).unwrap();
    let kinetic = render_frame(
        &SessionConfig {
            page: EffectId::Kinetic,
            ..cfg.clone()
        },
        cfg.frames - 1,
    )
    .unwrap();
    for y in 0..48 {
        for x in 0..64 {
            assert_eq!(sheet.pixel(x, 48 + y), kinetic.pixel(x, y));
        }
    }
}

#[test]
fn sheet_rejects_bad_arguments() {
    let cfg = small(EffectId::Pendulum);
    assert!(render_sheet(&cfg, &[], 2, None).is_err());
    assert!(render_sheet(&cfg, &[EffectId::Orb], 0, None).is_err());
    assert!(render_sheet(&cfg, &[EffectId::Orb], 1, Some(0)).is_err());
}
