use super::*;

#[test]
fn begin_rejects_odd_dimensions_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join("kinetype_odd.mp4"),
    ));
    let err = sink
        .begin(SinkConfig {
            width: 11,
            height: 10,
            fps: Fps::default(),
            bg_rgba: [0, 0, 0, 255],
        })
        .unwrap_err();
    assert!(err.to_string().contains("even"));
}

#[test]
fn begin_rejects_zero_fps() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join("kinetype_zero_fps.mp4"),
    ));
    let cfg = SinkConfig {
        width: 10,
        height: 10,
        fps: Fps { num: 0, den: 1 },
        bg_rgba: [0, 0, 0, 255],
    };
    assert!(sink.begin(cfg).is_err());
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    assert!(sink.push_frame(FrameIndex(0), &FrameRGBA::new(2, 2)).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn flatten_premul_over_black() {
    let src = [128u8, 0, 0, 128];
    let mut dst = [0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, [128, 0, 0, 255]);
}

#[test]
fn flatten_straight_over_white() {
    let src = [255u8, 0, 0, 128];
    let mut dst = [0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, [255, 127, 127, 255]);
}

#[test]
fn flatten_transparent_is_background() {
    let src = [0u8; 8];
    let mut dst = [9u8; 8];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, [10, 20, 30, 255, 10, 20, 30, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = [0u8; 4];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 8], true, [0, 0, 0, 255]).is_err());
}

#[test]
fn ensure_parent_dir_creates_missing_directories() {
    let base = std::env::temp_dir().join(format!("kinetype_parent_{}", std::process::id()));
    let file = base.join("a").join("b").join("out.mp4");
    ensure_parent_dir(&file).unwrap();
    assert!(base.join("a").join("b").is_dir());
    let _ = std::fs::remove_dir_all(&base);
}

#[test]
fn encoder_reads_rgba_from_stdin_and_writes_the_output_last() {
    let cfg = SinkConfig {
        width: 320,
        height: 180,
        fps: Fps::new(30000, 1001).unwrap(),
        bg_rgba: [0, 0, 0, 255],
    };
    let mut opts = FfmpegSinkOpts::new("out/clip.mp4");
    opts.overwrite = false;
    let args: Vec<String> = encoder_args(&cfg, &opts)
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args[0], "-n");
    let at = |flag: &str| args.iter().position(|a| a == flag).unwrap();
    assert_eq!(args[at("-s") + 1], "320x180");
    assert_eq!(args[at("-r") + 1], "30000/1001");
    assert_eq!(args[at("-i") + 1], "pipe:0");
    assert!(at("-r") < at("-i"));
    assert_eq!(args.last().map(String::as_str), Some("out/clip.mp4"));
}
