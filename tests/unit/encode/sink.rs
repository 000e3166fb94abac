use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::default(),
        bg_rgba: [0, 0, 0, 255],
    }
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> FrameRGBA {
    let mut f = FrameRGBA::new(width, height);
    f.data.chunks_exact_mut(4).for_each(|px| px.copy_from_slice(&rgba));
    f
}

#[test]
fn in_memory_sink_keeps_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(4, 2)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(4, 2, [1, 2, 3, 255])).unwrap();
    sink.push_frame(FrameIndex(2), &solid(4, 2, [4, 5, 6, 255])).unwrap();
    sink.end().unwrap();

    assert!(sink.is_ended());
    assert_eq!(sink.config().map(|c| c.width), Some(4));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 2]);
    assert_eq!(sink.frames()[1].1.pixel(0, 0), Some([4, 5, 6, 255]));
}

#[test]
fn sinks_reject_repeated_or_backward_indices() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg(2, 2)).unwrap();
    sink.push_frame(FrameIndex(3), &solid(2, 2, [0; 4])).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &solid(2, 2, [0; 4])).is_err());
    assert!(sink.push_frame(FrameIndex(1), &solid(2, 2, [0; 4])).is_err());
    assert_eq!(sink.frames().len(), 1);
}

#[test]
fn sinks_reject_size_mismatch_and_push_before_begin() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &solid(2, 2, [0; 4])).is_err());
    sink.begin(cfg(2, 2)).unwrap();
    let err = sink
        .push_frame(FrameIndex(0), &solid(3, 2, [0; 4]))
        .unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn png_sequence_writes_numbered_files() {
    let dir = std::env::temp_dir().join(format!("kinetype_png_seq_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg(3, 3)).unwrap();
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &solid(3, 3, [200, 10, 10, 255]))
            .unwrap();
    }
    sink.end().unwrap();

    assert_eq!(sink.written(), 3);
    let path = sink.frame_path(FrameIndex(2));
    assert!(path.ends_with("frame_00002.png"));
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 3));
    assert_eq!(img.get_pixel(1, 1).0, [200, 10, 10, 255]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn png_is_written_with_straight_alpha() {
    let dir = std::env::temp_dir().join(format!("kinetype_png_one_{}", std::process::id()));
    let path = dir.join("nested").join("one.png");
    // Premultiplied half-transparent red.
    let frame = solid(1, 1, [128, 0, 0, 128]);
    write_png(&path, &frame).unwrap();
    let img = image::open(&path).unwrap().to_rgba8();
    let px = img.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!(px[0] >= 254);
    let _ = std::fs::remove_dir_all(&dir);
}
