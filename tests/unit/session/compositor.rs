use super::*;
use crate::encode::InMemorySink;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "slidereel_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(dir: &Path, name: &str, w: u32, h: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(w, h, image::Rgb(rgb))
        .save(&path)
        .unwrap();
    path
}

/// Sink that records whether it was touched at all.
#[derive(Default)]
struct CountingSink {
    begins: u32,
    frames: u64,
    ends: u32,
}

impl FrameSink for CountingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> SlideResult<()> {
        self.begins += 1;
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &Frame) -> SlideResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn end(&mut self) -> SlideResult<()> {
        self.ends += 1;
        Ok(())
    }
}

#[test]
fn lifecycle_moves_from_idle_to_finalized_once() {
    let dir = temp_dir("lifecycle");
    let a = write_png(&dir, "a.png", 8, 4, [10, 20, 30]);
    let cfg = SlideshowConfig::new([&a]).with_fps(5).with_duration_secs(1.0);

    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    assert_eq!(comp.state(), CompositorState::Idle);
    assert_eq!(comp.validate().unwrap().total_frames(), 5);
    assert_eq!(comp.state(), CompositorState::Validated);

    let mut sink = CountingSink::default();
    let report = comp.render(&mut sink).unwrap();
    assert_eq!(comp.state(), CompositorState::Finalized);
    assert_eq!((sink.begins, sink.frames, sink.ends), (1, 5, 1));
    assert_eq!(report.frames_written, 5);
    assert_eq!(report.frame_size, FrameSize::new(2160, 1080).unwrap());

    let err = comp.render(&mut sink).unwrap_err();
    assert!(matches!(err, SlideError::Render(_)));
    assert_eq!(sink.begins, 1);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unknown_effect_fails_before_the_sink_is_touched() {
    let dir = temp_dir("unknown_effect");
    let a = write_png(&dir, "a.png", 4, 4, [1, 2, 3]);
    let cfg = SlideshowConfig::new([&a]).with_effects(&a, ["zoom", "sparkle"]);

    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let mut sink = CountingSink::default();
    let err = comp.render(&mut sink).unwrap_err();
    assert!(matches!(err, SlideError::UnknownEffect(ref n) if n == "sparkle"));
    assert_eq!(comp.state(), CompositorState::Failed);
    assert_eq!((sink.begins, sink.frames, sink.ends), (0, 0, 0));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn passthrough_policy_drops_unknown_names_with_a_warning() {
    let dir = temp_dir("passthrough");
    let a = write_png(&dir, "a.png", 4, 4, [1, 2, 3]);
    let cfg = SlideshowConfig::new([&a])
        .with_fps(2)
        .with_duration_secs(1.0)
        .with_frame_size(FrameSize::new(4, 4).unwrap())
        .with_effects(&a, ["sparkle", "grayscale"])
        .with_unknown_effects(UnknownEffectPolicy::Passthrough);

    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let slot = &comp.validate().unwrap().slots()[0];
    assert_eq!(slot.effect_names, vec!["grayscale".to_owned()]);

    let mut sink = InMemorySink::new();
    let report = comp.render(&mut sink).unwrap();
    assert_eq!(report.slots[0].effects, vec!["grayscale".to_owned()]);
    assert!(report.warnings.iter().any(|w| w.contains("sparkle")));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn unmatched_override_keys_become_warnings() {
    let dir = temp_dir("unmatched");
    let a = write_png(&dir, "a.png", 4, 4, [1, 2, 3]);
    let cfg = SlideshowConfig::new([&a])
        .with_fps(2)
        .with_duration_secs(1.0)
        .with_duration("nope.png", 0.5);

    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let report = comp.render(&mut InMemorySink::new()).unwrap();
    assert_eq!(report.frames_written, 2);
    assert!(report.warnings.iter().any(|w| w.contains("nope.png")));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn validation_failure_leaves_no_output() {
    let cfg = SlideshowConfig::new(["a.png"]).with_duration_secs(0.0);
    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let mut sink = CountingSink::default();
    let err = comp.render(&mut sink).unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(sink.begins, 0);
}

#[test]
fn pinned_durations_exceeding_the_total_are_rejected() {
    let cfg = SlideshowConfig::new(["a.png", "b.png"])
        .with_fps(10)
        .with_duration_secs(2.0)
        .with_duration("a.png", 3.0);
    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    assert!(matches!(comp.validate(), Err(SlideError::Validation(_))));
}

#[test]
fn all_images_unreadable_is_unrenderable() {
    let dir = temp_dir("all_unreadable");
    let bogus = dir.join("bogus.png");
    std::fs::write(&bogus, b"not a png").unwrap();
    let cfg = SlideshowConfig::new([&bogus]).with_fps(2).with_duration_secs(1.0);

    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let err = comp.render(&mut InMemorySink::new()).unwrap_err();
    assert!(matches!(err, SlideError::Unrenderable(_)));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn explicit_size_with_only_unreadable_images_never_touches_the_sink() {
    let dir = temp_dir("explicit_unreadable");
    let bogus = dir.join("bogus.png");
    std::fs::write(&bogus, b"garbage").unwrap();
    let cfg = SlideshowConfig::new([&bogus])
        .with_fps(2)
        .with_duration_secs(1.0)
        .with_frame_size(FrameSize::new(4, 4).unwrap());

    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let mut sink = CountingSink::default();
    let err = comp.render(&mut sink).unwrap_err();
    assert!(matches!(err, SlideError::Unrenderable(_)));
    assert_eq!((sink.begins, sink.frames, sink.ends), (0, 0, 0));
    assert_eq!(comp.state(), CompositorState::Failed);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn readable_header_with_corrupt_body_never_touches_the_sink() {
    let dir = temp_dir("truncated_body");
    let mut bytes = Vec::new();
    let noisy = image::RgbImage::from_fn(64, 48, |x, y| {
        image::Rgb([(x * 37 + y * 11) as u8, (x * y) as u8, (x ^ y) as u8])
    });
    image::DynamicImage::ImageRgb8(noisy)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    let truncated = dir.join("truncated.png");
    std::fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();
    assert!(crate::assets::probe_dimensions(&truncated).is_ok());

    let cfg = SlideshowConfig::new([&truncated])
        .with_fps(2)
        .with_duration_secs(1.0);
    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let mut sink = CountingSink::default();
    let err = comp.render(&mut sink).unwrap_err();
    assert!(matches!(err, SlideError::Unrenderable(_)));
    assert_eq!((sink.begins, sink.frames, sink.ends), (0, 0, 0));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn sink_begins_only_when_a_later_slot_decodes() {
    let dir = temp_dir("late_begin");
    let bogus = dir.join("bogus.png");
    std::fs::write(&bogus, b"garbage").unwrap();
    let good = write_png(&dir, "good.png", 4, 4, [9, 9, 9]);
    let cfg = SlideshowConfig::new([&bogus, &good])
        .with_fps(2)
        .with_duration_secs(2.0)
        .with_frame_size(FrameSize::new(4, 4).unwrap());

    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let mut sink = CountingSink::default();
    let report = comp.render(&mut sink).unwrap();
    assert_eq!((sink.begins, sink.frames, sink.ends), (1, 2, 1));
    assert_eq!(report.skipped().count(), 1);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn preview_frame_matches_rendered_frame() {
    let dir = temp_dir("preview");
    let a = write_png(&dir, "a.png", 6, 4, [200, 100, 50]);
    let b = write_png(&dir, "b.png", 4, 4, [20, 200, 90]);
    let cfg = SlideshowConfig::new([&a, &b])
        .with_fps(4)
        .with_duration_secs(2.0)
        .with_frame_size(FrameSize::new(8, 6).unwrap())
        .with_effects(&b, ["fade_in", "vignette"]);

    let mut comp = SlideshowCompositor::new(cfg, RenderOpts::default());
    let preview = comp.preview_frame(1, 2).unwrap();
    assert_eq!(comp.state(), CompositorState::Validated);
    assert!(comp.preview_frame(1, 4).is_err());
    assert!(comp.preview_frame(2, 0).is_err());

    let mut sink = InMemorySink::new();
    comp.render(&mut sink).unwrap();
    let (idx, rendered) = &sink.frames()[6];
    assert_eq!(*idx, FrameIndex(6));
    assert_eq!(rendered, &preview);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn build_thread_pool_rejects_zero_threads() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert_eq!(build_thread_pool(Some(2)).unwrap().current_num_threads(), 2);
}
