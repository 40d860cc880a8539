use super::*;
use crate::foundation::core::FrameSize;

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        size: FrameSize::new(w, h).unwrap(),
        fps: Fps::new(30000, 1001).unwrap(),
    }
}

#[test]
fn args_stream_rgb24_into_h264_yuv420p() {
    let args = ffmpeg_args(&cfg(64, 36), &FfmpegSinkOpts::new("out/video.mp4"));
    let joined = args.join(" ");
    assert!(joined.starts_with("-y "));
    assert!(joined.contains("-f rawvideo -pix_fmt rgb24 -s 64x36"));
    assert!(joined.contains("-r 30000/1001 -i pipe:0"));
    assert!(joined.contains("-c:v libx264 -pix_fmt yuv420p -movflags +faststart"));
    assert_eq!(args.last().map(String::as_str), Some("out/video.mp4"));
}

#[test]
fn args_respect_no_overwrite() {
    let mut opts = FfmpegSinkOpts::new("a.mp4");
    opts.overwrite = false;
    assert_eq!(ffmpeg_args(&cfg(2, 2), &opts)[0], "-n");
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let dir = std::env::temp_dir().join("slidereel_ffmpeg_odd");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.join("x.mp4")));
    let err = sink.begin(cfg(63, 36)).unwrap_err();
    assert!(err.to_string().contains("even"));
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    let frame = Frame::black(FrameSize::new(2, 2).unwrap());
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn ensure_parent_dir_creates_nested_directories() {
    let root = std::env::temp_dir().join(format!("slidereel_parent_{}", std::process::id()));
    let target = root.join("a/b/out.mp4");
    ensure_parent_dir(&target).unwrap();
    assert!(root.join("a/b").is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
    let _ = std::fs::remove_dir_all(root);
}
