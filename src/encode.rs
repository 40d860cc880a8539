//! Frame sinks. Sinks consume rendered frames in output order.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
