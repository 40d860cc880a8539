use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, Frame, FrameIndex};
use crate::foundation::error::{SlideError, SlideResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB8 frames to stdin.
///
/// Output is H.264 in yuv420p with `+faststart`, with no audio stream.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    frames_written: u64,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
            frames_written: 0,
        }
    }

    /// Output path.
    pub fn out_path(&self) -> &Path {
        &self.opts.out_path
    }

    /// Frames written to `ffmpeg` so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> SlideResult<()> {
        if self.child.is_some() {
            return Err(SlideError::encode("ffmpeg sink already started"));
        }
        validate_sink_config(&cfg)?;

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(SlideError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(SlideError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args(ffmpeg_args(&cfg, &self.opts));

        let mut child = cmd.spawn().map_err(|e| {
            SlideError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SlideError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SlideError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            size = %cfg.size,
            fps = cfg.fps.as_f64(),
            "spawned ffmpeg"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.frames_written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlideResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SlideError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(SlideError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.size() != cfg.size {
            return Err(SlideError::validation(format!(
                "frame size mismatch: got {}, expected {}",
                frame.size(),
                cfg.size
            )));
        }
        if frame.data.len() != cfg.size.rgb_len() {
            return Err(SlideError::validation(
                "frame.data size mismatch with width*height*3",
            ));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlideError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            SlideError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> SlideResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| SlideError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| SlideError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SlideError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| SlideError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(SlideError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        tracing::debug!(frames = self.frames_written, "ffmpeg finished");
        self.cfg = None;
        Ok(())
    }
}

fn validate_sink_config(cfg: &SinkConfig) -> SlideResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(SlideError::validation("fps must be non-zero"));
    }
    if cfg.size.width == 0 || cfg.size.height == 0 {
        return Err(SlideError::validation(
            "ffmpeg sink width/height must be non-zero",
        ));
    }
    if !cfg.size.width.is_multiple_of(2) || !cfg.size.height.is_multiple_of(2) {
        return Err(SlideError::validation(
            "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
        ));
    }
    Ok(())
}

fn ffmpeg_args(cfg: &SinkConfig, opts: &FfmpegSinkOpts) -> Vec<String> {
    let mut args: Vec<String> = Vec::with_capacity(24);
    args.push(if opts.overwrite { "-y" } else { "-n" }.to_owned());
    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
        ]
        .map(str::to_owned),
    );
    args.push(cfg.size.to_string());
    args.extend(input_fps_args(cfg.fps));
    args.extend(["-i", "pipe:0"].map(str::to_owned));
    args.extend(
        [
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(str::to_owned),
    );
    args.push(opts.out_path.to_string_lossy().into_owned());
    args
}

fn input_fps_args(fps: Fps) -> [String; 2] {
    // For rawvideo input `-r` goes before `-i`; rational rates pass through as `num/den`.
    ["-r".to_owned(), format!("{}/{}", fps.num, fps.den)]
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SlideResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
