use crate::foundation::core::{Fps, Frame, FrameIndex, FrameSize};
use crate::foundation::error::{SlideError, SlideResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkConfig {
    /// Output frame size.
    pub size: FrameSize,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Append-only consumer of rendered frames.
///
/// Ordering contract: `begin` once, then `push_frame` with strictly increasing `FrameIndex`, then
/// `end` exactly once.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SlideResult<()>;
    /// Push one frame in strictly increasing output order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlideResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> SlideResult<()>;
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Frame)>,
    finalized: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in output order.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }

    /// Return `true` once `end` has been called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SlideResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finalized = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> SlideResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| SlideError::encode("in-memory sink not started"))?;
        if self.finalized {
            return Err(SlideError::encode("in-memory sink is already finalized"));
        }
        if let Some((last, _)) = self.frames.last()
            && idx <= *last
        {
            return Err(SlideError::encode(
                "in-memory sink received out-of-order frame index",
            ));
        }
        if frame.size() != cfg.size {
            return Err(SlideError::encode(format!(
                "frame size mismatch: got {}, expected {}",
                frame.size(),
                cfg.size
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SlideResult<()> {
        if self.finalized {
            return Err(SlideError::encode("in-memory sink finalized twice"));
        }
        self.finalized = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
