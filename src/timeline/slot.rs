use crate::effects::EffectChain;
use crate::foundation::core::{Fps, FrameIndex, FrameSize};
use std::path::{Path, PathBuf};

/// One input image's rendering unit: source, effect chain and frame budget.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageSlot {
    /// Position in the input list.
    pub index: usize,
    /// Image path as supplied by the caller.
    pub source: PathBuf,
    /// Effect names as supplied by the caller (after any fallback policy).
    pub effect_names: Vec<String>,
    /// Resolved chain for `effect_names`.
    pub chain: EffectChain,
    /// Allocated frame budget.
    pub frames: u64,
    /// Output index of the slot's first frame if every earlier slot is rendered.
    pub first_frame: FrameIndex,
}

impl ImageSlot {
    /// Source path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Return `true` when the slot has no frames to emit.
    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }
}

/// Ordered slots plus the global timing and output size.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    fps: Fps,
    duration_secs: f64,
    frame_size: Option<FrameSize>,
    slots: Vec<ImageSlot>,
}

impl Timeline {
    /// Assemble a timeline from already-allocated slots.
    ///
    /// `first_frame` offsets are recomputed from slot order.
    pub fn new(fps: Fps, duration_secs: f64, mut slots: Vec<ImageSlot>) -> Self {
        let mut next = 0u64;
        for slot in &mut slots {
            slot.first_frame = FrameIndex(next);
            next += slot.frames;
        }
        Self {
            fps,
            duration_secs,
            frame_size: None,
            slots,
        }
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Requested duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Target frame size, once resolved.
    pub fn frame_size(&self) -> Option<FrameSize> {
        self.frame_size
    }

    pub(crate) fn set_frame_size(&mut self, size: FrameSize) {
        self.frame_size = Some(size);
    }

    /// Slots in input order.
    pub fn slots(&self) -> &[ImageSlot] {
        &self.slots
    }

    /// Sum of every slot's budget.
    pub fn total_frames(&self) -> u64 {
        self.slots.iter().map(|s| s.frames).sum()
    }

    /// Locate the slot and local index that output frame `idx` falls into.
    pub fn locate(&self, idx: FrameIndex) -> Option<(&ImageSlot, u64)> {
        self.slots
            .iter()
            .find(|s| s.first_frame.0 <= idx.0 && idx.0 < s.first_frame.0 + s.frames)
            .map(|s| (s, idx.0 - s.first_frame.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/slot.rs"]
mod tests;
