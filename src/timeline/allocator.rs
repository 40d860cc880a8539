use crate::foundation::core::Fps;
use crate::foundation::error::{SlideError, SlideResult};

/// Splits a total duration into exact per-slot frame budgets.
///
/// The budgets always sum to `round(fps * duration_secs)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurationAllocator {
    fps: Fps,
    duration_secs: f64,
    total_frames: u64,
}

impl DurationAllocator {
    /// Validate timing and compute the total frame budget.
    pub fn new(fps: Fps, duration_secs: f64) -> SlideResult<Self> {
        if fps.num == 0 || fps.den == 0 {
            return Err(SlideError::validation("fps must be > 0"));
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(SlideError::validation(format!(
                "total duration must be a positive number of seconds, got {duration_secs}"
            )));
        }
        let total_frames = fps.secs_to_frames_round(duration_secs);
        if total_frames == 0 {
            return Err(SlideError::validation(format!(
                "total duration {duration_secs}s is shorter than one frame at {} fps",
                fps.as_f64()
            )));
        }
        Ok(Self {
            fps,
            duration_secs,
            total_frames,
        })
    }

    /// Frame rate used for every conversion.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Requested duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// `round(fps * duration_secs)`.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Even split across `slots`; the integer-division remainder lands on the last slot.
    pub fn allocate_even(&self, slots: usize) -> SlideResult<Vec<u64>> {
        self.allocate(&vec![None; slots])
    }

    /// Allocate one budget per entry of `overrides`.
    ///
    /// `Some(secs)` pins a slot to `round(fps * secs)` frames. Unpinned slots split what is left
    /// evenly, the remainder going to the last unpinned slot. When every slot is pinned, any
    /// leftover budget goes to the last slot.
    pub fn allocate(&self, overrides: &[Option<f64>]) -> SlideResult<Vec<u64>> {
        if overrides.is_empty() {
            return Err(SlideError::validation("cannot allocate frames for zero images"));
        }

        let mut frames = vec![0u64; overrides.len()];
        let mut pinned_total = 0u64;
        let mut unpinned = Vec::with_capacity(overrides.len());
        for (i, ov) in overrides.iter().enumerate() {
            match *ov {
                Some(secs) => {
                    if !secs.is_finite() || secs < 0.0 {
                        return Err(SlideError::validation(format!(
                            "duration override for slot {i} must be a non-negative number of seconds, got {secs}"
                        )));
                    }
                    frames[i] = self.fps.secs_to_frames_round(secs);
                    pinned_total = pinned_total.saturating_add(frames[i]);
                }
                None => unpinned.push(i),
            }
        }

        if pinned_total > self.total_frames {
            return Err(SlideError::validation(format!(
                "duration overrides need {pinned_total} frames but only {} fit in {}s at {} fps",
                self.total_frames,
                self.duration_secs,
                self.fps.as_f64()
            )));
        }

        let remaining = self.total_frames - pinned_total;
        match unpinned.split_last() {
            None => {
                if let Some(last) = frames.last_mut() {
                    *last += remaining;
                }
            }
            Some((&last, rest)) => {
                let base = remaining / unpinned.len() as u64;
                for &i in rest {
                    frames[i] = base;
                }
                frames[last] = remaining - base * rest.len() as u64;
            }
        }

        debug_assert_eq!(frames.iter().sum::<u64>(), self.total_frames);
        tracing::debug!(
            total_frames = self.total_frames,
            slots = frames.len(),
            pinned = frames.len() - unpinned.len(),
            "allocated frame budgets"
        );
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/allocator.rs"]
mod tests;
