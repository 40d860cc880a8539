use crate::foundation::error::{SlideError, SlideResult};
use std::str::FromStr;

pub use kurbo::{Affine, Point};

/// Absolute 0-based frame index in output stream order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> SlideResult<Self> {
        if den == 0 {
            return Err(SlideError::validation("fps den must be > 0"));
        }
        if num == 0 {
            return Err(SlideError::validation("fps must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number frame rate, e.g. `Fps::whole(30)`.
    pub fn whole(fps: u32) -> SlideResult<Self> {
        Self::new(fps, 1)
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to a frame count, rounding to the nearest frame.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        (secs * self.as_f64()).round().max(0.0) as u64
    }
}

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Create a validated, non-empty frame size.
    pub fn new(width: u32, height: u32) -> SlideResult<Self> {
        if width == 0 || height == 0 {
            return Err(SlideError::validation(format!(
                "frame size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Width divided by height.
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Number of pixels.
    pub fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Byte length of a tightly packed RGB8 buffer of this size.
    pub fn rgb_len(self) -> usize {
        self.area() * Frame::CHANNELS
    }

    /// Frame center using integer pixel coordinates (`w/2`, `h/2`).
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width / 2), f64::from(self.height / 2))
    }

    /// Half of the frame diagonal, i.e. the distance from the center to a corner.
    pub fn half_diagonal(self) -> f64 {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        (w * w + h * h).sqrt() / 2.0
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for FrameSize {
    type Err = SlideError;

    /// Parse `WIDTHxHEIGHT`, e.g. `1920x1080`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| SlideError::validation(format!("frame size '{s}' must be WxH")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| SlideError::validation(format!("frame size '{s}': {e}")))
        };
        Self::new(parse(w)?, parse(h)?)
    }
}

/// A rendered frame as tightly packed, row-major RGB8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl Frame {
    /// Channels per pixel.
    pub const CHANNELS: usize = 3;

    /// An all-black frame.
    pub fn black(size: FrameSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
            data: vec![0u8; size.rgb_len()],
        }
    }

    /// Wrap an existing RGB8 buffer, checking its length.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> SlideResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(Self::CHANNELS))
            .ok_or_else(|| SlideError::validation("frame buffer size overflow"))?;
        if data.len() != expected {
            return Err(SlideError::validation(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height} rgb8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame dimensions.
    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * Self::CHANNELS
    }

    /// Read pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Return `true` when both frames have identical dimensions.
    pub fn same_shape(&self, other: &Frame) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.data.len() == other.data.len()
    }

    /// Largest per-channel absolute difference, or `None` when shapes differ.
    pub fn max_abs_diff(&self, other: &Frame) -> Option<u8> {
        if !self.same_shape(other) {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a.abs_diff(*b))
                .max()
                .unwrap_or(0),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
