//! Radial masks: spotlight, vignette and the pulsing glow.

use crate::effects::blur::blur_mask;
use crate::foundation::core::{Frame, FrameSize};
use crate::foundation::math::truncate_u8;

const SPOTLIGHT_KSIZE: u32 = 51;
const SPOTLIGHT_SIGMA: f64 = 20.0;
const SOFT_KSIZE: u32 = 101;
const SOFT_SIGMA: f64 = 50.0;

/// Heartbeats per clip for the pulsing glow.
const PULSE_BEATS: f32 = 4.0;
/// Glow tint (red, green, blue) relative to intensity.
const PULSE_TINT: [f32; 3] = [1.0, 0.8, 0.8];
const PULSE_OPACITY: f32 = 0.5;

/// Opening circle of light that grows towards the half diagonal as `progress` advances.
pub fn spotlight(src: &Frame, progress: f32) -> Frame {
    let size = src.size();
    let mask = spotlight_ramp(size, progress);
    let mask = blur_mask(&mask, size.width, size.height, SPOTLIGHT_KSIZE, SPOTLIGHT_SIGMA);
    multiply_by_mask(src, &mask)
}

/// Unblurred spotlight weights: 1 inside `cur_r`, falling linearly to 0 at `max_r`.
pub(crate) fn spotlight_ramp(size: FrameSize, progress: f32) -> Vec<f32> {
    let max_r = size.half_diagonal().floor() as f32;
    let cur_r = (max_r * progress).floor();
    let span = max_r - cur_r;

    radial_map(size, |d| {
        if span <= 0.0 {
            return if d <= cur_r { 1.0 } else { 0.0 };
        }
        1.0 - ((d - cur_r) / span).clamp(0.0, 1.0)
    })
}

/// Static darkening from the center to the corners.
pub fn vignette(src: &Frame) -> Frame {
    VignetteMask::new(src.size()).apply(src)
}

/// Blurred vignette weights for one frame size.
///
/// The vignette does not depend on time, so a renderer builds this once per slot and reuses it for
/// every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct VignetteMask {
    size: FrameSize,
    weights: Vec<f32>,
}

impl VignetteMask {
    /// Build the mask for frames of `size`.
    pub fn new(size: FrameSize) -> Self {
        let max_r = size.half_diagonal().floor().max(1.0) as f32;
        let ramp = radial_map(size, |d| 1.0 - (d / max_r).clamp(0.0, 1.0));
        let weights = blur_mask(&ramp, size.width, size.height, SOFT_KSIZE, SOFT_SIGMA);
        Self { size, weights }
    }

    /// Frame size the mask was built for.
    pub fn size(&self) -> FrameSize {
        self.size
    }

    /// Darken `src`. Frames of another size get a freshly built mask.
    pub fn apply(&self, src: &Frame) -> Frame {
        if src.size() != self.size {
            return vignette(src);
        }
        multiply_by_mask(src, &self.weights)
    }
}

/// Tinted glow whose radius and brightness beat four times per clip.
pub fn heart_pulse(src: &Frame, progress: f32) -> Frame {
    let size = src.size();
    let cycle = progress * PULSE_BEATS * std::f32::consts::TAU;
    let intensity = 0.7 + 0.3 * cycle.sin().abs();
    let max_r = (size.width.min(size.height) as f32 * 0.6).floor();
    let radius = (max_r * (0.5 + 0.3 * cycle.sin())).floor();

    let disc = radial_map(size, |d| if d <= radius { 1.0 } else { 0.0 });
    let mask = blur_mask(&disc, size.width, size.height, SOFT_KSIZE, SOFT_SIGMA);

    let mut out = src.clone();
    for (px, &m) in out.data.chunks_exact_mut(3).zip(&mask) {
        for (v, tint) in px.iter_mut().zip(PULSE_TINT) {
            let glow = m * intensity * tint * 255.0;
            *v = truncate_u8((f32::from(*v) + PULSE_OPACITY * glow).clamp(0.0, 255.0));
        }
    }
    out
}

/// Evaluate `f(distance_from_center)` for every pixel.
fn radial_map(size: FrameSize, f: impl Fn(f32) -> f32) -> Vec<f32> {
    let c = size.center();
    let (cx, cy) = (c.x as f32, c.y as f32);
    let mut mask = Vec::with_capacity(size.area());
    for y in 0..size.height {
        let dy = y as f32 - cy;
        for x in 0..size.width {
            let dx = x as f32 - cx;
            mask.push(f((dx * dx + dy * dy).sqrt()));
        }
    }
    mask
}

fn multiply_by_mask(src: &Frame, mask: &[f32]) -> Frame {
    let mut out = src.clone();
    for (px, &m) in out.data.chunks_exact_mut(3).zip(mask) {
        for v in px.iter_mut() {
            *v = truncate_u8(f32::from(*v) * m);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/mask.rs"]
mod tests;
