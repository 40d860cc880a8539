//! Shapes composited over the frame at time-varying opacity and position.

use crate::foundation::core::Frame;
use crate::foundation::math::add_weighted;

const BUBBLE_RGB: [u8; 3] = [220, 20, 60];
const BORDER_RGB: [u8; 3] = [255, 215, 0];
const BORDER_OPACITY: f32 = 0.8;
const SHIMMER_RGB: [u8; 3] = [255, 255, 255];
const SHIMMER_PEAK_OPACITY: f32 = 0.35;

/// A red disc rising from the lower part of the frame, growing and becoming more opaque.
pub fn red_bubble(src: &Frame, progress: f32) -> Frame {
    let w = src.width as f32;
    let h = src.height as f32;
    let radius = w.min(h) * 0.08 * (1.0 + progress);
    let (cx, cy) = (w / 2.0, h * (0.8 - 0.6 * progress));
    let opacity = 0.3 + 0.4 * progress;

    let mut out = src.clone();
    for y in 0..src.height {
        let dy = y as f32 - cy;
        for x in 0..src.width {
            let dx = x as f32 - cx;
            // One-pixel linear ramp at the rim.
            let coverage = (radius - (dx * dx + dy * dy).sqrt() + 0.5).clamp(0.0, 1.0);
            if coverage > 0.0 {
                let i = out.offset(x, y);
                blend_px(&mut out.data[i..i + 3], BUBBLE_RGB, opacity * coverage);
            }
        }
    }
    out
}

/// Gold frame around the edges whose thickness breathes twice per clip.
pub fn highlight_border(src: &Frame, progress: f32) -> Frame {
    let base = src.width.min(src.height) as f32 * 0.05;
    let wave = 0.5 + 0.5 * (2.0 * std::f32::consts::TAU * progress).sin();
    let t = ((base * wave).round() as u32).max(1);

    let mut out = src.clone();
    for y in 0..src.height {
        let edge_row = y < t || y >= src.height.saturating_sub(t);
        for x in 0..src.width {
            if edge_row || x < t || x >= src.width.saturating_sub(t) {
                let i = out.offset(x, y);
                blend_px(&mut out.data[i..i + 3], BORDER_RGB, BORDER_OPACITY);
            }
        }
    }
    out
}

/// A soft diagonal band of light sweeping from the top-left to the bottom-right corner.
pub fn shimmer(src: &Frame, progress: f32) -> Frame {
    let w = src.width as f32;
    let h = src.height as f32;
    let half_width = (w.min(h) * 0.08).max(1.0);
    let center = -half_width + (w + h + 2.0 * half_width) * progress;

    let mut out = src.clone();
    for y in 0..src.height {
        for x in 0..src.width {
            let dist = ((x + y) as f32 - center).abs();
            if dist < half_width {
                let opacity = SHIMMER_PEAK_OPACITY * (1.0 - dist / half_width);
                let i = out.offset(x, y);
                blend_px(&mut out.data[i..i + 3], SHIMMER_RGB, opacity);
            }
        }
    }
    out
}

fn blend_px(px: &mut [u8], color: [u8; 3], opacity: f32) {
    for (v, c) in px.iter_mut().zip(color) {
        *v = add_weighted(*v, 1.0 - opacity, c, opacity);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/overlay.rs"]
mod tests;
