//! Full-frame color and brightness transforms.

use crate::foundation::core::Frame;
use crate::foundation::math::{add_weighted, luma, truncate_u8};

/// Warm overlay color (orange) used by the first half of the color shift.
pub const WARM_RGB: [u8; 3] = [255, 100, 40];
/// Cool overlay color (blue) used by the second half of the color shift.
pub const COOL_RGB: [u8; 3] = [60, 150, 255];

/// Multiply every channel by `alpha`, truncating.
pub fn scale_brightness(src: &Frame, alpha: f32) -> Frame {
    map_bytes(src, |v| truncate_u8(f32::from(v) * alpha))
}

/// Blend towards the per-pixel luma by `alpha`.
pub fn desaturate(src: &Frame, alpha: f32) -> Frame {
    let mut out = src.clone();
    for px in out.data.chunks_exact_mut(3) {
        let gray = luma([px[0], px[1], px[2]]);
        for v in px.iter_mut() {
            *v = add_weighted(*v, 1.0 - alpha, gray, alpha);
        }
    }
    out
}

/// Warm then cool tint over the clip, continuous at the midpoint.
pub fn color_shift(src: &Frame, progress: f32) -> Frame {
    if progress <= 0.5 {
        blend_solid(src, WARM_RGB, progress * 2.0)
    } else {
        let t = (progress - 0.5) * 2.0;
        let mut out = src.clone();
        let mixed: [u8; 3] =
            std::array::from_fn(|c| add_weighted(WARM_RGB[c], 1.0 - t, COOL_RGB[c], t));
        for px in out.data.chunks_exact_mut(3) {
            px.copy_from_slice(&mixed);
        }
        out
    }
}

/// Dim by `0.5 + 0.5 sin(2πp)` and blend the dimmed copy back over the original.
pub fn light_flicker(src: &Frame, progress: f32) -> Frame {
    let alpha = 0.5 + 0.5 * (std::f32::consts::TAU * progress).sin();
    map_bytes(src, |v| {
        let dim = truncate_u8(f32::from(v) * alpha);
        add_weighted(v, 1.0 - alpha, dim, alpha)
    })
}

/// `blend(src, color, alpha)` against a solid color.
pub fn blend_solid(src: &Frame, color: [u8; 3], alpha: f32) -> Frame {
    let mut out = src.clone();
    for px in out.data.chunks_exact_mut(3) {
        for (v, &c) in px.iter_mut().zip(&color) {
            *v = add_weighted(*v, 1.0 - alpha, c, alpha);
        }
    }
    out
}

/// `blend(a, b, alpha)` of two equally sized frames.
pub fn blend_frames(a: &Frame, b: &Frame, alpha: f32) -> Frame {
    debug_assert!(a.same_shape(b));
    let mut out = a.clone();
    for (v, &bv) in out.data.iter_mut().zip(&b.data) {
        *v = add_weighted(*v, 1.0 - alpha, bv, alpha);
    }
    out
}

fn map_bytes(src: &Frame, f: impl Fn(u8) -> u8) -> Frame {
    Frame {
        width: src.width,
        height: src.height,
        data: src.data.iter().map(|&v| f(v)).collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tone.rs"]
mod tests;
