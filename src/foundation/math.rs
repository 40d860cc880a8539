#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Progress ratio `frame_idx / total_frames`.
///
/// Single-frame (and empty) spans report `0.0`.
pub fn progress(frame_idx: u64, total_frames: u64) -> f32 {
    if total_frames <= 1 {
        return 0.0;
    }
    (frame_idx as f64 / total_frames as f64) as f32
}

/// Round and clamp into `0..=255`.
#[inline]
pub(crate) fn saturate_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Truncate toward zero and clamp into `0..=255`.
#[inline]
pub(crate) fn truncate_u8(v: f32) -> u8 {
    // `as` saturates and maps NaN to 0.
    v as u8
}

/// `sat(a * wa + b * wb)`, the weighted sum used by every blend.
#[inline]
pub(crate) fn add_weighted(a: u8, wa: f32, b: u8, wb: f32) -> u8 {
    saturate_u8(f32::from(a) * wa + f32::from(b) * wb)
}

/// Rec.601 luma, rounded.
#[inline]
pub(crate) fn luma(px: [u8; 3]) -> u8 {
    saturate_u8(0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
