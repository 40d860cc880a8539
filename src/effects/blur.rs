use crate::effects::tone::blend_frames;
use crate::foundation::core::Frame;

/// Sigma implied by an odd kernel size when none is given (`0.3*((k-1)*0.5-1)+0.8`).
pub fn sigma_for_kernel(ksize: u32) -> f64 {
    0.3 * ((f64::from(ksize) - 1.0) * 0.5 - 1.0) + 0.8
}

/// Separable Gaussian blur of an RGB8 frame with a `ksize x ksize` kernel.
///
/// `ksize` is forced odd; a kernel of 1 returns the input unchanged. Edges replicate the border
/// pixel.
pub fn blur_rgb8(src: &Frame, ksize: u32, sigma: f64) -> Frame {
    let radius = (ksize | 1) / 2;
    if radius == 0 || src.data.is_empty() {
        return src.clone();
    }

    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = vec![0u8; src.data.len()];
    let mut out = vec![0u8; src.data.len()];
    horizontal_pass_u8(&src.data, &mut tmp, src.width, src.height, &kernel);
    vertical_pass_u8(&tmp, &mut out, src.width, src.height, &kernel);

    Frame {
        width: src.width,
        height: src.height,
        data: out,
    }
}

/// Sharp-to-soft transition: blur with kernel `(1 + 10p) | 1`, blended over the original by `p`.
pub fn progressive_blur(src: &Frame, progress: f32) -> Frame {
    let ksize = progressive_kernel(progress);
    let blurred = blur_rgb8(src, ksize, sigma_for_kernel(ksize));
    blend_frames(src, &blurred, progress)
}

/// Odd kernel size used by [`progressive_blur`] at `progress`.
pub(crate) fn progressive_kernel(progress: f32) -> u32 {
    ((1.0 + 10.0 * progress) as u32) | 1
}

/// Separable Gaussian blur of a single-channel `f32` mask.
pub fn blur_mask(mask: &[f32], width: u32, height: u32, ksize: u32, sigma: f64) -> Vec<f32> {
    let radius = (ksize | 1) / 2;
    if radius == 0 || mask.is_empty() {
        return mask.to_vec();
    }

    let kernel: Vec<f32> = gaussian_weights(radius, sigma)
        .into_iter()
        .map(|w| w as f32)
        .collect();
    let w = width as i32;
    let h = height as i32;
    let r = radius as i32;

    let mut tmp = vec![0f32; mask.len()];
    for y in 0..h {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = 0f32;
            for (ki, &kw) in kernel.iter().enumerate() {
                let sx = (x + ki as i32 - r).clamp(0, w - 1);
                acc += kw * mask[row + sx as usize];
            }
            tmp[row + x as usize] = acc;
        }
    }

    let mut out = vec![0f32; mask.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0f32;
            for (ki, &kw) in kernel.iter().enumerate() {
                let sy = (y + ki as i32 - r).clamp(0, h - 1);
                acc += kw * tmp[(sy * w + x) as usize];
            }
            out[(y * w + x) as usize] = acc;
        }
    }
    out
}

fn gaussian_weights(radius: u32, sigma: f64) -> Vec<f64> {
    let sigma = if sigma.is_finite() && sigma > 0.0 {
        sigma
    } else {
        sigma_for_kernel(2 * radius + 1)
    };
    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights.push(w);
        sum += w;
    }
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> Vec<u32> {
    let weights_f = gaussian_weights(radius, sigma);

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (wf * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Fold rounding drift into the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    weights
}

fn horizontal_pass_u8(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass_u8(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
