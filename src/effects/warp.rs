use crate::foundation::core::{Affine, Frame, Point};

/// Uniformly scale `src` about its integer center, resampling bilinearly.
///
/// Destination pixels that map outside the source are black.
pub fn scale_about_center(src: &Frame, scale: f64) -> Frame {
    let center = src.size().center();
    warp_affine(src, Affine::scale_about(scale, center))
}

/// Forward-map `src` through `xform`, sampling with the inverse transform.
pub fn warp_affine(src: &Frame, xform: Affine) -> Frame {
    let [a, b, c, d, e, f] = xform.inverse().as_coeffs();
    let mut out = Frame::black(src.size());
    for y in 0..src.height {
        let yf = f64::from(y);
        for x in 0..src.width {
            let xf = f64::from(x);
            let sx = a * xf + c * yf + e;
            let sy = b * xf + d * yf + f;
            let px = sample_bilinear(src, Point::new(sx, sy));
            let i = out.offset(x, y);
            out.data[i..i + 3].copy_from_slice(&px);
        }
    }
    out
}

/// Bilinear sample; taps outside the frame contribute black.
fn sample_bilinear(src: &Frame, p: Point) -> [u8; 3] {
    let w = i64::from(src.width);
    let h = i64::from(src.height);
    if !(p.x > -1.0 && p.y > -1.0 && p.x < w as f64 && p.y < h as f64) {
        return [0, 0, 0];
    }

    let x0 = p.x.floor();
    let y0 = p.y.floor();
    let fx = (p.x - x0) as f32;
    let fy = (p.y - y0) as f32;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let tap = |x: i64, y: i64| -> [f32; 3] {
        if x < 0 || y < 0 || x >= w || y >= h {
            return [0.0; 3];
        }
        let px = src.pixel(x as u32, y as u32);
        [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])]
    };

    let p00 = tap(x0, y0);
    let p10 = tap(x0 + 1, y0);
    let p01 = tap(x0, y0 + 1);
    let p11 = tap(x0 + 1, y0 + 1);

    let mut out = [0u8; 3];
    for ch in 0..3 {
        let top = p00[ch] + (p10[ch] - p00[ch]) * fx;
        let bottom = p01[ch] + (p11[ch] - p01[ch]) * fx;
        out[ch] = crate::foundation::math::saturate_u8(top + (bottom - top) * fy);
    }
    out
}

/// Shift `src` right by `offset` pixels onto a black canvas.
pub fn shift_right(src: &Frame, offset: u32) -> Frame {
    let mut out = Frame::black(src.size());
    if offset >= src.width {
        return out;
    }
    let row_bytes = (src.width as usize) * Frame::CHANNELS;
    let shift_bytes = (offset as usize) * Frame::CHANNELS;
    for (dst_row, src_row) in out
        .data
        .chunks_exact_mut(row_bytes)
        .zip(src.data.chunks_exact(row_bytes))
    {
        dst_row[shift_bytes..].copy_from_slice(&src_row[..row_bytes - shift_bytes]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/warp.rs"]
mod tests;
