use crate::assets::decode::probe_dimensions;
use crate::foundation::core::{Frame, FrameSize};
use crate::foundation::error::{SlideError, SlideResult};
use image::RgbImage;
use image::imageops::FilterType;
use std::path::Path;

/// Output height used when the frame size is derived from the inputs.
pub const BASE_HEIGHT: u32 = 1080;

/// Placement of a letterboxed image inside the target frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitRect {
    /// Left padding in pixels.
    pub x: u32,
    /// Top padding in pixels.
    pub y: u32,
    /// Scaled image width.
    pub width: u32,
    /// Scaled image height.
    pub height: u32,
}

/// Fits arbitrary images onto one target frame by uniform scaling plus black padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasNormalizer {
    target: FrameSize,
}

impl CanvasNormalizer {
    /// Normalizer for an already-known target size.
    pub fn new(target: FrameSize) -> Self {
        Self { target }
    }

    /// Use `explicit` when given, otherwise derive the size from the images' aspect ratios.
    pub fn resolve<P: AsRef<Path>>(explicit: Option<FrameSize>, images: &[P]) -> SlideResult<Self> {
        match explicit {
            Some(size) => Ok(Self::new(size)),
            None => Ok(Self::new(derive_frame_size(images)?)),
        }
    }

    /// Target frame size.
    pub fn target(&self) -> FrameSize {
        self.target
    }

    /// Where an image of `src` dimensions lands inside the target, never cropped.
    pub fn fit_rect(&self, src: FrameSize) -> FitRect {
        let (tw, th) = (u64::from(self.target.width), u64::from(self.target.height));
        let (sw, sh) = (u64::from(src.width), u64::from(src.height));
        // scale = min(tw / sw, th / sh), kept in integers so the bound side is exact.
        let (width, height) = if tw * sh <= th * sw {
            (tw, (sh * tw / sw).clamp(1, th))
        } else {
            ((sw * th / sh).clamp(1, tw), th)
        };
        let (width, height) = (width as u32, height as u32);
        FitRect {
            x: (self.target.width - width) / 2,
            y: (self.target.height - height) / 2,
            width,
            height,
        }
    }

    /// Scale `img` to fit and center it on a black canvas of exactly the target size.
    pub fn fit(&self, img: &RgbImage) -> Frame {
        let (w, h) = img.dimensions();
        let mut out = Frame::black(self.target);
        if w == 0 || h == 0 {
            return out;
        }

        let rect = self.fit_rect(FrameSize {
            width: w,
            height: h,
        });
        let scaled;
        let pixels = if rect.width == w && rect.height == h {
            img
        } else {
            scaled = image::imageops::resize(img, rect.width, rect.height, FilterType::Triangle);
            &scaled
        };

        let row_bytes = (rect.width as usize) * Frame::CHANNELS;
        for (row, src_row) in pixels.as_raw().chunks_exact(row_bytes).enumerate() {
            let start = out.offset(rect.x, rect.y + row as u32);
            out.data[start..start + row_bytes].copy_from_slice(src_row);
        }
        out
    }
}

/// Derive a frame size from the mean aspect ratio of every readable image.
///
/// Height is [`BASE_HEIGHT`]; width is rounded down to an even number for yuv420p encoding.
pub fn derive_frame_size<P: AsRef<Path>>(images: &[P]) -> SlideResult<FrameSize> {
    let dims = images.iter().filter_map(|p| {
        let p = p.as_ref();
        match probe_dimensions(p) {
            Ok(size) => Some(size),
            Err(e) => {
                tracing::warn!(
                    image = %p.display(),
                    error = %e,
                    "skipping unreadable image for frame sizing"
                );
                None
            }
        }
    });
    frame_size_from_dimensions(dims)
}

/// Mean-aspect-ratio frame size for already-known dimensions.
pub fn frame_size_from_dimensions(
    dims: impl IntoIterator<Item = FrameSize>,
) -> SlideResult<FrameSize> {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for d in dims {
        sum += d.aspect_ratio();
        count += 1;
    }
    if count == 0 {
        return Err(SlideError::unrenderable(
            "no image could be read to infer the frame size",
        ));
    }

    let avg = sum / count as f64;
    let width = (f64::from(BASE_HEIGHT) * avg) as u32;
    let width = (width - width % 2).max(2);
    tracing::debug!(
        avg_aspect = avg,
        width,
        height = BASE_HEIGHT,
        readable = count,
        "derived frame size"
    );
    FrameSize::new(width, BASE_HEIGHT)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/normalize.rs"]
mod tests;
