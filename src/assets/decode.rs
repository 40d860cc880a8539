use crate::foundation::core::FrameSize;
use crate::foundation::error::{SlideError, SlideResult};
use image::RgbImage;
use std::path::Path;

/// Read and decode an image file into RGB8. Any alpha channel is discarded.
pub fn load_image(path: &Path) -> SlideResult<RgbImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| SlideError::decode(format!("read '{}': {e}", path.display())))?;
    decode_image(&bytes).map_err(|e| match e {
        SlideError::Decode(msg) => SlideError::decode(format!("'{}': {msg}", path.display())),
        other => other,
    })
}

/// Decode encoded image bytes into RGB8.
///
/// Alpha is dropped without premultiplying, so a translucent pixel keeps its stored color.
pub fn decode_image(bytes: &[u8]) -> SlideResult<RgbImage> {
    let dyn_img = image::load_from_memory(bytes).map_err(|e| SlideError::decode(e.to_string()))?;
    Ok(dyn_img.to_rgb8())
}

/// Read only the image header to learn its dimensions.
pub fn probe_dimensions(path: &Path) -> SlideResult<FrameSize> {
    let (w, h) = image::image_dimensions(path)
        .map_err(|e| SlideError::decode(format!("'{}': {e}", path.display())))?;
    FrameSize::new(w, h)
        .map_err(|_| SlideError::decode(format!("'{}' has no pixels", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
