//! Image decoding and letterboxing onto the shared output canvas.

/// File and byte decoding into RGB8.
pub mod decode;
/// Output size resolution and aspect-preserving fit.
pub mod normalize;

pub use decode::{decode_image, load_image, probe_dimensions};
pub use normalize::{
    BASE_HEIGHT, CanvasNormalizer, FitRect, derive_frame_size, frame_size_from_dimensions,
};
