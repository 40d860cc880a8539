//! slidereel renders still-image slideshows into video.
//!
//! A render is a short pipeline:
//!
//! - Describe the show with a [`SlideshowConfig`]
//! - Plan and render it with a [`SlideshowCompositor`]
//! - Stream the ordered frames into a [`FrameSink`] ([`FfmpegSink`] for MP4, [`InMemorySink`] for
//!   tests and previews)
//!
//! Every effect is a pure function of the normalized canvas and the frame's position inside its
//! slot, so identical inputs always produce identical frames.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image decoding and canvas normalization.
pub mod assets;
/// Per-frame effects and their registry.
pub mod effects;
/// Frame sinks.
pub mod encode;
/// Configuration and the slideshow compositor.
pub mod session;
/// Frame budgets and slot planning.
pub mod timeline;

pub use crate::foundation::core::{Affine, Fps, Frame, FrameIndex, FrameSize, Point};
pub use crate::foundation::error::{SlideError, SlideResult};
pub use crate::foundation::math::progress;

pub use crate::assets::{BASE_HEIGHT, CanvasNormalizer, FitRect};
pub use crate::effects::{EffectChain, EffectKind, EffectRegistry, PreparedChain};
pub use crate::encode::{FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, SinkConfig};
pub use crate::session::{
    CompositorState, RenderOpts, RenderReport, RenderedVideo, SlideshowCompositor,
    SlideshowConfig, SlotReport, UnknownEffectPolicy, render_slideshow,
};
pub use crate::timeline::{DurationAllocator, ImageSlot, Timeline};
