//! Render configuration and the compositor that drives a slideshow into a sink.

/// Slideshow configuration and render options.
pub mod config;
/// Validate, size, render, finalize.
pub mod compositor;

pub use compositor::{
    CompositorState, RenderReport, RenderedVideo, SlideshowCompositor, SlotReport, render_slideshow,
};
pub use config::{RenderOpts, SlideshowConfig, UnknownEffectPolicy};
