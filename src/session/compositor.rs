use crate::assets::{CanvasNormalizer, load_image};
use crate::effects::EffectRegistry;
use crate::encode::{FfmpegSink, FfmpegSinkOpts, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, Frame, FrameIndex, FrameSize};
use crate::foundation::error::{SlideError, SlideResult};
use crate::foundation::math::Fnv1a64;
use crate::session::config::{RenderOpts, SlideshowConfig, UnknownEffectPolicy};
use crate::timeline::{DurationAllocator, ImageSlot, Timeline};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Lifecycle of a [`SlideshowCompositor`]. A compositor renders at most once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositorState {
    /// Configuration accepted but not checked.
    Idle,
    /// Timeline planned and every effect chain resolved.
    Validated,
    /// Resolving the output frame size.
    Sizing,
    /// Pushing frames into the sink.
    Rendering,
    /// Sink finalized; the report has been returned.
    Finalized,
    /// A previous step returned an error.
    Failed,
}

/// Per-slot outcome of a render.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotReport {
    /// Position in the input list.
    pub index: usize,
    /// Image path.
    pub source: PathBuf,
    /// Effect names that were applied.
    pub effects: Vec<String>,
    /// Allocated frame budget.
    pub frames_planned: u64,
    /// Frames actually pushed to the sink.
    pub frames_written: u64,
    /// Why the slot was skipped, if it was.
    pub skipped: Option<String>,
}

/// Summary of one render call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderReport {
    /// Output frame size.
    pub frame_size: FrameSize,
    /// Output frame rate.
    pub fps: Fps,
    /// Sum of every slot's budget.
    pub frames_planned: u64,
    /// Frames pushed to the sink.
    pub frames_written: u64,
    /// One entry per input image, in order.
    pub slots: Vec<SlotReport>,
    /// Non-fatal problems: skipped images, ignored override keys, dropped effect names.
    pub warnings: Vec<String>,
    /// FNV-1a digest over every emitted frame's pixels in output order.
    pub digest: u64,
}

impl RenderReport {
    /// Slots whose image could not be decoded.
    pub fn skipped(&self) -> impl Iterator<Item = &SlotReport> + '_ {
        self.slots.iter().filter(|s| s.skipped.is_some())
    }

    /// Length of the emitted stream in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.frames_written)
    }
}

/// A finished MP4 render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedVideo {
    /// The encoded file.
    pub path: PathBuf,
    /// Render summary.
    pub report: RenderReport,
}

/// Turns a [`SlideshowConfig`] into an ordered frame stream.
///
/// All configuration problems (empty input, bad timing, unknown effect names) surface from
/// [`SlideshowCompositor::validate`] before a sink is touched. Frames reach the sink in slot order,
/// then frame order, regardless of [`RenderOpts::parallel`].
pub struct SlideshowCompositor {
    config: SlideshowConfig,
    opts: RenderOpts,
    registry: EffectRegistry,
    state: CompositorState,
    timeline: Option<Timeline>,
    warnings: Vec<String>,
}

impl SlideshowCompositor {
    /// Compositor using the built-in effect registry.
    pub fn new(config: SlideshowConfig, opts: RenderOpts) -> Self {
        Self {
            config,
            opts,
            registry: EffectRegistry::builtin(),
            state: CompositorState::Idle,
            timeline: None,
            warnings: Vec::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CompositorState {
        self.state
    }

    /// The configuration being rendered.
    pub fn config(&self) -> &SlideshowConfig {
        &self.config
    }

    /// The planned timeline, once validated.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Check the configuration, allocate frame budgets and resolve every effect chain.
    ///
    /// Idempotent once it has succeeded.
    pub fn validate(&mut self) -> SlideResult<&Timeline> {
        match self.state {
            CompositorState::Idle | CompositorState::Validated => {}
            other => {
                return Err(SlideError::render(format!(
                    "cannot validate a compositor in state {other:?}"
                )));
            }
        }
        if self.timeline.is_none() {
            match plan_timeline(&self.config, &self.opts, &self.registry) {
                Ok((timeline, warnings)) => {
                    self.timeline = Some(timeline);
                    self.warnings = warnings;
                }
                Err(e) => {
                    self.state = CompositorState::Failed;
                    return Err(e);
                }
            }
        }
        self.state = CompositorState::Validated;
        self.timeline
            .as_ref()
            .ok_or_else(|| SlideError::render("timeline missing after validation"))
    }

    /// Render every slot into `sink`.
    ///
    /// The sink is begun right before the first decoded slot emits and finalized exactly once.
    /// Images that fail to decode are skipped with a warning and their frames are not emitted. When
    /// no image decodes the sink is never touched and the render fails as unrenderable.
    #[tracing::instrument(
        skip_all,
        fields(images = self.config.images.len(), parallel = self.opts.parallel)
    )]
    pub fn render(&mut self, sink: &mut dyn FrameSink) -> SlideResult<RenderReport> {
        match self.state {
            CompositorState::Idle | CompositorState::Validated => {
                self.validate()?;
            }
            other => {
                return Err(SlideError::render(format!(
                    "compositor cannot render from state {other:?}; create a new one per render"
                )));
            }
        }

        let result = self.render_validated(sink);
        self.state = match result {
            Ok(_) => CompositorState::Finalized,
            Err(_) => CompositorState::Failed,
        };
        result
    }

    /// Render to an MP4 at `out`, overwriting any existing file. Requires `ffmpeg` on `PATH`.
    pub fn render_to_file(&mut self, out: impl Into<PathBuf>) -> SlideResult<RenderedVideo> {
        let path = out.into();
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(path.clone()));
        let report = self.render(&mut sink)?;
        Ok(RenderedVideo { path, report })
    }

    /// Compute a single frame of one slot without touching any sink or consuming the compositor.
    pub fn preview_frame(&mut self, slot_index: usize, frame_idx: u64) -> SlideResult<Frame> {
        self.validate()?;
        let timeline = self
            .timeline
            .as_ref()
            .ok_or_else(|| SlideError::render("timeline missing after validation"))?;
        let slot = timeline.slots().get(slot_index).ok_or_else(|| {
            SlideError::validation(format!(
                "slot {slot_index} out of range ({} images)",
                timeline.slots().len()
            ))
        })?;
        if frame_idx >= slot.frames {
            return Err(SlideError::validation(format!(
                "frame {frame_idx} out of range for slot {slot_index} ({} frames)",
                slot.frames
            )));
        }

        let normalizer = CanvasNormalizer::resolve(self.config.frame_size, &self.config.images)?;
        let canvas = normalizer.fit(&load_image(slot.source())?);
        let chain = slot.chain.prepare(canvas.size());
        Ok(chain.apply(&canvas, frame_idx, slot.frames))
    }

    fn render_validated(&mut self, sink: &mut dyn FrameSink) -> SlideResult<RenderReport> {
        self.state = CompositorState::Sizing;
        let normalizer = CanvasNormalizer::resolve(self.config.frame_size, &self.config.images)?;
        let size = normalizer.target();

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };
        let chunk = self.opts.normalized_chunk_size();

        let timeline = self
            .timeline
            .as_mut()
            .ok_or_else(|| SlideError::render("timeline missing after validation"))?;
        timeline.set_frame_size(size);
        let fps = timeline.fps();

        self.state = CompositorState::Rendering;

        let mut warnings = std::mem::take(&mut self.warnings);
        let mut emitter = Emitter {
            sink,
            cfg: SinkConfig { size, fps },
            started: false,
            next: 0,
            hasher: Fnv1a64::new_default(),
        };
        let mut slots = Vec::with_capacity(timeline.slots().len());
        for slot in timeline.slots() {
            let before = emitter.next;
            let skipped = if slot.is_empty() {
                tracing::debug!(slot = slot.index, "slot has no frames");
                None
            } else {
                match load_image(slot.source()) {
                    Ok(img) => {
                        let canvas = normalizer.fit(&img);
                        drop(img);
                        emitter.start()?;
                        render_slot(slot, &canvas, pool.as_ref(), chunk, &mut emitter)?;
                        None
                    }
                    Err(e) => {
                        tracing::warn!(
                            slot = slot.index,
                            image = %slot.source().display(),
                            error = %e,
                            frames = slot.frames,
                            "skipping unreadable image"
                        );
                        warnings.push(format!(
                            "skipped '{}' ({} frames): {e}",
                            slot.source().display(),
                            slot.frames
                        ));
                        Some(e.to_string())
                    }
                }
            };
            slots.push(SlotReport {
                index: slot.index,
                source: slot.source.clone(),
                effects: slot.effect_names.clone(),
                frames_planned: slot.frames,
                frames_written: emitter.next - before,
                skipped,
            });
        }

        let Emitter {
            sink,
            started,
            next,
            hasher,
            ..
        } = emitter;
        if !started {
            return Err(SlideError::unrenderable(
                "none of the input images could be decoded",
            ));
        }
        sink.end()?;

        let report = RenderReport {
            frame_size: size,
            fps,
            frames_planned: timeline.total_frames(),
            frames_written: next,
            slots,
            warnings,
            digest: hasher.finish(),
        };
        tracing::info!(
            frames = report.frames_written,
            planned = report.frames_planned,
            skipped = report.skipped().count(),
            size = %size,
            "render finalized"
        );
        Ok(report)
    }
}

/// Render `config` to an MP4 at `out` with default options and return the written path.
pub fn render_slideshow(config: SlideshowConfig, out: impl AsRef<Path>) -> SlideResult<PathBuf> {
    let mut compositor = SlideshowCompositor::new(config, RenderOpts::default());
    Ok(compositor.render_to_file(out.as_ref())?.path)
}

/// Pushes frames in output order. The sink is only begun once a slot has a decoded canvas.
struct Emitter<'a> {
    sink: &'a mut dyn FrameSink,
    cfg: SinkConfig,
    started: bool,
    next: u64,
    hasher: Fnv1a64,
}

impl Emitter<'_> {
    fn start(&mut self) -> SlideResult<()> {
        if !self.started {
            self.sink.begin(self.cfg)?;
            self.started = true;
        }
        Ok(())
    }

    fn push(&mut self, frame: &Frame) -> SlideResult<()> {
        self.sink.push_frame(FrameIndex(self.next), frame)?;
        self.hasher.write_bytes(&frame.data);
        self.next += 1;
        Ok(())
    }
}

fn render_slot(
    slot: &ImageSlot,
    canvas: &Frame,
    pool: Option<&rayon::ThreadPool>,
    chunk: u64,
    emitter: &mut Emitter<'_>,
) -> SlideResult<()> {
    let n = slot.frames;
    let chain = slot.chain.prepare(canvas.size());
    let Some(pool) = pool else {
        for i in 0..n {
            emitter.push(&chain.apply(canvas, i, n))?;
        }
        return Ok(());
    };

    let mut start = 0u64;
    while start < n {
        let end = (start + chunk).min(n);
        let frames: Vec<Frame> = pool.install(|| {
            (start as usize..end as usize)
                .into_par_iter()
                .map(|i| chain.apply(canvas, i as u64, n))
                .collect()
        });
        for frame in &frames {
            emitter.push(frame)?;
        }
        start = end;
    }
    Ok(())
}

fn plan_timeline(
    config: &SlideshowConfig,
    opts: &RenderOpts,
    registry: &EffectRegistry,
) -> SlideResult<(Timeline, Vec<String>)> {
    config.validate()?;
    opts.validate()?;
    let fps = config.fps()?;
    let allocator = DurationAllocator::new(fps, config.duration_secs)?;

    let mut warnings = Vec::new();
    for key in config.unmatched_override_keys() {
        tracing::warn!(key = %key.display(), "override names no input image; ignoring");
        warnings.push(format!(
            "override for '{}' matches no input image",
            key.display()
        ));
    }

    let overrides: Vec<Option<f64>> = config
        .images
        .iter()
        .map(|img| config.durations.get(img).copied())
        .collect();
    let frames = allocator.allocate(&overrides)?;

    let mut slots = Vec::with_capacity(config.images.len());
    for (index, (source, frames)) in config.images.iter().zip(frames).enumerate() {
        let mut names = config.effects.get(source).cloned().unwrap_or_default();
        if config.unknown_effects == UnknownEffectPolicy::Passthrough {
            names.retain(|name| {
                let known = registry.contains(name);
                if !known {
                    tracing::warn!(
                        image = %source.display(),
                        effect = %name,
                        "dropping unknown effect"
                    );
                    warnings.push(format!(
                        "unknown effect '{name}' for '{}' dropped",
                        source.display()
                    ));
                }
                known
            });
        }
        let chain = registry.resolve_chain(&names)?;
        slots.push(ImageSlot {
            index,
            source: source.clone(),
            effect_names: names,
            chain,
            frames,
            first_frame: FrameIndex(0),
        });
    }

    let mut timeline = Timeline::new(fps, config.duration_secs, slots);
    if let Some(size) = config.frame_size {
        timeline.set_frame_size(size);
    }
    Ok((timeline, warnings))
}

fn build_thread_pool(threads: Option<usize>) -> SlideResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SlideError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SlideError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/compositor.rs"]
mod tests;
