use crate::effects::{blur, mask, overlay, tone, warp};
use crate::foundation::core::{Frame, FrameSize};
use crate::foundation::error::{SlideError, SlideResult};
use crate::foundation::math::progress;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::str::FromStr;

/// The closed set of per-frame effects.
///
/// Every variant is a pure function of `(frame, frame_idx, total_frames)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Slow push-in to 110%.
    Zoom,
    /// Black to full brightness.
    FadeIn,
    /// Color to grayscale.
    Grayscale,
    /// Scale oscillating four times per clip.
    Heartbeat,
    /// Opening soft circle of light.
    Spotlight,
    /// Increasing blur, as through tears.
    TearDrop,
    /// Beating tinted glow.
    HeartPulse,
    /// Sharp to blurred.
    BlurTransition,
    /// Warm then cool tint.
    ColorShift,
    /// Static corner darkening.
    Vignette,
    /// One sinusoidal brightness flicker per clip.
    LightFlicker,
    /// Horizontal reveal from the right edge.
    Slide,
    /// Rising red disc.
    RedBubble,
    /// Breathing gold border.
    HighlightBorder,
    /// Sweeping diagonal light band.
    Shimmer,
}

impl EffectKind {
    /// Every effect, in registry listing order.
    pub const ALL: [EffectKind; 15] = [
        EffectKind::Zoom,
        EffectKind::FadeIn,
        EffectKind::Grayscale,
        EffectKind::Heartbeat,
        EffectKind::Spotlight,
        EffectKind::TearDrop,
        EffectKind::HeartPulse,
        EffectKind::BlurTransition,
        EffectKind::ColorShift,
        EffectKind::Vignette,
        EffectKind::LightFlicker,
        EffectKind::Slide,
        EffectKind::RedBubble,
        EffectKind::HighlightBorder,
        EffectKind::Shimmer,
    ];

    /// Registered name.
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Zoom => "zoom",
            EffectKind::FadeIn => "fade_in",
            EffectKind::Grayscale => "grayscale",
            EffectKind::Heartbeat => "heartbeat",
            EffectKind::Spotlight => "spotlight",
            EffectKind::TearDrop => "tear_drop",
            EffectKind::HeartPulse => "heart_pulse",
            EffectKind::BlurTransition => "blur_transition",
            EffectKind::ColorShift => "color_shift",
            EffectKind::Vignette => "vignette",
            EffectKind::LightFlicker => "light_flicker",
            EffectKind::Slide => "slide",
            EffectKind::RedBubble => "red_bubble",
            EffectKind::HighlightBorder => "highlight_border",
            EffectKind::Shimmer => "shimmer",
        }
    }

    /// Apply this effect to `frame` at `frame_idx` of a `total_frames` long span.
    ///
    /// The result always has the dimensions of `frame`.
    pub fn apply(self, frame: &Frame, frame_idx: u64, total_frames: u64) -> Frame {
        let p = progress(frame_idx, total_frames);
        match self {
            EffectKind::Zoom => warp::scale_about_center(frame, 1.0 + 0.1 * f64::from(p)),
            EffectKind::FadeIn => tone::scale_brightness(frame, p),
            EffectKind::Grayscale => tone::desaturate(frame, p),
            EffectKind::Heartbeat => {
                let beat = (std::f64::consts::TAU * f64::from(p) * 4.0).sin();
                warp::scale_about_center(frame, 1.0 + 0.05 * beat)
            }
            EffectKind::Spotlight => mask::spotlight(frame, p),
            EffectKind::TearDrop | EffectKind::BlurTransition => blur::progressive_blur(frame, p),
            EffectKind::HeartPulse => mask::heart_pulse(frame, p),
            EffectKind::ColorShift => tone::color_shift(frame, p),
            EffectKind::Vignette => mask::vignette(frame),
            EffectKind::LightFlicker => tone::light_flicker(frame, p),
            EffectKind::Slide => {
                let offset = (frame.width as f32 * (1.0 - p)).round() as u32;
                warp::shift_right(frame, offset)
            }
            EffectKind::RedBubble => overlay::red_bubble(frame, p),
            EffectKind::HighlightBorder => overlay::highlight_border(frame, p),
            EffectKind::Shimmer => overlay::shimmer(frame, p),
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = SlideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| SlideError::unknown_effect(s))
    }
}

/// Name lookup table for the built-in effects.
///
/// Names must match a registered name exactly. Anything else is an [`SlideError::UnknownEffect`];
/// the registry never guesses or substitutes a default.
#[derive(Clone, Debug)]
pub struct EffectRegistry {
    by_name: BTreeMap<&'static str, EffectKind>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EffectRegistry {
    /// Registry holding every [`EffectKind`].
    pub fn builtin() -> Self {
        Self {
            by_name: EffectKind::ALL.into_iter().map(|k| (k.name(), k)).collect(),
        }
    }

    /// Look up a single effect by name.
    pub fn get(&self, name: &str) -> SlideResult<EffectKind> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| SlideError::unknown_effect(name))
    }

    /// Return `true` when `name` resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_name.keys().copied()
    }

    /// Resolve an ordered list of names into a chain, failing on the first unknown name.
    pub fn resolve_chain<S: AsRef<str>>(&self, names: &[S]) -> SlideResult<EffectChain> {
        names
            .iter()
            .map(|n| self.get(n.as_ref()))
            .collect::<SlideResult<SmallVec<[EffectKind; 4]>>>()
            .map(EffectChain)
    }
}

/// Ordered effects applied left to right, each stage consuming the previous output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectChain(SmallVec<[EffectKind; 4]>);

impl EffectChain {
    /// The empty chain.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Return `true` when no effect is applied.
    pub fn is_passthrough(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` when the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stages in application order.
    pub fn kinds(&self) -> &[EffectKind] {
        &self.0
    }

    /// Run every stage on `canvas` for one frame.
    pub fn apply(&self, canvas: &Frame, frame_idx: u64, total_frames: u64) -> Frame {
        self.run(canvas, |kind, frame| kind.apply(frame, frame_idx, total_frames))
    }

    /// Bind the chain to one canvas size, building time-invariant masks once.
    pub fn prepare(&self, size: FrameSize) -> PreparedChain<'_> {
        let vignette = self
            .0
            .contains(&EffectKind::Vignette)
            .then(|| mask::VignetteMask::new(size));
        PreparedChain {
            chain: self,
            vignette,
        }
    }

    fn run(&self, canvas: &Frame, mut stage: impl FnMut(EffectKind, &Frame) -> Frame) -> Frame {
        let Some((first, rest)) = self.0.split_first() else {
            return canvas.clone();
        };
        let mut frame = stage(*first, canvas);
        for kind in rest {
            frame = stage(*kind, &frame);
        }
        frame
    }
}

/// An [`EffectChain`] bound to one canvas size.
///
/// Produces exactly the frames of [`EffectChain::apply`], reusing masks that do not change from
/// frame to frame.
#[derive(Clone, Debug)]
pub struct PreparedChain<'a> {
    chain: &'a EffectChain,
    vignette: Option<mask::VignetteMask>,
}

impl PreparedChain<'_> {
    /// The underlying chain.
    pub fn chain(&self) -> &EffectChain {
        self.chain
    }

    /// Return `true` when a vignette mask was built ahead of time.
    pub fn has_cached_vignette(&self) -> bool {
        self.vignette.is_some()
    }

    /// Run every stage on `canvas` for one frame.
    pub fn apply(&self, canvas: &Frame, frame_idx: u64, total_frames: u64) -> Frame {
        self.chain.run(canvas, |kind, frame| match (kind, &self.vignette) {
            (EffectKind::Vignette, Some(mask)) => mask.apply(frame),
            _ => kind.apply(frame, frame_idx, total_frames),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/registry.rs"]
mod tests;
