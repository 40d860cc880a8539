use crate::foundation::core::{Fps, FrameSize};
use crate::foundation::error::{SlideError, SlideResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default output frame rate.
pub const DEFAULT_FPS: u32 = 30;
/// Default total duration in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 10.0;

/// What to do with effect names the registry does not know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEffectPolicy {
    /// Abort the render before any frame is produced.
    #[default]
    Fail,
    /// Drop the unknown name with a warning and keep the rest of the chain.
    Passthrough,
}

impl FromStr for UnknownEffectPolicy {
    type Err = SlideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(SlideError::validation(format!(
                "unknown-effect policy must be 'fail' or 'passthrough', got '{other}'"
            ))),
        }
    }
}

/// Everything needed to describe one slideshow.
///
/// Override maps are keyed by image path exactly as it appears in `images`. Keys that match no
/// image are ignored with a warning.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Input images in display order.
    pub images: Vec<PathBuf>,
    /// Output frames per second.
    pub fps: u32,
    /// Total duration in seconds.
    pub duration_secs: f64,
    /// Explicit output size; derived from the inputs when absent.
    pub frame_size: Option<FrameSize>,
    /// Per-image duration pins in seconds.
    pub durations: BTreeMap<PathBuf, f64>,
    /// Per-image effect names, applied in order. Absent means passthrough.
    pub effects: BTreeMap<PathBuf, Vec<String>>,
    /// Handling for unregistered effect names.
    pub unknown_effects: UnknownEffectPolicy,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            fps: DEFAULT_FPS,
            duration_secs: DEFAULT_DURATION_SECS,
            frame_size: None,
            durations: BTreeMap::new(),
            effects: BTreeMap::new(),
            unknown_effects: UnknownEffectPolicy::Fail,
        }
    }
}

impl SlideshowConfig {
    /// Default configuration for `images`.
    pub fn new(images: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            images: images.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Load a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> SlideResult<Self> {
        use anyhow::Context as _;
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
            .map_err(|e| SlideError::validation(format!("config '{}': {e}", path.display())))
    }

    /// Parse a JSON configuration.
    pub fn from_json_str(text: &str) -> SlideResult<Self> {
        serde_json::from_str(text).map_err(|e| SlideError::validation(e.to_string()))
    }

    /// Set the frame rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the total duration.
    pub fn with_duration_secs(mut self, secs: f64) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Set an explicit output size.
    pub fn with_frame_size(mut self, size: FrameSize) -> Self {
        self.frame_size = Some(size);
        self
    }

    /// Pin `image` to `secs` seconds.
    pub fn with_duration(mut self, image: impl Into<PathBuf>, secs: f64) -> Self {
        self.durations.insert(image.into(), secs);
        self
    }

    /// Set the effect chain for `image`.
    pub fn with_effects<S: Into<String>>(
        mut self,
        image: impl Into<PathBuf>,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.effects
            .insert(image.into(), names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the unknown-effect policy.
    pub fn with_unknown_effects(mut self, policy: UnknownEffectPolicy) -> Self {
        self.unknown_effects = policy;
        self
    }

    /// Validated frame rate.
    pub fn fps(&self) -> SlideResult<Fps> {
        Fps::whole(self.fps)
    }

    /// Reject configurations that can never render.
    pub fn validate(&self) -> SlideResult<()> {
        if self.images.is_empty() {
            return Err(SlideError::validation("at least one image is required"));
        }
        self.fps()?;
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(SlideError::validation(format!(
                "duration_secs must be a positive number, got {}",
                self.duration_secs
            )));
        }
        if let Some(size) = self.frame_size {
            FrameSize::new(size.width, size.height)?;
        }
        for (image, &secs) in &self.durations {
            if !secs.is_finite() || secs < 0.0 {
                return Err(SlideError::validation(format!(
                    "duration for '{}' must be a non-negative number of seconds, got {secs}",
                    image.display()
                )));
            }
        }
        Ok(())
    }

    /// Override keys that name no input image.
    pub fn unmatched_override_keys(&self) -> Vec<&Path> {
        self.durations
            .keys()
            .chain(self.effects.keys())
            .filter(|k| !self.images.iter().any(|img| img == *k))
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Execution options that do not change the rendered pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOpts {
    /// Compute each slot's frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Frames computed per parallel batch before they are pushed to the sink.
    pub chunk_size: usize,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

impl RenderOpts {
    /// Reject impossible thread counts.
    pub fn validate(&self) -> SlideResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(SlideError::validation("'threads' must be >= 1 when set"));
        }
        Ok(())
    }

    pub(crate) fn normalized_chunk_size(&self) -> u64 {
        self.chunk_size.max(1) as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
