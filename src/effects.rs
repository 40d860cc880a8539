//! Per-frame effects and the name registry that resolves them.

/// Gaussian blurs and the progressive blur transition.
pub mod blur;
pub mod mask;
pub mod overlay;
/// Effect kinds, name lookup and chains.
pub mod registry;
pub mod tone;
/// Resampling transforms: scale about center and horizontal shift.
pub mod warp;

pub use registry::{EffectChain, EffectKind, EffectRegistry, PreparedChain};
