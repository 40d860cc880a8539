//! Frame budgets and the ordered slot list a render walks through.

/// Total-duration to per-slot frame budgets.
pub mod allocator;
/// Slots and the planned timeline.
pub mod slot;

pub use allocator::DurationAllocator;
pub use slot::{ImageSlot, Timeline};
