//! A headless virtual-scroll windowing engine.
//!
//! Given a very large ordered collection rendered inside a finite viewport, this crate
//! decides which contiguous slice of items must be materialized at any moment. Items
//! outside that slice are represented only by two aggregate reserved sizes
//! (`size_before`/`size_after`), so the scrollable extent stays correct without
//! mounting every item.
//!
//! The engine is UI-agnostic. A rendering layer is expected to:
//! - drive it with viewport resize and scroll-offset events
//! - mount exactly the items in each emitted [`WindowChange`]
//! - report each newly mounted item's real size back via
//!   [`WindowController::report_measured_size`]
//!
//! Measured sizes are remembered by a stable tracking key, so they survive collection
//! reordering and filtering. Until an item is measured, a configurable default size
//! stands in for it.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod controller;
mod error;
mod key;
mod options;
mod size_cache;
mod types;
mod viewport;
mod watcher;

pub mod frame;

#[cfg(test)]
mod tests;

pub use controller::{Phase, WindowController};
pub use error::InvariantViolation;
pub use key::TrackingKey;
pub use options::{OnWindowChange, TrackBy, WindowOptions};
pub use size_cache::SizeCache;
pub use types::{Axis, Extents, IndexRange, ItemKey, Window, WindowChange};
pub use viewport::ViewportHandle;
pub use watcher::DimensionWatcher;
