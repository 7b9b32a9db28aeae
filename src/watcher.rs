use crate::{Axis, Extents};

/// Filters host viewport size notifications down to real changes along one axis.
///
/// A watcher is bound to a single scroll axis at construction, fixed for its
/// lifetime. Notifications whose extent along that axis equals the last observed
/// value (exact equality) are dropped to avoid redundant recomputation cycles;
/// all others are forwarded to the single consumer as `Some(extent)`. The
/// watcher keeps no timers and relies entirely on the host's notification
/// cadence.
#[derive(Clone, Copy, Debug)]
pub struct DimensionWatcher {
    axis: Axis,
    last: Option<f64>,
}

impl DimensionWatcher {
    pub fn new(axis: Axis) -> Self {
        Self { axis, last: None }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn last_observed(&self) -> Option<f64> {
        self.last
    }

    /// Feeds one host size notification through the filter.
    ///
    /// Returns the new extent along the bound axis, or `None` when it is
    /// unchanged. Changes along the other axis alone are filtered out.
    pub fn observe(&mut self, extents: Extents) -> Option<f64> {
        let next = extents.along(self.axis);
        if self.last == Some(next) {
            return None;
        }
        self.last = Some(next);
        Some(next)
    }
}
