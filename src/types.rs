/// The scroll axis a controller (or watcher) is bound to.
///
/// Chosen at construction and fixed for the instance's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Viewport size along both axes, as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extents {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Extents {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// The extent along the given axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

/// Default tracking key for collections keyed by position.
pub type ItemKey = u64;

/// Window parameters: where the materialized slice starts, how many items it
/// holds, and how many extra items are kept *behind* `start`.
///
/// Overscan extends the slice backward only, never past `start + length`. It
/// compensates for size-estimation error during fast scrolling, not for visual
/// prefetching; the forward edge is left alone to bound the number of mounted
/// items on the trailing side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Window {
    pub start: usize,
    pub length: usize,
    pub overscan: usize,
}

/// A contiguous half-open range of collection indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl IndexRange {
    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    /// Iterates the indices in ascending order.
    pub fn iter(&self) -> core::ops::Range<usize> {
        self.start_index..self.end_index
    }
}

/// The engine's externally observable output.
///
/// Consumers mount exactly the items in `range` and size two spacer regions of
/// `size_before`/`size_after` before and after them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowChange {
    pub range: IndexRange,
    /// Aggregate size of all items before `range.start_index`.
    pub size_before: f64,
    /// Aggregate size of all items from `range.end_index` onward.
    pub size_after: f64,
}

impl WindowChange {
    /// The indices to materialize, ascending and gap-free.
    pub fn indices(&self) -> core::ops::Range<usize> {
        self.range.iter()
    }
}
