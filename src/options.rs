use std::sync::Arc;

use crate::{Axis, ItemKey, WindowChange};

/// Maps a collection index to the stable tracking key of the item currently at
/// that position.
pub type TrackBy<K> = Arc<dyn Fn(usize) -> K + Send + Sync>;

/// Callback fired with every newly computed window.
pub type OnWindowChange = Arc<dyn Fn(&WindowChange) + Send + Sync>;

/// Configuration for [`crate::WindowController`].
///
/// Cheap to clone: closures and callbacks are stored in `Arc`s.
pub struct WindowOptions<K = ItemKey> {
    /// Length of the collection.
    pub count: usize,
    /// Stable identity per index; defaults to positional identity.
    pub track_by: TrackBy<K>,
    /// Size assumed for items that have not been measured yet.
    pub default_item_size: f64,
    /// The scroll axis to virtualize along.
    pub axis: Axis,
    /// Minimum elapsed host time between scroll-driven recomputations.
    ///
    /// Scroll bursts are coalesced to at most one recomputation per interval;
    /// this is the only place the engine intentionally drops work.
    pub scroll_throttle_ms: u64,
    /// Fired after every recomputation that produces a new window.
    pub on_window_change: Option<OnWindowChange>,
}

impl WindowOptions<ItemKey> {
    /// Creates options for a collection keyed by position (`ItemKey = u64`).
    ///
    /// Use [`WindowOptions::new_with_key`] when measurements should follow items
    /// across reordering.
    pub fn new(count: usize, default_item_size: f64) -> Self {
        Self {
            count,
            track_by: Arc::new(|i| i as u64),
            default_item_size,
            axis: Axis::Vertical,
            scroll_throttle_ms: 10,
            on_window_change: None,
        }
    }
}

impl<K> WindowOptions<K> {
    /// Creates options with a custom tracking-key mapping.
    ///
    /// `track_by(i)` must return a stable identity for the item at index `i`.
    pub fn new_with_key(
        count: usize,
        default_item_size: f64,
        track_by: impl Fn(usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            count,
            track_by: Arc::new(track_by),
            default_item_size,
            axis: Axis::Vertical,
            scroll_throttle_ms: 10,
            on_window_change: None,
        }
    }

    pub fn with_track_by(mut self, track_by: impl Fn(usize) -> K + Send + Sync + 'static) -> Self {
        self.track_by = Arc::new(track_by);
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_scroll_throttle_ms(mut self, scroll_throttle_ms: u64) -> Self {
        self.scroll_throttle_ms = scroll_throttle_ms;
        self
    }

    pub fn with_on_window_change(
        mut self,
        on_window_change: Option<impl Fn(&WindowChange) + Send + Sync + 'static>,
    ) -> Self {
        self.on_window_change = on_window_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl<K> Clone for WindowOptions<K> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            track_by: Arc::clone(&self.track_by),
            default_item_size: self.default_item_size,
            axis: self.axis,
            scroll_throttle_ms: self.scroll_throttle_ms,
            on_window_change: self.on_window_change.clone(),
        }
    }
}

impl<K> core::fmt::Debug for WindowOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowOptions")
            .field("count", &self.count)
            .field("default_item_size", &self.default_item_size)
            .field("axis", &self.axis)
            .field("scroll_throttle_ms", &self.scroll_throttle_ms)
            .finish_non_exhaustive()
    }
}
