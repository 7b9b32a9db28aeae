use std::collections::BTreeSet;
use std::sync::Arc;

use crate::frame;
use crate::key::TrackingKey;
use crate::options::{OnWindowChange, WindowOptions};
use crate::{
    Axis, DimensionWatcher, Extents, InvariantViolation, ItemKey, SizeCache, ViewportHandle,
    Window, WindowChange,
};

/// Lifecycle of a [`WindowController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No viewport bound yet; mutations update the cache but nothing is emitted.
    Unbound,
    /// Bound to a live viewport; every input may produce a window emission.
    Ready,
    /// Listeners detached; all further inputs are no-ops.
    Disposed,
}

/// The stateful orchestrator of the windowing engine.
///
/// Owns a [`SizeCache`] and a [`DimensionWatcher`], consumes scroll and resize
/// notifications from the host, recomputes window parameters, and emits the new
/// window through `on_window_change`. All engine state is mutated only from
/// these synchronous, reentrant-free handlers; within one handler, cache updates
/// happen before frame recomputation, which happens before emission.
///
/// Exactly four inputs trigger a recomputation:
/// collection replacement, default-size change, viewport resize (axis-filtered),
/// and scroll movement (throttled, and suppressed while freshly materialized
/// items have not reported their sizes yet).
pub struct WindowController<V, K = ItemKey> {
    axis: Axis,
    scroll_throttle_ms: u64,
    on_window_change: Option<OnWindowChange>,

    cache: SizeCache<K>,
    watcher: DimensionWatcher,
    viewport: Option<V>,
    phase: Phase,

    extent: f64,
    window: Window,
    pending: BTreeSet<usize>,
    last_scroll_ms: Option<u64>,
    last_change: Option<WindowChange>,
}

impl<V: ViewportHandle, K: TrackingKey> WindowController<V, K> {
    /// Creates an unbound controller. Call [`WindowController::bind`] with a
    /// live viewport handle to start emitting windows.
    pub fn new(options: WindowOptions<K>) -> Self {
        wdebug!(
            count = options.count,
            default_item_size = options.default_item_size,
            "WindowController::new"
        );
        let cache = SizeCache::new(
            options.count,
            options.default_item_size,
            Arc::clone(&options.track_by),
        );
        Self {
            axis: options.axis,
            scroll_throttle_ms: options.scroll_throttle_ms,
            on_window_change: options.on_window_change,
            cache,
            watcher: DimensionWatcher::new(options.axis),
            viewport: None,
            phase: Phase::Unbound,
            extent: 0.0,
            window: Window::default(),
            pending: BTreeSet::new(),
            last_scroll_ms: None,
            last_change: None,
        }
    }

    /// Binds the controller to a live viewport and computes the first window.
    ///
    /// Transitions `Unbound` → `Ready`. Calls on an already-bound or disposed
    /// controller are ignored.
    pub fn bind(&mut self, viewport: V) {
        if self.phase != Phase::Unbound {
            return;
        }
        if let Some(extent) = self.watcher.observe(viewport.extents()) {
            self.extent = extent;
        }
        let offset = viewport.scroll_offset(self.axis);
        self.viewport = Some(viewport);
        self.phase = Phase::Ready;
        wdebug!(extent = self.extent, offset, "WindowController::bind");

        self.recompute_length();
        self.window.start = self.start_for_offset(offset);
        self.recompute_overscan();
        self.emit();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_disposed(&self) -> bool {
        self.phase == Phase::Disposed
    }

    /// Current window parameters (start/length/overscan).
    pub fn window(&self) -> Window {
        self.window
    }

    /// The most recently emitted window, if any.
    pub fn last_change(&self) -> Option<&WindowChange> {
        self.last_change.as_ref()
    }

    pub fn cache(&self) -> &SizeCache<K> {
        &self.cache
    }

    pub fn viewport(&self) -> Option<&V> {
        self.viewport.as_ref()
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Viewport extent along the bound axis, as last observed.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    /// Number of materialized indices still awaiting a size report.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn set_on_window_change(
        &mut self,
        on_window_change: Option<impl Fn(&WindowChange) + Send + Sync + 'static>,
    ) {
        self.on_window_change = on_window_change.map(|f| Arc::new(f) as _);
    }

    /// Replaces the collection wholesale: new length, new tracking-key mapping.
    ///
    /// Estimates are rebuilt from the key-addressed measurement memory, so
    /// measured sizes follow reordered items to their new positions. The window
    /// is recomputed and emitted unconditionally.
    pub fn set_items(
        &mut self,
        count: usize,
        track_by: impl Fn(usize) -> K + Send + Sync + 'static,
    ) {
        if self.phase == Phase::Disposed {
            return;
        }
        wdebug!(count, "WindowController::set_items");
        self.cache.set_items(count, Arc::new(track_by));
        self.refresh(true);
    }

    /// Replaces the collection length, keeping the current tracking-key mapping.
    pub fn set_count(&mut self, count: usize) {
        if self.phase == Phase::Disposed {
            return;
        }
        wdebug!(count, "WindowController::set_count");
        self.cache.set_count(count);
        self.refresh(true);
    }

    /// Updates the size assumed for unmeasured items.
    ///
    /// Setting the value already held is a no-op and emits nothing.
    pub fn set_default_item_size(&mut self, size: f64) {
        if self.phase == Phase::Disposed {
            return;
        }
        if self.cache.default_item_size() == size {
            return;
        }
        self.cache.set_default_item_size(size);
        self.refresh(true);
    }

    /// Explicitly drops all cached measurements (see
    /// [`SizeCache::reset_measurements`]) and recomputes the window.
    pub fn reset_measurements(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        self.cache.reset_measurements();
        self.refresh(true);
    }

    /// Records the real size of the item currently at `index`, as laid out by
    /// the rendering layer.
    ///
    /// This feeds the next recomputation; it never recomputes by itself. An
    /// out-of-bounds index fails with [`InvariantViolation`] and leaves the
    /// cache unchanged.
    pub fn report_measured_size(
        &mut self,
        index: usize,
        size: f64,
    ) -> Result<(), InvariantViolation> {
        self.cache.report(index, size)?;
        self.pending.remove(&index);
        Ok(())
    }

    /// Host notification: the viewport was resized.
    ///
    /// Changes along the other axis, and non-changes, are filtered out by the
    /// watcher. The window is emitted only when its parameters actually moved.
    pub fn on_viewport_resize(&mut self, extents: Extents) {
        if self.phase != Phase::Ready {
            return;
        }
        let Some(extent) = self.watcher.observe(extents) else {
            return;
        };
        wtrace!(extent, "viewport resized");
        self.extent = extent;
        self.refresh(false);
    }

    /// Host notification: the scroll offset moved to `offset` at host time
    /// `now_ms`.
    ///
    /// Ignored entirely while a measurement round is outstanding (some emitted
    /// index has not reported its size), which prevents feedback oscillation
    /// between guessed and real sizes. Bursts are coalesced to at most one
    /// recomputation per `scroll_throttle_ms`.
    pub fn on_scroll(&mut self, offset: f64, now_ms: u64) {
        if self.phase != Phase::Ready {
            return;
        }
        if !self.pending.is_empty() {
            wtrace!(
                pending = self.pending.len(),
                "scroll ignored; measurements outstanding"
            );
            return;
        }
        if let Some(last) = self.last_scroll_ms {
            if now_ms.saturating_sub(last) < self.scroll_throttle_ms {
                return;
            }
        }
        self.last_scroll_ms = Some(now_ms);

        wtrace!(offset, now_ms, "scroll recompute");
        self.window.start = self.start_for_offset(offset);
        self.recompute_overscan();
        self.emit();
    }

    /// Best-effort jump to `index`: sums the current estimates over
    /// `[0, index)` and imperatively sets the viewport's scroll offset to that
    /// sum.
    ///
    /// If the target region has never been measured, the visual destination
    /// shifts slightly once real sizes come in and a later scroll recomputation
    /// runs; that imprecision is accepted behavior, not an error.
    ///
    /// Returns the target offset; it is applied only while the controller is
    /// ready.
    pub fn scroll_to_index(&mut self, index: usize) -> f64 {
        let index = index.min(self.cache.len());
        let offset = self.cache.sum(0..index);
        if self.phase == Phase::Ready {
            if let Some(viewport) = self.viewport.as_mut() {
                wdebug!(index, offset, "scroll_to_index");
                viewport.set_scroll_offset(self.axis, offset);
            }
        }
        offset
    }

    /// Detaches from the viewport and stops all recomputation. Idempotent.
    pub fn dispose(&mut self) {
        if self.phase == Phase::Disposed {
            return;
        }
        wdebug!("WindowController::dispose");
        self.viewport = None;
        self.pending.clear();
        self.phase = Phase::Disposed;
    }

    /// Shared path for collection/default-size/resize inputs: recompute window
    /// length and overscan, then emit (unconditionally when `force`).
    fn refresh(&mut self, force: bool) {
        if self.phase != Phase::Ready {
            return;
        }
        let prev = self.window;
        self.recompute_length();
        self.clamp_start();
        self.recompute_overscan();
        if force || self.window != prev {
            self.emit();
        }
    }

    /// How many items fit the viewport: sort the current estimates ascending
    /// and accumulate until the running sum reaches the extent; the count that
    /// stayed strictly below, plus one, is the candidate. The committed length
    /// never shrinks, so optimistic estimates cannot under-cover the viewport.
    fn recompute_length(&mut self) {
        let mut sizes = self.cache.estimates().to_vec();
        sizes.sort_by(f64::total_cmp);

        let mut sum = 0.0;
        let mut fit = 0usize;
        for size in sizes {
            sum += size;
            if sum >= self.extent {
                break;
            }
            fit += 1;
        }
        self.window.length = self.window.length.max(fit + 1);
    }

    /// `overscan = 1 + ceil(max/min)` over the estimates inside the current
    /// window region. This bounds how far one fast scroll step can jump over an
    /// unmeasured, unexpectedly large item; it compensates for estimation
    /// error, not for prefetching, and is applied backward from `start` only.
    fn recompute_overscan(&mut self) {
        let count = self.cache.len();
        let first = self.window.start.min(count);
        let end = self.window.start.saturating_add(self.window.length).min(count);

        let mut min = f64::INFINITY;
        let mut max = 0.0f64;
        for &size in &self.cache.estimates()[first..end] {
            min = min.min(size);
            max = max.max(size);
        }
        self.window.overscan = if first >= end || !(min > 0.0) {
            1
        } else {
            1 + (max / min).ceil() as usize
        };
    }

    /// Estimated start index for a scroll offset: `round(offset / average)`
    /// over the measured mean (default size before any measurement), clamped to
    /// `[0, len − length]`.
    fn start_for_offset(&self, offset: f64) -> usize {
        let average = self
            .cache
            .measured_average()
            .unwrap_or(self.cache.default_item_size());
        if !(average > 0.0) {
            return 0;
        }
        let start = (offset / average).round().max(0.0) as usize;
        start.min(self.cache.len().saturating_sub(self.window.length))
    }

    fn clamp_start(&mut self) {
        let max_start = self.cache.len().saturating_sub(self.window.length);
        self.window.start = self.window.start.min(max_start);
    }

    /// Recomputes the frame from the current window and cache, resets the
    /// pending set to the unmeasured indices of the new range, and notifies.
    fn emit(&mut self) {
        let change = frame::compute(self.window, &self.cache);
        self.pending = change
            .indices()
            .filter(|&i| !self.cache.is_measured(i))
            .collect();
        wtrace!(
            start_index = change.range.start_index,
            end_index = change.range.end_index,
            pending = self.pending.len(),
            "emit window"
        );
        if let Some(on_window_change) = &self.on_window_change {
            on_window_change(&change);
        }
        self.last_change = Some(change);
    }
}

impl<V, K> core::fmt::Debug for WindowController<V, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowController")
            .field("phase", &self.phase)
            .field("axis", &self.axis)
            .field("extent", &self.extent)
            .field("window", &self.window)
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
