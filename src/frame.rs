//! Pure computation of the materialized index range and its paddings.
//!
//! Given window parameters and a size cache, [`compute`] derives the single
//! contiguous range of indices to materialize plus the aggregate sizes reserved
//! on either side. It has no side effects and no stored identity; callers
//! recompute it wholesale on every discrete event. That is cheap: O(window
//! length) plus two sums bounded by the distance to each collection edge.

use crate::key::TrackingKey;
use crate::{IndexRange, SizeCache, Window, WindowChange};

/// Derives the materialized range and paddings for `window` over `cache`.
///
/// The range is `[max(0, start − overscan), min(len, start + length))` —
/// overscan extends backward only. `size_before`/`size_after` account for every
/// item outside the range, so
/// `size_before + Σ range estimates + size_after == Σ all estimates` holds
/// exactly for whatever estimates are currently cached.
pub fn compute<K: TrackingKey>(window: Window, cache: &SizeCache<K>) -> WindowChange {
    let count = cache.len();
    let start_index = window.start.saturating_sub(window.overscan).min(count);
    let end_index = window
        .start
        .saturating_add(window.length)
        .min(count)
        .max(start_index);

    WindowChange {
        range: IndexRange {
            start_index,
            end_index,
        },
        size_before: cache.sum(0..start_index),
        size_after: cache.sum(end_index..count),
    }
}
