use std::sync::Arc;

use crate::key::{KeySizeMap, TrackingKey};
use crate::options::TrackBy;
use crate::{InvariantViolation, ItemKey};

/// Per-item size memory: measured and estimated sizes, addressable both by
/// current position and by stable tracking key.
///
/// - `by_index` is the current best estimate per position. It is rebuilt (not
///   cleared) whenever the collection is replaced, and is always fully defined
///   for every valid index: positions without a measurement fall back to the
///   default item size.
/// - `by_key` is permanent measurement memory. It is only written when a real
///   measurement is reported and is never invalidated by reordering; it persists
///   for the lifetime of the cache.
#[derive(Clone)]
pub struct SizeCache<K = ItemKey> {
    by_index: Vec<f64>,
    measured: Vec<bool>,
    by_key: KeySizeMap<K>,
    track_by: TrackBy<K>,
    default_item_size: f64,
}

impl<K: TrackingKey> SizeCache<K> {
    pub fn new(count: usize, default_item_size: f64, track_by: TrackBy<K>) -> Self {
        let mut cache = Self {
            by_index: Vec::new(),
            measured: Vec::new(),
            by_key: KeySizeMap::new(),
            track_by,
            default_item_size,
        };
        cache.rebuild(count);
        cache
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    pub fn default_item_size(&self) -> f64 {
        self.default_item_size
    }

    /// Replaces the collection wholesale: new length, new key mapping.
    ///
    /// `by_index` is rebuilt from `by_key` lookups, falling back to the default
    /// item size; `by_key` is untouched, so measurements follow their keys to
    /// their new positions.
    pub fn set_items(&mut self, count: usize, track_by: TrackBy<K>) {
        self.track_by = track_by;
        self.rebuild(count);
    }

    /// Replaces the collection length, keeping the existing key mapping.
    pub fn set_count(&mut self, count: usize) {
        self.rebuild(count);
    }

    /// Updates the fallback size used for unmeasured items and rebuilds
    /// `by_index` the same way `set_items` does.
    pub fn set_default_item_size(&mut self, size: f64) {
        self.default_item_size = size;
        let count = self.by_index.len();
        self.rebuild(count);
    }

    /// Records a real measurement for the item currently at `index`.
    ///
    /// Writes both `by_index[index]` and `by_key[track_by(index)]`. Fails with
    /// [`InvariantViolation`] when `index` is outside the collection bounds,
    /// leaving the cache unchanged.
    pub fn report(&mut self, index: usize, size: f64) -> Result<(), InvariantViolation> {
        if index >= self.by_index.len() {
            return Err(InvariantViolation {
                index,
                count: self.by_index.len(),
            });
        }
        self.by_index[index] = size;
        self.measured[index] = true;
        self.by_key.insert((self.track_by)(index), size);
        Ok(())
    }

    /// The current best size estimate for `index` (default for out-of-range).
    pub fn estimate(&self, index: usize) -> f64 {
        self.by_index
            .get(index)
            .copied()
            .unwrap_or(self.default_item_size)
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Sum of estimates over a half-open index range; 0.0 for an empty range.
    pub fn sum(&self, range: core::ops::Range<usize>) -> f64 {
        let end = range.end.min(self.by_index.len());
        let start = range.start.min(end);
        self.by_index[start..end].iter().sum()
    }

    /// Sum of estimates over the whole collection.
    pub fn total(&self) -> f64 {
        self.sum(0..self.by_index.len())
    }

    /// Mean of the measured sizes in the current collection, or `None` when
    /// nothing has been measured yet.
    pub fn measured_average(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for (i, &measured) in self.measured.iter().enumerate() {
            if measured {
                sum += self.by_index[i];
                n += 1;
            }
        }
        (n > 0).then(|| sum / n as f64)
    }

    /// Number of cached measurements (key → size).
    pub fn measurement_len(&self) -> usize {
        self.by_key.len()
    }

    /// Explicitly drops all cached measurements and rebuilds estimates from the
    /// default item size. The cache never does this on its own.
    pub fn reset_measurements(&mut self) {
        self.by_key.clear();
        let count = self.by_index.len();
        self.rebuild(count);
    }

    pub(crate) fn estimates(&self) -> &[f64] {
        &self.by_index
    }

    fn rebuild(&mut self, count: usize) {
        self.by_index.clear();
        self.measured.clear();
        self.by_index.reserve_exact(count);
        self.measured.reserve_exact(count);

        for i in 0..count {
            let key = (self.track_by)(i);
            if let Some(&measured_size) = self.by_key.get(&key) {
                self.by_index.push(measured_size);
                self.measured.push(true);
            } else {
                self.by_index.push(self.default_item_size);
                self.measured.push(false);
            }
        }
    }
}

impl<K> core::fmt::Debug for SizeCache<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SizeCache")
            .field("len", &self.by_index.len())
            .field("measurements", &self.by_key.len())
            .field("default_item_size", &self.default_item_size)
            .finish_non_exhaustive()
    }
}

impl SizeCache<ItemKey> {
    /// Creates a cache keyed by position (`ItemKey = u64`).
    pub fn new_positional(count: usize, default_item_size: f64) -> Self {
        Self::new(count, default_item_size, Arc::new(|i| i as u64))
    }
}
