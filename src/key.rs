use std::collections::HashMap;

pub(crate) type KeySizeMap<K> = HashMap<K, f64>;

/// Marker for types usable as tracking keys.
///
/// A tracking key is a stable identity for a collection item, used to keep
/// measured sizes attached to the item across reordering and filtering.
pub trait TrackingKey: core::hash::Hash + Eq {}
impl<K: core::hash::Hash + Eq> TrackingKey for K {}
