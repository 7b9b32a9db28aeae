use crate::*;

use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug)]
struct FakeViewport {
    extents: Extents,
    offset: f64,
}

impl FakeViewport {
    fn new(extent: f64) -> Self {
        Self {
            extents: Extents::new(600.0, extent),
            offset: 0.0,
        }
    }
}

impl ViewportHandle for FakeViewport {
    fn extents(&self) -> Extents {
        self.extents
    }

    fn scroll_offset(&self, _axis: Axis) -> f64 {
        self.offset
    }

    fn set_scroll_offset(&mut self, _axis: Axis, offset: f64) {
        self.offset = offset;
    }
}

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() as usize % (end_exclusive - start))
    }
}

fn recording_controller(
    count: usize,
    default_item_size: f64,
    extent: f64,
) -> (
    WindowController<FakeViewport>,
    Arc<Mutex<Vec<WindowChange>>>,
) {
    let emitted: Arc<Mutex<Vec<WindowChange>>> = Arc::new(Mutex::new(Vec::new()));
    let options = WindowOptions::new(count, default_item_size).with_on_window_change(Some({
        let emitted = Arc::clone(&emitted);
        move |change: &WindowChange| emitted.lock().unwrap().push(*change)
    }));
    let mut controller = WindowController::new(options);
    controller.bind(FakeViewport::new(extent));
    (controller, emitted)
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "expected {b}, got {a}");
}

#[test]
fn scenario_a_initial_window_from_defaults() {
    let (controller, emitted) = recording_controller(1000, 40.0, 800.0);

    let emitted = emitted.lock().unwrap();
    assert_eq!(emitted.len(), 1);
    let change = emitted[0];

    // 800 / 40 => 20 items; overscan extends backward only, so nothing at start 0.
    assert_eq!(change.range, IndexRange { start_index: 0, end_index: 20 });
    assert_close(change.size_before, 0.0);
    assert_close(change.size_after, 980.0 * 40.0);

    assert_eq!(controller.window().start, 0);
    assert_eq!(controller.window().length, 20);
    assert_eq!(controller.window().overscan, 2);
}

#[test]
fn scenario_b_scroll_to_index_sums_estimates() {
    let (mut controller, _emitted) = recording_controller(1000, 40.0, 800.0);

    let offset = controller.scroll_to_index(500);
    assert_close(offset, 20000.0);
    assert_close(
        controller.viewport().unwrap().scroll_offset(Axis::Vertical),
        20000.0,
    );

    // Index is clamped to the collection length.
    assert_close(controller.scroll_to_index(5000), 1000.0 * 40.0);
}

#[test]
fn scenario_c_scroll_recomputes_start_from_measured_average() {
    let (mut controller, emitted) = recording_controller(1000, 40.0, 800.0);

    for i in 0..20 {
        controller.report_measured_size(i, 60.0).unwrap();
    }
    assert_eq!(controller.pending_len(), 0);

    controller.on_scroll(12000.0, 100);

    assert_eq!(controller.window().start, 200);
    let emitted = emitted.lock().unwrap();
    let change = *emitted.last().unwrap();
    assert_eq!(change.range, IndexRange { start_index: 198, end_index: 220 });
    // 20 measured at 60 plus 178 unmeasured defaults before the range.
    assert_close(change.size_before, 20.0 * 60.0 + 178.0 * 40.0);
}

#[test]
fn scenario_d_out_of_bounds_report_fails_and_leaves_cache_unchanged() {
    let (mut controller, _emitted) = recording_controller(1000, 40.0, 800.0);

    let err = controller.report_measured_size(5000, 10.0).unwrap_err();
    assert_eq!(err, InvariantViolation { index: 5000, count: 1000 });

    assert_eq!(controller.cache().measurement_len(), 0);
    assert_close(controller.cache().estimate(999), 40.0);
    assert_close(controller.cache().total(), 1000.0 * 40.0);
}

#[test]
fn invariant_violation_names_index_and_bounds() {
    let err = InvariantViolation { index: 7, count: 3 };
    let msg = err.to_string();
    assert!(msg.contains('7') && msg.contains('3'), "{msg}");
}

#[test]
fn measurements_follow_tracking_keys_across_reorder() {
    let emitted: Arc<Mutex<Vec<WindowChange>>> = Arc::new(Mutex::new(Vec::new()));
    let options = WindowOptions::new_with_key(10, 20.0, |i| i as u64).with_on_window_change(Some({
        let emitted = Arc::clone(&emitted);
        move |change: &WindowChange| emitted.lock().unwrap().push(*change)
    }));
    let mut controller: WindowController<FakeViewport, u64> = WindowController::new(options);
    controller.bind(FakeViewport::new(100.0));

    controller.report_measured_size(3, 50.0).unwrap();
    assert_close(controller.cache().estimate(3), 50.0);

    // Reorder: the item with key 3 now sits at index 7.
    let keys: Vec<u64> = vec![0, 1, 2, 9, 4, 5, 6, 3, 8, 7];
    controller.set_items(10, move |i| keys[i]);

    assert_close(controller.cache().estimate(7), 50.0);
    assert_close(controller.cache().estimate(3), 20.0);
}

#[test]
fn set_default_item_size_with_same_value_is_a_no_op() {
    let (mut controller, emitted) = recording_controller(100, 40.0, 400.0);
    let before = controller.window();
    assert_eq!(emitted.lock().unwrap().len(), 1);

    controller.set_default_item_size(40.0);
    assert_eq!(controller.window(), before);
    assert_eq!(emitted.lock().unwrap().len(), 1);

    controller.set_default_item_size(10.0);
    assert_eq!(emitted.lock().unwrap().len(), 2);
}

#[test]
fn scroll_is_suppressed_while_measurements_are_outstanding() {
    let (mut controller, emitted) = recording_controller(1000, 40.0, 800.0);
    assert_eq!(controller.pending_len(), 20);

    controller.on_scroll(4000.0, 50);
    assert_eq!(emitted.lock().unwrap().len(), 1);
    assert_eq!(controller.window().start, 0);

    let range = controller.last_change().unwrap().range;
    for i in range.iter() {
        controller.report_measured_size(i, 40.0).unwrap();
    }
    assert_eq!(controller.pending_len(), 0);

    controller.on_scroll(4000.0, 100);
    assert_eq!(emitted.lock().unwrap().len(), 2);
    assert_eq!(controller.window().start, 100);
}

#[test]
fn scroll_bursts_are_throttled_by_host_time() {
    let (mut controller, emitted) = recording_controller(30, 10.0, 100.0);
    for i in 0..30 {
        controller.report_measured_size(i, 10.0).unwrap();
    }

    controller.on_scroll(50.0, 0);
    assert_eq!(emitted.lock().unwrap().len(), 2);
    assert_eq!(controller.window().start, 5);

    // Within the default 10ms interval: coalesced away.
    controller.on_scroll(80.0, 5);
    assert_eq!(emitted.lock().unwrap().len(), 2);
    assert_eq!(controller.window().start, 5);

    controller.on_scroll(80.0, 12);
    assert_eq!(emitted.lock().unwrap().len(), 3);
    assert_eq!(controller.window().start, 8);
}

#[test]
fn resize_emits_only_when_the_window_changes() {
    let (mut controller, emitted) = recording_controller(1000, 40.0, 800.0);
    assert_eq!(controller.window().length, 20);

    // Same extent along the bound axis: filtered by the watcher.
    controller.on_viewport_resize(Extents::new(600.0, 800.0));
    assert_eq!(emitted.lock().unwrap().len(), 1);

    // Cross-axis-only change: also filtered.
    controller.on_viewport_resize(Extents::new(900.0, 800.0));
    assert_eq!(emitted.lock().unwrap().len(), 1);

    controller.on_viewport_resize(Extents::new(600.0, 1000.0));
    assert_eq!(emitted.lock().unwrap().len(), 2);
    assert_eq!(controller.window().length, 25);

    // The committed length never shrinks, so a smaller viewport changes nothing.
    controller.on_viewport_resize(Extents::new(600.0, 400.0));
    assert_eq!(emitted.lock().unwrap().len(), 2);
    assert_eq!(controller.window().length, 25);
}

#[test]
fn collection_change_emits_unconditionally() {
    let (mut controller, emitted) = recording_controller(100, 40.0, 400.0);
    assert_eq!(emitted.lock().unwrap().len(), 1);

    controller.set_count(100);
    assert_eq!(emitted.lock().unwrap().len(), 2);

    controller.set_count(5);
    assert_eq!(emitted.lock().unwrap().len(), 3);
    let change = *emitted.lock().unwrap().last().unwrap();
    assert_eq!(change.range.end_index, 5);
    assert_close(change.size_after, 0.0);
}

#[test]
fn dispose_is_idempotent_and_silences_every_input() {
    let (mut controller, emitted) = recording_controller(100, 40.0, 400.0);

    controller.dispose();
    controller.dispose();
    assert!(controller.is_disposed());
    assert!(controller.viewport().is_none());
    assert_eq!(controller.pending_len(), 0);

    controller.set_count(5);
    controller.set_default_item_size(1.0);
    controller.on_scroll(1000.0, 100);
    controller.on_viewport_resize(Extents::new(600.0, 50.0));
    assert_eq!(emitted.lock().unwrap().len(), 1);
}

#[test]
fn mutations_before_bind_emit_nothing_until_bound() {
    let emitted: Arc<Mutex<Vec<WindowChange>>> = Arc::new(Mutex::new(Vec::new()));
    let options = WindowOptions::new(10, 40.0).with_on_window_change(Some({
        let emitted = Arc::clone(&emitted);
        move |change: &WindowChange| emitted.lock().unwrap().push(*change)
    }));
    let mut controller: WindowController<FakeViewport> = WindowController::new(options);
    assert_eq!(controller.phase(), Phase::Unbound);

    controller.set_count(1000);
    controller.report_measured_size(0, 60.0).unwrap();
    assert!(emitted.lock().unwrap().is_empty());

    controller.bind(FakeViewport::new(800.0));
    assert_eq!(controller.phase(), Phase::Ready);
    assert_eq!(emitted.lock().unwrap().len(), 1);
    assert_eq!(controller.cache().len(), 1000);
}

#[test]
fn bind_starts_from_the_viewport_current_offset() {
    let mut viewport = FakeViewport::new(800.0);
    viewport.offset = 400.0;

    let mut controller: WindowController<FakeViewport> =
        WindowController::new(WindowOptions::new(1000, 40.0));
    controller.bind(viewport);

    assert_eq!(controller.window().start, 10);
    assert_eq!(controller.last_change().unwrap().range.start_index, 8);
}

#[test]
fn frame_compute_is_pure_and_accounts_for_every_item() {
    let mut cache = SizeCache::new_positional(5, 10.0);
    cache.report(0, 30.0).unwrap();

    let window = Window { start: 2, length: 2, overscan: 1 };
    let change = frame::compute(window, &cache);
    assert_eq!(change.range, IndexRange { start_index: 1, end_index: 4 });
    assert_close(change.size_before, 30.0);
    assert_close(change.size_after, 10.0);

    // Same inputs, same output; no stored identity.
    assert_eq!(frame::compute(window, &cache), change);

    let empty = SizeCache::new_positional(0, 10.0);
    let change = frame::compute(window, &empty);
    assert!(change.range.is_empty());
    assert_close(change.size_before, 0.0);
    assert_close(change.size_after, 0.0);
}

#[test]
fn frame_clamps_the_forward_edge_to_the_collection() {
    let cache = SizeCache::new_positional(10, 5.0);
    let window = Window { start: 8, length: 6, overscan: 3 };
    let change = frame::compute(window, &cache);
    assert_eq!(change.range, IndexRange { start_index: 5, end_index: 10 });
    assert_close(change.size_after, 0.0);
}

#[test]
fn size_cache_sum_over_empty_range_is_zero() {
    let cache = SizeCache::new_positional(4, 10.0);
    assert_close(cache.sum(2..2), 0.0);
    assert_close(cache.sum(3..1), 0.0);
    assert_close(cache.sum(2..100), 20.0);
    assert_close(cache.estimate(100), 10.0);
}

#[test]
fn size_cache_rebuild_keeps_measurements_and_reset_drops_them() {
    let mut cache = SizeCache::new_positional(3, 10.0);
    cache.report(1, 25.0).unwrap();

    cache.set_default_item_size(4.0);
    assert_close(cache.estimate(0), 4.0);
    assert_close(cache.estimate(1), 25.0);
    assert!(cache.is_measured(1));

    cache.reset_measurements();
    assert_close(cache.estimate(1), 4.0);
    assert!(!cache.is_measured(1));
    assert_eq!(cache.measurement_len(), 0);
}

#[test]
fn measured_average_is_none_until_a_measurement_lands() {
    let mut cache = SizeCache::new_positional(4, 10.0);
    assert_eq!(cache.measured_average(), None);
    cache.report(0, 30.0).unwrap();
    cache.report(1, 10.0).unwrap();
    assert_close(cache.measured_average().unwrap(), 20.0);
}

#[test]
fn watcher_filters_non_changes_and_the_other_axis() {
    let mut watcher = DimensionWatcher::new(Axis::Vertical);
    assert_eq!(watcher.axis(), Axis::Vertical);
    assert_eq!(watcher.last_observed(), None);

    assert_eq!(watcher.observe(Extents::new(100.0, 50.0)), Some(50.0));
    assert_eq!(watcher.observe(Extents::new(100.0, 50.0)), None);
    assert_eq!(watcher.observe(Extents::new(999.0, 50.0)), None);
    assert_eq!(watcher.observe(Extents::new(999.0, 51.0)), Some(51.0));
    assert_eq!(watcher.last_observed(), Some(51.0));
}

#[test]
fn overscan_widens_with_size_spread_inside_the_window() {
    let (mut controller, _emitted) = recording_controller(100, 10.0, 50.0);
    assert_eq!(controller.window().overscan, 2);

    // A 4x spread between the largest and smallest size in the window region.
    controller.report_measured_size(0, 40.0).unwrap();
    controller.report_measured_size(1, 10.0).unwrap();
    controller.set_count(100);
    assert_eq!(controller.window().overscan, 1 + 4);
}

#[test]
fn property_emissions_stay_bounded_contiguous_and_conservative() {
    for seed in [1u64, 7, 42, 1337, 2025] {
        let mut rng = Lcg::new(seed);
        let count = rng.gen_range_usize(1, 300);
        let (mut controller, emitted) = recording_controller(count, 12.5, 250.0);

        for _ in 0..40 {
            let index = rng.gen_range_usize(0, count);
            let size = rng.gen_range_usize(1, 50) as f64;
            controller.report_measured_size(index, size).unwrap();
            // Collection-change input forces a full recompute + emission.
            controller.set_count(count);
        }

        for change in emitted.lock().unwrap().iter() {
            // Bounds: the range lies inside the collection, contiguous by type.
            assert!(change.range.end_index <= count);
            assert!(change.range.start_index <= change.range.end_index);
            // Coverage: never empty while the collection is non-empty.
            assert!(!change.range.is_empty());
        }

        // Conservation for the latest emission against the current cache.
        let change = *emitted.lock().unwrap().last().unwrap();
        let materialized = controller.cache().sum(change.range.iter());
        assert_close(
            change.size_before + materialized + change.size_after,
            controller.cache().total(),
        );
    }
}
