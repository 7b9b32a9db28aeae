//! Simulates a host rendering layer driving the windowing engine.
//!
//! A synthetic viewport scrolls through a 10k-item list whose real row heights
//! differ from the default estimate. Each emitted window is "mounted" by
//! reporting measured sizes back, which the next scroll recomputation uses.
//!
//! Run with: `cargo run --example host_sim`

use std::sync::{Arc, Mutex};

use scroll_window::{
    Axis, Extents, ViewportHandle, WindowChange, WindowController, WindowOptions,
};

#[derive(Clone, Copy, Debug)]
struct SimViewport {
    extents: Extents,
    offset: f64,
}

impl ViewportHandle for SimViewport {
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

/// Deterministic "real" row height: most rows 20px, every 7th row twice that.
fn real_size(index: usize) -> f64 {
    if index % 7 == 0 { 40.0 } else { 20.0 }
}

fn main() {
    let windows: Arc<Mutex<Vec<WindowChange>>> = Arc::new(Mutex::new(Vec::new()));

    let options = WindowOptions::new(10_000, 24.0)
        .with_axis(Axis::Vertical)
        .with_on_window_change(Some({
            let windows = Arc::clone(&windows);
            move |change: &WindowChange| windows.lock().unwrap().push(*change)
        }));

    let mut controller: WindowController<SimViewport> = WindowController::new(options);
    controller.bind(SimViewport {
        extents: Extents::new(800.0, 480.0),
        offset: 0.0,
    });

    let mut now_ms = 0u64;
    let mut offset = 0.0;

    for step in 0..20 {
        // Mount the latest window: report each materialized item's real size.
        let range = controller.last_change().expect("bound controller").range;
        for index in range.iter() {
            controller
                .report_measured_size(index, real_size(index))
                .expect("index from an emitted window is in bounds");
        }

        let change = *controller.last_change().expect("bound controller");
        println!(
            "step {step:>2}: mounted [{}, {}) size_before={:>9.1} size_after={:>9.1}",
            change.range.start_index, change.range.end_index, change.size_before, change.size_after,
        );

        // Scroll further down; the engine re-estimates the start index from the
        // measured average.
        offset += 640.0;
        now_ms += 16;
        controller.on_scroll(offset, now_ms);
    }

    let target = 9_500;
    let jump = controller.scroll_to_index(target);
    println!("jump to {target}: viewport offset set to {jump:.1} (best effort until measured)");

    controller.dispose();
    println!("emitted {} windows total", windows.lock().unwrap().len());
}
