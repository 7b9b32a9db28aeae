use crate::{Axis, Extents};

/// Capability interface the engine needs from a host scroll viewport.
///
/// The engine itself has no host-environment dependency: whatever owns the real
/// scrollable surface (a DOM element, a TUI pane, a test double) implements this
/// trait and is injected into the controller. Tests substitute synthetic handles
/// for deterministic runs.
pub trait ViewportHandle {
    /// Current viewport size along both axes.
    fn extents(&self) -> Extents;

    /// Current scroll offset along `axis`.
    fn scroll_offset(&self, axis: Axis) -> f64;

    /// Imperatively sets the scroll offset along `axis`.
    fn set_scroll_offset(&mut self, axis: Axis, offset: f64);
}
