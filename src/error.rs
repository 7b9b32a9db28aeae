use thiserror::Error;

/// A collaborator reported a measured size for an index outside the current
/// collection bounds.
///
/// This signals desynchronization between the rendering layer and the engine
/// (e.g. measuring against a stale window) and is a programming/integration
/// error, not a runtime condition to recover from. The size cache is left
/// unchanged when this is raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("measured size reported for index {index}, but the collection holds {count} items")]
pub struct InvariantViolation {
    pub index: usize,
    pub count: usize,
}
