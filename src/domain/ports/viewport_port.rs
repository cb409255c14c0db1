//! Port for viewport visibility observation.

use crate::domain::entities::PhotoId;

/// Handle for one active observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationId(pub u64);

/// Visibility change reported for an observed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    /// Observation the entry belongs to.
    pub observation: ObservationId,
    /// Whether the target is inside the viewport.
    pub is_intersecting: bool,
}

/// Watches whether a rendered item is inside the visible viewport.
///
/// Entries are reported once when observation starts and again whenever the
/// target's visibility changes, never for disconnected observations.
pub trait ViewportObserver: Send {
    /// Begins observing the rendered item for `target`.
    fn observe(&mut self, target: &PhotoId) -> ObservationId;

    /// Stops an observation. Pending entries for it are dropped.
    fn disconnect(&mut self, observation: ObservationId);
}
