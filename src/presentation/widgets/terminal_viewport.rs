//! Viewport observation backed by the last rendered frame.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::domain::entities::PhotoId;
use crate::domain::ports::{IntersectionEntry, ObservationId, ViewportObserver};

#[derive(Debug)]
struct Observed {
    target: PhotoId,
    reported: Option<bool>,
}

#[derive(Debug, Default)]
struct ViewportInner {
    next_id: u64,
    observations: BTreeMap<ObservationId, Observed>,
}

/// [`ViewportObserver`] for the terminal grid.
///
/// Visibility is sampled after each draw through the paired
/// [`ViewportProbe`].
#[derive(Debug)]
pub struct TerminalViewport {
    inner: Arc<Mutex<ViewportInner>>,
}

/// Reports visibility of observed cards after a frame has been drawn.
#[derive(Debug, Clone)]
pub struct ViewportProbe {
    inner: Arc<Mutex<ViewportInner>>,
}

impl TerminalViewport {
    /// Creates an observer and the probe that feeds it.
    #[must_use]
    pub fn new() -> (Self, ViewportProbe) {
        let inner = Arc::new(Mutex::new(ViewportInner::default()));
        (
            Self {
                inner: inner.clone(),
            },
            ViewportProbe { inner },
        )
    }
}

impl ViewportObserver for TerminalViewport {
    fn observe(&mut self, target: &PhotoId) -> ObservationId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        let id = ObservationId(inner.next_id);
        inner.observations.insert(
            id,
            Observed {
                target: target.clone(),
                reported: None,
            },
        );
        id
    }

    fn disconnect(&mut self, observation: ObservationId) {
        if self.inner.lock().observations.remove(&observation).is_some() {
            trace!(observation = observation.0, "Viewport observation disconnected");
        }
    }
}

impl ViewportProbe {
    /// Samples every active observation against the drawn frame.
    ///
    /// An entry is produced the first time an observation is sampled and
    /// afterwards only when its visibility changes.
    pub fn report(&self, is_visible: impl Fn(&PhotoId) -> bool) -> Vec<IntersectionEntry> {
        let mut inner = self.inner.lock();
        let mut entries = Vec::new();
        for (id, observed) in &mut inner.observations {
            let visible = is_visible(&observed.target);
            if observed.reported != Some(visible) {
                observed.reported = Some(visible);
                entries.push(IntersectionEntry {
                    observation: *id,
                    is_intersecting: visible,
                });
            }
        }
        entries
    }

    /// Number of active observations.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.lock().observations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_always_reported() {
        let (mut viewport, probe) = TerminalViewport::new();
        let id = viewport.observe(&PhotoId::new("9"));

        let entries = probe.report(|_| false);

        assert_eq!(
            entries,
            vec![IntersectionEntry {
                observation: id,
                is_intersecting: false
            }]
        );
    }

    #[test]
    fn test_only_changes_are_reported() {
        let (mut viewport, probe) = TerminalViewport::new();
        let target = PhotoId::new("9");
        viewport.observe(&target);

        assert_eq!(probe.report(|_| false).len(), 1);
        assert!(probe.report(|_| false).is_empty());

        let entries = probe.report(|id| *id == target);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
    }

    #[test]
    fn test_disconnected_observation_reports_nothing() {
        let (mut viewport, probe) = TerminalViewport::new();
        let id = viewport.observe(&PhotoId::new("9"));
        viewport.disconnect(id);

        assert!(probe.report(|_| true).is_empty());
        assert_eq!(probe.active_count(), 0);
    }

    #[test]
    fn test_observation_ids_are_unique() {
        let (mut viewport, _probe) = TerminalViewport::new();
        let first = viewport.observe(&PhotoId::new("1"));
        viewport.disconnect(first);
        let second = viewport.observe(&PhotoId::new("1"));
        assert_ne!(first, second);
    }
}
