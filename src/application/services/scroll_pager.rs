//! Requests the next page when the last rendered item scrolls into view.

use tracing::{debug, trace};

use crate::domain::entities::PhotoId;
use crate::domain::ports::{IntersectionEntry, ObservationId, ViewportObserver};

#[derive(Debug, Clone, PartialEq, Eq)]
struct PagerInputs {
    target: Option<PhotoId>,
    loading: bool,
    has_more: bool,
}

/// Owns the single viewport observation used for infinite scrolling.
///
/// At most one observation is active at a time. Entries from disconnected
/// observations are ignored, and nothing is observed while a page is loading.
pub struct ScrollTriggeredPager {
    observer: Box<dyn ViewportObserver>,
    active: Option<ObservationId>,
    inputs: Option<PagerInputs>,
    has_more: bool,
}

impl ScrollTriggeredPager {
    /// Creates a pager driving `observer`.
    #[must_use]
    pub fn new(observer: Box<dyn ViewportObserver>) -> Self {
        Self {
            observer,
            active: None,
            inputs: None,
            has_more: true,
        }
    }

    /// Re-targets the pager. Must be called whenever the last rendered item,
    /// the loading flag or the has-more flag changes; unchanged inputs are a
    /// no-op.
    pub fn attach(&mut self, target: Option<&PhotoId>, loading: bool, has_more: bool) {
        let inputs = PagerInputs {
            target: target.cloned(),
            loading,
            has_more,
        };
        if self.inputs.as_ref() == Some(&inputs) {
            return;
        }
        self.inputs = Some(inputs);
        self.has_more = has_more;

        self.disconnect();

        if loading {
            trace!("Page load in flight, not observing");
            return;
        }

        if let Some(target) = target {
            let observation = self.observer.observe(target);
            trace!(target = %target, observation = observation.0, "Observing sentinel");
            self.active = Some(observation);
        }
    }

    /// Handles a visibility entry. Increments `page` by one and returns true
    /// if the sentinel became visible while more pages are available.
    pub fn on_intersection(&mut self, entry: IntersectionEntry, page: &mut u32) -> bool {
        if self.active != Some(entry.observation) {
            debug!(observation = entry.observation.0, "Ignoring entry from stale observation");
            return false;
        }
        if !entry.is_intersecting || !self.has_more {
            return false;
        }

        *page += 1;
        debug!(page = *page, "Sentinel visible, requesting next page");

        // The next attach, normally with loading set, decides what to observe.
        self.disconnect();
        self.inputs = None;
        true
    }

    fn disconnect(&mut self) {
        if let Some(observation) = self.active.take() {
            self.observer.disconnect(observation);
        }
    }

    /// Returns the active observation, if any.
    #[must_use]
    pub const fn active(&self) -> Option<ObservationId> {
        self.active
    }
}

impl Drop for ScrollTriggeredPager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for ScrollTriggeredPager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTriggeredPager")
            .field("active", &self.active)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}
