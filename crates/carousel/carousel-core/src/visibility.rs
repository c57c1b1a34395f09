//! Visibility tracking: which slide is predominantly in view.

use log::trace;

use crate::host::{CarouselHost, Intersection};
use crate::registry::RegisteredSlide;

#[derive(Clone, Debug)]
pub struct VisibilityTracker {
    threshold: f64,
    subscribed: bool,
}

impl VisibilityTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            subscribed: false,
        }
    }

    /// Re-create the subscription for the current slide sequence. The previous
    /// subscription is dropped first so removed slides stop reporting.
    pub fn subscribe<H: CarouselHost>(
        &mut self,
        host: &mut H,
        slides: &[RegisteredSlide<H::Slide>],
    ) {
        if self.subscribed {
            host.disconnect_visibility();
        }
        let handles: Vec<H::Slide> = slides.iter().map(|s| s.handle.clone()).collect();
        host.observe_visibility(&handles, self.threshold);
        self.subscribed = true;
    }

    pub fn unsubscribe<H: CarouselHost>(&mut self, host: &mut H) {
        if self.subscribed {
            host.disconnect_visibility();
            self.subscribed = false;
        }
    }

    /// Whether an entry reports its slide entering view past the threshold.
    pub fn crosses<S>(&self, entry: &Intersection<S>) -> bool {
        entry.is_intersecting && entry.ratio >= self.threshold
    }

    /// Position of the slide that becomes active for this batch. Entries are
    /// processed in delivery order and the last qualifying one wins; entries
    /// for elements outside the current sequence are skipped.
    pub fn resolve<S: PartialEq>(
        &self,
        entries: &[Intersection<S>],
        slides: &[RegisteredSlide<S>],
    ) -> Option<usize> {
        let mut winner = None;
        for entry in entries.iter().filter(|e| self.crosses(e)) {
            match slides.iter().position(|s| s.handle == entry.target) {
                Some(idx) => winner = Some(idx),
                None => trace!("ignoring intersection for detached slide"),
            }
        }
        winner
    }
}
