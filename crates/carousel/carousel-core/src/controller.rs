//! Per-instance orchestration of registry, indicators, visibility and autoplay.

use log::{debug, trace};

use crate::config::CarouselConfig;
use crate::events::CarouselEvent;
use crate::gate::{Interaction, InteractionGate, Signal};
use crate::host::{CarouselContainer, CarouselHost, Intersection, ScrollBehavior};
use crate::indicators::{mark_active, rebuild_indicators};
use crate::registry::{register_slides, RegisteredSlide};
use crate::scheduler::{AutoplayScheduler, AutoplayState};
use crate::visibility::VisibilityTracker;

/// One mounted carousel. Dropping it cancels its interval and visibility
/// subscription.
pub struct Carousel<H: CarouselHost> {
    host: H,
    config: CarouselConfig,
    slides: Vec<RegisteredSlide<H::Slide>>,
    active: usize,
    gate: InteractionGate,
    tracker: VisibilityTracker,
    autoplay: AutoplayScheduler<H::Timer>,
    events: Vec<CarouselEvent>,
}

impl<H: CarouselHost> std::fmt::Debug for Carousel<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("slides", &self.slides.len())
            .field("active", &self.active)
            .field("gate", &self.gate)
            .field("autoplay", &self.autoplay.state())
            .finish()
    }
}

impl<H: CarouselHost> Carousel<H> {
    /// Initialize a container once. Returns `None` when the container is
    /// already initialized or has no track. A container without a track is
    /// still marked.
    pub fn mount<C>(container: &mut C, config: CarouselConfig, reduced_motion: bool) -> Option<Self>
    where
        C: CarouselContainer<Host = H>,
    {
        if container.is_initialized(&config.initialized_attribute) {
            debug!("carousel already initialized, skipping");
            return None;
        }
        container.mark_initialized(&config.initialized_attribute);
        let Some(host) = container.resolve_track(&config) else {
            debug!("carousel container has no track");
            return None;
        };
        Some(Self::new(host, config, reduced_motion))
    }

    /// Wire a carousel around an already resolved host.
    pub fn new(host: H, config: CarouselConfig, reduced_motion: bool) -> Self {
        let mut carousel = Self {
            host,
            gate: InteractionGate::new(reduced_motion),
            tracker: VisibilityTracker::new(config.visibility_threshold),
            autoplay: AutoplayScheduler::new(config.autoplay_interval_ms),
            config,
            slides: Vec::new(),
            active: 0,
            events: Vec::new(),
        };
        carousel.slides = register_slides(&mut carousel.host, &carousel.config.slide_id_prefix);
        carousel.rebuild_indicators();
        carousel.set_active(0);
        carousel.tracker.subscribe(&mut carousel.host, &carousel.slides);
        let count = carousel.slides.len();
        debug!("carousel initialized with {count} slides");
        carousel.events.push(CarouselEvent::Initialized { slides: count });
        carousel.start_autoplay();
        carousel
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_ids(&self) -> Vec<&str> {
        self.slides.iter().map(|s| s.id.as_str()).collect()
    }

    /// Active position, or `None` for an empty track.
    pub fn active_index(&self) -> Option<usize> {
        (!self.slides.is_empty()).then_some(self.active)
    }

    pub fn autoplay_state(&self) -> AutoplayState {
        self.autoplay.state()
    }

    pub fn is_autoplaying(&self) -> bool {
        self.autoplay.is_running()
    }

    pub fn drain_events(&mut self) -> Vec<CarouselEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scroll the track so slide `index` starts at the visible origin.
    /// Out-of-range positions are ignored. The active index follows once the
    /// slide is reported visible.
    pub fn go_to(&mut self, index: usize, behavior: ScrollBehavior) {
        let Some(slide) = self.slides.get(index) else {
            trace!("go_to({index}) out of range");
            return;
        };
        let left = self.host.slide_offset(&slide.handle);
        trace!("go_to({index}) -> scroll {left}");
        self.host.scroll_track(left, behavior);
    }

    /// Request the slide after the active one, wrapping around.
    pub fn next(&mut self) {
        let count = self.slides.len();
        if count == 0 {
            return;
        }
        self.go_to((self.active + 1) % count, ScrollBehavior::Smooth);
    }

    /// Interval firing reported by the host.
    pub fn on_autoplay_tick(&mut self) {
        if !self.autoplay.is_running() || !self.gate.may_run() {
            trace!("autoplay tick ignored");
            return;
        }
        self.next();
    }

    /// Visibility batch reported by the host.
    pub fn on_intersections(&mut self, entries: &[Intersection<H::Slide>]) {
        trace!("intersection batch of {}", entries.len());
        if let Some(index) = self.tracker.resolve(entries, &self.slides) {
            self.set_active(index);
        }
    }

    /// Children of the track were added or removed. Re-derives slides,
    /// visibility subscription and indicators; autoplay is left untouched.
    pub fn on_slides_changed(&mut self) {
        self.slides = register_slides(&mut self.host, &self.config.slide_id_prefix);
        self.tracker.subscribe(&mut self.host, &self.slides);
        self.rebuild_indicators();
        let count = self.slides.len();
        if count > 0 && self.active >= count {
            self.active = count - 1;
            self.events.push(CarouselEvent::ActiveChanged { index: self.active });
        }
        mark_active(&mut self.host, count, self.active);
        debug!("carousel slides changed, now {count}");
        self.events.push(CarouselEvent::SlidesChanged { slides: count });
    }

    pub fn on_interaction(&mut self, interaction: Interaction) {
        let (signal, on) = interaction.signal();
        self.set_signal(signal, on);
    }

    /// Update one interaction signal and pause or resume autoplay from the
    /// combined gate.
    pub fn set_signal(&mut self, signal: Signal, on: bool) {
        self.gate.set(signal, on);
        if self.gate.may_run() {
            self.start_autoplay();
        } else {
            self.stop_autoplay();
        }
    }

    /// Cancel the interval and drop the visibility subscription. Safe to call
    /// more than once; also runs on drop.
    pub fn dispose(&mut self) {
        self.stop_autoplay();
        self.tracker.unsubscribe(&mut self.host);
    }

    fn set_active(&mut self, index: usize) {
        let count = self.slides.len();
        if index >= count {
            return;
        }
        if index != self.active {
            debug!("active slide {} -> {index}", self.active);
            self.events.push(CarouselEvent::ActiveChanged { index });
        }
        self.active = index;
        mark_active(&mut self.host, count, index);
    }

    fn rebuild_indicators(&mut self) {
        if let Some(count) = rebuild_indicators(&mut self.host, &self.slides) {
            self.events.push(CarouselEvent::IndicatorsRebuilt { count });
        }
    }

    fn start_autoplay(&mut self) {
        if self.autoplay.start(&mut self.host, &self.gate) {
            self.events.push(CarouselEvent::AutoplayStarted);
        }
    }

    fn stop_autoplay(&mut self) {
        if self.autoplay.stop(&mut self.host) {
            self.events.push(CarouselEvent::AutoplayStopped);
        }
    }
}

impl<H: CarouselHost> Drop for Carousel<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
