//! In-memory host.
//!
//! `MemoryHost` models one carousel subtree without a browser: slides laid out
//! side by side with fixed widths, a track viewport with a scroll position, an
//! optional indicator group, a threshold-crossing visibility observer and
//! interval timers on a virtual clock. `Simulation` drives a mounted carousel
//! over that clock and feeds observer output back into the controller, the
//! way a browser event loop would.

use hashbrown::HashMap;

use crate::config::CarouselConfig;
use crate::controller::Carousel;
use crate::gate::Interaction;
use crate::host::{CarouselContainer, CarouselHost, Intersection, ScrollBehavior};
use crate::indicators::{IndicatorSpec, INDICATOR_ROLE};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlideKey(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct MemorySlide {
    pub key: SlideKey,
    pub id: Option<String>,
    pub width: f64,
}

/// Attributes of a generated indicator control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryIndicator {
    pub role: String,
    pub controls: String,
    pub label: String,
    pub active: bool,
    /// `aria-selected`; unset until the first activation pass.
    pub selected: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollRequest {
    pub left: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct MemoryInterval {
    id: TimerId,
    period_ms: u64,
    next_due: u64,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    slides: Vec<MemorySlide>,
    next_key: u32,
    viewport_width: f64,
    scroll_left: f64,
    scrolls: Vec<ScrollRequest>,
    indicators: Option<Vec<MemoryIndicator>>,
    indicator_builds: usize,
    observed: Vec<SlideKey>,
    threshold: f64,
    crossed: HashMap<SlideKey, bool>,
    pending: Vec<Intersection<SlideKey>>,
    subscriptions: usize,
    intervals: Vec<MemoryInterval>,
    next_timer: u32,
    intervals_started: usize,
    now_ms: u64,
}

impl MemoryHost {
    /// Empty track whose viewport is `viewport_width` wide.
    pub fn new(viewport_width: f64) -> Self {
        Self {
            viewport_width,
            ..Self::default()
        }
    }

    pub fn with_slide(mut self, width: f64) -> Self {
        self.push_slide(None, width);
        self
    }

    pub fn with_named_slide(mut self, id: &str, width: f64) -> Self {
        self.push_slide(Some(id.to_string()), width);
        self
    }

    /// Give the carousel an (empty) indicator group.
    pub fn with_indicators(mut self) -> Self {
        self.indicators = Some(Vec::new());
        self
    }

    pub fn push_slide(&mut self, id: Option<String>, width: f64) -> SlideKey {
        let position = self.slides.len();
        self.insert_slide(position, id, width)
    }

    /// Insert a slide at `position` (clamped to the end).
    pub fn insert_slide(&mut self, position: usize, id: Option<String>, width: f64) -> SlideKey {
        let key = SlideKey(self.next_key);
        self.next_key += 1;
        let position = position.min(self.slides.len());
        self.slides.insert(position, MemorySlide { key, id, width });
        self.collect_crossings();
        key
    }

    pub fn remove_slide(&mut self, position: usize) -> Option<MemorySlide> {
        if position >= self.slides.len() {
            return None;
        }
        let removed = self.slides.remove(position);
        self.crossed.remove(&removed.key);
        self.collect_crossings();
        Some(removed)
    }

    pub fn slide_ids(&self) -> Vec<Option<&str>> {
        self.slides.iter().map(|s| s.id.as_deref()).collect()
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scrolls
    }

    pub fn indicators(&self) -> Option<&[MemoryIndicator]> {
        self.indicators.as_deref()
    }

    /// Positions of indicators whose `aria-selected` is true.
    pub fn selected_positions(&self) -> Vec<usize> {
        self.indicators
            .iter()
            .flatten()
            .enumerate()
            .filter(|(_, ind)| ind.selected == Some(true))
            .map(|(position, _)| position)
            .collect()
    }

    pub fn indicator_builds(&self) -> usize {
        self.indicator_builds
    }

    /// Slides covered by the live visibility subscription.
    pub fn observed(&self) -> &[SlideKey] {
        &self.observed
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions
    }

    pub fn pending_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn intervals_started(&self) -> usize {
        self.intervals_started
    }

    pub fn interval_period(&self) -> Option<u64> {
        self.intervals.first().map(|i| i.period_ms)
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Earliest deadline among pending intervals.
    pub fn next_due(&self) -> Option<u64> {
        self.intervals.iter().map(|i| i.next_due).min()
    }

    /// Move the clock to `now` and reschedule the interval due at that time.
    /// Returns the timer that fired.
    pub fn fire_due(&mut self, now: u64) -> Option<TimerId> {
        self.now_ms = now;
        let interval = self
            .intervals
            .iter_mut()
            .filter(|i| i.next_due <= now)
            .min_by_key(|i| i.next_due)?;
        interval.next_due += interval.period_ms;
        Some(interval.id)
    }

    pub fn set_now(&mut self, now: u64) {
        self.now_ms = now;
    }

    /// Intersection entries produced since the last call.
    pub fn take_intersections(&mut self) -> Vec<Intersection<SlideKey>> {
        std::mem::take(&mut self.pending)
    }

    /// Visible fraction of the slide at `position` inside the viewport.
    pub fn visible_ratio(&self, position: usize) -> f64 {
        let Some(slide) = self.slides.get(position) else {
            return 0.0;
        };
        if slide.width <= 0.0 {
            return 0.0;
        }
        let start = self.offset_of(position);
        let end = start + slide.width;
        let view_start = self.scroll_left;
        let view_end = self.scroll_left + self.viewport_width;
        let visible = (end.min(view_end) - start.max(view_start)).max(0.0);
        visible / slide.width
    }

    fn position_of(&self, key: SlideKey) -> Option<usize> {
        self.slides.iter().position(|s| s.key == key)
    }

    fn offset_of(&self, position: usize) -> f64 {
        self.slides[..position].iter().map(|s| s.width).sum()
    }

    fn max_scroll(&self) -> f64 {
        let content: f64 = self.slides.iter().map(|s| s.width).sum();
        (content - self.viewport_width).max(0.0)
    }

    /// Queue one entry for every observed slide whose side of the threshold
    /// changed; slides never reported before always produce an entry.
    fn collect_crossings(&mut self) {
        self.scroll_left = self.scroll_left.min(self.max_scroll());
        if self.observed.is_empty() {
            return;
        }
        for key in self.observed.clone() {
            let Some(position) = self.position_of(key) else {
                continue;
            };
            let ratio = self.visible_ratio(position);
            let above = ratio >= self.threshold;
            if self.crossed.get(&key) != Some(&above) {
                self.crossed.insert(key, above);
                self.pending.push(Intersection {
                    target: key,
                    is_intersecting: ratio > 0.0,
                    ratio,
                });
            }
        }
    }
}

impl CarouselHost for MemoryHost {
    type Slide = SlideKey;
    type Timer = TimerId;

    fn slides(&self) -> Vec<SlideKey> {
        self.slides.iter().map(|s| s.key).collect()
    }

    fn slide_id(&self, slide: &SlideKey) -> Option<String> {
        let position = self.position_of(*slide)?;
        self.slides[position].id.clone()
    }

    fn set_slide_id(&mut self, slide: &SlideKey, id: &str) {
        if let Some(position) = self.position_of(*slide) {
            self.slides[position].id = Some(id.to_string());
        }
    }

    fn slide_offset(&self, slide: &SlideKey) -> f64 {
        self.position_of(*slide)
            .map(|position| self.offset_of(position))
            .unwrap_or(0.0)
    }

    fn scroll_track(&mut self, left: f64, behavior: ScrollBehavior) {
        self.scrolls.push(ScrollRequest { left, behavior });
        self.scroll_left = left.clamp(0.0, self.max_scroll());
        self.collect_crossings();
    }

    fn has_indicator_group(&self) -> bool {
        self.indicators.is_some()
    }

    fn replace_indicators(&mut self, indicators: &[IndicatorSpec]) {
        let Some(group) = self.indicators.as_mut() else {
            return;
        };
        *group = indicators
            .iter()
            .map(|spec| MemoryIndicator {
                role: INDICATOR_ROLE.to_string(),
                controls: spec.slide_id.clone(),
                label: spec.label.clone(),
                active: false,
                selected: None,
            })
            .collect();
        self.indicator_builds += 1;
    }

    fn set_indicator_active(&mut self, position: usize, active: bool) {
        if let Some(ind) = self.indicators.as_mut().and_then(|g| g.get_mut(position)) {
            ind.active = active;
            ind.selected = Some(active);
        }
    }

    fn observe_visibility(&mut self, slides: &[SlideKey], threshold: f64) {
        self.observed = slides.to_vec();
        self.threshold = threshold;
        self.crossed.clear();
        self.subscriptions += 1;
        self.collect_crossings();
    }

    fn disconnect_visibility(&mut self) {
        self.observed.clear();
        self.crossed.clear();
        self.pending.clear();
    }

    fn start_interval(&mut self, period_ms: u32) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.intervals.push(MemoryInterval {
            id,
            period_ms: u64::from(period_ms),
            next_due: self.now_ms + u64::from(period_ms),
        });
        self.intervals_started += 1;
        id
    }

    fn cancel_interval(&mut self, timer: TimerId) {
        self.intervals.retain(|i| i.id != timer);
    }
}

/// Container element holding the initialization marker and, optionally, a
/// track. The track is handed over to the carousel on mount.
#[derive(Clone, Debug, Default)]
pub struct MemoryContainer {
    attributes: HashMap<String, String>,
    track: Option<MemoryHost>,
}

impl MemoryContainer {
    pub fn new(track: MemoryHost) -> Self {
        Self {
            attributes: HashMap::new(),
            track: Some(track),
        }
    }

    pub fn without_track() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl CarouselContainer for MemoryContainer {
    type Host = MemoryHost;

    fn is_initialized(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    fn mark_initialized(&mut self, attribute: &str) {
        self.attributes.insert(attribute.to_string(), "true".to_string());
    }

    fn resolve_track(&mut self, _config: &CarouselConfig) -> Option<MemoryHost> {
        self.track.take()
    }
}

/// Virtual-clock driver for a carousel mounted on a `MemoryHost`.
#[derive(Debug)]
pub struct Simulation {
    carousel: Carousel<MemoryHost>,
    now_ms: u64,
}

impl Simulation {
    pub fn new(carousel: Carousel<MemoryHost>) -> Self {
        let now_ms = carousel.host().now_ms();
        let mut sim = Self { carousel, now_ms };
        sim.flush();
        sim
    }

    pub fn mount(
        container: &mut MemoryContainer,
        config: CarouselConfig,
        reduced_motion: bool,
    ) -> Option<Self> {
        Carousel::mount(container, config, reduced_motion).map(Self::new)
    }

    pub fn carousel(&self) -> &Carousel<MemoryHost> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel<MemoryHost> {
        &mut self.carousel
    }

    pub fn host(&self) -> &MemoryHost {
        self.carousel.host()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn active_index(&self) -> Option<usize> {
        self.carousel.active_index()
    }

    /// Advance the clock by `ms`, firing every interval deadline on the way.
    pub fn advance(&mut self, ms: u64) {
        let target = self.now_ms + ms;
        while let Some(due) = self.carousel.host().next_due().filter(|due| *due <= target) {
            self.now_ms = due;
            if self.carousel.host_mut().fire_due(due).is_none() {
                break;
            }
            self.carousel.on_autoplay_tick();
            self.flush();
        }
        self.now_ms = target;
        self.carousel.host_mut().set_now(target);
    }

    pub fn interact(&mut self, interaction: Interaction) {
        self.carousel.on_interaction(interaction);
        self.flush();
    }

    /// Activate the indicator at `position`. Returns `false` when there is no
    /// such control.
    pub fn click_indicator(&mut self, position: usize) -> bool {
        let exists = self
            .carousel
            .host()
            .indicators()
            .is_some_and(|group| position < group.len());
        if exists {
            self.carousel.go_to(position, ScrollBehavior::Smooth);
            self.flush();
        }
        exists
    }

    pub fn insert_slide(&mut self, position: usize, width: f64) -> SlideKey {
        let key = self.carousel.host_mut().insert_slide(position, None, width);
        self.carousel.on_slides_changed();
        self.flush();
        key
    }

    pub fn remove_slide(&mut self, position: usize) -> Option<MemorySlide> {
        let removed = self.carousel.host_mut().remove_slide(position)?;
        self.carousel.on_slides_changed();
        self.flush();
        Some(removed)
    }

    fn flush(&mut self) {
        let entries = self.carousel.host_mut().take_intersections();
        if !entries.is_empty() {
            self.carousel.on_intersections(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> MemoryHost {
        MemoryHost::new(100.0)
            .with_slide(100.0)
            .with_slide(100.0)
            .with_slide(100.0)
    }

    #[test]
    fn observe_reports_initial_state() {
        let mut h = host();
        let keys = CarouselHost::slides(&h);
        h.observe_visibility(&keys, 0.6);
        let entries = h.take_intersections();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_intersecting && entries[0].ratio == 1.0);
        assert!(!entries[1].is_intersecting);
    }

    #[test]
    fn scrolling_reports_only_crossings() {
        let mut h = host();
        let keys = CarouselHost::slides(&h);
        h.observe_visibility(&keys, 0.6);
        h.take_intersections();
        h.scroll_track(100.0, ScrollBehavior::Smooth);
        let entries = h.take_intersections();
        let targets: Vec<_> = entries.iter().map(|e| e.target).collect();
        assert_eq!(targets, vec![keys[0], keys[1]]);
        h.scroll_track(100.0, ScrollBehavior::Smooth);
        assert!(h.take_intersections().is_empty());
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut h = host();
        h.scroll_track(10_000.0, ScrollBehavior::Instant);
        assert_eq!(h.scroll_left(), 200.0);
        assert_eq!(h.visible_ratio(2), 1.0);
    }

    #[test]
    fn partial_visibility_ratio() {
        let mut h = host();
        h.scroll_track(50.0, ScrollBehavior::Instant);
        assert_eq!(h.visible_ratio(0), 0.5);
        assert_eq!(h.visible_ratio(1), 0.5);
    }

    #[test]
    fn intervals_fire_on_period() {
        let mut h = host();
        let id = h.start_interval(3000);
        assert_eq!(h.next_due(), Some(3000));
        assert_eq!(h.fire_due(2999), None);
        assert_eq!(h.fire_due(3000), Some(id));
        assert_eq!(h.next_due(), Some(6000));
        h.cancel_interval(id);
        assert_eq!(h.next_due(), None);
    }
}
