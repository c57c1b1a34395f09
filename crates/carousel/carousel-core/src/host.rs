//! Host contracts.
//!
//! The core never touches a DOM directly. A host owns one carousel subtree
//! (the track, its slides and the optional indicator group) and performs the
//! mutations the controller asks for. Event sources (timers, observers, input)
//! stay on the host side and report back through the controller's `on_*`
//! methods.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::config::CarouselConfig;
use crate::indicators::IndicatorSpec;

/// How the track should reach a new scroll position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// One visibility observation for a slide, relative to the track viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection<S> {
    pub target: S,
    pub is_intersecting: bool,
    /// Visible fraction of the slide in `[0, 1]`.
    pub ratio: f64,
}

/// Operations on a single carousel subtree.
pub trait CarouselHost {
    /// Handle to a slide element. Equality must mean "same element".
    type Slide: Clone + PartialEq + Debug;
    /// Handle to a pending interval; passed back to `cancel_interval`.
    type Timer;

    /// Slides of the track in document order.
    fn slides(&self) -> Vec<Self::Slide>;
    fn slide_id(&self, slide: &Self::Slide) -> Option<String>;
    fn set_slide_id(&mut self, slide: &Self::Slide, id: &str);
    /// Offset of the slide's leading edge from the track's scroll origin.
    fn slide_offset(&self, slide: &Self::Slide) -> f64;
    /// Scroll the track (never the page) to `left`.
    fn scroll_track(&mut self, left: f64, behavior: ScrollBehavior);

    fn has_indicator_group(&self) -> bool;
    /// Replace every child of the indicator group with one control per spec.
    fn replace_indicators(&mut self, indicators: &[IndicatorSpec]);
    fn set_indicator_active(&mut self, position: usize, active: bool);

    /// Replace the visibility subscription with one covering exactly `slides`.
    fn observe_visibility(&mut self, slides: &[Self::Slide], threshold: f64);
    fn disconnect_visibility(&mut self);

    fn start_interval(&mut self, period_ms: u32) -> Self::Timer;
    fn cancel_interval(&mut self, timer: Self::Timer);
}

/// The element a carousel is mounted on.
pub trait CarouselContainer {
    type Host: CarouselHost;

    fn is_initialized(&self, attribute: &str) -> bool;
    fn mark_initialized(&mut self, attribute: &str);
    /// Resolve the track (and optional indicator group) into a host, or
    /// `None` when the container has no track.
    fn resolve_track(&mut self, config: &CarouselConfig) -> Option<Self::Host>;
}
