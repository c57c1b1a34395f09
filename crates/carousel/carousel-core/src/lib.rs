//! Carousel Core (engine-agnostic)
//!
//! Turns a horizontally scrollable track of slides into an auto-advancing,
//! accessible carousel. The crate holds the whole interaction core: slide
//! registry, indicator builder, visibility tracker, interaction gate, autoplay
//! scheduler and the per-instance controller tying them together. Adapters
//! (the wasm crate, or [`memory`] for headless use) implement [`CarouselHost`]
//! and forward their timer, observer and input events to [`Carousel`].

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod gate;
pub mod host;
pub mod indicators;
pub mod memory;
pub mod registry;
pub mod scheduler;
pub mod visibility;

// Re-exports for consumers (adapters)
pub use config::{CarouselConfig, Selectors};
pub use controller::Carousel;
pub use error::{CarouselError, Result};
pub use events::CarouselEvent;
pub use gate::{Interaction, InteractionGate, Signal};
pub use host::{CarouselContainer, CarouselHost, Intersection, ScrollBehavior};
pub use indicators::{indicator_label, IndicatorSpec, INDICATOR_ROLE};
pub use registry::{slide_id_for, RegisteredSlide};
pub use scheduler::AutoplayState;
pub use visibility::VisibilityTracker;
