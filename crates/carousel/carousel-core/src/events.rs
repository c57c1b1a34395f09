//! Semantic events recorded by the controller for adapters to forward.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum CarouselEvent {
    Initialized { slides: usize },
    ActiveChanged { index: usize },
    AutoplayStarted,
    AutoplayStopped,
    SlidesChanged { slides: usize },
    IndicatorsRebuilt { count: usize },
}
