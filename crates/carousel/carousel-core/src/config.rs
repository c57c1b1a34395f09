//! Carousel configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CarouselError, Result};

pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u32 = 3000;
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.6;

/// Selectors used to discover the carousel subtree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub container: String,
    pub track: String,
    /// Optional group that receives the generated indicator controls.
    pub indicators: String,
    pub slide: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            container: ".carousel".into(),
            track: ".track".into(),
            indicators: ".dots".into(),
            slide: ".slide".into(),
        }
    }
}

/// Per-carousel tuning. Every field has a default, so partial JSON objects
/// such as `{ "autoplay_interval_ms": 5000 }` are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Period of the autoplay interval.
    pub autoplay_interval_ms: u32,
    /// Visible fraction a slide must reach while entering view to become active.
    pub visibility_threshold: f64,
    /// Prefix of generated slide identifiers; the suffix is the 1-based position.
    pub slide_id_prefix: String,
    pub selectors: Selectors,
    pub indicator_class: String,
    pub active_class: String,
    /// Attribute marking a container as initialized.
    pub initialized_attribute: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay_interval_ms: DEFAULT_AUTOPLAY_INTERVAL_MS,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            slide_id_prefix: "carousel-slide-".into(),
            selectors: Selectors::default(),
            indicator_class: "dot".into(),
            active_class: "active".into(),
            initialized_attribute: "data-initialized".into(),
        }
    }
}

impl CarouselConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: CarouselConfig =
            serde_json::from_str(raw).map_err(|e| CarouselError::ConfigParse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.autoplay_interval_ms == 0 {
            return Err(CarouselError::InvalidConfig(
                "autoplay_interval_ms must be greater than zero".into(),
            ));
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(CarouselError::InvalidConfig(format!(
                "visibility_threshold must be in (0, 1], got {}",
                self.visibility_threshold
            )));
        }
        let named = [
            ("slide_id_prefix", &self.slide_id_prefix),
            ("selectors.container", &self.selectors.container),
            ("selectors.track", &self.selectors.track),
            ("selectors.indicators", &self.selectors.indicators),
            ("selectors.slide", &self.selectors.slide),
            ("indicator_class", &self.indicator_class),
            ("active_class", &self.active_class),
            ("initialized_attribute", &self.initialized_attribute),
        ];
        if let Some((name, _)) = named.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(CarouselError::InvalidConfig(format!("{name} must not be empty")));
        }
        Ok(())
    }
}
