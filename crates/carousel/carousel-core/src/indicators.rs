//! Indicator controls, one per slide.

use serde::{Deserialize, Serialize};

use crate::host::CarouselHost;
use crate::registry::RegisteredSlide;

/// Accessible role of every indicator control.
pub const INDICATOR_ROLE: &str = "tab";

/// Description of one indicator control handed to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    /// 0-based slide position the control jumps to.
    pub position: usize,
    /// Identifier of the controlled slide (`aria-controls`).
    pub slide_id: String,
    /// Accessible label (`aria-label`).
    pub label: String,
}

pub fn indicator_label(position: usize) -> String {
    format!("Go to slide {}", position + 1)
}

pub fn build_indicators<S>(slides: &[RegisteredSlide<S>]) -> Vec<IndicatorSpec> {
    slides
        .iter()
        .enumerate()
        .map(|(position, slide)| IndicatorSpec {
            position,
            slide_id: slide.id.clone(),
            label: indicator_label(position),
        })
        .collect()
}

/// Replace the whole indicator group. Returns the number of controls built,
/// or `None` when the carousel has no indicator group.
pub fn rebuild_indicators<H: CarouselHost>(
    host: &mut H,
    slides: &[RegisteredSlide<H::Slide>],
) -> Option<usize> {
    if !host.has_indicator_group() {
        return None;
    }
    let specs = build_indicators(slides);
    host.replace_indicators(&specs);
    Some(specs.len())
}

/// Mark the control at `active` selected and every other one unselected.
pub fn mark_active<H: CarouselHost>(host: &mut H, count: usize, active: usize) {
    if !host.has_indicator_group() {
        return;
    }
    for position in 0..count {
        host.set_indicator_active(position, position == active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_spec_per_slide_in_order() {
        let slides = vec![
            RegisteredSlide { handle: 0u8, id: "a".into() },
            RegisteredSlide { handle: 1u8, id: "b".into() },
        ];
        let specs = build_indicators(&slides);
        assert_eq!(
            specs,
            vec![
                IndicatorSpec {
                    position: 0,
                    slide_id: "a".into(),
                    label: "Go to slide 1".into()
                },
                IndicatorSpec {
                    position: 1,
                    slide_id: "b".into(),
                    label: "Go to slide 2".into()
                },
            ]
        );
    }

    #[test]
    fn no_slides_no_specs() {
        let slides: Vec<RegisteredSlide<u8>> = Vec::new();
        assert!(build_indicators(&slides).is_empty());
    }
}
