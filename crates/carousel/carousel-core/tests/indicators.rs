mod common;

use carousel_core::memory::{MemoryContainer, Simulation};
use carousel_core::{CarouselConfig, ScrollBehavior, INDICATOR_ROLE};
use carousel_test_fixtures::{configs, pages};

#[test]
fn clicking_an_indicator_navigates_and_activates() {
    let mut sim = common::mount("three-slides");
    assert!(sim.click_indicator(2));

    let scroll = *sim.host().scroll_requests().last().unwrap();
    assert_eq!(scroll.left, 640.0);
    assert_eq!(scroll.behavior, ScrollBehavior::Smooth);
    assert_eq!(sim.active_index(), Some(2));
    assert_eq!(sim.host().selected_positions(), vec![2]);

    assert!(!sim.click_indicator(3));
}

#[test]
fn autoplay_continues_from_clicked_slide() {
    let mut sim = common::mount("three-slides");
    sim.advance(1000);
    sim.click_indicator(2);
    sim.advance(2000);
    assert_eq!(sim.active_index(), Some(0));
}

#[test]
fn indicators_carry_accessibility_attributes() {
    let sim = common::mount("preset-ids");
    let indicators = sim.host().indicators().unwrap();
    assert_eq!(indicators.len(), 3);
    for (position, ind) in indicators.iter().enumerate() {
        assert_eq!(ind.role, INDICATOR_ROLE);
        assert_eq!(ind.label, format!("Go to slide {}", position + 1));
        assert_eq!(ind.selected, Some(position == 0));
        assert_eq!(ind.active, position == 0);
    }
    let controls: Vec<_> = indicators.iter().map(|i| i.controls.as_str()).collect();
    assert_eq!(controls, ["intro", "carousel-slide-2", "outro"]);
}

#[test]
fn custom_prefix_is_applied() {
    let config: CarouselConfig = configs::load("custom-prefix").unwrap();
    let sim = common::mount_with("preset-ids", config, false);
    assert_eq!(sim.carousel().slide_ids(), ["intro", "hero-2", "outro"]);
}

#[test]
fn carousel_without_indicator_group_still_autoplays() {
    let mut sim = common::mount("no-indicators");
    assert!(sim.host().indicators().is_none());
    assert!(!sim.click_indicator(0));
    sim.advance(3000);
    assert_eq!(sim.active_index(), Some(1));
}

#[test]
fn initializing_twice_matches_initializing_once() {
    let page = pages::load("three-slides").unwrap();
    let mut container = common::container(&page);
    let sim = Simulation::mount(&mut container, CarouselConfig::default(), false).unwrap();
    assert!(Simulation::mount(&mut container, CarouselConfig::default(), false).is_none());

    assert_eq!(container.attribute("data-initialized"), Some("true"));
    assert_eq!(sim.host().indicator_builds(), 1);
    assert_eq!(sim.host().pending_intervals(), 1);
    assert_eq!(sim.host().subscriptions(), 1);
}

#[test]
fn container_without_track_is_marked_and_left_alone() {
    let page = pages::load("no-track").unwrap();
    let mut container = common::container(&page);
    assert!(Simulation::mount(&mut container, CarouselConfig::default(), false).is_none());
    assert_eq!(container.attribute("data-initialized"), Some("true"));

    let mut bare = MemoryContainer::without_track();
    assert!(Simulation::mount(&mut bare, CarouselConfig::default(), false).is_none());
}

#[test]
fn exactly_one_indicator_selected_on_every_page() {
    for name in pages::keys() {
        let page = pages::load(&name).unwrap();
        let mut container = common::container(&page);
        let Some(mut sim) = Simulation::mount(&mut container, CarouselConfig::default(), false)
        else {
            assert!(page.track.is_none(), "{name}");
            continue;
        };
        for _ in 0..4 {
            let slides = sim.carousel().slide_count();
            let selected = sim.host().selected_positions();
            match sim.host().indicators() {
                Some(_) if slides > 0 => {
                    assert_eq!(selected, vec![sim.active_index().unwrap()], "{name}")
                }
                _ => assert!(selected.is_empty(), "{name}"),
            }
            sim.advance(3000);
        }
    }
}
