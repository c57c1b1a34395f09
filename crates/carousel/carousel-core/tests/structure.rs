mod common;

use carousel_core::memory::MemoryIndicator;
use carousel_core::{CarouselEvent, INDICATOR_ROLE};

fn controls(indicators: &[MemoryIndicator]) -> Vec<&str> {
    indicators.iter().map(|i| i.controls.as_str()).collect()
}

fn labels(indicators: &[MemoryIndicator]) -> Vec<&str> {
    indicators.iter().map(|i| i.label.as_str()).collect()
}

#[test]
fn removing_the_middle_slide_rebuilds_indicators() {
    let mut sim = common::mount("three-slides");
    sim.remove_slide(1).expect("slide removed");

    let indicators = sim.host().indicators().unwrap();
    assert_eq!(controls(indicators), ["carousel-slide-1", "carousel-slide-3"]);
    assert_eq!(labels(indicators), ["Go to slide 1", "Go to slide 2"]);
    assert!(indicators.iter().all(|i| i.role == INDICATOR_ROLE));
    assert_eq!(sim.host().selected_positions(), vec![0]);
    assert_eq!(sim.carousel().slide_ids(), ["carousel-slide-1", "carousel-slide-3"]);
}

#[test]
fn inserted_slide_gets_id_without_disturbing_autoplay() {
    let mut sim = common::mount("three-slides");
    sim.advance(1000);
    sim.insert_slide(3, 320.0);

    assert_eq!(sim.host().slide_ids()[3], Some("carousel-slide-4"));
    assert_eq!(sim.host().indicators().unwrap().len(), 4);
    assert_eq!(sim.host().intervals_started(), 1);
    assert_eq!(sim.active_index(), Some(0));

    sim.advance(2000);
    assert_eq!(sim.active_index(), Some(1));
}

#[test]
fn removing_the_active_last_slide_clamps_the_index() {
    let mut sim = common::mount("three-slides");
    assert!(sim.click_indicator(2));
    assert_eq!(sim.active_index(), Some(2));

    sim.remove_slide(2);
    assert_eq!(sim.active_index(), Some(1));
    assert_eq!(sim.host().selected_positions(), vec![1]);
}

#[test]
fn subscriptions_do_not_accumulate() {
    let mut sim = common::mount("three-slides");
    for round in 0..10 {
        sim.insert_slide(0, 320.0);
        sim.remove_slide(3);
        assert_eq!(sim.host().observed().len(), 3, "round {round}");
    }
    assert_eq!(sim.host().subscriptions(), 21);
    assert_eq!(sim.host().indicator_builds(), 21);
}

#[test]
fn empty_track_comes_alive_when_slides_arrive() {
    let mut sim = common::mount("empty-track");
    assert_eq!(sim.active_index(), None);
    assert_eq!(sim.host().indicators().map(<[_]>::len), Some(0));
    sim.advance(9000);
    assert!(sim.host().scroll_requests().is_empty());

    sim.insert_slide(0, 320.0);
    sim.insert_slide(1, 320.0);
    assert_eq!(sim.active_index(), Some(0));
    assert_eq!(sim.host().selected_positions(), vec![0]);

    sim.advance(3000);
    assert_eq!(sim.active_index(), Some(1));
}

#[test]
fn removing_every_slide_is_safe() {
    let mut sim = common::mount("three-slides");
    for _ in 0..3 {
        sim.remove_slide(0);
    }
    assert_eq!(sim.active_index(), None);
    assert_eq!(sim.host().indicators().map(<[_]>::len), Some(0));
    sim.advance(6000);
    assert!(sim.host().scroll_requests().is_empty());
}

#[test]
fn structural_change_events() {
    let mut sim = common::mount("three-slides");
    sim.carousel_mut().drain_events();
    sim.remove_slide(0);
    let events = sim.carousel_mut().drain_events();
    assert_eq!(
        events,
        vec![
            CarouselEvent::IndicatorsRebuilt { count: 2 },
            CarouselEvent::SlidesChanged { slides: 2 },
        ]
    );
}
