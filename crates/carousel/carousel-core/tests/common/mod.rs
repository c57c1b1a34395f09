#![allow(dead_code)]

use carousel_core::memory::{MemoryContainer, MemoryHost, Simulation};
use carousel_core::CarouselConfig;
use carousel_test_fixtures::{pages, PageFixture};

pub fn container(page: &PageFixture) -> MemoryContainer {
    let Some(track) = &page.track else {
        return MemoryContainer::without_track();
    };
    let mut host = MemoryHost::new(page.viewport_width);
    for slide in &track.slides {
        host.push_slide(slide.id.clone(), slide.width);
    }
    if track.indicators {
        host = host.with_indicators();
    }
    MemoryContainer::new(host)
}

pub fn mount_with(name: &str, config: CarouselConfig, reduced_motion: bool) -> Simulation {
    let page = pages::load(name).expect("page fixture");
    let mut container = container(&page);
    Simulation::mount(&mut container, config, reduced_motion).expect("carousel mounts")
}

pub fn mount(name: &str) -> Simulation {
    mount_with(name, CarouselConfig::default(), false)
}
