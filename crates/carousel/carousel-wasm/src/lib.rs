use std::cell::RefCell;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use log::{debug, warn};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use carousel_core::{CarouselConfig, ScrollBehavior};

mod dom;

use dom::{DomCarousel, StructureObserver};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

thread_local! {
    /// Carousels attached by `init_carousels`; released once their track leaves
    /// the document.
    static PAGE: RefCell<Option<CarouselSet>> = const { RefCell::new(None) };
    /// Document-wide child-list watch that releases carousels removed from
    /// the page.
    static PAGE_WATCH: RefCell<Option<StructureObserver>> = const { RefCell::new(None) };
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn parse_config(config: JsValue) -> Result<CarouselConfig, JsError> {
    let cfg: CarouselConfig = if jsvalue_is_undefined_or_null(&config) {
        CarouselConfig::default()
    } else {
        swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
    };
    cfg.validate()
        .map_err(|e| JsError::new(&format!("config error: {e}")))?;
    Ok(cfg)
}

fn document() -> Result<Document, JsError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("carousel: no document available"))
}

/// Read once; later changes of the preference are not tracked.
fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media(REDUCED_MOTION_QUERY).ok().flatten())
        .map(|mql| mql.matches())
        .unwrap_or(false)
}

/// The carousels attached with one configuration.
#[wasm_bindgen]
pub struct CarouselSet {
    config: CarouselConfig,
    reduced_motion: bool,
    instances: Vec<DomCarousel>,
}

impl CarouselSet {
    fn instance(&self, instance: u32) -> Option<&DomCarousel> {
        self.instances.get(instance as usize)
    }
}

#[wasm_bindgen]
impl CarouselSet {
    /// Create an empty set. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new CarouselSet({ autoplay_interval_ms: 5000 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CarouselSet, JsError> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        Ok(CarouselSet {
            config: parse_config(config)?,
            reduced_motion: prefers_reduced_motion(),
            instances: Vec::new(),
        })
    }

    /// Attach a single container. Returns false when it was already
    /// initialized or has no track.
    #[wasm_bindgen]
    pub fn attach(&mut self, root: Element) -> bool {
        match DomCarousel::attach(&root, &self.config, self.reduced_motion) {
            Some(instance) => {
                self.instances.push(instance);
                true
            }
            None => false,
        }
    }

    /// Attach every container matching the configured selector. Returns the
    /// number of carousels newly attached.
    #[wasm_bindgen(js_name = attach_all)]
    pub fn attach_all(&mut self) -> Result<u32, JsError> {
        let list = document()?
            .query_selector_all(&self.config.selectors.container)
            .map_err(|e| JsError::new(&format!("attach_all: bad container selector: {e:?}")))?;
        let mut attached = 0;
        for i in 0..list.length() {
            let Some(root) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if self.attach(root) {
                attached += 1;
            }
        }
        debug!("attached {attached} carousels");
        Ok(attached)
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> u32 {
        self.instances.len() as u32
    }

    #[wasm_bindgen(js_name = is_empty)]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Active slide of an attached carousel, or undefined.
    #[wasm_bindgen(js_name = active_index)]
    pub fn active_index(&self, instance: u32) -> Option<u32> {
        let carousel = self.instance(instance)?.carousel().try_borrow().ok()?;
        carousel.active_index().map(|i| i as u32)
    }

    /// Smoothly scroll a carousel to a slide. Returns false for an unknown
    /// instance or a busy carousel.
    #[wasm_bindgen(js_name = go_to)]
    pub fn go_to(&self, instance: u32, index: u32) -> bool {
        let Some(dom) = self.instance(instance) else {
            return false;
        };
        let Ok(mut carousel) = dom.carousel().try_borrow_mut() else {
            return false;
        };
        carousel.go_to(index as usize, ScrollBehavior::Smooth);
        true
    }

    /// Drain recorded events of a carousel as a JSON array.
    #[wasm_bindgen(js_name = take_events)]
    pub fn take_events(&self, instance: u32) -> Result<JsValue, JsError> {
        let dom = self
            .instance(instance)
            .ok_or_else(|| JsError::new(&format!("take_events: unknown instance {instance}")))?;
        let events = dom
            .carousel()
            .try_borrow_mut()
            .map_err(|_| JsError::new("take_events: carousel busy"))?
            .drain_events();
        swb::to_value(&events).map_err(|e| JsError::new(&format!("events error: {e}")))
    }

    /// Detach carousels whose track is no longer in the document. Returns the
    /// number released.
    #[wasm_bindgen]
    pub fn prune(&mut self) -> u32 {
        let before = self.instances.len();
        self.instances.retain(DomCarousel::is_connected);
        let released = (before - self.instances.len()) as u32;
        if released > 0 {
            debug!("released {released} detached carousels");
        }
        released
    }

    /// Detach every carousel: cancels timers, disconnects observers and
    /// removes listeners. Markers stay on the containers.
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        self.instances.clear();
    }
}

/// Attach every carousel on the page once the document is parsed and keep
/// each one until its container leaves the document. Calling it again
/// attaches containers added since; initialized ones are skipped.
#[wasm_bindgen(js_name = init_carousels)]
pub fn init_carousels(config: JsValue) -> Result<(), JsError> {
    let set = CarouselSet::new(config)?;
    let document = document()?;
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_event| {
            attach_page(set);
        })
        .forget();
    } else {
        attach_page(set);
    }
    Ok(())
}

fn attach_page(mut set: CarouselSet) {
    if let Err(e) = set.attach_all() {
        warn!("carousel: attach failed: {:?}", JsValue::from(e));
        return;
    }
    PAGE.with(|page| {
        let mut page = page.borrow_mut();
        if let Some(existing) = page.as_mut() {
            existing.instances.append(&mut set.instances);
        } else {
            *page = Some(set);
        }
    });
    watch_page();
}

fn watch_page() {
    PAGE_WATCH.with(|watch| {
        let mut watch = watch.borrow_mut();
        if watch.is_some() {
            return;
        }
        let Ok(document) = document() else {
            return;
        };
        *watch = StructureObserver::watch(&document, true, prune_page);
    });
}

fn prune_page() {
    PAGE.with(|page| {
        if let Ok(mut page) = page.try_borrow_mut() {
            if let Some(set) = page.as_mut() {
                set.prune();
            }
        }
    });
}

/// Prune from a fresh task; callers may be running inside a carousel's own
/// timer.
pub(crate) fn schedule_page_prune() {
    Timeout::new(0, prune_page).forget();
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
