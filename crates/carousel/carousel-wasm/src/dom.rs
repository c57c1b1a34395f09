//! `CarouselHost` over a live DOM subtree.

use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use js_sys::Array;
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MutationObserver, MutationObserverInit, MutationRecord,
    ScrollToOptions,
};

use carousel_core::{
    Carousel, CarouselConfig, CarouselContainer, CarouselHost, IndicatorSpec, Interaction,
    Intersection, ScrollBehavior, INDICATOR_ROLE,
};

pub(crate) type SharedCarousel = Rc<RefCell<Carousel<DomHost>>>;

/// Late-bound handle from DOM callbacks back to their carousel. Filled right
/// after mount; every callback fires asynchronously, so it is set by then.
#[derive(Clone, Default)]
pub(crate) struct Owner(Rc<OnceCell<Weak<RefCell<Carousel<DomHost>>>>>);

impl Owner {
    fn bind(&self, shared: &SharedCarousel) {
        let _ = self.0.set(Rc::downgrade(shared));
    }

    fn with(&self, what: &str, f: impl FnOnce(&mut Carousel<DomHost>)) {
        let Some(shared) = self.0.get().and_then(Weak::upgrade) else {
            return;
        };
        let Ok(mut carousel) = shared.try_borrow_mut() else {
            warn!("carousel busy, dropping {what}");
            return;
        };
        f(&mut carousel);
    }
}

fn log_err(what: &str, res: Result<(), JsValue>) {
    if let Err(e) = res {
        warn!("carousel: {what} failed: {e:?}");
    }
}

struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

pub struct DomHost {
    document: Option<Document>,
    track: Element,
    indicators: Option<Element>,
    slide_selector: String,
    indicator_class: String,
    active_class: String,
    buttons: Vec<Element>,
    button_listeners: Vec<EventListener>,
    visibility: Option<VisibilityObserver>,
    owner: Owner,
}

impl DomHost {
    fn new(
        track: Element,
        indicators: Option<Element>,
        config: &CarouselConfig,
        owner: Owner,
    ) -> Self {
        Self {
            document: track.owner_document(),
            track,
            indicators,
            slide_selector: config.selectors.slide.clone(),
            indicator_class: config.indicator_class.clone(),
            active_class: config.active_class.clone(),
            buttons: Vec::new(),
            button_listeners: Vec::new(),
            visibility: None,
            owner,
        }
    }

    pub fn track(&self) -> &Element {
        &self.track
    }

    fn create_indicator(
        &self,
        document: &Document,
        spec: &IndicatorSpec,
    ) -> Result<Element, JsValue> {
        let button = document.create_element("button")?;
        button.set_class_name(&self.indicator_class);
        button.set_attribute("type", "button")?;
        button.set_attribute("role", INDICATOR_ROLE)?;
        button.set_attribute("aria-controls", &spec.slide_id)?;
        button.set_attribute("aria-label", &spec.label)?;
        Ok(button)
    }
}

impl CarouselHost for DomHost {
    type Slide = Element;
    type Timer = Interval;

    fn slides(&self) -> Vec<Element> {
        let Ok(list) = self.track.query_selector_all(&self.slide_selector) else {
            warn!("carousel: invalid slide selector {}", self.slide_selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn slide_id(&self, slide: &Element) -> Option<String> {
        let id = slide.id();
        (!id.is_empty()).then_some(id)
    }

    fn set_slide_id(&mut self, slide: &Element, id: &str) {
        slide.set_id(id);
    }

    fn slide_offset(&self, slide: &Element) -> f64 {
        let slide_left = slide.get_bounding_client_rect().left();
        let track_left = self.track.get_bounding_client_rect().left();
        let border = f64::from(self.track.client_left());
        slide_left - track_left - border + f64::from(self.track.scroll_left())
    }

    fn scroll_track(&mut self, left: f64, behavior: ScrollBehavior) {
        let opts = ScrollToOptions::new();
        opts.set_left(left);
        opts.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.track.scroll_to_with_scroll_to_options(&opts);
    }

    fn has_indicator_group(&self) -> bool {
        self.indicators.is_some()
    }

    fn replace_indicators(&mut self, indicators: &[IndicatorSpec]) {
        let (Some(group), Some(document)) = (self.indicators.clone(), self.document.clone()) else {
            return;
        };
        self.button_listeners.clear();
        self.buttons.clear();
        group.set_inner_html("");
        for spec in indicators {
            let button = match self.create_indicator(&document, spec) {
                Ok(button) => button,
                Err(e) => {
                    warn!("carousel: indicator {} not created: {e:?}", spec.position);
                    continue;
                }
            };
            let owner = self.owner.clone();
            let position = spec.position;
            let listener = EventListener::new(&button, "click", move |_event: &Event| {
                owner.with("indicator click", |c| c.go_to(position, ScrollBehavior::Smooth));
            });
            log_err("append indicator", group.append_child(&button).map(|_| ()));
            self.button_listeners.push(listener);
            self.buttons.push(button);
        }
    }

    fn set_indicator_active(&mut self, position: usize, active: bool) {
        let Some(button) = self.buttons.get(position) else {
            return;
        };
        log_err(
            "toggle active class",
            button
                .class_list()
                .toggle_with_force(&self.active_class, active)
                .map(|_| ()),
        );
        log_err(
            "set aria-selected",
            button.set_attribute("aria-selected", if active { "true" } else { "false" }),
        );
    }

    fn observe_visibility(&mut self, slides: &[Element], threshold: f64) {
        self.disconnect_visibility();
        let owner = self.owner.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let batch: Vec<Intersection<Element>> = entries
                    .iter()
                    .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| Intersection {
                        target: entry.target(),
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    })
                    .collect();
                owner.with("intersection batch", |c| c.on_intersections(&batch));
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_root(Some(&self.track));
        init.set_threshold(&JsValue::from_f64(threshold));
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                for slide in slides {
                    observer.observe(slide);
                }
                self.visibility = Some(VisibilityObserver {
                    observer,
                    _callback: callback,
                });
            }
            Err(e) => warn!("carousel: IntersectionObserver unavailable: {e:?}"),
        }
    }

    fn disconnect_visibility(&mut self) {
        if let Some(visibility) = self.visibility.take() {
            visibility.observer.disconnect();
        }
    }

    fn start_interval(&mut self, period_ms: u32) -> Interval {
        let owner = self.owner.clone();
        let track = self.track.clone();
        Interval::new(period_ms, move || {
            if !track.is_connected() {
                crate::schedule_page_prune();
                return;
            }
            owner.with("autoplay tick", |c| c.on_autoplay_tick());
        })
    }

    fn cancel_interval(&mut self, timer: Interval) {
        drop(timer);
    }
}

pub(crate) struct DomContainer {
    root: Element,
    owner: Owner,
}

impl CarouselContainer for DomContainer {
    type Host = DomHost;

    fn is_initialized(&self, attribute: &str) -> bool {
        self.root.has_attribute(attribute)
    }

    fn mark_initialized(&mut self, attribute: &str) {
        log_err("mark initialized", self.root.set_attribute(attribute, "true"));
    }

    fn resolve_track(&mut self, config: &CarouselConfig) -> Option<DomHost> {
        let track = self.root.query_selector(&config.selectors.track).ok().flatten()?;
        let indicators = self
            .root
            .query_selector(&config.selectors.indicators)
            .ok()
            .flatten();
        Some(DomHost::new(track, indicators, config, self.owner.clone()))
    }
}

/// Events on the track that drive the interaction gate.
const INTERACTIONS: [(&str, Interaction); 6] = [
    ("mouseenter", Interaction::PointerEnter),
    ("mouseleave", Interaction::PointerLeave),
    ("focusin", Interaction::FocusIn),
    ("focusout", Interaction::FocusOut),
    ("pointerdown", Interaction::PointerDown),
    ("pointerup", Interaction::PointerUp),
];

/// Child-list watch on a node; `on_change` runs once per batch that added or
/// removed children. Disconnects on drop.
pub(crate) struct StructureObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl StructureObserver {
    pub(crate) fn watch(
        target: &web_sys::Node,
        subtree: bool,
        mut on_change: impl FnMut() + 'static,
    ) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
            move |records: Array, _observer: MutationObserver| {
                let child_list = records
                    .iter()
                    .filter_map(|r| r.dyn_into::<MutationRecord>().ok())
                    .any(|r| r.type_() == "childList");
                if child_list {
                    on_change();
                }
            },
        );
        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(e) => {
                warn!("carousel: MutationObserver unavailable: {e:?}");
                return None;
            }
        };
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(subtree);
        if let Err(e) = observer.observe_with_options(target, &init) {
            warn!("carousel: cannot observe child list: {e:?}");
            return None;
        }
        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for StructureObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// A carousel mounted on a page element together with the listeners and
/// observers that feed it. Dropping it detaches everything.
pub(crate) struct DomCarousel {
    shared: SharedCarousel,
    track: Element,
    _listeners: Vec<EventListener>,
    _structure: Option<StructureObserver>,
}

impl DomCarousel {
    pub(crate) fn attach(
        root: &Element,
        config: &CarouselConfig,
        reduced_motion: bool,
    ) -> Option<Self> {
        let owner = Owner::default();
        let mut container = DomContainer {
            root: root.clone(),
            owner: owner.clone(),
        };
        let carousel = Carousel::mount(&mut container, config.clone(), reduced_motion)?;
        let track = carousel.host().track().clone();
        let shared = Rc::new(RefCell::new(carousel));
        owner.bind(&shared);

        let listeners = INTERACTIONS
            .iter()
            .map(|&(name, interaction)| {
                let owner = owner.clone();
                EventListener::new(&track, name, move |_event: &Event| {
                    owner.with(name, |c| c.on_interaction(interaction));
                })
            })
            .collect();
        let structure = StructureObserver::watch(&track, false, move || {
            owner.with("slide mutation", |c| c.on_slides_changed());
        });

        Some(Self {
            shared,
            track,
            _listeners: listeners,
            _structure: structure,
        })
    }

    /// Whether the track is still part of a document.
    pub(crate) fn is_connected(&self) -> bool {
        self.track.is_connected()
    }

    pub(crate) fn carousel(&self) -> &SharedCarousel {
        &self.shared
    }
}

impl Drop for DomCarousel {
    fn drop(&mut self) {
        if let Ok(mut carousel) = self.shared.try_borrow_mut() {
            carousel.dispose();
        }
    }
}
