//! DOM plumbing shared by every component: lookups that tolerate missing
//! markup, class toggles, event wiring and the overlay primitive used by the
//! modal and the menu.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, NodeList, Window};

use crate::error::{Result, SiteError};

pub const VISIBLE: &str = "is-visible";

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(SiteError::NoDocument)
}

pub fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn by_id(doc: &Document, id: &str) -> Option<HtmlElement> {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

pub fn query_all(doc: &Document, selector: &str) -> Vec<Element> {
    doc.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    let list = el.class_list();
    if on {
        list.add_1(class).ok();
    } else {
        list.remove_1(class).ok();
    }
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

/// Sets (or with `None` clears) one inline style property.
pub fn set_style(el: &Element, prop: &str, value: Option<&str>) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let style = html.style();
        match value {
            Some(v) => {
                style.set_property(prop, v).ok();
            }
            None => {
                style.remove_property(prop).ok();
            }
        }
    }
}

/// Suppresses or restores background scrolling on `<body>`.
pub fn lock_scroll(doc: &Document, locked: bool) {
    if let Some(body) = doc.body() {
        set_style(&body, "overflow", locked.then_some("hidden"));
    }
}

/// Registers `handler` for `event` on `target` for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Full-screen layer toggled through the `is-visible` class. Open overlays
/// hold the body scroll lock.
#[derive(Clone, Debug)]
pub struct Overlay {
    el: Element,
}

impl Overlay {
    pub fn new(el: Element) -> Self {
        Self { el }
    }

    pub fn element(&self) -> &Element {
        &self.el
    }

    pub fn is_open(&self) -> bool {
        has_class(&self.el, VISIBLE)
    }

    pub fn open(&self) {
        set_class(&self.el, VISIBLE, true);
        if let Some(doc) = self.el.owner_document() {
            lock_scroll(&doc, true);
        }
    }

    pub fn close(&self) {
        set_class(&self.el, VISIBLE, false);
        if let Some(doc) = self.el.owner_document() {
            lock_scroll(&doc, false);
        }
    }

    /// Closes when a click lands on the overlay backdrop rather than its content.
    pub fn close_on_backdrop(&self) -> Result<()> {
        let this = self.clone();
        listen(&self.el, "click", move |evt| {
            let on_backdrop = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|t| t == this.el);
            if on_backdrop {
                this.close();
            }
        })
    }
}

/// Escape closes every open overlay. Returns whether anything was closed.
pub fn close_on_escape(key: &str, overlays: &[Overlay]) -> bool {
    if key != "Escape" {
        return false;
    }
    let mut closed = false;
    for overlay in overlays.iter().filter(|o| o.is_open()) {
        overlay.close();
        closed = true;
    }
    closed
}
