//! Scroll-triggered reveal of tiles plus the skill-card decoration pass.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::config::RevealConfig;
use crate::dom;
use crate::error::Result;

const TILE_SELECTOR: &str = ".grid-tile, .footer-cta-content";
const SKILL_CARD: &str = "skill-category";
const SPACER: &str = "spacer";

/// List items rendered as empty gaps in a skill card.
pub fn is_spacer_text(text: &str) -> bool {
    let t = text.trim();
    t.is_empty() || t.eq_ignore_ascii_case("&nbsp;")
}

/// `transition-delay` values for `count` staggered children.
pub fn stagger_delays(count: usize, step_ms: u32) -> Vec<String> {
    (0..count).map(|i| format!("{}ms", i as u64 * step_ms as u64)).collect()
}

/// Marks spacer `li`s and copies each card title into its decorative backdrop.
pub fn decorate_skill_cards(doc: &Document) {
    for card in dom::query_all(doc, &format!(".{}", SKILL_CARD)) {
        for li in dom::query_all_in(&card, "li") {
            if is_spacer_text(&li.text_content().unwrap_or_default()) {
                dom::set_class(&li, SPACER, true);
            }
        }
        let title = card
            .query_selector("h4")
            .ok()
            .flatten()
            .and_then(|h| h.text_content());
        if let (Some(title), Ok(Some(deco))) = (title, card.query_selector(".decorative-text")) {
            deco.set_text_content(Some(&title));
        }
    }
}

pub fn reveal(tile: &Element, stagger_step_ms: u32) {
    dom::set_class(tile, dom::VISIBLE, true);
    if dom::has_class(tile, SKILL_CARD) {
        let items = dom::query_all_in(tile, &format!("li:not(.{})", SPACER));
        for (item, delay) in items.iter().zip(stagger_delays(items.len(), stagger_step_ms)) {
            dom::set_style(item, "transition-delay", Some(&delay));
        }
    }
}

pub fn install(doc: &Document, cfg: &RevealConfig) -> Result<()> {
    let tiles = dom::query_all(doc, TILE_SELECTOR);
    let step = cfg.stagger_step_ms;

    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _obs: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
                if entry.is_intersecting() {
                    reveal(&entry.target(), step);
                }
            }
        },
    ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let opts = IntersectionObserverInit::new();
    opts.set_threshold(&JsValue::from_f64(cfg.threshold));
    match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &opts) {
        Ok(observer) => {
            callback.forget();
            for tile in &tiles {
                observer.observe(tile);
            }
        }
        Err(err) => {
            log::warn!("IntersectionObserver unavailable ({:?}), revealing all tiles", err);
            for tile in &tiles {
                reveal(tile, step);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacer_detection() {
        assert!(is_spacer_text(""));
        assert!(is_spacer_text("   \n"));
        assert!(is_spacer_text("\u{a0}"));
        assert!(is_spacer_text("&NBSP;"));
        assert!(!is_spacer_text("Rust"));
    }

    #[test]
    fn delays_grow_by_step() {
        assert_eq!(stagger_delays(3, 100), vec!["0ms", "100ms", "200ms"]);
        assert!(stagger_delays(0, 100).is_empty());
    }
}
