//! Hash router: the location fragment picks which `.page` section is shown.
//!
//! `#page-<id>` names a page; any other non-empty fragment (except `#` and
//! `#top`) is an anchor inside the home page. Unknown pages fall back to home.

use web_sys::{Document, ScrollBehavior, ScrollIntoViewOptions};

use crate::dom;
use crate::error::Result;

pub const HOME_PAGE: &str = "page-home";
const PAGE_PREFIX: &str = "page-";
const PAGE_CLASS: &str = "page";
const ACTIVE: &str = "active";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scroll {
    Top,
    Anchor(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub page: String,
    pub scroll: Scroll,
}

impl Route {
    fn home(scroll: Scroll) -> Self {
        Self { page: HOME_PAGE.to_string(), scroll }
    }
}

/// Maps a raw `location.hash` value (leading `#` optional) to a route.
pub fn parse_fragment(hash: &str) -> Route {
    let frag = hash.strip_prefix('#').unwrap_or(hash);
    if frag.starts_with(PAGE_PREFIX) {
        return Route { page: frag.to_string(), scroll: Scroll::Top };
    }
    match frag {
        "" | "top" => Route::home(Scroll::Top),
        anchor => Route::home(Scroll::Anchor(anchor.to_string())),
    }
}

/// Activates `route.page` (or home when no `.page` element has that id) and
/// hides every other page. Returns the id of the page actually shown.
pub fn show(doc: &Document, route: &Route) -> String {
    for page in dom::query_all(doc, &format!(".{}", PAGE_CLASS)) {
        dom::set_class(&page, ACTIVE, false);
        dom::set_style(&page, "display", Some("none"));
    }

    let requested = doc
        .get_element_by_id(&route.page)
        .filter(|el| dom::has_class(el, PAGE_CLASS));
    let (target, fell_back) = match requested {
        Some(el) => (Some(el), false),
        None => (doc.get_element_by_id(HOME_PAGE), true),
    };
    let Some(target) = target else {
        return HOME_PAGE.to_string();
    };
    dom::set_style(&target, "display", Some("block"));
    dom::set_class(&target, ACTIVE, true);

    match (&route.scroll, fell_back) {
        (Scroll::Anchor(anchor), false) => {
            if let Some(el) = doc.get_element_by_id(anchor) {
                let opts = ScrollIntoViewOptions::new();
                opts.set_behavior(ScrollBehavior::Smooth);
                el.scroll_into_view_with_scroll_into_view_options(&opts);
            }
        }
        _ => {
            if let Some(win) = doc.default_view() {
                win.scroll_to_with_x_and_y(0.0, 0.0);
            }
        }
    }
    target.id()
}

/// Re-reads the current fragment and applies it.
pub fn navigate() -> Result<String> {
    let win = dom::window()?;
    let doc = dom::document()?;
    let hash = win.location().hash().unwrap_or_default();
    Ok(show(&doc, &parse_fragment(&hash)))
}

pub fn install() -> Result<()> {
    let win = dom::window()?;
    dom::listen(&win, "hashchange", |_| {
        if let Err(err) = navigate() {
            log::warn!("navigation failed: {}", err);
        }
    })?;
    navigate()?;
    Ok(())
}
