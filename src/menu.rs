//! Full-screen navigation menu. Link clicks only close the menu; the resulting
//! `hashchange` is left to the router.

use web_sys::Document;

use crate::dom::{self, Overlay};
use crate::error::Result;

const CLOSE_IDS: [&str; 2] = ["menu-close-btn", "menu-logo-close"];

pub fn install(doc: &Document) -> Result<Option<Overlay>> {
    let Some(el) = doc.get_element_by_id("menu-overlay") else { return Ok(None) };
    let menu = Overlay::new(el);

    if let Some(open_btn) = doc.get_element_by_id("open-menu-btn") {
        let m = menu.clone();
        dom::listen(&open_btn, "click", move |_| m.open())?;
    }

    let closers = CLOSE_IDS
        .iter()
        .filter_map(|id| doc.get_element_by_id(id))
        .chain(dom::query_all(doc, ".menu-nav-link"));
    for el in closers {
        let m = menu.clone();
        dom::listen(&el, "click", move |_| m.close())?;
    }

    menu.close_on_backdrop()?;
    Ok(Some(menu))
}
