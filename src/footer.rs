// Copyright line and the back-to-top button.

use chrono::{Datelike, Utc};
use web_sys::Document;

use crate::dom;
use crate::error::Result;

const OWNER: &str = "Kalyan Chavala";
const BACK_TO_TOP_AFTER_PX: f64 = 300.0;

pub fn copyright_line(year: i32) -> String {
    format!("© {} {}", year, OWNER)
}

pub fn show_back_to_top(scroll_y: f64) -> bool {
    scroll_y > BACK_TO_TOP_AFTER_PX
}

pub fn install(doc: &Document) -> Result<()> {
    if let Some(el) = doc.get_element_by_id("copyright") {
        el.set_text_content(Some(&copyright_line(Utc::now().year())));
    }

    let Some(btn) = doc.get_element_by_id("back-to-top") else { return Ok(()) };
    let win = dom::window()?;
    let w = win.clone();
    dom::listen(&win, "scroll", move |_| {
        let y = w.scroll_y().unwrap_or(0.0);
        dom::set_class(&btn, dom::VISIBLE, show_back_to_top(y));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copyright_text() {
        assert_eq!(copyright_line(2026), "© 2026 Kalyan Chavala");
    }

    #[test]
    fn back_to_top_threshold() {
        assert!(!show_back_to_top(0.0));
        assert!(!show_back_to_top(300.0));
        assert!(show_back_to_top(301.0));
    }
}
