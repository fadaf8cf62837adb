//! Portfolio site core crate.
//!
//! Client-side behaviour for the single-page portfolio: loading screen, hash
//! router, reveal-on-scroll tiles, background music, project modal, full-screen
//! menu and local visit/download counters. JS calls `start_site()` (or
//! `start_site_with_config(json)`) once; every component then runs off browser
//! events on the UI thread.
//!
//! Components are wired independently: missing markup or a failing component
//! is logged and skipped without affecting the rest.

use std::cell::{Cell, RefCell};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, KeyboardEvent};

pub mod audio;
pub mod config;
pub mod dom;
pub mod error;
pub mod footer;
pub mod loader;
pub mod menu;
pub mod modal;
pub mod projects;
pub mod reveal;
pub mod router;
pub mod stats;

use config::{SiteConfig, StatsConfig};
use dom::Overlay;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

thread_local! {
    static STARTED: Cell<bool> = const { Cell::new(false) };
    // Storage keys the running site counts under; read back by `site_stats`.
    static STATS_CONFIG: RefCell<Option<StatsConfig>> = const { RefCell::new(None) };
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_site() -> Result<(), JsValue> {
    start_when_ready(SiteConfig::default())
}

#[wasm_bindgen]
pub fn start_site_with_config(json: &str) -> Result<(), JsValue> {
    start_when_ready(SiteConfig::from_json(json)?)
}

/// Current analytics record as JSON.
#[wasm_bindgen]
pub fn site_stats() -> Result<String, JsValue> {
    let win = dom::window()?;
    Ok(stats::browser_stats(&win, active_stats_config())?.to_json()?)
}

/// Stats settings of the started site, or the defaults before start-up.
pub fn active_stats_config() -> StatsConfig {
    STATS_CONFIG.with(|c| c.borrow().clone()).unwrap_or_default()
}

fn remember_stats_config(cfg: &StatsConfig) {
    STATS_CONFIG.with(|c| *c.borrow_mut() = Some(cfg.clone()));
}

fn start_when_ready(cfg: SiteConfig) -> Result<(), JsValue> {
    let doc = dom::document()?;
    if doc.ready_state() == "loading" {
        dom::listen(&doc, "DOMContentLoaded", move |_| {
            if let Err(err) = start(&cfg) {
                log::error!("start-up failed: {}", err);
            }
        })?;
        return Ok(());
    }
    Ok(start(&cfg)?)
}

fn start(cfg: &SiteConfig) -> error::Result<()> {
    if STARTED.with(|s| s.replace(true)) {
        log::warn!("site already started");
        return Ok(());
    }
    remember_stats_config(&cfg.stats);
    let doc = dom::document()?;

    report("loader", loader::start(cfg.loader.clone()));
    report("router", router::install());
    report("audio", audio::install(&doc));
    reveal::decorate_skill_cards(&doc);
    report("reveal", reveal::install(&doc, &cfg.reveal));
    report("footer", footer::install(&doc));

    let modal = unwrap_component("modal", modal::install(&doc));
    let menu = unwrap_component("menu", menu::install(&doc));
    let overlays: Vec<Overlay> = modal
        .map(|m| m.overlay().clone())
        .into_iter()
        .chain(menu)
        .collect();
    report("escape", install_escape(&doc, overlays));

    report("stats", stats::install(&doc, &cfg.stats));
    log::info!("site ready");
    Ok(())
}

/// Escape closes whichever overlays are open.
pub fn install_escape(doc: &Document, overlays: Vec<Overlay>) -> error::Result<()> {
    dom::listen(doc, "keydown", move |evt| {
        if let Some(key_evt) = evt.dyn_ref::<KeyboardEvent>() {
            dom::close_on_escape(&key_evt.key(), &overlays);
        }
    })
}

fn report(component: &str, result: error::Result<()>) {
    if let Err(err) = result {
        log::warn!("{} disabled: {}", component, err);
    }
}

fn unwrap_component<T>(component: &str, result: error::Result<Option<T>>) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(err) => {
            log::warn!("{} disabled: {}", component, err);
            None
        }
    }
}
