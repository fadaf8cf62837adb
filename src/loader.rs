//! Cinematic loading screen.
//!
//! `LoaderState` is the pure tick-driven model (progress easing, status message
//! milestones, one-shot completion). The rest of the module renders it into
//! `#brutalist-loader` from a `requestAnimationFrame` loop, with timers for the
//! typewriter text, the minimum display time and the safety fallback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::config::LoaderConfig;
use crate::dom;
use crate::error::Result;

pub const STATUS_MESSAGES: [&str; 5] = [
    "INITIALIZING...",
    "SECURITY CHECKS...",
    "LOADING ASSETS...",
    "DECRYPTING...",
    "ACCESS GRANTED",
];
pub const FINAL_MESSAGE: &str = "WELCOME // ACCESS GRANTED";

// --- Pure model ---------------------------------------------------------------

/// Exponential ease-out over `t` in [0, 1]; exactly 1 at the end.
pub fn ease_out_expo(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t >= 1.0 { 1.0 } else { 1.0 - 2f64.powf(-10.0 * t) }
}

pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 100.0) }
}

/// Index of the status message that belongs to `progress` (0..=100).
pub fn message_index(progress: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let idx = (clamp_progress(progress) / 100.0 * (count - 1) as f64).floor() as usize;
    idx.min(count - 1)
}

/// Result of one animation step.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub progress: f64,
    pub new_message: Option<&'static str>,
    pub complete: bool,
}

#[derive(Clone, Debug)]
pub struct LoaderState {
    progress: f64,
    msg_index: usize,
    min_load_ms: f64,
    max_load_ms: f64,
    finishing: bool,
}

impl LoaderState {
    pub fn new(cfg: &LoaderConfig) -> Self {
        Self {
            progress: 0.0,
            msg_index: 0,
            min_load_ms: cfg.min_load_ms,
            max_load_ms: cfg.max_load_ms,
            finishing: false,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn max_load_ms(&self) -> f64 {
        self.max_load_ms
    }

    /// Advances to `elapsed_ms` since start.
    pub fn tick(&mut self, elapsed_ms: f64) -> Frame {
        let t = if self.max_load_ms > 0.0 { (elapsed_ms / self.max_load_ms).min(1.0) } else { 1.0 };
        self.progress = clamp_progress(ease_out_expo(t) * 100.0);

        let idx = message_index(self.progress, STATUS_MESSAGES.len());
        let new_message = if idx > self.msg_index {
            self.msg_index = idx;
            Some(STATUS_MESSAGES[idx])
        } else {
            None
        };
        Frame { progress: self.progress, new_message, complete: self.progress >= 100.0 }
    }

    /// Caps the animation length (the page finished loading early).
    pub fn boost(&mut self, cap_ms: f64) {
        self.max_load_ms = self.max_load_ms.min(cap_ms);
    }

    /// Claims the completion sequence; true only for the first caller.
    pub fn begin_finish(&mut self) -> bool {
        !std::mem::replace(&mut self.finishing, true)
    }

    /// Time still owed to the minimum display duration.
    pub fn remaining_min(&self, elapsed_ms: f64) -> f64 {
        (self.min_load_ms - elapsed_ms).max(0.0)
    }

    pub fn force_complete(&mut self) {
        self.progress = 100.0;
    }
}

/// Character-by-character reveal of one string.
#[derive(Clone, Debug)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self { chars: text.chars().collect(), shown: 0 }
    }

    /// Next visible prefix, or `None` once the whole text is shown.
    pub fn step(&mut self) -> Option<String> {
        if self.shown >= self.chars.len() {
            return None;
        }
        self.shown += 1;
        Some(self.chars[..self.shown].iter().collect())
    }
}

// --- Typewriter driver ----------------------------------------------------------

thread_local! {
    // Bumped per typing run so older runs stop at their next step.
    static TYPING_RUN: Cell<u32> = const { Cell::new(0) };
}

pub fn type_text(el: Option<Element>, text: &str, speed_ms: u32) {
    let Some(el) = el else { return };
    let run = TYPING_RUN.with(|c| {
        let next = c.get().wrapping_add(1);
        c.set(next);
        next
    });
    el.set_text_content(Some(""));
    type_step(el, Typewriter::new(text), speed_ms, run);
}

fn type_step(el: Element, mut tw: Typewriter, speed_ms: u32, run: u32) {
    if TYPING_RUN.with(|c| c.get()) != run {
        return;
    }
    if let Some(shown) = tw.step() {
        el.set_text_content(Some(&shown));
        let _ = Timeout::new(speed_ms, move || type_step(el, tw, speed_ms, run)).forget();
    }
}

// --- DOM driver -------------------------------------------------------------------

#[derive(Clone)]
struct LoaderView {
    root: Element,
    bar: Option<Element>,
    percent: Option<Element>,
    status: Option<Element>,
}

impl LoaderView {
    fn find(doc: &Document) -> Option<Self> {
        let root = doc.get_element_by_id("brutalist-loader")?;
        Some(Self {
            root,
            bar: doc.get_element_by_id("progress-bar"),
            percent: doc.get_element_by_id("loader-percent"),
            status: doc.query_selector(".loader-subtext").ok().flatten(),
        })
    }

    fn render(&self, progress: f64) {
        let p = clamp_progress(progress);
        if let Some(bar) = &self.bar {
            dom::set_style(bar, "width", Some(&format!("{}%", p)));
        }
        if let Some(pct) = &self.percent {
            pct.set_text_content(Some(&format!("{}%", p.floor() as u32)));
        }
    }

    fn hide(self, cleanup_ms: u32) {
        dom::set_class(&self.root, "loaded", true);
        let _ = Timeout::new(cleanup_ms, move || {
            dom::set_style(&self.root, "display", Some("none"));
            if let Some(doc) = self.root.owner_document() {
                dom::lock_scroll(&doc, false);
            }
        })
        .forget();
    }
}

struct LoaderRun {
    state: LoaderState,
    started_ms: f64,
    frame_id: Option<i32>,
    view: LoaderView,
    cfg: LoaderConfig,
}

type Shared = Rc<RefCell<LoaderRun>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn start(cfg: LoaderConfig) -> Result<()> {
    let win = dom::window()?;
    let doc = dom::document()?;
    let Some(view) = LoaderView::find(&doc) else {
        log::info!("no loader markup, skipping loading screen");
        return Ok(());
    };

    dom::lock_scroll(&doc, true);
    type_text(view.status.clone(), STATUS_MESSAGES[0], cfg.first_type_ms);

    let safety_ms = (cfg.max_load_ms + cfg.safety_margin_ms).max(0.0) as u32;
    let loaded_max_ms = cfg.loaded_max_ms;
    let run: Shared = Rc::new(RefCell::new(LoaderRun {
        state: LoaderState::new(&cfg),
        started_ms: dom::performance_now(),
        frame_id: None,
        view,
        cfg,
    }));

    if doc.ready_state() == "complete" {
        run.borrow_mut().state.boost(loaded_max_ms);
    } else {
        let boosted = run.clone();
        dom::listen(&win, "load", move |_| boosted.borrow_mut().state.boost(loaded_max_ms))?;
    }

    start_frame_loop(run.clone());

    let safety = run;
    let _ = Timeout::new(safety_ms, move || {
        let stalled = safety.borrow().state.progress() < 100.0;
        if stalled {
            log::warn!("loader frame loop stalled, forcing completion");
            let frame_id = {
                let mut r = safety.borrow_mut();
                r.state.force_complete();
                r.frame_id.take()
            };
            if let (Some(id), Some(w)) = (frame_id, web_sys::window()) {
                w.cancel_animation_frame(id).ok();
            }
            finish(&safety);
        }
    })
    .forget();
    Ok(())
}

fn start_frame_loop(run: Shared) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    let looped = run.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        if step(&looped) {
            request_frame(&looped, &f);
        } else {
            // Release the loop closure once it returns.
            let _ = f.borrow_mut().take();
        }
    }) as Box<dyn FnMut(f64)>));
    request_frame(&run, &g);
}

fn request_frame(run: &Shared, cb: &FrameCallback) {
    let Some(w) = web_sys::window() else { return };
    if let Some(closure) = cb.borrow().as_ref() {
        if let Ok(id) = w.request_animation_frame(closure.as_ref().unchecked_ref()) {
            run.borrow_mut().frame_id = Some(id);
        }
    }
}

/// One frame; returns whether the loop should continue.
fn step(run: &Shared) -> bool {
    let (frame, view, type_ms) = {
        let mut r = run.borrow_mut();
        if r.state.progress() >= 100.0 {
            // Safety fallback already completed the run.
            return false;
        }
        let elapsed = dom::performance_now() - r.started_ms;
        let frame = r.state.tick(elapsed);
        (frame, r.view.clone(), r.cfg.type_ms)
    };
    view.render(frame.progress);
    if let Some(msg) = frame.new_message {
        type_text(view.status.clone(), msg, type_ms);
    }
    if frame.complete {
        finish(run);
        return false;
    }
    true
}

fn finish(run: &Shared) {
    let (delay_ms, view, cfg) = {
        let mut r = run.borrow_mut();
        if !r.state.begin_finish() {
            return;
        }
        let elapsed = dom::performance_now() - r.started_ms;
        (r.state.remaining_min(elapsed), r.view.clone(), r.cfg.clone())
    };
    let _ = Timeout::new(delay_ms as u32, move || {
        view.render(100.0);
        type_text(view.status.clone(), FINAL_MESSAGE, cfg.final_type_ms);
        let cleanup_ms = cfg.cleanup_delay_ms;
        let _ = Timeout::new(cfg.reveal_delay_ms, move || view.hide(cleanup_ms)).forget();
    })
    .forget();
}
