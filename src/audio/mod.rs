//! Background music toggle bound to `#music-toggle-btn`.
//!
//! The synth graph is built on the first click (browsers only allow audio to
//! start from a user gesture). If Web Audio is missing or the graph cannot be
//! built, the button is hidden and nothing else audio-related runs.

mod melody;
mod synth;

use std::cell::RefCell;

use gloo_timers::callback::Interval;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use crate::dom;
use crate::error::Result;

pub use melody::{MELODY, Sequencer, note_frequency};
pub use synth::{Envelope, FmPatch};

const BUTTON_ID: &str = "music-toggle-btn";
const PLAYING_CLASS: &str = "is-playing";
const SCHEDULE_EVERY_MS: u32 = 100;
const LOOKAHEAD_SECS: f64 = 0.2;
const START_OFFSET_SECS: f64 = 0.05;

pub fn aria_label(playing: bool) -> &'static str {
    if playing { "Pause background music" } else { "Play background music" }
}

struct MusicPlayer {
    synth: synth::Synth,
    sequencer: Sequencer,
    note_secs: f64,
    scheduler: Option<Interval>,
}

impl MusicPlayer {
    fn new() -> std::result::Result<Self, JsValue> {
        Ok(Self {
            synth: synth::Synth::new(FmPatch::default())?,
            sequencer: Sequencer::new(&MELODY, melody::quarter_note_secs(melody::BPM)),
            note_secs: melody::eighth_note_secs(melody::BPM),
            scheduler: None,
        })
    }

    fn is_playing(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Flips play state; returns whether music is now playing.
    fn toggle(&mut self) -> std::result::Result<bool, JsValue> {
        if self.is_playing() {
            // Dropping the interval cancels it.
            self.scheduler = None;
            self.sequencer.stop(self.synth.current_time());
            self.synth.stop_run()?;
            self.synth.suspend()?;
            return Ok(false);
        }
        self.synth.resume()?;
        self.synth.start_run()?;
        self.sequencer.restart(self.synth.current_time() + START_OFFSET_SECS);
        self.pump();
        self.scheduler = Some(Interval::new(SCHEDULE_EVERY_MS, || {
            PLAYER.with(|cell| {
                if let Ok(mut slot) = cell.try_borrow_mut() {
                    if let Some(player) = slot.as_mut() {
                        player.pump();
                    }
                }
            });
        }));
        Ok(true)
    }

    fn pump(&mut self) {
        let now = self.synth.current_time();
        for (name, at) in self.sequencer.due(now, LOOKAHEAD_SECS) {
            let Some(freq) = note_frequency(name) else { continue };
            if let Err(err) = self.synth.play(freq, at, self.note_secs) {
                log::warn!("failed to schedule {}: {:?}", name, err);
            }
        }
    }
}

thread_local! {
    static PLAYER: RefCell<Option<MusicPlayer>> = const { RefCell::new(None) };
}

fn web_audio_available(doc: &Document) -> bool {
    doc.default_view()
        .and_then(|w| js_sys::Reflect::has(&w, &JsValue::from_str("AudioContext")).ok())
        .unwrap_or(false)
}

fn disable(btn: &Element) {
    dom::set_style(btn, "display", Some("none"));
}

fn render(btn: &Element, playing: bool) {
    dom::set_class(btn, PLAYING_CLASS, playing);
    btn.set_attribute("aria-label", aria_label(playing)).ok();
}

fn on_click(btn: &Element) {
    let result = PLAYER.with(|cell| -> std::result::Result<bool, JsValue> {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(MusicPlayer::new()?);
        }
        let playing = match slot.as_mut() {
            Some(player) => player.toggle()?,
            None => false,
        };
        Ok(playing)
    });
    match result {
        Ok(playing) => render(btn, playing),
        Err(err) => {
            log::error!("audio engine unavailable: {:?}", err);
            PLAYER.with(|cell| cell.borrow_mut().take());
            disable(btn);
        }
    }
}

pub fn install(doc: &Document) -> Result<()> {
    let Some(btn) = doc.get_element_by_id(BUTTON_ID) else { return Ok(()) };
    if !web_audio_available(doc) {
        log::warn!("Web Audio unavailable, hiding music toggle");
        disable(&btn);
        return Ok(());
    }
    render(&btn, false);
    let target = btn.clone();
    dom::listen(&btn, "click", move |_| on_click(&target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_describe_the_next_action() {
        assert_eq!(aria_label(true), "Pause background music");
        assert_eq!(aria_label(false), "Play background music");
    }
}
