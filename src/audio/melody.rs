// Note naming and the look-ahead sequencer that feeds the synth.

pub const MELODY: [&str; 6] = ["C4", "E4", "G4", "B4", "G4", "E4"];
pub const BPM: f64 = 120.0;

pub fn quarter_note_secs(bpm: f64) -> f64 {
    60.0 / bpm
}

pub fn eighth_note_secs(bpm: f64) -> f64 {
    quarter_note_secs(bpm) / 2.0
}

/// Equal-tempered frequency (A4 = 440 Hz) of a scientific-pitch name such as
/// `C4`, `F#3` or `Bb5`.
pub fn note_frequency(name: &str) -> Option<f64> {
    let mut chars = name.chars();
    let semitone = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (accidental, octave) = if let Some(o) = rest.strip_prefix('#') {
        (1, o)
    } else if let Some(o) = rest.strip_prefix('b') {
        (-1, o)
    } else {
        (0, rest)
    };
    let octave: i32 = octave.parse().ok()?;
    let midi = (octave + 1) * 12 + semitone + accidental;
    Some(440.0 * 2f64.powf((midi - 69) as f64 / 12.0))
}

/// Walks a looping note list, handing out every note whose start time falls
/// inside the scheduling window.
#[derive(Clone, Debug)]
pub struct Sequencer {
    notes: &'static [&'static str],
    step_secs: f64,
    next_time: f64,
    index: usize,
    // Notes handed out since the last restart.
    scheduled: usize,
}

impl Sequencer {
    pub fn new(notes: &'static [&'static str], step_secs: f64) -> Self {
        Self { notes, step_secs, next_time: 0.0, index: 0, scheduled: 0 }
    }

    /// Continues the loop from the current note, first note at `at`.
    pub fn restart(&mut self, at: f64) {
        self.next_time = at;
        self.scheduled = 0;
    }

    /// Takes back the notes handed out for times at or after `now`, so the next
    /// restart begins with the first note that never sounded. Returns how many
    /// were taken back.
    pub fn stop(&mut self, now: f64) -> usize {
        if self.notes.is_empty() || self.step_secs <= 0.0 || self.next_time <= now {
            self.scheduled = 0;
            return 0;
        }
        let ahead = ((self.next_time - now) / self.step_secs + 1e-9).floor() as usize;
        let pending = ahead.min(self.scheduled);
        let len = self.notes.len();
        self.index = (self.index + len - pending % len) % len;
        self.next_time -= pending as f64 * self.step_secs;
        self.scheduled = 0;
        pending
    }

    pub fn due(&mut self, now: f64, lookahead: f64) -> Vec<(&'static str, f64)> {
        let mut out = Vec::new();
        if self.notes.is_empty() || self.step_secs <= 0.0 {
            return out;
        }
        // A throttled tab can fall behind; skip the missed notes.
        if self.next_time < now - self.step_secs {
            self.next_time = now;
        }
        while self.next_time < now + lookahead {
            out.push((self.notes[self.index % self.notes.len()], self.next_time));
            self.index = (self.index + 1) % self.notes.len();
            self.next_time += self.step_secs;
            self.scheduled += 1;
        }
        out
    }
}
