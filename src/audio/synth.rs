//! Two-operator FM voice feeding a feedback delay and a convolution reverb,
//! built on the Web Audio API.

use wasm_bindgen::JsValue;
use web_sys::{
    AudioBuffer, AudioContext, AudioParam, AudioScheduledSourceNode, GainNode, OscillatorType,
};

/// ADSR envelope, times in seconds, sustain as a level in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Envelope {
    /// Breakpoints `(time, level)` for a note held `duration` seconds from
    /// `start`, peaking at `peak`. Levels are joined by linear ramps.
    pub fn breakpoints(&self, start: f64, duration: f64, peak: f64) -> Vec<(f64, f64)> {
        let attack_end = start + self.attack;
        let decay_end = attack_end + self.decay;
        let release_start = (start + duration).max(decay_end);
        vec![
            (start, 0.0),
            (attack_end, peak),
            (decay_end, peak * self.sustain),
            (release_start, peak * self.sustain),
            (release_start + self.release, 0.0),
        ]
    }

    pub fn end(&self, start: f64, duration: f64) -> f64 {
        (start + duration).max(start + self.attack + self.decay) + self.release
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FmPatch {
    pub harmonicity: f64,
    pub modulation_index: f64,
    pub envelope: Envelope,
    pub modulation_envelope: Envelope,
    pub volume_db: f64,
    pub delay_secs: f64,
    pub feedback: f64,
    pub reverb_secs: f64,
}

impl Default for FmPatch {
    fn default() -> Self {
        Self {
            harmonicity: 1.5,
            modulation_index: 1.2,
            envelope: Envelope { attack: 0.01, decay: 0.2, sustain: 0.1, release: 0.5 },
            modulation_envelope: Envelope { attack: 0.01, decay: 0.5, sustain: 0.0, release: 0.5 },
            volume_db: -12.0,
            delay_secs: super::melody::eighth_note_secs(super::melody::BPM),
            feedback: 0.4,
            reverb_secs: 1.5,
        }
    }
}

pub fn db_to_gain(db: f64) -> f64 {
    10f64.powf(db / 20.0)
}

/// Peak deviation (Hz) of the carrier frequency for a note at `freq`.
pub fn modulation_depth(patch: &FmPatch, freq: f64) -> f64 {
    freq * patch.harmonicity * patch.modulation_index
}

pub struct Synth {
    ctx: AudioContext,
    input: GainNode,
    // Output bus of the current play run; notes only sound while it exists.
    run: Option<GainNode>,
    patch: FmPatch,
}

impl Synth {
    pub fn new(patch: FmPatch) -> Result<Self, JsValue> {
        let ctx = AudioContext::new()?;

        let reverb = ctx.create_convolver()?;
        reverb.set_buffer(Some(&impulse_response(&ctx, patch.reverb_secs)?));
        reverb.connect_with_audio_node(&ctx.destination())?;

        let delay = ctx.create_delay_with_max_delay_time(patch.delay_secs.max(1.0))?;
        delay.delay_time().set_value(patch.delay_secs as f32);
        let feedback = ctx.create_gain()?;
        feedback.gain().set_value(patch.feedback as f32);
        delay.connect_with_audio_node(&feedback)?;
        feedback.connect_with_audio_node(&delay)?;
        delay.connect_with_audio_node(&reverb)?;

        let input = ctx.create_gain()?;
        input.gain().set_value(db_to_gain(patch.volume_db) as f32);
        input.connect_with_audio_node(&delay)?;

        Ok(Self { ctx, input, run: None, patch })
    }

    pub fn current_time(&self) -> f64 {
        self.ctx.current_time()
    }

    pub fn resume(&self) -> Result<(), JsValue> {
        self.ctx.resume().map(|_| ())
    }

    pub fn suspend(&self) -> Result<(), JsValue> {
        self.ctx.suspend().map(|_| ())
    }

    /// Opens a fresh output bus for newly scheduled notes.
    pub fn start_run(&mut self) -> Result<(), JsValue> {
        self.stop_run()?;
        let bus = self.ctx.create_gain()?;
        bus.connect_with_audio_node(&self.input)?;
        self.run = Some(bus);
        Ok(())
    }

    /// Cuts every note scheduled during the current run, including ones that
    /// have not started yet.
    pub fn stop_run(&mut self) -> Result<(), JsValue> {
        match self.run.take() {
            Some(bus) => bus.disconnect(),
            None => Ok(()),
        }
    }

    /// Schedules one note of `duration` seconds starting at context time `at`.
    pub fn play(&self, freq: f64, at: f64, duration: f64) -> Result<(), JsValue> {
        let Some(bus) = &self.run else { return Ok(()) };
        let p = &self.patch;

        let carrier = self.ctx.create_oscillator()?;
        carrier.set_type(OscillatorType::Sine);
        carrier.frequency().set_value(freq as f32);

        let modulator = self.ctx.create_oscillator()?;
        modulator.set_type(OscillatorType::Square);
        modulator.frequency().set_value((freq * p.harmonicity) as f32);

        let mod_gain = self.ctx.create_gain()?;
        let depth = modulation_depth(p, freq);
        apply(&mod_gain.gain(), &p.modulation_envelope.breakpoints(at, duration, depth))?;
        modulator.connect_with_audio_node(&mod_gain)?;
        mod_gain.connect_with_audio_param(&carrier.frequency())?;

        let amp = self.ctx.create_gain()?;
        apply(&amp.gain(), &p.envelope.breakpoints(at, duration, 1.0))?;
        carrier.connect_with_audio_node(&amp)?;
        amp.connect_with_audio_node(bus)?;

        let end = p.envelope.end(at, duration).max(p.modulation_envelope.end(at, duration));
        for osc in [&carrier, &modulator] {
            let src: &AudioScheduledSourceNode = osc;
            src.start_with_when(at)?;
            src.stop_with_when(end)?;
        }
        Ok(())
    }
}

fn apply(param: &AudioParam, points: &[(f64, f64)]) -> Result<(), JsValue> {
    let Some(((t0, v0), rest)) = points.split_first() else { return Ok(()) };
    param.set_value_at_time(*v0 as f32, *t0)?;
    for (t, v) in rest {
        param.linear_ramp_to_value_at_time(*v as f32, *t)?;
    }
    Ok(())
}

/// Stereo noise burst with a quadratic decay, used as the reverb tail.
fn impulse_response(ctx: &AudioContext, secs: f64) -> Result<AudioBuffer, JsValue> {
    let rate = ctx.sample_rate();
    let len = ((rate as f64 * secs) as u32).max(1);
    let buffer = ctx.create_buffer(2, len, rate)?;
    for channel in 0..2 {
        let mut data: Vec<f32> = (0..len)
            .map(|i| {
                let decay = 1.0 - i as f64 / len as f64;
                ((js_sys::Math::random() * 2.0 - 1.0) * decay * decay) as f32
            })
            .collect();
        buffer.copy_to_channel(&mut data, channel)?;
    }
    Ok(buffer)
}
