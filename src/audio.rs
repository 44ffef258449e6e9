//! Audio system using Web Audio API
//!
//! Procedurally generated cues and a looping bass line - no external files
//! needed.

use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::Sound;

/// Bass line for the music loop (Hz), one note per step
const MUSIC_NOTES: [f32; 8] = [110.0, 130.81, 164.81, 196.0, 164.81, 130.81, 98.0, 123.47];
/// Seconds per music step
const MUSIC_STEP: f64 = 0.3;
/// How far ahead of the audio clock notes are queued
const MUSIC_LOOKAHEAD: f64 = 0.4;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music_gain: Option<GainNode>,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    next_note_time: f64,
    note_index: usize,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }

        let music_gain = ctx.as_ref().and_then(|ctx| {
            let gain = ctx.create_gain().ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        });

        let mut manager = Self {
            ctx,
            music_gain,
            sfx_volume: 0.0,
            music_volume: 0.0,
            muted: false,
            next_note_time: 0.0,
            note_index: 0,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        self.sync_music_gain();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sync_music_gain();
    }

    fn sync_music_gain(&self) {
        if let Some(gain) = &self.music_gain {
            let vol = if self.muted { 0.0 } else { self.music_volume };
            gain.gain().set_value(vol);
        }
    }

    /// Play a cue
    pub fn play(&self, sound: Sound) {
        let vol = if self.muted { 0.0 } else { self.sfx_volume };
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match sound {
            Sound::Laser => self.play_laser(ctx, vol),
            Sound::ExplosionHigh => self.play_explosion(ctx, vol, 220.0, 0.25),
            Sound::ExplosionMid => self.play_explosion(ctx, vol, 120.0, 0.4),
            Sound::ExplosionLow => self.play_planet_hit(ctx, vol),
        }
    }

    /// Keep the music loop queued ahead of the audio clock; call once per frame
    pub fn update_music(&mut self) {
        if self.muted || self.music_volume <= 0.0 {
            return;
        }
        let (Some(ctx), Some(music_gain)) = (&self.ctx, &self.music_gain) else {
            return;
        };
        if ctx.state() != web_sys::AudioContextState::Running {
            return;
        }

        let now = ctx.current_time();
        if self.next_note_time < now {
            // Fell behind (tab hidden, context suspended): restart on the clock
            self.next_note_time = now + 0.05;
        }

        while self.next_note_time < now + MUSIC_LOOKAHEAD {
            let freq = MUSIC_NOTES[self.note_index % MUSIC_NOTES.len()];
            let t = self.next_note_time;
            if let Some((osc, gain)) = create_osc(ctx, freq, OscillatorType::Triangle, music_gain)
            {
                gain.gain().set_value_at_time(0.0, t).ok();
                gain.gain().linear_ramp_to_value_at_time(0.5, t + 0.02).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + MUSIC_STEP * 0.9)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + MUSIC_STEP).ok();
            }
            self.note_index = (self.note_index + 1) % MUSIC_NOTES.len();
            self.next_note_time += MUSIC_STEP;
        }
    }

    // === Sound generators ===

    /// Laser - fast falling zap
    fn play_laser(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, 1400.0, OscillatorType::Square, &ctx.destination())
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(1400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(200.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Explosion - sawtooth boom starting at `freq`
    fn play_explosion(&self, ctx: &AudioContext, vol: f32, freq: f32, length: f64) {
        let Some((osc, gain)) = create_osc(ctx, freq, OscillatorType::Sawtooth, &ctx.destination())
        else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + length)
            .ok();
        osc.frequency().set_value_at_time(freq, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(freq * 0.3, t + length)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + length + 0.1).ok();

        // High frequency crack
        if let Some((osc2, gain2)) =
            create_osc(ctx, freq * 12.0, OscillatorType::Square, &ctx.destination())
        {
            gain2.gain().set_value_at_time(vol * 0.15, t).ok();
            gain2
                .gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc2.start().ok();
            osc2.stop_with_when(t + 0.1).ok();
        }
    }

    /// Planet hit - long rumble with a descending tail
    fn play_planet_hit(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = create_osc(ctx, 60.0, OscillatorType::Sawtooth, &ctx.destination())
        {
            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.2)
                .ok();
            osc.frequency().set_value_at_time(60.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(20.0, t + 1.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.3).ok();
        }

        for (i, freq) in [300.0, 250.0, 200.0, 150.0].iter().enumerate() {
            let delay = i as f64 * 0.15;
            if let Some((osc, gain)) =
                create_osc(ctx, *freq, OscillatorType::Triangle, &ctx.destination())
            {
                let t = t + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }
}

/// Create an oscillator with its own gain envelope, routed into `dest`
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
    dest: &AudioNode,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(dest).ok()?;

    Some((osc, gain))
}
