//! Audio system using Web Audio API
//!
//! Procedurally generated sound - no external files needed. The jetpack
//! engine is a continuous oscillator whose pitch and volume follow the
//! thrust signal; everything else is a short one-shot voice. All calls
//! degrade to no-ops when the AudioContext is unavailable or blocked, so
//! gameplay never depends on audio.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// One-shot sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin collected
    Coin,
    /// Power-up collected
    PowerUp,
    /// Crash, fatal or shield-absorbed (same voice for both)
    Crash,
}

/// Engine tone frequencies, idle vs. full thrust
const ENGINE_IDLE_HZ: f32 = 55.0;
const ENGINE_THRUST_HZ: f32 = 110.0;
const ENGINE_IDLE_GAIN: f32 = 0.06;
const ENGINE_THRUST_GAIN: f32 = 0.18;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    /// Continuous engine tone, alive between EngineStart and EngineStop
    engine: Option<(OscillatorNode, GainNode)>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context or before a user gesture
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            engine: None,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Map a gameplay event to sound
    pub fn handle(&mut self, event: GameEvent) {
        match event {
            GameEvent::EngineStart => self.engine_start(),
            GameEvent::EngineStop => self.engine_stop(),
            GameEvent::CoinCollected => self.play(SoundEffect::Coin),
            GameEvent::PowerUpCollected(_) => self.play(SoundEffect::PowerUp),
            GameEvent::Crashed => self.play(SoundEffect::Crash),
        }
    }

    /// Start the continuous engine tone. Restarting while alive is a no-op.
    pub fn engine_start(&mut self) {
        if self.engine.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Some((osc, gain)) = create_osc(ctx, ENGINE_IDLE_HZ, OscillatorType::Sawtooth) else {
            return;
        };
        gain.gain().set_value(0.0);
        let t = ctx.current_time();
        let _ = gain
            .gain()
            .set_target_at_time(ENGINE_IDLE_GAIN * self.effective_volume(), t, 0.1);
        if osc.start().is_ok() {
            self.engine = Some((osc, gain));
        }
    }

    /// Stop and release the engine oscillator. Idempotent.
    pub fn engine_stop(&mut self) {
        if let Some((osc, gain)) = self.engine.take() {
            if let Some(ctx) = &self.ctx {
                let t = ctx.current_time();
                let _ = gain.gain().set_target_at_time(0.0, t, 0.05);
                let _ = osc.stop_with_when(t + 0.3);
            } else {
                let _ = osc.stop();
            }
            osc.disconnect().ok();
        }
    }

    /// Continuous thrust signal: slides the engine tone between idle and
    /// full-throttle. Called once per frame.
    pub fn set_thrust(&self, thrusting: bool) {
        let Some(ctx) = &self.ctx else { return };
        let Some((osc, gain)) = &self.engine else { return };

        let (freq, level) = if thrusting {
            (ENGINE_THRUST_HZ, ENGINE_THRUST_GAIN)
        } else {
            (ENGINE_IDLE_HZ, ENGINE_IDLE_GAIN)
        };
        let t = ctx.current_time();
        let _ = osc.frequency().set_target_at_time(freq, t, 0.08);
        let _ = gain
            .gain()
            .set_target_at_time(level * self.effective_volume(), t, 0.08);
    }

    /// Play a one-shot sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Coin => play_coin(ctx, vol),
            SoundEffect::PowerUp => play_powerup(ctx, vol),
            SoundEffect::Crash => play_crash(ctx, vol),
        }
    }
}

// === Sound generators ===

/// Create an oscillator with gain envelope
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Coin - bright two-note ding
fn play_coin(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [900.0, 1350.0].iter().enumerate() {
        let delay = i as f64 * 0.06;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }
}

/// Power-up - rising arpeggio
fn play_powerup(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [500.0, 650.0, 800.0, 1000.0].iter().enumerate() {
        let delay = i as f64 * 0.07;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.25).ok();
        }
    }
}

/// Crash - falling growl with a bass thump
fn play_crash(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    if let Some((osc, gain)) = create_osc(ctx, 220.0, OscillatorType::Sawtooth) {
        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.5)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.6).ok();
    }

    if let Some((osc, gain)) = create_osc(ctx, 60.0, OscillatorType::Sine) {
        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }
}
