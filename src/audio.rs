//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::SoundCue;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.3,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound cue
    pub fn play(&self, cue: SoundCue) {
        let vol = self.master_volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Jump => self.tone(ctx, 400.0, 600.0, 0.1, OscillatorType::Sine, vol * 0.15, 0.0),
            SoundCue::Land => self.noise(ctx, 0.05, vol * 0.1),
            SoundCue::Hit => self.tone(ctx, 200.0, 100.0, 0.2, OscillatorType::Sawtooth, vol * 0.2, 0.0),
            SoundCue::Interact => {
                self.tone(ctx, 500.0, 800.0, 0.1, OscillatorType::Sine, vol * 0.1, 0.0);
                self.tone(ctx, 700.0, 1000.0, 0.1, OscillatorType::Sine, vol * 0.08, 0.08);
            }
            SoundCue::Portal => {
                self.tone(ctx, 300.0, 900.0, 0.4, OscillatorType::Sine, vol * 0.15, 0.0);
                self.tone(ctx, 400.0, 1200.0, 0.4, OscillatorType::Sine, vol * 0.1, 0.0);
            }
            SoundCue::Step => self.noise(ctx, 0.02, vol * 0.05),
            SoundCue::Menu => self.tone(ctx, 600.0, 800.0, 0.05, OscillatorType::Sine, vol * 0.1, 0.0),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
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

    /// Frequency sweep with an exponential fade, starting `delay` seconds from now
    #[allow(clippy::too_many_arguments)]
    fn tone(
        &self,
        ctx: &AudioContext,
        start_freq: f32,
        end_freq: f32,
        duration: f64,
        osc_type: OscillatorType,
        vol: f32,
        delay: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, start_freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        osc.frequency().set_value_at_time(start_freq, t).ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(end_freq, t + duration)
            .ok();
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + duration).ok();
    }

    /// Short burst of white noise (footsteps, landings)
    fn noise(&self, ctx: &AudioContext, duration: f64, vol: f32) {
        let rate = ctx.sample_rate();
        let len = (rate as f64 * duration) as u32;
        if len == 0 {
            return;
        }
        let Ok(buffer) = ctx.create_buffer(1, len, rate) else {
            return;
        };
        let mut samples: Vec<f32> = (0..len)
            .map(|_| (js_sys::Math::random() as f32 * 2.0 - 1.0) * 0.5)
            .collect();
        if buffer.copy_to_channel(&mut samples, 0).is_err() {
            return;
        }

        let Ok(source) = ctx.create_buffer_source() else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };
        source.set_buffer(Some(&buffer));
        if source.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&ctx.destination()).is_err()
        {
            return;
        }

        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + duration)
            .ok();
        source.start().ok();
    }
}
