//! Per-tick side-effect context
//!
//! Gameplay code never reaches for globals: the particle pool, the seeded RNG
//! and the outgoing event queue are owned by `GameState` and lent to each
//! subsystem for the duration of a tick.

use rand::Rng;
use rand_pcg::Pcg32;

use super::particles::ParticleSystem;
use super::world::PanelKind;
use crate::Color;

/// Sound cues the front end maps to synthesized effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Jump,
    Land,
    Hit,
    Interact,
    Portal,
    Step,
    Menu,
}

/// Notifications emitted by the simulation for audio and DOM updates
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    /// Loading finished, start screen should show
    Ready,
    /// HUD should switch to this zone
    ZoneEntered(usize),
    /// Zone transition overlay started for this zone
    TransitionStarted(usize),
    TransitionFinished,
    PanelOpened(PanelKind),
    PanelClosed,
    DialogueStarted {
        speaker: &'static str,
        portrait: &'static str,
    },
    DialogueEnded,
    Damaged,
    Respawned,
    Paused,
    Resumed,
}

/// Borrowed services for one tick
pub struct Effects<'a> {
    pub particles: &'a mut ParticleSystem,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
}

impl Effects<'_> {
    /// Uniform float in `[min, max)`; degenerate ranges return `min`
    pub fn rand_range(&mut self, min: f32, max: f32) -> f32 {
        rand_range(self.rng, min, max)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.random::<f32>() < p
    }

    /// Spawn a particle into the shared pool
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(&mut self, x: f32, y: f32, vx: f32, vy: f32, life: f32, color: Color, size: f32) {
        self.particles.spawn(x, y, vx, vy, life, color, size);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }
}

/// Uniform float in `[min, max)`; degenerate ranges return `min`
pub fn rand_range(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Uniform integer in `[min, max]`
pub fn rand_int(rng: &mut Pcg32, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}
