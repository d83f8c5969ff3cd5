//! Game state and session-level types
//!
//! `GameState` owns every service the simulation needs. Nothing here is
//! global: the RNG, particle pool and event queue are lent to subsystems
//! through `Effects` during a tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::effects::{GameEvent, rand_range};
use super::interaction::InteractionSystem;
use super::particles::ParticleSystem;
use super::player::Player;
use super::world::World;
use crate::Tuning;
use crate::consts::*;

/// Top-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Fake progress bar before the start screen
    Loading,
    /// Waiting for the start button
    Start,
    Playing,
    Paused,
}

/// Viewport origin in world space
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pos: Vec2,
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            viewport: Vec2::new(DEFAULT_VIEWPORT_W, DEFAULT_VIEWPORT_H),
        }
    }
}

impl Camera {
    /// World point under a viewport pixel
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.pos
    }

    /// Center the view on `target`
    pub fn snap_to(&mut self, target: Vec2) {
        self.pos = target - self.viewport / 2.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Overlay fading in over the old zone
    FadeIn,
    /// New zone loaded behind a solid overlay
    Hold,
    FadeOut,
}

/// Timed zone change; gameplay is frozen while one is active
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub target_zone: usize,
    pub spawn: Vec2,
    pub phase: TransitionPhase,
    pub timer: f32,
}

impl Transition {
    pub fn new(target_zone: usize, spawn: Vec2) -> Self {
        Self {
            target_zone,
            spawn,
            phase: TransitionPhase::FadeIn,
            timer: 0.0,
        }
    }

    pub fn phase_duration(&self) -> f32 {
        match self.phase {
            TransitionPhase::FadeIn => TRANSITION_FADE_IN,
            TransitionPhase::Hold => TRANSITION_HOLD,
            TransitionPhase::FadeOut => TRANSITION_FADE_OUT,
        }
    }

    /// Overlay opacity 0-1
    pub fn overlay_alpha(&self) -> f32 {
        let t = (self.timer / self.phase_duration()).clamp(0.0, 1.0);
        match self.phase {
            TransitionPhase::FadeIn => t,
            TransitionPhase::Hold => 1.0,
            TransitionPhase::FadeOut => 1.0 - t,
        }
    }
}

const LOADING_HINTS: [&str; 6] = [
    "Generating world...",
    "Spawning stickman...",
    "Placing obstacles...",
    "Loading portfolio...",
    "Compiling code...",
    "Almost ready...",
];

/// Progress bar shown before the start screen
#[derive(Debug, Clone, Default)]
pub struct LoadingScreen {
    /// 0-100
    pub progress: f32,
    step_timer: f32,
    /// Time spent at 100%
    finish_timer: f32,
}

impl LoadingScreen {
    pub fn hint(&self) -> &'static str {
        let idx = ((self.progress / 100.0) * (LOADING_HINTS.len() - 1) as f32).floor() as usize;
        LOADING_HINTS[idx.min(LOADING_HINTS.len() - 1)]
    }

    /// Advance; returns true once the bar is full and the delay has passed
    pub fn update(&mut self, dt: f32, rng: &mut Pcg32) -> bool {
        if self.progress >= 100.0 {
            self.finish_timer += dt;
            return self.finish_timer >= LOADING_FINISH_DELAY;
        }
        self.step_timer += dt;
        while self.step_timer >= LOADING_STEP_INTERVAL && self.progress < 100.0 {
            self.step_timer -= LOADING_STEP_INTERVAL;
            self.progress = (self.progress + rand_range(rng, 5.0, 15.0)).min(100.0);
        }
        false
    }
}

/// Complete session state
pub struct GameState {
    pub phase: GamePhase,
    pub world: World,
    pub player: Player,
    pub interactions: InteractionSystem,
    pub particles: ParticleSystem,
    pub camera: Camera,
    pub transition: Option<Transition>,
    pub loading: LoadingScreen,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub seed: u64,
    /// Outgoing notifications, drained by the front end
    pub events: Vec<GameEvent>,
    /// Simulated seconds since construction
    pub time: f32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = World::new(&mut rng);
        let spawn = world.zone().spawn;
        let player = Player::new(spawn.x, spawn.y).with_tuning(&tuning);
        Self {
            phase: GamePhase::Loading,
            world,
            player,
            interactions: InteractionSystem::new(),
            particles: ParticleSystem::default(),
            camera: Camera::default(),
            transition: None,
            loading: LoadingScreen::default(),
            tuning,
            rng,
            seed,
            events: Vec::new(),
            time: 0.0,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.camera.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_reaches_start_after_delay() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut loading = LoadingScreen::default();
        assert_eq!(loading.hint(), "Generating world...");

        let mut elapsed = 0.0;
        while !loading.update(SIM_DT, &mut rng) {
            elapsed += SIM_DT;
            assert!(elapsed < 10.0);
        }
        assert_eq!(loading.progress, 100.0);
        assert_eq!(loading.hint(), "Almost ready...");
        // At least 7 steps of 0.2 s plus the finish delay
        assert!(elapsed >= 7.0 * LOADING_STEP_INTERVAL + LOADING_FINISH_DELAY - 0.1);
    }

    #[test]
    fn test_transition_overlay_alpha() {
        let mut t = Transition::new(1, Vec2::ZERO);
        assert_eq!(t.overlay_alpha(), 0.0);
        t.timer = TRANSITION_FADE_IN / 2.0;
        assert!((t.overlay_alpha() - 0.5).abs() < 1e-6);
        t.phase = TransitionPhase::Hold;
        assert_eq!(t.overlay_alpha(), 1.0);
        t.phase = TransitionPhase::FadeOut;
        t.timer = TRANSITION_FADE_OUT;
        assert_eq!(t.overlay_alpha(), 0.0);
    }

    #[test]
    fn test_camera_conversions() {
        let mut cam = Camera::default();
        cam.snap_to(Vec2::new(1000.0, 400.0));
        assert_eq!(cam.pos, Vec2::new(360.0, 40.0));
        assert_eq!(cam.to_world(Vec2::new(10.0, 20.0)), Vec2::new(370.0, 60.0));
    }

    #[test]
    fn test_new_state_starts_loading() {
        let state = GameState::new(3);
        assert_eq!(state.phase, GamePhase::Loading);
        assert_eq!(state.world.current_index(), 0);
        assert!(state.particles.is_empty());
    }
}
