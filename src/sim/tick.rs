//! Fixed timestep simulation tick
//!
//! Drives the phase machine, the per-frame update order and zone transitions.

use glam::Vec2;

use super::effects::{Effects, GameEvent, SoundCue};
use super::interaction::InteractionSystem;
use super::player::Player;
use super::state::{GamePhase, GameState, Transition, TransitionPhase};
use super::world::World;
use crate::clamp;
use crate::consts::*;

/// Buttons held down this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub down: bool,
    /// Shift: run instead of walk
    pub run: bool,
}

/// One-shot requests from keys and DOM buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// E key
    Interact,
    /// Escape
    TogglePause,
    Start,
    Resume,
    Restart,
    /// Panel close button or backdrop
    ClosePanel,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub held: Buttons,
    pub commands: Vec<Command>,
}

/// Advance the game by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    for &command in &input.commands {
        state.handle_command(command);
    }

    match state.phase {
        GamePhase::Loading => {
            if state.loading.update(dt, &mut state.rng) {
                state.phase = GamePhase::Start;
                state.events.push(GameEvent::Ready);
                log::info!("Loading finished");
            }
        }
        GamePhase::Start => {}
        GamePhase::Playing => {
            state.advance_transition(dt);
            state.update(&input.held, dt);
        }
        GamePhase::Paused => state.advance_transition(dt),
    }
}

impl GameState {
    pub fn handle_command(&mut self, command: Command) {
        match (command, self.phase) {
            (Command::Start, GamePhase::Start) => self.start(),
            (Command::TogglePause, GamePhase::Playing) => self.pause(),
            (Command::TogglePause | Command::Resume, GamePhase::Paused) => self.resume(),
            (Command::Restart, GamePhase::Playing | GamePhase::Paused) => self.restart(),
            (Command::Interact, GamePhase::Playing) if !self.is_transitioning() => self.interact(),
            (Command::ClosePanel, GamePhase::Playing | GamePhase::Paused) => {
                let mut fx = Effects {
                    particles: &mut self.particles,
                    rng: &mut self.rng,
                    events: &mut self.events,
                };
                self.interactions.close_panel(&mut self.player, &mut fx);
            }
            _ => log::debug!("Ignoring {:?} while {:?}", command, self.phase),
        }
    }

    /// Leave the start screen with a fresh player in the current zone
    pub fn start(&mut self) {
        let spawn = self.world.zone().spawn;
        self.player = Player::new(spawn.x, spawn.y).with_tuning(&self.tuning);
        self.interactions = InteractionSystem::new();
        self.camera.snap_to(self.player.center());
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Sound(SoundCue::Menu));
        self.events.push(GameEvent::ZoneEntered(self.world.current_index()));
        log::info!("Game started (seed {})", self.seed);
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            self.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            self.events.push(GameEvent::Resumed);
        }
    }

    /// Rebuild the world from zone 0, keeping the player entity
    pub fn restart(&mut self) {
        // Overlays owned by the old session must be told to close
        if self.transition.take().is_some() {
            self.events.push(GameEvent::TransitionFinished);
        }
        if self.interactions.is_dialogue_active() {
            self.events.push(GameEvent::DialogueEnded);
        }
        if self.interactions.open_panel().is_some() {
            self.events.push(GameEvent::PanelClosed);
        }

        self.world = World::new(&mut self.rng);
        let spawn = self.world.zone().spawn;
        self.player.reset_transform(spawn);
        self.player.interacting = false;
        self.interactions = InteractionSystem::new();
        self.particles.clear();
        self.camera.snap_to(self.player.center());
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::ZoneEntered(0));
        log::info!("Restarted");
    }

    fn interact(&mut self) {
        let mut fx = Effects {
            particles: &mut self.particles,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        let portal = self
            .interactions
            .interact(&mut self.player, &self.world, &mut fx);
        if let Some(portal) = portal {
            self.transition_to_zone(portal.target_zone, portal.spawn);
        }
    }

    /// Begin a timed zone change. Ignored while one is already running.
    pub fn transition_to_zone(&mut self, zone: usize, spawn: Vec2) -> bool {
        if self.is_transitioning() {
            log::warn!("Transition to zone {} ignored, already transitioning", zone);
            return false;
        }
        if zone >= self.world.zone_count() {
            log::warn!("Transition to unknown zone {} ignored", zone);
            return false;
        }
        self.transition = Some(Transition::new(zone, spawn));
        self.events.push(GameEvent::Sound(SoundCue::Portal));
        self.events.push(GameEvent::TransitionStarted(zone));
        log::info!("Transition to zone {} started", zone);
        true
    }

    /// Step the transition timers; runs while playing or paused
    pub fn advance_transition(&mut self, dt: f32) {
        let Some(mut t) = self.transition else {
            return;
        };
        t.timer += dt;
        if t.timer < t.phase_duration() {
            self.transition = Some(t);
            return;
        }

        t.timer = 0.0;
        match t.phase {
            TransitionPhase::FadeIn => {
                self.world.load_zone(t.target_zone);
                self.player.reset_transform(t.spawn);
                self.camera.snap_to(t.spawn);
                self.particles.clear();
                self.interactions.set_respawn(t.spawn);
                self.events.push(GameEvent::ZoneEntered(t.target_zone));
                t.phase = TransitionPhase::Hold;
                self.transition = Some(t);
            }
            TransitionPhase::Hold => {
                t.phase = TransitionPhase::FadeOut;
                self.transition = Some(t);
            }
            TransitionPhase::FadeOut => {
                self.transition = None;
                self.events.push(GameEvent::TransitionFinished);
                log::info!("Transition to zone {} finished", t.target_zone);
            }
        }
    }

    /// One gameplay step. Frozen while a transition runs.
    pub fn update(&mut self, held: &Buttons, dt: f32) {
        if self.is_transitioning() {
            return;
        }
        let dt = dt.min(MAX_FRAME_DT);
        self.time += dt;

        self.world.update(dt, &self.player, &mut self.rng);
        let solids = self.world.solid_platforms();

        let mut fx = Effects {
            particles: &mut self.particles,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        self.player.update(held, &solids, dt, &mut fx);
        self.interactions
            .update(dt, &mut self.player, &self.world, &mut fx);

        self.particles.update(dt);
        self.update_camera();

        let zone_w = self.world.zone_width();
        self.player.pos.x = clamp(self.player.pos.x, -50.0, zone_w - self.player.w + 50.0);
    }

    fn update_camera(&mut self) {
        let viewport = self.camera.viewport;
        let target = self.player.center() - viewport / 2.0 + Vec2::new(0.0, self.tuning.camera_offset_y);
        let pos = self.camera.pos.lerp(target, self.tuning.camera_lerp);

        let zone_w = self.world.zone_width();
        self.camera.pos = Vec2::new(
            clamp(pos.x, -100.0, zone_w - viewport.x + 100.0),
            clamp(pos.y, -200.0, 300.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.phase = GamePhase::Start;
        state.start();
        state.drain_events();
        state
    }

    fn run(state: &mut GameState, input: &TickInput, seconds: f32) {
        let ticks = (seconds / SIM_DT).round() as usize;
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
        }
    }

    #[test]
    fn test_loading_then_start() {
        let mut state = GameState::new(1);
        let idle = TickInput::default();
        run(&mut state, &idle, 5.0);
        assert_eq!(state.phase, GamePhase::Start);
        assert!(state.drain_events().contains(&GameEvent::Ready));

        let start = TickInput {
            commands: vec![Command::Start],
            ..Default::default()
        };
        tick(&mut state, &start, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::Menu)));
        assert!(events.contains(&GameEvent::ZoneEntered(0)));
    }

    #[test]
    fn test_start_ignored_while_loading() {
        let mut state = GameState::new(1);
        state.handle_command(Command::Start);
        assert_eq!(state.phase, GamePhase::Loading);
    }

    #[test]
    fn test_player_settles_on_spawn_ground() {
        let mut state = playing(2);
        run(&mut state, &TickInput::default(), 2.0);
        assert!(state.player.grounded);
        assert_eq!(state.player.feet_y(), 500.0);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut state = playing(2);
        state.update(&Buttons::default(), 1.0);
        assert!((state.time - MAX_FRAME_DT).abs() < 1e-6);
        assert!((state.world.time - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_fall_below_world_respawns_next_frame() {
        let mut state = playing(4);
        state.player.pos.y = 701.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.pos, state.world.zone().spawn);
        assert!(state.drain_events().contains(&GameEvent::Respawned));
    }

    #[test]
    fn test_transition_sequence() {
        let mut state = playing(5);
        let idle = TickInput::default();
        state.particles.spawn(0.0, 0.0, 0.0, 0.0, 10.0, [1.0; 4], 2.0);

        assert!(state.transition_to_zone(2, Vec2::new(80.0, 400.0)));
        assert!(!state.transition_to_zone(3, Vec2::ZERO));

        // Gameplay frozen during fade-in
        let frozen = state.player.pos;
        run(&mut state, &idle, 0.5);
        assert_eq!(state.player.pos, frozen);
        assert_eq!(state.world.current_index(), 0);

        run(&mut state, &idle, 0.5);
        assert_eq!(state.world.current_index(), 2);
        assert_eq!(state.player.pos, Vec2::new(80.0, 400.0));
        assert!(state.particles.is_empty());
        assert!(state.is_transitioning());

        run(&mut state, &idle, 1.8);
        assert!(!state.is_transitioning());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ZoneEntered(2)));
        assert!(events.contains(&GameEvent::TransitionFinished));
    }

    #[test]
    fn test_transition_to_unknown_zone_ignored() {
        let mut state = playing(5);
        assert!(!state.transition_to_zone(9, Vec2::ZERO));
        assert!(!state.is_transitioning());
    }

    #[test]
    fn test_transition_advances_while_paused() {
        let mut state = playing(6);
        state.transition_to_zone(1, Vec2::new(80.0, 400.0));
        state.pause();
        run(&mut state, &TickInput::default(), 3.0);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.is_transitioning());
        assert_eq!(state.world.current_index(), 1);
    }

    #[test]
    fn test_pause_freezes_gameplay() {
        let mut state = playing(7);
        let toggle = TickInput {
            commands: vec![Command::TogglePause],
            ..Default::default()
        };
        tick(&mut state, &toggle, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        let t = state.time;
        run(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.time, t);

        tick(&mut state, &toggle, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Paused));
        assert!(events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = playing(8);
        state.world.load_zone(3);
        state.player.interacting = true;
        state.particles.spawn(0.0, 0.0, 0.0, 0.0, 10.0, [1.0; 4], 2.0);
        state.transition_to_zone(4, Vec2::ZERO);

        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.world.current_index(), 0);
        assert_eq!(state.player.pos, state.world.zone().spawn);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert!(!state.player.interacting);
        assert!(state.particles.is_empty());
        assert!(!state.is_transitioning());
    }

    /// Put the player on `target` and let proximity catch up
    fn stand_on(state: &mut GameState, target: Rect) {
        let half = Vec2::new(state.player.w / 2.0, state.player.h / 2.0);
        state.player.pos = target.center() - half;
        state.player.vel = Vec2::ZERO;
        tick(state, &TickInput::default(), SIM_DT);
        state.drain_events();
    }

    #[test]
    fn test_restart_mid_transition_finishes_it() {
        let mut state = playing(11);
        state.transition_to_zone(2, Vec2::new(80.0, 400.0));
        run(&mut state, &TickInput::default(), 10.0 * SIM_DT);
        state.handle_command(Command::TogglePause);
        state.drain_events();

        state.handle_command(Command::Restart);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::TransitionFinished));
        assert!(!state.is_transitioning());

        // Nothing left to finish later
        run(&mut state, &TickInput::default(), 10.0);
        assert!(!state.drain_events().contains(&GameEvent::TransitionFinished));
    }

    #[test]
    fn test_restart_closes_dialogue_and_panel() {
        let mut state = playing(12);
        let npc = state.world.npcs()[0].rect;
        stand_on(&mut state, npc);
        state.handle_command(Command::Interact);
        assert!(state.interactions.is_dialogue_active());

        state.handle_command(Command::Restart);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::DialogueEnded));
        assert!(!events.contains(&GameEvent::PanelClosed));
        assert!(!state.interactions.is_dialogue_active());

        let sign = state.world.interactables()[0].rect;
        stand_on(&mut state, sign);
        state.handle_command(Command::Interact);
        assert!(state.interactions.open_panel().is_some());

        state.handle_command(Command::Restart);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PanelClosed));
        assert!(!events.contains(&GameEvent::DialogueEnded));
        assert!(!events.contains(&GameEvent::TransitionFinished));
    }

    #[test]
    fn test_close_panel_while_paused() {
        let mut state = playing(13);
        let sign = state.world.interactables()[0].rect;
        stand_on(&mut state, sign);
        state.handle_command(Command::Interact);
        assert!(state.player.interacting);

        state.handle_command(Command::TogglePause);
        state.handle_command(Command::ClosePanel);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.interactions.open_panel().is_none());
        assert!(!state.player.interacting);
        assert!(state.drain_events().contains(&GameEvent::PanelClosed));
    }

    #[test]
    fn test_player_clamped_to_zone() {
        let mut state = playing(9);
        state.player.pos.x = -400.0;
        state.update(&Buttons::default(), SIM_DT);
        assert!(state.player.pos.x >= -50.0);

        state.player.pos.x = 10_000.0;
        state.update(&Buttons::default(), SIM_DT);
        assert!(state.player.pos.x <= state.world.zone_width() - PLAYER_W + 50.0);
    }

    #[test]
    fn test_camera_stays_in_bounds() {
        let mut state = playing(10);
        let right = TickInput {
            held: Buttons {
                right: true,
                run: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..1200 {
            tick(&mut state, &right, SIM_DT);
            let cam = state.camera.pos;
            let zone_w = state.world.zone_width();
            assert!(cam.x >= -100.0 && cam.x <= zone_w - state.camera.viewport.x + 100.0);
            assert!(cam.y >= -200.0 && cam.y <= 300.0);
        }
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = playing(11);
        let mut b = playing(11);
        let input = TickInput {
            held: Buttons {
                right: true,
                jump: true,
                ..Default::default()
            },
            ..Default::default()
        };
        run(&mut a, &input, 3.0);
        run(&mut b, &input, 3.0);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.particles.len(), b.particles.len());
    }
}
