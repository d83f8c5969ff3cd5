//! Proximity prompts, NPC dialogue, info panels and hazards
//!
//! Runs after the player has moved each tick. Nearby objects are tracked by
//! index into the current zone's lists; the indices are refreshed every tick
//! so they never outlive a zone change.

use glam::Vec2;

use super::effects::{Effects, GameEvent, SoundCue};
use super::player::Player;
use super::rect::Rect;
use super::world::{ObstacleKind, PanelKind, Portal, World};
use crate::consts::*;
use crate::{Color, hex_to_rgba};

const DAMAGE_COLOR: &str = "#ff2244";
const RESPAWN_COLOR: &str = "#00f0ff";
const WIND_COLOR: &str = "#aabbff";

/// Which action the E prompt advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    EnterPortal,
    Talk,
    Interact,
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::EnterPortal => "Enter Portal",
            PromptKind::Talk => "Talk",
            PromptKind::Interact => "Interact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialoguePhase {
    /// Typewriter still revealing the current line
    Revealing,
    /// Line fully shown, waiting for interact
    LineComplete,
}

/// Result of pressing interact during a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueStep {
    /// Current line was completed instantly
    Revealed,
    NextLine,
    Ended,
}

/// An open conversation with one NPC
#[derive(Debug, Clone)]
pub struct Dialogue {
    pub speaker: &'static str,
    pub portrait: &'static str,
    lines: &'static [&'static str],
    line: usize,
    /// Characters of the current line shown so far
    revealed: usize,
    timer_ms: f32,
}

impl Dialogue {
    fn new(speaker: &'static str, portrait: &'static str, lines: &'static [&'static str]) -> Self {
        Self {
            speaker,
            portrait,
            lines,
            line: 0,
            revealed: 0,
            timer_ms: 0.0,
        }
    }

    fn current(&self) -> &'static str {
        self.lines.get(self.line).copied().unwrap_or("")
    }

    fn line_chars(&self) -> usize {
        self.current().chars().count()
    }

    pub fn line_index(&self) -> usize {
        self.line
    }

    pub fn phase(&self) -> DialoguePhase {
        if self.revealed < self.line_chars() {
            DialoguePhase::Revealing
        } else {
            DialoguePhase::LineComplete
        }
    }

    /// Visible prefix of the current line
    pub fn text(&self) -> &'static str {
        let line = self.current();
        match line.char_indices().nth(self.revealed) {
            Some((byte, _)) => &line[..byte],
            None => line,
        }
    }

    fn tick(&mut self, dt: f32) {
        let total = self.line_chars();
        if self.revealed >= total {
            return;
        }
        self.timer_ms += dt * 1000.0;
        while self.timer_ms >= TYPEWRITER_MS_PER_CHAR && self.revealed < total {
            self.timer_ms -= TYPEWRITER_MS_PER_CHAR;
            self.revealed += 1;
        }
    }

    fn advance(&mut self) -> DialogueStep {
        if self.phase() == DialoguePhase::Revealing {
            self.revealed = self.line_chars();
            return DialogueStep::Revealed;
        }
        self.line += 1;
        if self.line >= self.lines.len() {
            return DialogueStep::Ended;
        }
        self.revealed = 0;
        self.timer_ms = 0.0;
        DialogueStep::NextLine
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionSystem {
    pub nearby_interactable: Option<usize>,
    pub nearby_npc: Option<usize>,
    pub nearby_portal: Option<usize>,
    dialogue: Option<Dialogue>,
    panel: Option<PanelKind>,
    /// Set by zone transitions; falls back to the zone spawn
    respawn: Option<Vec2>,
    damage_cooldown: f32,
    damage_flash: f32,
    interaction_cooldown: f32,
    last_interacted: Option<usize>,
}

impl InteractionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialogue(&self) -> Option<&Dialogue> {
        self.dialogue.as_ref()
    }

    pub fn is_dialogue_active(&self) -> bool {
        self.dialogue.is_some()
    }

    pub fn open_panel(&self) -> Option<PanelKind> {
        self.panel
    }

    pub fn set_respawn(&mut self, pos: Vec2) {
        self.respawn = Some(pos);
    }

    /// Player body color, blinking red while the damage flash runs
    pub fn player_tint(&self) -> Color {
        if self.damage_flash > 0.0 && self.damage_flash % 0.1 > 0.05 {
            hex_to_rgba(DAMAGE_COLOR, 1.0)
        } else {
            [0.0, 0.0, 0.0, 1.0]
        }
    }

    /// Prompt to show, if any
    pub fn prompt(&self) -> Option<PromptKind> {
        if self.panel.is_some() || self.dialogue.is_some() {
            return None;
        }
        if self.nearby_portal.is_some() {
            Some(PromptKind::EnterPortal)
        } else if self.nearby_npc.is_some() {
            Some(PromptKind::Talk)
        } else if self.nearby_interactable.is_some() {
            Some(PromptKind::Interact)
        } else {
            None
        }
    }

    pub fn update(&mut self, dt: f32, player: &mut Player, world: &World, fx: &mut Effects) {
        if self.damage_cooldown > 0.0 {
            self.damage_cooldown -= dt;
        }
        if self.damage_flash > 0.0 {
            self.damage_flash -= dt;
        }
        if self.interaction_cooldown > 0.0 {
            self.interaction_cooldown -= dt;
        }

        let center = player.center();
        let near = |rect: &Rect, radius: f32| rect.center().distance(center) < radius;
        self.nearby_interactable = world
            .interactables()
            .iter()
            .position(|o| near(&o.rect, INTERACT_RADIUS));
        self.nearby_npc = world.npcs().iter().position(|n| near(&n.rect, INTERACT_RADIUS));
        self.nearby_portal = world.portals().iter().position(|p| near(&p.rect, PORTAL_RADIUS));

        if self.last_interacted.is_some() && self.nearby_interactable != self.last_interacted {
            self.last_interacted = None;
            self.interaction_cooldown = 0.0;
        }

        self.check_hazards(player, world, fx);

        if let Some(dialogue) = &mut self.dialogue {
            dialogue.tick(dt);
        }

        for obstacle in world.obstacles() {
            let ObstacleKind::Wind { push_x } = obstacle.kind else {
                continue;
            };
            if player.collider().overlaps(&obstacle.rect) {
                player.vel.x += push_x * WIND_PUSH_FACTOR;
                if fx.chance(0.2) {
                    let c = player.center();
                    let vy = fx.rand_range(-1.0, 1.0);
                    fx.spawn(c.x, c.y, push_x * 2.0, vy, 0.5, hex_to_rgba(WIND_COLOR, 1.0), 2.0);
                }
            }
        }
    }

    fn check_hazards(&mut self, player: &mut Player, world: &World, fx: &mut Effects) {
        for obstacle in world.obstacles() {
            if self.damage_cooldown > 0.0 {
                break;
            }
            let hit = match obstacle.kind {
                ObstacleKind::Spikes { damage: true } => player.collider().overlaps(&obstacle.rect),
                ObstacleKind::Laser { active: true, .. } => player
                    .collider()
                    .overlaps(&obstacle.rect.expand_x(LASER_HIT_MARGIN)),
                _ => false,
            };
            if hit {
                self.take_damage(player, fx);
            }
        }

        if player.pos.y > FALL_LIMIT_Y {
            self.respawn_player(player, world, fx);
        }
    }

    fn take_damage(&mut self, player: &mut Player, fx: &mut Effects) {
        self.damage_cooldown = DAMAGE_COOLDOWN;
        self.damage_flash = DAMAGE_FLASH;
        fx.sound(SoundCue::Hit);
        fx.emit(GameEvent::Damaged);
        log::debug!("Player hit at ({:.0}, {:.0})", player.pos.x, player.pos.y);

        player.vel.y = KNOCKBACK_VY;
        player.vel.x = -player.facing * KNOCKBACK_VX;

        let c = player.center();
        let color = hex_to_rgba(DAMAGE_COLOR, 1.0);
        for _ in 0..10 {
            let vx = fx.rand_range(-4.0, 4.0);
            let vy = fx.rand_range(-4.0, 2.0);
            let life = fx.rand_range(0.3, 0.6);
            let size = fx.rand_range(2.0, 5.0);
            fx.spawn(c.x, c.y, vx, vy, life, color, size);
        }
    }

    fn respawn_player(&mut self, player: &mut Player, world: &World, fx: &mut Effects) {
        let spawn = self.respawn.unwrap_or(world.zone().spawn);
        player.reset_transform(spawn);
        fx.emit(GameEvent::Respawned);
        log::debug!("Respawned at ({:.0}, {:.0})", spawn.x, spawn.y);

        let color = hex_to_rgba(RESPAWN_COLOR, 1.0);
        for _ in 0..15 {
            let vx = fx.rand_range(-3.0, 3.0);
            let vy = fx.rand_range(-3.0, 3.0);
            let life = fx.rand_range(0.4, 0.8);
            let size = fx.rand_range(2.0, 5.0);
            fx.spawn(spawn.x + 15.0, spawn.y + 30.0, vx, vy, life, color, size);
        }
    }

    /// Handle the interact key. Returns a portal when the player asked to
    /// travel; the caller owns the transition.
    pub fn interact(&mut self, player: &mut Player, world: &World, fx: &mut Effects) -> Option<Portal> {
        if self.dialogue.is_some() {
            self.advance_dialogue(player, fx);
            return None;
        }

        if self.panel.is_some() {
            self.close_panel(player, fx);
            return None;
        }

        if self.interaction_cooldown > 0.0 && self.last_interacted == self.nearby_interactable {
            return None;
        }

        if let Some(portal) = self.nearby_portal.and_then(|i| world.portals().get(i)) {
            return Some(portal.clone());
        }

        if let Some(npc) = self.nearby_npc.and_then(|i| world.npcs().get(i)) {
            self.dialogue = Some(Dialogue::new(npc.name, npc.portrait, npc.dialogues));
            player.interacting = true;
            fx.emit(GameEvent::DialogueStarted {
                speaker: npc.name,
                portrait: npc.portrait,
            });
            fx.sound(SoundCue::Interact);
            return None;
        }

        if let Some(sign) = self.nearby_interactable.and_then(|i| world.interactables().get(i)) {
            self.panel = Some(sign.panel);
            player.interacting = true;
            fx.emit(GameEvent::PanelOpened(sign.panel));
            fx.sound(SoundCue::Interact);
        }
        None
    }

    /// Complete the line being typed, or move to the next one
    pub fn advance_dialogue(&mut self, player: &mut Player, fx: &mut Effects) -> Option<DialogueStep> {
        let step = self.dialogue.as_mut()?.advance();
        if step == DialogueStep::Ended {
            self.dialogue = None;
            player.interacting = false;
            fx.emit(GameEvent::DialogueEnded);
        }
        Some(step)
    }

    /// Close the open info panel (close button, backdrop or interact key)
    pub fn close_panel(&mut self, player: &mut Player, fx: &mut Effects) {
        if self.panel.take().is_none() {
            return;
        }
        player.interacting = false;
        self.interaction_cooldown = INTERACTION_COOLDOWN;
        self.last_interacted = self.nearby_interactable;
        fx.emit(GameEvent::PanelClosed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particles::ParticleSystem;
    use crate::sim::world::{Interactable, Npc, Obstacle, Platform, PlatformKind, Sky, Zone};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const LINES: &[&str] = &["Hi.", "Second line", "Bye"];

    struct Harness {
        particles: ParticleSystem,
        rng: Pcg32,
        events: Vec<GameEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                particles: ParticleSystem::default(),
                rng: Pcg32::seed_from_u64(9),
                events: Vec::new(),
            }
        }

        fn fx(&mut self) -> Effects<'_> {
            Effects {
                particles: &mut self.particles,
                rng: &mut self.rng,
                events: &mut self.events,
            }
        }
    }

    fn zone() -> Zone {
        Zone {
            platforms: vec![Platform {
                rect: Rect::new(-100.0, 500.0, 3000.0, 80.0),
                kind: PlatformKind::Ground,
                color: [0.4, 0.3, 0.2, 1.0],
                top_color: None,
            }],
            decorations: Vec::new(),
            interactables: vec![Interactable {
                rect: Rect::new(1000.0, 450.0, 60.0, 50.0),
                icon: "📋",
                panel: PanelKind::About,
                hint: "Read",
            }],
            obstacles: vec![
                Obstacle::spikes(1500.0, 488.0, 60.0, 12.0),
                Obstacle::wind(2000.0, 300.0, 200.0, 200.0, 3.0),
            ],
            npcs: vec![Npc {
                rect: Rect::new(600.0, 440.0, 30.0, 60.0),
                name: "Tester",
                portrait: "🧪",
                dialogues: LINES,
            }],
            portals: vec![Portal {
                rect: Rect::new(2500.0, 440.0, 50.0, 60.0),
                target_zone: 1,
                spawn: Vec2::new(80.0, 400.0),
            }],
            parallax: Vec::new(),
            sky: Sky {
                top: [0.0; 4],
                bottom: [0.0; 4],
            },
            width: 3000.0,
            spawn: Vec2::new(80.0, 420.0),
        }
    }

    fn standing_at(x: f32) -> Player {
        let mut p = Player::new(x, 440.0);
        p.grounded = true;
        p
    }

    #[test]
    fn test_prompt_priority_and_range() {
        let world = World::from_zones(vec![zone()]);
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();

        let mut player = standing_at(300.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(sys.prompt(), None);

        let mut player = standing_at(600.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(sys.prompt(), Some(PromptKind::Talk));

        let mut player = standing_at(2505.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(sys.prompt(), Some(PromptKind::EnterPortal));
        assert_eq!(PromptKind::EnterPortal.label(), "Enter Portal");
    }

    #[test]
    fn test_dialogue_runs_through_every_line() {
        let world = World::from_zones(vec![zone()]);
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(600.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());

        assert!(sys.interact(&mut player, &world, &mut h.fx()).is_none());
        assert!(player.interacting);
        assert_eq!(sys.prompt(), None);

        for line in 0..LINES.len() {
            // Let the typewriter finish
            for _ in 0..120 {
                sys.update(SIM_DT, &mut player, &world, &mut h.fx());
            }
            let d = sys.dialogue().expect("dialogue open");
            assert_eq!(d.line_index(), line);
            assert_eq!(d.phase(), DialoguePhase::LineComplete);
            assert_eq!(d.text(), LINES[line]);
            sys.interact(&mut player, &world, &mut h.fx());
        }

        assert!(!sys.is_dialogue_active());
        assert!(!player.interacting);
        assert!(h.events.contains(&GameEvent::DialogueEnded));
    }

    #[test]
    fn test_interact_while_revealing_completes_line() {
        let world = World::from_zones(vec![zone()]);
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(600.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        sys.interact(&mut player, &world, &mut h.fx());

        // 30 ms per char: one 16.7 ms tick reveals nothing yet
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        let d = sys.dialogue().expect("dialogue open");
        assert_eq!(d.phase(), DialoguePhase::Revealing);
        assert_eq!(d.text(), "");

        let step = sys.advance_dialogue(&mut player, &mut h.fx());
        assert_eq!(step, Some(DialogueStep::Revealed));
        let d = sys.dialogue().expect("dialogue open");
        assert_eq!(d.line_index(), 0);
        assert_eq!(d.text(), LINES[0]);
    }

    #[test]
    fn test_typewriter_handles_multibyte_text() {
        let mut d = Dialogue::new("x", "x", &["a—b"]);
        d.tick(0.035);
        assert_eq!(d.text(), "a");
        d.tick(0.030);
        assert_eq!(d.text(), "a—");
        d.tick(1.0);
        assert_eq!(d.text(), "a—b");
    }

    #[test]
    fn test_panel_close_debounces_same_sign() {
        let world = World::from_zones(vec![zone()]);
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(1015.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(sys.prompt(), Some(PromptKind::Interact));

        sys.interact(&mut player, &world, &mut h.fx());
        assert_eq!(sys.open_panel(), Some(PanelKind::About));
        assert!(player.interacting);

        sys.interact(&mut player, &world, &mut h.fx());
        assert_eq!(sys.open_panel(), None);
        assert!(!player.interacting);

        // Within the cooldown, pressing again does not reopen
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        sys.interact(&mut player, &world, &mut h.fx());
        assert_eq!(sys.open_panel(), None);

        for _ in 0..40 {
            sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        }
        sys.interact(&mut player, &world, &mut h.fx());
        assert_eq!(sys.open_panel(), Some(PanelKind::About));
    }

    #[test]
    fn test_portal_interaction_requests_transition() {
        let world = World::from_zones(vec![zone()]);
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(2505.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        let portal = sys.interact(&mut player, &world, &mut h.fx()).expect("portal");
        assert_eq!(portal.target_zone, 1);
        assert!(!player.interacting);
    }

    #[test]
    fn test_fall_respawns_immediately() {
        let world = World::from_zones(vec![zone()]);
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = Player::new(400.0, 701.0);
        player.vel = Vec2::new(3.0, 12.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(player.pos, Vec2::new(80.0, 420.0));
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(h.particles.len(), 15);

        sys.set_respawn(Vec2::new(80.0, 400.0));
        player.pos.y = 900.0;
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(player.pos, Vec2::new(80.0, 400.0));
    }

    #[test]
    fn test_spikes_damage_with_cooldown() {
        let world = World::from_zones(vec![zone()]);
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(1500.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(player.vel, Vec2::new(-KNOCKBACK_VX, KNOCKBACK_VY));
        assert_eq!(h.particles.len(), 10);

        // Still overlapping, but the cooldown holds
        player.vel = Vec2::ZERO;
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(player.vel, Vec2::ZERO);
        let hits = h.events.iter().filter(|e| **e == GameEvent::Damaged).count();
        assert_eq!(hits, 1);
    }

    fn laser_world(active: bool) -> World {
        let mut laser = Obstacle::laser(1200.0, 300.0, 8.0, 200.0, 2.0);
        if let ObstacleKind::Laser { active: on, .. } = &mut laser.kind {
            *on = active;
        }
        let mut zone = zone();
        zone.obstacles = vec![laser];
        World::from_zones(vec![zone])
    }

    fn hits(h: &Harness) -> usize {
        h.events.iter().filter(|e| **e == GameEvent::Damaged).count()
    }

    #[test]
    fn test_laser_hurts_only_while_active() {
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(1190.0);
        sys.update(SIM_DT, &mut player, &laser_world(false), &mut h.fx());
        assert_eq!(hits(&h), 0);
        assert_eq!(player.vel, Vec2::ZERO);

        sys.update(SIM_DT, &mut player, &laser_world(true), &mut h.fx());
        assert_eq!(hits(&h), 1);
        assert_eq!(player.vel, Vec2::new(-KNOCKBACK_VX, KNOCKBACK_VY));
    }

    #[test]
    fn test_laser_hit_box_is_wider_than_beam() {
        let world = laser_world(true);

        // Collider's right edge 3 px short of the beam
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(1200.0 - 3.0 - (PLAYER_W - COLLIDER_INSET_X));
        assert!(!player.collider().overlaps(&world.obstacles()[0].rect));
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(hits(&h), 1);

        // Beyond the margin
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(1200.0 - 7.0 - (PLAYER_W - COLLIDER_INSET_X));
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert_eq!(hits(&h), 0);
    }

    #[test]
    fn test_wind_pushes_player() {
        let world = World::from_zones(vec![zone()]);
        let mut h = Harness::new();
        let mut sys = InteractionSystem::new();
        let mut player = standing_at(2050.0);
        sys.update(SIM_DT, &mut player, &world, &mut h.fx());
        assert!((player.vel.x - 0.3).abs() < 1e-6);
    }
}
