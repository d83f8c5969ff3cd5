//! Zones, level geometry and kinematic obstacles
//!
//! A `World` owns the five zone templates and an index to the current one.
//! Obstacle behaviour state lives inside the template and is advanced in
//! place, so a zone remembers its hazards' phase if it is ever revisited.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::effects::{rand_int, rand_range};
use super::player::Player;
use super::rect::Rect;
use super::zones;
use crate::Color;
use crate::consts::*;

/// Render style for a solid platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    Ground,
    Brick,
    Block,
    Metal,
    BridgePlank,
}

#[derive(Debug, Clone)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
    pub color: Color,
    /// Grass strip color for ground tiles
    pub top_color: Option<Color>,
}

/// Axis a moving platform oscillates along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Obstacle behaviour with its mutable state
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleKind {
    /// Damages on contact while `damage` is set
    Spikes { damage: bool },
    /// Blinks on and off with a 50% duty cycle
    Laser { speed: f32, phase: f32, active: bool },
    /// Solid, oscillates `range` px around `anchor`
    MovingPlatform {
        axis: Axis,
        range: f32,
        speed: f32,
        anchor: Vec2,
        phase: f32,
    },
    /// Non-solid zone of constant lateral push
    Wind { push_x: f32 },
    /// Solid until stood on for `fall_delay` seconds, then drops and recycles
    FallingPlatform {
        fall_delay: f32,
        fall_timer: f32,
        falling: bool,
        origin_y: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn spikes(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind: ObstacleKind::Spikes { damage: true },
        }
    }

    pub fn laser(x: f32, y: f32, w: f32, h: f32, speed: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind: ObstacleKind::Laser {
                speed,
                phase: 0.0,
                active: true,
            },
        }
    }

    pub fn moving_platform(rect: Rect, axis: Axis, range: f32, speed: f32) -> Self {
        Self {
            rect,
            kind: ObstacleKind::MovingPlatform {
                axis,
                range,
                speed,
                anchor: Vec2::new(rect.x, rect.y),
                phase: 0.0,
            },
        }
    }

    pub fn wind(x: f32, y: f32, w: f32, h: f32, push_x: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind: ObstacleKind::Wind { push_x },
        }
    }

    pub fn falling_platform(x: f32, y: f32, w: f32, h: f32, fall_delay: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            kind: ObstacleKind::FallingPlatform {
                fall_delay,
                fall_timer: 0.0,
                falling: false,
                origin_y: y,
            },
        }
    }

    /// Whether the obstacle currently blocks movement
    pub fn is_solid(&self) -> bool {
        match self.kind {
            ObstacleKind::MovingPlatform { .. } => true,
            ObstacleKind::FallingPlatform { falling, .. } => !falling,
            ObstacleKind::Spikes { .. } | ObstacleKind::Laser { .. } | ObstacleKind::Wind { .. } => {
                false
            }
        }
    }

    /// Advance timers and kinematics by one tick
    pub fn update(&mut self, dt: f32, player: &Player) {
        match &mut self.kind {
            ObstacleKind::MovingPlatform {
                axis,
                range,
                speed,
                anchor,
                phase,
            } => {
                *phase += dt * *speed;
                let offset = phase.sin() * *range;
                match axis {
                    Axis::X => self.rect.x = anchor.x + offset,
                    Axis::Y => self.rect.y = anchor.y + offset,
                }
            }
            ObstacleKind::Laser {
                speed,
                phase,
                active,
            } => {
                *phase += dt * *speed;
                *active = phase.sin() > 0.0;
            }
            ObstacleKind::FallingPlatform {
                fall_delay,
                fall_timer,
                falling,
                origin_y,
            } => {
                let rect = self.rect;
                let feet = player.feet_y();
                let center_x = player.center().x;
                let player_on = player.grounded
                    && feet >= rect.y - FALLING_PLATFORM_BAND
                    && feet <= rect.y + FALLING_PLATFORM_BAND
                    && center_x > rect.x
                    && center_x < rect.right();

                if player_on && !*falling {
                    *fall_timer += dt;
                    if *fall_timer >= *fall_delay {
                        *falling = true;
                    }
                }
                if *falling {
                    self.rect.y += FALLING_PLATFORM_SPEED;
                    if self.rect.y > FALLING_PLATFORM_RESET_Y {
                        self.rect.y = *origin_y;
                        *falling = false;
                        *fall_timer = 0.0;
                    }
                }
            }
            ObstacleKind::Spikes { .. } | ObstacleKind::Wind { .. } => {}
        }
    }
}

/// Info panels opened from signboards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    About,
    SkillsFrontend,
    SkillsBackend,
    Project1,
    Project2,
    Project3,
    Project4,
    Experience,
    Contact,
    Achievements,
}

impl PanelKind {
    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::About => "ABOUT ME",
            PanelKind::SkillsFrontend => "FRONTEND SKILLS",
            PanelKind::SkillsBackend => "BACKEND & TOOLS",
            PanelKind::Project1 => "PORTFOLIO HACKER",
            PanelKind::Project2 => "CODE QUEST GAME",
            PanelKind::Project3 => "FOREST PORTFOLIO",
            PanelKind::Project4 => "MORE PROJECTS",
            PanelKind::Experience => "EXPERIENCE",
            PanelKind::Contact => "CONTACT",
            PanelKind::Achievements => "ACHIEVEMENTS",
        }
    }

    /// DOM template id holding the panel body
    pub fn template_id(&self) -> &'static str {
        match self {
            PanelKind::About => "panel-about",
            PanelKind::SkillsFrontend => "panel-skills-frontend",
            PanelKind::SkillsBackend => "panel-skills-backend",
            PanelKind::Project1 => "panel-project-1",
            PanelKind::Project2 => "panel-project-2",
            PanelKind::Project3 => "panel-project-3",
            PanelKind::Project4 => "panel-project-4",
            PanelKind::Experience => "panel-experience",
            PanelKind::Contact => "panel-contact",
            PanelKind::Achievements => "panel-achievements",
        }
    }
}

/// Signboard that opens an info panel
#[derive(Debug, Clone)]
pub struct Interactable {
    pub rect: Rect,
    pub icon: &'static str,
    pub panel: PanelKind,
    pub hint: &'static str,
}

#[derive(Debug, Clone)]
pub struct Npc {
    pub rect: Rect,
    pub name: &'static str,
    pub portrait: &'static str,
    pub dialogues: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct Portal {
    pub rect: Rect,
    pub target_zone: usize,
    pub spawn: Vec2,
}

/// Render-only scenery
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationKind {
    Tree { size: f32, trunk: Color, leaf: Color },
    Bush { size: f32, color: Color },
    Flower { size: f32, color: Color },
    Cloud { size: f32, speed: f32 },
    Sun { size: f32 },
    Bird { speed: f32, offset: f32 },
    House { w: f32, h: f32, roof: Color, wall: Color, door: Color, chimney: bool },
    /// Clickable: links out to the forest portfolio
    Fence,
    Pipe { height: f32, color: Color },
    Underground { w: f32, h: f32, color: Color },
    River { w: f32, h: f32 },
    CodeFragment { symbol: &'static str, float_offset: f32 },
    SkillPillar { label: &'static str, height: f32, color: Color },
    Machine { variant: u8, size: f32 },
    Conveyor { width: f32 },
    Gear { size: f32, speed: f32, color: Color },
    Smokestack { height: f32 },
    FactoryBuilding { w: f32, h: f32, color: Color, roof: Color },
    TimelinePost { year: &'static str, title: &'static str, color: Color },
    BridgeTower { height: f32 },
    TowerTop,
    TowerBody { height: f32 },
    SignalDish,
    SignalWave { radius: f32, offset: f32 },
    Sparkle { size: f32, offset: f32 },
}

#[derive(Debug, Clone)]
pub struct Decoration {
    /// Anchor point; ground-standing scenery uses its base
    pub pos: Vec2,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn new(x: f32, y: f32, kind: DecorationKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            kind,
        }
    }
}

/// Fence hit box relative to its base anchor
pub const FENCE_W: f32 = 30.0;
pub const FENCE_H: f32 = 40.0;
/// Where clicking a fence leads
pub const FENCE_LINK: &str = "../Portfolio_Forest/index.html";

/// Distant scenery drawn with a horizontal scroll factor
#[derive(Debug, Clone)]
pub enum ParallaxShape {
    Hills { points: Vec<Vec2> },
    SnowMountains { points: Vec<Vec2>, snow: Color },
    Buildings { rects: Vec<Rect> },
}

#[derive(Debug, Clone)]
pub struct ParallaxLayer {
    pub speed: f32,
    pub color: Color,
    pub shape: ParallaxShape,
}

/// Vertical sky gradient
#[derive(Debug, Clone, Copy)]
pub struct Sky {
    pub top: Color,
    pub bottom: Color,
}

/// Static level template
#[derive(Debug, Clone)]
pub struct Zone {
    pub platforms: Vec<Platform>,
    pub decorations: Vec<Decoration>,
    pub interactables: Vec<Interactable>,
    pub obstacles: Vec<Obstacle>,
    pub npcs: Vec<Npc>,
    pub portals: Vec<Portal>,
    pub parallax: Vec<ParallaxLayer>,
    pub sky: Sky,
    pub width: f32,
    pub spawn: Vec2,
}

/// Title card data for a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneInfo {
    pub name: &'static str,
    pub icon: &'static str,
    pub desc: &'static str,
    pub color: &'static str,
}

pub const ZONE_INFOS: [ZoneInfo; 5] = [
    ZoneInfo {
        name: "Spawn Village",
        icon: "🏠",
        desc: "A peaceful village where your journey begins...",
        color: "#2d8a4e",
    },
    ZoneInfo {
        name: "Skill Mountains",
        icon: "⛰️",
        desc: "Climb the peaks of knowledge...",
        color: "#4a90d9",
    },
    ZoneInfo {
        name: "Project Factory",
        icon: "🏭",
        desc: "Where ideas become reality...",
        color: "#d4760a",
    },
    ZoneInfo {
        name: "Experience Bridge",
        icon: "🌉",
        desc: "Crossing the timeline of growth...",
        color: "#c44dbb",
    },
    ZoneInfo {
        name: "Contact Tower",
        icon: "🗼",
        desc: "Reach out to the creator...",
        color: "#d4a017",
    },
];

/// Decorative drifter, scoped to the current zone
#[derive(Debug, Clone)]
pub struct AmbientParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: Color,
}

const AMBIENT_COLORS: [&str; 4] = ["#fff9c4", "#c8e6c9", "#ffccbc", "#bbdefb"];
const AMBIENT_MAX_LIFE: f32 = 7.0;

pub struct World {
    pub zones: Vec<Zone>,
    current: usize,
    pub ambient: Vec<AmbientParticle>,
    /// Seconds since the world was built
    pub time: f32,
}

impl World {
    /// Build all zones (decoration jitter draws from `rng`) and load zone 0
    pub fn new(rng: &mut Pcg32) -> Self {
        let mut world = Self {
            zones: zones::build_all(rng),
            current: 0,
            ambient: Vec::new(),
            time: 0.0,
        };
        world.load_zone(0);
        world
    }

    /// World with hand-made zones (tests, tools)
    pub fn from_zones(zones: Vec<Zone>) -> Self {
        Self {
            zones,
            current: 0,
            ambient: Vec::new(),
            time: 0.0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Switch to zone `index`. Out-of-range requests are ignored.
    pub fn load_zone(&mut self, index: usize) -> Option<&Zone> {
        if index >= self.zones.len() {
            log::warn!("Ignoring request for unknown zone {}", index);
            return None;
        }
        self.current = index;
        self.ambient.clear();
        log::info!("Loaded zone {} ({})", index, Self::zone_info(index).name);
        self.zones.get(index)
    }

    pub fn zone(&self) -> &Zone {
        &self.zones[self.current]
    }

    /// Zone width, falling back to the default for zero-width templates
    pub fn zone_width(&self) -> f32 {
        let w = self.zone().width;
        if w > 0.0 { w } else { DEFAULT_ZONE_WIDTH }
    }

    /// Title card data; unknown indices fall back to the first zone
    pub fn zone_info(index: usize) -> ZoneInfo {
        ZONE_INFOS.get(index).copied().unwrap_or(ZONE_INFOS[0])
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.zone().platforms
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.zone().obstacles
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.zone().npcs
    }

    pub fn portals(&self) -> &[Portal] {
        &self.zone().portals
    }

    pub fn interactables(&self) -> &[Interactable] {
        &self.zone().interactables
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.zone().decorations
    }

    /// Advance obstacles and ambient particles
    pub fn update(&mut self, dt: f32, player: &Player, rng: &mut Pcg32) {
        self.time += dt;
        for obstacle in &mut self.zones[self.current].obstacles {
            obstacle.update(dt, player);
        }

        if rand_range(rng, 0.0, 1.0) < AMBIENT_SPAWN_CHANCE {
            let width = self.zone_width();
            let color_idx = rand_int(rng, 0, AMBIENT_COLORS.len() as i32 - 1) as usize;
            self.ambient.push(AmbientParticle {
                pos: Vec2::new(rand_range(rng, 0.0, width), rand_range(rng, 100.0, 480.0)),
                vel: Vec2::new(rand_range(rng, -0.5, 0.5), rand_range(rng, -0.3, 0.3)),
                life: rand_range(rng, 3.0, AMBIENT_MAX_LIFE),
                max_life: AMBIENT_MAX_LIFE,
                size: rand_range(rng, 2.0, 4.0),
                color: crate::hex_to_rgba(AMBIENT_COLORS[color_idx], 1.0),
            });
        }

        let time = self.time;
        for p in &mut self.ambient {
            p.pos.x += p.vel.x + (time * 2.0 + p.pos.x * 0.01).sin() * 0.3;
            p.pos.y += p.vel.y + (time * 1.5 + p.pos.y * 0.01).cos() * 0.2;
            p.life -= dt;
        }
        self.ambient.retain(|p| p.life > 0.0);
    }

    /// Every rectangle the player collides with this tick
    pub fn solid_platforms(&self) -> Vec<Rect> {
        let zone = self.zone();
        zone.platforms
            .iter()
            .map(|p| p.rect)
            .chain(zone.obstacles.iter().filter(|o| o.is_solid()).map(|o| o.rect))
            .collect()
    }

    /// External link under a world-space point (fence decorations)
    pub fn link_at(&self, point: Vec2) -> Option<&'static str> {
        self.decorations()
            .iter()
            .filter(|d| d.kind == DecorationKind::Fence)
            .any(|d| Rect::new(d.pos.x, d.pos.y - FENCE_H, FENCE_W, FENCE_H).contains(point))
            .then_some(FENCE_LINK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    pub(crate) fn empty_zone() -> Zone {
        Zone {
            platforms: vec![Platform {
                rect: Rect::new(-100.0, 500.0, 2000.0, 80.0),
                kind: PlatformKind::Ground,
                color: [0.4, 0.25, 0.15, 1.0],
                top_color: None,
            }],
            decorations: Vec::new(),
            interactables: Vec::new(),
            obstacles: Vec::new(),
            npcs: Vec::new(),
            portals: Vec::new(),
            parallax: Vec::new(),
            sky: Sky {
                top: [0.3, 0.7, 0.9, 1.0],
                bottom: [0.5, 0.8, 0.9, 1.0],
            },
            width: 2000.0,
            spawn: Vec2::new(80.0, 420.0),
        }
    }

    #[test]
    fn test_builds_five_zones() {
        let mut rng = Pcg32::seed_from_u64(1);
        let world = World::new(&mut rng);
        assert_eq!(world.zone_count(), 5);
        assert_eq!(world.current_index(), 0);
        assert_eq!(World::zone_info(3).name, "Experience Bridge");
        assert_eq!(World::zone_info(99).name, "Spawn Village");
    }

    #[test]
    fn test_load_zone_out_of_range_is_ignored() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut world = World::new(&mut rng);
        assert!(world.load_zone(2).is_some());
        assert!(world.load_zone(42).is_none());
        assert_eq!(world.current_index(), 2);
    }

    #[test]
    fn test_laser_duty_cycle_is_half() {
        let player = Player::new(0.0, 0.0);
        let speed = 2.0;
        let mut laser = Obstacle::laser(0.0, 0.0, 8.0, 100.0, speed);
        let period = std::f32::consts::TAU / speed;
        let samples = 1000;
        let dt = period / samples as f32;
        let mut active = 0;
        for _ in 0..samples {
            laser.update(dt, &player);
            if let ObstacleKind::Laser { active: true, .. } = laser.kind {
                active += 1;
            }
        }
        let ratio = active as f32 / samples as f32;
        assert!((ratio - 0.5).abs() < 0.01, "duty cycle was {}", ratio);
    }

    proptest! {
        #[test]
        fn prop_laser_on_half_of_any_period(speed in 0.5f32..6.0) {
            let player = Player::new(0.0, 0.0);
            let mut laser = Obstacle::laser(0.0, 0.0, 8.0, 100.0, speed);
            let samples = 2000;
            let dt = std::f32::consts::TAU / speed / samples as f32;
            let mut active = 0;
            for _ in 0..samples {
                laser.update(dt, &player);
                if let ObstacleKind::Laser { active: true, .. } = laser.kind {
                    active += 1;
                }
            }
            let ratio = active as f32 / samples as f32;
            prop_assert!((ratio - 0.5).abs() < 0.01, "duty cycle was {}", ratio);
        }
    }

    #[test]
    fn test_moving_platform_oscillates_around_anchor() {
        let player = Player::new(0.0, 0.0);
        let rect = Rect::new(1480.0, 440.0, 80.0, 24.0);
        let mut platform = Obstacle::moving_platform(rect, Axis::Y, 120.0, 1.5);
        let dt = 1.0 / 60.0;
        for _ in 0..600 {
            platform.update(dt, &player);
            assert!((platform.rect.y - 440.0).abs() <= 120.0 + 1e-3);
            assert_eq!(platform.rect.x, 1480.0);
        }
        assert!(platform.is_solid());
    }

    #[test]
    fn test_falling_platform_cycle() {
        let mut zone = empty_zone();
        zone.platforms.clear();
        zone.obstacles.push(Obstacle::falling_platform(700.0, 450.0, 80.0, 24.0, 0.5));
        let mut world = World::from_zones(vec![zone]);
        let mut rng = Pcg32::seed_from_u64(3);

        // Player standing on the platform
        let mut player = Player::new(725.0, 450.0 - PLAYER_H);
        player.grounded = true;

        let dt = 0.1;
        for _ in 0..4 {
            world.update(dt, &player, &mut rng);
            assert_eq!(world.solid_platforms().len(), 1);
        }
        // 0.5 s reached on the fifth tick
        world.update(dt, &player, &mut rng);
        assert!(matches!(
            world.obstacles()[0].kind,
            ObstacleKind::FallingPlatform { falling: true, .. }
        ));
        assert!(world.solid_platforms().is_empty());

        // Falls until it passes y=800, then resets
        player.grounded = false;
        let mut ticks = 0;
        while matches!(
            world.obstacles()[0].kind,
            ObstacleKind::FallingPlatform { falling: true, .. }
        ) {
            world.update(dt, &player, &mut rng);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(world.obstacles()[0].rect.y, 450.0);
        assert_eq!(world.solid_platforms().len(), 1);
    }

    #[test]
    fn test_solid_platforms_excludes_hazards() {
        let mut zone = empty_zone();
        zone.obstacles.push(Obstacle::spikes(0.0, 488.0, 60.0, 12.0));
        zone.obstacles.push(Obstacle::wind(0.0, 300.0, 200.0, 200.0, 3.0));
        zone.obstacles.push(Obstacle::laser(0.0, 300.0, 8.0, 100.0, 2.0));
        zone.obstacles
            .push(Obstacle::moving_platform(Rect::new(0.0, 0.0, 10.0, 10.0), Axis::X, 5.0, 1.0));
        let world = World::from_zones(vec![zone]);
        assert_eq!(world.solid_platforms().len(), 2);
    }

    #[test]
    fn test_ambient_particles_cleared_on_zone_change() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut world = World::new(&mut rng);
        let player = Player::new(80.0, 420.0);
        for _ in 0..2000 {
            world.update(1.0 / 60.0, &player, &mut rng);
        }
        assert!(!world.ambient.is_empty());
        world.load_zone(1);
        assert!(world.ambient.is_empty());
    }

    #[test]
    fn test_fence_link_hit_test() {
        let mut zone = empty_zone();
        zone.decorations.push(Decoration::new(580.0, 500.0, DecorationKind::Fence));
        let world = World::from_zones(vec![zone]);
        assert_eq!(world.link_at(Vec2::new(590.0, 480.0)), Some(FENCE_LINK));
        assert_eq!(world.link_at(Vec2::new(590.0, 520.0)), None);
    }
}
