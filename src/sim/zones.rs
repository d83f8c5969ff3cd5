//! Level data for the five zones
//!
//! Layout is literal; only scenery jitter (tree sizes, cloud placement,
//! parallax spacing) draws from the seeded RNG.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::effects::{rand_int, rand_range};
use super::rect::Rect;
use super::world::{
    Axis, Decoration, DecorationKind, Interactable, Npc, Obstacle, PanelKind, ParallaxLayer,
    ParallaxShape, Platform, PlatformKind, Portal, Sky, Zone,
};
use crate::{Color, hex_to_rgba, hsl_to_rgba};

const GROUND_Y: f32 = 500.0;
const PLAYER_SPAWN: Vec2 = Vec2::new(80.0, 420.0);
const PORTAL_SPAWN: Vec2 = Vec2::new(80.0, 400.0);

fn hex(s: &str) -> Color {
    hex_to_rgba(s, 1.0)
}

fn hsl(h: f32, s: f32, l: f32) -> Color {
    hsl_to_rgba(h, s, l, 1.0)
}

fn randi(rng: &mut Pcg32, min: i32, max: i32) -> f32 {
    rand_int(rng, min, max) as f32
}

fn pick<T: Copy>(rng: &mut Pcg32, items: &[T]) -> T {
    items[rand_int(rng, 0, items.len() as i32 - 1) as usize]
}

fn ground(x: f32, w: f32, color: &str, top: &str) -> Platform {
    Platform {
        rect: Rect::new(x, GROUND_Y, w, 80.0),
        kind: PlatformKind::Ground,
        color: hex(color),
        top_color: Some(hex(top)),
    }
}

fn slab(kind: PlatformKind, x: f32, y: f32, w: f32, h: f32, color: Color) -> Platform {
    Platform {
        rect: Rect::new(x, y, w, h),
        kind,
        color,
        top_color: None,
    }
}

fn sign(x: f32, y: f32, icon: &'static str, panel: PanelKind, hint: &'static str) -> Interactable {
    Interactable {
        rect: Rect::new(x, y, 60.0, 50.0),
        icon,
        panel,
        hint,
    }
}

fn npc(x: f32, name: &'static str, portrait: &'static str, dialogues: &'static [&'static str]) -> Npc {
    Npc {
        rect: Rect::new(x, GROUND_Y - 60.0, 30.0, 60.0),
        name,
        portrait,
        dialogues,
    }
}

fn portal(x: f32, y: f32, target_zone: usize) -> Portal {
    Portal {
        rect: Rect::new(x, y, 50.0, 60.0),
        target_zone,
        spawn: PORTAL_SPAWN,
    }
}

fn clouds(rng: &mut Pcg32, n: usize, x: (f32, f32), y: (f32, f32), size: (f32, f32), speed: (f32, f32)) -> Vec<Decoration> {
    (0..n)
        .map(|_| {
            let cx = rand_range(rng, x.0, x.1);
            let cy = rand_range(rng, y.0, y.1);
            let size = rand_range(rng, size.0, size.1);
            let speed = rand_range(rng, speed.0, speed.1);
            Decoration::new(cx, cy, DecorationKind::Cloud { size, speed })
        })
        .collect()
}

fn flowers(rng: &mut Pcg32, n: usize, max_x: f32, palette: &[&str], size: (f32, f32)) -> Vec<Decoration> {
    (0..n)
        .map(|_| {
            let x = rand_range(rng, 0.0, max_x);
            let color = hex(pick(rng, palette));
            let size = rand_range(rng, size.0, size.1);
            Decoration::new(x, GROUND_Y, DecorationKind::Flower { size, color })
        })
        .collect()
}

fn rolling_hills(width: f32, color: &str, base_y: f32, freq: f32, speed: f32) -> ParallaxLayer {
    let mut points = Vec::new();
    let mut x = -100.0f32;
    while x < width + 200.0 {
        let y = GROUND_Y - base_y + (x * freq).sin() * 50.0 + (x * freq * 2.5).sin() * 25.0;
        points.push(Vec2::new(x, y));
        x += 30.0;
    }
    ParallaxLayer {
        speed,
        color: hex(color),
        shape: ParallaxShape::Hills { points },
    }
}

fn snow_mountains(rng: &mut Pcg32, width: f32, color: &str, base_y: f32, speed: f32) -> ParallaxLayer {
    let mut points = Vec::new();
    let mut x = -100.0f32;
    while x < width + 200.0 {
        let y = GROUND_Y - base_y + (x * 0.002).sin() * 80.0 + (x * 0.005).sin() * 40.0;
        points.push(Vec2::new(x, y));
        x += rand_range(rng, 60.0, 150.0);
    }
    ParallaxLayer {
        speed,
        color: hex(color),
        shape: ParallaxShape::SnowMountains {
            points,
            snow: [1.0; 4],
        },
    }
}

fn factory_skyline(rng: &mut Pcg32, width: f32, color: &str, layer: f32, speed: f32) -> ParallaxLayer {
    let mut rects = Vec::new();
    let mut x = -50.0f32;
    while x < width + 100.0 {
        let w = rand_range(rng, 60.0, 150.0);
        let h = rand_range(rng, 60.0, 140.0 + layer * 40.0);
        rects.push(Rect::new(x, GROUND_Y, w, h));
        x += rand_range(rng, 100.0, 250.0);
    }
    ParallaxLayer {
        speed,
        color: hex(color),
        shape: ParallaxShape::Buildings { rects },
    }
}

/// Build every zone in order
pub fn build_all(rng: &mut Pcg32) -> Vec<Zone> {
    vec![
        spawn_village(rng),
        skill_mountains(rng),
        project_factory(rng),
        experience_bridge(rng),
        contact_tower(rng),
    ]
}

const OLD_COMPILER: &[&str] = &[
    "Welcome, young developer! You've jumped into a portfolio.",
    "Explore this world to discover the story of the coder who built it.",
    "Each zone reveals a part of their journey. Start by reading that signboard!",
    "Use arrow keys to move, UP to jump, and DOWN to crouch.",
    "Head right to reach the Skill Mountains. Good luck!",
];

fn spawn_village(rng: &mut Pcg32) -> Zone {
    let brick = hex("#c4722a");
    let mut platforms = vec![ground(-200.0, 3800.0, "#6b4226", "#4caf50")];
    for (x, y, w) in [
        (250.0, 390.0, 128.0),
        (500.0, 340.0, 96.0),
        (750.0, 380.0, 96.0),
        (1000.0, 420.0, 160.0),
        (1300.0, 360.0, 128.0),
        (1600.0, 320.0, 96.0),
        (1900.0, 400.0, 192.0),
    ] {
        platforms.push(slab(PlatformKind::Brick, x, y, w, 24.0, brick));
    }
    // Staircase up to the portal ledge
    for (x, y, w, h) in [
        (2200.0, 460.0, 64.0, 40.0),
        (2264.0, 420.0, 64.0, 80.0),
        (2328.0, 380.0, 64.0, 120.0),
        (2392.0, 340.0, 200.0, 160.0),
    ] {
        platforms.push(slab(PlatformKind::Block, x, y, w, h, brick));
    }

    let mut decorations = vec![Decoration::new(
        -200.0,
        GROUND_Y + 80.0,
        DecorationKind::Underground {
            w: 3800.0,
            h: 200.0,
            color: hex("#4a2c12"),
        },
    )];
    for (x, w, h, roof, wall, door, chimney) in [
        (80.0, 120.0, 100.0, "#c0392b", "#f5e6ca", "#8b4513", true),
        (350.0, 80.0, 70.0, "#2980b9", "#ffeaa7", "#6d4c41", false),
        (900.0, 140.0, 110.0, "#27ae60", "#fff3e0", "#5d4037", true),
        (1500.0, 100.0, 85.0, "#e67e22", "#fce4ec", "#795548", true),
        (2000.0, 70.0, 60.0, "#8e44ad", "#e8f5e9", "#6d4c41", false),
    ] {
        decorations.push(Decoration::new(
            x,
            GROUND_Y,
            DecorationKind::House {
                w,
                h,
                roof: hex(roof),
                wall: hex(wall),
                door: hex(door),
                chimney,
            },
        ));
    }
    for x in [
        -50.0, 220.0, 480.0, 650.0, 820.0, 1100.0, 1350.0, 1680.0, 1850.0, 2150.0, 2600.0, 2900.0,
        3200.0,
    ] {
        let size = rand_range(rng, 50.0, 90.0);
        let leaf = hsl(randi(rng, 100, 140), randi(rng, 55, 75), randi(rng, 35, 50));
        decorations.push(Decoration::new(
            x,
            GROUND_Y,
            DecorationKind::Tree {
                size,
                trunk: hex("#795548"),
                leaf,
            },
        ));
    }
    for _ in 0..15 {
        let x = rand_range(rng, -100.0, 3500.0);
        let size = rand_range(rng, 15.0, 35.0);
        let color = hsl(randi(rng, 110, 140), randi(rng, 50, 70), randi(rng, 30, 45));
        decorations.push(Decoration::new(x, GROUND_Y, DecorationKind::Bush { size, color }));
    }
    decorations.extend(flowers(
        rng,
        20,
        3500.0,
        &["#e74c3c", "#f1c40f", "#e91e63", "#ff9800", "#9c27b0", "#ffffff"],
        (4.0, 8.0),
    ));
    decorations.extend(clouds(rng, 10, (-200.0, 3800.0), (40.0, 180.0), (40.0, 100.0), (0.15, 0.4)));
    for i in 0..6 {
        decorations.push(Decoration::new(580.0 + i as f32 * 60.0, GROUND_Y, DecorationKind::Fence));
    }
    for (x, height) in [(700.0, 50.0), (1800.0, 70.0)] {
        decorations.push(Decoration::new(
            x,
            GROUND_Y,
            DecorationKind::Pipe {
                height,
                color: hex("#43a047"),
            },
        ));
    }
    decorations.push(Decoration::new(150.0, 80.0, DecorationKind::Sun { size: 50.0 }));
    for _ in 0..4 {
        let x = rand_range(rng, 200.0, 3000.0);
        let y = rand_range(rng, 50.0, 200.0);
        let speed = rand_range(rng, 0.5, 1.5);
        let offset = rand_range(rng, 0.0, std::f32::consts::TAU);
        decorations.push(Decoration::new(x, y, DecorationKind::Bird { speed, offset }));
    }
    for (i, symbol) in ["</", "{", "()", "=>", "[]"].into_iter().enumerate() {
        let y = rand_range(rng, 320.0, 420.0);
        let float_offset = rand_range(rng, 0.0, std::f32::consts::TAU);
        decorations.push(Decoration::new(
            400.0 + i as f32 * 250.0,
            y,
            DecorationKind::CodeFragment {
                symbol,
                float_offset,
            },
        ));
    }

    Zone {
        platforms,
        decorations,
        interactables: vec![sign(
            160.0,
            GROUND_Y - 50.0,
            "📋",
            PanelKind::About,
            "Read the welcome sign",
        )],
        obstacles: Vec::new(),
        npcs: vec![npc(600.0, "Old Compiler", "🧙", OLD_COMPILER)],
        portals: vec![portal(2500.0, 280.0, 1)],
        parallax: vec![
            rolling_hills(3800.0, "#66bb6a", 280.0, 0.002, 0.08),
            rolling_hills(3800.0, "#81c784", 230.0, 0.004, 0.15),
            rolling_hills(3800.0, "#a5d6a7", 180.0, 0.006, 0.25),
        ],
        sky: Sky {
            top: hex("#4fc3f7"),
            bottom: hex("#81d4fa"),
        },
        width: 3800.0,
        spawn: PLAYER_SPAWN,
    }
}

const BYTE_SAGE: &[&str] = &[
    "These mountains represent the skills you've mastered.",
    "Each pillar grows taller with experience.",
    "Climb to the peaks to see detailed skill breakdowns!",
    "Watch out for the spike traps — bugs in the code!",
];

fn skill_mountains(rng: &mut Pcg32) -> Zone {
    let mut platforms: Vec<Platform> = [(-100.0, 500.0), (600.0, 300.0), (1050.0, 400.0), (1600.0, 600.0), (2400.0, 800.0)]
        .into_iter()
        .map(|(x, w)| ground(x, w, "#6b4226", "#4caf50"))
        .collect();
    let step = hex("#8d6e63");
    for (x, y, w) in [
        (450.0, 440.0, 80.0),
        (560.0, 380.0, 80.0),
        (680.0, 320.0, 80.0),
        (820.0, 260.0, 100.0),
        (980.0, 200.0, 120.0),
        (1100.0, 260.0, 80.0),
        (1200.0, 330.0, 80.0),
        (1350.0, 400.0, 100.0),
        (1650.0, 420.0, 80.0),
        (1780.0, 360.0, 80.0),
        (1920.0, 300.0, 100.0),
        (2050.0, 240.0, 120.0),
        (2200.0, 300.0, 80.0),
        (2350.0, 380.0, 80.0),
    ] {
        platforms.push(slab(PlatformKind::Brick, x, y, w, 24.0, step));
    }
    // Lookout ledges under the skill signboards
    let lookout = hex("#a1887f");
    platforms.push(slab(PlatformKind::Brick, 930.0, 180.0, 200.0, 24.0, lookout));
    platforms.push(slab(PlatformKind::Brick, 2000.0, 220.0, 200.0, 24.0, lookout));

    let mut decorations = Vec::new();
    for (i, label) in ["HTML", "CSS", "JS", "React", "Node", "Python", "Git", "SQL"]
        .into_iter()
        .enumerate()
    {
        let i = i as f32;
        decorations.push(Decoration::new(
            200.0 + i * 350.0,
            GROUND_Y,
            DecorationKind::SkillPillar {
                label,
                height: 40.0 + i * 15.0,
                color: hsl(i * 45.0, 70.0, 55.0),
            },
        ));
    }
    decorations.extend(clouds(rng, 8, (-200.0, 3500.0), (30.0, 140.0), (50.0, 100.0), (0.2, 0.5)));
    decorations.extend(flowers(rng, 12, 3200.0, &["#e74c3c", "#f39c12", "#9b59b6", "#3498db"], (4.0, 7.0)));
    decorations.push(Decoration::new(
        400.0,
        GROUND_Y,
        DecorationKind::Pipe {
            height: 50.0,
            color: hex("#43a047"),
        },
    ));
    decorations.push(Decoration::new(200.0, 70.0, DecorationKind::Sun { size: 45.0 }));

    let obstacles = vec![
        Obstacle::spikes(520.0, GROUND_Y - 12.0, 60.0, 12.0),
        Obstacle::spikes(960.0, GROUND_Y - 12.0, 70.0, 12.0),
        Obstacle::spikes(1480.0, GROUND_Y - 12.0, 80.0, 12.0),
        Obstacle::moving_platform(Rect::new(1480.0, 440.0, 80.0, 24.0), Axis::Y, 120.0, 1.5),
    ];

    let parallax = vec![
        snow_mountains(rng, 3200.0, "#90a4ae", 300.0, 0.06),
        snow_mountains(rng, 3200.0, "#b0bec5", 240.0, 0.12),
        rolling_hills(3200.0, "#a5d6a7", 160.0, 0.005, 0.2),
    ];

    Zone {
        platforms,
        decorations,
        interactables: vec![
            sign(980.0, 130.0, "🎨", PanelKind::SkillsFrontend, "View Frontend Skills"),
            sign(2050.0, 170.0, "⚙️", PanelKind::SkillsBackend, "View Backend Skills"),
        ],
        obstacles,
        npcs: vec![npc(300.0, "Byte Sage", "🧑‍💻", BYTE_SAGE)],
        portals: vec![portal(2900.0, 440.0, 2)],
        parallax,
        sky: Sky {
            top: hex("#64b5f6"),
            bottom: hex("#90caf9"),
        },
        width: 3200.0,
        spawn: PLAYER_SPAWN,
    }
}

const FACTORY_BOT: &[&str] = &[
    "Welcome to the Project Factory!",
    "Each machine here represents a project I've built.",
    "Interact with the displays to see the details.",
    "Watch out for the lasers — they're security systems!",
];

fn project_factory(rng: &mut Pcg32) -> Zone {
    let metal = hex("#90a4ae");
    let mut platforms = vec![ground(-100.0, 4000.0, "#8d6e63", "#a1887f")];
    for (x, y, w) in [
        (200.0, 400.0, 300.0),
        (600.0, 380.0, 200.0),
        (900.0, 350.0, 250.0),
        (1300.0, 400.0, 200.0),
        (1600.0, 360.0, 300.0),
        (2000.0, 320.0, 250.0),
        (2400.0, 380.0, 200.0),
        (2700.0, 340.0, 300.0),
        (3100.0, 400.0, 200.0),
    ] {
        platforms.push(slab(PlatformKind::Metal, x, y, w, 24.0, metal));
    }

    let mut decorations = vec![Decoration::new(
        -100.0,
        GROUND_Y + 80.0,
        DecorationKind::Underground {
            w: 4000.0,
            h: 200.0,
            color: hex("#5d4037"),
        },
    )];
    for (x, w, h, color, roof) in [
        (100.0, 160.0, 140.0, "#8d6e63", "#6d4c41"),
        (800.0, 200.0, 180.0, "#795548", "#5d4037"),
        (1800.0, 180.0, 150.0, "#a1887f", "#6d4c41"),
        (2800.0, 150.0, 130.0, "#8d6e63", "#5d4037"),
    ] {
        decorations.push(Decoration::new(
            x,
            GROUND_Y,
            DecorationKind::FactoryBuilding {
                w,
                h,
                color: hex(color),
                roof: hex(roof),
            },
        ));
    }
    for i in 0..6u8 {
        let size = rand_range(rng, 60.0, 100.0);
        decorations.push(Decoration::new(
            150.0 + i as f32 * 550.0,
            GROUND_Y,
            DecorationKind::Machine { variant: i % 3, size },
        ));
    }
    for i in 0..4 {
        decorations.push(Decoration::new(
            300.0 + i as f32 * 800.0,
            GROUND_Y - 2.0,
            DecorationKind::Conveyor { width: 200.0 },
        ));
    }
    for _ in 0..8 {
        let x = rand_range(rng, 0.0, 3500.0);
        let y = rand_range(rng, 200.0, 480.0);
        let size = rand_range(rng, 20.0, 50.0);
        let speed = rand_range(rng, 0.5, 2.0);
        let color = hsl(30.0 + randi(rng, 0, 20), 50.0, randi(rng, 45, 65));
        decorations.push(Decoration::new(x, y, DecorationKind::Gear { size, speed, color }));
    }
    for i in 0..5 {
        decorations.push(Decoration::new(
            100.0 + i as f32 * 700.0,
            GROUND_Y - 180.0,
            DecorationKind::Smokestack { height: 180.0 },
        ));
    }
    decorations.extend(clouds(rng, 6, (0.0, 3800.0), (30.0, 120.0), (50.0, 90.0), (0.15, 0.4)));
    decorations.push(Decoration::new(300.0, 70.0, DecorationKind::Sun { size: 45.0 }));

    let parallax = vec![
        factory_skyline(rng, 3600.0, "#d7ccc8", 0.0, 0.08),
        factory_skyline(rng, 3600.0, "#efebe9", 1.0, 0.15),
    ];

    Zone {
        platforms,
        decorations,
        interactables: vec![
            sign(300.0, 350.0, "🖥️", PanelKind::Project1, "View Project: Portfolio Hacker"),
            sign(950.0, 300.0, "📱", PanelKind::Project2, "View Project: Code Quest Game"),
            sign(1700.0, 310.0, "🌲", PanelKind::Project3, "View Project: Forest Portfolio"),
            sign(2800.0, 290.0, "🚀", PanelKind::Project4, "View More Projects"),
        ],
        obstacles: vec![
            Obstacle::laser(550.0, 400.0, 8.0, 100.0, 2.0),
            Obstacle::laser(1200.0, 350.0, 8.0, 150.0, 3.0),
            Obstacle::laser(2350.0, 380.0, 8.0, 120.0, 1.5),
        ],
        npcs: vec![npc(100.0, "Factory Bot", "🤖", FACTORY_BOT)],
        portals: vec![portal(3400.0, 440.0, 3)],
        parallax,
        sky: Sky {
            top: hex("#ff8a65"),
            bottom: hex("#ffcc80"),
        },
        width: 3600.0,
        spawn: PLAYER_SPAWN,
    }
}

const TIME_KEEPER: &[&str] = &[
    "This bridge spans the timeline of my career.",
    "Each post marks a milestone in the journey.",
    "Be careful — the winds of change blow strong here!",
    "Some platforms crumble under pressure. Don't stand too long!",
    "The experience archive awaits at the other end.",
];

fn experience_bridge(rng: &mut Pcg32) -> Zone {
    let plank = hex("#8d6e63");
    let mut platforms = vec![ground(-100.0, 400.0, "#6b4226", "#4caf50")];
    // Planks sag along a gentle sine over the river
    for i in 0..20 {
        let x = 400.0 + i as f32 * 150.0;
        let y = 480.0 - (i as f32 * 0.3).sin() * 30.0;
        platforms.push(slab(PlatformKind::BridgePlank, x, y, 120.0, 24.0, plank));
    }
    platforms.push(ground(3400.0, 500.0, "#6b4226", "#4caf50"));
    platforms.push(slab(PlatformKind::Brick, 3500.0, 380.0, 300.0, 24.0, hex("#a1887f")));

    let mut decorations = vec![Decoration::new(350.0, 530.0, DecorationKind::River { w: 3100.0, h: 100.0 })];
    for (i, (year, title)) in [
        ("2020", "Started Coding"),
        ("2021", "First Website"),
        ("2022", "Learned React"),
        ("2023", "Full Stack Dev"),
        ("2024", "Open Source"),
        ("2025", "Current Year"),
    ]
    .into_iter()
    .enumerate()
    {
        let i = i as f32;
        decorations.push(Decoration::new(
            550.0 + i * 480.0,
            380.0,
            DecorationKind::TimelinePost {
                year,
                title,
                color: hsl(30.0 + i * 30.0, 70.0, 55.0),
            },
        ));
    }
    for x in [350.0, 1700.0, 3400.0] {
        decorations.push(Decoration::new(x, 200.0, DecorationKind::BridgeTower { height: 300.0 }));
    }
    decorations.extend(clouds(rng, 7, (-200.0, 4200.0), (30.0, 150.0), (50.0, 100.0), (0.2, 0.5)));
    decorations.push(Decoration::new(350.0, 80.0, DecorationKind::Sun { size: 55.0 }));

    let mut obstacles = vec![
        Obstacle::wind(800.0, 300.0, 200.0, 200.0, -2.0),
        Obstacle::wind(1600.0, 300.0, 200.0, 200.0, 3.0),
        Obstacle::wind(2400.0, 300.0, 200.0, 200.0, -3.0),
    ];
    for i in 0..5 {
        obstacles.push(Obstacle::falling_platform(700.0 + i as f32 * 500.0, 450.0, 80.0, 24.0, 0.5));
    }

    Zone {
        platforms,
        decorations,
        interactables: vec![sign(
            3550.0,
            330.0,
            "📜",
            PanelKind::Experience,
            "View Experience Timeline",
        )],
        obstacles,
        npcs: vec![npc(200.0, "Time Keeper", "⏰", TIME_KEEPER)],
        portals: vec![portal(3700.0, 440.0, 4)],
        parallax: vec![
            rolling_hills(4000.0, "#c8e6c9", 260.0, 0.002, 0.05),
            rolling_hills(4000.0, "#a5d6a7", 200.0, 0.004, 0.12),
        ],
        sky: Sky {
            top: hex("#ffb74d"),
            bottom: hex("#ffe0b2"),
        },
        width: 4000.0,
        spawn: PLAYER_SPAWN,
    }
}

const SIGNAL_MASTER: &[&str] = &[
    "You've made it to the Contact Tower!",
    "Climb to the top to find all the ways to reach me.",
    "This is the final zone — you've explored my entire portfolio!",
    "Thank you for playing Code Quest!",
    "Feel free to restart and explore more. Every journey has new details.",
];

fn contact_tower(rng: &mut Pcg32) -> Zone {
    let tower_x = 800.0;
    let base = GROUND_Y;

    let mut platforms = vec![ground(-100.0, 2500.0, "#6b4226", "#4caf50")];
    for (x, y, w, color) in [
        (200.0, 420.0, 150.0, "#a1887f"),
        (400.0, 360.0, 130.0, "#a1887f"),
        (580.0, 310.0, 140.0, "#bcaaa4"),
    ] {
        platforms.push(slab(PlatformKind::Brick, x, y, w, 24.0, hex(color)));
    }
    // Zigzag climb to the summit
    let climb = [
        (-100.0, 60.0, 140.0),
        (60.0, 110.0, 130.0),
        (-80.0, 160.0, 130.0),
        (70.0, 210.0, 120.0),
        (-70.0, 260.0, 120.0),
        (60.0, 310.0, 110.0),
        (-60.0, 360.0, 110.0),
        (50.0, 410.0, 100.0),
        (-50.0, 460.0, 100.0),
        (40.0, 510.0, 100.0),
        (-40.0, 560.0, 100.0),
        (0.0, 620.0, 160.0),
    ];
    for (i, (dx, rise, w)) in climb.into_iter().enumerate() {
        let i = i as f32;
        let color = hsl(40.0 + i * 8.0, 55.0, 52.0 + i * 2.0);
        platforms.push(slab(PlatformKind::Brick, tower_x + dx, base - rise, w, 24.0, color));
    }

    let mut decorations = vec![
        Decoration::new(
            -100.0,
            GROUND_Y + 80.0,
            DecorationKind::Underground {
                w: 2500.0,
                h: 200.0,
                color: hex("#4a2c12"),
            },
        ),
        Decoration::new(tower_x - 20.0, base - 600.0, DecorationKind::TowerTop),
        Decoration::new(tower_x - 30.0, base - 200.0, DecorationKind::TowerBody { height: 200.0 }),
        Decoration::new(tower_x + 50.0, base - 620.0, DecorationKind::SignalDish),
        Decoration::new(tower_x - 90.0, base - 580.0, DecorationKind::SignalDish),
    ];
    for i in 0..6 {
        let i = i as f32;
        decorations.push(Decoration::new(
            tower_x,
            base - 650.0,
            DecorationKind::SignalWave {
                radius: 50.0 + i * 40.0,
                offset: i * 0.5,
            },
        ));
    }
    for x in [-50.0, 100.0, 300.0, 500.0, 1200.0, 1500.0, 1800.0, 2100.0] {
        let size = rand_range(rng, 40.0, 70.0);
        let leaf = hsl(randi(rng, 100, 140), 60.0, randi(rng, 35, 50));
        decorations.push(Decoration::new(
            x,
            GROUND_Y,
            DecorationKind::Tree {
                size,
                trunk: hex("#795548"),
                leaf,
            },
        ));
    }
    for _ in 0..8 {
        let x = rand_range(rng, 0.0, 2500.0);
        let size = rand_range(rng, 15.0, 30.0);
        let color = hsl(randi(rng, 110, 140), 60.0, 40.0);
        decorations.push(Decoration::new(x, GROUND_Y, DecorationKind::Bush { size, color }));
    }
    decorations.extend(flowers(rng, 10, 2500.0, &["#f44336", "#ffeb3b", "#e91e63", "#ff9800"], (4.0, 7.0)));
    decorations.extend(clouds(rng, 6, (-200.0, 2800.0), (30.0, 120.0), (40.0, 90.0), (0.2, 0.5)));
    decorations.push(Decoration::new(180.0, 60.0, DecorationKind::Sun { size: 50.0 }));
    for _ in 0..20 {
        let x = tower_x + rand_range(rng, -200.0, 200.0);
        let y = base - 500.0 + rand_range(rng, -200.0, 200.0);
        let size = rand_range(rng, 2.0, 5.0);
        let offset = rand_range(rng, 0.0, std::f32::consts::TAU);
        decorations.push(Decoration::new(x, y, DecorationKind::Sparkle { size, offset }));
    }

    Zone {
        platforms,
        decorations,
        interactables: vec![
            sign(tower_x - 30.0, base - 700.0, "📡", PanelKind::Contact, "View Contact Information"),
            sign(200.0, 370.0, "🏆", PanelKind::Achievements, "View Achievements"),
        ],
        obstacles: Vec::new(),
        npcs: vec![npc(400.0, "Signal Master", "📡", SIGNAL_MASTER)],
        portals: Vec::new(),
        parallax: vec![
            rolling_hills(2500.0, "#66bb6a", 280.0, 0.003, 0.08),
            rolling_hills(2500.0, "#81c784", 200.0, 0.005, 0.18),
        ],
        sky: Sky {
            top: hex("#42a5f5"),
            bottom: hex("#90caf9"),
        },
        width: 2500.0,
        spawn: PLAYER_SPAWN,
    }
}
