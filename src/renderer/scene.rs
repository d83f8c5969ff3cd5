//! Frame composition: turns a `GameState` into one triangle list
//!
//! Everything is emitted in viewport pixels (y down) with the camera already
//! applied. Drawing order is back to front: sky, parallax, decorations,
//! platforms, obstacles, signboards, NPCs, portals, ambient motes, the
//! player, particles and finally the zone transition overlay.
//!
//! The scene only reads the state. Animated scenery is a pure function of
//! the simulation clock, so a paused game renders a still frame.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::shapes::{arc, circle, fill_to_baseline, gradient_rect, line, rect, ring, triangle};
use super::vertex::{Vertex, colors};
use crate::sim::world::{Axis, Decoration, DecorationKind, ObstacleKind, ParallaxShape, PlatformKind};
use crate::sim::{AnimState, GameState, Player};
use crate::{Color, with_alpha};

const fn rgb(r: u8, g: u8, b: u8, a: f32) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

const HORIZON: Color = rgb(0xe8, 0xf5, 0xe9, 1.0);
const HIGHLIGHT: Color = [1.0, 1.0, 1.0, 0.2];
const DIRT_SPECK: Color = [0.0, 0.0, 0.0, 0.08];
const GRASS: Color = rgb(0x4c, 0xaf, 0x50, 1.0);
const FLOWER_CENTER: Color = rgb(0xff, 0xeb, 0x3b, 1.0);
const SUN_RAY: Color = rgb(0xff, 0xc1, 0x07, 1.0);
const SUN_FACE: Color = rgb(0xf5, 0x7f, 0x17, 1.0);
const DOOR_KNOB: Color = rgb(0xff, 0xd5, 0x4f, 1.0);
const NAIL: Color = rgb(0x5d, 0x40, 0x37, 1.0);
const MOVING_PLATFORM: Color = rgb(0x78, 0x90, 0x9c, 1.0);
const FALLING_PLATFORM: Color = rgb(0xa1, 0x88, 0x7f, 1.0);
const FALLING_WARN: Color = rgb(0xf4, 0x43, 0x36, 0.5);
const NPC_SKIN: Color = rgb(0xff, 0xe0, 0xb2, 1.0);
const PORTAL_GLOW: Color = rgb(0x4c, 0xaf, 0x50, 0.25);
const PUPIL: Color = rgb(0x0a, 0x0a, 0x1a, 1.0);
const TRAIL_ALPHA: f32 = 0.3;
const AMBIENT_ALPHA: f32 = 0.6;

// Stickman proportions
const HEAD_RADIUS: f32 = 8.0;
const BODY_LENGTH: f32 = 20.0;
const ARM_LENGTH: f32 = 16.0;
const LEG_LENGTH: f32 = 18.0;
const LINE_WIDTH: f32 = 3.0;
const CROUCH_OFFSET: f32 = 12.0;

/// Reusable frame builder
#[derive(Default)]
pub struct Scene {
    vertices: Vec<Vertex>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the frame for `state`
    pub fn build(&mut self, state: &GameState) -> &[Vertex] {
        self.vertices.clear();
        let mut frame = Frame {
            out: &mut self.vertices,
            cam: state.camera.pos,
            view: state.camera.viewport,
            time: state.time,
        };

        let zone = state.world.zone();
        frame.sky(zone.sky.top, zone.sky.bottom);
        for layer in &zone.parallax {
            frame.parallax(&layer.shape, layer.color, layer.speed);
        }
        for deco in &zone.decorations {
            frame.decoration(deco);
        }
        for platform in &zone.platforms {
            frame.platform(platform.kind, platform.rect.x, platform.rect.y, platform.rect.w, platform.rect.h, platform.color, platform.top_color);
        }
        for (i, obstacle) in zone.obstacles.iter().enumerate() {
            frame.obstacle(i, obstacle.rect.x, obstacle.rect.y, obstacle.rect.w, obstacle.rect.h, &obstacle.kind);
        }
        for sign in &zone.interactables {
            frame.signboard(sign.rect.center().x, sign.rect.y);
        }
        for npc in &zone.npcs {
            frame.npc(npc.rect.center().x, npc.rect.y);
        }
        for portal in &zone.portals {
            frame.portal(portal.rect.center());
        }
        for mote in &state.world.ambient {
            let alpha = (mote.life / mote.max_life) * AMBIENT_ALPHA;
            circle(frame.out, mote.pos - frame.cam, mote.size, with_alpha(mote.color, alpha), 8);
        }

        frame.player(&state.player, state.interactions.player_tint());

        for p in state.particles.iter() {
            let fade = p.fade();
            circle(frame.out, p.pos - frame.cam, p.size * fade, with_alpha(p.color, fade), 8);
        }

        if let Some(transition) = &state.transition {
            let alpha = transition.overlay_alpha();
            if alpha > 0.0 {
                rect(frame.out, 0.0, 0.0, frame.view.x, frame.view.y, with_alpha(colors::BLACK, alpha));
            }
        }

        &self.vertices
    }
}

/// Per-frame drawing context
struct Frame<'a> {
    out: &'a mut Vec<Vertex>,
    cam: Vec2,
    view: Vec2,
    time: f32,
}

impl Frame<'_> {
    /// World to screen
    fn sp(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x - self.cam.x, y - self.cam.y)
    }

    fn sky(&mut self, top: Color, bottom: Color) {
        let (w, h) = (self.view.x, self.view.y);
        gradient_rect(self.out, 0.0, 0.0, w, h * 0.7, top, bottom);
        gradient_rect(self.out, 0.0, h * 0.7, w, h * 0.3, bottom, HORIZON);
    }

    fn parallax(&mut self, shape: &ParallaxShape, color: Color, speed: f32) {
        let offset = self.cam.x * speed;
        let (w, h) = (self.view.x, self.view.y);
        match shape {
            ParallaxShape::Hills { points } => {
                let outline = self.skyline(points, offset, w, h);
                fill_to_baseline(self.out, &outline, h, color);
            }
            ParallaxShape::SnowMountains { points, snow } => {
                let outline = self.skyline(points, offset, w, h);
                fill_to_baseline(self.out, &outline, h, color);
                let cap = with_alpha(*snow, 0.6);
                for pair in points.windows(2) {
                    let a = Vec2::new(pair[0].x - offset, pair[0].y);
                    let b = Vec2::new(pair[1].x - offset, pair[1].y);
                    let drop = Vec2::new(0.0, 20.0);
                    triangle(self.out, a, b, a + drop, cap);
                    triangle(self.out, b, b + drop, a + drop, cap);
                }
            }
            ParallaxShape::Buildings { rects } => {
                let window = with_alpha(colors::WINDOW, 0.5);
                for b in rects {
                    let sx = b.x - offset;
                    if sx > w || sx + b.w < 0.0 {
                        continue;
                    }
                    rect(self.out, sx, b.y - b.h, b.w, b.h, color);
                    let mut wy = b.y - b.h + 12.0;
                    while wy < b.y - 12.0 {
                        let mut wx = sx + 10.0;
                        while wx < sx + b.w - 10.0 {
                            rect(self.out, wx, wy, 8.0, 10.0, window);
                            wx += 18.0;
                        }
                        wy += 22.0;
                    }
                }
            }
        }
    }

    /// Scrolled outline closed down to the bottom edge on both sides
    fn skyline(&self, points: &[Vec2], offset: f32, w: f32, h: f32) -> Vec<Vec2> {
        let mut outline = Vec::with_capacity(points.len() + 2);
        outline.push(Vec2::new(-50.0, h));
        outline.extend(points.iter().map(|p| Vec2::new(p.x - offset, p.y)));
        outline.push(Vec2::new(w + 50.0, h));
        outline
    }

    fn decoration(&mut self, deco: &Decoration) {
        let s = self.sp(deco.pos.x, deco.pos.y);
        let (x, y) = (s.x, s.y);
        // Skip anything far off screen; the widest pieces are about 600 px
        let on_screen = x > -700.0 && x < self.view.x + 700.0;
        if !on_screen && !matches!(deco.kind, DecorationKind::Sun { .. }) {
            return;
        }
        let t = self.time;
        match &deco.kind {
            DecorationKind::Tree { size, trunk, leaf } => self.tree(x, y, *size, *trunk, *leaf),
            DecorationKind::Bush { size, color } => {
                let r = *size;
                circle(self.out, Vec2::new(x, y - r * 0.4), r * 0.6, *color, 14);
                circle(self.out, Vec2::new(x - r * 0.5, y - r * 0.2), r * 0.45, *color, 12);
                circle(self.out, Vec2::new(x + r * 0.5, y - r * 0.2), r * 0.45, *color, 12);
                circle(self.out, Vec2::new(x, y - r * 0.55), r * 0.25, [1.0, 1.0, 1.0, 0.15], 10);
            }
            DecorationKind::Flower { size, color } => {
                let head = Vec2::new(x, y - size * 2.5);
                line(self.out, Vec2::new(x, y), head, 2.0, GRASS);
                for i in 0..5 {
                    let a = (i as f32 / 5.0) * TAU + t * 0.5;
                    circle(self.out, head + Vec2::new(a.cos(), a.sin()) * *size, size * 0.5, *color, 8);
                }
                circle(self.out, head, size * 0.4, FLOWER_CENTER, 8);
            }
            DecorationKind::Cloud { size, speed } => {
                self.cloud(x + (t * speed).sin() * 20.0, y, *size);
            }
            DecorationKind::Sun { size } => {
                // Pinned to the viewport horizontally
                self.sun(deco.pos.x, y, *size);
            }
            DecorationKind::Bird { speed, offset } => {
                let flap = (t * 6.0 * speed + offset).sin() * 8.0;
                let drift = (t * speed + offset).sin() * 30.0;
                let b = Vec2::new(x + drift, y + (t * 0.5 + offset).sin() * 5.0);
                let tip = Vec2::new(0.0, -flap.abs() * 0.5);
                line(self.out, b + Vec2::new(-8.0, flap * 0.5), b + Vec2::new(-4.0, 0.0) + tip, 2.0, colors::BIRD);
                line(self.out, b + Vec2::new(-4.0, 0.0) + tip, b, 2.0, colors::BIRD);
                line(self.out, b, b + Vec2::new(4.0, 0.0) + tip, 2.0, colors::BIRD);
                line(self.out, b + Vec2::new(4.0, 0.0) + tip, b + Vec2::new(8.0, flap * 0.5), 2.0, colors::BIRD);
            }
            DecorationKind::House {
                w,
                h,
                roof,
                wall,
                door,
                chimney,
            } => self.house(x, y, *w, *h, *roof, *wall, *door, *chimney),
            DecorationKind::Fence => {
                let c = colors::FENCE;
                rect(self.out, x, y - 30.0, 5.0, 30.0, c);
                rect(self.out, x + 20.0, y - 30.0, 5.0, 30.0, c);
                rect(self.out, x - 2.0, y - 25.0, 29.0, 4.0, c);
                rect(self.out, x - 2.0, y - 15.0, 29.0, 4.0, c);
                for px in [x, x + 20.0] {
                    triangle(self.out, Vec2::new(px, y - 30.0), Vec2::new(px + 2.5, y - 36.0), Vec2::new(px + 5.0, y - 30.0), c);
                }
            }
            DecorationKind::Pipe { height, color } => {
                let w = 40.0;
                rect(self.out, x, y - height, w, *height, *color);
                rect(self.out, x - 5.0, y - height - 10.0, w + 10.0, 14.0, *color);
                rect(self.out, x + 5.0, y - height, 8.0, *height, HIGHLIGHT);
                rect(self.out, x + w - 10.0, y - height, 10.0, *height, colors::SHADOW);
                rect(self.out, x - 5.0, y - height - 10.0, w + 10.0, 2.0, colors::PIPE_RIM);
            }
            DecorationKind::Underground { w, h, color } => {
                rect(self.out, x, y, *w, *h, *color);
                // Fixed speckle pattern
                let mut dy = 0.0;
                while dy < *h {
                    let mut dx = 0.0;
                    while dx < *w {
                        if ((dx * 0.37 + dy * 0.11).sin() * 43758.5).fract().abs() > 0.5 {
                            circle(self.out, Vec2::new(x + dx + 10.0, y + dy + 10.0), 3.0, [0.0, 0.0, 0.0, 0.1], 6);
                        }
                        dx += 25.0;
                    }
                    dy += 20.0;
                }
            }
            DecorationKind::River { w, h } => {
                rect(self.out, x, y, *w, *h, colors::RIVER);
                let mut wx = 0.0;
                while wx < *w {
                    let wy = (t * 2.0 + wx * 0.05).sin() * 3.0;
                    rect(self.out, x + wx, y + 5.0 + wy, 25.0, 3.0, colors::RIVER_FOAM);
                    wx += 40.0;
                }
                rect(self.out, x, y + h - 15.0, *w, 15.0, colors::SHADOW);
            }
            DecorationKind::CodeFragment { float_offset, .. } => {
                // Glyphs are drawn by the DOM layer; here only the glow
                let fy = y + (t * 2.0 + float_offset).sin() * 8.0;
                let alpha = 0.6 + (t * 3.0 + float_offset).sin() * 0.2;
                circle(self.out, Vec2::new(x, fy - 6.0), 10.0, with_alpha(colors::CODE_GLOW, alpha * 0.4), 12);
                rect(self.out, x - 6.0, fy - 8.0, 12.0, 3.0, with_alpha(colors::CODE_GLOW, alpha));
            }
            DecorationKind::SkillPillar { height, color, .. } => {
                rect(self.out, x - 18.0, y - height, 36.0, *height, with_alpha(*color, 0.7));
                rect(self.out, x - 22.0, y - height - 4.0, 44.0, 8.0, *color);
                rect(self.out, x - 14.0, y - height, 10.0, *height, [1.0, 1.0, 1.0, 0.3]);
            }
            DecorationKind::Machine { variant, size } => {
                let (h, w) = (*size, size * 0.8);
                rect(self.out, x - w / 2.0, y - h, w, h, colors::MACHINE);
                rect(self.out, x - w / 2.0 + 8.0, y - h + 10.0, w - 16.0, h * 0.3, with_alpha(colors::MACHINE_LIGHT, 0.3));
                for i in 0..3 {
                    let on = (t * (2.0 + *variant as f32) + i as f32).sin() > 0.0;
                    let c = if on { colors::MACHINE_LIGHT } else { colors::CONVEYOR };
                    circle(self.out, Vec2::new(x - w / 2.0 + 15.0 + i as f32 * 14.0, y - h * 0.5), 4.0, c, 8);
                }
            }
            DecorationKind::Conveyor { width } => {
                rect(self.out, x, y - 4.0, *width, 8.0, MOVING_PLATFORM);
                let offset = (t * 40.0) % 20.0;
                let mut i = 0.0;
                while i < *width {
                    let a = Vec2::new(x + i + offset, y - 4.0);
                    line(self.out, a, a + Vec2::new(10.0, 8.0), 1.0, colors::CONVEYOR);
                    i += 20.0;
                }
            }
            DecorationKind::Gear { size, speed, color } => self.gear(Vec2::new(x, y), *size, t * speed, *color),
            DecorationKind::Smokestack { height } => {
                rect(self.out, x - 10.0, y, 20.0, *height, colors::SMOKESTACK);
                rect(self.out, x - 14.0, y - 4.0, 28.0, 8.0, MOVING_PLATFORM);
                for i in 0..4 {
                    let fi = i as f32;
                    let py = y - fi * 20.0 - (t * 12.0) % 20.0;
                    let px = x + (t + fi * 2.0).sin() * 8.0;
                    circle(self.out, Vec2::new(px, py), 8.0 + fi * 5.0, with_alpha(colors::SMOKE, 0.25 - fi * 0.05), 12);
                }
            }
            DecorationKind::FactoryBuilding { w, h, color, roof } => {
                rect(self.out, x + 5.0, y - h + 5.0, *w, *h, [0.0, 0.0, 0.0, 0.1]);
                rect(self.out, x, y - h, *w, *h, *color);
                rect(self.out, x - 5.0, y - h - 8.0, w + 10.0, 12.0, *roof);
                let window = with_alpha(colors::WINDOW, 0.6);
                let mut wy = y - h + 15.0;
                while wy < y - 20.0 {
                    let mut wx = x + 15.0;
                    while wx < x + w - 15.0 {
                        rect(self.out, wx, wy, 16.0, 16.0, window);
                        wx += 30.0;
                    }
                    wy += 25.0;
                }
                rect(self.out, x + w / 2.0 - 12.0, y - 35.0, 24.0, 35.0, NAIL);
            }
            DecorationKind::TimelinePost { color, .. } => {
                line(self.out, Vec2::new(x, y + 120.0), Vec2::new(x, y), 3.0, *color);
                triangle(self.out, Vec2::new(x, y), Vec2::new(x + 40.0, y + 10.0), Vec2::new(x, y + 20.0), *color);
            }
            DecorationKind::BridgeTower { height } => {
                rect(self.out, x - 12.0, y, 24.0, *height, colors::POST);
                rect(self.out, x - 22.0, y - 10.0, 44.0, 16.0, colors::SIGN_POST);
                let cable = with_alpha(colors::POST, 0.4);
                for i in -5..=5 {
                    line(self.out, Vec2::new(x, y), Vec2::new(x + i as f32 * 50.0, y + height), 1.5, cable);
                }
            }
            DecorationKind::TowerTop => {
                rect(self.out, x + 8.0, y - 30.0, 4.0, 30.0, DOOR_KNOB);
                let on = (t * 4.0).sin() > 0.0;
                let c = if on { colors::TOWER_LIGHT } else { with_alpha(colors::TOWER_LIGHT, 0.4) };
                circle(self.out, Vec2::new(x + 10.0, y - 35.0), 4.0, c, 10);
            }
            DecorationKind::TowerBody { height } => {
                let c = with_alpha(colors::SIGNAL, 0.4);
                let mut i = 0.0;
                while i < *height {
                    line(self.out, Vec2::new(x, y + i), Vec2::new(x + 60.0, y + i), 2.0, c);
                    line(self.out, Vec2::new(x, y + i), Vec2::new(x + 60.0, y + i + 20.0), 2.0, c);
                    line(self.out, Vec2::new(x + 60.0, y + i), Vec2::new(x, y + i + 20.0), 2.0, c);
                    i += 20.0;
                }
            }
            DecorationKind::SignalDish => {
                let c = Vec2::new(x, y);
                arc(self.out, c, 11.0, 13.0, -0.5, 0.5, with_alpha(colors::SIGNAL, 0.7), 6);
                circle(self.out, c + Vec2::new(10.0, 0.0), 3.0, colors::SIGNAL, 8);
            }
            DecorationKind::SignalWave { radius, offset } => {
                let alpha = 0.15 + (t * 2.0 + offset).sin() * 0.1;
                let r = radius + (t + offset).sin() * 10.0;
                ring(self.out, Vec2::new(x, y), r - 0.75, r + 0.75, with_alpha(colors::SIGNAL, alpha), 32);
            }
            DecorationKind::Sparkle { size, offset } => {
                let alpha = 0.4 + (t * 3.0 + offset).sin() * 0.3;
                let s = size + (t * 2.0 + offset).sin();
                circle(self.out, Vec2::new(x, y), s, with_alpha(colors::SPARKLE, alpha), 8);
            }
        }
    }

    fn tree(&mut self, x: f32, y: f32, size: f32, trunk: Color, leaf: Color) {
        let (tw, th) = (size * 0.2, size * 0.5);
        rect(self.out, x - tw / 2.0, y - th, tw, th, trunk);
        rect(self.out, x - tw / 2.0 + 2.0, y - th, tw * 0.3, th, [1.0, 1.0, 1.0, 0.15]);
        let r = size * 0.35;
        circle(self.out, Vec2::new(x, y - th - r * 0.3), r, leaf, 18);
        circle(self.out, Vec2::new(x - r * 0.6, y - th + r * 0.2), r * 0.8, leaf, 16);
        circle(self.out, Vec2::new(x + r * 0.6, y - th + r * 0.2), r * 0.8, leaf, 16);
        circle(self.out, Vec2::new(x - r * 0.2, y - th - r * 0.5), r * 0.4, HIGHLIGHT, 10);
    }

    fn cloud(&mut self, x: f32, y: f32, size: f32) {
        let r = size * 0.3;
        let c = colors::CLOUD;
        for (dx, dy, k) in [
            (0.0, 0.0, 1.0),
            (-0.8, 0.2, 0.7),
            (0.8, 0.2, 0.75),
            (1.4, 0.1, 0.55),
            (-1.3, 0.15, 0.5),
        ] {
            circle(self.out, Vec2::new(x + r * dx, y + r * dy), r * k, c, 14);
        }
        rect(self.out, x - r * 1.5, y + r * 0.3, r * 3.2, r * 0.4, c);
    }

    fn sun(&mut self, x: f32, y: f32, size: f32) {
        let c = Vec2::new(x, y);
        circle(self.out, c, size * 1.2, colors::SUN_GLOW, 24);
        circle(self.out, c, size * 0.5, colors::SUN, 20);
        for i in 0..12 {
            let a = (i as f32 / 12.0) * TAU + self.time * 0.3;
            let dir = Vec2::new(a.cos(), a.sin());
            let r2 = size * 0.85 + (self.time * 2.0 + i as f32).sin() * 4.0;
            line(self.out, c + dir * size * 0.6, c + dir * r2, 3.0, SUN_RAY);
        }
        circle(self.out, c + Vec2::new(-8.0, -4.0), 3.0, SUN_FACE, 8);
        circle(self.out, c + Vec2::new(8.0, -4.0), 3.0, SUN_FACE, 8);
        arc(self.out, c + Vec2::new(0.0, 2.0), 7.0, 9.0, 0.1, PI - 0.1, SUN_FACE, 8);
    }

    #[allow(clippy::too_many_arguments)]
    fn house(&mut self, x: f32, y: f32, w: f32, h: f32, roof: Color, wall: Color, door: Color, chimney: bool) {
        rect(self.out, x + 5.0, y - h + 25.0, w, h - 20.0, [0.0, 0.0, 0.0, 0.1]);
        rect(self.out, x, y - h + 20.0, w, h - 20.0, wall);
        if chimney {
            rect(self.out, x + w * 0.7, y - h - 10.0, 14.0, 30.0, colors::POST);
            rect(self.out, x + w * 0.7 - 2.0, y - h - 12.0, 18.0, 6.0, colors::CHIMNEY);
            for s in 0..3 {
                let fs = s as f32;
                let sy = y - h - 15.0 - fs * 12.0 - (self.time * 10.0) % 12.0;
                let sx = x + w * 0.7 + 7.0 + (self.time + fs).sin() * 5.0;
                circle(self.out, Vec2::new(sx, sy), 5.0 + fs * 2.0, with_alpha(colors::SMOKE, 0.3 - fs * 0.08), 10);
            }
        }
        triangle(
            self.out,
            Vec2::new(x - 8.0, y - h + 22.0),
            Vec2::new(x + w / 2.0, y - h - 15.0),
            Vec2::new(x + w + 8.0, y - h + 22.0),
            roof,
        );
        let win_w = (w * 0.15).min(18.0);
        let win_h = win_w * 1.2;
        for wx in [x + w * 0.15, x + w * 0.65] {
            rect(self.out, wx, y - h + 35.0, win_w, win_h, colors::WINDOW);
            line(self.out, Vec2::new(wx + win_w / 2.0, y - h + 35.0), Vec2::new(wx + win_w / 2.0, y - h + 35.0 + win_h), 1.5, NAIL);
            line(self.out, Vec2::new(wx, y - h + 35.0 + win_h / 2.0), Vec2::new(wx + win_w, y - h + 35.0 + win_h / 2.0), 1.5, NAIL);
        }
        let door_w = (w * 0.18).min(20.0);
        let door_h = (h * 0.35).min(30.0);
        rect(self.out, x + w / 2.0 - door_w / 2.0, y - door_h, door_w, door_h, door);
        circle(self.out, Vec2::new(x + w / 2.0 + door_w / 4.0, y - door_h / 2.0), 2.0, DOOR_KNOB, 6);
    }

    fn gear(&mut self, center: Vec2, size: f32, rotation: f32, color: Color) {
        let c = with_alpha(color, 0.4);
        let teeth = 8;
        let mut outline = Vec::with_capacity(teeth * 4);
        for i in 0..teeth {
            let a = (i as f32 / teeth as f32) * TAU + rotation;
            for (da, r) in [(0.0, 0.7), (0.15, 1.0), (0.25, 1.0), (0.4, 0.7)] {
                outline.push(center + Vec2::new((a + da).cos(), (a + da).sin()) * size * r);
            }
        }
        for (i, p) in outline.iter().enumerate() {
            line(self.out, *p, outline[(i + 1) % outline.len()], 2.0, c);
        }
        ring(self.out, center, size * 0.2 - 1.0, size * 0.2 + 1.0, c, 12);
    }

    #[allow(clippy::too_many_arguments)]
    fn platform(&mut self, kind: PlatformKind, x: f32, y: f32, w: f32, h: f32, color: Color, top: Option<Color>) {
        let s = self.sp(x, y);
        if s.x > self.view.x || s.x + w < 0.0 {
            return;
        }
        let (x, y) = (s.x, s.y);
        match kind {
            PlatformKind::Ground => {
                let grass = top.unwrap_or(GRASS);
                rect(self.out, x, y, w, 8.0, grass);
                rect(self.out, x, y, w, 3.0, [1.0, 1.0, 1.0, 0.15]);
                rect(self.out, x, y + 8.0, w, h - 8.0, color);
                // Only the visible part gets texture
                let start = (-x / 30.0).floor().max(0.0) * 30.0;
                let end = w.min(self.view.x - x + 30.0);
                let mut dx = start;
                while dx < end {
                    let mut dy = 12.0;
                    while dy < h {
                        circle(self.out, Vec2::new(x + dx + 15.0, y + dy + 5.0), 4.0, DIRT_SPECK, 6);
                        dy += 18.0;
                    }
                    triangle(self.out, Vec2::new(x + dx, y), Vec2::new(x + dx + 3.0, y - 5.0), Vec2::new(x + dx + 6.0, y), grass);
                    triangle(self.out, Vec2::new(x + dx + 12.0, y), Vec2::new(x + dx + 15.0, y - 5.0), Vec2::new(x + dx + 18.0, y), grass);
                    triangle(self.out, Vec2::new(x + dx + 24.0, y), Vec2::new(x + dx + 27.0, y - 5.0), Vec2::new(x + dx + 30.0, y), grass);
                    dx += 30.0;
                }
            }
            PlatformKind::Brick => {
                rect(self.out, x, y, w, h, color);
                let brick_h = h / 2.0;
                for row in 0..2 {
                    let ry = y + row as f32 * brick_h;
                    line(self.out, Vec2::new(x, ry), Vec2::new(x + w, ry), 1.0, colors::BRICK_MORTAR);
                    let mut bx = if row % 2 == 0 { 0.0 } else { 8.0 };
                    while bx < w {
                        line(self.out, Vec2::new(x + bx, ry), Vec2::new(x + bx, ry + brick_h), 1.0, colors::BRICK_MORTAR);
                        bx += 16.0;
                    }
                }
                rect(self.out, x, y, w, 2.0, HIGHLIGHT);
                rect(self.out, x, y + h - 2.0, w, 2.0, colors::SHADOW);
            }
            PlatformKind::Block => {
                rect(self.out, x, y, w, h, color);
                let mut bx = 16.0;
                while bx < w {
                    line(self.out, Vec2::new(x + bx, y), Vec2::new(x + bx, y + h), 1.0, colors::SHADOW);
                    bx += 16.0;
                }
                let mut by = 16.0;
                while by < h {
                    line(self.out, Vec2::new(x, y + by), Vec2::new(x + w, y + by), 1.0, colors::SHADOW);
                    by += 16.0;
                }
                rect(self.out, x, y, w, 3.0, [1.0, 1.0, 1.0, 0.15]);
                rect(self.out, x + w - 3.0, y, 3.0, h, [0.0, 0.0, 0.0, 0.1]);
            }
            PlatformKind::Metal => {
                rect(self.out, x, y, w, h, color);
                let mut rx = x + 8.0;
                while rx < x + w - 4.0 {
                    circle(self.out, Vec2::new(rx, y + h / 2.0), 2.0, colors::METAL_RIVET, 6);
                    rx += 20.0;
                }
                rect(self.out, x, y, w, 3.0, HIGHLIGHT);
            }
            PlatformKind::BridgePlank => {
                rect(self.out, x, y, w, h, color);
                let mut px = x + 10.0;
                while px < x + w {
                    line(self.out, Vec2::new(px, y), Vec2::new(px, y + h), 1.0, [0.0, 0.0, 0.0, 0.1]);
                    px += 14.0;
                }
                rect(self.out, x, y, w, 3.0, [1.0, 1.0, 1.0, 0.15]);
                circle(self.out, Vec2::new(x + 5.0, y + h / 2.0), 1.5, NAIL, 6);
                circle(self.out, Vec2::new(x + w - 5.0, y + h / 2.0), 1.5, NAIL, 6);
            }
        }
    }

    fn obstacle(&mut self, index: usize, x: f32, y: f32, w: f32, h: f32, kind: &ObstacleKind) {
        let s = self.sp(x, y);
        let (x, y) = (s.x, s.y);
        match kind {
            ObstacleKind::Spikes { .. } => {
                let count = (w / 10.0).floor().max(1.0) as usize;
                let step = w / count as f32;
                for i in 0..count {
                    let sx = x + i as f32 * step;
                    triangle(self.out, Vec2::new(sx, y + h), Vec2::new(sx + step / 2.0, y), Vec2::new(sx + step, y + h), colors::SPIKES);
                }
            }
            ObstacleKind::Laser { active, .. } => {
                if *active {
                    rect(self.out, x - 8.0, y, w + 16.0, h, colors::LASER_GLOW);
                    rect(self.out, x, y, w, h, colors::LASER);
                } else {
                    // Dashed guide line while off
                    let cx = x + w / 2.0;
                    let mut dy = 0.0;
                    while dy < h {
                        rect(self.out, cx - 0.5, y + dy, 1.0, 4.0_f32.min(h - dy), with_alpha(colors::LASER, 0.15));
                        dy += 8.0;
                    }
                }
                rect(self.out, x - 4.0, y - 4.0, w + 8.0, 8.0, colors::LASER_EMITTER);
                rect(self.out, x - 4.0, y + h - 4.0, w + 8.0, 8.0, colors::LASER_EMITTER);
            }
            ObstacleKind::MovingPlatform { axis, .. } => {
                rect(self.out, x, y, w, h, MOVING_PLATFORM);
                rect(self.out, x, y, w, 3.0, HIGHLIGHT);
                // Direction marker above the platform
                let c = Vec2::new(x + w / 2.0, y - 8.0);
                let d = match axis {
                    Axis::X => Vec2::new(5.0, 0.0),
                    Axis::Y => Vec2::new(0.0, 4.0),
                };
                line(self.out, c - d, c + d, 1.5, colors::METAL_RIVET);
            }
            ObstacleKind::Wind { push_x } => {
                let dir = if *push_x > 0.0 { 1.0 } else { -1.0 };
                for i in 0..10 {
                    let fi = i as f32;
                    // Stable pseudo-random placement per streak
                    let seed = (index * 10 + i) as f32;
                    let u = ((seed * 12.9898).sin() * 43758.547).fract().abs();
                    let v = ((seed * 78.233).sin() * 12543.133).fract().abs();
                    let drift = (self.time * 60.0 * dir + u * w).rem_euclid(w.max(1.0));
                    let start = Vec2::new(x + drift, y + v * h);
                    let len = 20.0 + (self.time * 3.0 + fi).sin() * 10.0;
                    line(self.out, start, start + Vec2::new(dir * len, 0.0), 1.5, colors::WIND);
                }
            }
            ObstacleKind::FallingPlatform {
                fall_timer, falling, ..
            } => {
                let warning = *fall_timer > 0.0 && !*falling;
                let shake = if warning { (self.time * 90.0).sin() * 2.0 } else { 0.0 };
                let color = if *falling { FALLING_WARN } else { FALLING_PLATFORM };
                rect(self.out, x + shake, y, w, h, color);
                rect(self.out, x + shake, y, w, 3.0, [1.0, 1.0, 1.0, 0.15]);
                if warning {
                    rect(self.out, x + shake, y + h - 2.0, w, 2.0, FALLING_WARN);
                }
            }
        }
    }

    fn signboard(&mut self, cx: f32, top: f32) {
        let s = self.sp(cx, top);
        let (bw, bh) = (54.0, 38.0);
        rect(self.out, s.x - 3.0, s.y, 6.0, 50.0, colors::SIGN_POST);
        let pulse = (self.time * 3.0).sin() * 0.2 + 0.3;
        rect(self.out, s.x - bw / 2.0 - 3.0, s.y - bh - 3.0, bw + 6.0, bh + 6.0, with_alpha(SUN_RAY, pulse));
        rect(self.out, s.x - bw / 2.0, s.y - bh, bw, bh, colors::SIGN_BOARD);
    }

    fn npc(&mut self, cx: f32, top: f32) {
        let o = self.sp(cx, top);
        let t = self.time;
        let bob = (t * 2.0).sin() * 2.0;
        let p = |x: f32, y: f32| o + Vec2::new(x, y + bob);
        circle(self.out, o + Vec2::new(0.0, 60.0), 6.0, colors::SHADOW, 10);
        circle(self.out, p(0.0, 10.0), 9.0, NPC_SKIN, 14);
        ring(self.out, p(0.0, 10.0), 7.5, 10.5, colors::NPC, 16);
        line(self.out, p(0.0, 20.0), p(0.0, 40.0), LINE_WIDTH, colors::NPC);
        line(self.out, p(0.0, 26.0), p(-12.0, 32.0 + (t * 2.0).sin() * 4.0), LINE_WIDTH, colors::NPC);
        line(self.out, p(0.0, 26.0), p(12.0, 28.0 - (t * 3.0).sin() * 6.0), LINE_WIDTH, colors::NPC);
        line(self.out, p(0.0, 40.0), p(-8.0, 58.0), LINE_WIDTH, colors::NPC);
        line(self.out, p(0.0, 40.0), p(8.0, 58.0), LINE_WIDTH, colors::NPC);
        // Speech bubble
        circle(self.out, p(16.0, 2.0 + (t * 4.0).sin() * 3.0), 10.0, [1.0, 1.0, 1.0, 0.9], 14);
        circle(self.out, p(0.0, -10.0), 3.0, colors::NPC_MARKER, 8);
    }

    fn portal(&mut self, center: Vec2) {
        let c = center - self.cam;
        let t = self.time;
        circle(self.out, c, 40.0, PORTAL_GLOW, 24);
        for i in 0..3 {
            let fi = i as f32;
            let r = 15.0 + fi * 8.0;
            let color = with_alpha(colors::PORTAL_OUTER, 0.5 - fi * 0.12);
            // Squashed rotating ring approximated by a tilted polyline
            let rot = t * (2.0 - fi * 0.5);
            let segs = 24;
            let point = |k: usize| {
                let a = k as f32 / segs as f32 * TAU;
                let local = Vec2::new(a.cos() * r, a.sin() * r * 0.6);
                c + Vec2::new(
                    local.x * rot.cos() - local.y * rot.sin(),
                    local.x * rot.sin() + local.y * rot.cos(),
                )
            };
            for k in 0..segs {
                line(self.out, point(k), point(k + 1), 2.5, color);
            }
        }
        circle(self.out, c, 5.0 + (t * 5.0).sin() * 2.0, colors::WHITE, 12);
        let arrow = c + Vec2::new(0.0, -38.0 + (t * 3.0).sin() * 3.0);
        triangle(
            self.out,
            arrow + Vec2::new(-4.0, -5.0),
            arrow + Vec2::new(6.0, 0.0),
            arrow + Vec2::new(-4.0, 5.0),
            colors::PORTAL_INNER,
        );
    }

    fn player(&mut self, player: &Player, tint: Color) {
        for point in &player.trail {
            circle(self.out, point.pos - self.cam, 3.0, with_alpha(colors::TRAIL, point.alpha * TRAIL_ALPHA), 8);
        }

        let anim = &player.anim;
        let origin = Vec2::new(player.center().x, player.pos.y) - self.cam;
        let squash = Vec2::new(
            (1.0 + anim.land_squash * 0.2 - anim.jump_stretch * 0.1) * player.facing,
            1.0 - anim.land_squash * 0.2 + anim.jump_stretch * 0.15,
        );

        let limbs = limb_angles(player);
        let (sin_t, cos_t) = limbs.tilt.sin_cos();
        let xf = |p: Vec2| {
            let r = Vec2::new(p.x * cos_t - p.y * sin_t, p.x * sin_t + p.y * cos_t);
            origin + r * squash
        };

        let crouch = if player.crouching { CROUCH_OFFSET } else { 0.0 };
        let head_y = HEAD_RADIUS + 2.0 + anim.breath_cycle.sin() * 0.5;
        let body_top = head_y + HEAD_RADIUS + 2.0;
        let body_bottom = body_top + BODY_LENGTH;
        let arm_y = body_top + 4.0;

        let hip = Vec2::new(0.0, body_bottom + crouch);
        let leg_len = LEG_LENGTH - crouch * 0.4;
        for angle in [limbs.leg_l + 0.1, limbs.leg_r - 0.1] {
            let foot = hip + Vec2::new(angle.sin(), angle.cos()) * leg_len;
            line(self.out, xf(hip), xf(foot), LINE_WIDTH, tint);
        }

        line(self.out, xf(Vec2::new(0.0, body_top + crouch * 0.3)), xf(hip), LINE_WIDTH, tint);

        let shoulder = Vec2::new(0.0, arm_y + crouch * 0.3);
        for angle in [limbs.arm_l + PI * 0.05, limbs.arm_r - PI * 0.05] {
            let hand = shoulder + Vec2::new(angle.sin(), angle.cos()) * ARM_LENGTH;
            line(self.out, xf(shoulder), xf(hand), LINE_WIDTH, tint);
        }

        let head = xf(Vec2::new(0.0, head_y + crouch * 0.3));
        let head_r = HEAD_RADIUS * squash.y;
        ring(self.out, head, head_r - LINE_WIDTH / 2.0, head_r + LINE_WIDTH / 2.0, tint, 18);

        let eye = xf(Vec2::new(2.5, head_y + crouch * 0.3 - 1.0));
        if anim.blinking {
            line(self.out, eye - Vec2::new(1.5, 0.0), eye + Vec2::new(1.5, 0.0), 1.0, tint);
        } else {
            rect(self.out, eye.x - 1.5, eye.y - 1.0, 3.0, 2.0, colors::EYE);
            rect(self.out, eye.x - 0.5, eye.y - 0.5, 1.5, 1.5, PUPIL);
        }
    }
}

/// Pose for one frame; angles in radians, 0 pointing straight down
struct Limbs {
    arm_l: f32,
    arm_r: f32,
    leg_l: f32,
    leg_r: f32,
    tilt: f32,
}

fn limb_angles(player: &Player) -> Limbs {
    let walk = player.anim.walk_cycle;
    let breath = player.anim.breath_cycle;
    match player.state {
        AnimState::Walk | AnimState::Run => {
            let amp = if player.state == AnimState::Run { 0.6 } else { 0.4 };
            Limbs {
                arm_l: walk.sin() * amp,
                arm_r: (walk + PI).sin() * amp,
                leg_l: (walk + PI).sin() * amp,
                leg_r: walk.sin() * amp,
                tilt: walk.sin() * 0.03,
            }
        }
        AnimState::Jump => Limbs {
            arm_l: -0.8,
            arm_r: -0.8,
            leg_l: 0.3,
            leg_r: -0.3,
            tilt: 0.0,
        },
        AnimState::Fall => Limbs {
            arm_l: 0.6,
            arm_r: 0.6,
            leg_l: -0.2,
            leg_r: 0.2,
            tilt: 0.0,
        },
        AnimState::Crouch => Limbs {
            arm_l: 0.3,
            arm_r: 0.3,
            leg_l: 0.8,
            leg_r: -0.8,
            tilt: 0.0,
        },
        AnimState::Interact => Limbs {
            arm_l: 0.2,
            arm_r: -1.2,
            leg_l: 0.0,
            leg_r: 0.0,
            tilt: 0.0,
        },
        AnimState::Idle => Limbs {
            arm_l: (breath * 0.5).sin() * 0.1 + 0.15,
            arm_r: (breath * 0.5 + 0.5).sin() * 0.1 + 0.15,
            leg_l: 0.0,
            leg_r: 0.0,
            tilt: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::{Obstacle, Sky, Zone};
    use crate::sim::{Rect, Transition, World};

    fn all_finite(vertices: &[Vertex]) -> bool {
        vertices
            .iter()
            .all(|v| v.position.iter().chain(v.color.iter()).all(|c| c.is_finite()))
    }

    #[test]
    fn test_every_zone_builds_finite_frame() {
        let mut state = GameState::new(5);
        let mut scene = Scene::new();
        for zone in 0..state.world.zone_count() {
            state.world.load_zone(zone);
            let spawn = state.world.zone().spawn;
            state.player.reset_transform(spawn);
            state.camera.snap_to(spawn);
            let vertices = scene.build(&state);
            assert!(!vertices.is_empty());
            assert_eq!(vertices.len() % 3, 0);
            assert!(all_finite(vertices), "zone {} produced NaN", zone);
        }
    }

    #[test]
    fn test_every_decoration_kind_emits_geometry() {
        let kinds = vec![
            DecorationKind::Tree {
                size: 80.0,
                trunk: colors::POST,
                leaf: GRASS,
            },
            DecorationKind::Bush {
                size: 20.0,
                color: GRASS,
            },
            DecorationKind::Flower {
                size: 4.0,
                color: colors::LASER,
            },
            DecorationKind::Cloud { size: 80.0, speed: 0.2 },
            DecorationKind::Sun { size: 60.0 },
            DecorationKind::Bird { speed: 1.0, offset: 0.0 },
            DecorationKind::House {
                w: 100.0,
                h: 90.0,
                roof: colors::LASER,
                wall: colors::WHITE,
                door: colors::POST,
                chimney: true,
            },
            DecorationKind::Fence,
            DecorationKind::Pipe {
                height: 60.0,
                color: GRASS,
            },
            DecorationKind::Underground {
                w: 200.0,
                h: 100.0,
                color: colors::POST,
            },
            DecorationKind::River { w: 200.0, h: 60.0 },
            DecorationKind::CodeFragment {
                symbol: "{ }",
                float_offset: 1.0,
            },
            DecorationKind::SkillPillar {
                label: "Rust",
                height: 120.0,
                color: colors::SIGNAL,
            },
            DecorationKind::Machine { variant: 1, size: 80.0 },
            DecorationKind::Conveyor { width: 200.0 },
            DecorationKind::Gear {
                size: 30.0,
                speed: 1.0,
                color: colors::MACHINE,
            },
            DecorationKind::Smokestack { height: 100.0 },
            DecorationKind::FactoryBuilding {
                w: 150.0,
                h: 120.0,
                color: colors::POST,
                roof: colors::CHIMNEY,
            },
            DecorationKind::TimelinePost {
                year: "2024",
                title: "Start",
                color: colors::SIGNAL,
            },
            DecorationKind::BridgeTower { height: 200.0 },
            DecorationKind::TowerTop,
            DecorationKind::TowerBody { height: 200.0 },
            DecorationKind::SignalDish,
            DecorationKind::SignalWave {
                radius: 40.0,
                offset: 0.5,
            },
            DecorationKind::Sparkle { size: 3.0, offset: 0.0 },
        ];
        let mut out = Vec::new();
        let mut frame = Frame {
            out: &mut out,
            cam: Vec2::ZERO,
            view: Vec2::new(1280.0, 720.0),
            time: 1.3,
        };
        for kind in kinds {
            let before = frame.out.len();
            let label = format!("{:?}", kind);
            frame.decoration(&Decoration::new(400.0, 400.0, kind));
            assert!(frame.out.len() > before, "{} emitted nothing", label);
        }
        assert!(all_finite(&out));
    }

    #[test]
    fn test_transition_overlay_is_last() {
        let mut state = GameState::new(2);
        let mut t = Transition::new(1, Vec2::ZERO);
        t.timer = t.phase_duration();
        state.transition = Some(t);
        let mut scene = Scene::new();
        let vertices = scene.build(&state);
        let last = vertices[vertices.len() - 1];
        assert_eq!(last.color, colors::BLACK);
    }

    #[test]
    fn test_inactive_laser_still_draws_emitters() {
        let mut zone = Zone {
            platforms: Vec::new(),
            decorations: Vec::new(),
            interactables: Vec::new(),
            obstacles: vec![Obstacle::laser(100.0, 100.0, 8.0, 100.0, 2.0)],
            npcs: Vec::new(),
            portals: Vec::new(),
            parallax: Vec::new(),
            sky: Sky {
                top: colors::WHITE,
                bottom: colors::WHITE,
            },
            width: 1000.0,
            spawn: Vec2::new(10.0, 10.0),
        };
        if let ObstacleKind::Laser { active, .. } = &mut zone.obstacles[0].kind {
            *active = false;
        }
        zone.obstacles
            .push(Obstacle::moving_platform(Rect::new(300.0, 300.0, 80.0, 20.0), Axis::X, 50.0, 1.0));
        let mut state = GameState::new(1);
        state.world = World::from_zones(vec![zone]);
        let mut scene = Scene::new();
        let vertices = scene.build(&state);
        assert!(vertices.iter().any(|v| v.color == colors::LASER_EMITTER));
        assert!(!vertices.iter().any(|v| v.color == colors::LASER));
    }
}
