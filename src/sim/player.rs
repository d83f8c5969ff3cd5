//! Stickman avatar: physics, AABB collision and animation state

use std::collections::VecDeque;

use glam::Vec2;

use super::effects::{Effects, SoundCue};
use super::rect::Rect;
use super::tick::Buttons;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{Color, clamp, hex_to_rgba};

const DUST_COLOR: &str = "#a1887f";
const BODY_COLOR: Color = [0.0, 0.0, 0.0, 1.0];

/// Visual state derived after each physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
    Crouch,
    Interact,
}

/// Fading afterimage sample
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

/// Render-only timers
#[derive(Debug, Clone, Default)]
pub struct Animation {
    pub time: f32,
    pub walk_cycle: f32,
    pub breath_cycle: f32,
    pub blink_timer: f32,
    pub blinking: bool,
    /// 1 right after landing, decays toward 0
    pub land_squash: f32,
    /// 1 right after jumping, decays toward 0
    pub jump_stretch: f32,
}

/// Movement constants, overridable through `Tuning`
#[derive(Debug, Clone, Copy)]
pub struct Physics {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub acceleration: f32,
    pub jump_force: f32,
    pub gravity: f32,
    pub friction: f32,
}

impl From<&Tuning> for Physics {
    fn from(t: &Tuning) -> Self {
        Self {
            walk_speed: t.walk_speed,
            run_speed: t.run_speed,
            acceleration: t.acceleration,
            jump_force: t.jump_force,
            gravity: t.gravity,
            friction: t.friction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left of the visual bounds
    pub pos: Vec2,
    /// px per tick
    pub vel: Vec2,
    pub w: f32,
    pub h: f32,
    /// 1 facing right, -1 facing left
    pub facing: f32,
    pub grounded: bool,
    pub crouching: bool,
    /// Locked in a dialogue or panel
    pub interacting: bool,
    pub state: AnimState,
    pub trail: VecDeque<TrailPoint>,
    pub anim: Animation,
    pub physics: Physics,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            w: PLAYER_W,
            h: PLAYER_H,
            facing: 1.0,
            grounded: false,
            crouching: false,
            interacting: false,
            state: AnimState::Idle,
            trail: VecDeque::with_capacity(PLAYER_TRAIL_LENGTH + 1),
            anim: Animation::default(),
            physics: Physics::from(&Tuning::default()),
        }
    }

    pub fn with_tuning(mut self, tuning: &Tuning) -> Self {
        self.physics = Physics::from(tuning);
        self
    }

    /// Collision box: inset horizontally, shortened from the top while crouching
    pub fn collider(&self) -> Rect {
        let h = if self.crouching {
            self.h * CROUCH_HEIGHT_FACTOR
        } else {
            self.h
        };
        Rect::new(
            self.pos.x + COLLIDER_INSET_X,
            self.pos.y + (self.h - h),
            self.w - COLLIDER_INSET_X * 2.0,
            h,
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.w / 2.0, self.pos.y + self.h / 2.0)
    }

    pub fn feet_y(&self) -> f32 {
        self.pos.y + self.h
    }

    /// Teleport to `spawn` with zero velocity
    pub fn reset_transform(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
    }

    /// One physics tick
    pub fn update(&mut self, input: &Buttons, solids: &[Rect], dt: f32, fx: &mut Effects) {
        let was_grounded = self.grounded;
        self.advance_timers(dt, fx);

        let move_x = self.apply_input(input, fx);
        let speed = if input.run {
            self.physics.run_speed
        } else {
            self.physics.walk_speed
        };
        self.vel.x += move_x * speed * self.physics.acceleration;
        self.vel.x *= self.physics.friction;
        if move_x != 0.0 {
            self.facing = move_x.signum();
        }

        self.vel.y += self.physics.gravity;
        self.vel.y = clamp(self.vel.y, -MAX_VERTICAL_SPEED, MAX_VERTICAL_SPEED);

        self.pos.x += self.vel.x;
        self.resolve_collision_x(solids);

        self.pos.y += self.vel.y;
        self.grounded = false;
        self.resolve_collision_y(solids, was_grounded, fx);

        self.state = self.derive_state();
        self.update_trail();

        if self.grounded && self.vel.x.abs() > 2.0 && fx.chance(0.3) {
            let x = self.center().x + fx.rand_range(-5.0, 5.0);
            let vx = fx.rand_range(-0.5, 0.5);
            let vy = fx.rand_range(-1.0, -0.3);
            let life = fx.rand_range(0.2, 0.4);
            fx.spawn(x, self.feet_y(), vx, vy, life, hex_to_rgba(DUST_COLOR, 1.0), 2.0);
        }
    }

    fn advance_timers(&mut self, dt: f32, fx: &mut Effects) {
        let anim = &mut self.anim;
        anim.time += dt;
        anim.breath_cycle += dt * 2.0;
        let stride = (anim.walk_cycle / std::f32::consts::PI).floor();
        anim.walk_cycle += dt * if self.state == AnimState::Run { 14.0 } else { 10.0 };
        // A foot lands every half walk cycle
        let walking = self.grounded && matches!(self.state, AnimState::Walk | AnimState::Run);
        if walking && (anim.walk_cycle / std::f32::consts::PI).floor() != stride {
            fx.sound(SoundCue::Step);
        }

        anim.blink_timer -= dt;
        if anim.blink_timer <= 0.0 {
            anim.blinking = !anim.blinking;
            anim.blink_timer = if anim.blinking {
                0.1
            } else {
                fx.rand_range(2.0, 5.0)
            };
        }

        anim.land_squash *= 0.85;
        anim.jump_stretch *= 0.85;
    }

    /// Read held buttons: crouch and jump take effect immediately.
    /// Returns the horizontal intent (-1, 0 or 1).
    pub fn apply_input(&mut self, input: &Buttons, fx: &mut Effects) -> f32 {
        self.crouching = false;
        if self.interacting {
            return 0.0;
        }

        let mut move_x = 0.0;
        if input.left {
            move_x -= 1.0;
        }
        if input.right {
            move_x += 1.0;
        }
        if input.down && self.grounded {
            self.crouching = true;
        }
        if input.jump && self.grounded && !self.crouching {
            self.vel.y = self.physics.jump_force;
            self.grounded = false;
            self.anim.jump_stretch = 1.0;
            fx.sound(SoundCue::Jump);
            let (x, y) = (self.center().x, self.feet_y());
            for _ in 0..6 {
                let vx = fx.rand_range(-2.0, 2.0);
                let vy = fx.rand_range(-3.0, -1.0);
                let life = fx.rand_range(0.3, 0.6);
                fx.spawn(x, y, vx, vy, life, BODY_COLOR, 3.0);
            }
        }
        move_x
    }

    /// Push out of every solid along x, then stop horizontal motion
    pub fn resolve_collision_x(&mut self, solids: &[Rect]) {
        for p in solids {
            if !self.collider().overlaps(p) {
                continue;
            }
            if self.vel.x > 0.0 {
                self.pos.x = p.x - self.w + COLLIDER_INSET_X - COLLISION_EPSILON;
            } else if self.vel.x < 0.0 {
                self.pos.x = p.right() - COLLIDER_INSET_X + COLLISION_EPSILON;
            }
            self.vel.x = 0.0;
        }
    }

    /// Land on or bump against every solid along y
    pub fn resolve_collision_y(&mut self, solids: &[Rect], was_grounded: bool, fx: &mut Effects) {
        let mut landed = false;
        for p in solids {
            let col = self.collider();
            if !col.overlaps(p) {
                continue;
            }
            if self.vel.y > 0.0 {
                self.pos.y = p.y - self.h;
                self.vel.y = 0.0;
                if !was_grounded && !landed {
                    landed = true;
                    self.on_land(fx);
                }
                self.grounded = true;
            } else if self.vel.y < 0.0 {
                let top_offset = col.y - self.pos.y;
                self.pos.y = p.bottom() - top_offset;
                self.vel.y = 0.0;
            }
        }
    }

    fn on_land(&mut self, fx: &mut Effects) {
        self.anim.land_squash = 1.0;
        fx.sound(SoundCue::Land);
        let dust = hex_to_rgba(DUST_COLOR, 1.0);
        for _ in 0..4 {
            let x = self.center().x + fx.rand_range(-8.0, 8.0);
            let vx = fx.rand_range(-2.0, 2.0);
            let vy = fx.rand_range(-2.0, -0.5);
            let life = fx.rand_range(0.3, 0.5);
            fx.spawn(x, self.feet_y(), vx, vy, life, dust, 3.0);
        }
    }

    fn derive_state(&self) -> AnimState {
        if self.interacting {
            AnimState::Interact
        } else if self.crouching {
            AnimState::Crouch
        } else if !self.grounded {
            if self.vel.y < 0.0 {
                AnimState::Jump
            } else {
                AnimState::Fall
            }
        } else if self.vel.x.abs() > 3.0 {
            AnimState::Run
        } else if self.vel.x.abs() > 0.5 {
            AnimState::Walk
        } else {
            AnimState::Idle
        }
    }

    fn update_trail(&mut self) {
        if self.vel.x.abs() > 1.0 || !self.grounded {
            self.trail.push_back(TrailPoint {
                pos: self.center(),
                alpha: 0.5,
            });
            if self.trail.len() > PLAYER_TRAIL_LENGTH {
                self.trail.pop_front();
            }
        }
        for t in &mut self.trail {
            t.alpha *= 0.9;
        }
        self.trail.retain(|t| t.alpha > 0.02);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::GameEvent;
    use crate::sim::particles::ParticleSystem;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Harness {
        particles: ParticleSystem,
        rng: Pcg32,
        events: Vec<GameEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                particles: ParticleSystem::default(),
                rng: Pcg32::seed_from_u64(42),
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

        fn count(&self, cue: SoundCue) -> usize {
            self.events
                .iter()
                .filter(|e| **e == GameEvent::Sound(cue))
                .count()
        }
    }

    fn ground() -> Vec<Rect> {
        vec![Rect::new(-500.0, 500.0, 2000.0, 80.0)]
    }

    fn settle(player: &mut Player, h: &mut Harness, solids: &[Rect]) {
        for _ in 0..120 {
            player.update(&Buttons::default(), solids, SIM_DT, &mut h.fx());
        }
    }

    #[test]
    fn test_falls_and_lands_on_ground() {
        let mut h = Harness::new();
        let mut player = Player::new(100.0, 300.0);
        settle(&mut player, &mut h, &ground());
        assert!(player.grounded);
        assert_eq!(player.feet_y(), 500.0);
        assert_eq!(player.vel.y, 0.0);
        assert_eq!(player.state, AnimState::Idle);
    }

    #[test]
    fn test_jump_impulse_is_exact() {
        let mut h = Harness::new();
        let mut player = Player::new(100.0, 440.0);
        settle(&mut player, &mut h, &ground());

        let input = Buttons {
            jump: true,
            ..Default::default()
        };
        player.apply_input(&input, &mut h.fx());
        assert_eq!(player.vel.y, -12.0);
        assert!(!player.grounded);
        assert_eq!(h.count(SoundCue::Jump), 1);
    }

    #[test]
    fn test_footsteps_follow_the_walk_cycle() {
        let mut h = Harness::new();
        let mut player = Player::new(100.0, 300.0);
        settle(&mut player, &mut h, &ground());
        assert_eq!(h.count(SoundCue::Step), 0);

        let right = Buttons {
            right: true,
            ..Default::default()
        };
        for _ in 0..120 {
            player.update(&right, &ground(), SIM_DT, &mut h.fx());
        }
        // Two seconds at 10-14 rad/s, one step per half cycle
        let steps = h.count(SoundCue::Step);
        assert!((6..=10).contains(&steps), "steps = {}", steps);
    }

    #[test]
    fn test_landing_fires_once_per_touchdown() {
        let mut h = Harness::new();
        let mut player = Player::new(100.0, 300.0);
        settle(&mut player, &mut h, &ground());
        assert_eq!(h.count(SoundCue::Land), 1);

        // Standing still for many ticks does not re-trigger
        settle(&mut player, &mut h, &ground());
        assert_eq!(h.count(SoundCue::Land), 1);

        let jump = Buttons {
            jump: true,
            ..Default::default()
        };
        player.update(&jump, &ground(), SIM_DT, &mut h.fx());
        settle(&mut player, &mut h, &ground());
        assert_eq!(h.count(SoundCue::Land), 2);
    }

    #[test]
    fn test_crouch_keeps_feet_and_blocks_jump() {
        let mut h = Harness::new();
        let mut player = Player::new(100.0, 440.0);
        settle(&mut player, &mut h, &ground());
        let standing = player.collider();

        let input = Buttons {
            down: true,
            jump: true,
            ..Default::default()
        };
        player.update(&input, &ground(), SIM_DT, &mut h.fx());
        let crouched = player.collider();
        assert!(player.crouching);
        assert!(player.grounded);
        assert_eq!(player.state, AnimState::Crouch);
        assert!((crouched.bottom() - standing.bottom()).abs() < 1e-3);
        assert!((crouched.h - PLAYER_H * CROUCH_HEIGHT_FACTOR).abs() < 1e-3);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let mut h = Harness::new();
        let mut solids = ground();
        solids.push(Rect::new(200.0, 400.0, 40.0, 100.0));
        let mut player = Player::new(100.0, 440.0);
        settle(&mut player, &mut h, &solids);

        let right = Buttons {
            right: true,
            ..Default::default()
        };
        for _ in 0..120 {
            player.update(&right, &solids, SIM_DT, &mut h.fx());
        }
        assert!(player.collider().right() <= 200.0);
        assert!(player.collider().right() > 199.0);
        assert_eq!(player.facing, 1.0);
    }

    #[test]
    fn test_interacting_ignores_input() {
        let mut h = Harness::new();
        let mut player = Player::new(100.0, 440.0);
        settle(&mut player, &mut h, &ground());
        player.interacting = true;
        let input = Buttons {
            left: true,
            jump: true,
            ..Default::default()
        };
        player.update(&input, &ground(), SIM_DT, &mut h.fx());
        assert!(player.grounded);
        assert_eq!(player.vel.x, 0.0);
        assert_eq!(player.state, AnimState::Interact);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut h = Harness::new();
        let mut player = Player::new(100.0, -2000.0);
        for _ in 0..60 {
            player.update(&Buttons::default(), &[], SIM_DT, &mut h.fx());
            assert!(player.trail.len() <= PLAYER_TRAIL_LENGTH);
        }
        assert!(!player.trail.is_empty());
    }

    proptest! {
        #[test]
        fn prop_vertical_speed_bounded(
            vy in -100.0f32..100.0,
            y in -1000.0f32..1000.0,
            left in any::<bool>(),
            right in any::<bool>(),
            jump in any::<bool>(),
            ticks in 1usize..60,
        ) {
            let mut h = Harness::new();
            let mut player = Player::new(100.0, y);
            player.vel.y = vy;
            let input = Buttons { left, right, jump, ..Default::default() };
            for _ in 0..ticks {
                player.update(&input, &ground(), SIM_DT, &mut h.fx());
                prop_assert!(player.vel.y.abs() <= MAX_VERTICAL_SPEED);
            }
        }

        #[test]
        fn prop_no_overlap_after_y_resolve(
            px in -200i32..200,
            py in -200i32..200,
            pw in 1i32..300,
            ph in 1i32..100,
            x in -250i32..250,
            y in -300i32..300,
            vy in prop_oneof![-20.0f32..-0.1, 0.1f32..20.0],
        ) {
            let mut h = Harness::new();
            let platform = Rect::new(px as f32, py as f32, pw as f32, ph as f32);
            let mut player = Player::new(x as f32, y as f32);
            player.vel.y = vy;
            player.resolve_collision_y(&[platform], false, &mut h.fx());
            prop_assert!(!player.collider().overlaps(&platform));
        }
    }
}
