//! Code Quest - A side-scrolling platformer portfolio
//!
//! Core modules:
//! - `sim`: Seeded simulation (player physics, world, interactions, particles)
//! - `renderer`: Scene building and WebGPU pipeline
//! - `platform`: Browser input mapping and frame clock
//! - `tuning`: Data-driven physics and camera balance
//! - `ui`: HUD, prompt and dialogue view models

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use tuning::Tuning;

/// RGBA color in 0-1 space
pub type Color = [f32; 4];

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, velocities are px per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Upper bound on a single frame delta (tab-background resume)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default viewport when no canvas is attached
    pub const DEFAULT_VIEWPORT_W: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_H: f32 = 720.0;

    /// Player body (visual bounds)
    pub const PLAYER_W: f32 = 30.0;
    pub const PLAYER_H: f32 = 60.0;
    /// Collider inset on each horizontal side
    pub const COLLIDER_INSET_X: f32 = 5.0;
    /// Crouching keeps this fraction of the collider height
    pub const CROUCH_HEIGHT_FACTOR: f32 = 0.6;
    /// Vertical speed bound (px/tick)
    pub const MAX_VERTICAL_SPEED: f32 = 20.0;
    /// Horizontal push-out after a side collision
    pub const COLLISION_EPSILON: f32 = 0.1;
    /// Trail length for the player afterimage
    pub const PLAYER_TRAIL_LENGTH: usize = 8;

    /// Particle pool cap
    pub const MAX_PARTICLES: usize = 300;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const PARTICLE_DRAG: f32 = 0.98;

    /// Falling off the world below this y respawns the player
    pub const FALL_LIMIT_Y: f32 = 700.0;
    /// Falling platforms recycle once below this y
    pub const FALLING_PLATFORM_RESET_Y: f32 = 800.0;
    pub const FALLING_PLATFORM_SPEED: f32 = 4.0;
    /// Vertical band for "standing on" a falling platform
    pub const FALLING_PLATFORM_BAND: f32 = 5.0;
    /// Chance per tick of an ambient particle spawning
    pub const AMBIENT_SPAWN_CHANCE: f32 = 0.04;
    /// Zone width used when a zone does not declare one
    pub const DEFAULT_ZONE_WIDTH: f32 = 3000.0;

    /// Proximity radii
    pub const INTERACT_RADIUS: f32 = 70.0;
    pub const PORTAL_RADIUS: f32 = 50.0;
    /// Typewriter reveal rate
    pub const TYPEWRITER_MS_PER_CHAR: f32 = 30.0;
    /// Hazards
    pub const DAMAGE_COOLDOWN: f32 = 1.5;
    pub const DAMAGE_FLASH: f32 = 0.5;
    pub const KNOCKBACK_VY: f32 = -8.0;
    pub const KNOCKBACK_VX: f32 = 5.0;
    /// Laser hit box is widened by this on each side
    pub const LASER_HIT_MARGIN: f32 = 5.0;
    /// Fraction of a wind zone's push applied per tick
    pub const WIND_PUSH_FACTOR: f32 = 0.1;
    /// Debounce after closing an info panel
    pub const INTERACTION_COOLDOWN: f32 = 0.5;

    /// Zone transition phases (seconds)
    pub const TRANSITION_FADE_IN: f32 = 0.8;
    pub const TRANSITION_HOLD: f32 = 1.0;
    pub const TRANSITION_FADE_OUT: f32 = 0.6;

    /// Loading screen pacing
    pub const LOADING_STEP_INTERVAL: f32 = 0.2;
    pub const LOADING_FINISH_DELAY: f32 = 0.5;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp `val` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics: when `min > max` (a viewport wider
/// than the zone, say) the lower bound wins.
#[inline]
pub fn clamp(val: f32, min: f32, max: f32) -> f32 {
    val.min(max).max(min)
}

/// Ease in-out cubic
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Distance between two points
#[inline]
pub fn dist(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Parse `#rrggbb` into a color. Malformed input yields opaque white.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> Color {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .map(|v| v as f32 / 255.0)
    };
    match (hex.starts_with('#'), channel(1..3), channel(3..5), channel(5..7)) {
        (true, Some(r), Some(g), Some(b)) => [r, g, b, alpha],
        _ => [1.0, 1.0, 1.0, alpha],
    }
}

/// Convert HSL (hue in degrees, saturation/lightness in percent) to a color
pub fn hsl_to_rgba(h: f32, s: f32, l: f32, alpha: f32) -> Color {
    let s = s / 100.0;
    let l = l / 100.0;
    let k = |n: f32| (n + h / 30.0).rem_euclid(12.0);
    let a = s * l.min(1.0 - l);
    let f = |n: f32| l - a * (k(n) - 3.0).min(9.0 - k(n)).clamp(-1.0, 1.0);
    [f(0.0), f(8.0), f(4.0), alpha]
}

/// Same color with a new alpha
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}
