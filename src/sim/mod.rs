//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod effects;
pub mod interaction;
pub mod particles;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;
pub mod world;
pub mod zones;

pub use effects::{Effects, GameEvent, SoundCue};
pub use interaction::{Dialogue, DialoguePhase, DialogueStep, InteractionSystem, PromptKind};
pub use particles::{Particle, ParticleSystem};
pub use player::{AnimState, Player};
pub use rect::Rect;
pub use state::{Camera, GamePhase, GameState, LoadingScreen, Transition, TransitionPhase};
pub use tick::{Buttons, Command, TickInput, tick};
pub use world::{
    Decoration, DecorationKind, Obstacle, ObstacleKind, PanelKind, Platform, PlatformKind, World,
    Zone, ZoneInfo,
};
