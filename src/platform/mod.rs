//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key codes to held buttons and one-shot commands)
//! - Time (real frame deltas to fixed simulation steps)

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{InputState, Key};
