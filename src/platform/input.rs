//! Keyboard and touch input mapping
//!
//! Browser `KeyboardEvent.code` strings are parsed once into `Key`; held
//! keys feed `Buttons`, edge-triggered keys queue a `Command` for the next
//! tick.

use crate::sim::{Buttons, Command, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
    Down,
    Run,
    Interact,
    Pause,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::Left),
            "ArrowRight" | "KeyD" => Some(Key::Right),
            "ArrowUp" | "KeyW" | "Space" => Some(Key::Jump),
            "ArrowDown" | "KeyS" => Some(Key::Down),
            "ShiftLeft" | "ShiftRight" => Some(Key::Run),
            "KeyE" => Some(Key::Interact),
            "Escape" => Some(Key::Pause),
            _ => None,
        }
    }

    /// Whether the browser default (scrolling) should be suppressed
    pub fn blocks_default(&self) -> bool {
        matches!(self, Key::Left | Key::Right | Key::Jump | Key::Down)
    }
}

/// Touch buttons on small screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Jump,
    Down,
}

impl TouchButton {
    pub const ALL: [TouchButton; 3] = [TouchButton::Left, TouchButton::Jump, TouchButton::Down];

    pub fn element_id(&self) -> &'static str {
        match self {
            TouchButton::Left => "mobile-btn-left",
            TouchButton::Jump => "mobile-btn-up",
            TouchButton::Down => "mobile-btn-down",
        }
    }
}

/// Accumulated input between simulation ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: Buttons,
    touch: Buttons,
    pending: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key pressed; `repeat` is the browser's auto-repeat flag
    pub fn key_down(&mut self, key: Key, repeat: bool) {
        match key {
            Key::Left => self.keys.left = true,
            Key::Right => self.keys.right = true,
            Key::Jump => self.keys.jump = true,
            Key::Down => self.keys.down = true,
            Key::Run => self.keys.run = true,
            Key::Interact if !repeat => self.pending.push(Command::Interact),
            Key::Pause if !repeat => self.pending.push(Command::TogglePause),
            Key::Interact | Key::Pause => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.keys.left = false,
            Key::Right => self.keys.right = false,
            Key::Jump => self.keys.jump = false,
            Key::Down => self.keys.down = false,
            Key::Run => self.keys.run = false,
            Key::Interact | Key::Pause => {}
        }
    }

    pub fn set_touch(&mut self, button: TouchButton, pressed: bool) {
        match button {
            TouchButton::Left => self.touch.left = pressed,
            TouchButton::Jump => self.touch.jump = pressed,
            TouchButton::Down => self.touch.down = pressed,
        }
    }

    /// Queue a command from a DOM button
    pub fn push(&mut self, command: Command) {
        self.pending.push(command);
    }

    /// Release everything, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.keys = Buttons::default();
        self.touch = Buttons::default();
    }

    /// Keyboard and touch merged
    pub fn held(&self) -> Buttons {
        Buttons {
            left: self.keys.left || self.touch.left,
            right: self.keys.right || self.touch.right,
            jump: self.keys.jump || self.touch.jump,
            down: self.keys.down || self.touch.down,
            run: self.keys.run || self.touch.run,
        }
    }

    /// Input for the next tick; queued commands are handed over once
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            held: self.held(),
            commands: std::mem::take(&mut self.pending),
        }
    }
}
